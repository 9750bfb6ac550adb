//! Scalar function nodes.
//!
//! A [`Function`] is a node of a compiled expression tree. The engine pulls
//! values through it one row at a time via the two value accessors:
//!
//! ```text
//! Record ──► StrColumn ──► HashFunction ──► Option<StrView>
//!                            │
//!                            ├─ sink A  (Accessor::Primary)
//!                            └─ sink B  (Accessor::Secondary)
//! ```
//!
//! Both accessors compute the same value for a row. They exist so that a
//! caller can keep one result alive (say, row X through the primary view)
//! while computing another (row Y through the secondary view) on the same
//! instance, which is what equality predicates and set operations need.

mod column;
mod constant;
mod hash;

pub use column::StrColumn;
pub use constant::StrConstant;
pub use hash::HashFunction;

use std::cell::Ref;
use std::fmt;
use std::ops::Deref;

use crate::error::FunctionResult;
use crate::plan::{explain, PlanSink};
use crate::record::Record;

/// Value type produced by a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    /// Untyped NULL literal; accepted wherever a string is expected.
    Null,
}

/// Which of the two output views an evaluation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// The A-view.
    Primary,
    /// The B-view.
    Secondary,
}

/// Borrowed string produced by a function for the current row.
///
/// Either points into the record (or a constant) or into an output buffer
/// owned by the function. A buffer-backed view holds a shared borrow of that
/// buffer, so the buffer cannot be overwritten while the view is alive.
pub enum StrView<'a> {
    Borrowed(&'a str),
    Sink(Ref<'a, String>),
}

impl Deref for StrView<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        match self {
            StrView::Borrowed(s) => s,
            StrView::Sink(sink) => sink.as_str(),
        }
    }
}

impl fmt::Debug for StrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl fmt::Display for StrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl PartialEq<str> for StrView<'_> {
    fn eq(&self, other: &str) -> bool {
        &**self == other
    }
}

impl PartialEq<&str> for StrView<'_> {
    fn eq(&self, other: &&str) -> bool {
        &**self == *other
    }
}

/// A node of a compiled expression.
///
/// Implementations are `Send` so a lane can own one, but not necessarily
/// `Sync`: evaluation may mutate buffers behind `&self`.
pub trait Function: Send {
    fn column_type(&self) -> ColumnType;

    /// Evaluate the string value for `rec` into the view selected by
    /// `accessor`. `Ok(None)` means NULL.
    fn str_value<'a>(
        &'a self,
        rec: &'a dyn Record,
        accessor: Accessor,
    ) -> FunctionResult<Option<StrView<'a>>>;

    fn str_a<'a>(&'a self, rec: &'a dyn Record) -> FunctionResult<Option<StrView<'a>>> {
        self.str_value(rec, Accessor::Primary)
    }

    fn str_b<'a>(&'a self, rec: &'a dyn Record) -> FunctionResult<Option<StrView<'a>>> {
        self.str_value(rec, Accessor::Secondary)
    }

    /// Whether one instance may be driven by several execution lanes.
    fn is_thread_safe(&self) -> bool {
        self.args().iter().all(|arg| arg.is_thread_safe())
    }

    /// Whether the value is the same for every row.
    fn is_constant(&self) -> bool {
        false
    }

    /// Render this function for explain output.
    fn to_plan(&self, sink: &mut PlanSink);

    /// Direct children, for traversal by optimisation passes.
    fn args(&self) -> &[Box<dyn Function>] {
        &[]
    }

    /// A fresh, independent instance computing the same values, used to give
    /// each execution lane its own copy. `None` if the function cannot be
    /// duplicated.
    fn duplicate(&self) -> Option<Box<dyn Function>> {
        None
    }
}

/// A function with exactly one argument.
pub trait UnaryFunction: Function {
    fn arg(&self) -> &dyn Function;
}

impl fmt::Debug for dyn Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&explain(self))
    }
}

/// Visit `function` and all of its descendants, parents first.
pub fn walk(function: &dyn Function, visit: &mut dyn FnMut(&dyn Function)) {
    visit(function);
    for arg in function.args() {
        walk(arg.as_ref(), visit);
    }
}
