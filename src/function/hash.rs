//! Digest of a string argument, rendered as lowercase hex.
//!
//! `sha1(name)` and friends. One instance is compiled per query and reused
//! for every row. The two output buffers and the digest state are owned by
//! the instance and overwritten in place, so evaluating a row allocates
//! nothing once the buffers have grown to the digest length.

use std::cell::RefCell;

use super::{Accessor, ColumnType, Function, StrView, UnaryFunction};
use crate::digest::{Digest, DigestAlgorithm};
use crate::error::{FunctionError, FunctionResult};
use crate::plan::PlanSink;
use crate::record::Record;

pub struct HashFunction {
    algorithm: DigestAlgorithm,
    arg: Box<dyn Function>,
    sink_a: RefCell<String>,
    sink_b: RefCell<String>,
    digest: RefCell<Digest>,
}

impl HashFunction {
    pub fn new(algorithm: DigestAlgorithm, arg: Box<dyn Function>) -> Self {
        Self {
            algorithm,
            arg,
            sink_a: RefCell::new(String::with_capacity(algorithm.hex_len())),
            sink_b: RefCell::new(String::with_capacity(algorithm.hex_len())),
            digest: RefCell::new(Digest::new(algorithm)),
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn sink(&self, accessor: Accessor) -> &RefCell<String> {
        match accessor {
            Accessor::Primary => &self.sink_a,
            Accessor::Secondary => &self.sink_b,
        }
    }

    fn view_in_use(&self) -> FunctionError {
        FunctionError::ViewInUse {
            function: self.name().to_string(),
        }
    }
}

impl Function for HashFunction {
    fn column_type(&self) -> ColumnType {
        ColumnType::String
    }

    fn str_value<'a>(
        &'a self,
        rec: &'a dyn Record,
        accessor: Accessor,
    ) -> FunctionResult<Option<StrView<'a>>> {
        // The argument's value does not change between the two views of one
        // row, so both read its primary view.
        let Some(value) = self.arg.str_a(rec)? else {
            return Ok(None);
        };

        let cell = self.sink(accessor);
        {
            let mut sink = cell.try_borrow_mut().map_err(|_| self.view_in_use())?;
            let mut digest = self
                .digest
                .try_borrow_mut()
                .map_err(|_| self.view_in_use())?;
            sink.clear();
            digest.hash(value.as_bytes(), &mut sink)?;
        }

        let view = cell.try_borrow().map_err(|_| self.view_in_use())?;
        Ok(Some(StrView::Sink(view)))
    }

    fn is_thread_safe(&self) -> bool {
        false
    }

    fn to_plan(&self, sink: &mut PlanSink) {
        sink.val(self.name()).ch('(').func(self.arg.as_ref()).ch(')');
    }

    fn args(&self) -> &[Box<dyn Function>] {
        std::slice::from_ref(&self.arg)
    }

    fn duplicate(&self) -> Option<Box<dyn Function>> {
        let arg = self.arg.duplicate()?;
        Some(Box::new(HashFunction::new(self.algorithm, arg)))
    }
}

impl UnaryFunction for HashFunction {
    fn arg(&self) -> &dyn Function {
        self.arg.as_ref()
    }
}
