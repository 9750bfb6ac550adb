//! String constant leaf.

use super::{Accessor, ColumnType, Function, StrView};
use crate::error::FunctionResult;
use crate::plan::PlanSink;
use crate::record::Record;

/// A string literal, or the NULL literal when `value` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrConstant {
    value: Option<String>,
}

impl StrConstant {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn null() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Function for StrConstant {
    fn column_type(&self) -> ColumnType {
        match self.value {
            Some(_) => ColumnType::String,
            None => ColumnType::Null,
        }
    }

    fn str_value<'a>(
        &'a self,
        _rec: &'a dyn Record,
        _accessor: Accessor,
    ) -> FunctionResult<Option<StrView<'a>>> {
        Ok(self.value.as_deref().map(StrView::Borrowed))
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn to_plan(&self, sink: &mut PlanSink) {
        match &self.value {
            Some(value) => sink.quoted(value),
            None => sink.val("null"),
        };
    }

    fn duplicate(&self) -> Option<Box<dyn Function>> {
        Some(Box::new(self.clone()))
    }
}
