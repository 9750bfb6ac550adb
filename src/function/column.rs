//! Column reference leaf.

use super::{Accessor, ColumnType, Function, StrView};
use crate::error::FunctionResult;
use crate::plan::PlanSink;
use crate::record::Record;

/// Reads a string column from the current record.
#[derive(Debug, Clone)]
pub struct StrColumn {
    name: String,
    index: usize,
}

impl StrColumn {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Function for StrColumn {
    fn column_type(&self) -> ColumnType {
        ColumnType::String
    }

    // Both views read straight from the record; nothing is buffered.
    fn str_value<'a>(
        &'a self,
        rec: &'a dyn Record,
        _accessor: Accessor,
    ) -> FunctionResult<Option<StrView<'a>>> {
        Ok(rec.str_a(self.index).map(StrView::Borrowed))
    }

    fn to_plan(&self, sink: &mut PlanSink) {
        sink.val(&self.name);
    }

    fn duplicate(&self) -> Option<Box<dyn Function>> {
        Some(Box::new(self.clone()))
    }
}
