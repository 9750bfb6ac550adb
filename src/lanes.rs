//! Row evaluation across execution lanes.
//!
//! Functions may keep per-instance scratch state (see
//! [`HashFunction`](crate::function::HashFunction)), so a single instance is
//! never driven by two lanes. Each lane owns a [`Function::duplicate`] of the
//! compiled function and evaluates a contiguous chunk of rows on the rayon
//! pool. Results are reassembled in row order.

use rayon::prelude::*;
use tracing::debug;

use crate::config::{EngineConfig, ExecutionContext};
use crate::error::FunctionResult;
use crate::function::Function;
use crate::record::Record;

/// Evaluate `function` over `rows` on the calling thread.
pub fn evaluate_column<R: Record>(
    function: &dyn Function,
    rows: &[R],
) -> FunctionResult<Vec<Option<String>>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let value = function.str_a(row)?;
        out.push(value.map(|v| v.to_string()));
    }
    Ok(out)
}

/// Splits row evaluation over several lanes.
#[derive(Debug, Clone, Copy)]
pub struct LaneExecutor {
    lanes: usize,
    min_rows_per_lane: usize,
}

impl LaneExecutor {
    pub fn new(lanes: usize, min_rows_per_lane: usize) -> Self {
        Self {
            lanes: lanes.max(1),
            min_rows_per_lane: min_rows_per_lane.max(1),
        }
    }

    pub fn from_context(config: &EngineConfig, ctx: &ExecutionContext) -> Self {
        Self::new(ctx.lanes(), config.min_rows_per_lane())
    }

    /// Number of lanes that would be used for `row_count` rows.
    pub fn planned_lanes(&self, row_count: usize) -> usize {
        (row_count / self.min_rows_per_lane).clamp(1, self.lanes)
    }

    /// Evaluate `function` for every row, preserving row order.
    ///
    /// The first error from any lane aborts the evaluation.
    pub fn evaluate<R: Record + Sync>(
        &self,
        function: &dyn Function,
        rows: &[R],
    ) -> FunctionResult<Vec<Option<String>>> {
        let lanes = self.planned_lanes(rows.len());
        if lanes == 1 {
            return evaluate_column(function, rows);
        }

        let Some(instances) = lane_instances(function, lanes) else {
            debug!("function cannot be duplicated, evaluating on one lane");
            return evaluate_column(function, rows);
        };

        let chunk_size = rows.len().div_ceil(lanes);
        debug!(
            lanes,
            chunk_size,
            thread_safe = function.is_thread_safe(),
            "evaluating rows across lanes"
        );

        let chunks: Vec<Vec<Option<String>>> = instances
            .into_par_iter()
            .zip(rows.par_chunks(chunk_size))
            .map(|(instance, chunk)| evaluate_column(instance.as_ref(), chunk))
            .collect::<FunctionResult<_>>()?;

        Ok(chunks.into_iter().flatten().collect())
    }
}

// `Function` is not `Sync`, so every lane needs its own instance whether or
// not the function reports itself thread-safe.
fn lane_instances(function: &dyn Function, lanes: usize) -> Option<Vec<Box<dyn Function>>> {
    (0..lanes).map(|_| function.duplicate()).collect()
}
