//! Integration tests for multi-lane row evaluation.

use hashfn::config::{EngineConfig, ExecutionContext, Settings};
use hashfn::digest::{hex_digest, DigestAlgorithm};
use hashfn::error::FunctionResult;
use hashfn::function::{Accessor, ColumnType, Function, HashFunction, StrColumn, StrView};
use hashfn::lanes::{evaluate_column, LaneExecutor};
use hashfn::plan::PlanSink;
use hashfn::record::{Record, Row};

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            if i % 7 == 3 {
                Row::single(None)
            } else {
                Row::single(Some(format!("value-{}", i).as_str()))
            }
        })
        .collect()
}

fn expected(rows: &[Row]) -> Vec<Option<String>> {
    rows.iter()
        .map(|r| {
            r.str_a(0)
                .map(|v| hex_digest(DigestAlgorithm::Sha1, v.as_bytes()).unwrap())
        })
        .collect()
}

fn sha1() -> HashFunction {
    HashFunction::new(DigestAlgorithm::Sha1, Box::new(StrColumn::new("v", 0)))
}

#[test]
fn test_serial_evaluation() {
    let rows = rows(50);
    let out = evaluate_column(&sha1(), &rows).unwrap();
    assert_eq!(out, expected(&rows));
}

#[test]
fn test_parallel_matches_serial() {
    let rows = rows(1000);
    let exec = LaneExecutor::new(4, 16);
    assert_eq!(exec.planned_lanes(rows.len()), 4);

    let out = exec.evaluate(&sha1(), &rows).unwrap();
    assert_eq!(out, expected(&rows));
}

#[test]
fn test_uneven_chunks_keep_order() {
    let rows = rows(103);
    let out = LaneExecutor::new(8, 1).evaluate(&sha1(), &rows).unwrap();
    assert_eq!(out.len(), 103);
    assert_eq!(out, expected(&rows));
}

#[test]
fn test_empty_input() {
    let out = LaneExecutor::new(4, 1).evaluate(&sha1(), &Vec::<Row>::new()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_from_context() {
    let settings = Settings::from_toml(
        r#"
[execution]
lanes = 3
min_rows_per_lane = 5
"#,
    )
    .unwrap();
    let config = EngineConfig::from_settings(&settings);
    let ctx = ExecutionContext::new(&config);
    let exec = LaneExecutor::from_context(&config, &ctx);

    assert_eq!(exec.planned_lanes(100), 3);
    assert_eq!(exec.planned_lanes(9), 1);

    let single = LaneExecutor::from_context(&config, &ctx.clone().with_lanes(1));
    assert_eq!(single.planned_lanes(100), 1);
}

/// A leaf that cannot be duplicated.
struct Opaque;

impl Function for Opaque {
    fn column_type(&self) -> ColumnType {
        ColumnType::String
    }

    fn str_value<'a>(
        &'a self,
        rec: &'a dyn Record,
        _accessor: Accessor,
    ) -> FunctionResult<Option<StrView<'a>>> {
        Ok(rec.str_a(0).map(StrView::Borrowed))
    }

    fn to_plan(&self, sink: &mut PlanSink) {
        sink.val("opaque");
    }
}

#[test]
fn test_non_duplicable_falls_back_to_one_lane() {
    let f = HashFunction::new(DigestAlgorithm::Sha1, Box::new(Opaque));
    assert!(f.duplicate().is_none());

    let rows = rows(200);
    let out = LaneExecutor::new(4, 1).evaluate(&f, &rows).unwrap();
    assert_eq!(out, expected(&rows));
}
