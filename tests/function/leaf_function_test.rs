//! Integration tests for leaf functions and tree traversal.

use hashfn::digest::DigestAlgorithm;
use hashfn::function::{walk, ColumnType, Function, HashFunction, StrColumn, StrConstant};
use hashfn::plan::explain;
use hashfn::record::Row;

#[test]
fn test_column_reads_by_index() {
    let row = Row::from(vec![Some("id-1"), Some("alice"), None]);

    assert_eq!(StrColumn::new("id", 0).str_a(&row).unwrap().as_deref(), Some("id-1"));
    assert_eq!(StrColumn::new("name", 1).str_b(&row).unwrap().as_deref(), Some("alice"));
    assert!(StrColumn::new("email", 2).str_a(&row).unwrap().is_none());
    assert!(StrColumn::new("missing", 9).str_a(&row).unwrap().is_none());
}

#[test]
fn test_leaf_metadata() {
    let col = StrColumn::new("name", 1);
    assert!(col.is_thread_safe());
    assert!(!col.is_constant());
    assert_eq!(col.column_type(), ColumnType::String);
    assert!(col.args().is_empty());

    let lit = StrConstant::new("x");
    assert!(lit.is_thread_safe());
    assert!(lit.is_constant());
}

#[test]
fn test_walk_collects_leaves() {
    let f = HashFunction::new(
        DigestAlgorithm::Sha256,
        Box::new(HashFunction::new(
            DigestAlgorithm::Sha1,
            Box::new(StrColumn::new("email", 4)),
        )),
    );

    let mut leaves = Vec::new();
    walk(&f, &mut |node| {
        if node.args().is_empty() {
            leaves.push(explain(node));
        }
    });
    assert_eq!(leaves, vec!["email".to_string()]);
}

#[test]
fn test_debug_renders_plan() {
    let f: Box<dyn Function> = Box::new(HashFunction::new(
        DigestAlgorithm::Md5,
        Box::new(StrConstant::new("a")),
    ));
    assert_eq!(format!("{:?}", f), "md5('a')");
}
