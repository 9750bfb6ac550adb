//! Integration tests for signature-based function resolution.

use std::sync::Arc;

use hashfn::config::{EngineConfig, ExecutionContext, Settings};
use hashfn::digest::DigestAlgorithm;
use hashfn::factory::{FunctionFactory, HashFunctionFactory};
use hashfn::function::{Function, StrColumn, StrConstant};
use hashfn::plan::explain;
use hashfn::record::Row;
use hashfn::registry::FunctionRegistry;
use hashfn::FunctionError;

fn setup() -> (FunctionRegistry, EngineConfig, ExecutionContext) {
    let config = EngineConfig::default();
    let ctx = ExecutionContext::new(&config);
    (FunctionRegistry::builtin().unwrap(), config, ctx)
}

fn column(name: &str) -> Box<dyn Function> {
    Box::new(StrColumn::new(name, 0))
}

#[test]
fn test_resolve_sha1() {
    let (registry, config, ctx) = setup();

    let f = registry
        .resolve("sha1", 7, vec![column("name")], &[12], &config, &ctx)
        .unwrap();

    assert_eq!(explain(f.as_ref()), "sha1(name)");
    assert!(!f.is_thread_safe());

    let row = Row::single(Some("abc"));
    assert_eq!(
        f.str_a(&row).unwrap().as_deref(),
        Some("a9993e364706816aba3e25717850c26c9cd0d89d")
    );
}

#[test]
fn test_resolve_is_case_insensitive() {
    let (registry, config, ctx) = setup();
    let f = registry
        .resolve("SHA256", 0, vec![column("x")], &[7], &config, &ctx)
        .unwrap();
    assert_eq!(explain(f.as_ref()), "sha256(x)");
}

#[test]
fn test_resolve_unknown_function() {
    let (registry, config, ctx) = setup();
    let result = registry.resolve("sha3", 0, vec![column("x")], &[5], &config, &ctx);
    match result {
        Err(FunctionError::UnknownFunction { name }) => assert_eq!(name, "sha3"),
        other => panic!(
            "expected UnknownFunction, got {:?}",
            other.map(|f| explain(f.as_ref()))
        ),
    }
}

#[test]
fn test_resolve_wrong_arity() {
    let (registry, config, ctx) = setup();
    let result = registry.resolve(
        "md5",
        4,
        vec![column("a"), column("b")],
        &[8, 11],
        &config,
        &ctx,
    );
    assert!(matches!(
        result,
        Err(FunctionError::ArgumentMismatch { position: 4, .. })
    ));
}

#[test]
fn test_resolve_accepts_null_literal() {
    let (registry, config, ctx) = setup();
    let null: Box<dyn Function> = Box::new(StrConstant::null());
    let f = registry
        .resolve("md5", 0, vec![null], &[4], &config, &ctx)
        .unwrap();
    assert_eq!(explain(f.as_ref()), "md5(null)");
    assert!(f.str_a(&Row::default()).unwrap().is_none());
}

#[test]
fn test_nested_resolution() {
    let (registry, config, ctx) = setup();
    let inner = registry
        .resolve("md5", 5, vec![column("s")], &[9], &config, &ctx)
        .unwrap();
    let outer = registry
        .resolve("sha1", 0, vec![inner], &[5], &config, &ctx)
        .unwrap();
    assert_eq!(explain(outer.as_ref()), "sha1(md5(s))");
}

struct PrefixFactory;

impl FunctionFactory for PrefixFactory {
    fn signature(&self) -> &str {
        "prefix(Ss)"
    }

    fn new_instance(
        &self,
        _position: usize,
        mut args: Vec<Box<dyn Function>>,
        _arg_positions: &[usize],
        _config: &EngineConfig,
        _ctx: &ExecutionContext,
    ) -> Result<Box<dyn Function>, FunctionError> {
        Ok(args.remove(0))
    }
}

#[test]
fn test_constant_argument_type_checked() {
    let (mut registry, config, ctx) = setup();
    registry.register(Arc::new(PrefixFactory)).unwrap();

    let ok = registry.resolve(
        "prefix",
        0,
        vec![column("a"), Box::new(StrConstant::new("p")) as Box<dyn Function>],
        &[7, 10],
        &config,
        &ctx,
    );
    assert!(ok.is_ok());

    let bad = registry.resolve(
        "prefix",
        0,
        vec![column("a"), column("b")],
        &[7, 10],
        &config,
        &ctx,
    );
    assert!(matches!(
        bad,
        Err(FunctionError::ArgumentMismatch { position: 10, .. })
    ));
}

struct BrokenFactory;

impl FunctionFactory for BrokenFactory {
    fn signature(&self) -> &str {
        "broken(S"
    }

    fn new_instance(
        &self,
        _position: usize,
        _args: Vec<Box<dyn Function>>,
        _arg_positions: &[usize],
        _config: &EngineConfig,
        _ctx: &ExecutionContext,
    ) -> Result<Box<dyn Function>, FunctionError> {
        unreachable!("never registered")
    }
}

#[test]
fn test_invalid_signature_rejected() {
    let mut registry = FunctionRegistry::new();
    let result = registry.register(Arc::new(BrokenFactory));
    assert!(matches!(result, Err(FunctionError::InvalidSignature(_))));
}

#[test]
fn test_registry_from_config() {
    let settings = Settings::from_toml(
        r#"
[functions]
enabled = ["sha1", "md5"]
"#,
    )
    .unwrap();
    let config = EngineConfig::from_settings(&settings);
    let registry = FunctionRegistry::with_config(&config).unwrap();

    assert_eq!(registry.signatures(), vec!["md5(S)", "sha1(S)"]);
    assert!(registry.contains("SHA1"));
    assert!(!registry.contains("sha256"));
}

#[test]
fn test_factory_signatures_match_registry() {
    let registry = FunctionRegistry::builtin().unwrap();
    for algorithm in DigestAlgorithm::ALL {
        let factory = HashFunctionFactory::new(algorithm);
        assert!(registry.signatures().contains(&factory.signature().to_string()));
    }
}
