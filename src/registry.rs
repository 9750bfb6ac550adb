//! Signature-keyed function registry.
//!
//! Factories are registered once at startup. Each declares a signature of the
//! form `name(T...)`, where every `T` is an argument type code:
//!
//! | Code | Accepts                              |
//! |------|--------------------------------------|
//! | `S`  | any string expression (or NULL)      |
//! | `s`  | a constant string expression (or NULL) |
//!
//! Resolution looks the name up case-insensitively, picks the overload with
//! matching arity, checks argument types and only then calls the factory, so
//! factories never see an argument list that contradicts their signature.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::{EngineConfig, ExecutionContext};
use crate::digest::DigestAlgorithm;
use crate::error::{FunctionError, FunctionResult};
use crate::factory::{FunctionFactory, HashFunctionFactory};
use crate::function::{ColumnType, Function};

/// Declared argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    ConstString,
}

impl ArgType {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'S' => Some(ArgType::String),
            's' => Some(ArgType::ConstString),
            _ => None,
        }
    }

    fn code(&self) -> char {
        match self {
            ArgType::String => 'S',
            ArgType::ConstString => 's',
        }
    }

    fn accepts(&self, arg: &dyn Function) -> bool {
        let typed = matches!(arg.column_type(), ColumnType::String | ColumnType::Null);
        match self {
            ArgType::String => typed,
            ArgType::ConstString => typed && arg.is_constant(),
        }
    }
}

/// Parsed function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub arg_types: Vec<ArgType>,
}

impl FunctionSignature {
    /// Parse `name(T...)`.
    pub fn parse(signature: &str) -> FunctionResult<Self> {
        let invalid = || FunctionError::InvalidSignature(signature.to_string());

        let open = signature.find('(').ok_or_else(invalid)?;
        let types = signature[open + 1..]
            .strip_suffix(')')
            .ok_or_else(invalid)?;
        let name = &signature[..open];

        let valid_name = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(invalid());
        }

        let arg_types = types
            .chars()
            .map(ArgType::from_code)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        Ok(Self {
            name: name.to_ascii_lowercase(),
            arg_types,
        })
    }

    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for t in &self.arg_types {
            write!(f, "{}", t.code())?;
        }
        write!(f, ")")
    }
}

struct Registration {
    signature: FunctionSignature,
    factory: Arc<dyn FunctionFactory>,
}

/// Maps function names to their registered overloads.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Vec<Registration>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in hashing function.
    pub fn builtin() -> FunctionResult<Self> {
        Self::with_algorithms(&DigestAlgorithm::ALL)
    }

    /// Registry with the hashing functions enabled in `config`.
    pub fn with_config(config: &EngineConfig) -> FunctionResult<Self> {
        Self::with_algorithms(config.enabled())
    }

    fn with_algorithms(algorithms: &[DigestAlgorithm]) -> FunctionResult<Self> {
        let mut registry = Self::new();
        for &algorithm in algorithms {
            registry.register(Arc::new(HashFunctionFactory::new(algorithm)))?;
        }
        Ok(registry)
    }

    /// Register a factory under its declared signature.
    pub fn register(&mut self, factory: Arc<dyn FunctionFactory>) -> FunctionResult<()> {
        let signature = FunctionSignature::parse(factory.signature())?;
        let overloads = self.functions.entry(signature.name.clone()).or_default();

        if overloads
            .iter()
            .any(|r| r.signature.arity() == signature.arity())
        {
            return Err(FunctionError::DuplicateSignature(signature.to_string()));
        }

        debug!(signature = %signature, "registered function");
        overloads.push(Registration { signature, factory });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_ascii_lowercase())
    }

    /// All registered signatures, sorted by name then arity.
    pub fn signatures(&self) -> Vec<String> {
        let mut out = Vec::new();
        for overloads in self.functions.values() {
            let mut sigs: Vec<_> = overloads.iter().map(|r| &r.signature).collect();
            sigs.sort_by_key(|s| s.arity());
            out.extend(sigs.into_iter().map(|s| s.to_string()));
        }
        out
    }

    /// Resolve `name(args...)` to a function instance.
    pub fn resolve(
        &self,
        name: &str,
        position: usize,
        args: Vec<Box<dyn Function>>,
        arg_positions: &[usize],
        config: &EngineConfig,
        ctx: &ExecutionContext,
    ) -> FunctionResult<Box<dyn Function>> {
        let key = name.to_ascii_lowercase();
        let overloads = self
            .functions
            .get(&key)
            .ok_or_else(|| FunctionError::UnknownFunction {
                name: name.to_string(),
            })?;

        let Some(registration) = overloads
            .iter()
            .find(|r| r.signature.arity() == args.len())
        else {
            let declared: Vec<String> = overloads.iter().map(|r| r.signature.to_string()).collect();
            return Err(FunctionError::ArgumentMismatch {
                signature: declared.join(", "),
                position,
                message: format!("no overload takes {} argument(s)", args.len()),
            });
        };

        for (i, (arg, expected)) in args
            .iter()
            .zip(&registration.signature.arg_types)
            .enumerate()
        {
            if !expected.accepts(arg.as_ref()) {
                return Err(FunctionError::ArgumentMismatch {
                    signature: registration.signature.to_string(),
                    position: arg_positions.get(i).copied().unwrap_or(position),
                    message: match expected {
                        ArgType::String => "expected a string argument".to_string(),
                        ArgType::ConstString => "expected a constant string argument".to_string(),
                    },
                });
            }
        }

        debug!(
            query_id = ctx.query_id(),
            signature = %registration.signature,
            "resolved function"
        );
        registration
            .factory
            .new_instance(position, args, arg_positions, config, ctx)
    }
}
