//! Function factories.
//!
//! A factory declares a signature and builds a [`Function`] bound to
//! already-compiled arguments. The registry checks arity and argument types
//! against the signature before calling [`FunctionFactory::new_instance`].

use tracing::trace;

use crate::config::{EngineConfig, ExecutionContext};
use crate::digest::DigestAlgorithm;
use crate::error::{FunctionError, FunctionResult};
use crate::function::{Function, HashFunction};

/// Builds function instances for one signature.
pub trait FunctionFactory: Send + Sync {
    /// Declared signature, e.g. `sha1(S)`.
    fn signature(&self) -> &str;

    /// Build an instance bound to `args`.
    ///
    /// `position` is the source position of the call, `arg_positions` the
    /// positions of each argument, for error reporting.
    fn new_instance(
        &self,
        position: usize,
        args: Vec<Box<dyn Function>>,
        arg_positions: &[usize],
        config: &EngineConfig,
        ctx: &ExecutionContext,
    ) -> FunctionResult<Box<dyn Function>>;
}

/// Factory for `<algorithm>(S)`.
#[derive(Debug, Clone)]
pub struct HashFunctionFactory {
    algorithm: DigestAlgorithm,
    signature: String,
}

impl HashFunctionFactory {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            signature: format!("{}(S)", algorithm.name()),
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl FunctionFactory for HashFunctionFactory {
    fn signature(&self) -> &str {
        &self.signature
    }

    fn new_instance(
        &self,
        position: usize,
        args: Vec<Box<dyn Function>>,
        _arg_positions: &[usize],
        _config: &EngineConfig,
        ctx: &ExecutionContext,
    ) -> FunctionResult<Box<dyn Function>> {
        let arity = args.len();
        let Some(arg) = args.into_iter().next().filter(|_| arity == 1) else {
            return Err(FunctionError::ArgumentMismatch {
                signature: self.signature.clone(),
                position,
                message: format!("expected 1 argument, got {}", arity),
            });
        };

        trace!(
            query_id = ctx.query_id(),
            function = self.algorithm.name(),
            "instantiating hash function"
        );
        Ok(Box::new(HashFunction::new(self.algorithm, arg)))
    }
}
