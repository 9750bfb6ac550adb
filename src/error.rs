//! Function error types.

use thiserror::Error;

/// Result type for function construction and evaluation.
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Errors raised while resolving, instantiating or evaluating functions.
///
/// A NULL input is never an error: accessors return `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum FunctionError {
    /// No factory is registered under this name.
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    /// Arguments do not match the declared signature.
    #[error("argument mismatch for {signature} at position {position}: {message}")]
    ArgumentMismatch {
        /// Declared signature, e.g. `sha1(S)`.
        signature: String,
        /// Source position of the offending argument (or of the call).
        position: usize,
        message: String,
    },

    /// A factory declared a signature that cannot be parsed.
    #[error("invalid function signature: {0}")]
    InvalidSignature(String),

    /// A factory with the same name and arity is already registered.
    #[error("duplicate function signature: {0}")]
    DuplicateSignature(String),

    /// Digest algorithm name not recognised.
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The caller still holds the view returned by the previous call to the
    /// same accessor.
    #[error("{function}: previous value view is still in use")]
    ViewInUse { function: String },

    /// The digest primitive failed to render its output.
    #[error("digest failed: {0}")]
    Digest(#[from] std::fmt::Error),
}
