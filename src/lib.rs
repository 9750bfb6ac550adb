//! # hashfn
//!
//! Digest scalar functions (`md5`, `sha1`, `sha224`, `sha256`, `sha384`,
//! `sha512`) for a columnar SQL expression engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          FunctionRegistry (signature table)              │
//! │          md5(S)  sha1(S)  sha256(S) ...                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve + FunctionFactory]
//! ┌─────────────────────────────────────────────────────────┐
//! │          HashFunction ─── child Function                 │
//! │          sink A / sink B / Digest                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [str_a / str_b per Record]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Option<StrView> (hex digest or NULL)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use hashfn::prelude::*;
//!
//! let f = HashFunction::new(DigestAlgorithm::Sha1, Box::new(StrColumn::new("name", 0)));
//! let row = Row::single(Some("abc"));
//!
//! assert_eq!(
//!     f.str_a(&row).unwrap().as_deref(),
//!     Some("a9993e364706816aba3e25717850c26c9cd0d89d")
//! );
//! assert_eq!(explain(&f), "sha1(name)");
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod factory;
pub mod function;
pub mod lanes;
pub mod plan;
pub mod record;
pub mod registry;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{EngineConfig, ExecutionContext, Settings};
    pub use crate::digest::{Digest, DigestAlgorithm};
    pub use crate::error::{FunctionError, FunctionResult};
    pub use crate::factory::{FunctionFactory, HashFunctionFactory};
    pub use crate::function::{
        Accessor, ColumnType, Function, HashFunction, StrColumn, StrConstant, StrView,
        UnaryFunction,
    };
    pub use crate::lanes::{evaluate_column, LaneExecutor};
    pub use crate::plan::{explain, PlanSink};
    pub use crate::record::{Record, Row};
    pub use crate::registry::FunctionRegistry;
}

pub use digest::DigestAlgorithm;
pub use error::{FunctionError, FunctionResult};
pub use function::{Function, HashFunction};
pub use registry::FunctionRegistry;
