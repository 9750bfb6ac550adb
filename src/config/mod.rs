//! Configuration module for hashfn.
//!
//! Handles settings files, environment variables and the engine/execution
//! objects passed to function factories.

mod context;
mod settings;

pub use context::{EngineConfig, ExecutionContext};
pub use settings::{expand_env_vars, ExecutionSettings, FunctionSettings, Settings, SettingsError};
