//! Objects threaded through function instantiation.

use std::sync::atomic::{AtomicU64, Ordering};

use super::settings::Settings;
use crate::digest::DigestAlgorithm;

/// Engine-wide configuration handed to every factory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    enabled: Vec<DigestAlgorithm>,
    lanes: usize,
    min_rows_per_lane: usize,
}

impl EngineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.functions.enabled.clone(),
            lanes: settings.execution.resolved_lanes(),
            min_rows_per_lane: settings.execution.min_rows_per_lane,
        }
    }

    pub fn is_enabled(&self, algorithm: DigestAlgorithm) -> bool {
        self.enabled.contains(&algorithm)
    }

    pub fn enabled(&self) -> &[DigestAlgorithm] {
        &self.enabled
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn min_rows_per_lane(&self) -> usize {
        self.min_rows_per_lane
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);

/// Per-query execution context.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    query_id: u64,
    lanes: usize,
}

impl ExecutionContext {
    /// New context with a process-unique query id.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            query_id: NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed),
            lanes: config.lanes(),
        }
    }

    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes.max(1);
        self
    }

    pub fn query_id(&self) -> u64 {
        self.query_id
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }
}
