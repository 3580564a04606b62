//! Execution configuration
//!
//! Thread count and the nonzero threshold below which bulk kernels stay in
//! the calling thread.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of nonzeros a 2-d kernel needs before it is partitioned.
pub const DEFAULT_THRESHOLD_2D: usize = 65_536;

/// Configuration consumed by [`ParallelEngine::from_config`](super::ParallelEngine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Worker threads; `None` means one per logical CPU
    pub num_threads: Option<usize>,
    /// Minimum nonzero count for partitioned execution
    pub threshold_2d: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            threshold_2d: DEFAULT_THRESHOLD_2D,
        }
    }
}

impl ExecutionConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Thread count after resolving the `None` default
    pub fn resolved_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(Error::InvalidParameter(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
