//! Execution engines for controlling computation strategy
//!
//! Every bulk kernel of the sparse matrices asks its engine one question:
//! given this many nonzeros, should the work be split into partitions, and
//! into how many? The engine then runs one task per partition and blocks
//! until all of them are done.
//!
//! # Design Philosophy
//!
//! - **Synchronous**: a kernel never returns before all of its tasks finished
//! - **Thread Pool Integration**: the parallel engine runs on Rayon, either on
//!   the global pool or on a dedicated one
//! - **Deterministic**: task results come back in task order, so partitioned
//!   kernels can merge them exactly like the serial loop would

mod config;
pub mod partition;

pub use config::{ExecutionConfig, DEFAULT_THRESHOLD_2D};
pub use partition::{split_ranges, split_slice_mut};

#[cfg(feature = "parallel")]
use crate::Result;

/// Execution strategy for bulk operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process everything in the calling thread
    Sequential,
    /// Split work into partitions handled by worker threads
    Parallel,
}

/// Marker trait for execution engine mode properties
pub trait ExecutionMode {
    /// Whether this engine always executes in the calling thread
    const IS_SEQUENTIAL: bool;
}

/// Trait for execution engines that control how bulk kernels are run
pub trait ExecutionEngine: Clone + Send + Sync + ExecutionMode + 'static {
    /// Submit one task per item and wait for all of them.
    ///
    /// Results are returned in the order of `tasks`.
    fn execute_tasks<T, F, R>(&self, tasks: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        F: Fn(T) -> R + Sync + Send,
        R: Send;

    /// Get the execution strategy
    fn strategy(&self) -> ExecutionStrategy;

    /// Get the number of threads available
    fn num_threads(&self) -> usize;

    /// Nonzero count from which kernels are partitioned
    fn threshold(&self) -> usize;

    /// Decide how many partitions a kernel over `units` rows (or values)
    /// holding `nnz` nonzeros should use.
    ///
    /// `None` means run serially in the calling thread.
    fn partition_count(&self, nnz: usize, units: usize) -> Option<usize> {
        if Self::IS_SEQUENTIAL {
            return None;
        }
        let nthreads = self.num_threads();
        if nthreads > 1 && nnz >= self.threshold() {
            let n = nthreads.min(units);
            if n > 1 {
                return Some(n);
            }
        }
        None
    }
}

/// Sequential execution engine
///
/// Executes all operations sequentially in the current thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionMode for SequentialEngine {
    const IS_SEQUENTIAL: bool = true;
}

impl ExecutionEngine for SequentialEngine {
    fn execute_tasks<T, F, R>(&self, tasks: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        F: Fn(T) -> R + Sync + Send,
        R: Send,
    {
        tasks.into_iter().map(f).collect()
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }

    fn num_threads(&self) -> usize {
        1
    }

    fn threshold(&self) -> usize {
        usize::MAX
    }
}

/// Parallel execution engine using Rayon
///
/// Kernels whose nonzero count reaches `threshold` are partitioned across the
/// pool; smaller ones stay in the calling thread.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug)]
pub struct ParallelEngine {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
    threshold: usize,
}

#[cfg(feature = "parallel")]
impl Default for ParallelEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "parallel")]
impl ParallelEngine {
    /// Create a new parallel engine on the global Rayon pool
    pub fn new() -> Self {
        Self {
            thread_pool: None,
            threshold: DEFAULT_THRESHOLD_2D,
        }
    }

    /// Create a new parallel engine with a custom thread pool
    pub fn with_thread_pool(pool: std::sync::Arc<rayon::ThreadPool>) -> Self {
        Self {
            thread_pool: Some(pool),
            threshold: DEFAULT_THRESHOLD_2D,
        }
    }

    /// Create with a specific number of threads
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| crate::Error::Execution(format!("Failed to create thread pool: {e}")))?;
        log::debug!("Created thread pool with {num_threads} threads");

        Ok(Self::with_thread_pool(std::sync::Arc::new(pool)))
    }

    /// Build a dedicated pool from a configuration
    pub fn from_config(config: &ExecutionConfig) -> Result<Self> {
        config.validate()?;
        let engine = Self::with_num_threads(config.resolved_threads())?;
        log::trace!("Partition threshold {}", config.threshold_2d);
        Ok(engine.with_threshold(config.threshold_2d))
    }

    /// Replace the partitioning threshold
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

#[cfg(feature = "parallel")]
impl ExecutionMode for ParallelEngine {
    const IS_SEQUENTIAL: bool = false;
}

#[cfg(feature = "parallel")]
impl ExecutionEngine for ParallelEngine {
    fn execute_tasks<T, F, R>(&self, tasks: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        F: Fn(T) -> R + Sync + Send,
        R: Send,
    {
        use rayon::prelude::*;

        if let Some(pool) = &self.thread_pool {
            pool.install(|| tasks.into_par_iter().map(f).collect())
        } else {
            tasks.into_par_iter().map(f).collect()
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Parallel
    }

    fn num_threads(&self) -> usize {
        if let Some(pool) = &self.thread_pool {
            pool.current_num_threads()
        } else {
            rayon::current_num_threads()
        }
    }

    fn threshold(&self) -> usize {
        self.threshold
    }
}

/// Create a sequential engine
pub fn sequential() -> SequentialEngine {
    SequentialEngine::new()
}

/// Create a parallel engine on the global pool with the default threshold
#[cfg(feature = "parallel")]
pub fn parallel() -> ParallelEngine {
    ParallelEngine::new()
}
