//! Task executors for independent counting work.
//!
//! Counting tasks are pure functions of their inputs, so the only contract
//! an executor must honor is the batch barrier: `run` returns after every
//! task of the batch finished or the batch failed. The serial executor is
//! always available (tests want determinism and no thread pool); the rayon
//! executor is compiled in with the `rayon` feature and is the default
//! there.

use crate::util::CorrSkyResult;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How batches of independent counting tasks are driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Executor {
    /// In-process, one task at a time, in index order.
    Serial,
    /// Work-stealing thread pool.
    #[cfg(feature = "rayon")]
    Rayon,
}

impl Default for Executor {
    fn default() -> Self {
        #[cfg(feature = "rayon")]
        {
            Executor::Rayon
        }
        #[cfg(not(feature = "rayon"))]
        {
            Executor::Serial
        }
    }
}

impl Executor {
    /// Runs `n` independent tasks to completion and collects their results.
    ///
    /// The first failing task aborts the batch: with the serial executor no
    /// later task starts, and the rayon executor stops handing out
    /// outstanding work once a task has returned an error. No partial
    /// result set escapes.
    pub(crate) fn run<T, F>(&self, n: usize, task: F) -> CorrSkyResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> CorrSkyResult<T> + Send + Sync,
    {
        match self {
            Executor::Serial => (0..n).map(task).collect(),
            #[cfg(feature = "rayon")]
            Executor::Rayon => (0..n).into_par_iter().map(task).collect(),
        }
    }

    /// Runs two independent closures, concurrently where the executor can.
    ///
    /// The orchestrator uses this to overlap the two count types of a
    /// computation (DD with RR, CD with CR), which share no data.
    pub(crate) fn join<A, B, FA, FB>(&self, a: FA, b: FB) -> (A, B)
    where
        A: Send,
        B: Send,
        FA: FnOnce() -> A + Send,
        FB: FnOnce() -> B + Send,
    {
        match self {
            Executor::Serial => (a(), b()),
            #[cfg(feature = "rayon")]
            Executor::Rayon => rayon::join(a, b),
        }
    }
}
