//! Pipeline execution
//!
//! Provides [`Executor`], which runs a [`Pipeline`] forward or in reverse
//! against a working tree. Steps run strictly in order; the first failure
//! aborts the run. Already applied steps are not rolled back.

use crate::error::ExecutionError;
use crate::pipeline::Pipeline;
use revmig_changes::Changes;
use revmig_transform::{Console, TransformWork, WorkTree};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::time::{Duration, Instant};

/// Which way a pipeline runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Declared order
    #[default]
    Forward,
    /// Inverse sequence
    Reverse,
}

impl Direction {
    /// The other direction
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Reverse => f.write_str("reverse"),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Direction that ran
    pub direction: Direction,
    /// Top-level steps applied
    pub steps_applied: usize,
    /// Final destination message
    pub message: String,
    /// Errors reported on the console
    pub console_errors: usize,
    /// Wall time spent applying steps
    pub elapsed: Duration,
}

/// Runs pipelines against a working tree
#[derive(Clone, Copy)]
pub struct Executor<'c> {
    console: &'c dyn Console,
    fail_on_console_errors: bool,
}

impl<'c> Executor<'c> {
    /// Create executor reporting to `console`
    #[inline]
    #[must_use]
    pub fn new(console: &'c dyn Console) -> Self {
        Self {
            console,
            fail_on_console_errors: true,
        }
    }

    /// Whether console errors abort the run (default: yes)
    #[inline]
    #[must_use]
    pub fn fail_on_console_errors(mut self, fail: bool) -> Self {
        self.fail_on_console_errors = fail;
        self
    }

    /// Run `pipeline` in `direction` over `tree`
    ///
    /// For `Reverse` the inverse is resolved before any step is applied.
    ///
    /// # Errors
    /// - `NonReversible` if reversing is impossible (tree untouched)
    /// - `Step` for the first failing top-level step
    /// - `ConsoleErrors` if a step reported errors and the executor is strict
    pub fn run(
        &self,
        pipeline: &Pipeline,
        direction: Direction,
        tree: &mut WorkTree,
        changes: &Changes,
        message: &str,
    ) -> Result<RunOutcome, ExecutionError> {
        let sequence = pipeline.sequence(direction)?;
        tracing::info!(
            pipeline = pipeline.name(),
            %direction,
            steps = sequence.len(),
            "starting run"
        );

        let started = Instant::now();
        let mut work = TransformWork::new(tree, message, changes, self.console);

        for (index, step) in sequence.steps().iter().enumerate() {
            let step_started = Instant::now();
            self.console.progress(&format!(
                "[{}/{}] {}",
                index + 1,
                sequence.len(),
                step.describe()
            ));

            step.apply(&mut work).map_err(|source| {
                tracing::error!(step = %step.describe(), error = %source, "step failed");
                ExecutionError::Step {
                    direction,
                    step: step.describe(),
                    source,
                }
            })?;

            let count = work.console().error_count();
            if self.fail_on_console_errors && count > 0 {
                return Err(ExecutionError::ConsoleErrors {
                    direction,
                    step: step.describe(),
                    count,
                });
            }

            tracing::debug!(
                index,
                step = %step.describe(),
                elapsed_ms = step_started.elapsed().as_millis(),
                "step applied"
            );
        }

        let console_errors = work.console().error_count();
        let outcome = RunOutcome {
            direction,
            steps_applied: sequence.len(),
            message: work.into_message(),
            console_errors,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            pipeline = pipeline.name(),
            %direction,
            steps = outcome.steps_applied,
            elapsed_ms = outcome.elapsed.as_millis(),
            "run completed"
        );
        Ok(outcome)
    }
}

impl fmt::Debug for Executor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("fail_on_console_errors", &self.fail_on_console_errors)
            .finish_non_exhaustive()
    }
}
