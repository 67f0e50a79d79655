//! Diagnostic sink available to transformations
//!
//! Provides the [`Console`] trait, a [`TracingConsole`] that forwards to
//! `tracing`, and the [`CountingConsole`] wrapper the executor uses to
//! decide whether a step failed through its diagnostics.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sink for user-facing diagnostics
pub trait Console: Send + Sync {
    /// Informational message
    fn info(&self, message: &str);

    /// Warning
    fn warn(&self, message: &str);

    /// Error; callers count these to abort the run
    fn error(&self, message: &str);

    /// Progress update
    fn progress(&self, message: &str);

    /// Message shown only in verbose mode
    fn verbose(&self, message: &str);
}

/// Console that emits `tracing` events under the `revmig::console` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn info(&self, message: &str) {
        tracing::info!(target: "revmig::console", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "revmig::console", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "revmig::console", "{message}");
    }

    fn progress(&self, message: &str) {
        tracing::info!(target: "revmig::console", progress = true, "{message}");
    }

    fn verbose(&self, message: &str) {
        tracing::debug!(target: "revmig::console", "{message}");
    }
}

/// Wraps a console and counts the errors sent through it
pub struct CountingConsole<'a> {
    delegate: &'a dyn Console,
    errors: AtomicUsize,
}

impl<'a> CountingConsole<'a> {
    /// Wrap a console
    #[inline]
    #[must_use]
    pub fn new(delegate: &'a dyn Console) -> Self {
        Self {
            delegate,
            errors: AtomicUsize::new(0),
        }
    }

    /// Errors recorded so far
    #[inline]
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for CountingConsole<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingConsole")
            .field("errors", &self.error_count())
            .finish_non_exhaustive()
    }
}

impl Console for CountingConsole<'_> {
    fn info(&self, message: &str) {
        self.delegate.info(message);
    }

    fn warn(&self, message: &str) {
        self.delegate.warn(message);
    }

    fn error(&self, message: &str) {
        self.delegate.error(message);
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn progress(&self, message: &str) {
        self.delegate.progress(message);
    }

    fn verbose(&self, message: &str) {
        self.delegate.verbose(message);
    }
}
