//! Thread-safe diagnostic accumulator for parallel file checking.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe accumulator for diagnostics emitted by per-file workers.
///
/// Multiple threads can emit diagnostics concurrently via [`emit`](Self::emit).
/// The error count is tracked atomically for fast `has_errors` checks without
/// locking the diagnostic vector. The sink may drop or reorder diagnostics
/// but never rewrites their location or message.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.lock().push(diag);
    }

    /// Emits every diagnostic from an iterator under a single lock.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        let mut guard = self.lock();
        for diag in diags {
            if diag.severity == Severity::Error {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            guard.push(diag);
        }
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics in emission order, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Takes all diagnostics sorted by (file, line, column, rule) with
    /// duplicates collapsed.
    ///
    /// Two diagnostics are duplicates when they share file, location, and
    /// rule; the first one emitted is kept.
    pub fn take_sorted(&self) -> Vec<Diagnostic> {
        let mut all = self.take_all();
        all.sort_by(|a, b| {
            (a.primary_span.file, a.location, &a.rule).cmp(&(
                b.primary_span.file,
                b.location,
                &b.rule,
            ))
        });
        all.dedup_by(|later, earlier| {
            later.primary_span.file == earlier.primary_span.file
                && later.location == earlier.location
                && later.rule == earlier.rule
        });
        all
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps only diagnostics at or above `min` severity.
pub fn filter_by_severity(diags: Vec<Diagnostic>, min: Severity) -> Vec<Diagnostic> {
    diags.into_iter().filter(|d| d.severity >= min).collect()
}
