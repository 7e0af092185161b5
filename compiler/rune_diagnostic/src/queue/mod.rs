//! Collecting the diagnostics of one bind.
//!
//! The queue keeps diagnostics in the order they were reported, drops
//! repeats of the same code, span and message, and stops accepting new
//! ones once the error limit is reached.

use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode};
use rune_ir::Span;

type DedupKey = (ErrorCode, Option<Span>, String);

#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<DedupKey>,
    /// Maximum number of diagnostics kept (0 = unlimited).
    error_limit: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(error_limit: usize) -> Self {
        DiagnosticQueue {
            error_limit,
            ..Self::default()
        }
    }

    /// Returns `false` if the diagnostic repeats an earlier one or the
    /// limit was already reached.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() {
            return false;
        }
        let key = (diag.code, diag.primary_span(), diag.message.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.diagnostics.push(diag);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.error_limit > 0 && self.diagnostics.len() >= self.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Take all diagnostics, leaving the queue empty.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.seen.clear();
        std::mem::take(&mut self.diagnostics)
    }
}
