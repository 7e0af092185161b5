//! Binder results and errors.

use rune_diagnostic::Diagnostic;

/// Outcome of one binding step that did not fail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Progress {
    /// The expression now has a datatype.
    Done,
    /// The binding was attached to an event and will be retried when the
    /// event fires.
    Blocked,
    /// The statement's expression tree was rewritten; queue it again.
    Rebind,
}

/// Result of a binding rule. The first error ends the compilation.
pub(crate) type BindResult = Result<Progress, Diagnostic>;

/// Binding failed. Carries every diagnostic reported, in report order.
#[derive(Debug, Clone, thiserror::Error)]
#[error("type binding failed with {} error(s)", .diagnostics.len())]
pub struct BindErrors {
    pub diagnostics: Vec<Diagnostic>,
}

impl BindErrors {
    pub(crate) fn single(diagnostic: Diagnostic) -> Self {
        BindErrors {
            diagnostics: vec![diagnostic],
        }
    }

    /// The first reported diagnostic.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }
}
