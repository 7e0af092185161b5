//! [`Diagnostic`]: one binder failure, located by labeled spans.

use std::fmt;

use rune_ir::Span;

use crate::ErrorCode;

/// A span with a short explanation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A binder error.
///
/// The first label marks where binding failed. Notes carry context that
/// has no span of its own, such as the chain of calls that led to the
/// failing signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Where binding failed, if the diagnostic is located at all.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|label| label.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        for (index, label) in self.labels.iter().enumerate() {
            let marker = if index == 0 { "-->" } else { "   " };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

/// A name that no declaration or transformer ever defined.
pub fn undefined_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E5001)
        .with_message(format!("undefined identifier `{name}`"))
        .with_label(span, "never defined in this scope")
}

#[cfg(test)]
mod tests;
