//! Diagnostics produced by the Rune type binder.
//!
//! Every binder failure becomes a [`Diagnostic`]:
//! - an [`ErrorCode`] whose first digit names the failing area
//! - a message saying what went wrong
//! - a primary label at the offending expression
//! - notes such as the call path to the failing signature
//!
//! [`DiagnosticQueue`] gathers the unresolved-event reports at the end of
//! a bind, in report order and up to the configured limit.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{undefined_identifier, Diagnostic, Label};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
