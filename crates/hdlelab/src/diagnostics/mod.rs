//! Diagnostics collection for accumulating elaboration messages.
//!
//! Replaces the original elaborator's direct `cerr <<` calls with a
//! structured, testable collection, the way `plotnik-lib::diagnostics`
//! replaces ad hoc error printing in that crate.

mod message;


use crate::loc::SourceLoc;
pub use message::{DiagnosticKind, Severity};
use message::DiagnosticMessage;

/// Collection of diagnostics raised during scope elaboration and parameter
/// resolution. `error_count()` is the design-level counter spec.md refers
/// to as `des->errors`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for a diagnostic in progress; call `.at_scope()` to attach a
/// scope path, then `.emit()` to record it.
#[must_use = "diagnostic not recorded until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        loc: SourceLoc,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, message, loc),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn at_scope(mut self, path: impl Into<String>) -> Self {
        self.message.scope_path = Some(path.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

pub use message::DiagnosticMessage as Diagnostic;
