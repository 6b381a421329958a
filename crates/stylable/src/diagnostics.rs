//! Soft diagnostics collected during a generation pass.
//!
//! A broken reference in one file must not block output for the rest of the
//! build, so the generator records the problem, emits best-effort CSS and
//! keeps going. The host decides what to do with the collected records.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An import points at a module path missing from the registry.
    UnknownModule,
    /// `-st-mixin` names a symbol that is neither a variant nor a JS mixin.
    UnknownMixin,
    /// A class used as a mixin is not marked `-st-variant: true`.
    NotAVariant,
    /// `-st-extends` names a symbol that no import binds.
    UnresolvedExtends,
    /// `::name` does not name a class of the current context sheet.
    UnknownPseudoElement,
    /// `value(name)` without a default and no such variable.
    UnknownVariable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Source path of the stylesheet being processed.
    pub source: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.source, self.message)
        }
    }
}

/// Caller-owned sink for soft diagnostics.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, source: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            source: source.to_string(),
        };
        log::warn!("{diagnostic}");
        self.records.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.records.iter().any(|d| d.kind == kind)
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.records)
    }
}
