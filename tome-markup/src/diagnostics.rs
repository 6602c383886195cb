//! Diagnostics collected while rendering
//!
//! Every recoverable problem becomes a [`Diagnostic`]. The sink keeps them for the caller and
//! forwards each one to the `log` facade as it arrives.

use serde::Serialize;
use std::fmt;

use crate::error::{ContextError, MarkupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    /// Authoring or programming errors. Rendering continues, validation should fail.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    MismatchedBrace,
    UnclosedBrace,
    UnknownTag,
    BadTagFormat,
    MalformedAdmonition,
    UnbalancedPop,
    UnresolvedCitations,
    CitationWithoutFrame,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::UnbalancedPop | DiagnosticKind::UnresolvedCitations => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}", self.message)
    }
}

impl From<ContextError> for Diagnostic {
    fn from(err: ContextError) -> Self {
        let kind = match &err {
            ContextError::UnbalancedPop => DiagnosticKind::UnbalancedPop,
            ContextError::UnresolvedCitations(_) => DiagnosticKind::UnresolvedCitations,
            ContextError::NoActiveFrame(_) => DiagnosticKind::CitationWithoutFrame,
        };
        Diagnostic::new(kind, err.to_string())
    }
}

impl From<MarkupError> for Diagnostic {
    fn from(err: MarkupError) -> Self {
        match err {
            MarkupError::MalformedAdmonition(_) => {
                Diagnostic::new(DiagnosticKind::MalformedAdmonition, err.to_string())
            }
        }
    }
}

/// Collecting sink for diagnostics
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to the log facade.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Error => log::error!("{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report(Diagnostic::new(kind, message));
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
