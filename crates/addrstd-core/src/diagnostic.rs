// Definition diagnostics: problems found while loading a grammar or lexicon
// that leave the loaded object usable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of definition problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A meta reference that is not `@NAME`.
    BadMetaReference,
    /// A concrete rule whose input and output lists differ in length.
    LengthMismatch,
    /// A class name that is not part of the taxonomy.
    UnknownClass,
    /// A score that is not a number.
    BadScore,
    /// A line that is neither a meta rule nor `... -> ... -> score`.
    MalformedRule,
    /// A meta rule references a section that does not exist.
    UndefinedSection,
    /// The grammar has no root section.
    MissingRoot,
    /// A section header with no valid rules under it.
    EmptySection,
    /// A lexicon line that is not a valid entry record.
    MalformedEntry,
}

impl DiagnosticKind {
    /// Whether the problem made the loader drop a rule or entry.
    pub fn is_error(self) -> bool {
        !matches!(
            self,
            DiagnosticKind::UndefinedSection
                | DiagnosticKind::MissingRoot
                | DiagnosticKind::EmptySection
        )
    }
}

/// A problem in a definition source, attached to the loaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based source line, or 0 when the problem is not tied to a line.
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.kind.is_error() { "error" } else { "warning" };
        if self.line > 0 {
            write!(f, "line {}: {level}: {}", self.line, self.message)
        } else {
            write!(f, "{level}: {}", self.message)
        }
    }
}
