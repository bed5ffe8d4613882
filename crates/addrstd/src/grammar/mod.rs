// Grammar: named rule sections mapping input-class sequences to output-class
// sequences with a score. Meta rules compose sections by reference.

pub mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use addrstd_core::classes::{InClass, OutClass};
use addrstd_core::diagnostic::Diagnostic;

use crate::LoadError;

/// Section the search starts from.
pub const ROOT_SECTION: &str = "ADDRESS";

/// Why a rule could not be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("meta rule has no section references")]
    EmptyMeta,
    #[error("invalid section reference {0:?}")]
    BadReference(String),
    #[error("concrete rule consumes no input")]
    EmptyConcrete,
    #[error("{input} input classes but {output} output classes")]
    LengthMismatch { input: usize, output: usize },
}

/// One grammar rule.
///
/// A meta rule is an ordered list of section names, all of which must match
/// in sequence. A concrete rule maps input classes position by position to
/// output classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Meta(Vec<String>),
    Concrete {
        input: Vec<InClass>,
        output: Vec<OutClass>,
        score: f64,
    },
}

/// Whether `name` is usable as a section name.
pub fn is_section_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl Rule {
    pub fn meta<S: Into<String>>(refs: impl IntoIterator<Item = S>) -> Result<Self, RuleError> {
        let refs: Vec<String> = refs.into_iter().map(Into::into).collect();
        if refs.is_empty() {
            return Err(RuleError::EmptyMeta);
        }
        if let Some(bad) = refs.iter().find(|r| !is_section_name(r)) {
            return Err(RuleError::BadReference(bad.clone()));
        }
        Ok(Rule::Meta(refs))
    }

    pub fn concrete(
        input: Vec<InClass>,
        output: Vec<OutClass>,
        score: f64,
    ) -> Result<Self, RuleError> {
        if input.len() != output.len() {
            return Err(RuleError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        if input.is_empty() {
            return Err(RuleError::EmptyConcrete);
        }
        Ok(Rule::Concrete {
            input,
            output,
            score,
        })
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Rule::Meta(_))
    }

    /// Input classes; empty for a meta rule.
    pub fn input(&self) -> &[InClass] {
        match self {
            Rule::Meta(_) => &[],
            Rule::Concrete { input, .. } => input,
        }
    }

    /// Output classes; empty for a meta rule.
    pub fn output(&self) -> &[OutClass] {
        match self {
            Rule::Meta(_) => &[],
            Rule::Concrete { output, .. } => output,
        }
    }

    /// Score; zero for a meta rule.
    pub fn score(&self) -> f64 {
        match self {
            Rule::Meta(_) => 0.0,
            Rule::Concrete { score, .. } => *score,
        }
    }

    /// Referenced section names; empty for a concrete rule.
    pub fn references(&self) -> &[String] {
        match self {
            Rule::Meta(refs) => refs,
            Rule::Concrete { .. } => &[],
        }
    }
}

impl fmt::Display for Rule {
    /// Writes the rule in grammar source syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Meta(refs) => {
                let parts: Vec<String> = refs.iter().map(|r| format!("@{r}")).collect();
                f.write_str(&parts.join(" "))
            }
            Rule::Concrete {
                input,
                output,
                score,
            } => {
                let input: Vec<&str> = input.iter().map(|c| c.as_str()).collect();
                let output: Vec<&str> = output.iter().map(|c| c.as_str()).collect();
                write!(f, "{} -> {} -> {score}", input.join(" "), output.join(" "))
            }
        }
    }
}

/// A named collection of rule sections.
///
/// Built once from source text and then shared read-only. Problems that did
/// not prevent loading are kept as diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    sections: BTreeMap<String, Vec<Rule>>,
    diagnostics: Vec<Diagnostic>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse grammar source text.
    ///
    /// Fails only when data appears before the first section header.
    pub fn from_text(text: &str) -> Result<Self, LoadError> {
        parser::parse(text)
    }

    /// Read and parse a grammar file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    /// Write the grammar back out as source text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (name, rules) in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{name}]\n"));
            for rule in rules {
                out.push_str(&rule.to_string());
                out.push('\n');
            }
        }
        out
    }

    /// Create the section if needed. Used while building.
    pub fn add_section(&mut self, name: impl Into<String>) -> &mut Vec<Rule> {
        self.sections.entry(name.into()).or_default()
    }

    /// Append a rule to a section, creating the section if needed.
    pub fn add_rule(&mut self, section: impl Into<String>, rule: Rule) {
        self.add_section(section).push(rule);
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Rules of a section in declaration order.
    pub fn section(&self, name: &str) -> Option<&[Rule]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn rule_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any rule was dropped while loading.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.is_error())
    }

    /// Whether two grammars hold the same sections and rules.
    pub fn same_rules(&self, other: &Grammar) -> bool {
        self.sections == other.sections
    }
}
