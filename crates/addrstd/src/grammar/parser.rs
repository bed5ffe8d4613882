// Grammar source parser.
//
// Format:
//   # comment
//   [SECTION]
//   @OTHER @SECTIONS          meta rule (also accepted: @OTHER@SECTIONS)
//   CLS CLS -> CLS CLS -> 0.5 concrete rule
//
// Only data before the first section header is fatal. Every other problem
// drops the offending line and is recorded as a diagnostic.

use addrstd_core::classes::{InClass, OutClass};
use addrstd_core::diagnostic::{Diagnostic, DiagnosticKind};

use super::{Grammar, ROOT_SECTION, Rule, RuleError, is_section_name};
use crate::LoadError;

/// Parse grammar source text into a [`Grammar`].
pub(crate) fn parse(text: &str) -> Result<Grammar, LoadError> {
    let mut grammar = Grammar::new();
    let mut current: Option<String> = None;
    // (line, reference) for the undefined-section check.
    let mut references: Vec<(usize, String)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(line) {
            if is_section_name(name) {
                grammar.add_section(name);
                current = Some(name.to_string());
            } else {
                grammar.push_diagnostic(Diagnostic::new(
                    line_no,
                    DiagnosticKind::MalformedRule,
                    format!("invalid section name {name:?}"),
                ));
                // Rules under a bad header have nowhere to go.
                current = None;
            }
            continue;
        }

        let Some(section) = current.as_deref() else {
            if grammar.sections().next().is_none() {
                return Err(LoadError::DataOutsideSection {
                    line: line_no,
                    text: line.to_string(),
                });
            }
            grammar.push_diagnostic(Diagnostic::new(
                line_no,
                DiagnosticKind::MalformedRule,
                "rule under an invalid section header",
            ));
            continue;
        };

        match parse_rule(line) {
            Ok(rule) => {
                for r in rule.references() {
                    references.push((line_no, r.clone()));
                }
                grammar.add_rule(section, rule);
            }
            Err(d) => grammar.push_diagnostic(Diagnostic::new(line_no, d.0, d.1)),
        }
    }

    for (line_no, name) in references {
        if !grammar.has_section(&name) {
            grammar.push_diagnostic(Diagnostic::new(
                line_no,
                DiagnosticKind::UndefinedSection,
                format!("reference to undefined section @{name}"),
            ));
        }
    }
    let empty: Vec<String> = grammar
        .sections()
        .filter(|(_, rules)| rules.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();
    for name in empty {
        grammar.push_diagnostic(Diagnostic::new(
            0,
            DiagnosticKind::EmptySection,
            format!("section [{name}] has no valid rules"),
        ));
    }
    if !grammar.has_section(ROOT_SECTION) {
        grammar.push_diagnostic(Diagnostic::new(
            0,
            DiagnosticKind::MissingRoot,
            format!("no [{ROOT_SECTION}] section"),
        ));
    }

    for d in grammar.diagnostics() {
        tracing::warn!(%d, "grammar definition problem");
    }
    tracing::debug!(
        sections = grammar.sections().count(),
        rules = grammar.rule_count(),
        "grammar loaded"
    );
    Ok(grammar)
}

/// Return the name inside `[...]`, if `line` is a section header.
fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

type RuleFailure = (DiagnosticKind, String);

fn rule_failure(err: RuleError) -> RuleFailure {
    let kind = match err {
        RuleError::LengthMismatch { .. } => DiagnosticKind::LengthMismatch,
        RuleError::BadReference(_) | RuleError::EmptyMeta => DiagnosticKind::BadMetaReference,
        RuleError::EmptyConcrete => DiagnosticKind::MalformedRule,
    };
    (kind, err.to_string())
}

/// Parse one rule line.
fn parse_rule(line: &str) -> Result<Rule, RuleFailure> {
    if line.starts_with('@') {
        return parse_meta(line);
    }

    let parts: Vec<&str> = line.split("->").collect();
    if parts.len() != 3 {
        return Err((
            DiagnosticKind::MalformedRule,
            format!("expected `INPUT -> OUTPUT -> SCORE`, got {line:?}"),
        ));
    }

    let input = parse_classes::<InClass>(parts[0])?;
    let output = parse_classes::<OutClass>(parts[1])?;
    let score_text = parts[2].trim();
    let score: f64 = score_text
        .parse()
        .ok()
        .filter(|s: &f64| s.is_finite())
        .ok_or_else(|| (DiagnosticKind::BadScore, format!("invalid score {score_text:?}")))?;

    Rule::concrete(input, output, score).map_err(rule_failure)
}

fn parse_meta(line: &str) -> Result<Rule, RuleFailure> {
    let mut refs = Vec::new();
    for word in line.split_whitespace() {
        let Some(body) = word.strip_prefix('@') else {
            return Err((
                DiagnosticKind::BadMetaReference,
                format!("{word:?} is not a @NAME reference"),
            ));
        };
        for name in body.split('@') {
            if !is_section_name(name) {
                return Err((
                    DiagnosticKind::BadMetaReference,
                    format!("invalid section reference @{name} in {word:?}"),
                ));
            }
            refs.push(name.to_string());
        }
    }
    Rule::meta(refs).map_err(rule_failure)
}

fn parse_classes<T>(list: &str) -> Result<Vec<T>, RuleFailure>
where
    T: std::str::FromStr<Err = addrstd_core::RecordError>,
{
    list.split_whitespace()
        .map(|name| {
            name.parse()
                .map_err(|e: addrstd_core::RecordError| (DiagnosticKind::UnknownClass, e.to_string()))
        })
        .collect()
}
