// Backtracking search of a class pattern against a rule grammar.
//
// `match_section` is a pure function of (section, cursor): it returns the new
// cursor and the concrete rules consumed, or None. Inside a section the first
// alternative that matches wins. The root is a section like any other, except
// that an alternative which stops short of the end of the pattern is skipped.

pub mod enumerate;

use addrstd_core::classes::{InClass, OutClass};

use crate::grammar::{Grammar, ROOT_SECTION, Rule};
pub use enumerate::{Pattern, combination_count, enumerate, enumerate_capped};

/// One complete parse of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse<'g> {
    pub pattern: Pattern,
    /// Concrete rules in the order they consumed the pattern.
    pub rules: Vec<&'g Rule>,
    /// Mean of the rule scores.
    pub score: f64,
}

impl<'g> Parse<'g> {
    fn new(pattern: &[InClass], rules: Vec<&'g Rule>) -> Self {
        let score = if rules.is_empty() {
            0.0
        } else {
            rules.iter().map(|r| r.score()).sum::<f64>() / rules.len() as f64
        };
        Self {
            pattern: pattern.to_vec(),
            rules,
            score,
        }
    }

    /// Output class of every pattern position, in order.
    pub fn outputs(&self) -> impl Iterator<Item = OutClass> + '_ {
        self.rules.iter().flat_map(|r| r.output().iter().copied())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Section name and cursor of every section being matched on the current
/// call chain.
type Active<'a> = Vec<(&'a str, usize)>;

/// Matches patterns against one grammar, starting from a root section.
#[derive(Debug, Clone, Copy)]
pub struct Search<'g> {
    grammar: &'g Grammar,
    root: &'g str,
}

impl<'g> Search<'g> {
    /// Search from the `ADDRESS` section.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_root(grammar, ROOT_SECTION)
    }

    pub fn with_root(grammar: &'g Grammar, root: &'g str) -> Self {
        Self { grammar, root }
    }

    /// Complete parses of `pattern`.
    ///
    /// Root alternatives are tried in declared order and the first one that
    /// consumes the whole pattern is the result, so there is at most one.
    pub fn search(&self, pattern: &[InClass]) -> Vec<Parse<'g>> {
        let Some(alternatives) = self.grammar.section(self.root) else {
            return Vec::new();
        };
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut active: Active<'g> = vec![(self.root, 0)];
        let parses: Vec<Parse<'g>> = alternatives
            .iter()
            .find_map(|rule| {
                let (end, rules) = self.match_rule(pattern, rule, 0, &mut active)?;
                (end == pattern.len()).then(|| Parse::new(pattern, rules))
            })
            .into_iter()
            .collect();
        tracing::debug!(?pattern, results = parses.len(), "pattern searched");
        parses
    }

    /// Best parse over all `patterns`.
    ///
    /// A later parse replaces the current best only with a strictly greater
    /// score, so the first parse found wins a tie.
    pub fn best<'p>(&self, patterns: impl IntoIterator<Item = &'p Pattern>) -> Option<Parse<'g>> {
        let mut best: Option<Parse<'g>> = None;
        for pattern in patterns {
            for parse in self.search(pattern) {
                if best.as_ref().is_none_or(|b| parse.score > b.score) {
                    best = Some(parse);
                }
            }
        }
        best
    }

    fn match_section(
        &self,
        pattern: &[InClass],
        name: &'g str,
        cursor: usize,
        active: &mut Active<'g>,
    ) -> Option<(usize, Vec<&'g Rule>)> {
        // Re-entering a section at the same position cannot make progress.
        if active.contains(&(name, cursor)) {
            return None;
        }
        let rules = self.grammar.section(name)?;
        active.push((name, cursor));
        let found = rules
            .iter()
            .find_map(|rule| self.match_rule(pattern, rule, cursor, active));
        active.pop();
        found
    }

    fn match_rule(
        &self,
        pattern: &[InClass],
        rule: &'g Rule,
        cursor: usize,
        active: &mut Active<'g>,
    ) -> Option<(usize, Vec<&'g Rule>)> {
        match rule {
            Rule::Meta(refs) => {
                let mut cursor = cursor;
                let mut consumed = Vec::new();
                for name in refs {
                    let (next, rules) = self.match_section(pattern, name, cursor, active)?;
                    cursor = next;
                    consumed.extend(rules);
                }
                Some((cursor, consumed))
            }
            Rule::Concrete { input, .. } => {
                let end = cursor + input.len();
                let window = pattern.get(cursor..end)?;
                let matches = window
                    .iter()
                    .zip(input)
                    .all(|(p, r)| p == r && *p != InClass::BadToken);
                matches.then(|| (end, vec![rule]))
            }
        }
    }
}
