// Expansion of ambiguous tokens into unambiguous class patterns.
//
// Combination index i is decoded in mixed radix over the per-token candidate
// counts, last token varying fastest, so the combinations are produced in
// lexicographic order of their class ordinals.

use std::collections::BTreeSet;

use addrstd_core::classes::InClass;
use addrstd_core::token::Token;

/// One class per token.
pub type Pattern = Vec<InClass>;

/// Candidate classes of each token, in ordinal order. A token without
/// candidates counts as BADTOKEN.
fn choices(tokens: &[Token]) -> Vec<Vec<InClass>> {
    tokens
        .iter()
        .map(|t| {
            if t.in_classes.is_empty() {
                vec![InClass::BadToken]
            } else {
                t.in_classes.iter().copied().collect()
            }
        })
        .collect()
}

/// Number of class combinations for `tokens`, saturating at `usize::MAX`.
pub fn combination_count(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|t| t.in_classes.len().max(1))
        .fold(1usize, usize::saturating_mul)
}

/// All class patterns for `tokens`. An empty token list has none.
pub fn enumerate(tokens: &[Token]) -> BTreeSet<Pattern> {
    enumerate_capped(tokens, usize::MAX)
}

/// Like [`enumerate`], but examines at most `max` combinations.
pub fn enumerate_capped(tokens: &[Token], max: usize) -> BTreeSet<Pattern> {
    if tokens.is_empty() {
        return BTreeSet::new();
    }
    let choices = choices(tokens);
    let total = combination_count(tokens);
    let limit = total.min(max);
    if limit < total {
        tracing::warn!(total, limit, "too many class combinations, truncating");
    }

    let mut patterns = BTreeSet::new();
    for i in 0..limit {
        let mut rem = i;
        let mut pattern = vec![InClass::BadToken; choices.len()];
        for (slot, options) in pattern.iter_mut().zip(&choices).rev() {
            *slot = options[rem % options.len()];
            rem /= options.len();
        }
        patterns.insert(pattern);
    }
    patterns
}
