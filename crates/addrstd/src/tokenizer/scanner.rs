// Compiled scanning regexes for one lexicon.
//
// The main scanner matches, at the start of the remaining input, either a
// word followed by a separator (or end of input), or a lone separator:
//
//   ^(?:(?P<word>LEXICON|\p{N}+|\p{L}+|\w+)(?P<sep>SEP|$)|(?P<lead>SEP))
//
// Lexicon words come first so a multi-word or punctuated lexicon entry wins
// over the generic shapes. A word directly followed by a character that is
// neither a word character nor a separator is picked up by `word_only`.
// Matching is case-insensitive.

use regex::{Regex, RegexBuilder};

use crate::lexicon::Lexicon;

/// Separator alternatives: a whitespace run or one punctuation/symbol char.
const SEPARATOR: &str = r"\s+|[\p{P}\p{S}]";

/// Generic word shapes tried after the lexicon words.
const WORD_SHAPES: &str = r"\p{N}+|\p{L}+|\w+";

/// Upper bound on compiled regex size; large lexicons need more than the
/// regex crate default.
const SIZE_LIMIT: usize = 64 * (1 << 20);

/// Smallest stem left over when an attached affix is split off.
const MIN_STEM: usize = 2;

#[derive(Debug)]
pub struct Scanner {
    pub(crate) main: Regex,
    pub(crate) word_only: Regex,
    /// `^(affix)(stem)$` for words glued to a following word.
    pub(crate) prefix_split: Option<Regex>,
    /// `^(stem)(affix)$` for words glued to a preceding word.
    pub(crate) suffix_split: Option<Regex>,
}

fn build_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(SIZE_LIMIT)
        .build()
}

impl Scanner {
    pub(crate) fn build(lexicon: &Lexicon) -> Result<Self, regex::Error> {
        let lex = lexicon.regex();
        let words = if lex.is_empty() {
            WORD_SHAPES.to_string()
        } else {
            format!("(?:{lex})|{WORD_SHAPES}")
        };
        let main = build_regex(&format!(
            r"^(?:(?P<word>{words})(?P<sep>{SEPARATOR}|$)|(?P<lead>{SEPARATOR}))"
        ))?;
        let word_only = build_regex(r"^\w+")?;

        let prefix = lexicon.regex_prefix_attached();
        let prefix_split = if prefix.is_empty() {
            None
        } else {
            Some(build_regex(&format!(r"^(?P<affix>{prefix})(?P<stem>\p{{L}}{{{MIN_STEM},}})$"))?)
        };

        let suffix = lexicon.regex_suffix_attached();
        let suffix_split = if suffix.is_empty() {
            None
        } else {
            Some(build_regex(&format!(r"^(?P<stem>\p{{L}}{{{MIN_STEM},}}?)(?P<affix>{suffix})$"))?)
        };

        tracing::debug!(
            lexicon = lexicon.name(),
            pattern_len = lex.len(),
            "compiled tokenizer scanner"
        );
        Ok(Self {
            main,
            word_only,
            prefix_split,
            suffix_split,
        })
    }
}
