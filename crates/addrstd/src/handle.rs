// Standardizer: top-level handle tying lexicon, grammar and options together.
//
// The handle owns shared, read-only definitions and creates a Tokenizer and
// a Search on the fly in each call, so one handle can serve many threads.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use addrstd_core::classes::{InClass, OutClass};
use addrstd_core::token::Token;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::LoadError;
use crate::assembler::{self, StdAddr};
use crate::grammar::{Grammar, ROOT_SECTION};
use crate::lexicon::Lexicon;
use crate::search::{Parse, Search, enumerate_capped};
use crate::tokenizer::{Tokenizer, default_filter};

/// Error type for Standardizer construction failures.
#[derive(Debug, thiserror::Error)]
pub enum StandardizeError {
    /// A definition could not be read, parsed or compiled.
    #[error("failed to load definitions: {0}")]
    Load(#[from] LoadError),

    /// The grammar has no section to start the search from.
    #[error("grammar has no [{0}] section")]
    MissingRoot(String),
}

/// Options for one Standardizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizerOptions {
    /// Token classes dropped before enumeration.
    pub filter: BTreeSet<InClass>,

    /// Upper bound on class combinations examined per address.
    pub max_patterns: usize,

    /// Class for words that neither the lexicon nor a shape rule knows.
    pub default_class: InClass,

    /// Grammar section the search starts from.
    pub root_section: String,
}

impl Default for StandardizerOptions {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            max_patterns: 4096,
            default_class: InClass::BadToken,
            root_section: ROOT_SECTION.to_string(),
        }
    }
}

/// Prepares raw input for scanning.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// NFKC normalization followed by Unicode upper-casing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeUpper;

impl TextNormalizer for UnicodeUpper {
    fn normalize(&self, text: &str) -> String {
        text.nfkc().collect::<String>().to_uppercase()
    }
}

/// Best pattern found for an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub pattern: Vec<InClass>,
    pub output: Vec<OutClass>,
    pub score: f64,
    pub rule_count: usize,
}

impl From<&Parse<'_>> for MatchResult {
    fn from(parse: &Parse<'_>) -> Self {
        Self {
            pattern: parse.pattern.clone(),
            output: parse.outputs().collect(),
            score: parse.score,
            rule_count: parse.rule_count(),
        }
    }
}

/// Lexicon text with its regex fragments precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledLexicon {
    pub text: String,
    pub regex: String,
    pub regex_prefix: String,
    pub regex_suffix: String,
}

impl CompiledLexicon {
    /// Rebuild the lexicon, reusing the stored fragments.
    pub fn load(&self) -> Result<Lexicon, LoadError> {
        let lexicon = Lexicon::from_text(&self.text)?;
        lexicon.preload_fragments(&self.regex, &self.regex_prefix, &self.regex_suffix);
        Ok(lexicon)
    }
}

/// Parse lexicon text, check that its words compile into a scanner, and
/// return it in canonical form with the regex fragments.
pub fn compile_lexicon(text: &str) -> Result<CompiledLexicon, LoadError> {
    let lexicon = Lexicon::from_text(text)?;
    lexicon.scanner()?;
    Ok(CompiledLexicon {
        text: lexicon.to_text(),
        regex: lexicon.regex().to_string(),
        regex_prefix: lexicon.regex_prefix_attached().to_string(),
        regex_suffix: lexicon.regex_suffix_attached().to_string(),
    })
}

/// Address standardizer over one lexicon and one grammar.
#[derive(Clone)]
pub struct Standardizer {
    lexicon: Arc<Lexicon>,
    grammar: Arc<Grammar>,
    options: StandardizerOptions,
    normalizer: Arc<dyn TextNormalizer>,
}

impl fmt::Debug for Standardizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Standardizer")
            .field("lexicon", &self.lexicon.name())
            .field("grammar_rules", &self.grammar.rule_count())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Standardizer {
    /// Create a standardizer with default options.
    pub fn new(lexicon: Arc<Lexicon>, grammar: Arc<Grammar>) -> Result<Self, StandardizeError> {
        Self::with_options(lexicon, grammar, StandardizerOptions::default())
    }

    /// Create a standardizer, compiling the lexicon scanner up front.
    pub fn with_options(
        lexicon: Arc<Lexicon>,
        grammar: Arc<Grammar>,
        options: StandardizerOptions,
    ) -> Result<Self, StandardizeError> {
        check_root(&grammar, &options)?;
        lexicon.scanner()?;
        tracing::debug!(
            lexicon = lexicon.name(),
            words = lexicon.words().len(),
            rules = grammar.rule_count(),
            "standardizer ready"
        );
        Ok(Self {
            lexicon,
            grammar,
            options,
            normalizer: Arc::new(UnicodeUpper),
        })
    }

    /// Load both definitions from source text.
    pub fn from_text(lexicon: &str, grammar: &str) -> Result<Self, StandardizeError> {
        Self::new(
            Arc::new(Lexicon::from_text(lexicon)?),
            Arc::new(Grammar::from_text(grammar)?),
        )
    }

    /// Replace the input normalizer.
    pub fn with_normalizer(mut self, normalizer: impl TextNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn options(&self) -> &StandardizerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: StandardizerOptions) -> Result<(), StandardizeError> {
        check_root(&self.grammar, &options)?;
        self.options = options;
        Ok(())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Normalized, classified and filtered tokens of `address`.
    pub fn parse(&self, address: &str) -> Vec<Token> {
        let text = self.normalizer.normalize(address);
        match Tokenizer::new(&self.lexicon) {
            Ok(tokenizer) => {
                let mut tokenizer = tokenizer.with_default_class(self.options.default_class);
                tokenizer.set_filter(self.options.filter.clone());
                tokenizer.get_tokens(&text)
            }
            Err(e) => {
                // The scanner compiled in the constructor and is cached.
                tracing::error!(%e, "lexicon scanner unavailable");
                Vec::new()
            }
        }
    }

    fn best_parse(&self, tokens: &[Token]) -> Option<Parse<'_>> {
        let patterns = enumerate_capped(tokens, self.options.max_patterns);
        Search::with_root(&self.grammar, &self.options.root_section).best(&patterns)
    }

    /// Best-scoring pattern for `address`, or `None` if nothing parses.
    pub fn match_address(&self, address: &str) -> Option<MatchResult> {
        let tokens = self.parse(address);
        self.best_parse(&tokens).map(|p| MatchResult::from(&p))
    }

    /// Standardize `address`, or `None` if no parse consumes all of it.
    pub fn standardize(&self, address: &str) -> Option<StdAddr> {
        let mut tokens = self.parse(address);
        let Some(parse) = self.best_parse(&tokens) else {
            tracing::debug!(address, "no standardization found");
            return None;
        };
        tracing::debug!(address, score = parse.score, rules = parse.rule_count(), "best parse");
        if !assembler::assign(&mut tokens, &parse, &self.lexicon) {
            return None;
        }
        let addr = assembler::assemble(&tokens)?;
        tracing::debug!(address, %addr, "standardized");
        Some(addr)
    }
}

fn check_root(grammar: &Grammar, options: &StandardizerOptions) -> Result<(), StandardizeError> {
    if grammar.has_section(&options.root_section) {
        Ok(())
    } else {
        Err(StandardizeError::MissingRoot(options.root_section.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "LEXICON:\tus\tEN\ten_US\t6\n\
        LEXENTRY:\tAK\tAK\tPROV\t\n\
        LEXENTRY:\tAL\tAL\tPROV\t\n\
        LEXENTRY:\tALLEE\tALY\tTYPE\tSUFFIX\n\
        LEXENTRY:\tALLEY\tALY\tTYPE\tSUFFIX\n\
        LEXENTRY:\tALLY\tALY\tTYPE\tSUFFIX\n\
        LEXENTRY:\tST\tSAINT\tQUALIF\t\n";

    const GRAMMAR: &str = "\
[ADDRESS]
@HOUSE @STREET @PLACE

[HOUSE]
NUMBER -> HOUSE -> 1.0

[STREET]
WORD TYPE -> STREET SUFTYP -> 0.9
WORD -> STREET -> 0.5

[PLACE]
WORD PROV NUMBER -> CITY PROV POSTAL -> 0.8
";

    fn standardizer() -> Standardizer {
        Standardizer::from_text(LEXICON, GRAMMAR).unwrap()
    }

    #[test]
    fn standardizes_simple_address() {
        let addr = standardizer()
            .standardize("11 Dackon Allee Podunk AL 12345")
            .unwrap();
        assert_eq!(addr.house_num.as_deref(), Some("11"));
        assert_eq!(addr.name.as_deref(), Some("DACKON"));
        assert_eq!(addr.suftype.as_deref(), Some("ALY"));
        assert_eq!(addr.city.as_deref(), Some("PODUNK"));
        assert_eq!(addr.prov.as_deref(), Some("AL"));
        assert_eq!(addr.postcode.as_deref(), Some("12345"));
    }

    #[test]
    fn unparsable_address_gives_none() {
        let s = standardizer();
        assert_eq!(s.standardize("Podunk"), None);
        assert_eq!(s.standardize(""), None);
        assert!(s.match_address("Podunk").is_none());
    }

    #[test]
    fn match_reports_pattern_and_score() {
        let m = standardizer().match_address("11 Dackon Allee Podunk AL 12345").unwrap();
        assert_eq!(
            m.pattern,
            vec![
                InClass::Number,
                InClass::Word,
                InClass::Type,
                InClass::Word,
                InClass::Prov,
                InClass::Number
            ]
        );
        assert_eq!(m.rule_count, 3);
        assert!((m.score - 0.9).abs() < 1e-9);
        assert_eq!(m.output[0], OutClass::House);
    }

    #[test]
    fn parse_normalizes_input() {
        let tokens = standardizer().parse("ｓｔ  allee");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["ST", "ALLEE"]);
        assert_eq!(tokens[0].std_text, "SAINT");
    }

    #[test]
    fn missing_root_is_rejected() {
        let lexicon = Arc::new(Lexicon::from_text(LEXICON).unwrap());
        let grammar = Arc::new(Grammar::from_text("[STREET]\nWORD -> STREET -> 1\n").unwrap());
        let err = Standardizer::new(lexicon.clone(), grammar.clone()).unwrap_err();
        assert!(matches!(err, StandardizeError::MissingRoot(ref r) if r == "ADDRESS"));

        let options = StandardizerOptions {
            root_section: "STREET".into(),
            ..StandardizerOptions::default()
        };
        let s = Standardizer::with_options(lexicon, grammar, options).unwrap();
        assert_eq!(s.standardize("main").unwrap().name.as_deref(), Some("MAIN"));
    }

    #[test]
    fn set_options_checks_root() {
        let mut s = standardizer();
        let bad = StandardizerOptions {
            root_section: "NOPE".into(),
            ..StandardizerOptions::default()
        };
        assert!(s.set_options(bad).is_err());
        assert_eq!(s.options().root_section, ROOT_SECTION);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: StandardizerOptions =
            serde_json::from_str(r#"{"filter": ["PUNCT"], "max_patterns": 16}"#).unwrap();
        assert_eq!(options.filter, BTreeSet::from([InClass::Punct]));
        assert_eq!(options.max_patterns, 16);
        assert_eq!(options.default_class, InClass::BadToken);
        assert_eq!(options.root_section, "ADDRESS");
    }

    #[test]
    fn custom_normalizer() {
        struct Identity;
        impl TextNormalizer for Identity {
            fn normalize(&self, text: &str) -> String {
                text.to_string()
            }
        }
        let s = standardizer().with_normalizer(Identity);
        let tokens = s.parse("allee");
        assert_eq!(tokens[0].text, "allee");
        assert!(tokens[0].has_class(InClass::Type));
    }

    #[test]
    fn compiled_lexicon_round_trip() {
        let compiled = compile_lexicon(LEXICON).unwrap();
        assert_eq!(compiled.regex_suffix, "ALL(?:E[EY]|Y)");
        assert_eq!(compiled.regex_prefix, "");
        let lexicon = compiled.load().unwrap();
        assert_eq!(lexicon.regex(), compiled.regex);
        assert_eq!(lexicon.to_text(), compiled.text);
        assert_eq!(compile_lexicon(&compiled.text).unwrap(), compiled);
    }

    #[test]
    fn handle_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Standardizer>();
    }
}
