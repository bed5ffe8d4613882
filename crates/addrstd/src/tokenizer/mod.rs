// Tokenizer: scans address text into classified tokens.
//
// A Tokenizer borrows its lexicon and the scanner compiled for it, so it is
// cheap to create per call. Words are classified through the lexicon (with
// shape rules as fallback), separators become PUNCT unless the lexicon knows
// them, and tokens whose classes intersect the filter are not emitted.

pub(crate) mod scanner;

use std::collections::BTreeSet;

use addrstd_core::RecordError;
use addrstd_core::classes::{AttachType, InClass, parse_set};
use addrstd_core::token::Token;

use crate::LoadError;
use crate::lexicon::Lexicon;
use scanner::Scanner;

/// Classes dropped from the token stream unless the caller says otherwise.
pub const DEFAULT_FILTER: [InClass; 4] =
    [InClass::Punct, InClass::Space, InClass::Dash, InClass::EmDash];

pub fn default_filter() -> BTreeSet<InClass> {
    BTreeSet::from(DEFAULT_FILTER)
}

/// Scans text against one lexicon.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    lexicon: &'a Lexicon,
    scanner: &'a Scanner,
    filter: BTreeSet<InClass>,
    default_class: InClass,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with the default filter.
    ///
    /// Compiles the lexicon's scanner on first use; fails only if the
    /// lexicon words do not form a valid pattern.
    pub fn new(lexicon: &'a Lexicon) -> Result<Self, LoadError> {
        Ok(Self {
            lexicon,
            scanner: lexicon.scanner()?,
            filter: default_filter(),
            default_class: InClass::BadToken,
        })
    }

    /// Class given to words that neither the lexicon nor a shape rule knows.
    pub fn with_default_class(mut self, class: InClass) -> Self {
        self.default_class = class;
        self
    }

    pub fn add_filter(&mut self, class: InClass) {
        self.filter.insert(class);
    }

    /// Stop filtering `class`. No-op if it was not filtered.
    pub fn remove_filter(&mut self, class: InClass) {
        self.filter.remove(&class);
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    pub fn filter(&self) -> &BTreeSet<InClass> {
        &self.filter
    }

    /// Replace the filter, e.g. to restore one saved with [`Self::filter`].
    pub fn set_filter(&mut self, filter: BTreeSet<InClass>) {
        self.filter = filter;
    }

    /// Replace the filter from a comma-separated class list.
    ///
    /// An unknown name rejects the list and leaves the filter unchanged.
    pub fn set_filter_str(&mut self, list: &str) -> Result<(), RecordError> {
        self.filter = parse_set(list)?;
        Ok(())
    }

    /// Scan `text` into tokens, in input order.
    pub fn get_tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(caps) = self.scanner.main.captures(rest) {
                if let Some(word) = caps.name("word") {
                    self.push_word(word.as_str(), &mut tokens);
                }
                if let Some(sep) = caps.name("sep").or_else(|| caps.name("lead")) {
                    if !sep.is_empty() {
                        self.emit(self.separator(sep.as_str()), &mut tokens);
                    }
                }
                let end = caps.get(0).map_or(0, |m| m.end());
                if end > 0 {
                    rest = &rest[end..];
                    continue;
                }
            }

            if let Some(word) = self.scanner.word_only.find(rest) {
                self.push_word(word.as_str(), &mut tokens);
                rest = &rest[word.end()..];
                continue;
            }

            // Nothing scans here: give up on one character.
            let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
            tracing::debug!(text = &rest[..len], "unscannable character");
            self.emit(Token::with_class(&rest[..len], InClass::BadToken), &mut tokens);
            rest = &rest[len..];
        }

        tracing::debug!(input = text, tokens = tokens.len(), "tokenized");
        tokens
    }

    fn emit(&self, token: Token, out: &mut Vec<Token>) {
        if !token.intersects(&self.filter) {
            out.push(token);
        }
    }

    fn push_word(&self, word: &str, out: &mut Vec<Token>) {
        match self.split_attached(word) {
            Some(parts) => {
                for (text, attach) in parts {
                    self.emit(self.classified(text, attach), out);
                }
            }
            None => self.emit(self.classified(word, AttachType::Detach), out),
        }
    }

    /// Split a word the lexicon does not know into stem and attached affix.
    fn split_attached<'t>(&self, word: &'t str) -> Option<[(&'t str, AttachType); 2]> {
        if !self.lexicon.find(word).is_empty() {
            return None;
        }
        if let Some(caps) = self.scanner.suffix_split.as_ref().and_then(|re| re.captures(word)) {
            return Some([
                (caps.name("stem")?.as_str(), AttachType::Detach),
                (caps.name("affix")?.as_str(), AttachType::Suffix),
            ]);
        }
        let caps = self.scanner.prefix_split.as_ref()?.captures(word)?;
        Some([
            (caps.name("affix")?.as_str(), AttachType::Prefix),
            (caps.name("stem")?.as_str(), AttachType::Detach),
        ])
    }

    fn classified(&self, text: &str, attach: AttachType) -> Token {
        let mut token = Token::new(text);
        token.attach = attach;
        self.lexicon.classify(&mut token, self.default_class);
        token
    }

    fn separator(&self, text: &str) -> Token {
        if self.lexicon.find(text).is_empty() {
            Token::with_class(text, InClass::Punct)
        } else {
            self.classified(text, AttachType::Detach)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrstd_core::lexentry::LexEntry;

    fn scenario_lexicon() -> Lexicon {
        let mut lex = Lexicon::new("test", "EN", "en_US");
        lex.insert(LexEntry::new("AK", "AK", [InClass::Prov], []));
        lex.insert(LexEntry::new("AL", "AL", [InClass::Prov], []));
        for w in ["ALLEE", "ALLEY", "ALLY"] {
            lex.insert(LexEntry::new(w, "ALY", [InClass::Type], [AttachType::Suffix]));
        }
        lex
    }

    fn classes(tokens: &[Token]) -> Vec<Vec<InClass>> {
        tokens
            .iter()
            .map(|t| t.in_classes.iter().copied().collect())
            .collect()
    }

    #[test]
    fn scenario_address_without_filter() {
        use InClass::*;
        let lex = scenario_lexicon();
        let mut tok = Tokenizer::new(&lex).unwrap();
        tok.clear_filter();
        let tokens = tok.get_tokens("11 Dackon Allee Podunk AL 12345");
        assert_eq!(
            classes(&tokens),
            vec![
                vec![Number],
                vec![Punct],
                vec![Word],
                vec![Punct],
                vec![Type],
                vec![Punct],
                vec![Word],
                vec![Punct],
                vec![Prov],
                vec![Punct],
                vec![Number, Quint],
            ]
        );
        assert_eq!(tokens[1].text, " ");
        assert_eq!(tokens[4].std_text, "ALY");
    }

    #[test]
    fn scenario_address_with_punct_filter() {
        use InClass::*;
        let lex = scenario_lexicon();
        let mut tok = Tokenizer::new(&lex).unwrap();
        tok.set_filter(BTreeSet::from([Punct]));
        let tokens = tok.get_tokens("11 Dackon Allee Podunk AL 12345");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["11", "Dackon", "Allee", "Podunk", "AL", "12345"]);
        assert_eq!(
            classes(&tokens),
            vec![vec![Number], vec![Word], vec![Type], vec![Word], vec![Prov], vec![Number, Quint]]
        );
    }

    #[test]
    fn default_filter_drops_separators() {
        let lex = scenario_lexicon();
        let tok = Tokenizer::new(&lex).unwrap();
        assert_eq!(tok.filter(), &default_filter());
        let tokens = tok.get_tokens("12, MAIN - AL");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["12", "MAIN", "AL"]);
    }

    #[test]
    fn empty_input() {
        let lex = scenario_lexicon();
        let tok = Tokenizer::new(&lex).unwrap();
        assert!(tok.get_tokens("").is_empty());
    }

    #[test]
    fn lexicon_prefix_does_not_split_longer_words() {
        let lex = scenario_lexicon();
        let tok = Tokenizer::new(&lex).unwrap();
        let tokens = tok.get_tokens("ALABAMA");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "ALABAMA");
        assert!(tokens[0].has_class(InClass::Word));
    }

    #[test]
    fn suffix_attached_word_is_split_off() {
        let lex = scenario_lexicon();
        let tok = Tokenizer::new(&lex).unwrap();
        let tokens = tok.get_tokens("MAINALLEE");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "MAIN");
        assert_eq!(tokens[0].attach, AttachType::Detach);
        assert_eq!(tokens[1].text, "ALLEE");
        assert_eq!(tokens[1].attach, AttachType::Suffix);
        assert!(tokens[1].has_class(InClass::Type));
    }

    #[test]
    fn short_stems_are_not_split() {
        let lex = scenario_lexicon();
        let tok = Tokenizer::new(&lex).unwrap();
        let tokens = tok.get_tokens("VALLEY");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].has_class(InClass::Word));
    }

    #[test]
    fn prefix_attached_word_is_split_off() {
        let mut lex = scenario_lexicon();
        lex.insert(LexEntry::new("RUE", "RUE", [InClass::Type], [AttachType::Prefix]));
        let tok = Tokenizer::new(&lex).unwrap();
        let tokens = tok.get_tokens("RUEMAIN");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["RUE", "MAIN"]);
        assert_eq!(tokens[0].attach, AttachType::Prefix);
    }

    #[test]
    fn known_separator_takes_lexicon_classes() {
        let mut lex = scenario_lexicon();
        lex.insert(LexEntry::new("&", "AND", [InClass::Ampers], []));
        let mut tok = Tokenizer::new(&lex).unwrap();
        tok.clear_filter();
        let tokens = tok.get_tokens("A&B");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[1].has_class(InClass::Ampers));
        assert!(!tokens[1].has_class(InClass::Punct));
        assert_eq!(tokens[1].std_text, "AND");
    }

    #[test]
    fn mixed_and_unscannable_text() {
        let lex = scenario_lexicon();
        let mut tok = Tokenizer::new(&lex).unwrap();
        tok.clear_filter();
        let tokens = tok.get_tokens("12B\u{1}X");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["12B", "\u{1}", "X"]);
        assert!(tokens[0].has_class(InClass::Mixed));
        assert!(tokens[1].has_class(InClass::BadToken));
        assert!(tokens[2].has_class(InClass::Single));
    }

    #[test]
    fn leading_separator() {
        let lex = scenario_lexicon();
        let mut tok = Tokenizer::new(&lex).unwrap();
        tok.clear_filter();
        let tokens = tok.get_tokens("  #12");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["  ", "#", "12"]);
    }

    #[test]
    fn filter_editing() {
        let lex = scenario_lexicon();
        let mut tok = Tokenizer::new(&lex).unwrap();
        let saved = tok.filter().clone();
        tok.add_filter(InClass::Prov);
        tok.remove_filter(InClass::Road);
        assert!(tok.filter().contains(&InClass::Prov));
        assert_eq!(tok.get_tokens("12 AL").len(), 1);

        assert!(tok.set_filter_str("PUNCT,NOTACLASS").is_err());
        assert!(tok.filter().contains(&InClass::Prov));

        tok.set_filter(saved.clone());
        assert_eq!(tok.filter(), &saved);
        tok.set_filter_str("PUNCT, SPACE").unwrap();
        assert_eq!(tok.filter().len(), 2);
    }
}
