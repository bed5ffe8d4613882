// Lexicon: word -> readings (standard form, classes, attachment), plus the
// regex fragments the tokenizer scans with.
//
// Words are stored upper-cased. The regex fragments and the compiled scanner
// are built on first use and dropped on every insert or remove, so they
// always describe the current entry set. Mutation needs `&mut self`, which
// keeps it out of any phase where the lexicon is shared.

pub mod format;
pub mod shape;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use addrstd_core::classes::InClass;
use addrstd_core::diagnostic::Diagnostic;
use addrstd_core::lexentry::LexEntry;
use addrstd_core::token::Token;
use hashbrown::HashMap;

use crate::LoadError;
use crate::tokenizer::scanner::Scanner;

/// A word list with standardized forms and lexical classes.
#[derive(Debug, Default)]
pub struct Lexicon {
    name: String,
    lang: String,
    locale: String,
    entries: HashMap<String, Vec<LexEntry>>,
    /// Words with at least one PREFIX or SUFFIX reading, sorted.
    attached: Vec<String>,
    diagnostics: Vec<Diagnostic>,

    regex: OnceLock<String>,
    regex_prefix: OnceLock<String>,
    regex_suffix: OnceLock<String>,
    scanner: OnceLock<Result<Scanner, regex::Error>>,
}

impl Clone for Lexicon {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            lang: self.lang.clone(),
            locale: self.locale.clone(),
            entries: self.entries.clone(),
            attached: self.attached.clone(),
            diagnostics: self.diagnostics.clone(),
            regex: OnceLock::new(),
            regex_prefix: OnceLock::new(),
            regex_suffix: OnceLock::new(),
            scanner: OnceLock::new(),
        }
    }
}

fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}

impl Lexicon {
    pub fn new(
        name: impl Into<String>,
        lang: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Parse lexicon text (see [`format`]).
    pub fn from_text(text: &str) -> Result<Self, LoadError> {
        format::parse(text)
    }

    /// Read and parse a lexicon file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    /// Write the lexicon as text; entries are sorted by word.
    pub fn to_text(&self) -> String {
        format::write(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Number of entries, counting every reading of a word.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Distinct words in sorted order.
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    /// Every entry, sorted by word; readings of one word keep insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &LexEntry> {
        self.words()
            .into_iter()
            .flat_map(move |w| self.entries.get(w).into_iter().flatten())
    }

    /// Words with a PREFIX or SUFFIX reading.
    pub fn attached(&self) -> &[String] {
        &self.attached
    }

    /// All readings of `word`, compared case-insensitively.
    pub fn find(&self, word: &str) -> &[LexEntry] {
        self.entries
            .get(&normalize_word(word))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Standardized form of the reading of `word` that carries `class`.
    pub fn std_word(&self, word: &str, class: InClass) -> Option<&str> {
        self.find(word)
            .iter()
            .find(|e| e.classes.contains(&class))
            .map(|e| e.std_word.as_str())
    }

    /// Add a reading. Returns `false` if the identical reading was present.
    pub fn insert(&mut self, mut entry: LexEntry) -> bool {
        entry.word = normalize_word(&entry.word);
        if entry.word.is_empty() {
            return false;
        }
        let word = entry.word.clone();
        let readings = self.entries.entry(word.clone()).or_default();
        if readings.contains(&entry) {
            return false;
        }
        readings.push(entry);
        self.refresh_attached(&word);
        self.invalidate();
        true
    }

    /// Remove a reading. Returns `false` if it was not present.
    pub fn remove(&mut self, entry: &LexEntry) -> bool {
        let word = normalize_word(&entry.word);
        let Some(readings) = self.entries.get_mut(&word) else {
            return false;
        };
        let same = |e: &LexEntry| {
            e.std_word == entry.std_word && e.classes == entry.classes && e.attach == entry.attach
        };
        let Some(pos) = readings.iter().position(same) else {
            return false;
        };
        readings.remove(pos);
        if readings.is_empty() {
            self.entries.remove(&word);
        }
        self.refresh_attached(&word);
        self.invalidate();
        true
    }

    fn refresh_attached(&mut self, word: &str) {
        let is_attached = self
            .entries
            .get(word)
            .is_some_and(|rs| rs.iter().any(|e| e.is_prefix() || e.is_suffix()));
        match (self.attached.binary_search_by(|w| w.as_str().cmp(word)), is_attached) {
            (Ok(pos), false) => {
                self.attached.remove(pos);
            }
            (Err(pos), true) => self.attached.insert(pos, word.to_string()),
            _ => {}
        }
    }

    fn invalidate(&mut self) {
        self.regex = OnceLock::new();
        self.regex_prefix = OnceLock::new();
        self.regex_suffix = OnceLock::new();
        self.scanner = OnceLock::new();
    }

    fn words_where(&self, pred: impl Fn(&LexEntry) -> bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, rs)| rs.iter().any(&pred))
            .map(|(w, _)| w.as_str())
            .collect()
    }

    /// Alternation matching every word.
    pub fn regex(&self) -> &str {
        self.regex
            .get_or_init(|| addrstd_trie::compile(self.entries.keys()))
    }

    /// Alternation matching words that attach to the following word.
    pub fn regex_prefix_attached(&self) -> &str {
        self.regex_prefix
            .get_or_init(|| addrstd_trie::compile(self.words_where(LexEntry::is_prefix)))
    }

    /// Alternation matching words that attach to the preceding word.
    pub fn regex_suffix_attached(&self) -> &str {
        self.regex_suffix
            .get_or_init(|| addrstd_trie::compile(self.words_where(LexEntry::is_suffix)))
    }

    /// Seed the fragment caches with values compiled earlier for the same
    /// entry set. Fragments that are already built are kept.
    pub(crate) fn preload_fragments(&self, main: &str, prefix: &str, suffix: &str) {
        let _ = self.regex.set(main.to_string());
        let _ = self.regex_prefix.set(prefix.to_string());
        let _ = self.regex_suffix.set(suffix.to_string());
    }

    /// The compiled tokenizer scanner for the current entry set.
    pub(crate) fn scanner(&self) -> Result<&Scanner, LoadError> {
        self.scanner
            .get_or_init(|| Scanner::build(self))
            .as_ref()
            .map_err(|e| LoadError::Pattern(e.clone()))
    }

    /// Fill in the classes and standard text of `token`.
    ///
    /// Lexicon readings win; the standard text is taken from the first
    /// reading. A word the lexicon does not know is classified by its shape,
    /// and if no shape rule applies it gets `default_class`.
    pub fn classify(&self, token: &mut Token, default_class: InClass) {
        let readings = self.find(&token.text);
        if let Some(first) = readings.first() {
            for entry in readings {
                token.in_classes.extend(entry.classes.iter().copied());
            }
            token.std_text = first.std_word.clone();
            return;
        }

        token.std_text = token.text.clone();
        let shape = shape::shape_classes(&token.text);
        if shape.is_empty() {
            token.in_classes.insert(default_class);
        } else {
            token.in_classes.extend(shape);
        }
    }

    /// Classes of every reading of `word`, or an empty set.
    pub fn classes_of(&self, word: &str) -> BTreeSet<InClass> {
        self.find(word)
            .iter()
            .flat_map(|e| e.classes.iter().copied())
            .collect()
    }
}
