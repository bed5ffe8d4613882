//! Word-list to regex compiler.
//!
//! Builds a prefix trie over a set of literal words and renders it as a
//! compact regular-expression alternation: shared prefixes are factored out,
//! sibling leaves collapse into a bracket class, and a word that is also a
//! prefix of longer words becomes an optional group.
//!
//! - [`trie`] -- the trie itself, generic over its key symbol
//!
//! Two key types are provided. [`ByteTrie`] indexes by byte and is only
//! correct for ASCII words; [`CharTrie`] indexes by Unicode scalar value and
//! works for any script. [`compile`] picks the right one for its input.

pub mod trie;

pub use trie::{ByteTrie, CharTrie, Symbol, Trie};

/// Compile a set of literal words into a regex fragment matching exactly
/// those words.
///
/// Empty words are ignored; an empty set yields an empty fragment. The
/// fragment contains no anchors and no capture groups.
pub fn compile<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let words: Vec<S> = words.into_iter().collect();
    if words.iter().all(|w| w.as_ref().is_ascii()) {
        let mut trie = ByteTrie::new();
        for w in &words {
            trie.insert(w.as_ref().bytes());
        }
        trie.to_regex()
    } else {
        compile_chars(words)
    }
}

/// Compile with the codepoint-indexed trie regardless of input script.
pub fn compile_chars<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut trie = CharTrie::new();
    for w in words {
        trie.insert(w.as_ref().chars());
    }
    trie.to_regex()
}
