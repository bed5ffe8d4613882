// Prefix trie with regex rendering.
//
// Each node owns its children outright; nothing is shared, so plain tree
// ownership is enough. Children live in a BTreeMap so rendering visits them
// in key order and the output is stable across runs.

use std::collections::BTreeMap;

/// A trie key symbol that knows how to write itself as a regex literal.
pub trait Symbol: Ord + Copy {
    /// Append this symbol to `out`, escaped for use both inside and outside
    /// a bracket class.
    fn push_literal(self, out: &mut String);
}

impl Symbol for u8 {
    /// Bytes are rendered as the Latin-1 character of the same value, which
    /// is only the right thing for ASCII input.
    fn push_literal(self, out: &mut String) {
        char::from(self).push_literal(out);
    }
}

impl Symbol for char {
    fn push_literal(self, out: &mut String) {
        let mut buf = [0u8; 4];
        out.push_str(&regex::escape(self.encode_utf8(&mut buf)));
    }
}

#[derive(Debug, Clone)]
struct TrieNode<K> {
    children: BTreeMap<K, TrieNode<K>>,
    /// A word ends at this node.
    end: bool,
    /// Number of distinct words that pass through or end at this node.
    count: usize,
}

impl<K> Default for TrieNode<K> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            end: false,
            count: 0,
        }
    }
}

/// Prefix trie over sequences of `K`.
#[derive(Debug, Clone)]
pub struct Trie<K> {
    root: TrieNode<K>,
}

/// Trie keyed by byte; only correct for ASCII words.
pub type ByteTrie = Trie<u8>;

/// Trie keyed by Unicode scalar value.
pub type CharTrie = Trie<char>;

impl<K: Symbol> Default for Trie<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Symbol> Trie<K> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
        }
    }

    /// Insert a word. Returns `false` if it was empty or already present.
    pub fn insert(&mut self, word: impl IntoIterator<Item = K>) -> bool {
        let word: Vec<K> = word.into_iter().collect();
        if word.is_empty() || self.contains(word.iter().copied()) {
            return false;
        }
        let mut node = &mut self.root;
        node.count += 1;
        for k in word {
            node = node.children.entry(k).or_default();
            node.count += 1;
        }
        node.end = true;
        true
    }

    /// Whether the exact word was inserted.
    pub fn contains(&self, word: impl IntoIterator<Item = K>) -> bool {
        let mut node = &self.root;
        for k in word {
            match node.children.get(&k) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.end
    }

    /// Number of distinct words in the trie.
    pub fn len(&self) -> usize {
        self.root.count
    }

    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }

    /// Render the trie as a regex alternation matching exactly its words.
    pub fn to_regex(&self) -> String {
        render(&self.root).unwrap_or_default()
    }
}

/// Render the subtree below `node`, or `None` if `node` has no children.
fn render<K: Symbol>(node: &TrieNode<K>) -> Option<String> {
    if node.children.is_empty() {
        return None;
    }

    let mut alternatives: Vec<String> = Vec::new();
    let mut leaves: Vec<String> = Vec::new();
    for (&k, child) in &node.children {
        let mut lit = String::new();
        k.push_literal(&mut lit);
        match render(child) {
            Some(rest) => {
                lit.push_str(&rest);
                alternatives.push(lit);
            }
            None => leaves.push(lit),
        }
    }

    let leaves_only = alternatives.is_empty();
    match leaves.len() {
        0 => {}
        1 => alternatives.push(leaves.remove(0)),
        _ => alternatives.push(format!("[{}]", leaves.concat())),
    }

    // A group or a single class/literal can take `?` directly; a bare
    // concatenation has to be wrapped first.
    let atomic = leaves_only || alternatives.len() > 1;
    let mut out = if alternatives.len() == 1 {
        alternatives.remove(0)
    } else {
        format!("(?:{})", alternatives.join("|"))
    };
    if node.end {
        if atomic {
            out.push('?');
        } else {
            out = format!("(?:{out})?");
        }
    }
    Some(out)
}
