//! Prefix trie over bucket keys.
//!
//! Built lazily, only when a random-word query supplies a prefix shorter
//! than the bucket key length and the matching keys have to be
//! enumerated. Key sets are small (a few thousand three-character keys)
//! so nodes are plain maps.

use ahash::AHashMap;

#[derive(Debug, Default)]
struct Node {
    children: AHashMap<char, Node>,
    terminal: bool,
}

/// Character trie with sorted prefix enumeration.
#[derive(Debug, Default)]
pub struct Trie {
    root: Node,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
    }

    /// All inserted words starting with `prefix`, in ascending order.
    /// The empty prefix enumerates every word.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        let mut acc = prefix.to_string();
        collect(node, &mut acc, &mut out);
        out
    }
}

fn collect(node: &Node, acc: &mut String, out: &mut Vec<String>) {
    if node.terminal {
        out.push(acc.clone());
    }
    let mut chars: Vec<char> = node.children.keys().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        acc.push(ch);
        if let Some(child) = node.children.get(&ch) {
            collect(child, acc, out);
        }
        acc.pop();
    }
}
