//! Prefix tree over folded alias characters.
//!
//! Built once from a `Catalog` and read-only afterwards, so it is shared between
//! request handlers behind an `Arc` without any locking.

use std::collections::BTreeMap;

use crate::extraction::catalog::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonNode {
    children: BTreeMap<char, AutomatonNode>,
    /// Present iff some alias ends at this node.
    canonical_name: Option<String>,
}

impl AutomatonNode {
    pub fn child(&self, c: char) -> Option<&AutomatonNode> {
        self.children.get(&c)
    }

    pub fn canonical_name(&self) -> Option<&str> {
        self.canonical_name.as_deref()
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(AutomatonNode::count).sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    root: AutomatonNode,
    longest_alias: usize,
}

impl Automaton {
    pub fn build(catalog: &Catalog) -> Self {
        let mut automaton = Automaton::default();
        for entry in catalog.entries() {
            automaton.insert(&entry.alias, &entry.canonical_name);
        }
        automaton
    }

    /// `alias` must already be case-folded; the catalog guarantees it.
    fn insert(&mut self, alias: &str, canonical_name: &str) {
        let mut node = &mut self.root;
        let mut len = 0;
        for c in alias.chars() {
            node = node.children.entry(c).or_default();
            len += 1;
        }
        node.canonical_name = Some(canonical_name.to_string());
        self.longest_alias = self.longest_alias.max(len);
    }

    pub fn root(&self) -> &AutomatonNode {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Length of the longest alias, in characters.
    pub fn longest_alias(&self) -> usize {
        self.longest_alias
    }
}
