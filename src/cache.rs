use crate::{CacheItem, Node, Token, TokenCache, TokenImpl};
use std::collections::{HashMap, HashSet};

impl<TL: TokenImpl> CacheItem<TL> {
    fn new() -> Self {
        Self {
            matches: HashMap::new(),
            failures: HashSet::new(),
        }
    }
}

impl<TL: TokenImpl> TokenCache<TL> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// The sub-tree parsed for the production at this token, if any.
    pub fn find(&self, t: Token<TL>, node_type: &str) -> Option<&Node<TL>> {
        self.items.get(&t).and_then(|item| item.matches.get(node_type))
    }

    /// Whether the production is known to have no match at this token.
    pub fn has_failure(&self, t: Token<TL>, node_type: &str) -> bool {
        self.items
            .get(&t)
            .map_or(false, |item| item.failures.contains(node_type))
    }

    pub fn insert(&mut self, t: Token<TL>, node_type: &'static str, node: Node<TL>) {
        self.items
            .entry(t)
            .or_insert_with(CacheItem::new)
            .matches
            .insert(node_type, node);
    }

    pub fn insert_failure(&mut self, t: Token<TL>, node_type: &'static str) {
        let item = self.items.entry(t).or_insert_with(CacheItem::new);

        // a shorter variant may already have been parsed at this token; the
        // failure of a longer extension must not shadow it
        if item.matches.contains_key(node_type) {
            return;
        }

        item.failures.insert(node_type);
    }

    /// Discard every memoized outcome. Required between independent root parses
    /// when a cache outlives a single invocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<TL: TokenImpl> Default for TokenCache<TL> {
    fn default() -> Self {
        Self::new()
    }
}
