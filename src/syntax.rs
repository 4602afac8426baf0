use crate::production::{Generator, Group, Optional, Primitive, Sequence, Union};
use crate::{GrammarError, Syntax, TokenImpl};
use std::collections::HashMap;

impl<TL: TokenImpl> Syntax<TL> {
    pub fn new() -> Self {
        Self {
            productions: HashMap::new(),
        }
    }

    /// Register a production matching a single token of the given type.
    pub fn primitive(&mut self, name: &'static str, token: TL) -> &mut Self {
        self.register(name, Generator::Primitive(Primitive::new(name, token)))
    }

    /// Register a production wrapping `inner`, succeeding even when `inner` does
    /// not parse. The wrapped production must not contain the optional itself.
    pub fn optional(&mut self, name: &'static str, inner: &'static str) -> &mut Self {
        self.register(name, Generator::Optional(Optional::new(name, inner)))
    }

    /// Register a production parsing zero or more repetitions of `item`. The
    /// item production must not contain the sequence itself.
    pub fn sequence(&mut self, name: &'static str, item: &'static str) -> &mut Self {
        self.register(name, Generator::Sequence(Sequence::new(name, item)))
    }

    /// Register a production parsing the given items in order. Groups may
    /// reference themselves through their items.
    pub fn group(&mut self, name: &'static str, items: &[&'static str]) -> &mut Self {
        self.register(name, Generator::Group(Group::new(name, items.to_vec())))
    }

    /// Register an alternation over the given elements, resolved by longest
    /// match. Unions may reference themselves; such mentions are dropped during
    /// expansion.
    pub fn union(&mut self, name: &'static str, elements: &[&'static str]) -> &mut Self {
        self.register(name, Generator::Union(Union::new(name, elements.to_vec())))
    }

    fn register(&mut self, name: &'static str, generator: Generator<TL>) -> &mut Self {
        self.productions.insert(name, generator);
        self
    }

    /// Resolve a production name. Names are resolved at use time, so forward
    /// references are fine as long as they are registered before the first
    /// parse.
    pub fn get(&self, name: &'static str) -> Result<&Generator<TL>, GrammarError> {
        self.productions
            .get(name)
            .ok_or(GrammarError::UnspecifiedProduction(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }
}

impl<TL: TokenImpl> Default for Syntax<TL> {
    fn default() -> Self {
        Self::new()
    }
}
