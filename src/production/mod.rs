//! The five production combinators a grammar is assembled from, and the shared
//! machinery of their parsers.
//!
//! Each combinator is a pair: a generator, the stateless descriptor registered in
//! a [Syntax], and the one-shot parser it instantiates for a single parse attempt.
//! A generator answers three questions. [can_create](Generator::can_create) tells
//! whether a parser may be instantiated for a given init node and excluded-types
//! context, which lets callers probe speculative descents without allocating.
//! [create](Generator::create) instantiates the parser. [member](Generator::member)
//! tells whether a node type is admitted as the generator's own produced type,
//! which is how a pre-parsed init node can be adopted directly as a result or
//! leading child.
//!
//! Except for the union, every combinator appends its own name to the excluded
//! types before propagating them to children; a generator whose name is excluded
//! refuses creation, which is what keeps left-recursive grammars from descending
//! forever at a fixed token position.

mod group;
mod optional;
mod primitive;
mod sequence;
mod union;

#[cfg(test)]
mod __tests__;

use crate::{GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace};
use once_cell::unsync::OnceCell;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

/// A production matching exactly one token of a fixed type.
pub struct Primitive<TL> {
    node_type: &'static str,
    token: TL,
}

/// A production wrapping another production; it always parses, producing either
/// the wrapped production's node or the zero node.
pub struct Optional {
    node_type: &'static str,
    inner: &'static str,
}

/// Zero or more repetitions of a single item production.
pub struct Sequence {
    node_type: &'static str,
    item: &'static str,
}

/// A fixed ordered list of item productions; all items must parse.
pub struct Group {
    node_type: &'static str,
    items: Vec<&'static str>,
}

/// Alternation over element productions, resolved by longest match with ties
/// going to declaration order.
///
/// Nested unions are flattened at query time; a union reached again through its
/// own elements is silently dropped rather than expanded. The flattened list is
/// memoized, which is sound because the registry is frozen before the first
/// parse.
pub struct Union {
    node_type: &'static str,
    elements: Vec<&'static str>,
    expanded: OnceCell<Vec<&'static str>>,
}

/// A registered production descriptor. The five combinator kinds are a closed
/// set, so dispatch is an exhaustive match rather than a trait object.
pub enum Generator<TL> {
    Primitive(Primitive<TL>),
    Optional(Optional),
    Sequence(Sequence),
    Group(Group),
    Union(Union),
}

impl<TL: TokenImpl> Generator<TL> {
    /// The production name this generator was registered under.
    pub fn node_type(&self) -> &'static str {
        match self {
            Generator::Primitive(p) => p.node_type,
            Generator::Optional(o) => o.node_type,
            Generator::Sequence(s) => s.node_type,
            Generator::Group(g) => g.node_type,
            Generator::Union(u) => u.node_type,
        }
    }

    /// Whether a parser may be instantiated for the given init node under the
    /// given excluded-types context. Structural grammar defects surface from
    /// here so that speculative paths still detect them.
    pub fn can_create(
        &self,
        syntax: &Syntax<TL>,
        init: &Node<TL>,
        excluded: &[&'static str],
    ) -> Result<bool, GrammarError> {
        match self {
            Generator::Primitive(p) => Ok(p.can_create(init, excluded)),
            Generator::Optional(o) => o.can_create(syntax, init, excluded),
            Generator::Sequence(s) => s.can_create(syntax, init, excluded),
            Generator::Group(g) => g.can_create(syntax, init, excluded),
            Generator::Union(u) => u.can_create(syntax, init, excluded),
        }
    }

    /// Instantiate a fresh parser for one parse attempt.
    pub fn create(
        &self,
        syntax: &Syntax<TL>,
        trace: &Trace,
        init: Node<TL>,
        excluded: &[&'static str],
    ) -> Result<Box<dyn IParser<TL>>, GrammarError> {
        match self {
            Generator::Primitive(p) => Ok(p.create(trace)),
            Generator::Optional(o) => o.create(syntax, trace, init, excluded),
            Generator::Sequence(s) => s.create(syntax, trace, init, excluded),
            Generator::Group(g) => g.create(syntax, trace, init, excluded),
            Generator::Union(u) => u.create(syntax, trace, init, excluded),
        }
    }

    /// Whether this generator's produced tree admits the given production name
    /// as its own type.
    pub fn member(&self, syntax: &Syntax<TL>, node_type: &str) -> Result<bool, GrammarError> {
        self.member_within(syntax, node_type, &mut Vec::new())
    }

    /// Membership with a visited set threaded through optional and union, so
    /// cyclic grammars terminate instead of recursing forever.
    pub(crate) fn member_within(
        &self,
        syntax: &Syntax<TL>,
        node_type: &str,
        visited: &mut Vec<&'static str>,
    ) -> Result<bool, GrammarError> {
        match self {
            Generator::Primitive(p) => Ok(p.member(node_type)),
            Generator::Optional(o) => o.member_within(syntax, node_type, visited),
            Generator::Sequence(s) => Ok(s.member(node_type)),
            Generator::Group(g) => Ok(g.member(node_type)),
            Generator::Union(u) => u.member_within(syntax, node_type, visited),
        }
    }
}

impl<TL: TokenImpl> Display for Generator<TL> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.node_type())
    }
}

/// State shared by the collection parsers (sequence, group, union): the context
/// the parser was created with, the FIFO queue of tokens returned unparsed by
/// sub-parsers, and the skip counter reconciling cache hits with the caller's
/// linear token feed.
///
/// Whenever the skip counter is positive the queue is empty at that moment of
/// feeding; [check_skip](BacktrackState::check_skip) absorbs the next feeds
/// without touching any child parser.
pub(crate) struct BacktrackState<TL: TokenImpl> {
    pub trace: Trace,
    pub node_type: &'static str,
    pub init: Node<TL>,
    pub excluded: Vec<&'static str>,
    pub done: bool,
    skip: usize,
    pub queue: VecDeque<Token<TL>>,
    pub init_evaluated: bool,
    pub cache_checked: bool,
    pub node: Node<TL>,
}

impl<TL: TokenImpl> BacktrackState<TL> {
    pub fn new(
        trace: Trace,
        node_type: &'static str,
        init: Node<TL>,
        excluded: Vec<&'static str>,
        node: Node<TL>,
    ) -> Self {
        Self {
            trace,
            node_type,
            init,
            excluded,
            done: false,
            skip: 0,
            queue: VecDeque::new(),
            init_evaluated: false,
            cache_checked: false,
            node,
        }
    }

    pub fn check_done(&self, t: &Token<TL>) {
        if self.done {
            panic!(
                "parser for {} received {:?} after completion",
                self.node_type, t
            );
        }
    }

    /// Absorb one feed per skipped token while the skip counter is positive.
    pub fn check_skip(&mut self) -> Option<ParseResult<TL>> {
        if self.skip == 0 {
            return None;
        }

        self.skip -= 1;
        Some(ParseResult::accepting())
    }

    /// Consult the cache before descending into a sub-parser. Keyed by the init
    /// node's leading token when an init is present, by the current token
    /// otherwise. Must not be called while feeding from the queue.
    pub fn check_cache(
        &mut self,
        cache: &TokenCache<TL>,
        t: Token<TL>,
    ) -> Option<ParseResult<TL>> {
        let key = if self.init.is_zero() {
            t
        } else {
            self.init.token
        };

        if cache.has_failure(key, self.node_type) {
            self.trace.out(|| format!("cached failure for {}", self.node_type));
            let unparsed = self.take_unparsed(Some(t));
            return Some(ParseResult::unparsed(unparsed));
        }

        if let Some(n) = cache.find(key, self.node_type) {
            self.trace
                .out(|| format!("cached match for {} at {}", self.node_type, key));
            return Some(ParseResult::cached(n.clone(), vec![t]));
        }

        None
    }

    /// Push a sub-parser's unparsed tokens back, preserving their order ahead of
    /// whatever was queued already.
    pub fn prepend(&mut self, unparsed: Vec<Token<TL>>) {
        for t in unparsed.into_iter().rev() {
            self.queue.push_front(t);
        }
    }

    /// Drain the queue into an unparsed list, optionally led by a head token.
    pub fn take_unparsed(&mut self, head: Option<Token<TL>>) -> Vec<Token<TL>> {
        let mut unparsed = Vec::with_capacity(self.queue.len() + 1);
        unparsed.extend(head);
        unparsed.extend(self.queue.drain(..));
        unparsed
    }

    /// Append a child, dropping zero nodes. The first real child donates its
    /// leading token to the collection node.
    pub fn append_node(&mut self, n: Node<TL>) {
        if n.is_zero() {
            return;
        }

        if self.node.nodes.is_empty() {
            self.node.token = n.token;
        }
        self.node.nodes.push(n);
    }

    /// Append a sub-parser's result, reconciling the queue when the node was
    /// served from the cache.
    pub fn append_parsed(&mut self, n: Node<TL>, from_cache: bool) {
        if from_cache {
            let covered = n.tokens();
            self.reconcile_cached(&covered);
        }
        self.append_node(n);
    }

    /// A cached node may cover tokens the queue holds and tokens the caller has
    /// not supplied yet. Consume the overlap from the queue head; carry the
    /// excess as the skip counter.
    pub fn reconcile_cached(&mut self, covered: &[Token<TL>]) {
        let head = match self.queue.front() {
            Some(head) => *head,
            None => return,
        };

        let at = match covered.iter().position(|t| *t == head) {
            Some(at) => at,
            None => return,
        };

        let ahead = covered.len() - at;
        if ahead > self.queue.len() {
            self.skip = ahead - self.queue.len();
            self.queue.clear();
        } else {
            self.queue.drain(..ahead);
        }
    }

    /// Adopt the init node as the first child when it is a member of the first
    /// item's production.
    pub fn append_init_if_member(
        &mut self,
        syntax: &Syntax<TL>,
        first_item: &'static str,
    ) -> Result<bool, GrammarError> {
        if self.init.is_zero() {
            return Ok(false);
        }

        if !syntax
            .get(first_item)?
            .member(syntax, self.init.node_type)?
        {
            return Ok(false);
        }

        let init = self.init.clone();
        self.trace.out(|| format!("adopting init {} as first child", init.node_type));
        self.append_node(init);
        Ok(true)
    }
}
