use super::{BacktrackState, Sequence};
use crate::{
    GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace,
};

impl Sequence {
    pub fn new(node_type: &'static str, item: &'static str) -> Self {
        Self { node_type, item }
    }

    pub(crate) fn can_create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        init: &Node<TL>,
        excluded: &[&'static str],
    ) -> Result<bool, GrammarError> {
        let item = syntax.get(self.item)?;

        if item.member(syntax, self.node_type)? {
            return Err(GrammarError::SequenceContainingSelf(self.node_type));
        }

        if excluded.contains(&self.node_type) {
            return Ok(false);
        }

        let mut extended = excluded.to_vec();
        extended.push(self.node_type);

        if !init.is_zero()
            && item.member(syntax, init.node_type)?
            && !extended.contains(&init.node_type)
        {
            return Ok(true);
        }

        item.can_create(syntax, init, &extended)
    }

    pub(crate) fn create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        trace: &Trace,
        init: Node<TL>,
        excluded: &[&'static str],
    ) -> Result<Box<dyn IParser<TL>>, GrammarError> {
        syntax.get(self.item)?;

        let mut extended = excluded.to_vec();
        extended.push(self.node_type);

        Ok(Box::new(SequenceParser {
            state: BacktrackState::new(
                trace.extend(self.node_type),
                self.node_type,
                init,
                extended,
                Node::branch(self.node_type),
            ),
            item: self.item,
            parser: None,
        }))
    }

    pub(crate) fn member(&self, node_type: &str) -> bool {
        node_type == self.node_type
    }
}

/// Accumulates item nodes until an item refuses to parse, then finishes valid
/// with whatever was collected, possibly nothing. The init node is considered
/// only for the first item.
struct SequenceParser<TL: TokenImpl> {
    state: BacktrackState<TL>,
    item: &'static str,
    parser: Option<Box<dyn IParser<TL>>>,
}

impl<TL: TokenImpl> SequenceParser<TL> {
    /// For the first item the caller's init and excluded context apply. Once an
    /// item has been committed the position is no longer left-recursive, so
    /// later items only exclude the sequence itself.
    fn next_parser(
        &self,
        syntax: &Syntax<TL>,
    ) -> Result<Option<Box<dyn IParser<TL>>>, GrammarError> {
        let item = syntax.get(self.item)?;

        let (init, excluded) = if self.state.node.nodes.is_empty() {
            (self.state.init.clone(), self.state.excluded.clone())
        } else {
            (Node::zero(), vec![self.state.node_type])
        };

        if !item.can_create(syntax, &init, &excluded)? {
            return Ok(None);
        }

        Ok(Some(item.create(syntax, &self.state.trace, init, &excluded)?))
    }

    fn parse_queued(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        match self.state.queue.pop_front() {
            Some(t) => self.parse(syntax, cache, t),
            None => Ok(ParseResult::accepting()),
        }
    }

    /// The item did not parse: adopt the init as the sole first child if it
    /// qualifies, otherwise finish with the children collected so far.
    fn settle(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        if !self.state.init_evaluated {
            self.state.init_evaluated = true;
            if self.state.append_init_if_member(syntax, self.item)? {
                return self.parse_queued(syntax, cache);
            }
        }

        Ok(self.finish(cache))
    }

    fn finish(&mut self, cache: &mut TokenCache<TL>) -> ParseResult<TL> {
        self.state.done = true;

        // an empty sequence is anchored at the token it did not consume; at the
        // end of input that is the EOF sentinel sitting in the queue
        if self.state.node.nodes.is_empty() {
            if let Some(head) = self.state.queue.front() {
                self.state.node.token = *head;
            }
        }

        self.state.trace.out(|| {
            format!(
                "sequence done with {} items",
                self.state.node.nodes.len()
            )
        });

        cache.insert(
            self.state.node.token,
            self.state.node_type,
            self.state.node.clone(),
        );

        let unparsed = self.state.take_unparsed(None);
        ParseResult::matched(self.state.node.clone(), unparsed)
    }
}

impl<TL: TokenImpl> IParser<TL> for SequenceParser<TL> {
    fn parse(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
        t: Token<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        self.state.trace.debug(|| format!("parsing {}", t));
        self.state.check_done(&t);

        if let Some(r) = self.state.check_skip() {
            return Ok(r);
        }

        if self.parser.is_none() {
            match self.next_parser(syntax)? {
                Some(created) => self.parser = Some(created),
                None => {
                    // past the point where a first-token cache lookup is valid
                    self.state.cache_checked = true;
                    self.state.queue.push_front(t);
                    return self.settle(syntax, cache);
                }
            }
        }

        if !self.state.cache_checked {
            self.state.cache_checked = true;
            if let Some(r) = self.state.check_cache(cache, t) {
                self.state.done = true;
                return Ok(r);
            }
        }

        let r = match self.parser.as_mut() {
            Some(parser) => parser.parse(syntax, cache, t),
            None => panic!("no item parser for {}", self.state.node_type),
        };

        let r = match r {
            Ok(r) => r,
            Err(err) => {
                self.state.done = true;
                return Err(err);
            }
        };

        if r.accepting {
            return self.parse_queued(syntax, cache);
        }

        self.parser = None;
        self.state.prepend(r.unparsed);

        if r.valid && !r.node.is_zero() {
            self.state.append_parsed(r.node, r.from_cache);
            return self.parse_queued(syntax, cache);
        }

        self.settle(syntax, cache)
    }
}
