use super::{BacktrackState, Group};
use crate::{
    GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace,
};

impl Group {
    pub fn new(node_type: &'static str, items: Vec<&'static str>) -> Self {
        Self { node_type, items }
    }

    pub(crate) fn can_create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        init: &Node<TL>,
        excluded: &[&'static str],
    ) -> Result<bool, GrammarError> {
        if self.items.is_empty() {
            return Err(GrammarError::GroupWithoutItems(self.node_type));
        }

        if excluded.contains(&self.node_type) {
            return Ok(false);
        }

        let first = syntax.get(self.items[0])?;

        let mut extended = excluded.to_vec();
        extended.push(self.node_type);
        if first.can_create(syntax, init, &extended)? {
            return Ok(true);
        }

        if init.is_zero() {
            return Ok(false);
        }

        first.member(syntax, init.node_type)
    }

    pub(crate) fn create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        trace: &Trace,
        init: Node<TL>,
        excluded: &[&'static str],
    ) -> Result<Box<dyn IParser<TL>>, GrammarError> {
        if self.items.is_empty() {
            return Err(GrammarError::GroupWithoutItems(self.node_type));
        }

        for item in &self.items {
            syntax.get(item)?;
        }

        Ok(Box::new(GroupParser {
            state: BacktrackState::new(
                trace.extend(self.node_type),
                self.node_type,
                init,
                excluded.to_vec(),
                Node::branch(self.node_type),
            ),
            items: self.items.clone(),
            cursor: 0,
            parser: None,
        }))
    }

    pub(crate) fn member(&self, node_type: &str) -> bool {
        node_type == self.node_type
    }
}

/// Drives the item productions in order; every item must parse or the whole
/// group fails. The init node is considered only for the first item, either as
/// the item parser's init or, when the first item fails, adopted directly as the
/// first child.
struct GroupParser<TL: TokenImpl> {
    state: BacktrackState<TL>,
    items: Vec<&'static str>,
    cursor: usize,
    parser: Option<Box<dyn IParser<TL>>>,
}

impl<TL: TokenImpl> GroupParser<TL> {
    /// The first item inherits the group's init and excluded context extended
    /// with the group itself. Once the first item has committed, the position is
    /// no longer left-recursive, so later items get a clean context.
    fn next_parser(
        &mut self,
        syntax: &Syntax<TL>,
    ) -> Result<Option<Box<dyn IParser<TL>>>, GrammarError> {
        let item_name = self.items[self.cursor];
        self.cursor += 1;

        let item = syntax.get(item_name)?;

        let (init, excluded) = if self.state.node.nodes.is_empty() {
            let mut extended = self.state.excluded.clone();
            extended.push(self.state.node_type);
            (self.state.init.clone(), extended)
        } else {
            (Node::zero(), Vec::new())
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

    fn parse_or_done(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        if self.cursor < self.items.len() {
            self.state.trace.debug(|| {
                format!(
                    "expecting {} more items",
                    self.items.len() - self.cursor
                )
            });
            return self.parse_queued(syntax, cache);
        }

        self.state.trace.out(|| "group done".to_string());
        self.state.done = true;

        cache.insert(
            self.state.node.token,
            self.state.node_type,
            self.state.node.clone(),
        );

        let unparsed = self.state.take_unparsed(None);
        Ok(ParseResult::matched(self.state.node.clone(), unparsed))
    }

    /// An item did not parse. The first item may still be satisfied by adopting
    /// the init node; any other failure fails the group. The caller gets back
    /// the tokens covered by already accepted children beyond what the init
    /// supplied, followed by the queue.
    fn fail_item(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        if !self.state.init_evaluated {
            self.state.init_evaluated = true;
            if self
                .state
                .append_init_if_member(syntax, self.items[0])?
            {
                return self.parse_or_done(syntax, cache);
            }
        }

        self.state.trace.out(|| "group item failed".to_string());
        self.state.done = true;

        let key = if self.state.node.nodes.is_empty() {
            self.state.queue.front().copied()
        } else {
            Some(self.state.node.token)
        };
        if let Some(key) = key {
            cache.insert_failure(key, self.state.node_type);
        }

        let mut covered = self.state.node.tokens();
        let init_length = self.state.init.length();
        let mut unparsed = if init_length > covered.len() {
            Vec::new()
        } else {
            covered.split_off(init_length)
        };
        unparsed.extend(self.state.queue.drain(..));

        Ok(ParseResult::unparsed(unparsed))
    }
}

impl<TL: TokenImpl> IParser<TL> for GroupParser<TL> {
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
                    return self.fail_item(syntax, cache);
                }
            }
        }

        if !self.state.cache_checked {
            self.state.cache_checked = true;
            if let Some(r) = self.state.check_cache(cache, t) {
                // a cached match was produced without the pending init in play,
                // so with an init present the group is parsed over again
                if !r.valid || self.state.init.is_zero() {
                    self.state.done = true;
                    return Ok(r);
                }
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

        if r.valid {
            // init adoption only ever applies to the first item
            self.state.init_evaluated = true;
            self.state.append_parsed(r.node, r.from_cache);
            return self.parse_or_done(syntax, cache);
        }

        self.fail_item(syntax, cache)
    }
}
