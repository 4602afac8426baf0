use super::{BacktrackState, Generator, Union};
use crate::{
    GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace,
};
use once_cell::unsync::OnceCell;

impl Union {
    pub fn new(node_type: &'static str, elements: Vec<&'static str>) -> Self {
        Self {
            node_type,
            elements,
            expanded: OnceCell::new(),
        }
    }

    /// The flattened element list: nested unions are replaced by their own
    /// elements, and a union reached again through its own elements is dropped
    /// rather than expanded.
    pub(crate) fn expanded<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
    ) -> Result<&[&'static str], GrammarError> {
        let expanded =
            self.expanded
                .get_or_try_init(|| -> Result<Vec<&'static str>, GrammarError> {
                    let mut out = Vec::new();
                    self.expand_into(syntax, &[], &mut out)?;
                    Ok(out)
                })?;
        Ok(expanded.as_slice())
    }

    fn expand_into<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        skip: &[&'static str],
        out: &mut Vec<&'static str>,
    ) -> Result<(), GrammarError> {
        if skip.contains(&self.node_type) {
            return Ok(());
        }

        let mut skip = skip.to_vec();
        skip.push(self.node_type);

        for &element in &self.elements {
            match syntax.get(element)? {
                Generator::Union(nested) => nested.expand_into(syntax, &skip, out)?,
                _ => {
                    if !skip.contains(&element) {
                        out.push(element);
                    }
                }
            }
        }

        Ok(())
    }

    pub(crate) fn can_create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        init: &Node<TL>,
        excluded: &[&'static str],
    ) -> Result<bool, GrammarError> {
        let expanded = self.expanded(syntax)?;
        if expanded.is_empty() {
            return Err(GrammarError::UnionWithoutElements(self.node_type));
        }

        for &element in expanded {
            if syntax.get(element)?.can_create(syntax, init, excluded)? {
                return Ok(true);
            }
        }

        if init.is_zero() {
            return Ok(false);
        }

        self.member_within(syntax, init.node_type, &mut Vec::new())
    }

    /// The union passes its caller's excluded types to the alternatives
    /// unmodified; left recursion through the union is already accounted for by
    /// seeding the parser with the init node.
    pub(crate) fn create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        trace: &Trace,
        init: Node<TL>,
        excluded: &[&'static str],
    ) -> Result<Box<dyn IParser<TL>>, GrammarError> {
        let expanded = self.expanded(syntax)?;
        if expanded.is_empty() {
            return Err(GrammarError::UnionWithoutElements(self.node_type));
        }

        let mut elements = Vec::new();
        for &element in expanded {
            if syntax.get(element)?.can_create(syntax, &init, excluded)? {
                elements.push(element);
            }
        }

        let seed = if !init.is_zero() && self.member_within(syntax, init.node_type, &mut Vec::new())? {
            init.clone()
        } else {
            Node::zero()
        };
        let valid = !seed.is_zero();

        Ok(Box::new(UnionParser {
            state: BacktrackState::new(
                trace.extend(self.node_type),
                self.node_type,
                init,
                excluded.to_vec(),
                seed,
            ),
            elements,
            cursor: 0,
            parser: None,
            valid,
        }))
    }

    pub(crate) fn member_within<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        node_type: &str,
        visited: &mut Vec<&'static str>,
    ) -> Result<bool, GrammarError> {
        if visited.contains(&self.node_type) {
            return Ok(false);
        }
        visited.push(self.node_type);

        for &element in self.expanded(syntax)? {
            if syntax
                .get(element)?
                .member_within(syntax, node_type, visited)?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Tries the alternatives in declaration order, seeding each attempt with the
/// best node found so far as its init. Whenever an alternative strictly extends
/// the best match, the whole element list is retried against the new best; the
/// union is done when a full pass brings no improvement. The result always
/// carries the winning alternative's name, never the union's own.
struct UnionParser<TL: TokenImpl> {
    state: BacktrackState<TL>,
    elements: Vec<&'static str>,
    cursor: usize,
    parser: Option<Box<dyn IParser<TL>>>,
    valid: bool,
}

impl<TL: TokenImpl> UnionParser<TL> {
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

    /// Every alternative has been tried without improvement. The outcome is
    /// cached under the union's name at the best node's leading token, or at
    /// the position the union failed to advance from.
    fn set_done(&mut self, cache: &mut TokenCache<TL>, t: Option<Token<TL>>) -> ParseResult<TL> {
        let key = if !self.state.node.is_zero() {
            self.state.node.token
        } else if let Some(t) = t {
            t
        } else if let Some(front) = self.state.queue.front() {
            *front
        } else {
            panic!("no cache key for {}", self.state.node_type);
        };

        if self.valid {
            self.state
                .trace
                .out(|| format!("matched {}", self.state.node.node_type));
            cache.insert(key, self.state.node_type, self.state.node.clone());
        } else {
            self.state.trace.out(|| "no element matched".to_string());
            cache.insert_failure(key, self.state.node_type);
        }

        let unparsed = self.state.take_unparsed(t);
        ParseResult {
            accepting: false,
            valid: self.valid,
            from_cache: false,
            node: self.state.node.clone(),
            unparsed,
        }
    }
}

impl<TL: TokenImpl> IParser<TL> for UnionParser<TL> {
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

        while self.parser.is_none() {
            if self.cursor >= self.elements.len() {
                self.state.done = true;
                return Ok(self.set_done(cache, Some(t)));
            }

            let element_name = self.elements[self.cursor];
            self.cursor += 1;

            let element = syntax.get(element_name)?;

            let init = if self.state.node.is_zero() {
                self.state.init.clone()
            } else {
                self.state.node.clone()
            };

            let ok = match element.can_create(syntax, &init, &self.state.excluded) {
                Ok(ok) => ok,
                Err(err) => {
                    self.state.done = true;
                    return Err(err);
                }
            };
            if !ok {
                continue;
            }

            let created =
                match element.create(syntax, &self.state.trace, init, &self.state.excluded) {
                    Ok(created) => created,
                    Err(err) => {
                        self.state.done = true;
                        return Err(err);
                    }
                };
            self.parser = Some(created);
        }

        let r = match self.parser.as_mut() {
            Some(parser) => parser.parse(syntax, cache, t),
            None => panic!("no element parser for {}", self.state.node_type),
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

        if !r.valid {
            return self.parse_queued(syntax, cache);
        }

        if !self.valid || r.node.length() > self.state.node.length() {
            if r.from_cache {
                let covered = r.node.tokens();
                self.state.reconcile_cached(&covered);
            }

            self.state
                .trace
                .out(|| format!("new best {} covering {} tokens", r.node.node_type, r.node.length()));
            self.state.node = r.node;
            self.valid = true;

            // a longer best may unlock a longer span in an alternative that was
            // already tried, so the whole list is retried against it
            self.cursor = 0;
        }

        self.parse_queued(syntax, cache)
    }
}
