use super::Optional;
use crate::{
    GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace,
};

impl Optional {
    pub fn new(node_type: &'static str, inner: &'static str) -> Self {
        Self { node_type, inner }
    }

    pub(crate) fn can_create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        init: &Node<TL>,
        excluded: &[&'static str],
    ) -> Result<bool, GrammarError> {
        let inner = syntax.get(self.inner)?;

        if inner.member(syntax, self.node_type)? {
            return Err(GrammarError::OptionalContainingSelf(self.node_type));
        }

        if excluded.contains(&self.node_type) {
            return Ok(false);
        }

        let mut extended = excluded.to_vec();
        extended.push(self.node_type);
        if inner.can_create(syntax, init, &extended)? {
            return Ok(true);
        }

        // the wrapped production cannot start here, but a pre-parsed init of
        // its type can still pass through as the optional's result
        if init.is_zero() {
            return Ok(false);
        }

        inner.member(syntax, init.node_type)
    }

    pub(crate) fn create<TL: TokenImpl>(
        &self,
        syntax: &Syntax<TL>,
        trace: &Trace,
        init: Node<TL>,
        excluded: &[&'static str],
    ) -> Result<Box<dyn IParser<TL>>, GrammarError> {
        syntax.get(self.inner)?;

        let mut extended = excluded.to_vec();
        extended.push(self.node_type);

        Ok(Box::new(OptionalParser {
            trace: trace.extend(self.node_type),
            node_type: self.node_type,
            inner: self.inner,
            init,
            excluded: extended,
            inner_parser: None,
            cache_checked: false,
            done: false,
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

        if syntax
            .get(self.inner)?
            .member_within(syntax, node_type, visited)?
        {
            return Ok(true);
        }

        Ok(node_type == self.node_type)
    }
}

/// Delegates to the wrapped production and is valid no matter what: on inner
/// failure it reports a zero node with the current token echoed back unparsed.
/// The result node never carries the optional's own name.
struct OptionalParser<TL: TokenImpl> {
    trace: Trace,
    node_type: &'static str,
    inner: &'static str,
    init: Node<TL>,
    excluded: Vec<&'static str>,
    inner_parser: Option<Box<dyn IParser<TL>>>,
    cache_checked: bool,
    done: bool,
}

impl<TL: TokenImpl> IParser<TL> for OptionalParser<TL> {
    fn parse(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
        t: Token<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        self.trace.debug(|| format!("parsing {}", t));

        if self.done {
            panic!(
                "parser for {} received {:?} after completion",
                self.node_type, t
            );
        }

        if self.inner_parser.is_none() {
            let inner = syntax.get(self.inner)?;

            if !inner.can_create(syntax, &self.init, &self.excluded)? {
                self.trace
                    .out(|| format!("cannot create {} here", self.inner));
                self.done = true;

                if !self.init.is_zero() && inner.member(syntax, self.init.node_type)? {
                    self.trace.out(|| "init passes through".to_string());
                    return Ok(ParseResult::matched(self.init.clone(), vec![t]));
                }

                return Ok(ParseResult::unparsed(vec![t]));
            }

            self.inner_parser =
                Some(inner.create(syntax, &self.trace, self.init.clone(), &self.excluded)?);
        }

        if !self.cache_checked {
            self.cache_checked = true;

            let key = if self.init.is_zero() {
                t
            } else {
                self.init.token
            };

            if cache.has_failure(key, self.node_type) {
                self.trace.out(|| "cached failure".to_string());
                self.done = true;
                return Ok(ParseResult::unparsed(vec![t]));
            }

            if let Some(n) = cache.find(key, self.node_type) {
                self.trace.out(|| "cached match".to_string());
                self.done = true;
                return Ok(ParseResult::cached(n.clone(), vec![t]));
            }
        }

        let r = match self.inner_parser.as_mut() {
            Some(parser) => parser.parse(syntax, cache, t),
            None => panic!("no inner parser for {}", self.node_type),
        };

        let mut r = match r {
            Ok(r) => r,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        if r.accepting {
            return Ok(r);
        }

        self.trace
            .out(|| format!("inner done, parsed: {}", r.valid));
        self.done = true;

        let key = if r.node.is_zero() {
            match r.unparsed.first() {
                Some(head) => *head,
                None => panic!("unexpected parse result: {}", self.node_type),
            }
        } else {
            r.node.token
        };

        cache.insert(key, self.node_type, r.node.clone());
        r.valid = true;
        Ok(r)
    }
}
