use super::Primitive;
use crate::{
    GrammarError, IParser, Node, ParseResult, Syntax, Token, TokenCache, TokenImpl, Trace,
};

impl<TL: TokenImpl> Primitive<TL> {
    pub fn new(node_type: &'static str, token: TL) -> Self {
        Self { node_type, token }
    }

    /// Primitives never adopt an init node; one is refused alongside exclusion.
    pub(crate) fn can_create(&self, init: &Node<TL>, excluded: &[&'static str]) -> bool {
        if excluded.contains(&self.node_type) {
            return false;
        }

        init.is_zero()
    }

    pub(crate) fn create(&self, trace: &Trace) -> Box<dyn IParser<TL>> {
        Box::new(PrimitiveParser {
            trace: trace.extend(self.node_type),
            node_type: self.node_type,
            token: self.token,
            done: false,
        })
    }

    pub(crate) fn member(&self, node_type: &str) -> bool {
        node_type == self.node_type
    }
}

/// Consumes a single token, producing a leaf node on a tag match and returning
/// the token unparsed otherwise. Constant-time, so its results are never cached.
struct PrimitiveParser<TL> {
    trace: Trace,
    node_type: &'static str,
    token: TL,
    done: bool,
}

impl<TL: TokenImpl> IParser<TL> for PrimitiveParser<TL> {
    fn parse(
        &mut self,
        _syntax: &Syntax<TL>,
        _cache: &mut TokenCache<TL>,
        t: Token<TL>,
    ) -> Result<ParseResult<TL>, GrammarError> {
        self.trace.debug(|| format!("parsing {}", t));

        if self.done {
            panic!(
                "parser for {} received {:?} after completion",
                self.node_type, t
            );
        }
        self.done = true;

        if t.token != self.token {
            self.trace.debug(|| format!("{} does not match", t));
            return Ok(ParseResult::unparsed(vec![t]));
        }

        self.trace.out(|| format!("matched {}", t));
        Ok(ParseResult::matched(
            Node::leaf(self.node_type, t),
            Vec::with_capacity(0),
        ))
    }
}
