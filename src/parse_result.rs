use crate::{Node, ParseResult, Token, TokenImpl};

impl<TL: TokenImpl> ParseResult<TL> {
    /// The parser wants the next token.
    pub fn accepting() -> Self {
        Self {
            accepting: true,
            valid: false,
            from_cache: false,
            node: Node::zero(),
            unparsed: Vec::with_capacity(0),
        }
    }

    /// Done without a match; the supplied tokens go back to the caller.
    pub fn unparsed(unparsed: Vec<Token<TL>>) -> Self {
        Self {
            accepting: false,
            valid: false,
            from_cache: false,
            node: Node::zero(),
            unparsed,
        }
    }

    /// Done with a match.
    pub fn matched(node: Node<TL>, unparsed: Vec<Token<TL>>) -> Self {
        Self {
            accepting: false,
            valid: true,
            from_cache: false,
            node,
            unparsed,
        }
    }

    /// Done with a match served from the token cache. The node may cover tokens
    /// the caller has not supplied yet.
    pub fn cached(node: Node<TL>, unparsed: Vec<Token<TL>>) -> Self {
        Self {
            accepting: false,
            valid: true,
            from_cache: true,
            node,
            unparsed,
        }
    }
}
