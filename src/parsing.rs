use crate::{
    DefaultParser, ILexer, Node, ParseError, ParseResult, PostParseFn, SeparatorFn, Syntax, Token,
    TokenCache, TokenImpl, Trace, TraceLevel,
};
use crate::lexeme::TokenIter;
use std::collections::HashMap;

impl<TL: TokenImpl> DefaultParser<TL> {
    /// Create a driver for the given root production. The root must already be
    /// registered; its references are resolved lazily during parsing.
    pub fn new(syntax: Syntax<TL>, root: &'static str) -> Result<Self, ParseError<TL>> {
        syntax.get(root)?;

        Ok(Self {
            syntax,
            root,
            trace_level: TraceLevel::Off,
            post_parse: HashMap::new(),
            separator: None,
        })
    }

    pub fn syntax(&self) -> &Syntax<TL> {
        &self.syntax
    }

    pub fn set_trace_level(&mut self, level: TraceLevel) -> &mut Self {
        self.trace_level = level;
        self
    }

    /// Register a rewrite applied to every node of the given type after a
    /// successful parse, bottom-up.
    pub fn set_post_parse<TF>(&mut self, node_type: &'static str, rewrite: TF) -> &mut Self
    where
        TF: Fn(Node<TL>) -> Node<TL> + 'static,
    {
        let rewrite: PostParseFn<TL> = Box::new(rewrite);
        self.post_parse.insert(node_type, rewrite);
        self
    }

    /// Register a predicate selecting separator nodes; matching children are
    /// dropped from the finished tree before the rewrites run.
    pub fn set_separator<TF>(&mut self, is_separator: TF) -> &mut Self
    where
        TF: Fn(&Node<TL>) -> bool + 'static,
    {
        let is_separator: SeparatorFn<TL> = Box::new(is_separator);
        self.separator = Some(is_separator);
        self
    }

    /// Parse the lexer's token stream into a tree rooted at this driver's root
    /// production.
    ///
    /// A fresh token cache is built for every invocation and discarded with it;
    /// memoized results never leak across parses. When the lexer is exhausted
    /// the end-of-file sentinel is fed exactly once, and the root parser must
    /// finish valid with the sentinel as its only unparsed token.
    pub fn parse(&self, lexer: &mut dyn ILexer<TL>) -> Result<Node<TL>, ParseError<TL>> {
        let root = self.syntax.get(self.root)?;

        if !root.can_create(&self.syntax, &Node::zero(), &[])? {
            return Err(ParseError::InvalidRootProduction);
        }

        let trace = Trace::new(self.trace_level);
        let mut cache = TokenCache::new();
        let mut parser = root.create(&self.syntax, &trace, Node::zero(), &[])?;

        let mut last = ParseResult::accepting();
        let mut pointer = 0;

        loop {
            let next = lexer.next()?;

            if !last.accepting {
                return match next {
                    Some(t) => Err(ParseError::UnexpectedToken {
                        scope: self.root,
                        token: t,
                    }),
                    None => Ok(self.post_parse_node(last.node)),
                };
            }

            match next {
                None => {
                    let eof = Token::eof(pointer);
                    last = parser.parse(&self.syntax, &mut cache, eof)?;

                    if !last.valid {
                        trace.out(|| "root not valid at end of input".to_string());
                        return Err(ParseError::UnexpectedEof);
                    }

                    if last.unparsed.len() != 1 || last.unparsed[0] != eof {
                        trace.out(|| format!("unexpected unparsed: {}", last.unparsed.len()));
                        return Err(ParseError::UnexpectedEof);
                    }

                    return Ok(self.post_parse_node(last.node));
                }
                Some(t) => {
                    pointer = t.end;
                    last = parser.parse(&self.syntax, &mut cache, t)?;

                    if !last.accepting {
                        if !last.valid {
                            return Err(ParseError::UnexpectedToken {
                                scope: self.root,
                                token: t,
                            });
                        }

                        if let Some(first) = last.unparsed.first() {
                            return Err(ParseError::UnexpectedToken {
                                scope: self.root,
                                token: *first,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Parse an already collected token stream.
    pub fn parse_tokens(&self, tokens: Vec<Token<TL>>) -> Result<Node<TL>, ParseError<TL>> {
        self.parse(&mut TokenIter::new(tokens))
    }

    /// The post-parse pass: separator children are dropped and the registered
    /// rewrites are applied, children before parents. Rewrites are expected to
    /// be idempotent, which makes the whole pass idempotent.
    pub fn post_parse_node(&self, mut n: Node<TL>) -> Node<TL> {
        n.nodes = self.post_parse_nodes(std::mem::take(&mut n.nodes));

        match self.post_parse.get(n.node_type) {
            Some(rewrite) => rewrite(n),
            None => n,
        }
    }

    fn post_parse_nodes(&self, nodes: Vec<Node<TL>>) -> Vec<Node<TL>> {
        let nodes: Vec<Node<TL>> = match &self.separator {
            Some(is_separator) => nodes.into_iter().filter(|n| !is_separator(n)).collect(),
            None => nodes,
        };

        nodes
            .into_iter()
            .map(|n| self.post_parse_node(n))
            .collect()
    }
}
