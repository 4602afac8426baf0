//! Language grammar engine (lang_ge) is a library to drive a recursive descent parser
//! with memoization and bounded backtracking, producing a concrete syntax tree
//! ([Node]) whose nodes are labelled with production names and carry their covering
//! token spans.
//!
//! # Overview
//! A grammar is registered into a [Syntax] as a set of named productions built from
//! five combinators: a single-token match ([primitive](Syntax::primitive)), an
//! always-succeeding wrapper ([optional](Syntax::optional)), zero-or-more repetition
//! ([sequence](Syntax::sequence)), a fixed ordered list ([group](Syntax::group)) and
//! an alternation resolved by longest match ([union](Syntax::union)). Productions
//! reference each other by name and are resolved lazily, so forward references and
//! cyclic group/union chains are permitted.
//!
//! Every production is represented by a generator, a stateless descriptor which can
//! report whether a parser may be instantiated in a given context
//! ([can_create](production::Generator::can_create)), instantiate one
//! ([create](production::Generator::create)), and answer membership queries about the
//! node types it produces ([member](production::Generator::member)). The parsers it
//! creates are one-shot, step-driven state machines fed one token at a time through
//! [IParser::parse]. Left recursion is avoided with an excluded-types context
//! threaded through generator calls, combined with an init node: a pre-parsed tree
//! offered to a generator as a potential leading element.
//!
//! A [TokenCache] memoizes both successful sub-trees and hard failures per
//! (token, production) pair, bounding the work of the backtracking engine. The
//! [DefaultParser] driver feeds tokens from an [ILexer] into a root parser, feeds
//! the end-of-file sentinel exactly once, and applies an optional post-parse pass
//! (separator dropping and per-production node rewriting) to the finished tree.
//!
//! # Example
//!
//! A left-factored sum grammar. The `sum` group names `expr` as its own first item;
//! the engine parses `1 + 2 + 3` into a left-leaning tree without descending
//! infinitely.
//!
//! ```
//! use lang_ge::lexeme::{Pattern, Tokenizer};
//! use lang_ge::{Code, DefaultParser, Syntax, TokenImpl};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! pub enum SumToken {
//!     None,
//!     Eof,
//!     Space,
//!     Int,
//!     Plus,
//! }
//!
//! impl TokenImpl for SumToken {
//!     fn eof() -> Self {
//!         SumToken::Eof
//!     }
//!     fn no_token() -> Self {
//!         SumToken::None
//!     }
//! }
//!
//! let mut syntax = Syntax::new();
//! syntax
//!     .primitive("int", SumToken::Int)
//!     .primitive("plus", SumToken::Plus)
//!     .group("sum", &["expr", "plus", "int"])
//!     .union("expr", &["sum", "int"]);
//!
//! let tokenizer = Tokenizer::new(vec![
//!     Pattern::new(SumToken::Space, r"^\s+").unwrap(),
//!     Pattern::new(SumToken::Int, r"^[0-9]+").unwrap(),
//!     Pattern::new(SumToken::Plus, r"^\+").unwrap(),
//! ])
//! .skip(SumToken::Space);
//!
//! let parser = DefaultParser::new(syntax, "expr").unwrap();
//! let code = Code::from("1 + 2 + 3");
//! let tokens = tokenizer.tokenize(&code).unwrap();
//! let tree = parser.parse_tokens(tokens).unwrap();
//!
//! assert_eq!(tree.node_type, "sum");
//! assert_eq!(tree.nodes.len(), 3);
//! assert_eq!(tree.nodes[0].node_type, "sum");
//! ```

mod cache;
mod code;
mod error;
pub mod examples;
mod impl_default;
pub mod lexeme;
mod node;
mod parse_result;
mod parsing;
mod position;
pub mod production;
mod syntax;
mod token;
mod trace;

use once_cell::unsync::OnceCell;
use production::Generator;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A trait implemented by the lexical token tags a grammar is written over.
///
/// Two tags are reserved: [eof](TokenImpl::eof) is fed to the root parser exactly
/// once when the lexer is exhausted, and [no_token](TokenImpl::no_token) marks the
/// leading token of nodes which cover no input at all.
pub trait TokenImpl: Copy + Debug + Eq + Hash + Ord + 'static {
    fn eof() -> Self;
    fn no_token() -> Self;
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// Element of the tokenized input: a tag plus the utf-8 byte span it covers.
///
/// Tokens are compared by value. The full value, tag and span together, keys the
/// [TokenCache], so identical text at different positions is never conflated.
pub struct Token<TL> {
    pub token: TL,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Concrete syntax tree element labelled with the name of the production that
/// parsed it.
///
/// An empty `node_type` denotes the zero node, the sentinel for "no node". The
/// covering tokens of a branch node are exactly the concatenation of its
/// children's tokens; collection parsers drop zero-valued children at append
/// time, so a zero node never appears inside a finished tree.
///
/// Only leaves produced by a primitive cover their own leading token. For an
/// empty collection the leading token is an anchor, the first token the
/// collection did not consume, and contributes nothing to the covered span.
pub struct Node<TL> {
    pub node_type: &'static str,
    pub token: Token<TL>,
    pub nodes: Vec<Node<TL>>,
    pub(crate) leaf: bool,
}

#[derive(Debug, Clone)]
/// The outcome of one [IParser::parse] step.
///
/// While `accepting` is set the parser wants the next token and the remaining
/// fields carry no meaning. Once done, `valid` tells whether the parse succeeded,
/// `node` holds the produced tree (zero on failure), and every token in `unparsed`
/// must be re-fed, in order, to whatever parser the caller constructs next.
/// `from_cache` warns the caller that the node may cover tokens it has not yet
/// supplied and a skip is needed.
pub struct ParseResult<TL> {
    pub accepting: bool,
    pub valid: bool,
    pub from_cache: bool,
    pub node: Node<TL>,
    pub unparsed: Vec<Token<TL>>,
}

/// A one-shot parsing state machine instantiated from a generator for a single
/// parse attempt of a single production.
///
/// Calling [parse](IParser::parse) again after a result with `accepting` unset is a
/// programming error and panics.
pub trait IParser<TL: TokenImpl> {
    fn parse(
        &mut self,
        syntax: &Syntax<TL>,
        cache: &mut TokenCache<TL>,
        t: Token<TL>,
    ) -> Result<ParseResult<TL>, GrammarError>;
}

/// The lexer contract consumed by the [DefaultParser] driver.
///
/// `Ok(None)` signals exhaustion; the driver then feeds the end-of-file sentinel
/// to the root parser on its own.
pub trait ILexer<TL: TokenImpl> {
    fn next(&mut self) -> Result<Option<Token<TL>>, ParseError<TL>>;
}

/// The production registry: a mapping from production names to their generators.
///
/// References between productions are resolved lazily at use time, never as
/// pointer cycles. The registry must be fully populated before the first parse;
/// mutating it afterwards is undefined because unions memoize their flattened
/// element lists.
pub struct Syntax<TL: TokenImpl> {
    productions: HashMap<&'static str, Generator<TL>>,
}

/// Memoized outcomes for a single token position.
pub struct CacheItem<TL: TokenImpl> {
    matches: HashMap<&'static str, Node<TL>>,
    failures: HashSet<&'static str>,
}

/// Per-token memoization of parsed sub-trees and known failures, scoped to one
/// parse invocation.
///
/// The driver builds a fresh cache per invocation; sharing one across lexer runs
/// is unsound because token identity is positional.
pub struct TokenCache<TL: TokenImpl> {
    items: HashMap<Token<TL>, CacheItem<TL>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// Verbosity of the hierarchical parse trace.
pub enum TraceLevel {
    Off,
    On,
    Debug,
}

#[derive(Debug, Clone)]
/// Hierarchical debug logging context carried by every parser.
///
/// The path records the chain of production names from the root down to the
/// current parser. Message construction is deferred to closures so nothing is
/// formatted while the level is [Off](TraceLevel::Off).
pub struct Trace {
    level: TraceLevel,
    path: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A structural defect in the grammar definition, detected as soon as the
/// offending generator is first touched.
pub enum GrammarError {
    UnspecifiedProduction(&'static str),
    OptionalContainingSelf(&'static str),
    SequenceContainingSelf(&'static str),
    GroupWithoutItems(&'static str),
    UnionWithoutElements(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An error returned when a parse invocation fails.
///
/// Input errors are produced only by the driver; the combinators communicate
/// failure through an invalid [ParseResult] instead.
pub enum ParseError<TL> {
    InvalidRootProduction,
    UnexpectedEof,
    UnexpectedToken {
        scope: &'static str,
        token: Token<TL>,
    },
    Lexical {
        pointer: usize,
        message: String,
    },
    Grammar(GrammarError),
}

/// A node rewriting function applied bottom-up after a successful parse.
pub type PostParseFn<TL> = Box<dyn Fn(Node<TL>) -> Node<TL>>;

/// A predicate selecting separator nodes to be dropped after a successful parse.
pub type SeparatorFn<TL> = Box<dyn Fn(&Node<TL>) -> bool>;

/// The parsing driver: holds a root production, feeds tokens from an [ILexer]
/// into the root parser, and applies the configured post-parse pass to the
/// finished tree.
pub struct DefaultParser<TL: TokenImpl> {
    syntax: Syntax<TL>,
    root: &'static str,
    trace_level: TraceLevel,
    post_parse: HashMap<&'static str, PostParseFn<TL>>,
    separator: Option<SeparatorFn<TL>>,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// The line and column information at a code point.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A wrapper for the input text to be tokenized, with lazily indexed line
/// information.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}
