use crate::{
    DefaultParser, GrammarError, ParseError, Syntax, Token, TokenImpl, TraceLevel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum T {
    None,
    Eof,
    A,
    B,
    C,
    Q,
    Int,
    Plus,
    LParen,
    RParen,
}

impl TokenImpl for T {
    fn eof() -> Self {
        T::Eof
    }
    fn no_token() -> Self {
        T::None
    }
}

fn tokens(tags: &[T]) -> Vec<Token<T>> {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| Token::new(*tag, i, i + 1))
        .collect()
}

#[test]
fn primitive_match_test() {
    let mut syntax = Syntax::new();
    syntax.primitive("int", T::Int);

    let parser = DefaultParser::new(syntax, "int").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::Int])).unwrap();

    assert_eq!(tree.node_type, "int");
    assert_eq!(tree.token.token, T::Int);
    assert!(tree.nodes.is_empty());
}

#[test]
fn empty_sequence_test() {
    let mut syntax = Syntax::new();
    syntax.primitive("int", T::Int).sequence("ints", "int");

    let parser = DefaultParser::new(syntax, "ints").unwrap();
    let tree = parser.parse_tokens(Vec::new()).unwrap();

    assert_eq!(tree.node_type, "ints");
    assert!(tree.nodes.is_empty());
    // an empty sequence is anchored at the token it did not consume
    assert!(tree.token.is_eof());
}

#[test]
fn sequence_repetition_test() {
    let mut syntax = Syntax::new();
    syntax.primitive("int", T::Int).sequence("ints", "int");

    let parser = DefaultParser::new(syntax, "ints").unwrap();
    let tree = parser
        .parse_tokens(tokens(&[T::Int, T::Int, T::Int]))
        .unwrap();

    assert_eq!(tree.node_type, "ints");
    assert_eq!(tree.nodes.len(), 3);
    assert!(tree.nodes.iter().all(|n| n.node_type == "int"));
    assert_eq!(tree.token, tree.nodes[0].token);
}

#[test]
fn group_items_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("lp", T::LParen)
        .primitive("rp", T::RParen)
        .primitive("int", T::Int)
        .group("parens", &["lp", "int", "rp"]);

    let parser = DefaultParser::new(syntax, "parens").unwrap();
    let tree = parser
        .parse_tokens(tokens(&[T::LParen, T::Int, T::RParen]))
        .unwrap();

    assert_eq!(tree.node_type, "parens");
    let child_types: Vec<&str> = tree.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(child_types, vec!["lp", "int", "rp"]);
    assert_eq!(tree.token.token, T::LParen);
}

#[test]
fn union_longest_match_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("a", T::A)
        .primitive("b", T::B)
        .group("ab", &["a", "b"])
        .union("expr", &["a", "ab"]);

    let parser = DefaultParser::new(syntax, "expr").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::A, T::B])).unwrap();

    // both "a" and "ab" match at the first token; the longer span wins
    assert_eq!(tree.node_type, "ab");
    assert_eq!(tree.nodes.len(), 2);
}

#[test]
fn union_tie_first_declared_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("x", T::A)
        .primitive("y", T::A)
        .union("u", &["x", "y"]);

    let parser = DefaultParser::new(syntax, "u").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::A])).unwrap();

    assert_eq!(tree.node_type, "x");
}

#[test]
fn nested_union_flattening_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("a", T::A)
        .primitive("b", T::B)
        .primitive("c", T::C)
        .union("x", &["a", "b"])
        .union("y", &["x", "c"]);

    let parser = DefaultParser::new(syntax, "y").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::C])).unwrap();

    // "c" is reached through flattening, not wrapped in an "x" node
    assert_eq!(tree.node_type, "c");
    assert!(tree.nodes.is_empty());
}

#[test]
fn union_self_reference_dropped_test() {
    let mut syntax = Syntax::new();
    syntax.primitive("a", T::A).union("u", &["u", "a"]);

    let parser = DefaultParser::new(syntax, "u").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::A])).unwrap();

    assert_eq!(tree.node_type, "a");
}

#[test]
fn cached_item_skip_reconciliation_test() {
    // "e" succeeds under the failing "g1" first, so the retry through "g2"
    // is served from the cache and the surrounding queue and skip counter
    // must still advance by exactly the covered token count
    let mut syntax = Syntax::new();
    syntax
        .primitive("a", T::A)
        .primitive("b", T::B)
        .primitive("p", T::C)
        .primitive("q", T::Q)
        .group("e", &["a", "b"])
        .group("g1", &["e", "p"])
        .group("g2", &["e", "q"])
        .union("u", &["g1", "g2"]);

    let parser = DefaultParser::new(syntax, "u").unwrap();
    let tree = parser.parse_tokens(tokens(&[T::A, T::B, T::Q])).unwrap();

    assert_eq!(tree.node_type, "g2");
    let child_types: Vec<&str> = tree.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(child_types, vec!["e", "q"]);
    let e = &tree.nodes[0];
    assert_eq!(e.nodes.len(), 2);
    assert_eq!(tree.length(), 3);
}

#[test]
fn left_factored_expression_test() {
    // "sum" names "expr" as its own first item; the init mechanism turns the
    // left-recursive shape into a left-leaning tree
    let mut syntax = Syntax::new();
    syntax
        .primitive("int", T::Int)
        .primitive("plus", T::Plus)
        .group("sum", &["expr", "plus", "int"])
        .union("expr", &["sum", "int"]);

    let parser = DefaultParser::new(syntax, "expr").unwrap();
    let tree = parser
        .parse_tokens(tokens(&[T::Int, T::Plus, T::Int, T::Plus, T::Int]))
        .unwrap();

    assert_eq!(tree.node_type, "sum");
    assert_eq!(tree.length(), 5);
    assert_eq!(tree.nodes.len(), 3);
    assert_eq!(tree.nodes[0].node_type, "sum");
    assert_eq!(tree.nodes[0].nodes.len(), 3);
    assert_eq!(tree.nodes[0].nodes[0].node_type, "int");
}

#[test]
fn optional_empty_result_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("int", T::Int)
        .optional("maybe-int", "int");

    let parser = DefaultParser::new(syntax, "maybe-int").unwrap();

    let tree = parser.parse_tokens(Vec::new()).unwrap();
    assert!(tree.is_zero());

    // the optional never relabels a successful inner parse
    let tree = parser.parse_tokens(tokens(&[T::Int])).unwrap();
    assert_eq!(tree.node_type, "int");
}

#[test]
fn optional_in_group_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("int", T::Int)
        .primitive("a", T::A)
        .optional("maybe-int", "int")
        .group("g", &["maybe-int", "a"]);

    let parser = DefaultParser::new(syntax, "g").unwrap();

    let tree = parser.parse_tokens(tokens(&[T::A])).unwrap();
    let child_types: Vec<&str> = tree.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(child_types, vec!["a"]);

    let tree = parser.parse_tokens(tokens(&[T::Int, T::A])).unwrap();
    let child_types: Vec<&str> = tree.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(child_types, vec!["int", "a"]);
}

#[test]
fn repeated_parse_same_tree_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("a", T::A)
        .primitive("b", T::B)
        .group("ab", &["a", "b"])
        .union("expr", &["a", "ab"]);

    let parser = DefaultParser::new(syntax, "expr").unwrap();

    // each invocation builds its own cache; results must not depend on it
    let first = parser.parse_tokens(tokens(&[T::A, T::B])).unwrap();
    let second = parser.parse_tokens(tokens(&[T::A, T::B])).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unspecified_production_test() {
    let mut syntax = Syntax::<T>::new();
    syntax.optional("o", "missing");

    let parser = DefaultParser::new(syntax, "o").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::UnspecifiedProduction("missing"))) => {}
        other => panic!("expected unspecified production error, got {:?}", other),
    }
}

#[test]
fn optional_containing_self_test() {
    let mut syntax = Syntax::<T>::new();
    syntax.optional("o", "o");

    let parser = DefaultParser::new(syntax, "o").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::OptionalContainingSelf("o"))) => {}
        other => panic!("expected optional containing self error, got {:?}", other),
    }
}

#[test]
fn sequence_containing_self_test() {
    let mut syntax = Syntax::<T>::new();
    syntax.sequence("s", "s");

    let parser = DefaultParser::new(syntax, "s").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::SequenceContainingSelf("s"))) => {}
        other => panic!("expected sequence containing self error, got {:?}", other),
    }
}

#[test]
fn group_without_items_test() {
    let mut syntax = Syntax::<T>::new();
    syntax.group("g", &[]);

    let parser = DefaultParser::new(syntax, "g").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::GroupWithoutItems("g"))) => {}
        other => panic!("expected group without items error, got {:?}", other),
    }
}

#[test]
fn union_without_elements_test() {
    let mut syntax = Syntax::<T>::new();
    syntax.union("u", &[]);

    let parser = DefaultParser::new(syntax, "u").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::UnionWithoutElements("u"))) => {}
        other => panic!("expected union without elements error, got {:?}", other),
    }

    // a union naming only itself expands to nothing
    let mut syntax = Syntax::<T>::new();
    syntax.union("v", &["v"]);

    let parser = DefaultParser::new(syntax, "v").unwrap();
    match parser.parse_tokens(Vec::new()) {
        Err(ParseError::Grammar(GrammarError::UnionWithoutElements("v"))) => {}
        other => panic!("expected union without elements error, got {:?}", other),
    }
}

#[test]
fn unexpected_token_test() {
    let mut syntax = Syntax::new();
    syntax.primitive("int", T::Int);

    let parser = DefaultParser::new(syntax, "int").unwrap();
    match parser.parse_tokens(tokens(&[T::Int, T::Int])) {
        Err(ParseError::UnexpectedToken { scope: "int", token }) => {
            assert_eq!(token.start, 1);
        }
        other => panic!("expected unexpected token error, got {:?}", other),
    }
}

#[test]
fn unexpected_eof_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("lp", T::LParen)
        .primitive("rp", T::RParen)
        .primitive("int", T::Int)
        .group("parens", &["lp", "int", "rp"]);

    let parser = DefaultParser::new(syntax, "parens").unwrap();
    match parser.parse_tokens(tokens(&[T::LParen, T::Int])) {
        Err(ParseError::UnexpectedEof) => {}
        other => panic!("expected unexpected eof error, got {:?}", other),
    }
}

#[test]
fn trace_output_test() {
    let mut syntax = Syntax::new();
    syntax
        .primitive("a", T::A)
        .primitive("b", T::B)
        .group("ab", &["a", "b"]);

    let mut parser = DefaultParser::new(syntax, "ab").unwrap();
    parser.set_trace_level(TraceLevel::Debug);

    let tree = parser.parse_tokens(tokens(&[T::A, T::B])).unwrap();
    assert_eq!(tree.node_type, "ab");
}
