//! A JSON grammar assembled from the five combinators.
//!
//! Punctuation nodes are dropped as separators after the parse, and the
//! comma-chained continuation lists are flattened so that objects and arrays
//! carry their entries directly.

use crate::lexeme::{Pattern, Tokenizer};
use crate::{DefaultParser, Node, Syntax, TokenImpl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsonToken {
    None,
    Eof,
    Space,
    String,
    Number,
    Constant,
    Comma,
    Colon,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
}

impl TokenImpl for JsonToken {
    fn eof() -> Self {
        JsonToken::Eof
    }
    fn no_token() -> Self {
        JsonToken::None
    }
}

pub fn json_tokenizer() -> Tokenizer<JsonToken> {
    Tokenizer::new(vec![
        Pattern::new(JsonToken::Space, r"^\s+").unwrap(),
        Pattern::new(JsonToken::String, r#"^"([^"\\\r\n]|\\.)*""#).unwrap(),
        Pattern::new(
            JsonToken::Number,
            r"^-?([0-9]+)(\.[0-9]+)?([eE][+-]?[0-9]+)?",
        )
        .unwrap(),
        Pattern::new(JsonToken::Constant, r"^(true|false|null)").unwrap(),
        Pattern::new(JsonToken::Comma, r"^,").unwrap(),
        Pattern::new(JsonToken::Colon, r"^:").unwrap(),
        Pattern::new(JsonToken::OpenBrace, r"^\{").unwrap(),
        Pattern::new(JsonToken::CloseBrace, r"^\}").unwrap(),
        Pattern::new(JsonToken::OpenBracket, r"^\[").unwrap(),
        Pattern::new(JsonToken::CloseBracket, r"^\]").unwrap(),
    ])
    .skip(JsonToken::Space)
}

pub fn json_syntax() -> Syntax<JsonToken> {
    let mut syntax = Syntax::new();
    syntax
        .primitive("string", JsonToken::String)
        .primitive("number", JsonToken::Number)
        .primitive("constant", JsonToken::Constant)
        .primitive("comma", JsonToken::Comma)
        .primitive("colon", JsonToken::Colon)
        .primitive("open-brace", JsonToken::OpenBrace)
        .primitive("close-brace", JsonToken::CloseBrace)
        .primitive("open-bracket", JsonToken::OpenBracket)
        .primitive("close-bracket", JsonToken::CloseBracket)
        .union("value", &["string", "number", "constant", "object", "array"])
        .group("entry", &["string", "colon", "value"])
        .group("entry-cont", &["comma", "entry"])
        .sequence("entry-conts", "entry-cont")
        .group("entries", &["entry", "entry-conts"])
        .optional("entries-opt", "entries")
        .group("object", &["open-brace", "entries-opt", "close-brace"])
        .group("element-cont", &["comma", "value"])
        .sequence("element-conts", "element-cont")
        .group("elements", &["value", "element-conts"])
        .optional("elements-opt", "elements")
        .group("array", &["open-bracket", "elements-opt", "close-bracket"]);
    syntax
}

pub fn json_parser() -> DefaultParser<JsonToken> {
    let mut parser = DefaultParser::new(json_syntax(), "value").unwrap();

    parser
        .set_separator(|n| {
            matches!(
                n.node_type,
                "comma" | "colon" | "open-brace" | "close-brace" | "open-bracket" | "close-bracket"
            )
        })
        .set_post_parse("entries", flatten_continuations)
        .set_post_parse("elements", flatten_continuations);

    parser
}

/// Splice the children of continuation chains into the surrounding list node.
/// Applying it to an already flattened node changes nothing.
fn flatten_continuations(mut n: Node<JsonToken>) -> Node<JsonToken> {
    let mut flat = Vec::with_capacity(n.nodes.len());

    for child in std::mem::take(&mut n.nodes) {
        match child.node_type {
            "entry-conts" | "element-conts" => {
                for cont in child.nodes {
                    flat.extend(cont.nodes);
                }
            }
            _ => flat.push(child),
        }
    }

    n.nodes = flat;
    n
}
