use crate::examples::json::{json_parser, json_tokenizer};
use crate::Code;

fn parse(input: &str) -> Result<crate::Node<super::json::JsonToken>, String> {
    let parser = json_parser();
    let tokenizer = json_tokenizer();
    let code = Code::from(input);
    let tokens = tokenizer.tokenize(&code).map_err(|err| format!("{}", err))?;
    parser
        .parse_tokens(tokens)
        .map_err(|err| format!("{}", err))
}

#[test]
fn json_object_test() {
    let tree = parse(r#"{"a":2,"b":[true,null],"c":"d"}"#).unwrap();

    assert_eq!(tree.node_type, "object");

    let entries = tree.get_child("entries").unwrap();
    let entry_types: Vec<&str> = entries.nodes.iter().map(|n| n.node_type).collect();
    assert_eq!(entry_types, vec!["entry", "entry", "entry"]);

    // separators are dropped, so an entry is a key node and a value node
    let first = &entries.nodes[0];
    assert_eq!(first.nodes.len(), 2);
    assert_eq!(first.nodes[0].node_type, "string");
    assert_eq!(first.nodes[1].node_type, "number");

    let second = &entries.nodes[1];
    assert_eq!(second.nodes[1].node_type, "array");
    let elements = second.nodes[1].get_child("elements").unwrap();
    assert_eq!(elements.nodes.len(), 2);
    assert!(elements.nodes.iter().all(|n| n.node_type == "constant"));
}

#[test]
fn json_array_test() {
    let tree = parse("[1, 2, 3]").unwrap();

    assert_eq!(tree.node_type, "array");
    let elements = tree.get_child("elements").unwrap();
    assert_eq!(elements.nodes.len(), 3);
    assert!(elements.nodes.iter().all(|n| n.node_type == "number"));
}

#[test]
fn json_empty_containers_test() {
    let tree = parse("{}").unwrap();
    assert_eq!(tree.node_type, "object");
    assert!(tree.nodes.is_empty());

    let tree = parse("[]").unwrap();
    assert_eq!(tree.node_type, "array");
    assert!(tree.nodes.is_empty());
}

#[test]
fn json_scalar_test() {
    assert_eq!(parse("42").unwrap().node_type, "number");
    assert_eq!(parse(r#""hi""#).unwrap().node_type, "string");
    assert_eq!(parse("null").unwrap().node_type, "constant");
}

#[test]
fn json_post_parse_idempotent_test() {
    let parser = json_parser();
    let tokenizer = json_tokenizer();
    let code = Code::from(r#"{"a":[1,2],"b":{"c":null}}"#);
    let tokens = tokenizer.tokenize(&code).unwrap();

    let tree = parser.parse_tokens(tokens).unwrap();
    let again = parser.post_parse_node(tree.clone());
    assert_eq!(tree, again);
}

#[test]
fn json_matches_serde_test() {
    let inputs = [
        "{}",
        "[]",
        r#""hi""#,
        "42",
        "-3.5e2",
        "true",
        "[1,2,3]",
        r#"{"a":1}"#,
        r#"{"a":{"b":[1,2,"x"],"c":null}}"#,
        "[[],{}]",
        " [ 1 , 2 ] ",
        "",
        "{",
        "[1,",
        r#"{"a"}"#,
        r#"{"a":}"#,
        r#"{"a":1,}"#,
        "1 2",
        "[1 2]",
        "{,}",
        ":",
        "}",
    ];

    for input in inputs {
        let expected = serde_json::from_str::<serde_json::Value>(input).is_ok();
        let got = parse(input).is_ok();
        assert_eq!(
            got, expected,
            "disagreement with serde_json on {:?}",
            input
        );
    }
}
