use std::collections::HashMap;

use mathast::{
    functions::{font::build_font, genfrac::{build_genfrac, FracKind}},
    parse_node::{MathOrdNode, NodeInfo, OrdGroupNode},
    parse_tree, EqNoLoc, Mode, ParseErrorKind, ParseNode, ParserConfig,
};

fn with_macros(macros: &[(&str, &str)]) -> ParserConfig {
    ParserConfig {
        macros: macros
            .iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect::<HashMap<_, _>>(),
        ..ParserConfig::default()
    }
}

fn ord(text: &str) -> ParseNode {
    ParseNode::MathOrd(MathOrdNode {
        text: text.to_string(),
        info: NodeInfo::new_mode(Mode::Math),
    })
}

fn group(body: Vec<ParseNode>) -> ParseNode {
    ParseNode::OrdGroup(OrdGroupNode {
        body,
        info: NodeInfo::new_mode(Mode::Math),
    })
}

fn texts(tree: &[ParseNode]) -> Vec<&str> {
    tree.iter().map(|node| node.text().unwrap_or("?")).collect()
}

#[test]
fn expands_plain_macros() {
    let tree = parse_tree(r"\R", with_macros(&[(r"\R", r"\mathbb{R}")])).unwrap();
    let expected = vec![build_font(Mode::Math, "\\mathbb", group(vec![ord("R")]))];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");
}

#[test]
fn expands_macro_arguments() {
    let conf = with_macros(&[(r"\pair", "(#1,#2)")]);
    let tree = parse_tree(r"\pair{a}b", conf).unwrap();
    assert_eq!(texts(&tree), vec!["(", "a", ",", "b", ")"]);
}

#[test]
fn braced_arguments_keep_their_tokens() {
    let conf = with_macros(&[(r"\half", r"\frac{#1}{2}")]);
    let tree = parse_tree(r"\half{xy}", conf).unwrap();
    let expected = vec![build_genfrac(
        Mode::Math,
        FracKind::Frac,
        group(vec![ord("x"), ord("y")]),
        group(vec![ParseNode::TextOrd(mathast::parse_node::TextOrdNode {
            text: "2".to_string(),
            info: NodeInfo::new_mode(Mode::Math),
        })]),
    )];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");
}

#[test]
fn macros_expand_recursively() {
    let conf = with_macros(&[(r"\a", r"\b\b"), (r"\b", "x")]);
    let tree = parse_tree(r"\a", conf).unwrap();
    assert_eq!(texts(&tree), vec!["x", "x"]);
}

#[test]
fn expanded_tokens_point_at_the_invocation() {
    let conf = with_macros(&[(r"\X", "x")]);
    let tree = parse_tree(r"a\X", conf).unwrap();
    assert_eq!(tree[1].loc().map(|loc| loc.0), Some(1..3));
}

#[test]
fn stops_infinite_expansion() {
    let err = parse_tree(r"\loop", with_macros(&[(r"\loop", r"\loop")])).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyExpansions);

    let conf = ParserConfig {
        max_expand: Some(3),
        ..with_macros(&[(r"\X", "x")])
    };
    assert!(parse_tree(r"\X\X\X", conf.clone()).is_ok());
    let err = parse_tree(r"\X\X\X\X", conf).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyExpansions);
}

#[test]
fn missing_macro_argument() {
    let err = parse_tree(r"\id", with_macros(&[(r"\id", "#1")])).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::Expected {
            expected: "macro argument".to_string(),
            found: "EOF".to_string(),
        }
    );
}
