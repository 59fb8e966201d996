use mathast::{
    functions::{color::build_color, smash::build_smash},
    parse_node::{MathOrdNode, NodeInfo, OrdGroupNode, TextNode, TextOrdNode},
    parse_tree, parse_tree_with_warnings, EqNoLoc, Mode, ParseErrorKind, ParseNode,
    ParserConfig, StrictMode,
};

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

/// An unknown command as it is shown when errors are not thrown
fn error_text(color: &str, command: &str) -> ParseNode {
    let body = command
        .chars()
        .map(|ch| {
            ParseNode::TextOrd(TextOrdNode {
                text: ch.to_string(),
                info: NodeInfo::new_mode(Mode::Text),
            })
        })
        .collect();
    build_color(
        Mode::Math,
        color,
        vec![ParseNode::Text(TextNode {
            body,
            font: None,
            info: NodeInfo::new_mode(Mode::Text),
        })],
    )
}

#[test]
fn defaults() {
    let conf = ParserConfig::default();
    assert_eq!(conf.max_expand, Some(1000));
    assert_eq!(conf.strict, StrictMode::Warn);
    assert!(conf.macros.is_empty());
    assert!(conf.color_validation);
    assert_eq!(conf.max_nesting_depth, 100);
    assert!(!conf.color_is_text_color);
    assert!(conf.throw_on_error);
    assert_eq!(conf.error_color, "#cc0000");
}

#[test]
fn unknown_commands_can_be_kept() {
    let conf = ParserConfig {
        throw_on_error: false,
        ..ParserConfig::default()
    };
    let tree = parse_tree(r"a\foo b", conf).unwrap();
    let expected = vec![ord("a"), error_text("#cc0000", "\\foo"), ord("b")];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");
    assert_eq!(tree[1].loc().map(|loc| loc.0), Some(1..5));
}

#[test]
fn error_color_is_configurable() {
    let conf = ParserConfig {
        throw_on_error: false,
        error_color: "#ff00ff".to_string(),
        ..ParserConfig::default()
    };
    let tree = parse_tree(r"\foo", conf).unwrap();
    assert!(tree.eq_no_loc(&vec![error_text("#ff00ff", "\\foo")]));
}

#[test]
fn other_errors_are_still_thrown() {
    let conf = ParserConfig {
        throw_on_error: false,
        ..ParserConfig::default()
    };
    let err = parse_tree(r"x^1^2", conf).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DoubleSuperscript);
}

#[test]
fn color_as_text_color() {
    let conf = ParserConfig {
        color_is_text_color: true,
        ..ParserConfig::default()
    };
    let tree = parse_tree(r"\color{red}{x}y", conf).unwrap();
    let expected = vec![build_color(Mode::Math, "red", vec![ord("x")]), ord("y")];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");

    let tree = parse_tree(r"\color{red}{x}y", ParserConfig::default()).unwrap();
    let expected = vec![build_color(
        Mode::Math,
        "red",
        vec![group(vec![ord("x")]), ord("y")],
    )];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");
}

#[test]
fn bad_smash_option_follows_strictness() {
    let (tree, warnings) =
        parse_tree_with_warnings(r"\smash[x]{y}", ParserConfig::default()).unwrap();
    let expected = vec![build_smash(Mode::Math, group(vec![ord("y")]), false, false)];
    assert!(tree.eq_no_loc(&expected), "got {tree:#?}");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "invalidSmashOption");

    let conf = ParserConfig {
        strict: StrictMode::Error,
        ..ParserConfig::default()
    };
    let err = parse_tree(r"\smash[x]{y}", conf).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidSmashOption('x'));
}

#[test]
fn unlimited_expansion() {
    let conf = ParserConfig {
        max_expand: None,
        macros: [(r"\X".to_string(), "x".to_string())].into_iter().collect(),
        ..ParserConfig::default()
    };
    let expr = r"\X".repeat(2000);
    assert_eq!(parse_tree(&expr, conf).unwrap().len(), 2000);
}

#[test]
fn reads_config_from_toml() {
    let conf: ParserConfig = toml::from_str(
        r##"
        maxExpand = 20
        strict = "error"
        colorIsTextColor = true
        throwOnError = false
        errorColor = "#123456"
        maxNestingDepth = 64
        someFutureOption = "ignored"

        [macros]
        '\R' = '\mathbb{R}'
        "##,
    )
    .unwrap();

    assert_eq!(conf.max_expand, Some(20));
    assert_eq!(conf.strict, StrictMode::Error);
    assert!(conf.color_is_text_color);
    assert!(!conf.throw_on_error);
    assert_eq!(conf.error_color, "#123456");
    assert_eq!(conf.max_nesting_depth, 64);
    assert!(conf.color_validation);
    assert_eq!(conf.macros.get("\\R").map(String::as_str), Some("\\mathbb{R}"));
}

#[test]
fn reads_expansion_depth_alias() {
    let conf: ParserConfig = toml::from_str("maxExpansionDepth = 5").unwrap();
    assert_eq!(conf.max_expand, Some(5));

    let conf: ParserConfig = toml::from_str("").unwrap();
    assert_eq!(conf.max_expand, Some(1000));
    assert_eq!(conf.strict, StrictMode::Warn);
}
