use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    parse_node::{ColorNode, NodeInfo, ParseNode},
    util::{ArgType, SourceLocation},
};

use super::{
    ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

/// `#abc`, `#aabbcc` (the `#` is optional) or a color name
static COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:#?(?:[a-f0-9]{3}|[a-f0-9]{6})|[a-z]+)$").unwrap());

const NAMED_COLORS: &[&str] = &[
    "\\blue", "\\orange", "\\pink", "\\red", "\\green", "\\gray", "\\purple",
    "\\blueA", "\\blueB", "\\blueC", "\\blueD", "\\blueE",
    "\\tealA", "\\tealB", "\\tealC", "\\tealD", "\\tealE",
    "\\greenA", "\\greenB", "\\greenC", "\\greenD", "\\greenE",
    "\\goldA", "\\goldB", "\\goldC", "\\goldD", "\\goldE",
    "\\redA", "\\redB", "\\redC", "\\redD", "\\redE",
    "\\maroonA", "\\maroonB", "\\maroonC", "\\maroonD", "\\maroonE",
    "\\purpleA", "\\purpleB", "\\purpleC", "\\purpleD", "\\purpleE",
    "\\mintA", "\\mintB", "\\mintC",
    "\\grayA", "\\grayB", "\\grayC", "\\grayD", "\\grayE",
    "\\grayF", "\\grayG", "\\grayH", "\\grayI",
    "\\kaBlue", "\\kaGreen",
];

pub fn add_functions(fns: &mut Functions) {
    let text_color = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(2)
            .with_allowed_in_text(true)
            .with_greediness(3)
            .with_arg_types(&[ArgType::Color, ArgType::Original] as &[_]),
        handler: Some(Box::new(text_color_handler)),
    });
    fns.insert("\\textcolor", text_color);

    // The body of \color is the rest of the group, gathered by the parser
    let color = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_allowed_in_text(true)
            .with_greediness(3)
            .with_arg_types(&[ArgType::Color] as &[_]),
        handler: None,
    });
    fns.insert("\\color", color);

    let named = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_allowed_in_text(true)
            .with_greediness(3),
        handler: Some(Box::new(named_color_handler)),
    });
    fns.insert_for_all_str(NAMED_COLORS.iter().copied(), named);
}

fn text_color_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [color, body] = take_args(ctx.func_name, mode, args)?;
    let (color, loc) = color.into_str(ctx.func_name, mode)?;
    let color = check_color(color, loc, ctx.parser.conf.color_validation)?;
    Ok(build_color(
        mode,
        color,
        ord_argument(body.into_node(ctx.func_name, mode)?),
    ))
}

fn named_color_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_named_color(
        mode,
        ctx.func_name,
        ord_argument(body.into_node(ctx.func_name, mode)?),
    ))
}

/// Check a color argument against the color grammar
pub(crate) fn check_color(
    color: String,
    loc: Option<SourceLocation>,
    validate: bool,
) -> Result<String, ParseError> {
    if validate && !COLOR_REGEX.is_match(&color) {
        return Err(ParseError::with_loc(ParseErrorKind::InvalidColor(color), loc));
    }

    Ok(color)
}

pub fn build_color(mode: Mode, color: impl Into<String>, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Color(ColorNode {
        color: color.into(),
        body,
        info: NodeInfo::new_mode(mode),
    })
}

/// `\blueA{x}` is the color `katex-blueA`
pub fn build_named_color(mode: Mode, command: &str, body: Vec<ParseNode>) -> ParseNode {
    let name = command.strip_prefix('\\').unwrap_or(command);
    build_color(mode, format!("katex-{name}"), body)
}
