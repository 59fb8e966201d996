use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, TextNode},
    util::ArgType,
};

use super::{
    font::text_font, ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec,
    Functions,
};

const TEXT_NAMES: &[&str] = &[
    "\\text",
    "\\textrm",
    "\\textsf",
    "\\texttt",
    "\\textnormal",
    "\\textbf",
    "\\textit",
];

pub fn add_functions(fns: &mut Functions) {
    let text = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_arg_types(&[ArgType::Mode(Mode::Text)] as &[_])
            .with_greediness(2)
            .with_allowed_in_text(true),
        handler: Some(Box::new(text_handler)),
    });
    fns.insert_for_all_str(TEXT_NAMES.iter().copied(), text);
}

fn text_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_text(
        mode,
        ctx.func_name,
        ord_argument(body.into_node(ctx.func_name, mode)?),
    ))
}

pub fn build_text(mode: Mode, command: &str, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Text(TextNode {
        body,
        font: text_font(command).map(Cow::Borrowed),
        info: NodeInfo::new_mode(mode),
    })
}
