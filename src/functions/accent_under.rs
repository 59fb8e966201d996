use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{AccentUnderNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

const UNDER_ACCENTS: &[&str] = &[
    "\\underleftarrow",
    "\\underrightarrow",
    "\\underleftrightarrow",
    "\\undergroup",
    "\\underlinesegment",
    "\\undertilde",
];

pub fn add_functions(fns: &mut Functions) {
    let accent_under = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(accent_under_handler)),
    });
    fns.insert_for_all_str(UNDER_ACCENTS.iter().copied(), accent_under);
}

fn accent_under_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [base] = take_args(ctx.func_name, mode, args)?;
    Ok(build_accent_under(
        mode,
        ctx.func_name.to_string(),
        base.into_node(ctx.func_name, mode)?,
    ))
}

pub fn build_accent_under(
    mode: Mode,
    label: impl Into<Cow<'static, str>>,
    base: ParseNode,
) -> ParseNode {
    ParseNode::AccentUnder(AccentUnderNode {
        label: label.into(),
        base: Box::new(base),
        info: NodeInfo::new_mode(mode),
    })
}
