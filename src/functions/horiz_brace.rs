use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{HorizBraceNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let horiz_brace = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(horiz_brace_handler)),
    });
    fns.insert_for_all_str(["\\overbrace", "\\underbrace"], horiz_brace);
}

fn horiz_brace_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [base] = take_args(ctx.func_name, mode, args)?;
    Ok(build_horiz_brace(
        mode,
        ctx.func_name.to_string(),
        base.into_node(ctx.func_name, mode)?,
    ))
}

pub fn build_horiz_brace(
    mode: Mode,
    label: impl Into<Cow<'static, str>>,
    base: ParseNode,
) -> ParseNode {
    let label = label.into();
    ParseNode::HorizBrace(HorizBraceNode {
        is_over: label.starts_with("\\over"),
        label,
        base: Box::new(base),
        info: NodeInfo::new_mode(mode),
    })
}
