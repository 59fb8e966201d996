use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, UnderlineNode},
};

use super::{
    take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let underline = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(underline_handler)),
    });
    fns.insert("\\underline", underline);
}

fn underline_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_underline(mode, body.into_node(ctx.func_name, mode)?))
}

pub fn build_underline(mode: Mode, body: ParseNode) -> ParseNode {
    ParseNode::Underline(UnderlineNode {
        body: Box::new(wrap_ord_group(mode, body)),
        info: NodeInfo::new_mode(mode),
    })
}
