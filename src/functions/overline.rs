use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, OverlineNode, ParseNode},
};

use super::{
    take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let overline = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(overline_handler)),
    });
    fns.insert("\\overline", overline);
}

fn overline_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_overline(mode, body.into_node(ctx.func_name, mode)?))
}

pub fn build_overline(mode: Mode, body: ParseNode) -> ParseNode {
    ParseNode::Overline(OverlineNode {
        body: Box::new(wrap_ord_group(mode, body)),
        info: NodeInfo::new_mode(mode),
    })
}
