use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, SqrtNode},
};

use super::{
    take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let sqrt = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_opt_args(1, 1),
        handler: Some(Box::new(sqrt_handler)),
    });
    fns.insert("\\sqrt", sqrt);
}

fn sqrt_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    let index = match opt_args.into_iter().next().flatten() {
        Some(index) => Some(index.into_node(ctx.func_name, mode)?),
        None => None,
    };
    Ok(build_sqrt(mode, body.into_node(ctx.func_name, mode)?, index))
}

/// The radicand is always an ordgroup; the index is kept as written
pub fn build_sqrt(mode: Mode, body: ParseNode, index: Option<ParseNode>) -> ParseNode {
    ParseNode::Sqrt(SqrtNode {
        body: Box::new(wrap_ord_group(mode, body)),
        index: index.map(Box::new),
        info: NodeInfo::new_mode(mode),
    })
}
