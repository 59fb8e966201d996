use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{KernNode, NodeInfo, ParseNode},
    unit::Measurement,
    util::ArgType,
};

use super::{
    rule::size_arg, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    // TeX only takes mu units for \mkern and rejects them for \kern; both accept any unit here
    let kern = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1).with_arg_types(&[ArgType::Size] as &[_]),
        handler: Some(Box::new(kern_handler)),
    });
    fns.insert_for_all_str(["\\kern", "\\mkern"], kern);
}

fn kern_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [dimension] = take_args(ctx.func_name, mode, args)?;
    Ok(build_kern(mode, size_arg(ctx.func_name, mode, dimension)?))
}

pub fn build_kern(mode: Mode, dimension: Measurement) -> ParseNode {
    ParseNode::Kern(KernNode {
        dimension,
        info: NodeInfo::new_mode(mode),
    })
}
