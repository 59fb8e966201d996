use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{CrNode, NodeInfo, ParseNode},
    unit::Measurement,
    util::ArgType,
};

use super::{rule::size_arg, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let cr = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_opt_args(0, 1).with_arg_types(&[ArgType::Size] as &[_]),
        handler: Some(Box::new(cr_handler)),
    });
    fns.insert_for_all_str(["\\\\", "\\cr"], cr);
}

fn cr_handler(
    ctx: FunctionContext,
    _args: Vec<Arg>,
    opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let size = match opt_args.into_iter().next().flatten() {
        Some(size) => Some(size_arg(ctx.func_name, mode, size)?),
        None => None,
    };
    Ok(build_cr(mode, size))
}

/// A row break; `size` is the extra space requested with `\\[2pt]`
pub fn build_cr(mode: Mode, size: Option<Measurement>) -> ParseNode {
    ParseNode::Cr(CrNode {
        size,
        info: NodeInfo::new_mode(mode),
    })
}
