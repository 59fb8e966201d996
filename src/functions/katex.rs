use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{KatexNode, NodeInfo, ParseNode},
};

use super::{Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let katex = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: Some(Box::new(katex_handler)),
    });
    fns.insert("\\KaTeX", katex);
}

fn katex_handler(
    ctx: FunctionContext,
    _args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    Ok(build_katex(ctx.mode()))
}

pub fn build_katex(mode: Mode) -> ParseNode {
    ParseNode::Katex(KatexNode {
        info: NodeInfo::new_mode(mode),
    })
}
