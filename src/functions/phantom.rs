use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{HPhantomNode, NodeInfo, ParseNode, PhantomNode, VPhantomNode},
};

use super::{
    ord_argument, take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec,
    Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let phantom = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1).with_allowed_in_text(true),
        handler: Some(Box::new(phantom_handler)),
    });
    fns.insert_for_all_str(["\\phantom", "\\hphantom", "\\vphantom"], phantom);
}

fn phantom_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    let body = body.into_node(ctx.func_name, mode)?;
    Ok(match ctx.func_name {
        "\\hphantom" => build_hphantom(mode, body),
        "\\vphantom" => build_vphantom(mode, body),
        _ => build_phantom(mode, ord_argument(body)),
    })
}

pub fn build_phantom(mode: Mode, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Phantom(PhantomNode {
        body,
        info: NodeInfo::new_mode(mode),
    })
}

/// Keeps only the width of `body`
pub fn build_hphantom(mode: Mode, body: ParseNode) -> ParseNode {
    ParseNode::HPhantom(HPhantomNode {
        body: Box::new(wrap_ord_group(mode, body)),
        info: NodeInfo::new_mode(mode),
    })
}

/// Keeps only the height and depth of `body`
pub fn build_vphantom(mode: Mode, body: ParseNode) -> ParseNode {
    ParseNode::VPhantom(VPhantomNode {
        body: Box::new(wrap_ord_group(mode, body)),
        info: NodeInfo::new_mode(mode),
    })
}
