use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{ModNode, NodeInfo, ParseNode},
};

use super::{
    ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let bmod = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: Some(Box::new(bmod_handler)),
    });
    fns.insert("\\bmod", bmod);

    let modulo = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(mod_handler)),
    });
    fns.insert_for_all_str(["\\pod", "\\pmod", "\\mod"], modulo);
}

fn bmod_handler(
    ctx: FunctionContext,
    _args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    Ok(build_mod(ctx.mode(), ctx.func_name, None))
}

fn mod_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    let body = ord_argument(body.into_node(ctx.func_name, mode)?);
    Ok(build_mod(mode, ctx.func_name, Some(body)))
}

/// `mod_type` is the command without its backslash
pub fn build_mod(mode: Mode, command: &str, body: Option<Vec<ParseNode>>) -> ParseNode {
    let mod_type = command.strip_prefix('\\').unwrap_or(command);
    ParseNode::Mod(ModNode {
        mod_type: Cow::Owned(mod_type.to_string()),
        body,
        info: NodeInfo::new_mode(mode),
    })
}
