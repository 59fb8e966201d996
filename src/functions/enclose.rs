use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{EncloseNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let enclose = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(enclose_handler)),
    });
    fns.insert_for_all_str(
        ["\\cancel", "\\bcancel", "\\xcancel", "\\sout", "\\fbox"],
        enclose,
    );
}

fn enclose_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_enclose(
        mode,
        ctx.func_name.to_string(),
        body.into_node(ctx.func_name, mode)?,
    ))
}

pub fn build_enclose(
    mode: Mode,
    label: impl Into<Cow<'static, str>>,
    body: ParseNode,
) -> ParseNode {
    ParseNode::Enclose(EncloseNode {
        label: label.into(),
        body: Box::new(body),
        info: NodeInfo::new_mode(mode),
    })
}
