use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{LapNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let lap = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1).with_allowed_in_text(true),
        handler: Some(Box::new(lap_handler)),
    });
    fns.insert_for_all_str(["\\mathllap", "\\mathrlap", "\\mathclap"], lap);
}

fn lap_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_lap(mode, ctx.func_name, body.into_node(ctx.func_name, mode)?))
}

/// `\mathrlap` has the alignment `rlap`
pub fn build_lap(mode: Mode, command: &str, body: ParseNode) -> ParseNode {
    let alignment = command.get("\\math".len()..).unwrap_or_default();
    ParseNode::Lap(LapNode {
        alignment: Cow::Owned(alignment.to_string()),
        body: Box::new(body),
        info: NodeInfo::new_mode(mode),
    })
}
