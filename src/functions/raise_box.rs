use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, OrdGroupNode, ParseNode, RaiseBoxNode},
    unit::Measurement,
    util::ArgType,
};

use super::{
    ord_argument, rule::size_arg, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec,
    Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let raise_box = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(2)
            .with_arg_types(&[ArgType::Size, ArgType::Mode(Mode::Text)] as &[_])
            .with_allowed_in_text(true),
        handler: Some(Box::new(raise_box_handler)),
    });
    fns.insert("\\raisebox", raise_box);
}

fn raise_box_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [dy, body] = take_args(ctx.func_name, mode, args)?;
    let dy = size_arg(ctx.func_name, mode, dy)?;
    let body = ord_argument(body.into_node(ctx.func_name, mode)?);
    Ok(build_raise_box(mode, dy, body))
}

/// The body is typeset as text, whatever the surrounding mode
pub fn build_raise_box(mode: Mode, dy: Measurement, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::RaiseBox(RaiseBoxNode {
        dy,
        body: Box::new(ParseNode::OrdGroup(OrdGroupNode {
            body,
            info: NodeInfo::new_mode(Mode::Text),
        })),
        info: NodeInfo::new_mode(mode),
    })
}
