use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, RuleNode},
    unit::{parse_measurement, Measurement},
    util::ArgType,
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    let rule = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_opt_args(2, 1)
            .with_arg_types(&[ArgType::Size, ArgType::Size, ArgType::Size] as &[_]),
        handler: Some(Box::new(rule_handler)),
    });
    fns.insert("\\rule", rule);
}

fn rule_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [width, height] = take_args(ctx.func_name, mode, args)?;
    let shift = match opt_args.into_iter().next().flatten() {
        Some(shift) => Some(size_arg(ctx.func_name, mode, shift)?),
        None => None,
    };
    Ok(build_rule(
        mode,
        size_arg(ctx.func_name, mode, width)?,
        size_arg(ctx.func_name, mode, height)?,
        shift,
    ))
}

/// Parse a size argument, pointing any error at the argument
pub(crate) fn size_arg(func: &str, mode: Mode, arg: Arg) -> Result<Measurement, ParseError> {
    let (text, loc) = arg.into_str(func, mode)?;
    parse_measurement(&text).map_err(|err| err.or_loc(loc))
}

pub fn build_rule(
    mode: Mode,
    width: Measurement,
    height: Measurement,
    shift: Option<Measurement>,
) -> ParseNode {
    ParseNode::Rule(RuleNode {
        shift,
        width,
        height,
        info: NodeInfo::new_mode(mode),
    })
}
