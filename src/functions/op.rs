use std::{borrow::Cow, sync::Arc};

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    parse_node::{NodeInfo, OpBody, OpNode, ParseNode},
};

use super::{
    ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

// Operators have two flags: whether they take limits in display style, and whether they are
// symbols that grow in display style. The four lists cover every combination.

const NO_LIMITS_NOT_SYMBOLS: &[&str] = &[
    "\\arcsin", "\\arccos", "\\arctan", "\\arctg", "\\arcctg", "\\arg", "\\ch", "\\cos",
    "\\cosec", "\\cosh", "\\cot", "\\cotg", "\\coth", "\\csc", "\\ctg", "\\cth", "\\deg",
    "\\dim", "\\exp", "\\hom", "\\ker", "\\lg", "\\ln", "\\log", "\\sec", "\\sin", "\\sinh",
    "\\sh", "\\tan", "\\tanh", "\\tg", "\\th",
];

const LIMITS_NOT_SYMBOLS: &[&str] = &[
    "\\det", "\\gcd", "\\inf", "\\lim", "\\liminf", "\\limsup", "\\max", "\\min", "\\Pr", "\\sup",
];

const NO_LIMITS_SYMBOLS: &[&str] = &["\\int", "\\iint", "\\iiint", "\\oint"];

const LIMITS_SYMBOLS: &[&str] = &[
    "\\coprod", "\\bigvee", "\\bigwedge", "\\biguplus", "\\bigcap", "\\bigcup", "\\intop",
    "\\prod", "\\sum", "\\bigotimes", "\\bigoplus", "\\bigodot", "\\bigsqcup", "\\smallint",
];

/// `(limits, symbol)` for a named operator
pub fn op_flags(command: &str) -> Option<(bool, bool)> {
    if NO_LIMITS_NOT_SYMBOLS.contains(&command) {
        Some((false, false))
    } else if LIMITS_NOT_SYMBOLS.contains(&command) {
        Some((true, false))
    } else if NO_LIMITS_SYMBOLS.contains(&command) {
        Some((false, true))
    } else if LIMITS_SYMBOLS.contains(&command) {
        Some((true, true))
    } else {
        None
    }
}

pub fn add_functions(fns: &mut Functions) {
    let named = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: Some(Box::new(named_op_handler)),
    });
    let names = NO_LIMITS_NOT_SYMBOLS
        .iter()
        .chain(LIMITS_NOT_SYMBOLS)
        .chain(NO_LIMITS_SYMBOLS)
        .chain(LIMITS_SYMBOLS)
        .copied();
    fns.insert_for_all_str(names, named);

    let mathop = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(mathop_handler)),
    });
    fns.insert("\\mathop", mathop);
}

fn named_op_handler(
    ctx: FunctionContext,
    _args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    build_op_by_name(ctx.mode(), ctx.func_name)
}

fn mathop_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_mathop(mode, ord_argument(body.into_node(ctx.func_name, mode)?)))
}

/// Build a named operator with the flags from its table
pub fn build_op_by_name(mode: Mode, name: &str) -> Result<ParseNode, ParseError> {
    let (limits, symbol) = op_flags(name).ok_or_else(|| ParseErrorKind::UnrecognizedCommand {
        family: "op",
        name: name.to_string(),
    })?;
    Ok(build_named_op(mode, Cow::Owned(name.to_string()), limits, symbol))
}

pub fn build_named_op(
    mode: Mode,
    command: impl Into<Cow<'static, str>>,
    limits: bool,
    symbol: bool,
) -> ParseNode {
    ParseNode::Op(OpNode {
        limits,
        symbol,
        always_handle_sup_sub: false,
        body: OpBody::Name(command.into()),
        info: NodeInfo::new_mode(mode),
    })
}

/// `\mathop{...}`: no limits, not a symbol
pub fn build_mathop(mode: Mode, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Op(OpNode {
        limits: false,
        symbol: false,
        always_handle_sup_sub: false,
        body: OpBody::Group(body),
        info: NodeInfo::new_mode(mode),
    })
}
