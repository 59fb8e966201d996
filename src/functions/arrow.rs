use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, XArrowNode},
};

use super::{
    take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

/// Arrows that stretch to fit the text above (and optionally below) them
const X_ARROWS: &[&str] = &[
    "\\xleftarrow",
    "\\xrightarrow",
    "\\xLeftarrow",
    "\\xRightarrow",
    "\\xleftrightarrow",
    "\\xLeftrightarrow",
    "\\xhookleftarrow",
    "\\xhookrightarrow",
    "\\xmapsto",
    "\\xrightharpoondown",
    "\\xrightharpoonup",
    "\\xleftharpoondown",
    "\\xleftharpoonup",
    "\\xrightleftharpoons",
    "\\xleftrightharpoons",
    "\\xLongequal",
    "\\xtwoheadrightarrow",
    "\\xtwoheadleftarrow",
    "\\xtofrom",
];

pub fn add_functions(fns: &mut Functions) {
    let arrow = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_opt_args(1, 1),
        handler: Some(Box::new(arrow_handler)),
    });
    fns.insert_for_all_str(X_ARROWS.iter().copied(), arrow);
}

fn arrow_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    let below = opt_args
        .into_iter()
        .next()
        .flatten()
        .map(|below| below.into_node(ctx.func_name, mode))
        .transpose()?;
    Ok(build_xarrow(
        mode,
        ctx.func_name.to_string(),
        body.into_node(ctx.func_name, mode)?,
        below,
    ))
}

/// The text under the arrow is always an ordgroup
pub fn build_xarrow(
    mode: Mode,
    label: impl Into<Cow<'static, str>>,
    body: ParseNode,
    below: Option<ParseNode>,
) -> ParseNode {
    ParseNode::XArrow(XArrowNode {
        label: label.into(),
        body: Box::new(body),
        below: below.map(|below| Box::new(wrap_ord_group(mode, below))),
        info: NodeInfo::new_mode(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::X_ARROWS;

    #[test]
    fn nineteen_arrows() {
        let mut names = X_ARROWS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 19);
    }
}
