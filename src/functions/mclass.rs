use std::sync::Arc;

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{MClassNode, NodeInfo, OpBody, OpNode, ParseNode, SupSubNode},
};

use super::{
    ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

const MCLASS_NAMES: &[&str] = &[
    "\\mathord",
    "\\mathbin",
    "\\mathrel",
    "\\mathopen",
    "\\mathclose",
    "\\mathpunct",
    "\\mathinner",
];

pub fn add_functions(fns: &mut Functions) {
    let mclass = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(mclass_handler)),
    });
    fns.insert_for_all_str(MCLASS_NAMES.iter().copied(), mclass);

    let stackrel = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(2),
        handler: Some(Box::new(stackrel_handler)),
    });
    fns.insert("\\stackrel", stackrel);
}

fn mclass_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_mclass(
        mode,
        ctx.func_name,
        ord_argument(body.into_node(ctx.func_name, mode)?),
    ))
}

fn stackrel_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [top, bottom] = take_args(ctx.func_name, mode, args)?;
    Ok(build_stackrel(
        mode,
        top.into_node(ctx.func_name, mode)?,
        bottom.into_node(ctx.func_name, mode)?,
    ))
}

/// `\mathbin` gives the class `mbin`
pub fn build_mclass(mode: Mode, command: &str, body: Vec<ParseNode>) -> ParseNode {
    let class = command.get("\\math".len()..).unwrap_or_default();
    ParseNode::MClass(MClassNode {
        mclass: format!("m{class}"),
        body,
        info: NodeInfo::new_mode(mode),
    })
}

/// A relation with `top` set above `bottom`, treated as an operator with limits
pub fn build_stackrel(mode: Mode, top: ParseNode, bottom: ParseNode) -> ParseNode {
    let base = ParseNode::Op(OpNode {
        limits: true,
        symbol: false,
        always_handle_sup_sub: true,
        body: OpBody::Group(ord_argument(bottom)),
        info: NodeInfo::new_mode(mode),
    });
    let supsub = ParseNode::SupSub(SupSubNode {
        base: Some(Box::new(base)),
        sup: Some(Box::new(top)),
        sub: None,
        info: NodeInfo::new_mode(mode),
    });
    ParseNode::MClass(MClassNode {
        mclass: "mrel".to_string(),
        body: vec![supsub],
        info: NodeInfo::new_mode(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_mclass, build_stackrel};
    use crate::{
        expander::Mode,
        parse_node::{MathOrdNode, NodeInfo, OpBody, ParseNode},
    };

    fn ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(MathOrdNode {
            text: text.to_string(),
            info: NodeInfo::new_mode(Mode::Math),
        })
    }

    #[test]
    fn class_from_command() {
        let ParseNode::MClass(node) = build_mclass(Mode::Math, "\\mathpunct", vec![ord("x")]) else {
            panic!("expected mclass");
        };
        assert_eq!(node.mclass, "mpunct");
    }

    #[test]
    fn stackrel_shape() {
        let ParseNode::MClass(node) = build_stackrel(Mode::Math, ord("a"), ord("=")) else {
            panic!("expected mclass");
        };
        assert_eq!(node.mclass, "mrel");
        let ParseNode::SupSub(supsub) = &node.body[0] else {
            panic!("expected supsub");
        };
        assert!(supsub.sub.is_none());
        let Some(ParseNode::Op(op)) = supsub.base.as_deref() else {
            panic!("expected op base");
        };
        assert!(op.limits && !op.symbol && op.always_handle_sup_sub);
        assert_eq!(op.body, OpBody::Group(vec![ord("=")]));
    }
}
