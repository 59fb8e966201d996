use std::{borrow::Cow, sync::Arc};

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::{BreakToken, Mode},
    parse_node::{
        DelimSizingNode, LeftRightNode, LeftRightRightNode, MiddleNode, NodeInfo, ParseNode,
    },
    symbols::is_delimiter,
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

/// `(size, class)` for each of the `\big` commands
const DELIM_SIZES: &[(&str, usize, &str)] = &[
    ("\\bigl", 1, "mopen"),
    ("\\Bigl", 2, "mopen"),
    ("\\biggl", 3, "mopen"),
    ("\\Biggl", 4, "mopen"),
    ("\\bigr", 1, "mclose"),
    ("\\Bigr", 2, "mclose"),
    ("\\biggr", 3, "mclose"),
    ("\\Biggr", 4, "mclose"),
    ("\\bigm", 1, "mrel"),
    ("\\Bigm", 2, "mrel"),
    ("\\biggm", 3, "mrel"),
    ("\\Biggm", 4, "mrel"),
    ("\\big", 1, "mord"),
    ("\\Big", 2, "mord"),
    ("\\bigg", 3, "mord"),
    ("\\Bigg", 4, "mord"),
];

pub fn delim_size(command: &str) -> Option<(usize, &'static str)> {
    DELIM_SIZES
        .iter()
        .find(|(name, _, _)| *name == command)
        .map(|(_, size, class)| (*size, *class))
}

/// Check that the argument is a symbol from the delimiter table and return its text
fn check_delimiter(func: &str, arg: &ParseNode) -> Result<String, ParseError> {
    let delim = arg.text().unwrap_or_else(|| arg.typ().as_str());
    if arg.text().is_some() && is_delimiter(delim) {
        Ok(delim.to_string())
    } else {
        Err(ParseError::with_loc(
            ParseErrorKind::InvalidDelimiter {
                delim: delim.to_string(),
                func: func.to_string(),
            },
            arg.loc(),
        ))
    }
}

fn delimiter_arg(ctx: &FunctionContext, args: Vec<Arg>) -> Result<String, ParseError> {
    let mode = ctx.mode();
    let [delim] = take_args(ctx.func_name, mode, args)?;
    check_delimiter(ctx.func_name, &delim.into_node(ctx.func_name, mode)?)
}

pub fn add_functions(fns: &mut Functions) {
    let delim_sizing = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(delim_sizing_handler)),
    });
    fns.insert_for_all_str(DELIM_SIZES.iter().map(|(name, _, _)| *name), delim_sizing);

    let left = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(left_handler)),
    });
    fns.insert("\\left", left);

    let middle = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(middle_handler)),
    });
    fns.insert("\\middle", middle);

    let right = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(right_handler)),
    });
    fns.insert("\\right", right);
}

fn delim_sizing_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let delim = delimiter_arg(&ctx, args)?;
    build_delim_sizing(ctx.mode(), ctx.func_name, delim)
}

fn left_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let left = delimiter_arg(&ctx, args)?;
    let mode = ctx.mode();

    // \middle is only valid while this is above zero
    ctx.parser.leftright_depth += 1;
    let body = ctx
        .parser
        .nested(|parser| parser.parse_expression(false, Some(BreakToken::Right)));
    ctx.parser.leftright_depth -= 1;
    let body = body?;

    ctx.parser.expect("\\right", false)?;
    let right = match ctx.parser.parse_function(None, None, None)? {
        Some(ParseNode::LeftRightRight(right)) => right.delim,
        other => {
            return Err(ParseError::with_loc(
                ParseErrorKind::Expected {
                    expected: "\\right".to_string(),
                    found: other.map_or("EOF", |node| node.typ().as_str()).to_string(),
                },
                ctx.loc.clone(),
            ))
        }
    };

    Ok(build_left_right(mode, left, right, body))
}

fn middle_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let delim = delimiter_arg(&ctx, args)?;
    if ctx.parser.leftright_depth == 0 {
        return Err(ParseError::with_loc(ParseErrorKind::MiddleWithoutLeft, ctx.loc.clone()));
    }

    Ok(ParseNode::Middle(MiddleNode {
        delim,
        info: NodeInfo::new_mode(ctx.mode()),
    }))
}

fn right_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let delim = delimiter_arg(&ctx, args)?;
    Ok(ParseNode::LeftRightRight(LeftRightRightNode {
        delim,
        info: NodeInfo::new_mode(ctx.mode()),
    }))
}

pub fn build_left_right(
    mode: Mode,
    left: impl Into<String>,
    right: impl Into<String>,
    body: Vec<ParseNode>,
) -> ParseNode {
    ParseNode::LeftRight(LeftRightNode {
        body,
        left: left.into(),
        right: right.into(),
        info: NodeInfo::new_mode(mode),
    })
}

/// Only the `\big` family reaches this, so an unknown command is an internal error
pub fn build_delim_sizing(
    mode: Mode,
    command: &str,
    delim: impl Into<String>,
) -> Result<ParseNode, ParseError> {
    let (size, mclass) = delim_size(command).ok_or_else(|| {
        ParseError::new(ParseErrorKind::UnrecognizedCommand {
            family: "delimsizing",
            name: command.to_string(),
        })
    })?;
    Ok(ParseNode::DelimSizing(DelimSizingNode {
        size,
        mclass: Cow::Borrowed(mclass),
        delim: delim.into(),
        info: NodeInfo::new_mode(mode),
    }))
}

#[cfg(test)]
mod tests {
    use super::delim_size;

    #[test]
    fn size_table() {
        assert_eq!(delim_size("\\bigl"), Some((1, "mopen")));
        assert_eq!(delim_size("\\Biggr"), Some((4, "mclose")));
        assert_eq!(delim_size("\\biggm"), Some((3, "mrel")));
        assert_eq!(delim_size("\\Big"), Some((2, "mord")));
        assert_eq!(delim_size("\\left"), None);
    }
}
