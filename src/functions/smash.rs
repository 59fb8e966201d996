use std::sync::Arc;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, SmashNode},
    parser::StrictMode,
};

use super::{
    ord_argument, take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec,
    Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let smash = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_opt_args(1, 1).with_allowed_in_text(true),
        handler: Some(Box::new(smash_handler)),
    });
    fns.insert("\\smash", smash);
}

/// Read the letters of a `\smash[tb]` option into `(smash_height, smash_depth)`.
///
/// Fails with the first letter that is not `t` or `b`.
pub fn smash_flags(letters: &str) -> Result<(bool, bool), char> {
    let mut height = false;
    let mut depth = false;
    for ch in letters.chars().filter(|ch| !ch.is_whitespace()) {
        match ch {
            't' => height = true,
            'b' => depth = true,
            _ => return Err(ch),
        }
    }
    Ok((height, depth))
}

fn smash_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    let body = body.into_node(ctx.func_name, mode)?;

    let Some(option) = opt_args.into_iter().next().flatten() else {
        return Ok(build_smash(mode, body, true, true));
    };

    let loc = option.loc();
    let letters = ord_argument(option.into_node(ctx.func_name, mode)?)
        .iter()
        .filter_map(|node| node.text().map(str::to_string))
        .collect::<String>();
    let (height, depth) = match smash_flags(&letters) {
        Ok(flags) => flags,
        Err(ch) => {
            if ctx.parser.conf.strict == StrictMode::Error {
                return Err(ParseError::with_loc(ParseErrorKind::InvalidSmashOption(ch), loc));
            }
            ctx.parser.report_nonstrict(
                "invalidSmashOption",
                format!("Unrecognized \\smash option '{ch}', smashing neither height nor depth"),
                loc,
            )?;
            (false, false)
        }
    };

    Ok(build_smash(mode, body, height, depth))
}

pub fn build_smash(
    mode: Mode,
    body: ParseNode,
    smash_height: bool,
    smash_depth: bool,
) -> ParseNode {
    ParseNode::Smash(SmashNode {
        body: Box::new(wrap_ord_group(mode, body)),
        smash_height,
        smash_depth,
        info: NodeInfo::new_mode(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::smash_flags;

    #[test]
    fn option_letters() {
        assert_eq!(smash_flags("t"), Ok((true, false)));
        assert_eq!(smash_flags("bt"), Ok((true, true)));
        assert_eq!(smash_flags("tx"), Err('x'));
    }
}
