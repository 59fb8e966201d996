use std::sync::Arc;

use crate::{
    environments::{EnvironmentContext, ENVIRONMENTS},
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    parse_node::{EnvironmentNode, NodeInfo, ParseNode},
    util::ArgType,
};

use super::{
    ord_argument, take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

pub fn add_functions(fns: &mut Functions) {
    let begin = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_arg_types(&[ArgType::Mode(Mode::Text)] as &[_]),
        handler: Some(Box::new(begin_handler)),
    });
    fns.insert("\\begin", begin);

    let end = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_arg_types(&[ArgType::Mode(Mode::Text)] as &[_]),
        handler: Some(Box::new(end_handler)),
    });
    fns.insert("\\end", end);
}

/// The name written in `\begin{...}` or `\end{...}`
fn environment_name(arg: ParseNode) -> Result<String, ParseError> {
    let loc = arg.loc();
    let mut name = String::new();
    for node in ord_argument(arg) {
        match node.text() {
            Some(text) => name.push_str(text),
            None => {
                return Err(ParseError::with_loc(ParseErrorKind::InvalidEnvironmentName, loc))
            }
        }
    }
    Ok(name)
}

fn begin_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [name_arg] = take_args(ctx.func_name, mode, args)?;
    let name_node = name_arg.into_node(ctx.func_name, mode)?;
    let name_loc = name_node.loc();
    let name = environment_name(name_node)?;

    let Some(env) = ENVIRONMENTS.get(name.as_str()).cloned() else {
        return Err(ParseError::with_loc(
            ParseErrorKind::UnknownEnvironment(name),
            name_loc,
        ));
    };

    let (env_args, env_opt_args) = ctx.parser.parse_arguments(&name, &env.prop)?;
    let env_ctx = EnvironmentContext {
        mode,
        env_name: &name,
        parser: &mut *ctx.parser,
        loc: ctx.loc.clone(),
    };
    let result = (env.handler)(env_ctx, env_args, env_opt_args)?;

    ctx.parser.expect("\\end", false)?;
    match ctx.parser.parse_function(None, None, None)? {
        Some(ParseNode::Environment(end)) if end.name == name => Ok(result),
        Some(ParseNode::Environment(end)) => Err(ParseError::with_loc(
            ParseErrorKind::MismatchedEnvironment {
                begin: name,
                end: end.name,
            },
            end.info.loc,
        )),
        other => Err(ParseError::with_loc(
            ParseErrorKind::Expected {
                expected: "\\end".to_string(),
                found: other.map_or("EOF", |node| node.typ().as_str()).to_string(),
            },
            ctx.loc.clone(),
        )),
    }
}

fn end_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [name_arg] = take_args(ctx.func_name, mode, args)?;
    let name = environment_name(name_arg.into_node(ctx.func_name, mode)?)?;
    Ok(build_environment_name(mode, name))
}

/// The marker left by `\end{name}`
pub fn build_environment_name(mode: Mode, name: impl Into<String>) -> ParseNode {
    ParseNode::Environment(EnvironmentNode {
        name: name.into(),
        info: NodeInfo::new_mode(mode),
    })
}
