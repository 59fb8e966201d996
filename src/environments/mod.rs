use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use static_assertions::assert_impl_all;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::{BreakToken, Mode},
    functions::{Arg, FunctionPropSpec},
    normalize::{normalize_rows, RowItem, Rows},
    parse_node::ParseNode,
    parser::Parser,
    util::SourceLocation,
};

pub mod array;

pub struct EnvironmentContext<'a, 'p, 'i> {
    pub mode: Mode,
    pub env_name: &'a str,
    pub parser: &'p mut Parser<'i>,
    /// Location of the `\begin`
    pub loc: Option<SourceLocation>,
}

/// (context, args, opt_args)
pub type EnvironmentHandler = Box<
    dyn Fn(EnvironmentContext, Vec<Arg>, Vec<Option<Arg>>) -> Result<ParseNode, ParseError>
        + Send
        + Sync,
>;

pub struct EnvironmentSpec {
    /// Arguments that follow `\begin{name}`
    pub prop: FunctionPropSpec,
    pub handler: EnvironmentHandler,
}

pub type Environments = HashMap<&'static str, Arc<EnvironmentSpec>>;

pub static ENVIRONMENTS: Lazy<Environments> = Lazy::new(|| {
    let mut envs = Environments::new();

    array::add_environments(&mut envs);

    envs
});
assert_impl_all!(EnvironmentSpec: Send, Sync);

/// Read the body of an environment up to its `\end`, which is left unconsumed
pub(crate) fn parse_rows(parser: &mut Parser) -> Result<Rows, ParseError> {
    parser.nested(parse_rows_inner)
}

fn parse_rows_inner(parser: &mut Parser) -> Result<Rows, ParseError> {
    let mut items = Vec::new();
    loop {
        let nodes = parser.parse_expression_raw(false, Some(BreakToken::End))?;
        items.extend(nodes.into_iter().map(RowItem::Node));

        let next = parser.fetch()?;
        match next.content.as_ref() {
            "&" => {
                parser.consume();
                items.push(RowItem::ColumnBreak);
            }
            "\\end" => break,
            found => {
                return Err(ParseError::with_loc(
                    ParseErrorKind::Expected {
                        expected: "\\end".to_string(),
                        found: found.to_string(),
                    },
                    next.loc.clone(),
                ))
            }
        }
    }

    normalize_rows(parser.mode(), items)
}
