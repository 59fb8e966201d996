use std::sync::Arc;

use crate::{
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, SizingNode},
};

use super::{FunctionPropSpec, FunctionSpec, Functions};

/// Size commands from smallest to largest, size 1 is `\tiny`
pub const SIZE_FUNCS: &[&str] = &[
    "\\tiny",
    "\\scriptsize",
    "\\footnotesize",
    "\\small",
    "\\normalsize",
    "\\large",
    "\\Large",
    "\\LARGE",
    "\\huge",
    "\\Huge",
];

pub fn add_functions(fns: &mut Functions) {
    // The parser gathers the rest of the group as the body
    let sizing = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: None,
    });
    fns.insert_for_all_str(SIZE_FUNCS.iter().copied(), sizing);
}

/// The size number of a sizing command, 1 through 10
pub fn size_index(command: &str) -> Option<usize> {
    SIZE_FUNCS.iter().position(|name| *name == command).map(|i| i + 1)
}

pub fn build_sizing(mode: Mode, size: usize, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Sizing(SizingNode {
        size,
        body,
        info: NodeInfo::new_mode(mode),
    })
}
