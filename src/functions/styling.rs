use std::sync::Arc;

use crate::{
    expander::Mode,
    parse_node::{NodeInfo, ParseNode, StylingNode},
    util::Style,
};

use super::{FunctionPropSpec, FunctionSpec, Functions};

pub fn add_functions(fns: &mut Functions) {
    // The parser gathers the rest of the group as the body
    let styling = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: None,
    });
    fns.insert_for_all_str(
        [
            "\\displaystyle",
            "\\textstyle",
            "\\scriptstyle",
            "\\scriptscriptstyle",
        ],
        styling,
    );
}

pub fn build_styling(mode: Mode, style: Style, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::Styling(StylingNode {
        style,
        body,
        info: NodeInfo::new_mode(mode),
    })
}
