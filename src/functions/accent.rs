use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{AccentNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

const MATH_ACCENTS: &[&str] = &[
    "\\acute",
    "\\grave",
    "\\ddot",
    "\\tilde",
    "\\bar",
    "\\breve",
    "\\check",
    "\\hat",
    "\\vec",
    "\\dot",
    "\\mathring",
    "\\widehat",
    "\\widetilde",
    "\\overrightarrow",
    "\\overleftarrow",
    "\\Overrightarrow",
    "\\overleftrightarrow",
    "\\overgroup",
    "\\overlinesegment",
    "\\overleftharpoon",
    "\\overrightharpoon",
];

const TEXT_ACCENTS: &[&str] = &[
    "\\'", "\\`", "\\^", "\\~", "\\=", "\\u", "\\.", "\\\"", "\\r", "\\H", "\\v",
];

/// Accents drawn with a fixed width glyph. Every other accent stretches over its base.
const NON_STRETCHY_ACCENTS: &[&str] = &[
    "\\acute",
    "\\grave",
    "\\ddot",
    "\\tilde",
    "\\bar",
    "\\breve",
    "\\check",
    "\\hat",
    "\\vec",
    "\\dot",
    "\\mathring",
];

/// Stretchy accents that still shift with the base's skew
const SHIFTY_ACCENTS: &[&str] = &["\\widehat", "\\widetilde"];

pub fn add_functions(fns: &mut Functions) {
    let accent = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1),
        handler: Some(Box::new(accent_handler)),
    });
    fns.insert_for_all_str(MATH_ACCENTS.iter().copied(), accent);

    let text_accent = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1)
            .with_allowed_in_text(true)
            .with_allowed_in_math(false),
        handler: Some(Box::new(accent_handler)),
    });
    fns.insert_for_all_str(TEXT_ACCENTS.iter().copied(), text_accent);
}

fn accent_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [base] = take_args(ctx.func_name, mode, args)?;
    Ok(build_accent(
        mode,
        ctx.func_name.to_string(),
        base.into_node(ctx.func_name, mode)?,
    ))
}

/// `(is_stretchy, is_shifty)` for an accent label
pub fn accent_flags(label: &str) -> (bool, bool) {
    let is_stretchy = !NON_STRETCHY_ACCENTS.contains(&label) && !TEXT_ACCENTS.contains(&label);
    let is_shifty = !is_stretchy || SHIFTY_ACCENTS.contains(&label);
    (is_stretchy, is_shifty)
}

pub fn build_accent(mode: Mode, label: impl Into<Cow<'static, str>>, base: ParseNode) -> ParseNode {
    let label = label.into();
    let (is_stretchy, is_shifty) = accent_flags(&label);
    ParseNode::Accent(AccentNode {
        label,
        is_stretchy,
        is_shifty,
        base: Box::new(base),
        info: NodeInfo::new_mode(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::accent_flags;

    #[test]
    fn classification() {
        assert_eq!(accent_flags("\\hat"), (false, true));
        assert_eq!(accent_flags("\\widehat"), (true, true));
        assert_eq!(accent_flags("\\overrightarrow"), (true, false));
        assert_eq!(accent_flags("\\'"), (false, true));
        assert_eq!(accent_flags("\\mathring"), (false, true));
    }
}
