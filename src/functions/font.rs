use std::{borrow::Cow, sync::Arc};

use crate::{
    error::ParseError,
    expander::Mode,
    parse_node::{FontNode, NodeInfo, ParseNode},
};

use super::{take_args, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions};

/// Alternate names for font commands
pub const FONT_ALIASES: &[(&str, &str)] = &[
    ("\\Bbb", "mathbb"),
    ("\\bold", "mathbf"),
    ("\\frak", "mathfrak"),
];

/// Fonts selected by the `\text...` commands. `\text` itself keeps the surrounding font.
pub const TEXT_FUNCTION_FONTS: &[(&str, &str)] = &[
    ("\\textrm", "mathrm"),
    ("\\textsf", "mathsf"),
    ("\\texttt", "mathtt"),
    ("\\textnormal", "mathrm"),
    ("\\textbf", "mathbf"),
    ("\\textit", "textit"),
];

/// The old single letter font switches, like `\rm`
pub const OLD_FONT_FUNCS: &[(&str, &str)] = &[
    ("\\rm", "mathrm"),
    ("\\sf", "mathsf"),
    ("\\tt", "mathtt"),
    ("\\bf", "mathbf"),
    ("\\it", "mathit"),
];

const FONT_NAMES: &[&str] = &[
    // styles
    "\\mathrm",
    "\\mathit",
    "\\mathbf",
    // families
    "\\mathbb",
    "\\mathcal",
    "\\mathfrak",
    "\\mathscr",
    "\\mathsf",
    "\\mathtt",
    // aliases
    "\\Bbb",
    "\\bold",
    "\\frak",
];

fn lookup(table: &[(&str, &'static str)], command: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, font)| *font)
}

/// The font a `\text...` command or old font switch selects, if any
pub fn text_font(command: &str) -> Option<&'static str> {
    lookup(TEXT_FUNCTION_FONTS, command).or_else(|| lookup(OLD_FONT_FUNCS, command))
}

/// Resolve a font command to its family name.
///
/// The tables are tried in order (aliases, text fonts, old fonts), and if none has the command
/// the family is the command without its backslash.
pub fn resolve_font(command: &str) -> Cow<'static, str> {
    lookup(FONT_ALIASES, command)
        .or_else(|| lookup(TEXT_FUNCTION_FONTS, command))
        .or_else(|| lookup(OLD_FONT_FUNCS, command))
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(command.strip_prefix('\\').unwrap_or(command).to_string()))
}

pub fn add_functions(fns: &mut Functions) {
    let font = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(1).with_greediness(2),
        handler: Some(Box::new(font_handler)),
    });
    fns.insert_for_all_str(FONT_NAMES.iter().copied(), font);

    // Handled by the parser, which gathers the rest of the group as the body
    let old_font = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0),
        handler: None,
    });
    fns.insert_for_all_str(OLD_FONT_FUNCS.iter().map(|(name, _)| *name), old_font);
}

fn font_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [body] = take_args(ctx.func_name, mode, args)?;
    Ok(build_font(mode, ctx.func_name, body.into_node(ctx.func_name, mode)?))
}

pub fn build_font(mode: Mode, command: &str, body: ParseNode) -> ParseNode {
    ParseNode::Font(FontNode {
        font: resolve_font(command),
        body: Box::new(body),
        info: NodeInfo::new_mode(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_font, text_font};

    #[test]
    fn resolution_order() {
        assert_eq!(resolve_font("\\Bbb"), "mathbb");
        assert_eq!(resolve_font("\\textnormal"), "mathrm");
        assert_eq!(resolve_font("\\textit"), "textit");
        assert_eq!(resolve_font("\\it"), "mathit");
        assert_eq!(resolve_font("\\mathcal"), "mathcal");
        assert_eq!(resolve_font("\\mathbb"), "mathbb");
    }

    #[test]
    fn text_fonts() {
        assert_eq!(text_font("\\text"), None);
        assert_eq!(text_font("\\textbf"), Some("mathbf"));
        assert_eq!(text_font("\\rm"), Some("mathrm"));
    }
}
