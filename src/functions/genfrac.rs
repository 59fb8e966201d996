use std::{borrow::Cow, sync::Arc};

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    parse_node::{GenFracNode, InfixNode, NodeInfo, ParseNode},
    util::{Style, StyleAuto},
};

use super::{
    take_args, wrap_ord_group, Arg, FunctionContext, FunctionPropSpec, FunctionSpec, Functions,
};

/// The fraction-like commands, by their registered name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum FracKind {
    #[strum(serialize = "\\cfrac")]
    CFrac,
    #[strum(serialize = "\\dfrac")]
    DFrac,
    #[strum(serialize = "\\frac")]
    Frac,
    #[strum(serialize = "\\tfrac")]
    TFrac,
    #[strum(serialize = "\\dbinom")]
    DBinom,
    #[strum(serialize = "\\binom")]
    Binom,
    #[strum(serialize = "\\tbinom")]
    TBinom,
    /// Produced by `\atop`, can't be entered directly
    #[strum(serialize = "\\\\atopfrac")]
    AtopFrac,
}
impl FracKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn has_bar_line(self) -> bool {
        matches!(
            self,
            FracKind::CFrac | FracKind::DFrac | FracKind::Frac | FracKind::TFrac
        )
    }

    pub fn delims(self) -> Option<(&'static str, &'static str)> {
        match self {
            FracKind::DBinom | FracKind::Binom | FracKind::TBinom => Some(("(", ")")),
            _ => None,
        }
    }

    pub fn size(self) -> StyleAuto {
        match self {
            FracKind::CFrac | FracKind::DFrac | FracKind::DBinom => {
                StyleAuto::Style(Style::Display)
            }
            FracKind::TFrac | FracKind::TBinom => StyleAuto::Style(Style::Text),
            _ => StyleAuto::Auto,
        }
    }

    /// The fraction an infix command stands for
    pub fn from_infix(name: &str) -> Option<FracKind> {
        Some(match name {
            "\\over" => FracKind::Frac,
            "\\choose" => FracKind::Binom,
            "\\atop" => FracKind::AtopFrac,
            _ => return None,
        })
    }
}

const GENFRAC_NAMES: &[&str] = &[
    "\\cfrac",
    "\\dfrac",
    "\\frac",
    "\\tfrac",
    "\\dbinom",
    "\\binom",
    "\\tbinom",
    "\\\\atopfrac",
];

const INFIX_NAMES: &[&str] = &["\\over", "\\choose", "\\atop"];

pub fn add_functions(fns: &mut Functions) {
    let genfrac = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(2).with_greediness(2),
        handler: Some(Box::new(genfrac_handler)),
    });
    fns.insert_for_all_str(GENFRAC_NAMES.iter().copied(), genfrac);

    let infix = Arc::new(FunctionSpec {
        prop: FunctionPropSpec::new_num_args(0).with_infix(true),
        handler: Some(Box::new(infix_handler)),
    });
    fns.insert_for_all_str(INFIX_NAMES.iter().copied(), infix);
}

fn genfrac_handler(
    ctx: FunctionContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let mode = ctx.mode();
    let [numer, denom] = take_args(ctx.func_name, mode, args)?;
    build_genfrac_by_name(
        mode,
        ctx.func_name,
        numer.into_node(ctx.func_name, mode)?,
        denom.into_node(ctx.func_name, mode)?,
    )
}

fn infix_handler(
    ctx: FunctionContext,
    _args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    build_infix(ctx.mode(), ctx.func_name)
}

pub fn build_genfrac(mode: Mode, kind: FracKind, numer: ParseNode, denom: ParseNode) -> ParseNode {
    let delims = kind.delims();
    ParseNode::GenFrac(GenFracNode {
        continued: kind == FracKind::CFrac,
        numer: Box::new(wrap_ord_group(mode, numer)),
        denom: Box::new(wrap_ord_group(mode, denom)),
        has_bar_line: kind.has_bar_line(),
        left_delim: delims.map(|(l, _)| Cow::Borrowed(l)),
        right_delim: delims.map(|(_, r)| Cow::Borrowed(r)),
        size: kind.size(),
        info: NodeInfo::new_mode(mode),
    })
}

/// Like [`build_genfrac`] but for a command name. Only registered names reach this, so an
/// unknown name is an internal error.
pub fn build_genfrac_by_name(
    mode: Mode,
    name: &str,
    numer: ParseNode,
    denom: ParseNode,
) -> Result<ParseNode, ParseError> {
    let kind = name.parse::<FracKind>().map_err(|_| ParseErrorKind::UnrecognizedCommand {
        family: "genfrac",
        name: name.to_string(),
    })?;
    Ok(build_genfrac(mode, kind, numer, denom))
}

pub fn build_infix(mode: Mode, name: &str) -> Result<ParseNode, ParseError> {
    let replace_with = FracKind::from_infix(name).ok_or_else(|| {
        ParseError::new(ParseErrorKind::UnrecognizedCommand {
            family: "infix",
            name: name.to_string(),
        })
    })?;
    Ok(ParseNode::Infix(InfixNode {
        replace_with,
        info: NodeInfo::new_mode(mode),
    }))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::{build_genfrac, build_genfrac_by_name, FracKind, GENFRAC_NAMES};
    use crate::{
        error::{ErrorCategory, ParseErrorKind},
        expander::Mode,
        parse_node::{MathOrdNode, NodeInfo, ParseNode},
        util::{Style, StyleAuto},
    };

    fn ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(MathOrdNode {
            text: text.to_string(),
            info: NodeInfo::new_mode(Mode::Math),
        })
    }

    #[test]
    fn every_kind_is_registered() {
        for kind in FracKind::iter() {
            assert!(GENFRAC_NAMES.contains(&kind.as_str()));
        }
    }

    #[test]
    fn binom_table() {
        let frac = build_genfrac(Mode::Math, FracKind::TBinom, ord("n"), ord("k"));
        let ParseNode::GenFrac(frac) = frac else {
            panic!("expected genfrac");
        };
        assert!(!frac.has_bar_line);
        assert_eq!(frac.left_delim.as_deref(), Some("("));
        assert_eq!(frac.right_delim.as_deref(), Some(")"));
        assert_eq!(frac.size, StyleAuto::Style(Style::Text));
        assert!(matches!(*frac.numer, ParseNode::OrdGroup(_)));
    }

    #[test]
    fn cfrac_is_continued() {
        let frac = build_genfrac(Mode::Math, FracKind::CFrac, ord("a"), ord("b"));
        let ParseNode::GenFrac(frac) = frac else {
            panic!("expected genfrac");
        };
        assert!(frac.continued);
        assert!(frac.has_bar_line);
        assert_eq!(frac.size, StyleAuto::Style(Style::Display));
    }

    #[test]
    fn unknown_name_is_internal() {
        let err = build_genfrac_by_name(Mode::Math, "\\nope", ord("a"), ord("b")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(matches!(err.kind, ParseErrorKind::UnrecognizedCommand { family: "genfrac", .. }));
    }
}
