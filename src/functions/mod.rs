use std::{borrow::Cow, collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use static_assertions::assert_impl_all;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::{BreakToken, Mode},
    parse_node::{NodeInfo, OrdGroupNode, ParseNode},
    parser::Parser,
    util::{ArgType, SourceLocation},
};

pub mod accent;
pub mod accent_under;
pub mod arrow;
pub mod color;
pub mod cr;
pub mod delimsizing;
pub mod enclose;
pub mod environment;
pub mod font;
pub mod genfrac;
pub mod horiz_brace;
pub mod katex;
pub mod kern;
pub mod lap;
pub mod mclass;
pub mod modular;
pub mod op;
pub mod overline;
pub mod phantom;
pub mod raise_box;
pub mod rule;
pub mod sizing;
pub mod smash;
pub mod sqrt;
pub mod styling;
pub mod text;
pub mod underline;

/// Every command the parser knows, keyed by name (including the leading backslash)
pub static FUNCTIONS: Lazy<Functions> = Lazy::new(|| {
    let mut fns = Functions {
        fns: HashMap::new(),
    };

    accent::add_functions(&mut fns);
    accent_under::add_functions(&mut fns);
    arrow::add_functions(&mut fns);
    color::add_functions(&mut fns);
    cr::add_functions(&mut fns);
    delimsizing::add_functions(&mut fns);
    enclose::add_functions(&mut fns);
    environment::add_functions(&mut fns);
    font::add_functions(&mut fns);
    genfrac::add_functions(&mut fns);
    horiz_brace::add_functions(&mut fns);
    katex::add_functions(&mut fns);
    kern::add_functions(&mut fns);
    lap::add_functions(&mut fns);
    mclass::add_functions(&mut fns);
    modular::add_functions(&mut fns);
    op::add_functions(&mut fns);
    overline::add_functions(&mut fns);
    phantom::add_functions(&mut fns);
    raise_box::add_functions(&mut fns);
    rule::add_functions(&mut fns);
    sizing::add_functions(&mut fns);
    smash::add_functions(&mut fns);
    sqrt::add_functions(&mut fns);
    styling::add_functions(&mut fns);
    text::add_functions(&mut fns);
    underline::add_functions(&mut fns);

    fns
});

#[derive(Clone)]
pub struct Functions {
    fns: HashMap<&'static str, Arc<FunctionSpec>>,
}
impl Functions {
    pub fn get(&self, name: &str) -> Option<&Arc<FunctionSpec>> {
        self.fns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fns.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    /// Register `spec` under `name`.
    ///
    /// Panics if the name is already taken; the table is only built once, at startup.
    pub fn insert(&mut self, name: &'static str, spec: Arc<FunctionSpec>) {
        let previous = self.fns.insert(name, spec);
        assert!(previous.is_none(), "function {name} registered twice");
    }

    pub fn insert_for_all_str<I: IntoIterator<Item = &'static str>>(
        &mut self,
        names: I,
        spec: Arc<FunctionSpec>,
    ) {
        for name in names {
            self.insert(name, spec.clone())
        }
    }
}
assert_impl_all!(Functions: Send, Sync);

pub struct FunctionContext<'a, 'p, 'i> {
    pub func_name: &'a str,
    pub parser: &'p mut Parser<'i>,
    /// Location of the command token
    pub loc: Option<SourceLocation>,
    pub break_on_token_text: Option<BreakToken>,
}
impl<'a, 'p, 'i> FunctionContext<'a, 'p, 'i> {
    pub fn mode(&self) -> Mode {
        self.parser.mode()
    }
}

#[derive(Debug, Clone)]
pub struct FunctionPropSpec {
    /// Number of arguments the function takes
    pub num_args: usize,
    /// The number of optional arguments the function should parse
    pub num_optional_args: usize,
    /// Type of each argument, optional arguments first.
    /// Missing entries are parsed in the surrounding mode.
    pub arg_types: Cow<'static, [ArgType]>,
    /// Whether or not the function is allowed inside text mode
    pub allowed_in_text: bool,
    /// Whether or not the function is allowed inside math mode
    pub allowed_in_math: bool,
    /// Precedence when an argument is given without braces: a command may only take
    /// another command as an unbraced argument if that command's greediness is higher
    pub greediness: u8,
    /// Must be true if the function is an infix operator
    pub infix: bool,
}
impl FunctionPropSpec {
    /// Create function prop spec with only num args set
    pub const fn new_num_args(num_args: usize) -> FunctionPropSpec {
        Self::new_num_opt_args(num_args, 0)
    }

    /// Create function prop spec with num args and opt args set
    pub const fn new_num_opt_args(num_args: usize, opt_args: usize) -> FunctionPropSpec {
        FunctionPropSpec {
            num_args,
            num_optional_args: opt_args,
            arg_types: Cow::Borrowed(&[]),
            allowed_in_text: false,
            allowed_in_math: true,
            greediness: 1,
            infix: false,
        }
    }

    pub(crate) fn with_allowed_in_text(mut self, allowed_in_text: bool) -> Self {
        self.allowed_in_text = allowed_in_text;
        self
    }

    pub(crate) fn with_allowed_in_math(mut self, allowed_in_math: bool) -> Self {
        self.allowed_in_math = allowed_in_math;
        self
    }

    pub(crate) fn with_arg_types(mut self, arg_types: impl Into<Cow<'static, [ArgType]>>) -> Self {
        self.arg_types = arg_types.into();
        self
    }

    pub(crate) fn with_greediness(mut self, greediness: u8) -> Self {
        self.greediness = greediness;
        self
    }

    pub(crate) fn with_infix(mut self, infix: bool) -> Self {
        self.infix = infix;
        self
    }

    /// The type of argument `i`, counting the optional arguments first
    pub fn arg_type(&self, i: usize) -> ArgType {
        self.arg_types.get(i).copied().unwrap_or(ArgType::Original)
    }

    pub fn allowed_in(&self, mode: Mode) -> bool {
        match mode {
            Mode::Math => self.allowed_in_math,
            Mode::Text => self.allowed_in_text,
        }
    }
}

/// (context, args, opt_args)
pub type FunctionHandler = Box<
    dyn Fn(FunctionContext, Vec<Arg>, Vec<Option<Arg>>) -> Result<ParseNode, ParseError>
        + Send
        + Sync,
>;

pub struct FunctionSpec {
    pub prop: FunctionPropSpec,
    /// `None` when the parser handles the command itself, like `\displaystyle`
    pub handler: Option<FunctionHandler>,
}

/// A parsed argument.
///
/// Size and color arguments are kept as their raw text and checked by the builders.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Node(ParseNode),
    Str {
        text: String,
        loc: Option<SourceLocation>,
    },
}
impl Arg {
    pub fn loc(&self) -> Option<SourceLocation> {
        match self {
            Arg::Node(node) => node.loc(),
            Arg::Str { loc, .. } => loc.clone(),
        }
    }

    pub(crate) fn into_node(self, func: &str, mode: Mode) -> Result<ParseNode, ParseError> {
        match self {
            Arg::Node(node) => Ok(node),
            Arg::Str { loc, .. } => Err(ParseError::with_loc(
                ParseErrorKind::UnexpectedArgument(func.to_string(), mode),
                loc,
            )),
        }
    }

    pub(crate) fn into_str(
        self,
        func: &str,
        mode: Mode,
    ) -> Result<(String, Option<SourceLocation>), ParseError> {
        match self {
            Arg::Str { text, loc } => Ok((text, loc)),
            Arg::Node(node) => Err(ParseError::with_loc(
                ParseErrorKind::UnexpectedArgument(func.to_string(), mode),
                node.loc(),
            )),
        }
    }
}

/// Pull the required arguments out of `args`, failing if there are fewer than `N`
pub(crate) fn take_args<const N: usize>(
    func: &str,
    mode: Mode,
    args: Vec<Arg>,
) -> Result<[Arg; N], ParseError> {
    args.try_into()
        .map_err(|_| ParseErrorKind::UnexpectedArgument(func.to_string(), mode).into())
}

/// Wrap `node` in an ordgroup unless it already is one
pub fn wrap_ord_group(mode: Mode, node: ParseNode) -> ParseNode {
    match node {
        ParseNode::OrdGroup(_) => node,
        _ => ParseNode::OrdGroup(OrdGroupNode {
            info: NodeInfo::new(mode, node.loc()),
            body: vec![node],
        }),
    }
}

/// If the argument is an ord group, we just return the body
/// Otherwise it is just a vec of the given arg
pub fn ord_argument(arg: ParseNode) -> Vec<ParseNode> {
    if let ParseNode::OrdGroup(ord_group) = arg {
        ord_group.body
    } else {
        vec![arg]
    }
}

/// Whether a command of `outer` greediness may take a command of `candidate` greediness as an
/// argument without braces
pub fn may_absorb(outer: u8, candidate: u8) -> bool {
    candidate > outer
}

#[cfg(test)]
mod tests {
    use super::{may_absorb, ord_argument, wrap_ord_group, FUNCTIONS};
    use crate::{
        expander::Mode,
        parse_node::{MathOrdNode, NodeInfo, OrdGroupNode, ParseNode},
        util::ArgType,
    };

    fn x() -> ParseNode {
        ParseNode::MathOrd(MathOrdNode {
            text: "x".to_string(),
            info: NodeInfo::new_mode(Mode::Math),
        })
    }

    #[test]
    fn registry_builds() {
        // Forces every family's registration; a duplicated name panics here
        assert!(FUNCTIONS.len() > 200);
        assert!(FUNCTIONS.contains("\\frac"));
        assert!(FUNCTIONS.contains("\\\\atopfrac"));
        assert!(!FUNCTIONS.contains("\\alpha"));
    }

    #[test]
    fn registered_props() {
        let text = FUNCTIONS.get("\\textbf").unwrap();
        assert_eq!(text.prop.greediness, 2);
        assert!(text.prop.allowed_in_text);
        assert_eq!(text.prop.arg_type(0), ArgType::Mode(Mode::Text));

        let accent = FUNCTIONS.get("\\'").unwrap();
        assert!(!accent.prop.allowed_in(Mode::Math));
        assert!(accent.prop.allowed_in(Mode::Text));

        let over = FUNCTIONS.get("\\over").unwrap();
        assert!(over.prop.infix);

        assert!(FUNCTIONS.get("\\displaystyle").unwrap().handler.is_none());
    }

    #[test]
    fn ord_group_helpers() {
        let wrapped = wrap_ord_group(Mode::Math, x());
        assert_eq!(
            wrapped,
            ParseNode::OrdGroup(OrdGroupNode {
                body: vec![x()],
                info: NodeInfo::new_mode(Mode::Math),
            })
        );
        // Already a group, kept as is
        assert_eq!(wrap_ord_group(Mode::Math, wrapped.clone()), wrapped);

        assert_eq!(ord_argument(wrapped), vec![x()]);
        assert_eq!(ord_argument(x()), vec![x()]);
    }

    #[test]
    fn greediness_precedence() {
        assert!(may_absorb(1, 2));
        assert!(!may_absorb(2, 2));
        assert!(!may_absorb(3, 1));
    }
}
