use std::borrow::Cow;

use strum_macros::{EnumString, IntoStaticStr};

use crate::{
    expander::Mode,
    functions::genfrac::FracKind,
    symbols::Atom,
    unit::Measurement,
    util::{SourceLocation, Style, StyleAuto},
};

/// Declares [`ParseNode`], its [`ParseNodeType`] tags and the per-variant dispatch.
macro_rules! parse_nodes {
    ($($variant:ident($node:ident) = $tag:literal,)*) => {
        /// A node in the tree produced by the parser.
        ///
        /// Each variant has a stable type tag, see [`ParseNodeType`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum ParseNode {
            $($variant($node),)*
        }

        /// The stable type tag of each node kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
        pub enum ParseNodeType {
            $(
                #[strum(serialize = $tag)]
                $variant,
            )*
        }

        impl ParseNode {
            pub fn info(&self) -> &NodeInfo {
                match self {
                    $(ParseNode::$variant(node) => &node.info,)*
                }
            }

            pub fn info_mut(&mut self) -> &mut NodeInfo {
                match self {
                    $(ParseNode::$variant(node) => &mut node.info,)*
                }
            }

            pub fn typ(&self) -> ParseNodeType {
                match self {
                    $(ParseNode::$variant(_) => ParseNodeType::$variant,)*
                }
            }
        }

        impl EqNoLoc for ParseNode {
            fn eq_no_loc(&self, o: &Self) -> bool {
                match (self, o) {
                    $((ParseNode::$variant(a), ParseNode::$variant(b)) => a.eq_no_loc(b),)*
                    _ => false,
                }
            }
        }
    };
}

parse_nodes! {
    Array(ArrayNode) = "array",
    Accent(AccentNode) = "accent",
    AccentUnder(AccentUnderNode) = "accentUnder",
    Atom(AtomNode) = "atom",
    Color(ColorNode) = "color",
    Cr(CrNode) = "cr",
    DelimSizing(DelimSizingNode) = "delimsizing",
    Enclose(EncloseNode) = "enclose",
    Environment(EnvironmentNode) = "environment",
    Font(FontNode) = "font",
    GenFrac(GenFracNode) = "genfrac",
    HorizBrace(HorizBraceNode) = "horizBrace",
    Infix(InfixNode) = "infix",
    Katex(KatexNode) = "katex",
    Kern(KernNode) = "kern",
    Lap(LapNode) = "lap",
    LeftRight(LeftRightNode) = "leftright",
    LeftRightRight(LeftRightRightNode) = "leftright-right",
    MathOrd(MathOrdNode) = "mathord",
    MClass(MClassNode) = "mclass",
    Middle(MiddleNode) = "middle",
    Mod(ModNode) = "mod",
    Op(OpNode) = "op",
    OrdGroup(OrdGroupNode) = "ordgroup",
    Overline(OverlineNode) = "overline",
    Phantom(PhantomNode) = "phantom",
    HPhantom(HPhantomNode) = "hphantom",
    VPhantom(VPhantomNode) = "vphantom",
    RaiseBox(RaiseBoxNode) = "raisebox",
    Rule(RuleNode) = "rule",
    Sizing(SizingNode) = "sizing",
    Smash(SmashNode) = "smash",
    Spacing(SpacingNode) = "spacing",
    Sqrt(SqrtNode) = "sqrt",
    Styling(StylingNode) = "styling",
    SupSub(SupSubNode) = "supsub",
    Text(TextNode) = "text",
    TextOrd(TextOrdNode) = "textord",
    Underline(UnderlineNode) = "underline",
    XArrow(XArrowNode) = "xArrow",
}

impl ParseNode {
    pub fn loc(&self) -> Option<SourceLocation> {
        self.info().loc.clone()
    }

    pub fn mode(&self) -> Mode {
        self.info().mode
    }

    /// The text of a symbol node
    pub fn text(&self) -> Option<&str> {
        match self {
            ParseNode::Atom(a) => Some(&a.text),
            ParseNode::MathOrd(a) => Some(&a.text),
            ParseNode::Spacing(a) => Some(&a.text),
            ParseNode::TextOrd(a) => Some(&a.text),
            _ => None,
        }
    }

    /// Drop the location of this node and every node below it
    pub fn without_loc(mut self) -> ParseNode {
        self.clear_loc();
        self
    }

    fn clear_loc(&mut self) {
        self.info_mut().loc = None;
        for child in self.children_mut() {
            child.clear_loc();
        }
    }

    /// Mutable references to the direct children of this node
    pub fn children_mut(&mut self) -> Vec<&mut ParseNode> {
        match self {
            ParseNode::Array(a) => a.body.iter_mut().flatten().collect(),
            ParseNode::Color(a) => a.body.iter_mut().collect(),
            ParseNode::LeftRight(a) => a.body.iter_mut().collect(),
            ParseNode::MClass(a) => a.body.iter_mut().collect(),
            ParseNode::OrdGroup(a) => a.body.iter_mut().collect(),
            ParseNode::Phantom(a) => a.body.iter_mut().collect(),
            ParseNode::Sizing(a) => a.body.iter_mut().collect(),
            ParseNode::Styling(a) => a.body.iter_mut().collect(),
            ParseNode::Text(a) => a.body.iter_mut().collect(),
            ParseNode::Mod(a) => a.body.iter_mut().flatten().collect(),
            ParseNode::Op(a) => match &mut a.body {
                OpBody::Group(body) => body.iter_mut().collect(),
                OpBody::Name(_) => Vec::new(),
            },
            ParseNode::Accent(AccentNode { base, .. })
            | ParseNode::AccentUnder(AccentUnderNode { base, .. })
            | ParseNode::HorizBrace(HorizBraceNode { base, .. }) => vec![&mut **base],
            ParseNode::Enclose(EncloseNode { body, .. })
            | ParseNode::Font(FontNode { body, .. })
            | ParseNode::Lap(LapNode { body, .. })
            | ParseNode::Overline(OverlineNode { body, .. })
            | ParseNode::HPhantom(HPhantomNode { body, .. })
            | ParseNode::VPhantom(VPhantomNode { body, .. })
            | ParseNode::RaiseBox(RaiseBoxNode { body, .. })
            | ParseNode::Smash(SmashNode { body, .. })
            | ParseNode::Underline(UnderlineNode { body, .. }) => vec![&mut **body],
            ParseNode::GenFrac(a) => vec![&mut *a.numer, &mut *a.denom],
            ParseNode::Sqrt(a) => std::iter::once(&mut *a.body)
                .chain(a.index.as_deref_mut())
                .collect(),
            ParseNode::XArrow(a) => std::iter::once(&mut *a.body)
                .chain(a.below.as_deref_mut())
                .collect(),
            ParseNode::SupSub(a) => a
                .base
                .as_deref_mut()
                .into_iter()
                .chain(a.sup.as_deref_mut())
                .chain(a.sub.as_deref_mut())
                .collect(),
            ParseNode::Atom(_)
            | ParseNode::Cr(_)
            | ParseNode::DelimSizing(_)
            | ParseNode::Environment(_)
            | ParseNode::Infix(_)
            | ParseNode::Katex(_)
            | ParseNode::Kern(_)
            | ParseNode::LeftRightRight(_)
            | ParseNode::MathOrd(_)
            | ParseNode::Middle(_)
            | ParseNode::Rule(_)
            | ParseNode::Spacing(_)
            | ParseNode::TextOrd(_) => Vec::new(),
        }
    }
}

impl ParseNodeType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

pub trait EqNoLoc {
    /// Returns true if the two nodes are equal, ignoring their locations.
    fn eq_no_loc(&self, o: &Self) -> bool;
}
impl<T: EqNoLoc> EqNoLoc for Vec<T> {
    fn eq_no_loc(&self, o: &Self) -> bool {
        self.len() == o.len() && self.iter().zip(o).all(|(a, b)| a.eq_no_loc(b))
    }
}
impl<T: EqNoLoc> EqNoLoc for Option<T> {
    fn eq_no_loc(&self, o: &Self) -> bool {
        match (self, o) {
            (Some(a), Some(b)) => a.eq_no_loc(b),
            (a, b) => a.is_none() && b.is_none(),
        }
    }
}
impl<T: EqNoLoc> EqNoLoc for Box<T> {
    fn eq_no_loc(&self, o: &Self) -> bool {
        T::eq_no_loc(self, o)
    }
}
impl EqNoLoc for NodeInfo {
    fn eq_no_loc(&self, o: &Self) -> bool {
        self.mode == o.mode
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub mode: Mode,
    pub loc: Option<SourceLocation>,
}
impl NodeInfo {
    pub fn new_mode(mode: Mode) -> NodeInfo {
        NodeInfo { mode, loc: None }
    }

    pub fn new(mode: Mode, loc: Option<SourceLocation>) -> NodeInfo {
        NodeInfo { mode, loc }
    }
}

/// Horizontal alignment of an environment column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
pub enum ColumnAlign {
    #[strum(serialize = "l")]
    Left,
    #[strum(serialize = "c")]
    Center,
    #[strum(serialize = "r")]
    Right,
}
impl ColumnAlign {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Formatting of one column of an array-like environment
#[derive(Debug, Clone, PartialEq)]
pub enum AlignSpec {
    Align {
        align: ColumnAlign,
        /// Space before the column, in em
        pregap: Option<f64>,
        /// Space after the column, in em
        postgap: Option<f64>,
    },
    /// A vertical rule between columns, like `|`
    Separator(Cow<'static, str>),
}
impl AlignSpec {
    pub const fn align(align: ColumnAlign) -> AlignSpec {
        AlignSpec::Align {
            align,
            pregap: None,
            postgap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpBody {
    /// A named operator such as `\sin` or `\sum`
    Name(Cow<'static, str>),
    /// The argument of `\mathop` or similar
    Group(Vec<ParseNode>),
}
impl EqNoLoc for OpBody {
    fn eq_no_loc(&self, o: &Self) -> bool {
        match (self, o) {
            (OpBody::Name(a), OpBody::Name(b)) => a == b,
            (OpBody::Group(a), OpBody::Group(b)) => a.eq_no_loc(b),
            _ => false,
        }
    }
}

/// Declares node payload structs.
///
/// Fields before the `;` are plain values compared with `==`. Fields after it hold
/// nodes and are compared with [`EqNoLoc`]. Every struct gets a trailing `info` field.
macro_rules! node_structs {
    ($(
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$value_meta:meta])* $value:ident: $value_ty:ty),*;
            $($(#[$child_meta:meta])* $child:ident: $child_ty:ty),* $(,)?
        }
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $($(#[$value_meta])* pub $value: $value_ty,)*
            $($(#[$child_meta])* pub $child: $child_ty,)*
            pub info: NodeInfo,
        }

        impl EqNoLoc for $name {
            fn eq_no_loc(&self, o: &Self) -> bool {
                self.info.eq_no_loc(&o.info)
                    $(&& self.$value == o.$value)*
                    $(&& self.$child.eq_no_loc(&o.$child))*
            }
        }
    )*};
}

node_structs! {
    ArrayNode {
        hskip_before_and_after: Option<bool>,
        add_jot: Option<bool>,
        array_stretch: Option<f64>,
        cols: Option<Vec<AlignSpec>>,
        /// One entry per row break, `None` when the break had no explicit size.
        /// Never empty: an environment without row gaps gets a single `None`.
        row_gaps: Vec<Option<Measurement>>;
        body: Vec<Vec<ParseNode>>,
    }

    AccentNode {
        label: Cow<'static, str>,
        is_stretchy: bool,
        is_shifty: bool;
        base: Box<ParseNode>,
    }

    AccentUnderNode {
        label: Cow<'static, str>;
        base: Box<ParseNode>,
    }

    AtomNode {
        family: Atom,
        text: String;
    }

    ColorNode {
        color: String;
        body: Vec<ParseNode>,
    }

    /// Row break marker, `\\` or `\cr`
    CrNode {
        size: Option<Measurement>;
    }

    DelimSizingNode {
        /// 1 for `\big` up to 4 for `\Bigg`
        size: usize,
        mclass: Cow<'static, str>,
        delim: String;
    }

    EncloseNode {
        label: Cow<'static, str>;
        body: Box<ParseNode>,
    }

    /// The name given to `\begin` or `\end`
    EnvironmentNode {
        name: String;
    }

    FontNode {
        font: Cow<'static, str>;
        body: Box<ParseNode>,
    }

    GenFracNode {
        continued: bool,
        has_bar_line: bool,
        left_delim: Option<Cow<'static, str>>,
        right_delim: Option<Cow<'static, str>>,
        size: StyleAuto;
        numer: Box<ParseNode>,
        denom: Box<ParseNode>,
    }

    HorizBraceNode {
        label: Cow<'static, str>,
        is_over: bool;
        base: Box<ParseNode>,
    }

    /// Placeholder left by `\over`, `\choose` or `\atop`, replaced by a fraction once
    /// the surrounding group is complete
    InfixNode {
        replace_with: FracKind;
    }

    /// The `\KaTeX` logo
    KatexNode {;}

    KernNode {
        dimension: Measurement;
    }

    LapNode {
        /// `llap`, `rlap` or `clap`
        alignment: Cow<'static, str>;
        body: Box<ParseNode>,
    }

    LeftRightNode {
        left: String,
        right: String;
        body: Vec<ParseNode>,
    }

    /// The closing `\right` of a `\left`, only seen while the pair is being parsed
    LeftRightRightNode {
        delim: String;
    }

    MathOrdNode {
        text: String;
    }

    MClassNode {
        /// `mord`, `mbin`, `mrel`, ...
        mclass: String;
        body: Vec<ParseNode>,
    }

    MiddleNode {
        delim: String;
    }

    ModNode {
        /// `bmod`, `pod`, `pmod` or `mod`
        mod_type: Cow<'static, str>;
        /// `None` for `\bmod`, which takes no argument
        body: Option<Vec<ParseNode>>,
    }

    OpNode {
        limits: bool,
        symbol: bool,
        always_handle_sup_sub: bool;
        body: OpBody,
    }

    OrdGroupNode {
        ;
        body: Vec<ParseNode>,
    }

    OverlineNode {
        ;
        body: Box<ParseNode>,
    }

    PhantomNode {
        ;
        body: Vec<ParseNode>,
    }

    HPhantomNode {
        ;
        body: Box<ParseNode>,
    }

    VPhantomNode {
        ;
        body: Box<ParseNode>,
    }

    RaiseBoxNode {
        dy: Measurement;
        /// Always a text mode ordgroup
        body: Box<ParseNode>,
    }

    RuleNode {
        shift: Option<Measurement>,
        width: Measurement,
        height: Measurement;
    }

    SizingNode {
        /// 1 (`\tiny`) through 10 (`\Huge`)
        size: usize;
        body: Vec<ParseNode>,
    }

    SmashNode {
        smash_height: bool,
        smash_depth: bool;
        body: Box<ParseNode>,
    }

    SpacingNode {
        text: String;
    }

    SqrtNode {
        ;
        body: Box<ParseNode>,
        index: Option<Box<ParseNode>>,
    }

    StylingNode {
        style: Style;
        body: Vec<ParseNode>,
    }

    SupSubNode {
        ;
        base: Option<Box<ParseNode>>,
        sup: Option<Box<ParseNode>>,
        sub: Option<Box<ParseNode>>,
    }

    TextNode {
        font: Option<Cow<'static, str>>;
        body: Vec<ParseNode>,
    }

    TextOrdNode {
        text: String;
    }

    UnderlineNode {
        ;
        body: Box<ParseNode>,
    }

    XArrowNode {
        label: Cow<'static, str>;
        body: Box<ParseNode>,
        below: Option<Box<ParseNode>>,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EqNoLoc, MathOrdNode, NodeInfo, OrdGroupNode, ParseNode, ParseNodeType, SqrtNode,
    };
    use crate::{expander::Mode, util::SourceLocation};

    fn ord(text: &str, loc: Option<SourceLocation>) -> ParseNode {
        ParseNode::MathOrd(MathOrdNode {
            text: text.to_string(),
            info: NodeInfo::new(Mode::Math, loc),
        })
    }

    #[test]
    fn eq_no_loc_ignores_locations() {
        let a = ParseNode::OrdGroup(OrdGroupNode {
            body: vec![ord("x", Some(SourceLocation(1..2)))],
            info: NodeInfo::new(Mode::Math, Some(SourceLocation(0..3))),
        });
        let b = ParseNode::OrdGroup(OrdGroupNode {
            body: vec![ord("x", None)],
            info: NodeInfo::new_mode(Mode::Math),
        });
        assert!(a.eq_no_loc(&b));
        assert_ne!(a, b);
        assert_eq!(a.without_loc(), b);

        assert!(!ord("x", None).eq_no_loc(&ord("y", None)));
    }

    #[test]
    fn eq_no_loc_compares_optional_children() {
        let sqrt = |index: Option<ParseNode>| {
            ParseNode::Sqrt(SqrtNode {
                body: Box::new(ord("x", None)),
                index: index.map(Box::new),
                info: NodeInfo::new_mode(Mode::Math),
            })
        };
        let with_loc = sqrt(Some(ord("3", Some(SourceLocation(6..7)))));
        assert!(with_loc.eq_no_loc(&sqrt(Some(ord("3", None)))));
        assert!(!with_loc.eq_no_loc(&sqrt(None)));
        assert_eq!(with_loc.without_loc(), sqrt(Some(ord("3", None))));
    }

    #[test]
    fn type_tags() {
        assert_eq!(ParseNodeType::GenFrac.as_str(), "genfrac");
        assert_eq!(ParseNodeType::XArrow.as_str(), "xArrow");
        assert_eq!("supsub".parse::<ParseNodeType>().unwrap(), ParseNodeType::SupSub);
        assert_eq!(ord("x", None).typ(), ParseNodeType::MathOrd);
    }
}
