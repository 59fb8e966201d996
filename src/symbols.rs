use std::collections::HashMap;

use once_cell::sync::Lazy;
use strum_macros::{EnumString, IntoStaticStr};

use crate::{
    expander::Mode,
    parse_node::{AtomNode, MathOrdNode, NodeInfo, ParseNode, SpacingNode, TextOrdNode},
};

/// Math class of an atom symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Atom {
    Bin,
    Close,
    Inner,
    Open,
    Punct,
    Rel,
}
impl Atom {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Atom(Atom),
    MathOrd,
    TextOrd,
    Spacing,
}
impl Group {
    pub(crate) fn make_parse_node(self, info: NodeInfo, text: String) -> ParseNode {
        match self {
            Group::Atom(family) => ParseNode::Atom(AtomNode { family, text, info }),
            Group::MathOrd => ParseNode::MathOrd(MathOrdNode { text, info }),
            Group::TextOrd => ParseNode::TextOrd(TextOrdNode { text, info }),
            Group::Spacing => ParseNode::Spacing(SpacingNode { text, info }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub group: Group,
}

pub struct Symbols {
    math: HashMap<&'static str, Symbol>,
    text: HashMap<&'static str, Symbol>,
}
impl Symbols {
    pub fn get(&self, mode: Mode, key: &str) -> Option<&Symbol> {
        match mode {
            Mode::Math => self.math.get(key),
            Mode::Text => self.text.get(key),
        }
    }

    pub fn contains_key(&self, mode: Mode, key: &str) -> bool {
        self.get(mode, key).is_some()
    }

    /// Register a math symbol under its command name, and under its unicode
    /// character when `accept_unicode_char` is set
    fn math(&mut self, g: Group, r: &'static str, name: &'static str, accept_unicode_char: bool) {
        let symbol = Symbol { group: g };
        if accept_unicode_char && !r.is_empty() {
            self.math.insert(r, symbol.clone());
        }
        self.math.insert(name, symbol);
    }

    fn text(&mut self, g: Group, r: &'static str, name: &'static str, accept_unicode_char: bool) {
        let symbol = Symbol { group: g };
        if accept_unicode_char && !r.is_empty() {
            self.text.insert(r, symbol.clone());
        }
        self.text.insert(name, symbol);
    }

    fn both(&mut self, g: Group, r: &'static str, name: &'static str, accept_unicode_char: bool) {
        self.math(g, r, name, accept_unicode_char);
        self.text(g, r, name, accept_unicode_char);
    }
}

use Atom::*;
const BIN: Group = Group::Atom(Bin);
const CLOSE: Group = Group::Atom(Close);
const INNER: Group = Group::Atom(Inner);
const OPEN: Group = Group::Atom(Open);
const PUNCT: Group = Group::Atom(Punct);
const REL: Group = Group::Atom(Rel);
const MATHORD: Group = Group::MathOrd;
const TEXTORD: Group = Group::TextOrd;
const SPACING: Group = Group::Spacing;

pub static SYMBOLS: Lazy<Symbols> = Lazy::new(|| {
    let mut s = Symbols {
        math: HashMap::new(),
        text: HashMap::new(),
    };

    const LOWER_GREEK: &[(&str, &str)] = &[
        ("α", "\\alpha"),
        ("β", "\\beta"),
        ("γ", "\\gamma"),
        ("δ", "\\delta"),
        ("ϵ", "\\epsilon"),
        ("ζ", "\\zeta"),
        ("η", "\\eta"),
        ("θ", "\\theta"),
        ("ι", "\\iota"),
        ("κ", "\\kappa"),
        ("λ", "\\lambda"),
        ("μ", "\\mu"),
        ("ν", "\\nu"),
        ("ξ", "\\xi"),
        ("ο", "\\omicron"),
        ("π", "\\pi"),
        ("ρ", "\\rho"),
        ("σ", "\\sigma"),
        ("τ", "\\tau"),
        ("υ", "\\upsilon"),
        ("ϕ", "\\phi"),
        ("χ", "\\chi"),
        ("ψ", "\\psi"),
        ("ω", "\\omega"),
        ("ε", "\\varepsilon"),
        ("ϑ", "\\vartheta"),
        ("ϖ", "\\varpi"),
        ("ϱ", "\\varrho"),
        ("ς", "\\varsigma"),
        ("φ", "\\varphi"),
    ];
    for &(r, name) in LOWER_GREEK {
        s.math(MATHORD, r, name, true);
    }

    const UPPER_GREEK: &[(&str, &str)] = &[
        ("Γ", "\\Gamma"),
        ("Δ", "\\Delta"),
        ("Θ", "\\Theta"),
        ("Λ", "\\Lambda"),
        ("Ξ", "\\Xi"),
        ("Π", "\\Pi"),
        ("Σ", "\\Sigma"),
        ("Υ", "\\Upsilon"),
        ("Φ", "\\Phi"),
        ("Ψ", "\\Psi"),
        ("Ω", "\\Omega"),
    ];
    for &(r, name) in UPPER_GREEK {
        s.math(TEXTORD, r, name, true);
    }

    // Ordinary math symbols
    s.math(TEXTORD, "∞", "\\infty", true);
    s.math(TEXTORD, "∂", "\\partial", true);
    s.math(TEXTORD, "∇", "\\nabla", true);
    s.math(TEXTORD, "∀", "\\forall", true);
    s.math(TEXTORD, "∃", "\\exists", true);
    s.math(TEXTORD, "∅", "\\emptyset", true);
    s.math(TEXTORD, "∅", "\\varnothing", false);
    s.math(TEXTORD, "ℏ", "\\hbar", true);
    s.math(TEXTORD, "ℓ", "\\ell", true);
    s.math(MATHORD, "\u{131}", "\\imath", true);
    s.math(MATHORD, "\u{237}", "\\jmath", true);
    s.math(TEXTORD, "ℵ", "\\aleph", true);
    s.math(TEXTORD, "¬", "\\neg", true);
    s.math(TEXTORD, "¬", "\\lnot", false);
    s.math(TEXTORD, "′", "\\prime", true);
    s.math(TEXTORD, "∠", "\\angle", true);
    s.math(TEXTORD, "△", "\\triangle", true);
    s.math(TEXTORD, "∥", "\\|", false);
    s.math(TEXTORD, "|", "\\vert", false);
    s.math(TEXTORD, "∥", "\\Vert", false);
    s.math(TEXTORD, "|", "|", false);
    s.math(TEXTORD, "/", "/", false);
    s.math(TEXTORD, ".", ".", false);
    s.math(TEXTORD, "@", "@", false);
    s.math(TEXTORD, "\"", "\"", false);
    s.math(INNER, "…", "\\ldots", true);
    s.math(INNER, "…", "\\dots", false);
    s.math(INNER, "⋯", "\\cdots", true);
    s.math(INNER, "⋱", "\\ddots", true);
    s.math(TEXTORD, "⋮", "\\vdots", true);

    // Binary operators
    s.math(BIN, "+", "+", false);
    s.math(BIN, "−", "-", false);
    s.math(BIN, "∗", "*", false);
    s.math(BIN, "±", "\\pm", true);
    s.math(BIN, "∓", "\\mp", true);
    s.math(BIN, "×", "\\times", true);
    s.math(BIN, "÷", "\\div", true);
    s.math(BIN, "⋅", "\\cdot", true);
    s.math(BIN, "∘", "\\circ", true);
    s.math(BIN, "∙", "\\bullet", true);
    s.math(BIN, "∪", "\\cup", true);
    s.math(BIN, "∩", "\\cap", true);
    s.math(BIN, "∖", "\\setminus", true);
    s.math(BIN, "∧", "\\wedge", true);
    s.math(BIN, "∧", "\\land", false);
    s.math(BIN, "∨", "\\vee", true);
    s.math(BIN, "∨", "\\lor", false);
    s.math(BIN, "⊕", "\\oplus", true);
    s.math(BIN, "⊗", "\\otimes", true);
    s.math(BIN, "⊙", "\\odot", true);

    // Relations
    s.math(REL, "=", "=", false);
    s.math(REL, "<", "<", false);
    s.math(REL, ">", ">", false);
    s.math(REL, ":", ":", false);
    s.math(REL, "≤", "\\le", true);
    s.math(REL, "≤", "\\leq", false);
    s.math(REL, "≥", "\\ge", true);
    s.math(REL, "≥", "\\geq", false);
    s.math(REL, "≠", "\\ne", true);
    s.math(REL, "≠", "\\neq", false);
    s.math(REL, "≡", "\\equiv", true);
    s.math(REL, "∼", "\\sim", true);
    s.math(REL, "≃", "\\simeq", true);
    s.math(REL, "≈", "\\approx", true);
    s.math(REL, "≅", "\\cong", true);
    s.math(REL, "∝", "\\propto", true);
    s.math(REL, "⊂", "\\subset", true);
    s.math(REL, "⊃", "\\supset", true);
    s.math(REL, "⊆", "\\subseteq", true);
    s.math(REL, "⊇", "\\supseteq", true);
    s.math(REL, "∈", "\\in", true);
    s.math(REL, "∋", "\\ni", true);
    s.math(REL, "∉", "\\notin", true);
    s.math(REL, "∣", "\\mid", true);
    s.math(REL, "∥", "\\parallel", true);
    s.math(REL, "⊥", "\\perp", true);
    s.math(REL, "→", "\\rightarrow", true);
    s.math(REL, "→", "\\to", false);
    s.math(REL, "←", "\\leftarrow", true);
    s.math(REL, "←", "\\gets", false);
    s.math(REL, "↔", "\\leftrightarrow", true);
    s.math(REL, "⇒", "\\Rightarrow", true);
    s.math(REL, "⇐", "\\Leftarrow", true);
    s.math(REL, "⇔", "\\Leftrightarrow", true);
    s.math(REL, "⟺", "\\iff", false);
    s.math(REL, "⟹", "\\implies", false);
    s.math(REL, "↦", "\\mapsto", true);
    s.math(REL, "↑", "\\uparrow", true);
    s.math(REL, "↓", "\\downarrow", true);

    // Delimiters
    s.math(OPEN, "(", "(", false);
    s.math(OPEN, "[", "[", false);
    s.math(OPEN, "{", "\\{", false);
    s.math(OPEN, "{", "\\lbrace", false);
    s.math(OPEN, "[", "\\lbrack", false);
    s.math(OPEN, "⟨", "\\langle", true);
    s.math(OPEN, "⌊", "\\lfloor", true);
    s.math(OPEN, "⌈", "\\lceil", true);
    s.math(CLOSE, ")", ")", false);
    s.math(CLOSE, "]", "]", false);
    s.math(CLOSE, "}", "\\}", false);
    s.math(CLOSE, "}", "\\rbrace", false);
    s.math(CLOSE, "]", "\\rbrack", false);
    s.math(CLOSE, "⟩", "\\rangle", true);
    s.math(CLOSE, "⌋", "\\rfloor", true);
    s.math(CLOSE, "⌉", "\\rceil", true);
    s.math(CLOSE, "?", "?", false);
    s.math(CLOSE, "!", "!", false);
    s.math(OPEN, "(", "\\lparen", false);
    s.math(CLOSE, ")", "\\rparen", false);
    s.math(OPEN, "∣", "\\lvert", false);
    s.math(CLOSE, "∣", "\\rvert", false);
    s.math(OPEN, "∥", "\\lVert", false);
    s.math(CLOSE, "∥", "\\rVert", false);
    s.math(OPEN, "⟮", "\\lgroup", true);
    s.math(CLOSE, "⟯", "\\rgroup", true);
    s.math(OPEN, "⎰", "\\lmoustache", true);
    s.math(CLOSE, "⎱", "\\rmoustache", true);
    s.math(REL, "<", "\\lt", false);
    s.math(REL, ">", "\\gt", false);
    s.math(REL, "⇑", "\\Uparrow", true);
    s.math(REL, "⇓", "\\Downarrow", true);
    s.math(REL, "↕", "\\updownarrow", true);
    s.math(REL, "⇕", "\\Updownarrow", true);
    s.math(TEXTORD, "\\", "\\backslash", false);

    s.math(PUNCT, ",", ",", false);
    s.math(PUNCT, ";", ";", false);
    s.math(PUNCT, ":", "\\colon", false);

    // Spacing
    s.both(SPACING, "\u{a0}", "~", false);
    s.both(SPACING, "\u{a0}", "\\ ", false);
    s.both(SPACING, "\u{a0}", "\\space", false);
    s.both(SPACING, "\u{a0}", "\\nobreakspace", false);
    s.math(SPACING, "", "\\,", false);
    s.math(SPACING, "", "\\:", false);
    s.math(SPACING, "", "\\;", false);
    s.math(SPACING, "", "\\!", false);
    s.both(SPACING, "", "\\quad", false);
    s.both(SPACING, "", "\\qquad", false);
    s.text(SPACING, "\u{a0}", " ", false);

    // Escaped characters shared by both modes
    for (r, name) in [("$", "\\$"), ("%", "\\%"), ("_", "\\_"), ("&", "\\&"), ("#", "\\#")] {
        s.both(TEXTORD, r, name, false);
    }
    s.text(TEXTORD, "{", "\\{", false);
    s.text(TEXTORD, "}", "\\}", false);
    s.text(TEXTORD, "{", "\\textbraceleft", false);
    s.text(TEXTORD, "}", "\\textbraceright", false);
    s.text(TEXTORD, "\\", "\\textbackslash", false);
    s.text(TEXTORD, "–", "--", true);
    s.text(TEXTORD, "–", "\\textendash", false);
    s.text(TEXTORD, "—", "---", true);
    s.text(TEXTORD, "—", "\\textemdash", false);
    s.text(TEXTORD, "‘", "`", true);
    s.text(TEXTORD, "‘", "\\textquoteleft", false);
    s.text(TEXTORD, "’", "'", true);
    s.text(TEXTORD, "’", "\\textquoteright", false);
    s.text(TEXTORD, "“", "``", true);
    s.text(TEXTORD, "“", "\\textquotedblleft", false);
    s.text(TEXTORD, "”", "''", true);
    s.text(TEXTORD, "”", "\\textquotedblright", false);
    s.text(TEXTORD, "…", "\\textellipsis", true);
    s.text(TEXTORD, "…", "\\ldots", false);
    s.text(TEXTORD, "|", "\\textbar", false);
    s.text(TEXTORD, "\u{131}", "\\i", true);
    s.text(TEXTORD, "\u{237}", "\\j", true);

    // Text mode keeps almost all printable ASCII as plain characters
    for ch in "0123456789/@.\"!?()[]-+=<>:;,*|".split_inclusive(|_: char| true) {
        s.text(TEXTORD, ch, ch, false);
    }
    for ch in "0123456789".split_inclusive(|_: char| true) {
        s.math(TEXTORD, ch, ch, false);
    }

    const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    for ch in LETTERS.split_inclusive(|_: char| true) {
        s.math(MATHORD, ch, ch, false);
        s.text(TEXTORD, ch, ch, false);
    }

    // Greek letters typed directly in text mode are ordinary text
    for &(r, _) in LOWER_GREEK.iter().chain(UPPER_GREEK) {
        s.text(TEXTORD, r, r, false);
    }

    s
});

/// Delimiters accepted by `\left`, `\right`, `\middle` and the `\big` family
pub const DELIMITERS: &[&str] = &[
    "(",
    "\\lparen",
    ")",
    "\\rparen",
    "[",
    "\\lbrack",
    "]",
    "\\rbrack",
    "\\{",
    "\\lbrace",
    "\\}",
    "\\rbrace",
    "\\lfloor",
    "\\rfloor",
    "⌊",
    "⌋",
    "\\lceil",
    "\\rceil",
    "⌈",
    "⌉",
    "<",
    ">",
    "\\langle",
    "⟨",
    "\\rangle",
    "⟩",
    "\\lt",
    "\\gt",
    "\\lvert",
    "\\rvert",
    "\\lVert",
    "\\rVert",
    "\\lgroup",
    "\\rgroup",
    "\\lmoustache",
    "\\rmoustache",
    "/",
    "\\backslash",
    "|",
    "\\vert",
    "\\|",
    "\\Vert",
    "\\uparrow",
    "\\Uparrow",
    "\\downarrow",
    "\\Downarrow",
    "\\updownarrow",
    "\\Updownarrow",
    ".",
];

pub fn is_delimiter(text: &str) -> bool {
    DELIMITERS.contains(&text)
}
