use unicode_normalization::UnicodeNormalization;

use crate::expander::Mode;

pub struct Accent {
    pub mark: char,
    pub text: &'static str,
    pub math: Option<&'static str>,
}
impl Accent {
    const fn new(mark: char, text: &'static str, math: &'static str) -> Accent {
        Accent {
            mark,
            text,
            math: Some(math),
        }
    }

    const fn new_text(mark: char, text: &'static str) -> Accent {
        Accent {
            mark,
            text,
            math: None,
        }
    }

    /// The accent command for the mode, if the accent exists in that mode
    pub fn command(&self, mode: Mode) -> Option<&'static str> {
        match mode {
            Mode::Math => self.math,
            Mode::Text => Some(self.text),
        }
    }
}

/// Maps combining marks to their accent command in text and math mode
pub const ACCENTS: &[Accent] = &[
    Accent::new('\u{0301}', "\\'", "\\acute"),
    Accent::new('\u{0300}', "\\`", "\\grave"),
    Accent::new('\u{0308}', "\\\"", "\\ddot"),
    Accent::new('\u{0303}', "\\~", "\\tilde"),
    Accent::new('\u{0304}', "\\=", "\\bar"),
    Accent::new('\u{0306}', "\\u", "\\breve"),
    Accent::new('\u{030c}', "\\v", "\\check"),
    Accent::new('\u{0302}', "\\^", "\\hat"),
    Accent::new('\u{0307}', "\\.", "\\dot"),
    Accent::new('\u{030a}', "\\r", "\\mathring"),
    Accent::new_text('\u{030b}', "\\H"),
];

pub fn get_accent(mark: char) -> Option<&'static Accent> {
    ACCENTS.iter().find(|accent| accent.mark == mark)
}

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}

/// Split a symbol like `"é"` (precomposed or not) into its base text and the
/// combining marks that follow it, innermost first.
///
/// Returns `None` when there is nothing to split off.
pub fn split_accents(text: &str) -> Option<(String, Vec<char>)> {
    let decomposed = text.nfd().collect::<String>();
    let split = decomposed.find(is_combining_mark)?;
    if split == 0 {
        return None;
    }

    let base = decomposed[..split].to_string();
    let marks = decomposed[split..].chars().collect::<Vec<_>>();
    if !marks.iter().copied().all(is_combining_mark) {
        return None;
    }

    Some((base, marks))
}
