use std::{fmt::Debug, ops::Range};

use strum_macros::{EnumString, IntoStaticStr};

use crate::expander::Mode;

/// Half-open byte range into the original input.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation(pub Range<usize>);
impl SourceLocation {
    /// An empty location at `pos`, used for things like the end of input
    pub fn at(pos: usize) -> SourceLocation {
        SourceLocation(pos..pos)
    }

    pub fn start(&self) -> usize {
        self.0.start
    }

    pub fn end(&self) -> usize {
        self.0.end
    }

    pub(crate) fn combine(
        start: impl Into<Option<SourceLocation>>,
        end: impl Into<Option<SourceLocation>>,
    ) -> Option<SourceLocation> {
        let start = start.into();
        let end = end.into();
        match (start, end) {
            (Some(start), Some(end)) => Some(SourceLocation(start.0.start..end.0.end)),
            (Some(start), None) => Some(start),
            (None, end) => end,
        }
    }
}
impl From<Range<usize>> for SourceLocation {
    fn from(range: Range<usize>) -> Self {
        Self(range)
    }
}
// Custom implementation of debug so that it is a bit less verbose when
// printed
impl Debug for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("SourceLocation({:?})", self.0))
    }
}

/// LaTeX display style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Style {
    Text,
    Display,
    Script,
    ScriptScript,
}
impl Style {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Get the style switched to by a command like `\displaystyle`
    pub fn from_command(name: &str) -> Option<Style> {
        Some(match name {
            "\\displaystyle" => Style::Display,
            "\\textstyle" => Style::Text,
            "\\scriptstyle" => Style::Script,
            "\\scriptscriptstyle" => Style::ScriptScript,
            _ => return None,
        })
    }
}

/// Size of a fraction: forced to a style, or left to the surrounding context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleAuto {
    Style(Style),
    Auto,
}
impl StyleAuto {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleAuto::Style(style) => style.as_str(),
            StyleAuto::Auto => "auto",
        }
    }
}

/// LaTeX argument type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// An HTML color, like "#abc" or "blue"
    Color,
    /// A size-like thing, such as "1em" or "5ex"
    Size,
    /// The same mode as the surrounding expression
    Original,
    /// An argument parsed in a specific mode, like `\text`'s argument in text mode
    Mode(Mode),
}

/// The first character of `text` as a `&str`
pub(crate) fn first_ch_str(text: &str) -> Option<&str> {
    let ch = text.chars().next()?;
    Some(&text[..ch.len_utf8()])
}

#[cfg(test)]
mod tests {
    use super::{first_ch_str, SourceLocation, Style, StyleAuto};

    #[test]
    fn combine_locations() {
        let a = SourceLocation(2..4);
        let b = SourceLocation(7..9);
        assert_eq!(SourceLocation::combine(a.clone(), b), Some(SourceLocation(2..9)));
        assert_eq!(SourceLocation::combine(a.clone(), None::<SourceLocation>), Some(a));
        assert_eq!(SourceLocation::combine(None::<SourceLocation>, None::<SourceLocation>), None);
    }

    #[test]
    fn style_names() {
        assert_eq!(Style::ScriptScript.as_str(), "scriptscript");
        assert_eq!(StyleAuto::Auto.as_str(), "auto");
        assert_eq!("display".parse::<Style>().unwrap(), Style::Display);
    }

    #[test]
    fn first_char() {
        assert_eq!(first_ch_str("λx"), Some("λ"));
        assert_eq!(first_ch_str(""), None);
    }
}
