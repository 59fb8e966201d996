use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    util::SourceLocation,
};

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    // [1] whitespace run
    // [2] backslash followed by a word, trailing whitespace is consumed but not part of it
    // [3] backslash followed by any single character
    // [4] any other character, with the combining marks that follow it
    const REGEX_TEXT: &str = concat!(
        "^(?:([ \\r\\n\\t]+)",
        "|(\\\\[a-zA-Z@]+)[ \\r\\n\\t]*",
        "|(\\\\[^a-zA-Z@])",
        "|([!-\\[\\]-\\x{2027}\\x{202A}-\\x{D7FF}\\x{F900}-\\x{10FFFF}][\\x{0300}-\\x{036f}]*))",
    );
    Regex::new(REGEX_TEXT).unwrap()
});

/// Turns the input into [`Token`]s, one at a time.
///
/// Lexing depends on the mode: in math mode whitespace only separates tokens and is dropped,
/// in text mode a run of whitespace is kept as a single `" "` token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    pub(crate) mode: Mode,
}
impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, mode: Mode) -> Lexer<'a> {
        Lexer {
            input,
            pos: 0,
            mode,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Lex a single token
    pub fn lex(&mut self) -> Result<Token<'a>, ParseError> {
        loop {
            if self.pos >= self.input.len() {
                debug_assert_eq!(self.pos, self.input.len());
                return Ok(Token::eof(self.pos).in_mode(self.mode));
            }

            let initial_pos = self.pos;
            let rest = &self.input[self.pos..];

            if rest.starts_with('%') {
                // Comments run to the end of the line
                match rest.find('\n') {
                    Some(nl_index) => self.pos += nl_index + '\n'.len_utf8(),
                    None => self.pos = self.input.len(),
                }
                continue;
            }

            let Some(capture) = TOKEN_REGEX.captures(rest) else {
                return Err(self.lex_error(initial_pos, rest));
            };

            let whole = capture.get(0).map_or(0, |m| m.end());
            self.pos += whole;

            if let Some(space) = capture.get(1) {
                match self.mode {
                    Mode::Math => continue,
                    Mode::Text => {
                        let loc = initial_pos..initial_pos + space.end();
                        return Ok(Token::new(" ", loc).in_mode(self.mode));
                    }
                }
            }

            let (text, end) = if let Some(word) = capture.get(2) {
                (word.as_str(), word.end())
            } else if let Some(sym) = capture.get(3) {
                // A backslash followed by whitespace is a control space
                if sym.as_str()[1..].starts_with(char::is_whitespace) {
                    ("\\ ", sym.end())
                } else {
                    (sym.as_str(), sym.end())
                }
            } else if let Some(other) = capture.get(4) {
                (other.as_str(), other.end())
            } else {
                return Err(self.lex_error(initial_pos, rest));
            };

            let loc = initial_pos..initial_pos + end;
            return Ok(Token::new(text, loc).in_mode(self.mode));
        }
    }

    fn lex_error(&self, pos: usize, rest: &str) -> ParseError {
        let mut chars = rest.chars();
        let kind = match chars.next() {
            Some('\\') if chars.next().is_none() => ParseErrorKind::LoneBackslash,
            Some(ch) => ParseErrorKind::UnexpectedChar(ch),
            None => ParseErrorKind::LoneBackslash,
        };
        let width = rest.chars().next().map_or(0, char::len_utf8);
        ParseError::with_loc(kind, Some(SourceLocation(pos..pos + width)))
    }
}

/// Note: End of input is a token with the content `"EOF"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub content: Cow<'a, str>,
    pub loc: Option<SourceLocation>,
    /// The mode the token was lexed in
    pub mode: Mode,
}
impl<'a> Token<'a> {
    pub fn new(content: &'a str, loc: impl Into<SourceLocation>) -> Token<'a> {
        Token {
            content: Cow::Borrowed(content),
            loc: Some(loc.into()),
            mode: Mode::Math,
        }
    }

    pub fn new_owned(content: String, loc: Option<SourceLocation>) -> Token<'a> {
        Token {
            content: Cow::Owned(content),
            loc,
            mode: Mode::Math,
        }
    }

    pub fn eof(pos: usize) -> Token<'static> {
        Token {
            content: Cow::Borrowed("EOF"),
            loc: Some(SourceLocation::at(pos)),
            mode: Mode::Math,
        }
    }

    pub fn in_mode(mut self, mode: Mode) -> Token<'a> {
        self.mode = mode;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.content == "EOF"
    }

    /// Whether this is a control sequence like `\frac` or `\{`
    pub fn is_command(&self) -> bool {
        self.content.starts_with('\\')
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ParseErrorKind, expander::Mode, lexer::Token, util::SourceLocation};

    use super::Lexer;

    #[test]
    fn basic_fraction() {
        let mut lexer = Lexer::new(r#"\frac{a}{b}"#, Mode::Math);

        assert_eq!(lexer.lex().unwrap(), Token::new("\\frac", 0..5));
        assert_eq!(lexer.lex().unwrap(), Token::new("{", 5..6));
        assert_eq!(lexer.lex().unwrap(), Token::new("a", 6..7));
        assert_eq!(lexer.lex().unwrap(), Token::new("}", 7..8));
        assert_eq!(lexer.lex().unwrap(), Token::new("{", 8..9));
        assert_eq!(lexer.lex().unwrap(), Token::new("b", 9..10));
        assert_eq!(lexer.lex().unwrap(), Token::new("}", 10..11));
        assert!(lexer.lex().unwrap().is_eof());
    }

    #[test]
    fn math_mode_drops_whitespace_with_comment() {
        let mut lexer = Lexer::new(r#"\left( x \right) % comment"#, Mode::Math);
        assert_eq!(lexer.lex().unwrap(), Token::new("\\left", 0..5));
        assert_eq!(lexer.lex().unwrap(), Token::new("(", 5..6));
        assert_eq!(lexer.lex().unwrap(), Token::new("x", 7..8));
        assert_eq!(lexer.lex().unwrap(), Token::new("\\right", 9..15));
        assert_eq!(lexer.lex().unwrap(), Token::new(")", 15..16));
        assert_eq!(lexer.lex().unwrap(), Token::eof(26));
    }

    #[test]
    fn text_mode_keeps_whitespace() {
        let mut lexer = Lexer::new("a  b", Mode::Text);
        assert_eq!(lexer.lex().unwrap(), Token::new("a", 0..1).in_mode(Mode::Text));
        assert_eq!(lexer.lex().unwrap(), Token::new(" ", 1..3).in_mode(Mode::Text));
        assert_eq!(lexer.lex().unwrap(), Token::new("b", 3..4).in_mode(Mode::Text));
    }

    #[test]
    fn command_swallows_following_space() {
        let mut lexer = Lexer::new("\\alpha  b", Mode::Text);
        assert_eq!(lexer.lex().unwrap(), Token::new("\\alpha", 0..6).in_mode(Mode::Text));
        assert_eq!(lexer.lex().unwrap(), Token::new("b", 8..9).in_mode(Mode::Text));
    }

    #[test]
    fn control_symbols() {
        let mut lexer = Lexer::new("\\\\\\{\\ x", Mode::Math);
        assert_eq!(lexer.lex().unwrap(), Token::new("\\\\", 0..2));
        assert_eq!(lexer.lex().unwrap(), Token::new("\\{", 2..4));
        assert_eq!(lexer.lex().unwrap(), Token::new("\\ ", 4..6));
        assert_eq!(lexer.lex().unwrap(), Token::new("x", 6..7));
    }

    #[test]
    fn combining_marks_stay_with_base() {
        let mut lexer = Lexer::new("e\u{0301}x", Mode::Math);
        assert_eq!(lexer.lex().unwrap(), Token::new("e\u{0301}", 0..3));
        assert_eq!(lexer.lex().unwrap(), Token::new("x", 3..4));
    }

    #[test]
    fn lone_backslash_is_an_error() {
        let mut lexer = Lexer::new("a\\", Mode::Math);
        lexer.lex().unwrap();
        let err = lexer.lex().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LoneBackslash);
        assert_eq!(err.loc, Some(SourceLocation(1..2)));
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut lexer = Lexer::new("x\u{0007}", Mode::Math);
        lexer.lex().unwrap();
        let err = lexer.lex().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('\u{0007}'));
        assert_eq!(err.loc, Some(SourceLocation(1..2)));
    }
}
