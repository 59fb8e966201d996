use std::collections::HashMap;

use crate::{
    error::{ParseError, ParseErrorKind},
    lexer::{Lexer, Token},
    util::SourceLocation,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Math,
    Text,
}
impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Math => "math",
            Mode::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BreakToken {
    // Note that these comments do not escape backslashes
    /// "]"
    RightSquareBracket,
    /// "}"
    RightCurlyBracket,
    /// "\end"
    End,
    /// "\right"
    Right,
    EOF,
}
impl BreakToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakToken::RightSquareBracket => "]",
            BreakToken::RightCurlyBracket => "}",
            BreakToken::End => "\\end",
            BreakToken::Right => "\\right",
            BreakToken::EOF => "EOF",
        }
    }

    pub fn matches(&self, t: &str) -> bool {
        self.as_str() == t
    }
}

pub(crate) const IMPLICIT_COMMANDS: &[&str] = &["^", "_", "\\limits", "\\nolimits"];
pub(crate) fn is_implicit_command(text: &str) -> bool {
    IMPLICIT_COMMANDS.iter().any(|cmd| *cmd == text)
}

/// Sits between the lexer and the parser, replacing user macros with their definitions.
///
/// Tokens pushed back onto the stack are returned before new ones are lexed.
#[derive(Debug, Clone)]
pub struct MacroExpander<'a> {
    pub(crate) lexer: Lexer<'a>,
    macros: HashMap<String, String>,
    max_expand: Option<u32>,
    stack: Vec<Token<'a>>,

    /// The number of expansions we've done. Used to make sure that we don't exceed any limits.
    expansion_count: u32,
}
impl<'a> MacroExpander<'a> {
    pub fn new(
        input: &'a str,
        macros: HashMap<String, String>,
        max_expand: Option<u32>,
        mode: Mode,
    ) -> MacroExpander<'a> {
        MacroExpander {
            lexer: Lexer::new(input, mode),
            macros,
            max_expand,
            stack: Vec::new(),
            expansion_count: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.lexer.mode
    }

    pub fn switch_mode(&mut self, new_mode: Mode) {
        self.lexer.set_mode(new_mode);
    }

    /// Remove and return the next unexpanded token
    pub(crate) fn pop_token(&mut self) -> Result<Token<'a>, ParseError> {
        match self.stack.pop() {
            Some(token) => Ok(token),
            None => self.lexer.lex(),
        }
    }

    pub(crate) fn push_token(&mut self, token: Token<'a>) {
        self.stack.push(token);
    }

    /// Recursively expand first token, then return first non-expandable token
    pub fn expand_next_token(&mut self) -> Result<Token<'a>, ParseError> {
        loop {
            let token = self.pop_token()?;
            let Some(definition) = self.macros.get(token.content.as_ref()).cloned() else {
                return Ok(token);
            };

            self.expansion_count += 1;
            if let Some(max) = self.max_expand {
                if self.expansion_count > max {
                    return Err(ParseError::with_loc(
                        ParseErrorKind::TooManyExpansions,
                        token.loc.clone(),
                    ));
                }
            }

            let replacement = self.expand_definition(&definition, token.loc.clone())?;
            // The stack is popped from the end, so push in reverse
            for tok in replacement.into_iter().rev() {
                self.push_token(tok);
            }
        }
    }

    /// Lex the definition and paste the invocation's arguments in place of `#1`..`#9`
    fn expand_definition(
        &mut self,
        definition: &str,
        loc: Option<SourceLocation>,
    ) -> Result<Vec<Token<'a>>, ParseError> {
        let mut body = Vec::new();
        let mut lexer = Lexer::new(definition, self.mode());
        loop {
            let tok = lexer.lex()?;
            if tok.is_eof() {
                break;
            }
            body.push(Token::new_owned(tok.content.into_owned(), loc.clone()).in_mode(tok.mode));
        }

        let num_args = body
            .windows(2)
            .filter(|pair| pair[0].content == "#")
            .filter_map(|pair| pair[1].content.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        if num_args == 0 {
            return Ok(body);
        }

        let mut args = Vec::with_capacity(num_args);
        for _ in 0..num_args {
            args.push(self.consume_arg()?);
        }

        let mut out = Vec::with_capacity(body.len());
        let mut tokens = body.into_iter().peekable();
        while let Some(tok) = tokens.next() {
            if tok.content != "#" {
                out.push(tok);
                continue;
            }

            match tokens.next() {
                Some(next) if next.content == "#" => out.push(next),
                Some(next) => {
                    let index = next
                        .content
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| i.checked_sub(1))
                        .and_then(|i| args.get(i));
                    let Some(arg) = index else {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::Expected {
                                expected: "#1..#9".to_string(),
                                found: format!("#{}", next.content),
                            },
                            loc,
                        ));
                    };
                    out.extend(arg.iter().cloned());
                }
                None => out.push(tok),
            }
        }

        Ok(out)
    }

    /// Consume a macro argument: a brace-delimited token list or a single token
    fn consume_arg(&mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut start = self.pop_token()?;
        while start.content == " " {
            start = self.pop_token()?;
        }

        if start.is_eof() {
            return Err(ParseError::with_loc(
                ParseErrorKind::Expected {
                    expected: "macro argument".to_string(),
                    found: "EOF".to_string(),
                },
                start.loc,
            ));
        }

        if start.content != "{" {
            return Ok(vec![start]);
        }

        let mut tokens = Vec::new();
        let mut depth: usize = 1;
        loop {
            let tok = self.pop_token()?;
            if tok.is_eof() {
                return Err(ParseError::with_loc(
                    ParseErrorKind::Expected {
                        expected: "}".to_string(),
                        found: "EOF".to_string(),
                    },
                    tok.loc,
                ));
            }

            if tok.content == "{" {
                depth += 1;
            } else if tok.content == "}" {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            tokens.push(tok);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{MacroExpander, Mode};
    use crate::error::ParseErrorKind;

    fn expand_all(input: &str, macros: &[(&str, &str)], max_expand: Option<u32>) -> Vec<String> {
        let macros = macros
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        let mut gullet = MacroExpander::new(input, macros, max_expand, Mode::Math);
        let mut out = Vec::new();
        loop {
            let tok = gullet.expand_next_token().unwrap();
            if tok.is_eof() {
                break;
            }
            out.push(tok.content.into_owned());
        }
        out
    }

    #[test]
    fn plain_macro() {
        let out = expand_all("\\R+1", &[("\\R", "\\mathbb{R}")], None);
        assert_eq!(out, ["\\mathbb", "{", "R", "}", "+", "1"]);
    }

    #[test]
    fn macro_with_arguments() {
        let out = expand_all("\\pair{a}b", &[("\\pair", "(#1,#2)")], None);
        assert_eq!(out, ["(", "a", ",", "b", ")"]);
    }

    #[test]
    fn expansion_limit() {
        let macros = HashMap::from([("\\loop".to_string(), "\\loop".to_string())]);
        let mut gullet = MacroExpander::new("\\loop", macros, Some(10), Mode::Math);
        let err = gullet.expand_next_token().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooManyExpansions);
    }
}
