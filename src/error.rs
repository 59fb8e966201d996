//! Errors produced while turning markup into a node tree.
//!
//! Every error carries the byte range of the input that caused it (when one exists) and belongs
//! to exactly one [`ErrorCategory`], so callers can tell bad input apart from a bug in the parser.

use thiserror::Error;

use crate::{expander::Mode, util::SourceLocation};

/// Broad classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A malformed token
    Lexical,
    /// The tokens do not form a valid expression
    Grammar,
    /// The expression is well formed but a value inside it is not acceptable
    Semantic,
    /// A table or registry inside the parser is inconsistent
    Internal,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}{}", describe_loc(.loc.as_ref()))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub loc: Option<SourceLocation>,
}
impl ParseError {
    pub fn new(kind: ParseErrorKind) -> ParseError {
        ParseError { kind, loc: None }
    }

    pub fn with_loc(kind: ParseErrorKind, loc: Option<SourceLocation>) -> ParseError {
        ParseError { kind, loc }
    }

    /// Attach a location if the error does not have one yet
    pub(crate) fn or_loc(mut self, loc: Option<SourceLocation>) -> ParseError {
        if self.loc.is_none() {
            self.loc = loc;
        }
        self
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}
impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        ParseError::new(kind)
    }
}

fn describe_loc(loc: Option<&SourceLocation>) -> String {
    match loc {
        Some(loc) if loc.start() == loc.end() => format!(" at position {}", loc.start()),
        Some(loc) => format!(" at position {}..{}", loc.start(), loc.end()),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    // Lexical
    #[error("Unexpected character: '{0}'")]
    UnexpectedChar(char),
    #[error("Unexpected end of input after '\\'")]
    LoneBackslash,

    // Grammar
    #[error("Expected '{expected}', got '{found}'")]
    Expected { expected: String, found: String },
    #[error("Undefined control sequence: {0}")]
    UndefinedControlSequence(String),
    #[error("Can't use function '{0}' in text mode")]
    FunctionUnusableTextMode(String),
    #[error("Can't use function '{0}' in math mode")]
    FunctionUnusableMathMode(String),
    #[error("Got function '{func}' with no arguments as {context}")]
    FunctionNoArguments { func: String, context: String },
    #[error("Expected group after '{0}'")]
    ExpectedGroup(String),
    #[error("Double superscript")]
    DoubleSuperscript,
    #[error("Double subscript")]
    DoubleSubscript,
    #[error("Only one infix operator per group")]
    OnlyOneInfixOperatorPerGroup,
    #[error("Mismatch: \\begin{{{begin}}} matched by \\end{{{end}}}")]
    MismatchedEnvironment { begin: String, end: String },
    #[error("Limit controls must follow a math operator")]
    ExpectedLimitControls,
    #[error("Too many expansions: infinite loop or need to increase maxExpand setting")]
    TooManyExpansions,
    #[error("Expression nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("{message} [{code}]")]
    Strict { code: &'static str, message: String },
    #[error("\\middle without preceding \\left")]
    MiddleWithoutLeft,

    // Semantic
    #[error("Invalid size: '{0}'")]
    InvalidSize(String),
    #[error("Invalid color: '{0}'")]
    InvalidColor(String),
    #[error("No such environment: {0}")]
    UnknownEnvironment(String),
    #[error("Invalid environment name")]
    InvalidEnvironmentName,
    #[error("Unknown column alignment: {0}")]
    InvalidColumnAlignment(String),
    #[error("Invalid delimiter '{delim}' after '{func}'")]
    InvalidDelimiter { delim: String, func: String },
    #[error("Invalid \\smash option: '{0}'")]
    InvalidSmashOption(char),
    #[error("Unknown accent '{mark}' in {mode:?} mode")]
    UnknownAccent { mark: char, mode: Mode },

    // Internal
    #[error("Unrecognized {family} command: {name}")]
    UnrecognizedCommand { family: &'static str, name: String },
    #[error("No function handler for {0}")]
    NoFunctionHandler(String),
    #[error("Unexpected argument shape for {0} in {1:?} mode")]
    UnexpectedArgument(String, Mode),
}
impl ParseErrorKind {
    pub fn category(&self) -> ErrorCategory {
        use ParseErrorKind::*;
        match self {
            UnexpectedChar(_) | LoneBackslash => ErrorCategory::Lexical,
            Expected { .. }
            | UndefinedControlSequence(_)
            | FunctionUnusableTextMode(_)
            | FunctionUnusableMathMode(_)
            | FunctionNoArguments { .. }
            | ExpectedGroup(_)
            | DoubleSuperscript
            | DoubleSubscript
            | OnlyOneInfixOperatorPerGroup
            | MismatchedEnvironment { .. }
            | ExpectedLimitControls
            | TooManyExpansions
            | NestingTooDeep(_)
            | Strict { .. }
            | MiddleWithoutLeft => ErrorCategory::Grammar,
            InvalidSize(_)
            | InvalidColor(_)
            | UnknownEnvironment(_)
            | InvalidEnvironmentName
            | InvalidColumnAlignment(_)
            | InvalidDelimiter { .. }
            | InvalidSmashOption(_)
            | UnknownAccent { .. } => ErrorCategory::Semantic,
            UnrecognizedCommand { .. } | NoFunctionHandler(_) | UnexpectedArgument(..) => {
                ErrorCategory::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCategory, ParseError, ParseErrorKind};
    use crate::util::SourceLocation;

    #[test]
    fn display_includes_position() {
        let err = ParseError::with_loc(
            ParseErrorKind::InvalidSize("3".to_string()),
            Some(SourceLocation(6..7)),
        );
        assert_eq!(err.to_string(), "Invalid size: '3' at position 6..7");

        let eof = ParseError::with_loc(
            ParseErrorKind::ExpectedGroup("\\sqrt".to_string()),
            Some(SourceLocation::at(5)),
        );
        assert_eq!(eof.to_string(), "Expected group after '\\sqrt' at position 5");
    }

    #[test]
    fn categories() {
        assert_eq!(
            ParseError::new(ParseErrorKind::LoneBackslash).category(),
            ErrorCategory::Lexical
        );
        assert_eq!(
            ParseError::new(ParseErrorKind::DoubleSubscript).category(),
            ErrorCategory::Grammar
        );
        assert_eq!(
            ParseError::new(ParseErrorKind::InvalidColor("#ggg".into())).category(),
            ErrorCategory::Semantic
        );
        assert_eq!(
            ParseError::new(ParseErrorKind::NoFunctionHandler("\\x".into())).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn or_loc_keeps_existing() {
        let err = ParseError::with_loc(
            ParseErrorKind::DoubleSuperscript,
            Some(SourceLocation(1..2)),
        )
        .or_loc(Some(SourceLocation(5..6)));
        assert_eq!(err.loc, Some(SourceLocation(1..2)));
    }
}
