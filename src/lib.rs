#![allow(clippy::upper_case_acronyms)]

//! Parses KaTeX-flavoured math markup into a tree of typed [`ParseNode`]s.
//!
//! ```
//! use mathast::{parse_tree, ParseNode, ParserConfig};
//!
//! let tree = parse_tree("\\frac{a}{b}", ParserConfig::default()).unwrap();
//! assert!(matches!(tree[0], ParseNode::GenFrac(_)));
//! ```

pub mod environments;
pub mod error;
pub mod expander;
pub mod functions;
pub mod lexer;
pub mod normalize;
pub mod parse_node;
pub mod parser;
pub mod symbols;
pub mod unicode;
pub mod unit;
pub mod util;

pub use error::{ErrorCategory, ParseError, ParseErrorKind};
pub use expander::Mode;
pub use parse_node::{EqNoLoc, ParseNode, ParseNodeType};
pub use parser::{Parser, ParserConfig, StrictMode, Warning};
pub use util::SourceLocation;

/// Parse `input` as math, returning the top-level list of nodes
pub fn parse_tree(input: &str, conf: ParserConfig) -> Result<Vec<ParseNode>, ParseError> {
    Parser::new(input, conf).parse()
}

/// Like [`parse_tree`], also returning the warnings recorded under [`StrictMode::Warn`]
pub fn parse_tree_with_warnings(
    input: &str,
    conf: ParserConfig,
) -> Result<(Vec<ParseNode>, Vec<Warning>), ParseError> {
    let mut parser = Parser::new(input, conf);
    let tree = parser.parse()?;
    Ok((tree, parser.into_warnings()))
}
