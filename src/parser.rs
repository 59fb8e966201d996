use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::{is_implicit_command, BreakToken, MacroExpander, Mode},
    functions::{
        accent::build_accent,
        color::{build_color, check_color},
        font::{build_font, OLD_FONT_FUNCS},
        may_absorb,
        sizing::{build_sizing, size_index},
        styling::build_styling,
        Arg, FunctionContext, FunctionPropSpec, FUNCTIONS,
    },
    lexer::Token,
    normalize,
    parse_node::{
        ColorNode, NodeInfo, OrdGroupNode, ParseNode, SupSubNode, TextNode, TextOrdNode,
    },
    symbols::SYMBOLS,
    unicode::{get_accent, split_accents},
    util::{first_ch_str, ArgType, SourceLocation, Style},
};

static SIZE_GROUP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[-+]? *(?:$|\\d+|\\d+\\.\\d*|\\.\\d*) *[a-z]{0,2} *$").unwrap());

/// Greediness of `^` and `_`: their argument may only be a command that binds tighter than this
const SUPSUB_GREEDINESS: u8 = 1;

/// Configuration options for parsing.
///
/// With the `serde` feature the options can be read from a document using the camelCase names,
/// missing keys keep their default and unknown keys are ignored.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ParserConfig {
    /// Limit the number of macro expansions to this number, to prevent e.g. infinite macro loops.
    /// If set to `None`, macros are expanded without limit.
    #[cfg_attr(feature = "serde", serde(alias = "maxExpansionDepth"))]
    pub max_expand: Option<u32>,
    /// How strict to be about features which make writing the notation easier but are not
    /// supported by LaTeX itself.
    pub strict: StrictMode,
    /// User macros, from the name (like `\R`) to the replacement text.
    /// The replacement may refer to its arguments as `#1` to `#9`.
    pub macros: HashMap<String, String>,
    /// Check color arguments against the color grammar
    pub color_validation: bool,
    /// Deepest allowed nesting of groups, arguments, environment bodies and `\left...\right`
    /// bodies. Past it the parse fails with `NestingTooDeep` instead of recursing further.
    ///
    /// The default of 100 keeps an unoptimized build within a 2 MiB thread stack, the default
    /// for spawned threads. Raise it only together with the stack size of the parsing thread.
    pub max_nesting_depth: usize,
    /// In early versions of KaTeX and MathJax, the `\color` function expected the content to
    /// be a function argument, as in `\color{blue}{hello}`.
    /// Now `\color` is a switch, as in `\color{blue} hello`, which matches LaTeX.
    /// Setting this to true uses the old behavior.
    pub color_is_text_color: bool,
    /// Whether an unknown command is an error, or is kept as text in `error_color`
    pub throw_on_error: bool,
    /// The color unknown commands are shown in when `throw_on_error` is false
    pub error_color: String,
}
impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_expand: Some(1000),
            strict: StrictMode::Warn,
            macros: HashMap::new(),
            color_validation: true,
            max_nesting_depth: 100,
            color_is_text_color: false,
            throw_on_error: true,
            error_color: "#cc0000".to_string(),
        }
    }
}

/// How strict to be about input that is accepted for convenience but that LaTeX itself would
/// reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StrictMode {
    /// Accept silently
    Ignore,
    /// Accept, recording a [`Warning`]
    Warn,
    /// Fail the parse
    Error,
}

/// A non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Short machine readable name, like `"unicodeTextInMathMode"`
    pub code: &'static str,
    pub message: String,
    pub loc: Option<SourceLocation>,
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    pub(crate) conf: ParserConfig,
    gullet: MacroExpander<'a>,
    /// Lookahead token
    next_token: Option<Token<'a>>,
    /// Current group/argument nesting
    depth: usize,
    /// Number of `\left` we are currently inside of
    pub(crate) leftright_depth: usize,
    warnings: Vec<Warning>,
    /// Location of the last token that was consumed, the end of whatever was just parsed
    last_consumed_loc: Option<SourceLocation>,
}
impl<'a> Parser<'a> {
    pub fn new(input: &'a str, conf: ParserConfig) -> Parser<'a> {
        Parser {
            gullet: MacroExpander::new(input, conf.macros.clone(), conf.max_expand, Mode::Math),
            conf,
            next_token: None,
            depth: 0,
            leftright_depth: 0,
            warnings: Vec::new(),
            last_consumed_loc: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.gullet.mode()
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Main parsing function, which parses an entire input.
    pub fn parse(&mut self) -> Result<Vec<ParseNode>, ParseError> {
        let body = self.parse_expression(false, None)?;
        self.expect("EOF", false)?;
        Ok(body)
    }

    pub(crate) fn expect(&mut self, text: &str, consume: bool) -> Result<(), ParseError> {
        let token = self.fetch()?;
        if token.content != text {
            return Err(ParseError::with_loc(
                ParseErrorKind::Expected {
                    expected: text.to_string(),
                    found: token.content.to_string(),
                },
                token.loc.clone(),
            ));
        }

        if consume {
            self.consume();
        }

        Ok(())
    }

    /// Discards the current lookahead token
    pub(crate) fn consume(&mut self) {
        if let Some(token) = self.next_token.take() {
            self.last_consumed_loc = token.loc;
        }
    }

    /// Discard any space tokens, fetching the next non-space token.
    pub(crate) fn consume_spaces(&mut self) -> Result<(), ParseError> {
        while self.fetch()?.content == " " {
            self.consume();
        }

        Ok(())
    }

    /// Returns the current lookahead token, fetching the next one if the previous lookahead was
    /// consumed
    pub(crate) fn fetch(&mut self) -> Result<&Token<'a>, ParseError> {
        let token = match self.next_token.take() {
            Some(token) => token,
            None => self.gullet.expand_next_token()?,
        };
        Ok(self.next_token.insert(token))
    }

    fn current_loc(&mut self) -> Result<Option<SourceLocation>, ParseError> {
        Ok(self.fetch()?.loc.clone())
    }

    pub(crate) fn switch_mode(&mut self, mode: Mode) {
        self.gullet.switch_mode(mode);
    }

    /// Record a convenience the input relies on, according to [`ParserConfig::strict`]
    pub(crate) fn report_nonstrict(
        &mut self,
        code: &'static str,
        message: String,
        loc: Option<SourceLocation>,
    ) -> Result<(), ParseError> {
        match self.conf.strict {
            StrictMode::Ignore => Ok(()),
            StrictMode::Warn => {
                self.warnings.push(Warning { code, message, loc });
                Ok(())
            }
            StrictMode::Error => Err(ParseError::with_loc(
                ParseErrorKind::Strict { code, message },
                loc,
            )),
        }
    }

    /// Parses an expression, which is a list of atoms, with any infix operator resolved.
    ///
    /// `break_on_infix` stops before an infix operator, so that implicit groups like
    /// `\displaystyle a \over b` leave the operator to the enclosing expression.
    pub(crate) fn parse_expression(
        &mut self,
        break_on_infix: bool,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Vec<ParseNode>, ParseError> {
        let body = self.parse_expression_raw(break_on_infix, break_on_token_text)?;
        normalize::resolve_infix(self.mode(), body)
    }

    /// Like [`Parser::parse_expression`] but leaves infix markers (and row breaks) in place
    pub(crate) fn parse_expression_raw(
        &mut self,
        break_on_infix: bool,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Vec<ParseNode>, ParseError> {
        let mut body = Vec::new();
        loop {
            let lex = self.fetch()?;
            if is_end_of_expression(&lex.content) {
                break;
            }

            if break_on_token_text.map_or(false, |b| b.matches(&lex.content)) {
                break;
            }

            if break_on_infix
                && FUNCTIONS
                    .get(&lex.content)
                    .map_or(false, |func| func.prop.infix)
            {
                break;
            }

            match self.parse_atom(break_on_token_text)? {
                Some(atom) => body.push(atom),
                None => break,
            }
        }

        if self.mode() == Mode::Text {
            body = form_ligatures(body);
        }

        Ok(body)
    }

    /// Parses a group with optional super/subscripts
    fn parse_atom(
        &mut self,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let start_loc = self.current_loc()?;
        // The body of an atom is an implicit group, so that things like `\left(x\right)^2` work
        // correctly.
        let mut base = self.parse_group(None, None, break_on_token_text)?;

        // There are no superscripts or subscripts in text mode
        if self.mode() == Mode::Text {
            return Ok(base);
        }

        let mut superscript = None;
        let mut subscript = None;
        loop {
            self.consume_spaces()?;
            let lex = self.fetch()?.clone();

            match lex.content.as_ref() {
                "\\limits" | "\\nolimits" => {
                    let Some(ParseNode::Op(op)) = &mut base else {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::ExpectedLimitControls,
                            lex.loc,
                        ));
                    };
                    op.limits = lex.content == "\\limits";
                    op.always_handle_sup_sub = true;
                    self.consume();
                }
                "^" => {
                    if superscript.is_some() {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::DoubleSuperscript,
                            lex.loc,
                        ));
                    }

                    superscript = Some(self.handle_sup_subscript("superscript")?);
                }
                "_" => {
                    if subscript.is_some() {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::DoubleSubscript,
                            lex.loc,
                        ));
                    }

                    subscript = Some(self.handle_sup_subscript("subscript")?);
                }
                "'" => {
                    if superscript.is_some() {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::DoubleSuperscript,
                            lex.loc,
                        ));
                    }

                    superscript = Some(self.parse_primes()?);
                }
                _ => break,
            }
        }

        if superscript.is_none() && subscript.is_none() {
            return Ok(base);
        }

        let loc = SourceLocation::combine(start_loc, self.last_consumed_loc.clone());
        Ok(Some(ParseNode::SupSub(SupSubNode {
            base: base.map(Box::new),
            sup: superscript.map(Box::new),
            sub: subscript.map(Box::new),
            info: NodeInfo::new(self.mode(), loc),
        })))
    }

    /// Parses the group after a `^` or `_`
    fn handle_sup_subscript(&mut self, context: &str) -> Result<ParseNode, ParseError> {
        let symbol = self.fetch()?.content.to_string();
        self.consume();
        self.consume_spaces()?;

        match self.parse_group(Some(context), Some(SUPSUB_GREEDINESS), None)? {
            Some(group) => Ok(group),
            None => Err(ParseError::with_loc(
                ParseErrorKind::ExpectedGroup(symbol),
                self.current_loc()?,
            )),
        }
    }

    /// A run of `'` becomes a superscript of `\prime`s, followed by the contents of a `^` that
    /// comes directly after
    fn parse_primes(&mut self) -> Result<ParseNode, ParseError> {
        let mode = self.mode();
        let start_loc = self.current_loc()?;

        let mut primes = Vec::new();
        while self.fetch()?.content == "'" {
            let loc = self.current_loc()?;
            primes.push(ParseNode::TextOrd(TextOrdNode {
                text: "\\prime".to_string(),
                info: NodeInfo::new(mode, loc),
            }));
            self.consume();
        }

        if self.fetch()?.content == "^" {
            primes.push(self.handle_sup_subscript("superscript")?);
        }

        Ok(ParseNode::OrdGroup(OrdGroupNode {
            body: primes,
            info: NodeInfo::new(
                mode,
                SourceLocation::combine(start_loc, self.last_consumed_loc.clone()),
            ),
        }))
    }

    /// Parses an ordinary group, which is either a single nucleus (like "x"), an expression in
    /// braces (like "{x+y}"), or a command with its arguments.
    ///
    /// `context` and `greediness` are set when the group is an argument: `context` names what it
    /// is an argument of, for error messages.
    fn parse_group(
        &mut self,
        context: Option<&str>,
        greediness: Option<u8>,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Option<ParseNode>, ParseError> {
        self.nested(|parser| parser.parse_group_inner(context, greediness, break_on_token_text))
    }

    /// Run `parse` one nesting level deeper, failing with `NestingTooDeep` at the configured limit
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.conf.max_nesting_depth {
            return Err(ParseError::with_loc(
                ParseErrorKind::NestingTooDeep(self.conf.max_nesting_depth),
                self.current_loc()?,
            ));
        }

        self.depth += 1;
        let res = parse(self);
        self.depth -= 1;

        res
    }

    fn parse_group_inner(
        &mut self,
        context: Option<&str>,
        greediness: Option<u8>,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let first_token = self.fetch()?.clone();

        if first_token.content == "{" {
            self.consume();

            let body = self.parse_expression(false, Some(BreakToken::RightCurlyBracket))?;
            let last_loc = self.current_loc()?;
            self.expect("}", true)?;

            return Ok(Some(ParseNode::OrdGroup(OrdGroupNode {
                body,
                info: NodeInfo::new(
                    self.mode(),
                    SourceLocation::combine(first_token.loc, last_loc),
                ),
            })));
        }

        let res = match self.parse_function(break_on_token_text, context, greediness)? {
            Some(res) => Some(res),
            None => self.parse_symbol()?,
        };

        if res.is_none() && first_token.is_command() && !is_implicit_command(&first_token.content)
        {
            if self.conf.throw_on_error {
                return Err(ParseError::with_loc(
                    ParseErrorKind::UndefinedControlSequence(first_token.content.to_string()),
                    first_token.loc,
                ));
            }

            self.consume();
            return Ok(Some(self.unsupported_command(&first_token)));
        }

        Ok(res)
    }

    /// The command's name spelled out in the error color
    fn unsupported_command(&self, token: &Token) -> ParseNode {
        let body = token
            .content
            .chars()
            .map(|ch| {
                ParseNode::TextOrd(TextOrdNode {
                    text: ch.to_string(),
                    info: NodeInfo::new_mode(Mode::Text),
                })
            })
            .collect();

        ParseNode::Color(ColorNode {
            color: self.conf.error_color.clone(),
            body: vec![ParseNode::Text(TextNode {
                body,
                font: None,
                info: NodeInfo::new(Mode::Text, token.loc.clone()),
            })],
            info: NodeInfo::new(self.mode(), token.loc.clone()),
        })
    }

    /// Parses a command with its arguments, if the lookahead is one
    pub(crate) fn parse_function(
        &mut self,
        break_on_token_text: Option<BreakToken>,
        context: Option<&str>,
        greediness: Option<u8>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let token = self.fetch()?.clone();

        // With the old behavior `\color` takes its body as an argument, exactly like `\textcolor`
        let name = if token.content == "\\color" && self.conf.color_is_text_color {
            "\\textcolor"
        } else {
            token.content.as_ref()
        };

        let Some(func) = FUNCTIONS.get(name) else {
            return Ok(None);
        };

        if let (Some(context), Some(outer)) = (context, greediness) {
            if !may_absorb(outer, func.prop.greediness) {
                return Err(ParseError::with_loc(
                    ParseErrorKind::FunctionNoArguments {
                        func: name.to_string(),
                        context: context.to_string(),
                    },
                    token.loc,
                ));
            }
        }

        let mode = self.mode();
        if !func.prop.allowed_in(mode) {
            let kind = match mode {
                Mode::Text => ParseErrorKind::FunctionUnusableTextMode(name.to_string()),
                Mode::Math => ParseErrorKind::FunctionUnusableMathMode(name.to_string()),
            };
            return Err(ParseError::with_loc(kind, token.loc));
        }

        self.consume();

        let (args, opt_args) = self.parse_arguments(name, &func.prop)?;

        let node = match &func.handler {
            Some(handler) => {
                let ctx = FunctionContext {
                    func_name: name,
                    parser: self,
                    loc: token.loc.clone(),
                    break_on_token_text,
                };
                handler(ctx, args, opt_args)
            }
            None => self.parse_implicit_group(name, args, break_on_token_text),
        };
        let mut node = node.map_err(|err| err.or_loc(token.loc.clone()))?;

        if node.loc().is_none() {
            node.info_mut().loc =
                SourceLocation::combine(token.loc, self.last_consumed_loc.clone());
        }

        Ok(Some(node))
    }

    /// Parses the arguments of a function or environment, optional arguments first
    pub(crate) fn parse_arguments(
        &mut self,
        func: &str,
        prop: &FunctionPropSpec,
    ) -> Result<(Vec<Arg>, Vec<Option<Arg>>), ParseError> {
        let total_args = prop.num_args + prop.num_optional_args;
        let mut args = Vec::with_capacity(prop.num_args);
        let mut opt_args = Vec::with_capacity(prop.num_optional_args);

        for i in 0..total_args {
            let optional = i < prop.num_optional_args;
            let arg = self.parse_group_of_type(func, prop.arg_type(i), optional, prop.greediness)?;

            if optional {
                opt_args.push(arg);
            } else if let Some(arg) = arg {
                args.push(arg);
            } else {
                return Err(ParseError::with_loc(
                    ParseErrorKind::ExpectedGroup(func.to_string()),
                    self.current_loc()?,
                ));
            }
        }

        Ok((args, opt_args))
    }

    fn parse_group_of_type(
        &mut self,
        func: &str,
        arg_type: ArgType,
        optional: bool,
        greediness: u8,
    ) -> Result<Option<Arg>, ParseError> {
        match arg_type {
            ArgType::Color => self.parse_string_group(optional),
            ArgType::Size => self.parse_size_group(optional),
            ArgType::Original => self.parse_argument_group(func, optional, greediness, None),
            ArgType::Mode(mode) => {
                self.parse_argument_group(func, optional, greediness, Some(mode))
            }
        }
    }

    /// Parses a group, returning the string formed by the enclosed tokens plus its position.
    /// The tokens are read in text mode, so that spaces are kept.
    fn parse_string_group(&mut self, optional: bool) -> Result<Option<Arg>, ParseError> {
        let outer_mode = self.mode();
        self.switch_mode(Mode::Text);
        let res = self.parse_string_group_inner(optional);
        self.switch_mode(outer_mode);
        res
    }

    fn parse_string_group_inner(&mut self, optional: bool) -> Result<Option<Arg>, ParseError> {
        self.consume_spaces()?;

        let (open, close) = if optional { ("[", "]") } else { ("{", "}") };
        let first_token = self.fetch()?.clone();
        if first_token.content != open {
            if optional || first_token.is_eof() {
                return Ok(None);
            }

            // An unbraced argument is a single token
            self.consume();
            return Ok(Some(Arg::Str {
                text: first_token.content.into_owned(),
                loc: first_token.loc,
            }));
        }
        self.consume();

        let mut text = String::new();
        loop {
            let token = self.fetch()?;
            if token.content == close {
                break;
            }

            if token.is_eof() {
                return Err(ParseError::with_loc(
                    ParseErrorKind::Expected {
                        expected: close.to_string(),
                        found: "EOF".to_string(),
                    },
                    token.loc.clone(),
                ));
            }

            text.push_str(&token.content);
            self.consume();
        }

        let last_loc = self.current_loc()?;
        self.consume();

        Ok(Some(Arg::Str {
            text,
            loc: SourceLocation::combine(first_token.loc, last_loc),
        }))
    }

    /// Parses a regex-delimited group: the largest sequence of tokens whose concatenated strings
    /// match `regex`.
    fn parse_regex_group(&mut self, regex: &Regex) -> Result<Option<Arg>, ParseError> {
        let first_loc = self.current_loc()?;
        let mut last_loc = first_loc.clone();

        let mut text = String::new();
        loop {
            let token = self.fetch()?;
            if token.is_eof() {
                break;
            }

            let candidate = format!("{}{}", text, token.content);
            if !regex.is_match(&candidate) {
                break;
            }

            last_loc = token.loc.clone();
            text = candidate;
            self.consume();
        }

        if text.is_empty() {
            return Ok(None);
        }

        Ok(Some(Arg::Str {
            text,
            loc: SourceLocation::combine(first_loc, last_loc),
        }))
    }

    /// Parses a size, like `1em` or `{-2.5pt}`. The text is checked by the function it is
    /// given to.
    fn parse_size_group(&mut self, optional: bool) -> Result<Option<Arg>, ParseError> {
        self.consume_spaces()?;

        if optional || self.fetch()?.content == "{" {
            self.parse_string_group(optional)
        } else {
            self.parse_regex_group(&SIZE_GROUP_REGEX)
        }
    }

    /// Parses an argument in `mode`, or in the current mode when that is `None`.
    /// An optional argument is a bracketed expression.
    fn parse_argument_group(
        &mut self,
        func: &str,
        optional: bool,
        greediness: u8,
        mode: Option<Mode>,
    ) -> Result<Option<Arg>, ParseError> {
        let outer_mode = self.mode();
        if let Some(mode) = mode {
            self.switch_mode(mode);
        }

        let res = self.parse_argument_group_inner(func, optional, greediness);

        self.switch_mode(outer_mode);
        res
    }

    fn parse_argument_group_inner(
        &mut self,
        func: &str,
        optional: bool,
        greediness: u8,
    ) -> Result<Option<Arg>, ParseError> {
        self.consume_spaces()?;

        if !optional {
            let context = format!("argument to '{func}'");
            let group = self.parse_group(Some(&context), Some(greediness), None)?;
            return Ok(group.map(Arg::Node));
        }

        let first_token = self.fetch()?.clone();
        if first_token.content != "[" {
            return Ok(None);
        }
        self.consume();

        let body = self.parse_expression(false, Some(BreakToken::RightSquareBracket))?;
        let last_loc = self.current_loc()?;
        self.expect("]", true)?;

        Ok(Some(Arg::Node(ParseNode::OrdGroup(OrdGroupNode {
            body,
            info: NodeInfo::new(
                self.mode(),
                SourceLocation::combine(first_token.loc, last_loc),
            ),
        }))))
    }

    /// Commands without a handler switch something for the rest of the enclosing group, which
    /// becomes their body
    fn parse_implicit_group(
        &mut self,
        func: &str,
        args: Vec<Arg>,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<ParseNode, ParseError> {
        let mode = self.mode();

        if let Some(size) = size_index(func) {
            let body = self.parse_expression(false, break_on_token_text)?;
            return Ok(build_sizing(mode, size, body));
        }

        if let Some(style) = Style::from_command(func) {
            let body = self.parse_expression(true, break_on_token_text)?;
            return Ok(build_styling(mode, style, body));
        }

        if func == "\\color" {
            let Some(color_arg) = args.into_iter().next() else {
                return Err(ParseError::new(ParseErrorKind::UnexpectedArgument(
                    func.to_string(),
                    mode,
                )));
            };
            let (color, loc) = color_arg.into_str(func, mode)?;
            let color = check_color(color, loc, self.conf.color_validation)?;
            let body = self.parse_expression(true, break_on_token_text)?;
            return Ok(build_color(mode, color, body));
        }

        if OLD_FONT_FUNCS.iter().any(|(name, _)| *name == func) {
            let start_loc = self.current_loc()?;
            let body = self.parse_expression(true, break_on_token_text)?;
            let loc = if body.is_empty() {
                None
            } else {
                SourceLocation::combine(start_loc, self.last_consumed_loc.clone())
            };
            let group = ParseNode::OrdGroup(OrdGroupNode {
                body,
                info: NodeInfo::new(mode, loc),
            });
            return Ok(build_font(mode, func, group));
        }

        Err(ParseError::new(ParseErrorKind::NoFunctionHandler(
            func.to_string(),
        )))
    }

    /// Parses a single symbol, including a letter with combining accents
    fn parse_symbol(&mut self) -> Result<Option<ParseNode>, ParseError> {
        let nucleus = self.fetch()?.clone();
        let mode = self.mode();
        let loc = nucleus.loc.clone();

        let node = match split_accents(&nucleus.content) {
            Some((base, marks)) if !SYMBOLS.contains_key(mode, &nucleus.content) => {
                // Accents go over the dotless letters
                let base = match base.as_str() {
                    "i" => "\u{131}".to_string(),
                    "j" => "\u{237}".to_string(),
                    _ => base,
                };

                let Some(mut node) = self.symbol_node(&base, loc.clone())? else {
                    return Ok(None);
                };

                for mark in marks {
                    let Some(command) = get_accent(mark).and_then(|accent| accent.command(mode))
                    else {
                        return Err(ParseError::with_loc(
                            ParseErrorKind::UnknownAccent { mark, mode },
                            loc,
                        ));
                    };

                    node = build_accent(mode, command, node);
                    node.info_mut().loc = loc.clone();
                }

                Some(node)
            }
            _ => self.symbol_node(&nucleus.content, loc)?,
        };

        if node.is_some() {
            self.consume();
        }

        Ok(node)
    }

    fn symbol_node(
        &mut self,
        text: &str,
        loc: Option<SourceLocation>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let mode = self.mode();
        if let Some(symbol) = SYMBOLS.get(mode, text) {
            let info = NodeInfo::new(mode, loc);
            return Ok(Some(symbol.group.make_parse_node(info, text.to_string())));
        }

        // Unknown non-ascii characters are kept as text
        let Some(first) = first_ch_str(text) else {
            return Ok(None);
        };
        if first.is_ascii() {
            return Ok(None);
        }

        if mode == Mode::Math {
            self.report_nonstrict(
                "unicodeTextInMathMode",
                format!("Unicode text character \"{first}\" used in math mode"),
                loc.clone(),
            )?;
        }

        Ok(Some(ParseNode::TextOrd(TextOrdNode {
            text: text.to_string(),
            info: NodeInfo::new(Mode::Text, loc),
        })))
    }
}

fn is_end_of_expression(text: &str) -> bool {
    matches!(text, "}" | "\\end" | "\\right" | "&" | "EOF")
}

/// Merge text-mode character runs like `--`, `---`, ``` `` ``` and `''` into one textord
fn form_ligatures(body: Vec<ParseNode>) -> Vec<ParseNode> {
    let mut out: Vec<ParseNode> = Vec::with_capacity(body.len());
    for node in body {
        if let (Some(ParseNode::TextOrd(prev)), ParseNode::TextOrd(next)) = (out.last_mut(), &node)
        {
            let merged = match (prev.text.as_str(), next.text.as_str()) {
                ("-", "-") => Some("--"),
                ("--", "-") => Some("---"),
                ("'", "'") => Some("''"),
                ("`", "`") => Some("``"),
                _ => None,
            };

            if let Some(merged) = merged {
                prev.text = merged.to_string();
                prev.info.loc =
                    SourceLocation::combine(prev.info.loc.clone(), next.info.loc.clone());
                continue;
            }
        }

        out.push(node);
    }

    out
}
