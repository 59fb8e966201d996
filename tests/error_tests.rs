use mathast::{parse_tree, ErrorCategory, Mode, ParseError, ParseErrorKind, ParserConfig};

fn parse_error(expr: &str) -> ParseError {
    parse_error_with(expr, ParserConfig::default())
}

fn parse_error_with(expr: &str, conf: ParserConfig) -> ParseError {
    match parse_tree(expr, conf) {
        Ok(tree) => panic!("expected {expr:?} to fail, parsed to {tree:#?}"),
        Err(err) => err,
    }
}

/// Check the kind of error `expr` fails with
fn assert_parse_error(expr: &str, expected: ParseErrorKind) {
    let err = parse_error(expr);
    assert_eq!(err.kind, expected, "wrong error for {expr:?}: {err}");
}

fn assert_error_at(expr: &str, expected: ParseErrorKind, loc: std::ops::Range<usize>) {
    let err = parse_error(expr);
    assert_eq!(err.kind, expected, "wrong error for {expr:?}: {err}");
    assert_eq!(err.loc.map(|loc| loc.0), Some(loc), "wrong location for {expr:?}");
}

#[test]
fn rejects_repeated_infix_operators() {
    assert_parse_error(r"1\over 2\over 3", ParseErrorKind::OnlyOneInfixOperatorPerGroup);
    assert_parse_error(r"1\over 2\choose 3", ParseErrorKind::OnlyOneInfixOperatorPerGroup);
}

#[test]
fn infix_operators_in_separate_groups_are_fine() {
    assert!(parse_tree(r"{1\over 2}\over 3", ParserConfig::default()).is_ok());
}

#[test]
fn rejects_missing_script_groups() {
    assert_error_at(r"{1^}", ParseErrorKind::ExpectedGroup("^".to_string()), 3..4);
    assert_error_at(r"1_", ParseErrorKind::ExpectedGroup("_".to_string()), 2..2);
}

#[test]
fn rejects_loose_functions_as_scripts() {
    assert_parse_error(
        r"1^\sqrt{2}",
        ParseErrorKind::FunctionNoArguments {
            func: "\\sqrt".to_string(),
            context: "superscript".to_string(),
        },
    );
}

#[test]
fn rejects_loose_functions_as_arguments() {
    assert_parse_error(
        r"\frac\frac12{3}",
        ParseErrorKind::FunctionNoArguments {
            func: "\\frac".to_string(),
            context: "argument to '\\frac'".to_string(),
        },
    );
}

#[test]
fn rejects_limits_without_operator() {
    assert_parse_error(r"\alpha\limits\omega", ParseErrorKind::ExpectedLimitControls);
    assert_parse_error(r"\limits\omega", ParseErrorKind::ExpectedLimitControls);
}

#[test]
fn rejects_double_scripts() {
    assert_error_at("x^1^2", ParseErrorKind::DoubleSuperscript, 3..4);
    assert_error_at("x_1_2", ParseErrorKind::DoubleSubscript, 3..4);
    assert_parse_error("x^1'", ParseErrorKind::DoubleSuperscript);
    assert_parse_error("x'^1^2", ParseErrorKind::DoubleSuperscript);
}

#[test]
fn rejects_undefined_commands() {
    assert_error_at(
        r"\foo",
        ParseErrorKind::UndefinedControlSequence("\\foo".to_string()),
        0..4,
    );
    let err = parse_error(r"a\foo b");
    assert_eq!(err.category(), ErrorCategory::Grammar);
    assert_eq!(err.to_string(), "Undefined control sequence: \\foo at position 1..5");
}

#[test]
fn rejects_lone_backslash() {
    let err = parse_error("x\\");
    assert_eq!(err.kind, ParseErrorKind::LoneBackslash);
    assert_eq!(err.category(), ErrorCategory::Lexical);
    assert_eq!(err.loc.map(|loc| loc.0), Some(1..2));
}

#[test]
fn reports_missing_argument_at_end_of_input() {
    let err = parse_error(r"\sqrt");
    assert_eq!(err.kind, ParseErrorKind::ExpectedGroup("\\sqrt".to_string()));
    assert_eq!(err.category(), ErrorCategory::Grammar);
    assert_eq!(err.loc.clone().map(|loc| loc.0), Some(5..5));
    assert_eq!(err.to_string(), "Expected group after '\\sqrt' at position 5");
}

#[test]
fn rejects_unbalanced_braces() {
    assert_error_at(
        r"\frac12}",
        ParseErrorKind::Expected {
            expected: "EOF".to_string(),
            found: "}".to_string(),
        },
        7..8,
    );
    assert_parse_error(
        "{x",
        ParseErrorKind::Expected {
            expected: "}".to_string(),
            found: "EOF".to_string(),
        },
    );
}

#[test]
fn rejects_bad_left_right() {
    assert_parse_error(
        r"\left( x",
        ParseErrorKind::Expected {
            expected: "\\right".to_string(),
            found: "EOF".to_string(),
        },
    );
    let err = parse_error(r"\left x\right)");
    assert_eq!(
        err.kind,
        ParseErrorKind::InvalidDelimiter {
            delim: "x".to_string(),
            func: "\\left".to_string(),
        }
    );
    assert_eq!(err.category(), ErrorCategory::Semantic);
    assert_parse_error(r"\middle| x", ParseErrorKind::MiddleWithoutLeft);
}

#[test]
fn rejects_bad_environments() {
    assert_parse_error(
        r"\begin{matrix}a\end{pmatrix}",
        ParseErrorKind::MismatchedEnvironment {
            begin: "matrix".to_string(),
            end: "pmatrix".to_string(),
        },
    );
    assert_parse_error(
        r"\begin{foo}a\end{foo}",
        ParseErrorKind::UnknownEnvironment("foo".to_string()),
    );
    assert_parse_error(
        r"\begin{array}{x}a\end{array}",
        ParseErrorKind::InvalidColumnAlignment("x".to_string()),
    );
    assert_parse_error(
        r"\begin{matrix}a",
        ParseErrorKind::Expected {
            expected: "\\end".to_string(),
            found: "EOF".to_string(),
        },
    );
}

#[test]
fn rejects_bad_sizes() {
    let err = parse_error(r"\kern{3}");
    assert_eq!(err.kind, ParseErrorKind::InvalidSize("3".to_string()));
    assert_eq!(err.category(), ErrorCategory::Semantic);
    assert_eq!(err.loc.map(|loc| loc.0), Some(5..8));

    assert_parse_error(r"\rule{1em}{x}", ParseErrorKind::InvalidSize("x".to_string()));
}

#[test]
fn rejects_bad_colors() {
    assert_parse_error(
        r"\textcolor{#zzz}{x}",
        ParseErrorKind::InvalidColor("#zzz".to_string()),
    );
    assert_parse_error(
        r"\color{not a color} x",
        ParseErrorKind::InvalidColor("not a color".to_string()),
    );

    let conf = ParserConfig {
        color_validation: false,
        ..ParserConfig::default()
    };
    assert!(parse_tree(r"\textcolor{#zzz}{x}", conf).is_ok());
}

#[test]
fn rejects_functions_in_the_wrong_mode() {
    assert_parse_error(
        r"\text{\hat{x}}",
        ParseErrorKind::FunctionUnusableTextMode("\\hat".to_string()),
    );
    assert_parse_error(
        r"\'a",
        ParseErrorKind::FunctionUnusableMathMode("\\'".to_string()),
    );
    assert_parse_error(
        r"\text{\tiny x}",
        ParseErrorKind::FunctionUnusableTextMode("\\tiny".to_string()),
    );
}

#[test]
fn rejects_unknown_combining_marks() {
    let err = parse_error("\u{e7}");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownAccent {
            mark: '\u{327}',
            mode: Mode::Math,
        }
    );
    assert_eq!(err.category(), ErrorCategory::Semantic);

    // The double acute only exists as a text accent
    assert_parse_error(
        "\u{151}",
        ParseErrorKind::UnknownAccent {
            mark: '\u{30b}',
            mode: Mode::Math,
        },
    );
}

#[test]
fn rejects_deep_nesting() {
    let conf = ParserConfig {
        max_nesting_depth: 20,
        ..ParserConfig::default()
    };
    let deep = format!("{}x{}", "{".repeat(50), "}".repeat(50));
    let err = parse_error_with(&deep, conf.clone());
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(20));
    assert_eq!(err.category(), ErrorCategory::Grammar);

    let shallow = format!("{}x{}", "{".repeat(10), "}".repeat(10));
    assert!(parse_tree(&shallow, conf).is_ok());
}

#[test]
fn nesting_counts_arguments() {
    let conf = ParserConfig {
        max_nesting_depth: 20,
        ..ParserConfig::default()
    };
    let deep = format!("{}x{}", "\\sqrt{".repeat(30), "}".repeat(30));
    let err = parse_error_with(&deep, conf);
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(20));
}

#[test]
fn nesting_counts_environments_and_left_right() {
    let conf = ParserConfig {
        max_nesting_depth: 20,
        ..ParserConfig::default()
    };
    let matrices = |n: usize| {
        format!(
            "{}x{}",
            "\\begin{matrix}".repeat(n),
            "\\end{matrix}".repeat(n)
        )
    };
    assert!(parse_tree(&matrices(5), conf.clone()).is_ok());
    let err = parse_error_with(&matrices(12), conf.clone());
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(20));

    let delimited = |n: usize| format!("{}x{}", "\\left(".repeat(n), "\\right)".repeat(n));
    assert!(parse_tree(&delimited(5), conf.clone()).is_ok());
    let err = parse_error_with(&delimited(12), conf);
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(20));
}

/// The default ceiling has to fail cleanly before a spawned thread runs out of stack
#[test]
fn default_nesting_limit_fits_a_thread_stack() {
    let limit = ParserConfig::default().max_nesting_depth;
    let braces = |n: usize| format!("{}x{}", "{".repeat(n), "}".repeat(n));
    let shallow = braces(limit - 1);
    let deep = braces(limit + 1);

    let (shallow, deep) = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            (
                parse_tree(&shallow, ParserConfig::default()).map(|tree| tree.len()),
                parse_tree(&deep, ParserConfig::default()).map_err(|err| err.kind),
            )
        })
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(shallow, Ok(1));
    assert_eq!(deep, Err(ParseErrorKind::NestingTooDeep(limit)));
}
