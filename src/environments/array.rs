use std::{borrow::Cow, sync::Arc};

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::{
    environments::{parse_rows, EnvironmentContext, EnvironmentSpec, Environments},
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    functions::{delimsizing::build_left_right, ord_argument, take_args, Arg, FunctionPropSpec},
    parse_node::{
        AlignSpec, ArrayNode, ColumnAlign, NodeInfo, OrdGroupNode, ParseNode, StylingNode,
    },
    unit::Measurement,
    util::Style,
};

/// The tabular environments, by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum EnvKind {
    #[strum(serialize = "array")]
    Array,
    #[strum(serialize = "darray")]
    DArray,
    #[strum(serialize = "matrix")]
    Matrix,
    #[strum(serialize = "pmatrix")]
    PMatrix,
    #[strum(serialize = "bmatrix")]
    BMatrix,
    #[strum(serialize = "Bmatrix")]
    BraceMatrix,
    #[strum(serialize = "vmatrix")]
    VMatrix,
    #[strum(serialize = "Vmatrix")]
    DoubleVMatrix,
    #[strum(serialize = "cases")]
    Cases,
    #[strum(serialize = "dcases")]
    DCases,
    #[strum(serialize = "aligned")]
    Aligned,
    #[strum(serialize = "gathered")]
    Gathered,
}
impl EnvKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// `array` and `darray` take their column spec as an argument
    pub fn takes_column_spec(self) -> bool {
        matches!(self, EnvKind::Array | EnvKind::DArray)
    }

    /// The `\left`/`\right` pair the array is wrapped in, if any.
    /// A `.` is the empty delimiter.
    pub fn delimiters(self) -> Option<(&'static str, &'static str)> {
        Some(match self {
            EnvKind::PMatrix => ("(", ")"),
            EnvKind::BMatrix => ("[", "]"),
            EnvKind::BraceMatrix => ("\\{", "\\}"),
            EnvKind::VMatrix => ("|", "|"),
            EnvKind::DoubleVMatrix => ("\\Vert", "\\Vert"),
            EnvKind::Cases | EnvKind::DCases => ("\\{", "."),
            _ => return None,
        })
    }

    /// The style every cell is set in
    pub fn cell_style(self) -> Style {
        match self {
            EnvKind::DArray | EnvKind::DCases | EnvKind::Aligned | EnvKind::Gathered => {
                Style::Display
            }
            _ => Style::Text,
        }
    }
}

pub fn add_environments(envs: &mut Environments) {
    let mut push = |kinds: &[EnvKind], prop: FunctionPropSpec| {
        let spec = Arc::new(EnvironmentSpec {
            prop,
            handler: Box::new(array_handler),
        });
        for kind in kinds {
            let previous = envs.insert(kind.as_str(), spec.clone());
            assert!(previous.is_none(), "environment {} registered twice", kind.as_str());
        }
    };

    push(&[EnvKind::Array, EnvKind::DArray], FunctionPropSpec::new_num_args(1));
    push(
        &[
            EnvKind::Matrix,
            EnvKind::PMatrix,
            EnvKind::BMatrix,
            EnvKind::BraceMatrix,
            EnvKind::VMatrix,
            EnvKind::DoubleVMatrix,
        ],
        FunctionPropSpec::new_num_args(0),
    );
    push(&[EnvKind::Cases, EnvKind::DCases], FunctionPropSpec::new_num_args(0));
    push(&[EnvKind::Aligned, EnvKind::Gathered], FunctionPropSpec::new_num_args(0));
}

fn array_handler(
    ctx: EnvironmentContext,
    args: Vec<Arg>,
    _opt_args: Vec<Option<Arg>>,
) -> Result<ParseNode, ParseError> {
    let kind = ctx
        .env_name
        .parse::<EnvKind>()
        .map_err(|_| ParseErrorKind::UnrecognizedCommand {
            family: "environment",
            name: ctx.env_name.to_string(),
        })?;

    let cols = if kind.takes_column_spec() {
        let [spec] = take_args(ctx.env_name, ctx.mode, args)?;
        Some(parse_column_spec(&spec.into_node(ctx.env_name, ctx.mode)?)?)
    } else {
        None
    };

    let rows = parse_rows(ctx.parser)?;
    Ok(build_environment(ctx.mode, kind, rows.body, cols, rows.row_gaps))
}

/// Read a column spec like `{l|c:r}`
pub fn parse_column_spec(arg: &ParseNode) -> Result<Vec<AlignSpec>, ParseError> {
    let mut cols = Vec::new();
    for node in ord_argument(arg.clone()) {
        let Some(text) = node.text() else {
            return Err(ParseError::with_loc(
                ParseErrorKind::InvalidColumnAlignment(node.typ().as_str().to_string()),
                node.loc(),
            ));
        };

        for ch in text.chars() {
            let col = match ch {
                'l' => AlignSpec::align(ColumnAlign::Left),
                'c' => AlignSpec::align(ColumnAlign::Center),
                'r' => AlignSpec::align(ColumnAlign::Right),
                '|' => AlignSpec::Separator(Cow::Borrowed("|")),
                ':' => AlignSpec::Separator(Cow::Borrowed(":")),
                _ => {
                    return Err(ParseError::with_loc(
                        ParseErrorKind::InvalidColumnAlignment(ch.to_string()),
                        node.loc(),
                    ))
                }
            };
            cols.push(col);
        }
    }

    Ok(cols)
}

fn wrap_cell(mode: Mode, style: Style, body: Vec<ParseNode>) -> ParseNode {
    let ord = ParseNode::OrdGroup(OrdGroupNode {
        body,
        info: NodeInfo::new_mode(mode),
    });
    ParseNode::Styling(StylingNode {
        style,
        body: vec![ord],
        info: NodeInfo::new_mode(mode),
    })
}

/// Build the array for an environment from its cells.
///
/// `cols` is only used by `array` and `darray`; the other environments have fixed columns or
/// none at all. An empty `row_gaps` becomes a single unset gap.
pub fn build_environment(
    mode: Mode,
    kind: EnvKind,
    body: Vec<Vec<Vec<ParseNode>>>,
    cols: Option<Vec<AlignSpec>>,
    mut row_gaps: Vec<Option<Measurement>>,
) -> ParseNode {
    if row_gaps.is_empty() {
        row_gaps.push(None);
    }

    let style = kind.cell_style();
    let body = body
        .into_iter()
        .map(|row| row.into_iter().map(|cell| wrap_cell(mode, style, cell)).collect())
        .collect();

    let mut array = ArrayNode {
        hskip_before_and_after: None,
        add_jot: None,
        array_stretch: None,
        cols: None,
        body,
        row_gaps,
        info: NodeInfo::new_mode(mode),
    };

    match kind {
        EnvKind::Array | EnvKind::DArray => {
            array.hskip_before_and_after = Some(true);
            array.cols = Some(cols.unwrap_or_default());
        }
        EnvKind::Matrix
        | EnvKind::PMatrix
        | EnvKind::BMatrix
        | EnvKind::BraceMatrix
        | EnvKind::VMatrix
        | EnvKind::DoubleVMatrix => {
            array.hskip_before_and_after = Some(false);
        }
        EnvKind::Cases | EnvKind::DCases => {
            array.array_stretch = Some(1.2);
            array.cols = Some(vec![
                AlignSpec::Align {
                    align: ColumnAlign::Left,
                    pregap: Some(0.0),
                    postgap: Some(1.0),
                },
                AlignSpec::Align {
                    align: ColumnAlign::Left,
                    pregap: Some(0.0),
                    postgap: Some(0.0),
                },
            ]);
        }
        EnvKind::Aligned => {
            array.add_jot = Some(true);
        }
        EnvKind::Gathered => {
            array.add_jot = Some(true);
            array.cols = Some(vec![AlignSpec::align(ColumnAlign::Center)]);
        }
    }

    let array = ParseNode::Array(array);
    match kind.delimiters() {
        Some((left, right)) => build_left_right(mode, left, right, vec![array]),
        None => array,
    }
}

/// Like [`build_environment`] but for an environment name
pub fn build_environment_by_name(
    mode: Mode,
    name: &str,
    body: Vec<Vec<Vec<ParseNode>>>,
    cols: Option<Vec<AlignSpec>>,
    row_gaps: Vec<Option<Measurement>>,
) -> Result<ParseNode, ParseError> {
    let kind = name
        .parse::<EnvKind>()
        .map_err(|_| ParseErrorKind::UnknownEnvironment(name.to_string()))?;
    Ok(build_environment(mode, kind, body, cols, row_gaps))
}
