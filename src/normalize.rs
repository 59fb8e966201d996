//! Rewrites applied to a flat run of sibling nodes once it is complete: resolving the infix
//! commands (`\over`, `\choose`, `\atop`) and cutting the body of an environment into rows
//! and cells.

use crate::{
    error::{ParseError, ParseErrorKind},
    expander::Mode,
    functions::genfrac::build_genfrac,
    parse_node::{NodeInfo, OrdGroupNode, ParseNode},
    unit::Measurement,
    util::SourceLocation,
};

/// An entry of an environment body, as read by the parser
#[derive(Debug, Clone, PartialEq)]
pub enum RowItem {
    Node(ParseNode),
    /// An `&` between two cells
    ColumnBreak,
}

/// An environment body split into rows of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub body: Vec<Vec<Vec<ParseNode>>>,
    /// The size given to each row break, `None` when it had none
    pub row_gaps: Vec<Option<Measurement>>,
}

/// Replace an infix operator and its surroundings with the fraction it stands for.
///
/// Everything before the operator becomes the numerator, everything after it the denominator.
/// A side that is exactly one ordgroup is used as is.
pub fn resolve_infix(mode: Mode, mut body: Vec<ParseNode>) -> Result<Vec<ParseNode>, ParseError> {
    let mut infix_index = None;
    for (i, node) in body.iter().enumerate() {
        if let ParseNode::Infix(_) = node {
            if infix_index.is_some() {
                return Err(ParseError::with_loc(
                    ParseErrorKind::OnlyOneInfixOperatorPerGroup,
                    node.loc(),
                ));
            }

            infix_index = Some(i);
        }
    }

    let Some(infix_index) = infix_index else {
        return Ok(body);
    };

    let denom_body = body.split_off(infix_index + 1);
    let Some(ParseNode::Infix(infix)) = body.pop() else {
        return Ok(body);
    };
    let numer_body = body;

    let numer = into_operand(mode, numer_body);
    let denom = into_operand(mode, denom_body);

    let loc = SourceLocation::combine(numer.loc(), denom.loc());
    let mut frac = build_genfrac(mode, infix.replace_with, numer, denom);
    frac.info_mut().loc = loc;

    Ok(vec![frac])
}

fn into_operand(mode: Mode, mut nodes: Vec<ParseNode>) -> ParseNode {
    if nodes.len() == 1 && matches!(nodes[0], ParseNode::OrdGroup(_)) {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }

    let loc = SourceLocation::combine(
        nodes.first().and_then(ParseNode::loc),
        nodes.last().and_then(ParseNode::loc),
    );
    ParseNode::OrdGroup(OrdGroupNode {
        body: nodes,
        info: NodeInfo::new(mode, loc),
    })
}

/// Split an environment body into rows at each row break (`\\`, `\cr`) and into cells at each
/// column break. Infix operators are resolved inside each cell.
///
/// A final row holding a single empty cell, as left by a trailing `\\`, is dropped; its row gap
/// is kept.
pub fn normalize_rows(mode: Mode, items: Vec<RowItem>) -> Result<Rows, ParseError> {
    let mut rows = Rows::default();
    let mut row: Vec<Vec<ParseNode>> = Vec::new();
    let mut cell: Vec<ParseNode> = Vec::new();

    for item in items {
        match item {
            RowItem::ColumnBreak => {
                row.push(resolve_infix(mode, std::mem::take(&mut cell))?);
            }
            RowItem::Node(ParseNode::Cr(cr)) => {
                row.push(resolve_infix(mode, std::mem::take(&mut cell))?);
                rows.body.push(std::mem::take(&mut row));
                rows.row_gaps.push(cr.size);
            }
            RowItem::Node(node) => cell.push(node),
        }
    }

    row.push(resolve_infix(mode, cell)?);
    let trailing_empty = row.len() == 1 && row[0].is_empty();
    if !trailing_empty || rows.body.is_empty() {
        rows.body.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::{normalize_rows, resolve_infix, RowItem};
    use crate::{
        error::ParseErrorKind,
        expander::Mode,
        functions::genfrac::{build_genfrac, build_infix, FracKind},
        parse_node::{CrNode, EqNoLoc, MathOrdNode, NodeInfo, OrdGroupNode, ParseNode},
        unit::Measurement,
    };

    fn ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(MathOrdNode {
            text: text.to_string(),
            info: NodeInfo::new_mode(Mode::Math),
        })
    }

    fn group(body: Vec<ParseNode>) -> ParseNode {
        ParseNode::OrdGroup(OrdGroupNode {
            body,
            info: NodeInfo::new_mode(Mode::Math),
        })
    }

    fn infix(name: &str) -> ParseNode {
        build_infix(Mode::Math, name).unwrap()
    }

    fn cr(size: Option<Measurement>) -> RowItem {
        RowItem::Node(ParseNode::Cr(CrNode {
            size,
            info: NodeInfo::new_mode(Mode::Math),
        }))
    }

    #[test]
    fn choose_becomes_binom() {
        let out = resolve_infix(Mode::Math, vec![ord("a"), infix("\\choose"), ord("b")]).unwrap();
        let expected = build_genfrac(Mode::Math, FracKind::Binom, ord("a"), ord("b"));
        assert_eq!(out.len(), 1);
        assert!(out[0].eq_no_loc(&expected));
    }

    #[test]
    fn operands_are_grouped() {
        let out = resolve_infix(
            Mode::Math,
            vec![ord("a"), ord("b"), infix("\\over"), group(vec![ord("c")])],
        )
        .unwrap();
        let ParseNode::GenFrac(frac) = &out[0] else {
            panic!("expected genfrac");
        };
        assert!((*frac.numer).eq_no_loc(&group(vec![ord("a"), ord("b")])));
        assert!((*frac.denom).eq_no_loc(&group(vec![ord("c")])));
    }

    #[test]
    fn empty_side_is_empty_group() {
        let out = resolve_infix(Mode::Math, vec![infix("\\atop"), ord("b")]).unwrap();
        let ParseNode::GenFrac(frac) = &out[0] else {
            panic!("expected genfrac");
        };
        assert!((*frac.numer).eq_no_loc(&group(Vec::new())));
        assert!(!frac.has_bar_line);
    }

    #[test]
    fn two_infix_operators() {
        let err = resolve_infix(
            Mode::Math,
            vec![ord("a"), infix("\\over"), ord("b"), infix("\\choose"), ord("c")],
        )
        .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::OnlyOneInfixOperatorPerGroup);
    }

    #[test]
    fn no_infix_is_unchanged() {
        let body = vec![ord("a"), ord("b")];
        assert_eq!(resolve_infix(Mode::Math, body.clone()).unwrap(), body);
    }

    #[test]
    fn rows_and_cells() {
        let items = vec![
            RowItem::Node(ord("a")),
            RowItem::ColumnBreak,
            RowItem::Node(ord("b")),
            cr(Some(Measurement::new(1.0, "em"))),
            RowItem::Node(ord("c")),
            RowItem::ColumnBreak,
            RowItem::Node(ord("d")),
        ];
        let rows = normalize_rows(Mode::Math, items).unwrap();
        assert_eq!(
            rows.body,
            vec![
                vec![vec![ord("a")], vec![ord("b")]],
                vec![vec![ord("c")], vec![ord("d")]],
            ]
        );
        assert_eq!(rows.row_gaps, vec![Some(Measurement::new(1.0, "em"))]);
    }

    #[test]
    fn trailing_row_break() {
        let items = vec![RowItem::Node(ord("a")), cr(None)];
        let rows = normalize_rows(Mode::Math, items).unwrap();
        assert_eq!(rows.body, vec![vec![vec![ord("a")]]]);
        assert_eq!(rows.row_gaps, vec![None]);
    }

    #[test]
    fn empty_body_keeps_one_row() {
        let rows = normalize_rows(Mode::Math, Vec::new()).unwrap();
        assert_eq!(rows.body, vec![vec![Vec::<ParseNode>::new()]]);
        assert!(rows.row_gaps.is_empty());
    }

    #[test]
    fn infix_inside_cell() {
        let items = vec![
            RowItem::Node(ord("a")),
            RowItem::Node(infix("\\over")),
            RowItem::Node(ord("b")),
            RowItem::ColumnBreak,
            RowItem::Node(ord("c")),
        ];
        let rows = normalize_rows(Mode::Math, items).unwrap();
        assert_eq!(rows.body[0].len(), 2);
        assert!(matches!(rows.body[0][0][0], ParseNode::GenFrac(_)));
    }
}
