//! Structural analysis: classify the rows of a styled cell grid into
//! headings, tables, paragraphs and section dividers.
//!
//! Spreadsheets carry structure informally: a merged, bold, large cell is a
//! title; a filled bold row opens a section; a run of multi-column rows is a
//! table; an empty row separates sections. The analyzer walks the grid with
//! an explicit row cursor and evaluates [`ROW_RULES`] in priority order
//! against the row under the cursor. The first rule that matches decides the
//! element and how many rows it consumes, so rows swallowed by a table are
//! never re-classified.

use crate::element::StructuralElement;
use crate::source::{Cell, Grid};
use tracing::{debug, trace};

/// A bold first cell at or above this size marks a heading row.
const HEADING_MIN_FONT_SIZE: f32 = 12.0;

/// A merged bold first cell at or above this size is a top-level heading.
const TITLE_MIN_FONT_SIZE: f32 = 14.0;

/// Heading level used when no rung of [`HEADING_LEVELS`] matches.
const DEFAULT_HEADING_LEVEL: u8 = 3;

/// Result of applying one row rule at the cursor.
struct Classified {
    element: Option<StructuralElement>,
    consumed: usize,
}

type RowRule = fn(&[Vec<Cell>], usize) -> Option<Classified>;

/// Row rules in priority order; first match wins. The paragraph rule always
/// matches, so every row is classified exactly once.
const ROW_RULES: &[(&str, RowRule)] = &[
    ("empty", empty_rule),
    ("heading", heading_rule),
    ("table", table_rule),
    ("paragraph", paragraph_rule),
];

type HeadingSignal = fn(&Cell, &[Cell]) -> bool;

/// Any of these, evaluated on the first non-empty cell, makes a heading row.
const HEADING_SIGNALS: &[HeadingSignal] = &[is_large_bold, is_merged_bold, is_filled_bold];

/// Level ladder, highest priority first.
const HEADING_LEVELS: &[(fn(&Cell) -> bool, u8)] = &[(is_title_cell, 1), (is_merged_bold_cell, 2)];

/// Classify every row of `grid` into an ordered element stream.
pub fn analyze_grid(grid: &Grid) -> Vec<StructuralElement> {
    let rows = grid.rows.as_slice();
    let mut elements = Vec::new();
    let mut cursor = 0;

    while cursor < rows.len() {
        let (rule, classified) = ROW_RULES
            .iter()
            .find_map(|(name, rule)| rule(rows, cursor).map(|c| (*name, c)))
            .unwrap_or((
                "skip",
                Classified {
                    element: None,
                    consumed: 1,
                },
            ));
        trace!(
            "sheet '{}': row {} → {} ({} rows)",
            grid.name,
            cursor + 1,
            rule,
            classified.consumed
        );
        elements.extend(classified.element);
        cursor += classified.consumed.max(1);
    }

    debug!(
        "sheet '{}': {} rows → {} elements",
        grid.name,
        rows.len(),
        elements.len()
    );
    elements
}

// ── Row predicates ───────────────────────────────────────────────────────

fn is_row_empty(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

fn first_non_empty(row: &[Cell]) -> Option<&Cell> {
    row.iter().find(|c| !c.is_empty())
}

fn non_empty_count(row: &[Cell]) -> usize {
    row.iter().filter(|c| !c.is_empty()).count()
}

fn joined_values(row: &[Cell]) -> String {
    row.iter()
        .filter(|c| !c.is_empty())
        .map(|c| c.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_heading_row(row: &[Cell]) -> bool {
    first_non_empty(row).is_some_and(|first| HEADING_SIGNALS.iter().any(|signal| signal(first, row)))
}

fn is_large_bold(first: &Cell, _row: &[Cell]) -> bool {
    first.bold && first.size_or_zero() >= HEADING_MIN_FONT_SIZE
}

fn is_merged_bold(first: &Cell, _row: &[Cell]) -> bool {
    is_merged_bold_cell(first)
}

fn is_filled_bold(first: &Cell, row: &[Cell]) -> bool {
    first.bold && row.iter().any(|c| c.background.is_some())
}

fn is_merged_bold_cell(cell: &Cell) -> bool {
    cell.merged && cell.bold
}

fn is_title_cell(cell: &Cell) -> bool {
    is_merged_bold_cell(cell) && cell.size_or_zero() >= TITLE_MIN_FONT_SIZE
}

fn heading_level(first: &Cell) -> u8 {
    HEADING_LEVELS
        .iter()
        .find(|(applies, _)| applies(first))
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_HEADING_LEVEL)
}

// ── Rules ────────────────────────────────────────────────────────────────

fn empty_rule(rows: &[Vec<Cell>], cursor: usize) -> Option<Classified> {
    is_row_empty(&rows[cursor]).then_some(Classified {
        element: Some(StructuralElement::Divider),
        consumed: 1,
    })
}

fn heading_rule(rows: &[Vec<Cell>], cursor: usize) -> Option<Classified> {
    let row = &rows[cursor];
    if !is_heading_row(row) {
        return None;
    }
    let first = first_non_empty(row)?;
    Some(Classified {
        element: Some(StructuralElement::Heading {
            text: joined_values(row),
            level: heading_level(first),
        }),
        consumed: 1,
    })
}

fn table_rule(rows: &[Vec<Cell>], cursor: usize) -> Option<Classified> {
    if non_empty_count(&rows[cursor]) <= 1 {
        return None;
    }

    let collected: Vec<Vec<String>> = rows[cursor..]
        .iter()
        .take_while(|row| !is_row_empty(row) && !is_heading_row(row))
        .map(|row| row.iter().map(|c| c.value.clone()).collect())
        .collect();

    let consumed = collected.len();
    let mut collected = collected.into_iter();
    let headers = collected.next()?;
    Some(Classified {
        element: Some(StructuralElement::Table {
            headers,
            rows: collected.collect(),
        }),
        consumed,
    })
}

fn paragraph_rule(rows: &[Vec<Cell>], cursor: usize) -> Option<Classified> {
    let text = joined_values(&rows[cursor]);
    Some(Classified {
        element: (!text.is_empty()).then_some(StructuralElement::Paragraph { text }),
        consumed: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(value: &str, bold: bool, merged: bool, size: Option<f32>) -> Cell {
        Cell {
            value: value.into(),
            bold,
            merged,
            font_size: size,
            ..Cell::default()
        }
    }

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    fn grid(rows: Vec<Vec<Cell>>) -> Grid {
        Grid::new("Sheet1", rows)
    }

    #[test]
    fn merged_bold_large_cell_is_level_one_heading() {
        let g = grid(vec![vec![
            styled("Q1 Sales", true, true, Some(14.0)),
            Cell::text(""),
            Cell::text(""),
        ]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Heading {
                text: "Q1 Sales".into(),
                level: 1
            }]
        );
    }

    #[test]
    fn merged_bold_small_cell_is_level_two() {
        let g = grid(vec![vec![styled("Section", true, true, Some(11.0))]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Heading {
                text: "Section".into(),
                level: 2
            }]
        );
    }

    #[test]
    fn large_bold_without_merge_falls_to_level_three() {
        let g = grid(vec![vec![styled("Notes", true, false, Some(16.0))]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Heading {
                text: "Notes".into(),
                level: 3
            }]
        );
    }

    #[test]
    fn filled_row_with_bold_first_cell_is_heading() {
        let first = styled("Owner", true, false, None);
        let mut second = Cell::text("Team A");
        second.background = Some("FFFFFF00".into());
        let g = grid(vec![vec![first, second]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Heading {
                text: "Owner Team A".into(),
                level: 3
            }]
        );
    }

    #[test]
    fn fill_without_bold_is_not_a_heading() {
        let mut cell = Cell::text("Reminder");
        cell.background = Some("FFCCCCCC".into());
        let g = grid(vec![vec![cell]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Paragraph {
                text: "Reminder".into()
            }]
        );
    }

    #[test]
    fn empty_row_is_divider() {
        let g = grid(vec![row(&["", "", ""]), vec![]]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Divider, StructuralElement::Divider]
        );
    }

    #[test]
    fn table_collects_until_empty_row() {
        let g = grid(vec![
            row(&["Name", "Role", ""]),
            row(&["Aoki", "Chair", ""]),
            row(&["Sato", "", "note"]),
            row(&["", "", ""]),
            row(&["tail"]),
        ]);
        let elements = analyze_grid(&g);
        assert_eq!(elements.len(), 3);
        assert_eq!(
            elements[0],
            StructuralElement::Table {
                headers: vec!["Name".into(), "Role".into(), "".into()],
                rows: vec![
                    vec!["Aoki".into(), "Chair".into(), "".into()],
                    vec!["Sato".into(), "".into(), "note".into()],
                ],
            }
        );
        assert_eq!(elements[1], StructuralElement::Divider);
        assert_eq!(
            elements[2],
            StructuralElement::Paragraph {
                text: "tail".into()
            }
        );
    }

    #[test]
    fn table_stops_at_heading_row() {
        let g = grid(vec![
            row(&["A", "B"]),
            row(&["1", "2"]),
            vec![styled("Next", true, true, None), Cell::text("")],
            row(&["3", "4"]),
        ]);
        let elements = analyze_grid(&g);
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[0], StructuralElement::Table { rows, .. } if rows.len() == 1));
        assert!(matches!(&elements[1], StructuralElement::Heading { level: 2, .. }));
        assert!(matches!(&elements[2], StructuralElement::Table { rows, .. } if rows.is_empty()));
    }

    #[test]
    fn single_row_still_emits_table() {
        let g = grid(vec![row(&["only", "headers"])]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Table {
                headers: vec!["only".into(), "headers".into()],
                rows: vec![],
            }]
        );
    }

    #[test]
    fn paragraph_joins_sparse_single_value() {
        let g = grid(vec![row(&["", "", "Remarks go here"])]);
        assert_eq!(
            analyze_grid(&g),
            vec![StructuralElement::Paragraph {
                text: "Remarks go here".into()
            }]
        );
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let g = grid(vec![
            row(&["A", "B", "C"]),
            row(&["1"]),
            row(&["2", "3"]),
        ]);
        let elements = analyze_grid(&g);
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            StructuralElement::Table { headers, rows } => {
                assert_eq!(headers.len(), 3);
                assert_eq!(rows, &vec![vec!["1".to_string()], vec!["2".into(), "3".into()]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn every_row_group_yields_one_element() {
        // heading, table(3 rows), divider, paragraph, table(1 row), divider
        let g = grid(vec![
            vec![styled("Title", true, true, Some(18.0))],
            row(&["k", "v"]),
            row(&["a", "1"]),
            row(&["b", "2"]),
            row(&[""]),
            row(&["free text"]),
            row(&["x", "y"]),
            row(&["", ""]),
        ]);
        let elements = analyze_grid(&g);
        assert_eq!(elements.len(), 6);
        let kinds: Vec<&str> = elements
            .iter()
            .map(|e| match e {
                StructuralElement::Heading { .. } => "h",
                StructuralElement::Table { .. } => "t",
                StructuralElement::Paragraph { .. } => "p",
                StructuralElement::Divider => "d",
            })
            .collect();
        assert_eq!(kinds, vec!["h", "t", "d", "p", "t", "d"]);
    }
}
