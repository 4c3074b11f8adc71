//! Integration tests for turning positional sheet rows into unique listings.

use soldsync_core::{Cell, ColumnLayout, ListingFilter, ListingRow};

fn sheet_row(id: Cell, d: &str, e: &str, i: Cell) -> Vec<Cell> {
    vec![
        id,
        "Produto".into(),
        "x".into(),
        d.into(),
        e.into(),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        i,
    ]
}

fn rows(sheet: &[Vec<Cell>]) -> Vec<ListingRow> {
    let layout = ColumnLayout::default();
    sheet.iter().map(|cells| layout.row(cells)).collect()
}

#[test]
fn test_sheet_to_unique_items() {
    let sheet = vec![
        // Header row never matches.
        vec!["ID".into(), Cell::Empty, Cell::Empty, "Status".into(), "Status".into()],
        sheet_row("MLB999".into(), "Sem Giro", "Sem Giro", 0i64.into()),
        sheet_row("MLB888".into(), "Com Giro", "Sem Giro", 0i64.into()),
        sheet_row("MLB777".into(), "Sem Giro", "Sem Giro", 2i64.into()),
        sheet_row(Cell::Empty, "Sem Giro", "Sem Giro", 0i64.into()),
        sheet_row("MLB999".into(), "Sem Giro", "Sem Giro", 0i64.into()),
        sheet_row("MLB555".into(), "Sem Giro ", " Sem Giro", Cell::Number(0.0)),
        sheet_row("MLB444".into(), "Sem Giro", "Sem Giro", "0".into()),
    ];

    let unique = ListingFilter::default().apply(&rows(&sheet));
    let ids: Vec<String> = unique.items.iter().map(ToString::to_string).collect();

    assert_eq!(ids, vec!["MLB999", "MLB555"]);
    assert_eq!(unique.duplicates, 1);
}

#[test]
fn test_no_duplicates_for_any_input() {
    let mut sheet = Vec::new();
    for n in 0..200 {
        let id = format!("MLB{}", n % 17);
        sheet.push(sheet_row(id.as_str().into(), "Sem Giro", "Sem Giro", 0i64.into()));
    }

    let unique = ListingFilter::default().apply(&rows(&sheet));

    assert_eq!(unique.len(), 17);
    assert_eq!(unique.matched, 200);
    assert_eq!(unique.duplicates, 183);

    let expected: Vec<String> = (0..17).map(|n| format!("MLB{n}")).collect();
    let got: Vec<String> = unique.items.iter().map(ToString::to_string).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_empty_sheet() {
    let unique = ListingFilter::default().apply(&rows(&[]));
    assert!(unique.is_empty());
    assert!(unique.first().is_none());
}
