//! Build a [`RangeTable`] from the lines of a classification table, enforcing
//! that entries are ascending and never overlap.  Overlapping input is an
//! error rather than something to merge.

use crate::error::{Error, Result};
use crate::sources::Source;
use crate::table_lines::{Layout, TableLines};
use crate::types::RangeTable;
use tracing::debug;

/// Collect every line of `lines` into a range table.
pub fn collect_range_table(lines: TableLines<'_>) -> Result<RangeTable> {
    let source = lines.source();
    let table_id = lines.table_id();

    let mut table = RangeTable::new();
    for line in lines {
        let line = line?;
        let range = line.code_points.to_range();

        if let Some(prev) = table.last() {
            if prev.high() >= range.low() {
                let reason = if prev.overlaps(&range) {
                    format!("overlaps preceding entry {}", prev)
                } else {
                    format!("out of order after preceding entry {}", prev)
                };
                return Err(Error::InvalidRange {
                    source_name: source.name().to_string(),
                    line: line.line_number,
                    range: range.to_string(),
                    reason,
                });
            }
        }

        table.push(range);
    }

    debug!(
        table = table_id,
        source = source.name(),
        entries = table.len(),
        "parsed range table"
    );
    Ok(table)
}

/// Parse the table `table_id` of `source` as a range table.
pub fn parse_range_table(source: &Source, table_id: &str) -> Result<RangeTable> {
    collect_range_table(TableLines::new(source, table_id, Layout::Ranges))
}

#[cfg(test)]
fn parse_fixture(body: &str) -> Result<RangeTable> {
    let text = format!("----- Start Table T -----\n{}----- End Table T -----\n", body);
    parse_range_table(&Source::new("fixture.txt", text), "T")
}

#[test]
fn singletons_and_ranges() {
    let table = parse_fixture("0000-001F; [CONTROL CHARACTERS]\n007F; DELETE\n").expect("valid table");
    assert_eq!(
        table.iter().map(|r| (r.low(), r.high())).collect::<Vec<_>>(),
        vec![(0x00, 0x1F), (0x7F, 0x7F)]
    );
}

#[test]
fn adjacent_ranges_are_kept_apart() {
    let table = parse_fixture("0100-01FF\n0200\n").expect("valid table");
    assert_eq!(table.len(), 2);
}

#[test]
fn overlapping_range_is_rejected() {
    let err = parse_fixture("0100-0200\n0150-0160\n").unwrap_err();
    assert!(
        matches!(err, Error::InvalidRange { line: 3, ref range, .. } if range == "0150-0160"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn out_of_order_entry_is_rejected() {
    let err = parse_fixture("0300\n0200-0250\n").unwrap_err();
    assert!(matches!(err, Error::InvalidRange { line: 3, .. }), "{}", err);

    let err = parse_fixture("0300\n0300\n").unwrap_err();
    assert!(matches!(err, Error::InvalidRange { line: 3, .. }), "{}", err);
}

#[test]
fn empty_table_is_valid() {
    assert_eq!(parse_fixture("").expect("valid table"), RangeTable::new());
}
