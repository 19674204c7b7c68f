//! Processes Appendix D to extract the code points with bidirectional
//! property R or AL (D.1) and with bidirectional property L (D.2).
//!
//! The two tables are disjoint in the source data.  That is not re-checked
//! here; each table is validated only on its own.

use crate::constants::{TABLE_BIDI_L, TABLE_BIDI_R_OR_AL};
use crate::error::Result;
use crate::range_table::parse_range_table;
use crate::sources::Sources;
use crate::types::RangeTable;

/// Table D.1: characters with bidirectional property "R" or "AL".
pub fn parse_bidirectional_property_r_or_al(sources: &Sources) -> Result<RangeTable> {
    parse_range_table(&sources.bidirectional_tables, TABLE_BIDI_R_OR_AL)
}

/// Table D.2: characters with bidirectional property "L".
pub fn parse_bidirectional_property_l(sources: &Sources) -> Result<RangeTable> {
    parse_range_table(&sources.bidirectional_tables, TABLE_BIDI_L)
}

#[test]
fn check_bidirectional_tables() {
    use crate::constants::{ARABIC_LETTER_ALEF, HEBREW_LETTER_ALEF, LATIN_CAPITAL_LETTER_A};

    let sources = Sources::bundled();
    let r_or_al = parse_bidirectional_property_r_or_al(&sources).expect("D.1");
    let l = parse_bidirectional_property_l(&sources).expect("D.2");

    let contains = |table: &RangeTable, code| table.iter().any(|range| range.contains(code));

    assert!(contains(&r_or_al, HEBREW_LETTER_ALEF));
    assert!(contains(&r_or_al, ARABIC_LETTER_ALEF));
    assert!(!contains(&r_or_al, LATIN_CAPITAL_LETTER_A));

    assert!(contains(&l, LATIN_CAPITAL_LETTER_A));
    assert!(!contains(&l, HEBREW_LETTER_ALEF));
    assert!(!contains(&l, '0' as u32));
}

#[test]
fn bidirectional_tables_are_disjoint() {
    let sources = Sources::bundled();
    let r_or_al = parse_bidirectional_property_r_or_al(&sources).expect("D.1");
    let l = parse_bidirectional_property_l(&sources).expect("D.2");

    // Both tables are sorted, so a single merge pass finds any overlap.
    let (mut i, mut j) = (0, 0);
    while i < r_or_al.len() && j < l.len() {
        assert!(
            !r_or_al[i].overlaps(&l[j]),
            "{} (D.1) overlaps {} (D.2)",
            r_or_al[i],
            l[j]
        );
        if r_or_al[i].high() < l[j].high() {
            i += 1;
        } else {
            j += 1;
        }
    }
}

#[test]
fn reversed_range_fails() {
    use crate::error::Error;

    let sources = Sources::bundled().with_bidirectional_tables(
        "----- Start Table D.2 -----\n0041-005A\n007A-0061\n----- End Table D.2 -----\n",
    );
    let err = parse_bidirectional_property_l(&sources).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { line: 3, .. }), "{}", err);
}
