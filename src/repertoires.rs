//! Processes Appendix A to extract the code points left unassigned by each
//! supported Unicode repertoire.

use crate::constants::SUPPORTED_REPERTOIRES;
use crate::error::Result;
use crate::range_table::parse_range_table;
use crate::sources::Sources;
use crate::types::{CodePoint, RangeTable};

/// The unassigned code points of one Unicode version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repertoire {
    /// The Unicode version, e.g. `"3.2"`.
    pub version: &'static str,
    /// The identifier of the source table, e.g. `"A.1"`.
    pub table_id: &'static str,
    pub unassigned: RangeTable,
}

impl Repertoire {
    pub fn is_unassigned(&self, code: CodePoint) -> bool {
        self.unassigned.iter().any(|range| range.contains(code))
    }
}

/// Parse one unassigned code point table per supported repertoire, in the
/// order of [`SUPPORTED_REPERTOIRES`].  Each table is validated on its own.
pub fn parse_unassigned_code_points(sources: &Sources) -> Result<Vec<Repertoire>> {
    SUPPORTED_REPERTOIRES
        .iter()
        .map(|&(version, table_id)| {
            Ok(Repertoire {
                version,
                table_id,
                unassigned: parse_range_table(&sources.unassigned_code_points, table_id)?,
            })
        })
        .collect()
}

#[test]
fn check_unassigned_code_points() {
    use crate::types::is_strictly_ascending;

    let repertoires = parse_unassigned_code_points(&Sources::bundled()).expect("bundled tables");
    assert_eq!(repertoires.len(), 1);

    let unicode_3_2 = &repertoires[0];
    assert_eq!(unicode_3_2.version, "3.2");
    assert!(is_strictly_ascending(&unicode_3_2.unassigned));

    // The first and last entries of Table A.1.
    assert_eq!(unicode_3_2.unassigned[0].to_string(), "0221");
    assert_eq!(
        unicode_3_2.unassigned.last().map(|range| range.to_string()),
        Some("E0080-EFFFD".to_string())
    );

    assert!(unicode_3_2.is_unassigned(0x0234));
    assert!(!unicode_3_2.is_unassigned('A' as u32));
    // Noncharacters are listed in C.4, not here.
    assert!(!unicode_3_2.is_unassigned(0xFFFE));
    assert!(!unicode_3_2.is_unassigned(0xFDD0));
}

#[test]
fn overlapping_repertoire_entry_fails() {
    use crate::error::Error;

    let sources = Sources::bundled().with_unassigned_code_points(
        "----- Start Table A.1 -----\n0100-0200\n0150-0160\n----- End Table A.1 -----\n",
    );
    let err = parse_unassigned_code_points(&sources).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }), "{}", err);
}
