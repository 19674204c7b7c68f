//! Processes Appendix C to extract the code points prohibited in output, one
//! table per category.
//!
//! The two space categories are exposed as flat lists of code points, since
//! consumers treat space characters as discrete exclusions; every other
//! category is a [`RangeTable`].

use crate::error::Result;
use crate::range_table::parse_range_table;
use crate::sources::Sources;
use crate::types::{CodePoint, CodePointRange, RangeTable};

/// A named category of prohibited code points.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProhibitionCategory {
    AsciiSpace,
    NonAsciiSpace,
    AsciiControl,
    NonAsciiControl,
    PrivateUse,
    NonCharacterCodePoints,
    SurrogateCodes,
    InappropriatePlainText,
    InappropriateCanonicalRepresentation,
    ChangeDisplayProperties,
    TaggingCharacters,
}

impl ProhibitionCategory {
    pub const ALL: [ProhibitionCategory; 11] = [
        ProhibitionCategory::AsciiSpace,
        ProhibitionCategory::NonAsciiSpace,
        ProhibitionCategory::AsciiControl,
        ProhibitionCategory::NonAsciiControl,
        ProhibitionCategory::PrivateUse,
        ProhibitionCategory::NonCharacterCodePoints,
        ProhibitionCategory::SurrogateCodes,
        ProhibitionCategory::InappropriatePlainText,
        ProhibitionCategory::InappropriateCanonicalRepresentation,
        ProhibitionCategory::ChangeDisplayProperties,
        ProhibitionCategory::TaggingCharacters,
    ];

    /// The identifier of the table listing this category.
    pub fn table_id(self) -> &'static str {
        match self {
            ProhibitionCategory::AsciiSpace => "C.1.1",
            ProhibitionCategory::NonAsciiSpace => "C.1.2",
            ProhibitionCategory::AsciiControl => "C.2.1",
            ProhibitionCategory::NonAsciiControl => "C.2.2",
            ProhibitionCategory::PrivateUse => "C.3",
            ProhibitionCategory::NonCharacterCodePoints => "C.4",
            ProhibitionCategory::SurrogateCodes => "C.5",
            ProhibitionCategory::InappropriatePlainText => "C.6",
            ProhibitionCategory::InappropriateCanonicalRepresentation => "C.7",
            ProhibitionCategory::ChangeDisplayProperties => "C.8",
            ProhibitionCategory::TaggingCharacters => "C.9",
        }
    }

    /// Whether the category is a list of single code points rather than
    /// ranges.
    pub fn is_space(self) -> bool {
        matches!(
            self,
            ProhibitionCategory::AsciiSpace | ProhibitionCategory::NonAsciiSpace
        )
    }
}

/// The contents of one prohibition table, in the shape its category calls
/// for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProhibitionTable {
    Points(Vec<CodePoint>),
    Ranges(RangeTable),
}

impl ProhibitionTable {
    pub fn contains(&self, code: CodePoint) -> bool {
        match self {
            ProhibitionTable::Points(points) => points.contains(&code),
            ProhibitionTable::Ranges(ranges) => ranges.iter().any(|range| range.contains(code)),
        }
    }

    /// The table as discrete code points, expanding any ranges.
    pub fn into_points(self) -> Vec<CodePoint> {
        match self {
            ProhibitionTable::Points(points) => points,
            ProhibitionTable::Ranges(ranges) => ranges.iter().flat_map(|range| range.iter()).collect(),
        }
    }

    /// The table as ranges, with each discrete code point its own range.
    pub fn into_ranges(self) -> RangeTable {
        match self {
            ProhibitionTable::Points(points) => points
                .into_iter()
                .map(|code| CodePointRange::from_parsed(code, code))
                .collect(),
            ProhibitionTable::Ranges(ranges) => ranges,
        }
    }
}

/// Parse the table of `category`.  Space categories use the same ordering
/// rules as every other table and are then flattened, even where the source
/// uses range syntax.
pub fn parse_prohibition_table(
    sources: &Sources,
    category: ProhibitionCategory,
) -> Result<ProhibitionTable> {
    let ranges = parse_range_table(&sources.prohibition_tables, category.table_id())?;
    Ok(if category.is_space() {
        ProhibitionTable::Points(ProhibitionTable::Ranges(ranges).into_points())
    } else {
        ProhibitionTable::Ranges(ranges)
    })
}

macro_rules! category_parsers {
    ($($(#[$doc:meta])* $name:ident => $category:ident, $into:ident -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(sources: &Sources) -> Result<$ty> {
                parse_prohibition_table(sources, ProhibitionCategory::$category)
                    .map(ProhibitionTable::$into)
            }
        )*
    };
}

category_parsers! {
    /// Table C.1.1: ASCII space characters.
    parse_ascii_space => AsciiSpace, into_points -> Vec<CodePoint>;
    /// Table C.1.2: non-ASCII space characters.
    parse_non_ascii_space => NonAsciiSpace, into_points -> Vec<CodePoint>;
    /// Table C.2.1: ASCII control characters.
    parse_ascii_control => AsciiControl, into_ranges -> RangeTable;
    /// Table C.2.2: non-ASCII control characters.
    parse_non_ascii_control => NonAsciiControl, into_ranges -> RangeTable;
    /// Table C.3: private use.
    parse_private_use => PrivateUse, into_ranges -> RangeTable;
    /// Table C.4: non-character code points.
    parse_non_character_code_points => NonCharacterCodePoints, into_ranges -> RangeTable;
    /// Table C.5: surrogate codes.
    parse_surrogate_codes => SurrogateCodes, into_ranges -> RangeTable;
    /// Table C.6: inappropriate for plain text.
    parse_inappropriate_plain_text => InappropriatePlainText, into_ranges -> RangeTable;
    /// Table C.7: inappropriate for canonical representation.
    parse_inappropriate_canonical_representation => InappropriateCanonicalRepresentation, into_ranges -> RangeTable;
    /// Table C.8: change display properties or are deprecated.
    parse_change_display_properties => ChangeDisplayProperties, into_ranges -> RangeTable;
    /// Table C.9: tagging characters.
    parse_tagging_characters => TaggingCharacters, into_ranges -> RangeTable;
}

#[cfg(test)]
use crate::constants::{IDEOGRAPHIC_SPACE, NO_BREAK_SPACE, SPACE};

#[cfg(test)]
fn pairs(ranges: &[CodePointRange]) -> Vec<(CodePoint, CodePoint)> {
    ranges.iter().map(|range| (range.low(), range.high())).collect()
}

#[test]
fn check_space_tables() {
    let sources = Sources::bundled();
    assert_eq!(parse_ascii_space(&sources).expect("C.1.1"), vec![SPACE]);

    let non_ascii = parse_non_ascii_space(&sources).expect("C.1.2");
    assert_eq!(non_ascii.len(), 17);
    assert_eq!(non_ascii.first(), Some(&NO_BREAK_SPACE));
    assert_eq!(non_ascii.last(), Some(&IDEOGRAPHIC_SPACE));
    assert!(!non_ascii.contains(&SPACE));
}

#[test]
fn check_range_tables() {
    let sources = Sources::bundled();
    assert_eq!(
        pairs(&parse_ascii_control(&sources).expect("C.2.1")),
        vec![(0x0000, 0x001F), (0x007F, 0x007F)]
    );
    assert_eq!(
        pairs(&parse_private_use(&sources).expect("C.3")),
        vec![(0xE000, 0xF8FF), (0xF0000, 0xFFFFD), (0x100000, 0x10FFFD)]
    );
    assert_eq!(
        pairs(&parse_surrogate_codes(&sources).expect("C.5")),
        vec![(0xD800, 0xDFFF)]
    );
    assert_eq!(
        pairs(&parse_inappropriate_canonical_representation(&sources).expect("C.7")),
        vec![(0x2FF0, 0x2FFB)]
    );
    assert_eq!(
        pairs(&parse_tagging_characters(&sources).expect("C.9")),
        vec![(0xE0001, 0xE0001), (0xE0020, 0xE007F)]
    );

    // FDD0-FDEF plus the last two code points of each of the 17 planes.
    let non_characters = parse_non_character_code_points(&sources).expect("C.4");
    assert_eq!(non_characters.len(), 18);
    assert!((0..=0x10).all(|plane| non_characters
        .iter()
        .any(|range| range.contains(plane << 16 | 0xFFFE) && range.contains(plane << 16 | 0xFFFF))));

    let inappropriate = parse_inappropriate_plain_text(&sources).expect("C.6");
    assert_eq!(inappropriate.iter().map(|range| range.len()).sum::<usize>(), 5);

    let control = parse_non_ascii_control(&sources).expect("C.2.2");
    assert!(control.iter().any(|range| range.contains(0x1D173)));

    let display = parse_change_display_properties(&sources).expect("C.8");
    assert!(display.iter().all(|range| range.is_singleton()));
}

#[test]
fn every_category_has_its_own_table() {
    let sources = Sources::bundled();
    let ids = ProhibitionCategory::ALL
        .iter()
        .map(|category| category.table_id())
        .collect::<std::collections::HashSet<_>>();
    assert_eq!(ids.len(), 11);

    for category in ProhibitionCategory::ALL {
        let table = parse_prohibition_table(&sources, category).expect("bundled tables");
        assert_eq!(
            matches!(table, ProhibitionTable::Points(_)),
            category.is_space(),
            "{:?}",
            category
        );
        if let ProhibitionTable::Ranges(ranges) = &table {
            assert!(crate::types::is_strictly_ascending(ranges), "{:?}", category);
        }
    }
}

#[test]
fn space_ranges_are_flattened() {
    let sources = Sources::bundled().with_prohibition_tables(
        "----- Start Table C.1.1 -----\n\
         0x0020\n\
         ----- End Table C.1.1 -----\n\
         ----- Start Table C.1.2 -----\n\
         00A0; NO-BREAK SPACE\n\
         2000-200A; [EN QUAD..HAIR SPACE]\n\
         ----- End Table C.1.2 -----\n",
    );
    assert_eq!(parse_ascii_space(&sources).expect("C.1.1"), vec![SPACE]);

    let non_ascii = parse_non_ascii_space(&sources).expect("C.1.2");
    assert_eq!(non_ascii.len(), 12);
    assert_eq!(non_ascii[1..], (0x2000..=0x200A).collect::<Vec<_>>()[..]);

    let table = parse_prohibition_table(&sources, ProhibitionCategory::NonAsciiSpace)
        .expect("C.1.2");
    assert!(table.contains(0x2005));
    assert_eq!(table.into_ranges().len(), 12);
}

#[test]
fn overlapping_prohibition_entry_fails() {
    use crate::error::Error;

    let sources = Sources::bundled().with_prohibition_tables(
        "----- Start Table C.3 -----\n\
         E000-F8FF\n\
         F000\n\
         ----- End Table C.3 -----\n",
    );
    let err = parse_private_use(&sources).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { line: 3, .. }), "{}", err);
}
