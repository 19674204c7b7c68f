//! The complete set of stringprep tables, parsed once and then only read.

use crate::bidirectional_tables::{
    parse_bidirectional_property_l, parse_bidirectional_property_r_or_al,
};
use crate::error::Result;
use crate::mapping_tables::{
    parse_map_to_nothing, parse_map_used_with_nfkc, parse_map_used_with_no_normalization,
};
use crate::prohibition_tables::{
    parse_ascii_control, parse_ascii_space, parse_change_display_properties,
    parse_inappropriate_canonical_representation, parse_inappropriate_plain_text,
    parse_non_ascii_control, parse_non_ascii_space, parse_non_character_code_points,
    parse_private_use, parse_surrogate_codes, parse_tagging_characters, ProhibitionCategory,
};
use crate::repertoires::{parse_unassigned_code_points, Repertoire};
use crate::sources::Sources;
use crate::types::{format_code_points, CodePoint, CodePointRange, MappingTable, RangeTable};
use tracing::{debug, warn};

/// The name of one table held by [`StringprepTables`].
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableName {
    UnassignedCodePoints,
    MapToNothing,
    MapUsedWithNfkc,
    MapUsedWithNoNormalization,
    Prohibited(ProhibitionCategory),
    PropertyRorAL,
    PropertyL,
}

impl TableName {
    pub const ALL: [TableName; 17] = [
        TableName::UnassignedCodePoints,
        TableName::MapToNothing,
        TableName::MapUsedWithNfkc,
        TableName::MapUsedWithNoNormalization,
        TableName::Prohibited(ProhibitionCategory::AsciiSpace),
        TableName::Prohibited(ProhibitionCategory::NonAsciiSpace),
        TableName::Prohibited(ProhibitionCategory::AsciiControl),
        TableName::Prohibited(ProhibitionCategory::NonAsciiControl),
        TableName::Prohibited(ProhibitionCategory::PrivateUse),
        TableName::Prohibited(ProhibitionCategory::NonCharacterCodePoints),
        TableName::Prohibited(ProhibitionCategory::SurrogateCodes),
        TableName::Prohibited(ProhibitionCategory::InappropriatePlainText),
        TableName::Prohibited(ProhibitionCategory::InappropriateCanonicalRepresentation),
        TableName::Prohibited(ProhibitionCategory::ChangeDisplayProperties),
        TableName::Prohibited(ProhibitionCategory::TaggingCharacters),
        TableName::PropertyRorAL,
        TableName::PropertyL,
    ];

    /// A `snake_case` name for the table, as used by generated code.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::UnassignedCodePoints => "unassigned_code_points",
            TableName::MapToNothing => "map_to_nothing",
            TableName::MapUsedWithNfkc => "map_used_with_nfkc",
            TableName::MapUsedWithNoNormalization => "map_used_with_no_normalization",
            TableName::Prohibited(category) => match category {
                ProhibitionCategory::AsciiSpace => "ascii_space",
                ProhibitionCategory::NonAsciiSpace => "non_ascii_space",
                ProhibitionCategory::AsciiControl => "ascii_control",
                ProhibitionCategory::NonAsciiControl => "non_ascii_control",
                ProhibitionCategory::PrivateUse => "private_use",
                ProhibitionCategory::NonCharacterCodePoints => "non_character_code_points",
                ProhibitionCategory::SurrogateCodes => "surrogate_codes",
                ProhibitionCategory::InappropriatePlainText => "inappropriate_plain_text",
                ProhibitionCategory::InappropriateCanonicalRepresentation => {
                    "inappropriate_canonical_representation"
                }
                ProhibitionCategory::ChangeDisplayProperties => "change_display_properties",
                ProhibitionCategory::TaggingCharacters => "tagging_characters",
            },
            TableName::PropertyRorAL => "property_r_or_al",
            TableName::PropertyL => "property_l",
        }
    }
}

/// A borrowed view of one table, in the shape that table has.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableRef<'a> {
    Repertoires(&'a [Repertoire]),
    Points(&'a [CodePoint]),
    Ranges(&'a [CodePointRange]),
    Mapping(&'a MappingTable),
}

/// A code point that one mapping table maps to nothing while another gives it
/// a replacement.  Such keys are reported, never resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MappingConflict {
    pub code: CodePoint,
    pub table: TableName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Mappings {
    map_to_nothing: Vec<CodePoint>,
    map_used_with_nfkc: MappingTable,
    map_used_with_no_normalization: MappingTable,
}

impl Mappings {
    fn parse(sources: &Sources) -> Result<Mappings> {
        Ok(Mappings {
            map_to_nothing: parse_map_to_nothing(sources)?,
            map_used_with_nfkc: parse_map_used_with_nfkc(sources)?,
            map_used_with_no_normalization: parse_map_used_with_no_normalization(sources)?,
        })
    }

    fn conflicts(&self) -> Vec<MappingConflict> {
        let mut conflicts = vec![];
        for &code in &self.map_to_nothing {
            for (table, map) in [
                (TableName::MapUsedWithNfkc, &self.map_used_with_nfkc),
                (TableName::MapUsedWithNoNormalization, &self.map_used_with_no_normalization),
            ] {
                if map.contains_key(&code) {
                    conflicts.push(MappingConflict { code, table });
                }
            }
        }
        conflicts
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Prohibitions {
    ascii_space: Vec<CodePoint>,
    non_ascii_space: Vec<CodePoint>,
    ascii_control: RangeTable,
    non_ascii_control: RangeTable,
    private_use: RangeTable,
    non_character_code_points: RangeTable,
    surrogate_codes: RangeTable,
    inappropriate_plain_text: RangeTable,
    inappropriate_canonical_representation: RangeTable,
    change_display_properties: RangeTable,
    tagging_characters: RangeTable,
}

impl Prohibitions {
    fn parse(sources: &Sources) -> Result<Prohibitions> {
        Ok(Prohibitions {
            ascii_space: parse_ascii_space(sources)?,
            non_ascii_space: parse_non_ascii_space(sources)?,
            ascii_control: parse_ascii_control(sources)?,
            non_ascii_control: parse_non_ascii_control(sources)?,
            private_use: parse_private_use(sources)?,
            non_character_code_points: parse_non_character_code_points(sources)?,
            surrogate_codes: parse_surrogate_codes(sources)?,
            inappropriate_plain_text: parse_inappropriate_plain_text(sources)?,
            inappropriate_canonical_representation: parse_inappropriate_canonical_representation(
                sources,
            )?,
            change_display_properties: parse_change_display_properties(sources)?,
            tagging_characters: parse_tagging_characters(sources)?,
        })
    }

    fn get(&self, category: ProhibitionCategory) -> TableRef<'_> {
        match category {
            ProhibitionCategory::AsciiSpace => TableRef::Points(&self.ascii_space),
            ProhibitionCategory::NonAsciiSpace => TableRef::Points(&self.non_ascii_space),
            ProhibitionCategory::AsciiControl => TableRef::Ranges(&self.ascii_control),
            ProhibitionCategory::NonAsciiControl => TableRef::Ranges(&self.non_ascii_control),
            ProhibitionCategory::PrivateUse => TableRef::Ranges(&self.private_use),
            ProhibitionCategory::NonCharacterCodePoints => {
                TableRef::Ranges(&self.non_character_code_points)
            }
            ProhibitionCategory::SurrogateCodes => TableRef::Ranges(&self.surrogate_codes),
            ProhibitionCategory::InappropriatePlainText => {
                TableRef::Ranges(&self.inappropriate_plain_text)
            }
            ProhibitionCategory::InappropriateCanonicalRepresentation => {
                TableRef::Ranges(&self.inappropriate_canonical_representation)
            }
            ProhibitionCategory::ChangeDisplayProperties => {
                TableRef::Ranges(&self.change_display_properties)
            }
            ProhibitionCategory::TaggingCharacters => TableRef::Ranges(&self.tagging_characters),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Bidirectional {
    property_r_or_al: RangeTable,
    property_l: RangeTable,
}

impl Bidirectional {
    fn parse(sources: &Sources) -> Result<Bidirectional> {
        Ok(Bidirectional {
            property_r_or_al: parse_bidirectional_property_r_or_al(sources)?,
            property_l: parse_bidirectional_property_l(sources)?,
        })
    }
}

/// Every table extracted from the stringprep appendices.
///
/// A value of this type only exists once every table has parsed
/// successfully, and it offers no way to modify a table afterwards.  Share it
/// by reference, or in an `Arc` across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringprepTables {
    unassigned_code_points: Vec<Repertoire>,
    mappings: Mappings,
    prohibitions: Prohibitions,
    bidirectional: Bidirectional,
    mapping_conflicts: Vec<MappingConflict>,
}

impl StringprepTables {
    /// Parse the tables bundled with this crate.
    pub fn new() -> Result<StringprepTables> {
        StringprepTables::from_sources(&Sources::bundled())
    }

    /// Parse every table from `sources`, one after another.
    pub fn from_sources(sources: &Sources) -> Result<StringprepTables> {
        debug!("parsing stringprep tables");
        let unassigned_code_points = parse_unassigned_code_points(sources)?;
        let mappings = Mappings::parse(sources)?;
        let prohibitions = Prohibitions::parse(sources)?;
        let bidirectional = Bidirectional::parse(sources)?;
        Ok(StringprepTables::assemble(
            unassigned_code_points,
            mappings,
            prohibitions,
            bidirectional,
        ))
    }

    /// Parse every table from `sources`, with the four appendices parsed
    /// concurrently.  The result is identical to [`Self::from_sources`]; when
    /// several appendices are invalid, the error reported is the one
    /// sequential parsing would report first.
    pub fn from_sources_parallel(sources: &Sources) -> Result<StringprepTables> {
        debug!("parsing stringprep tables in parallel");
        let ((unassigned_code_points, mappings), (prohibitions, bidirectional)) = rayon::join(
            || {
                rayon::join(
                    || parse_unassigned_code_points(sources),
                    || Mappings::parse(sources),
                )
            },
            || {
                rayon::join(
                    || Prohibitions::parse(sources),
                    || Bidirectional::parse(sources),
                )
            },
        );
        Ok(StringprepTables::assemble(
            unassigned_code_points?,
            mappings?,
            prohibitions?,
            bidirectional?,
        ))
    }

    fn assemble(
        unassigned_code_points: Vec<Repertoire>,
        mappings: Mappings,
        prohibitions: Prohibitions,
        bidirectional: Bidirectional,
    ) -> StringprepTables {
        let mapping_conflicts = mappings.conflicts();
        for conflict in &mapping_conflicts {
            warn!(
                code = %format_code_points(&[conflict.code]),
                table = conflict.table.as_str(),
                "code point is mapped to nothing and also has a replacement"
            );
        }

        let tables = StringprepTables {
            unassigned_code_points,
            mappings,
            prohibitions,
            bidirectional,
            mapping_conflicts,
        };
        debug!(tables = TableName::ALL.len(), "parsed stringprep tables");
        tables
    }

    /// Look up a table by name.
    pub fn table(&self, name: TableName) -> TableRef<'_> {
        match name {
            TableName::UnassignedCodePoints => TableRef::Repertoires(&self.unassigned_code_points),
            TableName::MapToNothing => TableRef::Points(&self.mappings.map_to_nothing),
            TableName::MapUsedWithNfkc => TableRef::Mapping(&self.mappings.map_used_with_nfkc),
            TableName::MapUsedWithNoNormalization => {
                TableRef::Mapping(&self.mappings.map_used_with_no_normalization)
            }
            TableName::Prohibited(category) => self.prohibitions.get(category),
            TableName::PropertyRorAL => TableRef::Ranges(&self.bidirectional.property_r_or_al),
            TableName::PropertyL => TableRef::Ranges(&self.bidirectional.property_l),
        }
    }

    /// Code points of table B.1 that a replacement table also maps.  Empty
    /// for the bundled tables.
    pub fn mapping_conflicts(&self) -> &[MappingConflict] {
        &self.mapping_conflicts
    }

    /// Unassigned code points, one entry per supported repertoire.
    pub fn unassigned_code_points(&self) -> &[Repertoire] {
        &self.unassigned_code_points
    }

    pub fn map_to_nothing(&self) -> &[CodePoint] {
        &self.mappings.map_to_nothing
    }

    pub fn map_used_with_nfkc(&self) -> &MappingTable {
        &self.mappings.map_used_with_nfkc
    }

    pub fn map_used_with_no_normalization(&self) -> &MappingTable {
        &self.mappings.map_used_with_no_normalization
    }

    pub fn ascii_space(&self) -> &[CodePoint] {
        &self.prohibitions.ascii_space
    }

    pub fn non_ascii_space(&self) -> &[CodePoint] {
        &self.prohibitions.non_ascii_space
    }

    pub fn ascii_control(&self) -> &[CodePointRange] {
        &self.prohibitions.ascii_control
    }

    pub fn non_ascii_control(&self) -> &[CodePointRange] {
        &self.prohibitions.non_ascii_control
    }

    pub fn private_use(&self) -> &[CodePointRange] {
        &self.prohibitions.private_use
    }

    pub fn non_character_code_points(&self) -> &[CodePointRange] {
        &self.prohibitions.non_character_code_points
    }

    pub fn surrogate_codes(&self) -> &[CodePointRange] {
        &self.prohibitions.surrogate_codes
    }

    pub fn inappropriate_plain_text(&self) -> &[CodePointRange] {
        &self.prohibitions.inappropriate_plain_text
    }

    pub fn inappropriate_canonical_representation(&self) -> &[CodePointRange] {
        &self.prohibitions.inappropriate_canonical_representation
    }

    pub fn change_display_properties(&self) -> &[CodePointRange] {
        &self.prohibitions.change_display_properties
    }

    pub fn tagging_characters(&self) -> &[CodePointRange] {
        &self.prohibitions.tagging_characters
    }

    pub fn property_r_or_al(&self) -> &[CodePointRange] {
        &self.bidirectional.property_r_or_al
    }

    pub fn property_l(&self) -> &[CodePointRange] {
        &self.bidirectional.property_l
    }
}

#[cfg(test)]
use crate::constants::{
    LATIN_CAPITAL_LETTER_A, LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_SHARP_S, MAX_CODE_POINT,
    SPACE,
};
#[cfg(test)]
use crate::error::Error;

/// The four resources, for tests that edit one of them.
#[cfg(test)]
#[derive(Copy, Clone, Debug)]
enum Resource {
    UnassignedCodePoints,
    MappingTables,
    ProhibitionTables,
    BidirectionalTables,
}

#[cfg(test)]
impl Resource {
    fn text(self, sources: &Sources) -> &str {
        match self {
            Resource::UnassignedCodePoints => sources.unassigned_code_points.text(),
            Resource::MappingTables => sources.mapping_tables.text(),
            Resource::ProhibitionTables => sources.prohibition_tables.text(),
            Resource::BidirectionalTables => sources.bidirectional_tables.text(),
        }
    }

    fn replace(self, sources: Sources, text: String) -> Sources {
        match self {
            Resource::UnassignedCodePoints => sources.with_unassigned_code_points(text),
            Resource::MappingTables => sources.with_mapping_tables(text),
            Resource::ProhibitionTables => sources.with_prohibition_tables(text),
            Resource::BidirectionalTables => sources.with_bidirectional_tables(text),
        }
    }

    /// Bundled sources with `lines` inserted at the top of table `table_id`.
    fn inject(self, table_id: &str, lines: &str) -> Sources {
        let bundled = Sources::bundled();
        let marker = format!("----- Start Table {} -----\n", table_id);
        let text = self.text(&bundled).to_string();
        assert!(text.contains(&marker), "no table {}", table_id);
        let modified = text.replacen(&marker, &format!("{}{}\n", marker, lines), 1);
        self.replace(bundled, modified)
    }
}

/// For every table, the resource holding it and its identifier.
#[cfg(test)]
fn table_locations() -> Vec<(Resource, &'static str)> {
    let mut locations = vec![];
    for &(_, id) in crate::constants::SUPPORTED_REPERTOIRES.iter() {
        locations.push((Resource::UnassignedCodePoints, id));
    }
    for id in ["B.1", "B.2", "B.3"] {
        locations.push((Resource::MappingTables, id));
    }
    for category in ProhibitionCategory::ALL {
        locations.push((Resource::ProhibitionTables, category.table_id()));
    }
    for id in ["D.1", "D.2"] {
        locations.push((Resource::BidirectionalTables, id));
    }
    locations
}

#[test]
fn check_bundled_tables() {
    let tables = StringprepTables::new().expect("bundled tables");

    assert_eq!(tables.ascii_space(), &[SPACE]);
    assert_eq!(
        tables.map_used_with_nfkc()[&LATIN_SMALL_LETTER_SHARP_S],
        [LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_S]
    );
    assert!(tables.mapping_conflicts().is_empty());
    assert_eq!(tables.unassigned_code_points()[0].version, "3.2");
}

#[test]
fn every_table_satisfies_range_invariants() {
    let tables = StringprepTables::new().expect("bundled tables");

    let check_ranges = |name: TableName, ranges: &[CodePointRange]| {
        assert!(!ranges.is_empty(), "{:?} is empty", name);
        assert!(
            ranges.iter().all(|range| range.low() <= range.high() && range.high() <= MAX_CODE_POINT),
            "{:?}",
            name
        );
        assert!(crate::types::is_strictly_ascending(ranges), "{:?}", name);
    };

    for name in TableName::ALL {
        match tables.table(name) {
            TableRef::Repertoires(repertoires) => repertoires
                .iter()
                .for_each(|repertoire| check_ranges(name, &repertoire.unassigned)),
            TableRef::Ranges(ranges) => check_ranges(name, ranges),
            TableRef::Points(points) => {
                assert!(!points.is_empty(), "{:?} is empty", name);
                assert!(points.iter().all(|&code| code <= MAX_CODE_POINT), "{:?}", name);
            }
            TableRef::Mapping(map) => {
                assert!(!map.is_empty(), "{:?} is empty", name);
                assert!(map.values().flatten().all(|&code| code <= MAX_CODE_POINT), "{:?}", name);
            }
        }
    }
}

#[test]
fn tables_have_expected_shapes() {
    let tables = StringprepTables::new().expect("bundled tables");
    for name in TableName::ALL {
        let shape_matches = match (name, tables.table(name)) {
            (TableName::UnassignedCodePoints, TableRef::Repertoires(_)) => true,
            (TableName::MapToNothing, TableRef::Points(_)) => true,
            (TableName::MapUsedWithNfkc, TableRef::Mapping(_)) => true,
            (TableName::MapUsedWithNoNormalization, TableRef::Mapping(_)) => true,
            (TableName::Prohibited(category), TableRef::Points(_)) => category.is_space(),
            (TableName::Prohibited(category), TableRef::Ranges(_)) => !category.is_space(),
            (TableName::PropertyRorAL, TableRef::Ranges(_)) => true,
            (TableName::PropertyL, TableRef::Ranges(_)) => true,
            _ => false,
        };
        assert!(shape_matches, "{:?}", name);
    }

    let names = TableName::ALL
        .iter()
        .map(|name| name.as_str())
        .collect::<std::collections::HashSet<_>>();
    assert_eq!(names.len(), TableName::ALL.len());
}

#[test]
fn parsing_is_idempotent() {
    let first = StringprepTables::new().expect("bundled tables");
    let second = StringprepTables::new().expect("bundled tables");
    similar_asserts::assert_eq!(first, second);
}

#[test]
fn parallel_parse_matches_sequential() {
    let sources = Sources::bundled();
    let sequential = StringprepTables::from_sources(&sources).expect("bundled tables");
    let parallel = StringprepTables::from_sources_parallel(&sources).expect("bundled tables");
    similar_asserts::assert_eq!(sequential, parallel);
}

#[test]
fn malformed_line_in_any_table_fails_construction() {
    let locations = table_locations();
    assert_eq!(locations.len(), TableName::ALL.len());
    for (resource, table_id) in locations {
        let sources = resource.inject(table_id, "   0xZZZZ");
        for result in [
            StringprepTables::from_sources(&sources),
            StringprepTables::from_sources_parallel(&sources),
        ] {
            assert!(
                matches!(result, Err(Error::MalformedLine { .. })),
                "table {}: {:?}",
                table_id,
                result.map(|_| ())
            );
        }
    }
}

#[test]
fn overlapping_ranges_fail_construction() {
    let sources = Resource::BidirectionalTables.inject("D.2", "   0100-0200\n   0150-0160");
    let result = StringprepTables::from_sources(&sources);
    assert!(
        matches!(result, Err(Error::InvalidRange { ref range, .. }) if range == "0150-0160"),
        "{:?}",
        result.map(|_| ())
    );
}

#[test]
fn missing_table_fails_construction() {
    let sources = Sources::bundled().with_bidirectional_tables(
        "----- Start Table D.1 -----\n05BE\n----- End Table D.1 -----\n",
    );
    let result = StringprepTables::from_sources(&sources);
    assert!(
        matches!(result, Err(Error::ResourceUnavailable { .. })),
        "{:?}",
        result.map(|_| ())
    );
}

#[test]
fn mapping_conflicts_are_reported() {
    let sources = Resource::MappingTables.inject("B.1", "   0041; ; Map to nothing");
    let tables = StringprepTables::from_sources(&sources).expect("conflicts are not errors");
    assert_eq!(
        tables.mapping_conflicts(),
        &[
            MappingConflict {
                code: LATIN_CAPITAL_LETTER_A,
                table: TableName::MapUsedWithNfkc,
            },
            MappingConflict {
                code: LATIN_CAPITAL_LETTER_A,
                table: TableName::MapUsedWithNoNormalization,
            },
        ]
    );
}

#[test]
fn tables_can_be_shared_across_threads() {
    let tables = std::sync::Arc::new(StringprepTables::new().expect("bundled tables"));
    let shared = std::sync::Arc::clone(&tables);
    let count = std::thread::spawn(move || shared.property_l().len())
        .join()
        .expect("thread finished");
    assert_eq!(count, tables.property_l().len());
}
