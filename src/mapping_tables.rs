//! Processes Appendix B to extract the mapping tables: code points that map to
//! nothing (B.1), and case-folding replacements used with NFKC (B.2) and with
//! no normalization (B.3).

use crate::constants::{
    TABLE_MAP_TO_NOTHING, TABLE_MAP_USED_WITH_NFKC, TABLE_MAP_USED_WITH_NO_NORMALIZATION,
};
use crate::error::{Error, Result};
use crate::sources::{Source, Sources};
use crate::table_lines::{HexField, Layout, TableLine, TableLines};
use crate::types::{format_code_points, CodePoint, MappingTable};
use std::collections::btree_map::Entry;
use std::collections::HashSet;
use tracing::debug;

/// One entry of a mapping table: a key and its (possibly empty) replacement.
struct MappingEntry {
    line_number: usize,
    code: CodePoint,
    replacement: Vec<CodePoint>,
}

/// Iterate the entries of one mapping table.  Keys must be single code
/// points; ranges never appear as mapping keys.
fn mapping_entries<'a>(
    source: &'a Source,
    table_id: &'a str,
) -> impl Iterator<Item = Result<MappingEntry>> + 'a {
    TableLines::new(source, table_id, Layout::Mapping).map(move |line| {
        let TableLine {
            line_number,
            code_points,
            mapping,
            ..
        } = line?;

        let code = match code_points {
            HexField::Single(code) => code,
            HexField::Range(range) => {
                return Err(Error::MalformedLine {
                    source_name: source.name().to_string(),
                    line: line_number,
                    reason: format!("mapping key {} of table {} is a range", range, table_id),
                });
            }
        };

        Ok(MappingEntry {
            line_number,
            code,
            replacement: mapping.unwrap_or_default(),
        })
    })
}

fn duplicate_key(source: &Source, table_id: &str, line: usize, key: CodePoint) -> Error {
    Error::DuplicateKey {
        source_name: source.name().to_string(),
        line,
        table: table_id.to_string(),
        key,
    }
}

/// Parse a table whose every entry maps to at least one code point.
fn parse_mapping_table(source: &Source, table_id: &str) -> Result<MappingTable> {
    let mut table = MappingTable::new();

    for entry in mapping_entries(source, table_id) {
        let MappingEntry {
            line_number,
            code,
            replacement,
        } = entry?;

        if replacement.is_empty() {
            return Err(Error::MalformedLine {
                source_name: source.name().to_string(),
                line: line_number,
                reason: format!("U+{:04X} has no replacement in table {}", code, table_id),
            });
        }

        match table.entry(code) {
            Entry::Occupied(_) => return Err(duplicate_key(source, table_id, line_number, code)),
            Entry::Vacant(vacant) => {
                vacant.insert(replacement);
            }
        }
    }

    debug!(
        table = table_id,
        source = source.name(),
        entries = table.len(),
        "parsed mapping table"
    );
    Ok(table)
}

/// Table B.1: code points mapped to nothing, in source order.
pub fn parse_map_to_nothing(sources: &Sources) -> Result<Vec<CodePoint>> {
    let source = &sources.mapping_tables;
    let table_id = TABLE_MAP_TO_NOTHING;

    let mut seen = HashSet::new();
    let mut codes = vec![];
    for entry in mapping_entries(source, table_id) {
        let MappingEntry {
            line_number,
            code,
            replacement,
        } = entry?;

        if !replacement.is_empty() {
            return Err(Error::MalformedLine {
                source_name: source.name().to_string(),
                line: line_number,
                reason: format!(
                    "U+{:04X} maps to `{}` in table {}, which only maps to nothing",
                    code,
                    format_code_points(&replacement),
                    table_id
                ),
            });
        }
        if !seen.insert(code) {
            return Err(duplicate_key(source, table_id, line_number, code));
        }
        codes.push(code);
    }

    debug!(
        table = table_id,
        source = source.name(),
        entries = codes.len(),
        "parsed map-to-nothing table"
    );
    Ok(codes)
}

/// Table B.2: case folding for use with NFKC.
pub fn parse_map_used_with_nfkc(sources: &Sources) -> Result<MappingTable> {
    parse_mapping_table(&sources.mapping_tables, TABLE_MAP_USED_WITH_NFKC)
}

/// Table B.3: case folding for use with no normalization.
pub fn parse_map_used_with_no_normalization(sources: &Sources) -> Result<MappingTable> {
    parse_mapping_table(&sources.mapping_tables, TABLE_MAP_USED_WITH_NO_NORMALIZATION)
}

#[cfg(test)]
use crate::constants::{
    COMBINING_DOT_ABOVE, LATIN_CAPITAL_LETTER_A, LATIN_CAPITAL_LETTER_I_WITH_DOT_ABOVE,
    LATIN_CAPITAL_LETTER_SHARP_S, LATIN_SMALL_LETTER_A, LATIN_SMALL_LETTER_I,
    LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_SHARP_S, SOFT_HYPHEN, ZERO_WIDTH_NO_BREAK_SPACE,
};

#[cfg(test)]
fn with_mapping_tables(text: &'static str) -> Sources {
    Sources::bundled().with_mapping_tables(text)
}

#[test]
fn check_map_to_nothing() {
    let codes = parse_map_to_nothing(&Sources::bundled()).expect("bundled tables");
    assert_eq!(codes.len(), 27);
    assert_eq!(codes[0], SOFT_HYPHEN);
    assert!(codes.contains(&ZERO_WIDTH_NO_BREAK_SPACE));
    assert!((0xFE00..=0xFE0F).all(|selector| codes.contains(&selector)));
    assert_eq!(codes.iter().collect::<HashSet<_>>().len(), codes.len());
}

#[test]
fn check_map_used_with_nfkc() {
    let map = parse_map_used_with_nfkc(&Sources::bundled()).expect("bundled tables");
    assert_eq!(map[&LATIN_CAPITAL_LETTER_A], [LATIN_SMALL_LETTER_A]);
    assert_eq!(
        map[&LATIN_SMALL_LETTER_SHARP_S],
        [LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_S]
    );
    assert_eq!(
        map[&LATIN_CAPITAL_LETTER_I_WITH_DOT_ABOVE],
        [LATIN_SMALL_LETTER_I, COMBINING_DOT_ABOVE]
    );
    // U+037A GREEK YPOGEGRAMMENI: order is significant, not sorted.
    assert_eq!(map[&0x037A], [0x0020, 0x03B9]);
    assert!(!map.contains_key(&LATIN_SMALL_LETTER_A));
}

#[test]
fn check_map_used_with_no_normalization() {
    let map = parse_map_used_with_no_normalization(&Sources::bundled()).expect("bundled tables");
    assert_eq!(map.len(), 837);
    assert_eq!(map[&0x0390], [0x03B9, 0x0308, 0x0301]);
    assert_eq!(
        map[&LATIN_SMALL_LETTER_SHARP_S],
        [LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_S]
    );
    assert!(map.values().all(|replacement| !replacement.is_empty()));
}

#[test]
fn no_normalization_table_omits_additional_folding() {
    let sources = Sources::bundled();
    let nfkc = parse_map_used_with_nfkc(&sources).expect("bundled tables");
    let no_normalization = parse_map_used_with_no_normalization(&sources).expect("bundled tables");

    // Every case map entry is shared; the compatibility foldings are not.
    assert!(no_normalization.len() < nfkc.len());
    for (code, replacement) in &no_normalization {
        assert_eq!(nfkc.get(code), Some(replacement), "U+{:04X}", code);
    }

    // YPOGEGRAMMENI, RUPEE SIGN, DOUBLE-STRUCK C, MATHEMATICAL BOLD A.
    for code in [0x037A, 0x20A8, 0x2102, 0x1D400] {
        assert!(nfkc.contains_key(&code), "U+{:04X}", code);
        assert!(!no_normalization.contains_key(&code), "U+{:04X}", code);
    }
}

#[test]
fn replacement_order_is_preserved() {
    let sources = with_mapping_tables(
        "----- Start Table B.2 -----\n\
         1E9E; 0073 0073; Case map\n\
         2103; 00B0 0063; Additional folding\n\
         ----- End Table B.2 -----\n",
    );
    let map = parse_map_used_with_nfkc(&sources).expect("valid table");
    assert_eq!(
        map[&LATIN_CAPITAL_LETTER_SHARP_S],
        vec![LATIN_SMALL_LETTER_S, LATIN_SMALL_LETTER_S]
    );
    assert_eq!(map[&0x2103], vec![0x00B0, 0x0063]);
}

#[test]
fn duplicate_keys_are_rejected() {
    let sources = with_mapping_tables(
        "----- Start Table B.1 -----\n\
         00AD; ; Map to nothing\n\
         00ad; ; Map to nothing\n\
         ----- End Table B.1 -----\n\
         ----- Start Table B.3 -----\n\
         0041; 0061; Case map\n\
         0042; 0062; Case map\n\
         0041; 0061; Case map\n\
         ----- End Table B.3 -----\n",
    );

    let err = parse_map_to_nothing(&sources).unwrap_err();
    assert!(
        matches!(err, Error::DuplicateKey { key: SOFT_HYPHEN, line: 3, ref table, .. } if table == "B.1"),
        "{}",
        err
    );

    let err = parse_map_used_with_no_normalization(&sources).unwrap_err();
    assert!(
        matches!(err, Error::DuplicateKey { key: LATIN_CAPITAL_LETTER_A, line: 8, .. }),
        "{}",
        err
    );
}

#[test]
fn replacement_arity_is_enforced() {
    let sources = with_mapping_tables(
        "----- Start Table B.1 -----\n\
         00AD; 0020; Map to nothing\n\
         ----- End Table B.1 -----\n\
         ----- Start Table B.2 -----\n\
         0041; ; Case map\n\
         ----- End Table B.2 -----\n",
    );

    let err = parse_map_to_nothing(&sources).unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 2, .. }), "{}", err);

    let err = parse_map_used_with_nfkc(&sources).unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 5, .. }), "{}", err);
}

#[test]
fn range_keys_are_rejected() {
    let sources = with_mapping_tables(
        "----- Start Table B.3 -----\n0041-005A; 0061; Case map\n----- End Table B.3 -----\n",
    );
    let err = parse_map_used_with_no_normalization(&sources).unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 2, .. }), "{}", err);
}

#[test]
fn map_to_nothing_log_names_its_source() {
    use crate::constants::MAPPING_TABLES_TXT;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        parse_map_to_nothing(&Sources::bundled()).expect("bundled tables")
    });

    let output = String::from_utf8(capture.0.lock().expect("capture lock").clone())
        .expect("log output is utf-8");
    let line = output
        .lines()
        .find(|line| line.contains("parsed map-to-nothing table"))
        .expect("map-to-nothing table is logged");
    assert!(line.contains("source="), "{}", line);
    assert!(line.contains(MAPPING_TABLES_TXT), "{}", line);
}
