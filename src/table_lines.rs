//! Split the lines of one table section into structured records.
//!
//! The appendix tables all share one line-oriented format:
//!
//! ```text
//! ----- Start Table B.2 -----
//! 0041; 0061; Case map
//! 00DF; 0073 0073; Case map
//! ----- End Table B.2 -----
//! ```
//!
//! Every data line starts with a hexadecimal code point or a `low-high` range.
//! Mapping tables follow it with a `;`-separated, whitespace-delimited list of
//! replacement code points; an optional free-text annotation comes last.
//! Blank lines, `#` comments and the page headers and footers of the RFC text
//! carry no data.

use crate::constants::{MAX_CODE_POINT, SECTION_END, SECTION_MARKER_TAIL, SECTION_START};
use crate::error::{Error, Result};
use crate::sources::Source;
use crate::types::{CodePoint, CodePointRange};

/// The field layout of the data lines of a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `<code point or range> [; <annotation>]`
    Ranges,
    /// `<code point>; <code points>; [<annotation>]`
    Mapping,
}

/// The leading field of a data line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HexField {
    Single(CodePoint),
    Range(CodePointRange),
}

impl HexField {
    /// The field as a range; a single code point becomes `low == high`.
    pub fn to_range(self) -> CodePointRange {
        match self {
            HexField::Single(code) => CodePointRange::from_parsed(code, code),
            HexField::Range(range) => range,
        }
    }
}

/// One data line of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLine<'a> {
    /// 1-based line number within the source text.
    pub line_number: usize,
    pub code_points: HexField,
    /// The replacement list; always `Some` (possibly empty) for
    /// [`Layout::Mapping`] and always `None` for [`Layout::Ranges`].
    pub mapping: Option<Vec<CodePoint>>,
    pub annotation: Option<&'a str>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Looking for the start marker of the requested table.
    Searching,
    /// Within the requested table, which started on the given line.
    Inside(usize),
    Finished,
}

enum Marker<'a> {
    Start(&'a str),
    End(&'a str),
}

fn section_marker(line: &str) -> Option<Marker<'_>> {
    if let Some(rest) = line.strip_prefix(SECTION_START) {
        return rest.strip_suffix(SECTION_MARKER_TAIL).map(|id| Marker::Start(id.trim()));
    }
    if let Some(rest) = line.strip_prefix(SECTION_END) {
        return rest.strip_suffix(SECTION_MARKER_TAIL).map(|id| Marker::End(id.trim()));
    }
    None
}

/// Lines that carry no data: blanks, comments, and RFC page headers and
/// footers (form feeds trim away to blanks).
fn is_ignorable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("RFC ") || line.contains("[Page ")
}

/// Parse one hexadecimal code point, accepting either case and an optional
/// `0x` or `U+` prefix.
pub fn parse_code_point(token: &str) -> std::result::Result<CodePoint, String> {
    let digits = ["0x", "0X", "U+", "u+"]
        .iter()
        .find_map(|prefix| token.strip_prefix(*prefix))
        .unwrap_or(token);
    if digits.is_empty() || digits.len() > 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex token `{}`", token));
    }
    let code =
        u32::from_str_radix(digits, 16).map_err(|err| format!("invalid hex token `{}`: {}", token, err))?;
    if code > MAX_CODE_POINT {
        return Err(format!("U+{:X} lies outside the Unicode codespace", code));
    }
    Ok(code)
}

/// A lazy, single-pass sequence of the data lines of one table within one
/// source.  Iterate a fresh `TableLines` to read the table again.
///
/// The sequence ends after the first error.
pub struct TableLines<'a> {
    source: &'a Source,
    table_id: &'a str,
    layout: Layout,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    state: State,
}

impl<'a> TableLines<'a> {
    pub fn new(source: &'a Source, table_id: &'a str, layout: Layout) -> TableLines<'a> {
        TableLines {
            source,
            table_id,
            layout,
            lines: source.text().lines().enumerate(),
            state: State::Searching,
        }
    }

    pub fn source(&self) -> &'a Source {
        self.source
    }

    pub fn table_id(&self) -> &'a str {
        self.table_id
    }

    fn malformed(&self, line: usize, reason: String) -> Error {
        Error::MalformedLine {
            source_name: self.source.name().to_string(),
            line,
            reason,
        }
    }

    fn end_of_input(&self) -> Option<Error> {
        match self.state {
            State::Searching => Some(Error::ResourceUnavailable {
                resource: self.source.name().to_string(),
                reason: format!("table {} not found", self.table_id),
            }),
            State::Inside(start) => Some(self.malformed(
                start,
                format!("table {} is never terminated", self.table_id),
            )),
            State::Finished => None,
        }
    }

    fn tokenize(&self, line: &'a str, line_number: usize) -> Result<TableLine<'a>> {
        let (hex, mapping, annotation) = match self.layout {
            Layout::Ranges => {
                let mut fields = line.splitn(2, ';');
                let hex = fields.next().unwrap_or_default();
                (hex, None, fields.next())
            }
            Layout::Mapping => {
                let mut fields = line.splitn(3, ';');
                let hex = fields.next().unwrap_or_default();
                let mapping = fields.next().ok_or_else(|| {
                    self.malformed(line_number, format!("missing mapping field in `{}`", line))
                })?;
                (hex, Some(mapping), fields.next())
            }
        };

        let code_points = self.parse_hex_field(hex.trim(), line_number)?;

        let mapping = match mapping {
            Some(list) => Some(
                list.split_whitespace()
                    .map(|token| {
                        parse_code_point(token).map_err(|reason| self.malformed(line_number, reason))
                    })
                    .collect::<Result<Vec<CodePoint>>>()?,
            ),
            None => None,
        };

        let annotation = annotation.map(str::trim).filter(|text| !text.is_empty());

        Ok(TableLine {
            line_number,
            code_points,
            mapping,
            annotation,
        })
    }

    fn parse_hex_field(&self, field: &str, line_number: usize) -> Result<HexField> {
        let parse = |token: &str| {
            parse_code_point(token.trim()).map_err(|reason| self.malformed(line_number, reason))
        };

        match field.split_once('-') {
            None => Ok(HexField::Single(parse(field)?)),
            Some((low, high)) => {
                let (low, high) = (parse(low)?, parse(high)?);
                CodePointRange::new(low, high)
                    .map(HexField::Range)
                    .ok_or_else(|| Error::InvalidRange {
                        source_name: self.source.name().to_string(),
                        line: line_number,
                        range: format!("{:04X}-{:04X}", low, high),
                        reason: "low bound exceeds high bound".to_string(),
                    })
            }
        }
    }
}

impl<'a> Iterator for TableLines<'a> {
    type Item = Result<TableLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Finished {
                return None;
            }

            let (index, raw) = match self.lines.next() {
                Some(line) => line,
                None => {
                    let err = self.end_of_input();
                    self.state = State::Finished;
                    return err.map(Err);
                }
            };
            let line_number = index + 1;
            let line = raw.trim();

            match (self.state, section_marker(line)) {
                (State::Searching, Some(Marker::Start(id))) if id == self.table_id => {
                    self.state = State::Inside(line_number);
                }
                (State::Searching, _) => {}
                (State::Inside(_), Some(Marker::End(id))) if id == self.table_id => {
                    self.state = State::Finished;
                }
                (State::Inside(_), Some(_)) => {
                    let err = self.malformed(
                        line_number,
                        format!("unexpected section marker `{}` in table {}", line, self.table_id),
                    );
                    self.state = State::Finished;
                    return Some(Err(err));
                }
                (State::Inside(_), None) => {
                    if is_ignorable(line) {
                        continue;
                    }
                    let result = self.tokenize(line, line_number);
                    if result.is_err() {
                        self.state = State::Finished;
                    }
                    return Some(result);
                }
                (State::Finished, _) => unreachable!("checked at the top of the loop"),
            }
        }
    }
}

#[cfg(test)]
fn fixture(text: &'static str) -> Source {
    Source::new("fixture.txt", text)
}

#[cfg(test)]
fn collect<'a>(source: &'a Source, table_id: &'a str, layout: Layout) -> Result<Vec<TableLine<'a>>> {
    TableLines::new(source, table_id, layout).collect()
}

#[test]
fn skips_everything_outside_data_lines() {
    let source = fixture(
        "# header comment\n\
         A.1 Unassigned code points in Unicode 3.2\n\
         \n\
         \x20\x20\x20----- Start Table A.1 -----\n\
         \x20\x20\x200221\n\
         \n\
         Hoffman & Blanchet          Standards Track                   [Page 1]\n\
         \x0c\n\
         RFC 3454        Preparation of Internationalized Strings   December 2002\n\
         # a comment inside the table\n\
         \x20\x20\x200234-024F\n\
         \x20\x20\x20----- End Table A.1 -----\n\
         \x20\x20\x200300\n",
    );
    let lines = collect(&source, "A.1", Layout::Ranges).expect("valid table");
    let expected = vec![
        TableLine {
            line_number: 5,
            code_points: HexField::Single(0x0221),
            mapping: None,
            annotation: None,
        },
        TableLine {
            line_number: 11,
            code_points: HexField::Range(CodePointRange::new(0x0234, 0x024F).unwrap()),
            mapping: None,
            annotation: None,
        },
    ];
    similar_asserts::assert_eq!(lines, expected);
}

#[test]
fn selects_only_the_requested_table() {
    let source = fixture(
        "----- Start Table C.1.1 -----\n\
         0020; SPACE\n\
         ----- End Table C.1.1 -----\n\
         ----- Start Table C.1.2 -----\n\
         00A0; NO-BREAK SPACE\n\
         ----- End Table C.1.2 -----\n",
    );
    let lines = TableLines::new(&source, "C.1.2", Layout::Ranges)
        .collect::<Result<Vec<_>>>()
        .expect("valid table");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].code_points, HexField::Single(0x00A0));
    assert_eq!(lines[0].annotation, Some("NO-BREAK SPACE"));
}

#[test]
fn tolerates_case_prefixes_and_whitespace() {
    let source = fixture(
        "----- Start Table X -----\n\
         \t0x00ad\n\
         e000 -  f8ff ; [PRIVATE USE]\n\
         U+1D173-U+1d17a\n\
         ----- End Table X -----\n",
    );
    let fields = TableLines::new(&source, "X", Layout::Ranges)
        .map(|line| line.map(|line| line.code_points))
        .collect::<Result<Vec<_>>>()
        .expect("valid table");
    assert_eq!(
        fields,
        vec![
            HexField::Single(0xAD),
            HexField::Range(CodePointRange::new(0xE000, 0xF8FF).unwrap()),
            HexField::Range(CodePointRange::new(0x1D173, 0x1D17A).unwrap()),
        ]
    );
}

#[test]
fn mapping_layout_fields() {
    let source = fixture(
        "----- Start Table B.2 -----\n\
         00AD; ; Map to nothing\n\
         00DF;   0073   0073 ; Case map\n\
         0041; 0061\n\
         ----- End Table B.2 -----\n",
    );
    let lines = TableLines::new(&source, "B.2", Layout::Mapping)
        .collect::<Result<Vec<_>>>()
        .expect("valid table");
    assert_eq!(lines[0].mapping, Some(vec![]));
    assert_eq!(lines[0].annotation, Some("Map to nothing"));
    assert_eq!(lines[1].mapping, Some(vec![0x73, 0x73]));
    assert_eq!(lines[1].annotation, Some("Case map"));
    assert_eq!(lines[2].mapping, Some(vec![0x61]));
    assert_eq!(lines[2].annotation, None);
}

#[test]
fn mapping_layout_requires_mapping_field() {
    let source = fixture("----- Start Table B.3 -----\n0041\n----- End Table B.3 -----\n");
    let err = collect(&source, "B.3", Layout::Mapping).unwrap_err();
    assert!(
        matches!(err, Error::MalformedLine { line: 2, .. }),
        "unexpected error: {}",
        err
    );
}

#[test]
fn rejects_non_hex_tokens() {
    for (layout, line) in [
        (Layout::Ranges, "0xZZZZ"),
        (Layout::Ranges, "0100-02G0"),
        (Layout::Ranges, "+041"),
        (Layout::Ranges, "0020 0021"),
        (Layout::Ranges, "110000"),
        (Layout::Mapping, "00DF; 0073 zz73; Case map"),
    ] {
        let text = format!("----- Start Table T -----\n{}\n----- End Table T -----\n", line);
        let source = Source::new("fixture.txt", text);
        let err = collect(&source, "T", layout).unwrap_err();
        assert!(
            matches!(err, Error::MalformedLine { line: 2, ref source_name, .. } if source_name == "fixture.txt"),
            "`{}` gave unexpected error: {}",
            line,
            err
        );
    }
}

#[test]
fn rejects_reversed_range() {
    let source = fixture("----- Start Table T -----\n0200-0100\n----- End Table T -----\n");
    let err = collect(&source, "T", Layout::Ranges).unwrap_err();
    assert!(
        matches!(err, Error::InvalidRange { line: 2, ref range, .. } if range == "0200-0100"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn section_structure_errors() {
    let missing = fixture("----- Start Table A.1 -----\n0221\n----- End Table A.1 -----\n");
    let err = collect(&missing, "A.2", Layout::Ranges).unwrap_err();
    assert!(matches!(err, Error::ResourceUnavailable { .. }), "{}", err);

    let unterminated = fixture("\n----- Start Table A.1 -----\n0221\n");
    let err = collect(&unterminated, "A.1", Layout::Ranges).unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 2, .. }), "{}", err);

    let nested = fixture("----- Start Table A.1 -----\n----- Start Table A.2 -----\n");
    let err = collect(&nested, "A.1", Layout::Ranges).unwrap_err();
    assert!(matches!(err, Error::MalformedLine { line: 2, .. }), "{}", err);
}

#[test]
fn stops_after_first_error() {
    let source = fixture("----- Start Table T -----\nZZZZ\n0041\n----- End Table T -----\n");
    let mut lines = TableLines::new(&source, "T", Layout::Ranges);
    assert!(matches!(lines.next(), Some(Err(_))));
    assert!(lines.next().is_none());
}

#[test]
fn fresh_sequence_reads_table_again() {
    let source = fixture("----- Start Table T -----\n0041\n0061-007A\n----- End Table T -----\n");
    let first = collect(&source, "T", Layout::Ranges).expect("valid table");
    let second = collect(&source, "T", Layout::Ranges).expect("valid table");
    assert_eq!(first, second);
}

#[cfg(test)]
proptest::proptest! {
    #[test]
    fn parses_any_code_point_spelling(code in 0u32..=MAX_CODE_POINT, lower in proptest::bool::ANY, prefix in 0usize..3) {
        let digits = if lower { format!("{:04x}", code) } else { format!("{:04X}", code) };
        let token = format!("{}{}", ["", "0x", "U+"][prefix], digits);
        proptest::prop_assert_eq!(parse_code_point(&token), Ok(code));
    }

    #[test]
    fn rejects_code_points_beyond_codespace(code in (MAX_CODE_POINT + 1)..=0xFF_FFFF) {
        let token = format!("{:X}", code);
        proptest::prop_assert!(parse_code_point(&token).is_err());
    }

    #[test]
    fn rejects_tokens_with_non_hex_characters(prefix in "[0-9A-F]{0,3}", bad in "[G-WYZg-wyz_!.]", suffix in "[0-9A-F]{0,2}") {
        let token = format!("{}{}{}", prefix, bad, suffix);
        proptest::prop_assert!(parse_code_point(&token).is_err());
    }
}
