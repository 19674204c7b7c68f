/// The maximum code point value in the Unicode codespace.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// The text that, followed by a table identifier such as `A.1`, opens a table
/// section: `----- Start Table A.1 -----`.
pub const SECTION_START: &str = "----- Start Table ";

/// The text that closes a table section: `----- End Table A.1 -----`.
pub const SECTION_END: &str = "----- End Table ";

/// The trailing decoration of both section markers.
pub const SECTION_MARKER_TAIL: &str = " -----";

/// Resource names of the bundled appendix tables, as they appear in error
/// messages and in a directory passed to
/// [`Sources::from_dir`](crate::sources::Sources::from_dir).
pub const UNASSIGNED_CODE_POINTS_TXT: &str = "unassigned_code_points.txt";
pub const MAPPING_TABLES_TXT: &str = "mapping_tables.txt";
pub const PROHIBITION_TABLES_TXT: &str = "prohibition_tables.txt";
pub const BIDIRECTIONAL_TABLES_TXT: &str = "bidirectional_tables.txt";

/// Unicode repertoires for which an unassigned code point table exists, as
/// `(version, table id)`.
pub static SUPPORTED_REPERTOIRES: [(&str, &str); 1] = [("3.2", "A.1")];

pub const TABLE_MAP_TO_NOTHING: &str = "B.1";
pub const TABLE_MAP_USED_WITH_NFKC: &str = "B.2";
pub const TABLE_MAP_USED_WITH_NO_NORMALIZATION: &str = "B.3";

pub const TABLE_BIDI_R_OR_AL: &str = "D.1";
pub const TABLE_BIDI_L: &str = "D.2";

// A handful of code points that tests refer to by name.
#[cfg(test)]
pub const SPACE: u32 = '\u{0020}' as u32;
#[cfg(test)]
pub const NO_BREAK_SPACE: u32 = '\u{00A0}' as u32;
#[cfg(test)]
pub const IDEOGRAPHIC_SPACE: u32 = '\u{3000}' as u32;
#[cfg(test)]
pub const SOFT_HYPHEN: u32 = '\u{00AD}' as u32;
#[cfg(test)]
pub const ZERO_WIDTH_NO_BREAK_SPACE: u32 = '\u{FEFF}' as u32;
#[cfg(test)]
pub const LATIN_CAPITAL_LETTER_A: u32 = 'A' as u32;
#[cfg(test)]
pub const LATIN_SMALL_LETTER_A: u32 = 'a' as u32;
#[cfg(test)]
pub const LATIN_SMALL_LETTER_S: u32 = 's' as u32;
#[cfg(test)]
pub const LATIN_SMALL_LETTER_I: u32 = 'i' as u32;
#[cfg(test)]
pub const LATIN_SMALL_LETTER_SHARP_S: u32 = '\u{00DF}' as u32;
#[cfg(test)]
pub const LATIN_CAPITAL_LETTER_SHARP_S: u32 = '\u{1E9E}' as u32;
#[cfg(test)]
pub const LATIN_CAPITAL_LETTER_I_WITH_DOT_ABOVE: u32 = '\u{0130}' as u32;
#[cfg(test)]
pub const COMBINING_DOT_ABOVE: u32 = '\u{0307}' as u32;
#[cfg(test)]
pub const HEBREW_LETTER_ALEF: u32 = '\u{05D0}' as u32;
#[cfg(test)]
pub const ARABIC_LETTER_ALEF: u32 = '\u{0627}' as u32;
