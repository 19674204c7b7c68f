//! Errors produced while extracting tables.  Every error is fatal for the
//! table being parsed, and therefore for the whole
//! [`StringprepTables`](crate::tables::StringprepTables).

use crate::types::CodePoint;

/// A failure to extract a table from its source text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line does not match the hex / range / list syntax of its table.
    #[error("{source_name}:{line}: malformed line: {reason}")]
    MalformedLine {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// A range with `low > high`, or one that is out of order with or
    /// overlaps the previous entry of the same table.
    #[error("{source_name}:{line}: invalid range {range}: {reason}")]
    InvalidRange {
        source_name: String,
        line: usize,
        range: String,
        reason: String,
    },

    /// A mapping table lists the same source code point twice.
    #[error("{source_name}:{line}: duplicate key U+{key:04X} in table {table}")]
    DuplicateKey {
        source_name: String,
        line: usize,
        table: String,
        key: CodePoint,
    },

    /// An input resource, or a table expected within it, cannot be located or
    /// read.
    #[error("resource unavailable: {resource}: {reason}")]
    ResourceUnavailable { resource: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[test]
fn error_messages_carry_location() {
    let err = Error::MalformedLine {
        source_name: "mapping_tables.txt".into(),
        line: 12,
        reason: "invalid hex token `0xZZZZ`".into(),
    };
    assert_eq!(
        err.to_string(),
        "mapping_tables.txt:12: malformed line: invalid hex token `0xZZZZ`"
    );

    let err = Error::DuplicateKey {
        source_name: "mapping_tables.txt".into(),
        line: 40,
        table: "B.1".into(),
        key: 0xAD,
    };
    assert_eq!(
        err.to_string(),
        "mapping_tables.txt:40: duplicate key U+00AD in table B.1"
    );
}
