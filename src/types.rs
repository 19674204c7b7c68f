//! Common types used across this crate, with meaning not defined within a
//! specific table.

use crate::constants::MAX_CODE_POINT;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

/// A Unicode code point, always within `0..=MAX_CODE_POINT` once parsed.
pub type CodePoint = u32;

/// An inclusive, contiguous interval of code points.
///
/// The fields are private so that `low <= high` holds for every value that
/// exists.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodePointRange {
    low: CodePoint,
    high: CodePoint,
}

impl CodePointRange {
    /// Create the range `low..=high`, or `None` if `low > high` or either
    /// bound lies outside the Unicode codespace.
    pub fn new(low: CodePoint, high: CodePoint) -> Option<CodePointRange> {
        if low <= high && high <= MAX_CODE_POINT {
            Some(CodePointRange { low, high })
        } else {
            None
        }
    }

    /// A range from bounds the tokenizer has already checked.
    pub(crate) fn from_parsed(low: CodePoint, high: CodePoint) -> CodePointRange {
        debug_assert!(low <= high && high <= MAX_CODE_POINT);
        CodePointRange { low, high }
    }

    /// The range containing only `code`.
    pub fn singleton(code: CodePoint) -> Option<CodePointRange> {
        CodePointRange::new(code, code)
    }

    pub fn low(&self) -> CodePoint {
        self.low
    }

    pub fn high(&self) -> CodePoint {
        self.high
    }

    pub fn is_singleton(&self) -> bool {
        self.low == self.high
    }

    /// The number of code points in the range (never zero).
    pub fn len(&self) -> usize {
        (self.high - self.low) as usize + 1
    }

    pub fn contains(&self, code: CodePoint) -> bool {
        self.low <= code && code <= self.high
    }

    /// Whether `self` and `other` share at least one code point.
    pub fn overlaps(&self, other: &CodePointRange) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<CodePoint> {
        self.low..=self.high
    }
}

impl fmt::Display for CodePointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_singleton() {
            write!(f, "{:04X}", self.low)
        } else {
            write!(f, "{:04X}-{:04X}", self.low, self.high)
        }
    }
}

/// A list of ranges, strictly ascending and non-overlapping: for consecutive
/// `r1`, `r2` we always have `r1.high() < r2.low()`.
pub type RangeTable = Vec<CodePointRange>;

// We use `BTreeMap` for mappings so that keys are conveniently exposed in
// consistent, sorted order when generating code.

/// A mapping from code point to its replacement code point sequence.  The
/// order of each replacement sequence is exactly the order in the source
/// table.
pub type MappingTable = BTreeMap<CodePoint, Vec<CodePoint>>;

/// Check the ordering invariant of [`RangeTable`] over an arbitrary slice.
pub fn is_strictly_ascending(ranges: &[CodePointRange]) -> bool {
    ranges
        .iter()
        .tuple_windows()
        .all(|(prev, next)| prev.high < next.low)
}

/// Render a replacement sequence the way the source tables write it, e.g.
/// `0073 0073`.
pub fn format_code_points(codes: &[CodePoint]) -> String {
    codes.iter().map(|code| format!("{:04X}", code)).join(" ")
}

#[test]
fn range_construction() {
    assert!(CodePointRange::new(0x100, 0x0FF).is_none());
    assert!(CodePointRange::new(0, MAX_CODE_POINT + 1).is_none());

    let range = CodePointRange::new(0x0221, 0x0233).expect("valid range");
    assert_eq!(range.len(), 0x13);
    assert!(range.contains(0x0221));
    assert!(range.contains(0x0233));
    assert!(!range.contains(0x0234));
    assert_eq!(range.to_string(), "0221-0233");

    let single = CodePointRange::singleton(0x20).expect("valid singleton");
    assert!(single.is_singleton());
    assert_eq!(single.to_string(), "0020");
    assert_eq!(single.iter().collect::<Vec<_>>(), vec![0x20]);
}

#[test]
fn ascending_check() {
    let r = |low, high| CodePointRange::new(low, high).expect("valid range");
    assert!(is_strictly_ascending(&[]));
    assert!(is_strictly_ascending(&[r(0, 0x1F), r(0x7F, 0x7F)]));
    assert!(!is_strictly_ascending(&[r(0x100, 0x200), r(0x150, 0x160)]));
    assert!(!is_strictly_ascending(&[r(0x10, 0x10), r(0x10, 0x10)]));
    assert!(r(0x100, 0x200).overlaps(&r(0x150, 0x160)));
    assert!(!r(0x100, 0x200).overlaps(&r(0x201, 0x300)));
}

#[test]
fn replacement_formatting() {
    assert_eq!(format_code_points(&[0x73, 0x73]), "0073 0073");
    assert_eq!(format_code_points(&[]), "");
}
