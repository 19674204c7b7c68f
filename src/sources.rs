//! The text resources that tables are extracted from.
//!
//! By default these are the appendix tables of RFC 3454 bundled into the
//! crate.  Each resource may be replaced, which is how alternative or test
//! inputs are fed to the parsers.

use crate::constants::{
    BIDIRECTIONAL_TABLES_TXT, MAPPING_TABLES_TXT, PROHIBITION_TABLES_TXT,
    UNASSIGNED_CODE_POINTS_TXT,
};
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::path::Path;

static UNASSIGNED_CODE_POINTS: &str = include_str!("data/unassigned_code_points.txt");
static MAPPING_TABLES: &str = include_str!("data/mapping_tables.txt");
static PROHIBITION_TABLES: &str = include_str!("data/prohibition_tables.txt");
static BIDIRECTIONAL_TABLES: &str = include_str!("data/bidirectional_tables.txt");

/// One named text resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    name: Cow<'static, str>,
    text: Cow<'static, str>,
}

impl Source {
    pub fn new(name: impl Into<Cow<'static, str>>, text: impl Into<Cow<'static, str>>) -> Source {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }

    /// The identifier used for this resource in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn read(dir: &Path, name: &'static str) -> Result<Source> {
        let path = dir.join(name);
        let text = std::fs::read_to_string(&path).map_err(|err| Error::ResourceUnavailable {
            resource: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Ok(Source::new(name, text))
    }
}

/// The complete set of resources needed to build every table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sources {
    /// Appendix A: unassigned code points, one table per repertoire.
    pub unassigned_code_points: Source,
    /// Appendix B: tables B.1, B.2 and B.3.
    pub mapping_tables: Source,
    /// Appendix C: tables C.1.1 through C.9.
    pub prohibition_tables: Source,
    /// Appendix D: tables D.1 and D.2.
    pub bidirectional_tables: Source,
}

impl Sources {
    /// The resources compiled into this crate.
    pub fn bundled() -> Sources {
        Sources {
            unassigned_code_points: Source::new(UNASSIGNED_CODE_POINTS_TXT, UNASSIGNED_CODE_POINTS),
            mapping_tables: Source::new(MAPPING_TABLES_TXT, MAPPING_TABLES),
            prohibition_tables: Source::new(PROHIBITION_TABLES_TXT, PROHIBITION_TABLES),
            bidirectional_tables: Source::new(BIDIRECTIONAL_TABLES_TXT, BIDIRECTIONAL_TABLES),
        }
    }

    /// Read all four resources, by their bundled file names, from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Sources> {
        let dir = dir.as_ref();
        Ok(Sources {
            unassigned_code_points: Source::read(dir, UNASSIGNED_CODE_POINTS_TXT)?,
            mapping_tables: Source::read(dir, MAPPING_TABLES_TXT)?,
            prohibition_tables: Source::read(dir, PROHIBITION_TABLES_TXT)?,
            bidirectional_tables: Source::read(dir, BIDIRECTIONAL_TABLES_TXT)?,
        })
    }

    pub fn with_unassigned_code_points(mut self, text: impl Into<Cow<'static, str>>) -> Sources {
        self.unassigned_code_points.text = text.into();
        self
    }

    pub fn with_mapping_tables(mut self, text: impl Into<Cow<'static, str>>) -> Sources {
        self.mapping_tables.text = text.into();
        self
    }

    pub fn with_prohibition_tables(mut self, text: impl Into<Cow<'static, str>>) -> Sources {
        self.prohibition_tables.text = text.into();
        self
    }

    pub fn with_bidirectional_tables(mut self, text: impl Into<Cow<'static, str>>) -> Sources {
        self.bidirectional_tables.text = text.into();
        self
    }
}

impl Default for Sources {
    fn default() -> Sources {
        Sources::bundled()
    }
}

#[test]
fn bundled_sources_match_data_directory() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/src/data");
    let sources = Sources::from_dir(dir).expect("data directory is readable");
    assert_eq!(sources, Sources::bundled());
}

#[test]
fn missing_directory_is_unavailable() {
    let err = Sources::from_dir("/nonexistent/stringprep/data").unwrap_err();
    assert!(
        matches!(err, Error::ResourceUnavailable { ref resource, .. }
            if resource.ends_with(UNASSIGNED_CODE_POINTS_TXT)),
        "unexpected error: {}",
        err
    );
}

#[test]
fn replacing_text_keeps_resource_name() {
    let sources = Sources::bundled().with_mapping_tables("");
    assert_eq!(sources.mapping_tables.name(), MAPPING_TABLES_TXT);
    assert_eq!(sources.mapping_tables.text(), "");
}
