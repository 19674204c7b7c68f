//! A crate that parses the tables of the stringprep profile appendices
//! (RFC 3454) into convenient structured representations: unassigned code
//! points, mapping tables, prohibited code points and bidirectional
//! properties.
//!
//! [`StringprepTables`] parses everything at once and is the usual entry
//! point.  The per-appendix modules expose each table on its own.

pub mod bidirectional_tables;
pub mod codegen;
pub mod constants;
pub mod error;
pub mod mapping_tables;
pub mod prohibition_tables;
pub mod range_table;
pub mod repertoires;
pub mod sources;
pub mod table_lines;
pub mod tables;
pub mod types;

pub use error::{Error, Result};
pub use sources::{Source, Sources};
pub use tables::StringprepTables;
