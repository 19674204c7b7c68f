extern crate stringprep_tables;

use std::env;
use stringprep_tables::codegen::generate_tables_module;
use stringprep_tables::{Error, Sources, StringprepTables};
use tracing::info;

/// Print Rust source declaring every stringprep table.  With an argument, the
/// tables are read from that directory instead of the bundled copies.
fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let sources = match env::args_os().nth(1) {
        Some(dir) => {
            info!(dir = %dir.to_string_lossy(), "reading stringprep tables");
            Sources::from_dir(dir)?
        }
        None => Sources::bundled(),
    };

    let tables = StringprepTables::from_sources_parallel(&sources)?;
    info!(
        conflicts = tables.mapping_conflicts().len(),
        "generating stringprep tables"
    );

    println!("// Generated by generate_stringprep_tables.  Do not edit.");
    println!("{}", generate_tables_module(&tables));
    Ok(())
}
