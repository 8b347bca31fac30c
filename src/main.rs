mod cli;
mod compilation_database;
mod config;
mod host_identity;
mod sanitizer;

use anyhow::{anyhow, Result};
use structopt::StructOpt;

use cli::CcscrubOptions;
use compilation_database::{clean_entry, parse_compile_database, write_compile_database};
use config::ToolConfig;

fn main() -> Result<()> {
    env_logger::init();
    let options = CcscrubOptions::from_args();

    let config = ToolConfig::from_options(&options)?;

    let output_file_path = options
        .output_file_path
        .as_ref()
        .unwrap_or(&options.input_file_path);
    // The destination is validated before any entry is touched; a failed
    // run must not modify anything.
    if let Some(parent) = output_file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(anyhow!("Output directory '{}' not found", parent.display()));
        }
    }

    let entries = parse_compile_database(&options.input_file_path)?;

    let cleaned_entries = entries
        .into_iter()
        .map(|entry| clean_entry(entry, &config))
        .collect::<Result<Vec<_>>>()?;

    write_compile_database(output_file_path, &cleaned_entries)?;

    println!(
        "Cleaned {} entries into '{}'",
        cleaned_entries.len(),
        output_file_path.display()
    );

    Ok(())
}
