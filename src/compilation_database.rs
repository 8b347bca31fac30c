use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ToolConfig;
use crate::sanitizer::sanitize_arguments;

/// One record of a compile commands database. `directory`, `file` and
/// `output` are opaque to the cleaning pass; keys we don't know about are
/// kept in `extra` so they survive a round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn parse_compile_database(db_file_path: &Path) -> Result<Vec<CompileEntry>> {
    let mut db_file = File::open(db_file_path).map_err(|err| {
        anyhow!(
            "Failed to open compilation database '{}': {}",
            db_file_path.display(),
            err
        )
    })?;

    let mut db_data = vec![];
    db_file.read_to_end(&mut db_data)?;

    serde_json::from_slice(&db_data).map_err(|err| {
        anyhow!(
            "'{}' is not a valid compilation database: {}",
            db_file_path.display(),
            err
        )
    })
}

/// Runs one entry through the whole pipeline: `command` normalization,
/// argument cleaning, host-identity substitution.
pub fn clean_entry(mut entry: CompileEntry, config: &ToolConfig) -> Result<CompileEntry> {
    // Single-string commands are split into argument vectors first, so the
    // cleaning pass only ever sees one shape.
    if let Some(command) = entry.command.take() {
        let arguments = shlex::split(&command)
            .ok_or_else(|| anyhow!("Malformed quoting in command '{}'", command))?;
        entry.arguments = Some(arguments);
    }

    let arguments = match entry.arguments.take() {
        Some(arguments) => arguments,
        None => {
            log::warn!(
                "Entry for '{}' has neither 'command' nor 'arguments', leaving it untouched",
                entry
                    .file
                    .as_deref()
                    .unwrap_or_else(|| Path::new("<unknown>"))
                    .display()
            );
            return Ok(entry);
        }
    };

    let mut arguments = sanitize_arguments(&arguments, &config.sanitizer)?;
    if let Some(host_identity) = &config.host_identity {
        host_identity.apply(&mut arguments);
    }
    entry.arguments = Some(arguments);

    Ok(entry)
}

pub fn write_compile_database(db_file_path: &Path, entries: &[CompileEntry]) -> Result<()> {
    // Serialize into memory first, so the database on disk is always either
    // the previous one or a complete new one.
    let db_data = serde_json::to_vec_pretty(entries)?;
    fs::write(db_file_path, db_data).map_err(|err| {
        anyhow!(
            "Failed to write compilation database '{}': {}",
            db_file_path.display(),
            err
        )
    })?;

    Ok(())
}
