use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

/// Flags only understood by the embedded gcc port. A host clang frontend
/// rejects the whole invocation when it encounters any of them.
const DEFAULT_FLAG_DENYLIST: &[&str] = &[
    "-mlongcalls",
    "-fno-tree-switch-conversion",
    "-fstrict-volatile-bitfields",
    "-mdisable-hardware-atomics",
    "-mtext-section-literals",
    "-mfix-esp32-psram-cache-issue",
    "-mbss-section-header",
    "-mno-target-align",
    "-mno-serialize-volatile",
];

/// What to do with an `@file` token that cannot be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingIndirectionPolicy {
    /// Abort the whole run.
    Abort,
    /// Warn and keep the literal token.
    KeepToken,
}

/// Parameters controlling how a single token list is cleaned.
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Flags removed from every invocation.
    pub denylist: BTreeSet<String>,
    pub missing_indirection: MissingIndirectionPolicy,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_FLAG_DENYLIST
                .iter()
                .map(ToString::to_string)
                .collect(),
            missing_indirection: MissingIndirectionPolicy::Abort,
        }
    }
}

/// Cleans one invocation's token list: `@file` tokens are expanded in
/// place, target flags and denylisted flags are dropped, everything else
/// is kept in order.
pub fn sanitize_arguments(arguments: &[String], config: &SanitizerConfig) -> Result<Vec<String>> {
    let mut cleaned = Vec::with_capacity(arguments.len());
    let mut skip_next = false;
    for argument in arguments {
        if skip_next {
            skip_next = false;
            continue;
        }

        // `@file` tokens name files containing further arguments. Their
        // content gets cleaned as well before being spliced in.
        if let Some(file_path) = argument.strip_prefix('@') {
            match expand_argument_file(Path::new(file_path), config) {
                Ok(file_arguments) => cleaned.extend(file_arguments),
                Err(err) => match config.missing_indirection {
                    MissingIndirectionPolicy::Abort => return Err(err),
                    MissingIndirectionPolicy::KeepToken => {
                        log::warn!("{}, keeping '{}' as-is", err, argument);
                        cleaned.push(argument.clone());
                    }
                },
            }
            continue;
        }

        // The target flag carries the foreign triple in its value, either
        // as the following token or behind a `=`.
        if argument == "-target" || argument == "--target" {
            skip_next = true;
            continue;
        }
        if argument.starts_with("--target=") || argument.starts_with("-target=") {
            continue;
        }

        if config.denylist.contains(argument.as_str()) {
            continue;
        }

        cleaned.push(argument.clone());
    }

    Ok(cleaned)
}

/// Reads and shell-tokenizes an argument file, then cleans its tokens as a
/// sub-list. Lookahead never crosses the splice boundary.
fn expand_argument_file(file_path: &Path, config: &SanitizerConfig) -> Result<Vec<String>> {
    if !file_path.exists() {
        return Err(anyhow!("Argument file '{}' not found", file_path.display()));
    }

    let content = fs::read_to_string(file_path).map_err(|err| {
        anyhow!(
            "Failed to read argument file '{}': {}",
            file_path.display(),
            err
        )
    })?;
    let file_arguments = shlex::split(&content)
        .ok_or_else(|| anyhow!("Malformed quoting in argument file '{}'", file_path.display()))?;

    sanitize_arguments(&file_arguments, config)
}
