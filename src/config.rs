use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::cli::CcscrubOptions;
use crate::host_identity::{HostIdentity, TargetFlagPolicy};
use crate::sanitizer::{MissingIndirectionPolicy, SanitizerConfig};

/// Runtime configuration assembled from CLI options and the optional
/// overrides file.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub sanitizer: SanitizerConfig,
    /// `None` disables host-identity substitution entirely.
    pub host_identity: Option<HostIdentity>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            host_identity: Some(HostIdentity::default()),
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFileYaml {
    /// Extra flags merged into the built-in denylist.
    denylist: Option<Vec<String>>,
    host_compiler: Option<String>,
    host_target: Option<String>,
}

impl ToolConfig {
    pub fn from_options(options: &CcscrubOptions) -> Result<Self> {
        let overrides = options
            .config_file_path
            .as_deref()
            .map(parse_config_file)
            .transpose()?
            .unwrap_or_default();

        let mut config = Self::default();
        config
            .sanitizer
            .denylist
            .extend(overrides.denylist.unwrap_or_default());
        if options.keep_missing_arg_files {
            config.sanitizer.missing_indirection = MissingIndirectionPolicy::KeepToken;
        }

        config.host_identity = if options.no_host_identity {
            None
        } else {
            let mut host_identity = HostIdentity::default();
            if let Some(compiler) = overrides.host_compiler {
                host_identity.compiler = compiler;
            }
            if let Some(target_triple) = overrides.host_target {
                host_identity.target_triple = target_triple;
            }
            if options.always_append_target {
                host_identity.target_policy = TargetFlagPolicy::AlwaysAppend;
            }
            Some(host_identity)
        };

        Ok(config)
    }
}

fn parse_config_file(config_file_path: &Path) -> Result<ConfigFileYaml> {
    // Read file
    let mut config_data = vec![];
    let mut config_file = File::open(config_file_path)?;
    config_file.read_to_end(&mut config_data)?;

    // Parse YAML content
    Ok(serde_yaml::from_slice(&config_data)?)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn options_for(input: &str) -> CcscrubOptions {
        CcscrubOptions {
            input_file_path: PathBuf::from(input),
            output_file_path: None,
            keep_missing_arg_files: false,
            no_host_identity: false,
            always_append_target: false,
            config_file_path: None,
        }
    }

    #[test]
    fn from_options_uses_builtin_defaults() {
        let config =
            ToolConfig::from_options(&options_for("db.json")).expect("Failed to build config");

        assert!(config.sanitizer.denylist.contains("-mlongcalls"));
        assert_eq!(
            config.sanitizer.missing_indirection,
            MissingIndirectionPolicy::Abort
        );
        let host_identity = config.host_identity.expect("Host identity should be on");
        assert_eq!(host_identity.compiler, "c++");
        assert_eq!(host_identity.target_triple, "x86_64-pc-linux-gnu");
        assert_eq!(
            host_identity.target_policy,
            TargetFlagPolicy::AppendIfMissing
        );
    }

    #[test]
    fn from_options_honors_policy_flags() {
        let mut options = options_for("db.json");
        options.keep_missing_arg_files = true;
        options.always_append_target = true;

        let config = ToolConfig::from_options(&options).expect("Failed to build config");
        assert_eq!(
            config.sanitizer.missing_indirection,
            MissingIndirectionPolicy::KeepToken
        );
        assert_eq!(
            config
                .host_identity
                .expect("Host identity should be on")
                .target_policy,
            TargetFlagPolicy::AlwaysAppend
        );
    }

    #[test]
    fn from_options_can_disable_host_identity() {
        let mut options = options_for("db.json");
        options.no_host_identity = true;

        let config = ToolConfig::from_options(&options).expect("Failed to build config");
        assert!(config.host_identity.is_none());
    }

    #[test]
    fn from_options_merges_config_file_overrides() {
        let tmp_directory = tempfile::tempdir().expect("Failed to create temporary directory");
        let config_path = tmp_directory.path().join("ccscrub.yaml");
        fs::write(
            &config_path,
            "denylist:\n  - -mcustom-flag\nhost_compiler: clang++\nhost_target: aarch64-unknown-linux-gnu\n",
        )
        .expect("Failed to write config file");

        let mut options = options_for("db.json");
        options.config_file_path = Some(config_path);

        let config = ToolConfig::from_options(&options).expect("Failed to build config");
        // The built-in denylist is extended, not replaced
        assert!(config.sanitizer.denylist.contains("-mcustom-flag"));
        assert!(config.sanitizer.denylist.contains("-mlongcalls"));
        let host_identity = config.host_identity.expect("Host identity should be on");
        assert_eq!(host_identity.compiler, "clang++");
        assert_eq!(host_identity.target_triple, "aarch64-unknown-linux-gnu");
    }

    #[test]
    fn from_options_fails_on_missing_config_file() {
        let mut options = options_for("db.json");
        options.config_file_path = Some(PathBuf::from("/nonexistent/ccscrub.yaml"));

        assert!(ToolConfig::from_options(&options).is_err());
    }
}
