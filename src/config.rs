use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "cutrelease.toml";

/// Environment variable that points at a configuration file.
pub const CONFIG_ENV_VAR: &str = "CUT_RELEASE_CONFIG";

/// Represents the complete configuration for cut-release.
///
/// Contains the files carrying the version string, the remote to push to,
/// the external commands for each release step, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_version_files")]
    pub version_files: Vec<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default = "default_publish_command")]
    pub publish: CommandConfig,

    #[serde(default = "default_secondary_build_command")]
    pub secondary_build: CommandConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Returns the default list of files that carry the version string.
fn default_version_files() -> Vec<String> {
    vec![
        "Mixpanel-swift.podspec".to_string(),
        "Sources/Info.plist".to_string(),
        "Sources/AutomaticProperties.swift".to_string(),
        "./scripts/generate_docs.sh".to_string(),
    ]
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "Version {version}".to_string()
}

fn default_publish_command() -> CommandConfig {
    CommandConfig::new(
        "pod",
        &["trunk", "push", "Mixpanel-swift.podspec", "--allow-warnings"],
    )
}

fn default_secondary_build_command() -> CommandConfig {
    CommandConfig::new("./scripts/carthage.sh", &[])
}

/// An external program and its arguments.
///
/// Programs are spawned directly (no shell); relative program paths resolve
/// against the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    pub fn new(program: &str, args: &[&str]) -> Self {
        CommandConfig {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Render the command as a single shell-like line for display.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Configuration for the documentation step.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DocsConfig {
    #[serde(default = "default_docs_command")]
    pub command: CommandConfig,

    #[serde(default = "default_docs_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_docs_commit_message")]
    pub commit_message: String,
}

fn default_docs_command() -> CommandConfig {
    CommandConfig::new("./scripts/generate_docs.sh", &[])
}

fn default_docs_output_dir() -> String {
    "docs".to_string()
}

fn default_docs_commit_message() -> String {
    "Update docs".to_string()
}

impl Default for DocsConfig {
    fn default() -> Self {
        DocsConfig {
            command: default_docs_command(),
            output_dir: default_docs_output_dir(),
            commit_message: default_docs_commit_message(),
        }
    }
}

/// Configuration for the annotated release tag.
///
/// `{version}` in either field is replaced verbatim by the new version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,

    #[serde(default = "default_tag_message")]
    pub message: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_tag_message() -> String {
    "version {version}".to_string()
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
            message: default_tag_message(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Stop on the first failed git operation or external command instead of
    /// reporting it and moving on.
    #[serde(default)]
    pub strict: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            version_files: default_version_files(),
            remote: default_remote(),
            commit_message: default_commit_message(),
            docs: DocsConfig::default(),
            tag: TagConfig::default(),
            publish: default_publish_command(),
            secondary_build: default_secondary_build_command(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Parse a configuration from TOML text, filling unset fields with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReleaseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.version_files.is_empty() {
            return Err(ReleaseError::config("version_files must list at least one file"));
        }
        if self.remote.trim().is_empty() {
            return Err(ReleaseError::config("remote must not be empty"));
        }
        for (name, command) in [
            ("docs.command", &self.docs.command),
            ("publish", &self.publish),
            ("secondary_build", &self.secondary_build),
        ] {
            if command.program.trim().is_empty() {
                return Err(ReleaseError::config(format!("{}.program must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. Path named by the `CUT_RELEASE_CONFIG` environment variable
/// 3. `cutrelease.toml` in the repository root
/// 4. `.cutrelease.toml` in the user config directory
/// 5. Default configuration if no file found
///
/// # Returns
/// * `Ok(ReleaseConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<ReleaseConfig> {
    match locate_config(config_path, repo_root) {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            let content = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            ReleaseConfig::from_toml_str(&content)
        }
        None => {
            log::debug!("no configuration file found, using defaults");
            Ok(ReleaseConfig::default())
        }
    }
}

fn locate_config(config_path: Option<&Path>, repo_root: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = repo_root.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}
