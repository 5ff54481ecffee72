use crate::common::error::KitError;
use crate::common::result::KitResult;
use crate::infrastructure::scm::git_scm::{DEFAULT_BRANCH, DEFAULT_REMOTE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Tool settings, loaded from an optional YAML file and overridden from the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ToolConfig {
    /// `git` binary to run
    #[validate(length(min = 1))]
    pub git_executable: String,

    /// `svn` binary to run
    #[validate(length(min = 1))]
    pub svn_executable: String,

    /// `tar` binary used to unpack git exports
    #[validate(length(min = 1))]
    pub tar_executable: String,

    /// Fail status calls on unknown flags instead of recording them
    pub strict_status: bool,

    /// Remote fetched by git updates that don't name one
    #[validate(length(min = 1, max = 255))]
    pub default_remote: String,

    /// Remote branch merged by git updates that don't name one
    #[validate(length(min = 1, max = 255))]
    pub default_branch: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            svn_executable: "svn".to_string(),
            tar_executable: "tar".to_string(),
            strict_status: false,
            default_remote: DEFAULT_REMOTE.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl ToolConfig {
    /// Parse and validate a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(content: &str) -> KitResult<Self> {
        let config: ToolConfig = serde_yaml::from_str(content)?;
        config.validated()
    }

    /// Read a YAML config file
    pub fn load(path: &Path) -> KitResult<Self> {
        if !path.exists() {
            return Err(KitError::config_error(
                format!("Configuration file not found: {}", path.display()),
                Some(path.to_path_buf()),
            ));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            KitError::filesystem_error_with_source(
                "Failed to read configuration file",
                Some(path.to_path_buf()),
                e,
            )
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            KitError::ConfigError { message, .. } => {
                KitError::config_error(message, Some(path.to_path_buf()))
            }
            other => other,
        })
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> KitResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validated(self) -> KitResult<Self> {
        self.validate()
            .map_err(|e| KitError::config_error(format!("Invalid configuration: {}", e), None))?;
        Ok(self)
    }

    pub fn with_git_executable(mut self, executable: impl Into<String>) -> Self {
        self.git_executable = executable.into();
        self
    }

    pub fn with_svn_executable(mut self, executable: impl Into<String>) -> Self {
        self.svn_executable = executable.into();
        self
    }

    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }
}
