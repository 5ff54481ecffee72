use crate::domain::entities::status_report::StatusReport;
use crate::domain::value_objects::repository_kind::RepositoryKind;
use crate::infrastructure::process::ProcessError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Operations every backend offers to the repo facade
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Check if a directory is a working copy of this backend (marker probe only)
    fn is_repository(&self, path: &Path) -> bool;

    /// Get the kind this implementation handles
    fn kind(&self) -> RepositoryKind;

    /// Classify the working copy's changes
    async fn get_status(&self, repo_path: &Path) -> Result<StatusReport, RepoError>;

    /// Export a clean tree of `src` to `dest`
    async fn export(
        &self,
        src: &Path,
        dest: &Path,
        options: &ExportOptions,
    ) -> Result<bool, RepoError>;

    /// Bring the working copy up to date with its upstream
    async fn update(&self, repo_path: &Path, options: &UpdateOptions) -> Result<bool, RepoError>;

    /// True when the status report is empty
    async fn is_clean(&self, repo_path: &Path) -> Result<bool, RepoError> {
        Ok(self.get_status(repo_path).await?.is_empty())
    }
}

/// Options for exporting a working copy
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Top-level directory inside the export (Git only). When unset, the
    /// basename of the destination is used and the tree is unpacked into its
    /// parent.
    pub prefix: Option<String>,
    /// Revision to export (Git only, defaults to `HEAD`)
    pub version: Option<String>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Options for updating a working copy
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Remote to fetch from (Git only)
    pub remote: Option<String>,
    /// Remote branch to merge (Git only)
    pub branch: Option<String>,
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Unable to {operation} {}. Path does not exist.", .path.display())]
    PathNotFound { operation: String, path: PathBuf },

    #[error("Unable to {operation} {}. Path is not a directory.", .path.display())]
    NotADirectory { operation: String, path: PathBuf },

    #[error("Unable to {operation} {}. Path is not a {kind} repository.", .path.display())]
    NotARepository {
        operation: String,
        kind: RepositoryKind,
        path: PathBuf,
    },

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Unrecognized {kind} status flag '{flag}' in line: {line}")]
    UnrecognizedStatusFlag {
        kind: RepositoryKind,
        flag: String,
        line: String,
    },

    #[error("Cannot export to {}: no directory name to use as prefix", .path.display())]
    InvalidExportTarget { path: PathBuf },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl RepoError {
    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Whether this is one of the checks made before any command runs
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. } | Self::NotADirectory { .. } | Self::NotARepository { .. }
        )
    }
}

/// Check that `path` exists, is a directory and carries `kind`'s marker.
///
/// `operation` reads as the start of the error message, e.g. "get git status of".
pub fn ensure_working_copy(
    path: &Path,
    kind: RepositoryKind,
    operation: &str,
) -> Result<(), RepoError> {
    ensure_directory(path, operation)?;
    if !kind.has_marker(path) {
        return Err(RepoError::NotARepository {
            operation: operation.to_string(),
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Check that `path` exists and is a directory.
pub fn ensure_directory(path: &Path, operation: &str) -> Result<(), RepoError> {
    if !path.exists() {
        return Err(RepoError::PathNotFound {
            operation: operation.to_string(),
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(RepoError::NotADirectory {
            operation: operation.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// File a status line with an unknown flag, or reject it in strict mode.
pub(crate) fn note_unrecognized(
    report: &mut StatusReport,
    kind: RepositoryKind,
    flag: &str,
    line: &str,
    strict: bool,
) -> Result<(), RepoError> {
    if strict {
        return Err(RepoError::UnrecognizedStatusFlag {
            kind,
            flag: flag.to_string(),
            line: line.to_string(),
        });
    }
    warn!(%kind, flag, line, "unrecognized status flag");
    report.push_unrecognized(flag, line);
    Ok(())
}
