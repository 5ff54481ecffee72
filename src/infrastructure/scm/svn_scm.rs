use super::scm_interface::{
    ensure_working_copy, note_unrecognized, ExportOptions, RepoError, ScmOperations,
    UpdateOptions,
};
use crate::domain::entities::status_report::{ChangeCategory, StatusEntry, StatusReport};
use crate::domain::value_objects::repository_kind::RepositoryKind;
use crate::infrastructure::process::{run_in_dir, CommandSpec, ProcessRunner, SystemRunner};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// The seven fixed status columns (item, properties, lock, history, switch,
/// lock token, tree conflict) followed by the path.
const SVN_STATUS_PATTERN: &str = r"^(.)([ CM])([ L])([ +])([ SX])([ K])([ C])(.+)$";

fn status_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SVN_STATUS_PATTERN).expect("svn status pattern is valid"))
}

/// SVN (Subversion) implementation of SCM operations
pub struct SvnScm {
    svn_executable: String,
    strict_status: bool,
    runner: Arc<dyn ProcessRunner>,
}

impl Default for SvnScm {
    fn default() -> Self {
        Self {
            svn_executable: "svn".to_string(),
            strict_status: false,
            runner: Arc::new(SystemRunner::new()),
        }
    }
}

impl SvnScm {
    /// Create a new SVN SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new SVN SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            svn_executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    fn svn(&self) -> CommandSpec {
        CommandSpec::new(&self.svn_executable)
    }

    /// True iff `path/.svn` is a directory
    pub fn is_repo(&self, path: &Path) -> bool {
        RepositoryKind::Svn.has_marker(path)
    }

    /// `svn export <path> <target_dir>`
    pub async fn export_tree(&self, path: &Path, target_dir: &Path) -> Result<bool, RepoError> {
        info!(path = %path.display(), target = %target_dir.display(), "exporting svn working copy");

        let command = self
            .svn()
            .arg("export")
            .arg(path.to_string_lossy())
            .arg(target_dir.to_string_lossy());
        let result = self.runner.run(&command).await?;
        if !result.success() {
            warn!(
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "svn export failed"
            );
        }
        Ok(result.success())
    }

    /// Run `svn status <path>` and classify every line
    pub async fn status(&self, path: &Path) -> Result<StatusReport, RepoError> {
        ensure_working_copy(path, RepositoryKind::Svn, "get svn status of")?;

        let command = self.svn().arg("status").arg(path.to_string_lossy());
        let result = self.runner.run(&command).await?;
        if !result.success() {
            return Err(RepoError::command_failed(
                command.to_string(),
                result.exit_code,
                result.stderr,
            ));
        }

        parse_svn_status(
            result.stdout_lines.iter().map(String::as_str),
            self.strict_status,
        )
    }

    /// `svn up` inside `path`
    pub async fn update(&self, path: &Path) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Svn, "update svn repo")?;

        info!(path = %path.display(), "updating svn working copy");
        Ok(run_in_dir(self.runner.as_ref(), path, &[self.svn().arg("up")]).await?)
    }
}

/// Classify `svn status` output.
///
/// Lines that don't fit the column grammar (tree-conflict details, externals
/// banners) are skipped. Unversioned-noise flags ` `, `I` and `X` produce no
/// entry.
pub fn parse_svn_status<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    strict: bool,
) -> Result<StatusReport, RepoError> {
    let mut report = StatusReport::new();

    for line in lines {
        let Some(caps) = status_line_re().captures(line) else {
            debug!(line, "skipping svn status line outside the column grammar");
            continue;
        };

        let flag = &caps[1];
        let file = caps[8].trim();

        let category = match flag {
            " " | "I" | "X" => continue,
            "A" => ChangeCategory::New,
            "C" => ChangeCategory::Conflicted,
            "D" => ChangeCategory::Removed,
            "M" => ChangeCategory::Modified,
            "R" => ChangeCategory::Replaced,
            "?" => ChangeCategory::Untracked,
            "!" => ChangeCategory::Missing,
            "~" => ChangeCategory::Obstructed,
            _ => {
                note_unrecognized(&mut report, RepositoryKind::Svn, flag, line, strict)?;
                continue;
            }
        };

        report.push(category, StatusEntry::path(file));
    }

    Ok(report)
}

#[async_trait]
impl ScmOperations for SvnScm {
    fn is_repository(&self, path: &Path) -> bool {
        self.is_repo(path)
    }

    fn kind(&self) -> RepositoryKind {
        RepositoryKind::Svn
    }

    async fn get_status(&self, repo_path: &Path) -> Result<StatusReport, RepoError> {
        self.status(repo_path).await
    }

    async fn export(
        &self,
        src: &Path,
        dest: &Path,
        _options: &ExportOptions,
    ) -> Result<bool, RepoError> {
        self.export_tree(src, dest).await
    }

    async fn update(&self, repo_path: &Path, _options: &UpdateOptions) -> Result<bool, RepoError> {
        SvnScm::update(self, repo_path).await
    }
}
