use super::scm_interface::{
    ensure_directory, ensure_working_copy, note_unrecognized, ExportOptions, RepoError,
    ScmOperations, UpdateOptions,
};
use crate::domain::entities::status_report::{ChangeCategory, StatusEntry, StatusReport};
use crate::domain::value_objects::repository_kind::RepositoryKind;
use crate::infrastructure::process::{run_in_dir, CommandSpec, ProcessRunner, SystemRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Revision exported or tagged when none is given
pub const DEFAULT_VERSION: &str = "HEAD";
/// Remote fetched by [`GitScm::update`] when none is given
pub const DEFAULT_REMOTE: &str = "origin";
/// Branch merged by [`GitScm::update`] when none is given
pub const DEFAULT_BRANCH: &str = "master";

/// Git implementation of SCM operations
pub struct GitScm {
    git_executable: String,
    tar_executable: String,
    default_remote: String,
    default_branch: String,
    strict_status: bool,
    runner: Arc<dyn ProcessRunner>,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            tar_executable: "tar".to_string(),
            default_remote: DEFAULT_REMOTE.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            strict_status: false,
            runner: Arc::new(SystemRunner::new()),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
            ..Self::default()
        }
    }

    /// Run commands through `runner` instead of spawning real processes
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// `tar` used to unpack exports
    pub fn with_tar_executable(mut self, executable: impl Into<String>) -> Self {
        self.tar_executable = executable.into();
        self
    }

    /// Remote and branch used by updates that don't name them
    pub fn with_update_defaults(
        mut self,
        remote: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        self.default_remote = remote.into();
        self.default_branch = branch.into();
        self
    }

    /// Fail status calls on unknown porcelain flags instead of recording them
    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    fn git(&self) -> CommandSpec {
        CommandSpec::new(&self.git_executable)
    }

    /// True iff `path/.git` is a directory. Runs nothing.
    pub fn is_repo(&self, path: &Path) -> bool {
        RepositoryKind::Git.has_marker(path)
    }

    /// `git init` in `path`, creating the directory first if needed
    pub async fn init_repo(&self, path: &Path) -> Result<bool, RepoError> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        ensure_directory(path, "init git repo in")?;

        info!(path = %path.display(), "initializing git repository");
        Ok(run_in_dir(self.runner.as_ref(), path, &[self.git().arg("init")]).await?)
    }

    /// Clone `remote` into `dest`, optionally initializing submodules.
    ///
    /// A failing clone returns `Ok(false)` and skips the submodule step.
    pub async fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        init_submodules: bool,
    ) -> Result<bool, RepoError> {
        info!(remote, dest = %dest.display(), "cloning git repository");

        let clone = self
            .git()
            .args(["clone", "-v"])
            .arg(remote)
            .arg(dest.to_string_lossy());
        let result = self.runner.run(&clone).await?;
        if !result.success() {
            warn!(
                remote,
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "git clone failed"
            );
            return Ok(false);
        }

        if init_submodules {
            return Ok(run_in_dir(self.runner.as_ref(), dest, &[self.init_submodules_command()]).await?);
        }
        Ok(true)
    }

    /// `git archive --remote=<path> --prefix=<prefix>/ <version> | tar -x -C <target_dir>`
    pub async fn export_archive(
        &self,
        path: &Path,
        target_dir: &Path,
        prefix: &str,
        version: &str,
    ) -> Result<bool, RepoError> {
        ensure_directory(target_dir, "export git repo to")?;

        info!(
            path = %path.display(),
            target = %target_dir.display(),
            prefix,
            version,
            "exporting git repository"
        );

        let archive = self
            .git()
            .arg("archive")
            .arg(format!("--remote={}", path.display()))
            .arg(format!("--prefix={}/", prefix))
            .arg(version);
        let extract = CommandSpec::new(&self.tar_executable)
            .args(["-x", "-C"])
            .arg(target_dir.to_string_lossy());

        let result = self.runner.run_piped(&archive, &extract).await?;
        if !result.success() {
            warn!(
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "git export failed"
            );
        }
        Ok(result.success())
    }

    /// Run `git status --porcelain` in `path` and classify every line
    pub async fn status(&self, path: &Path) -> Result<StatusReport, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "get git status of")?;

        let command = self.git().args(["status", "--porcelain"]).current_dir(path);
        let result = self.runner.run(&command).await?;
        if !result.success() {
            return Err(RepoError::command_failed(
                command.to_string(),
                result.exit_code,
                result.stderr,
            ));
        }

        parse_porcelain(
            result.stdout_lines.iter().map(String::as_str),
            self.strict_status,
        )
    }

    /// Stage everything, then commit. The commit is skipped if staging fails.
    ///
    /// Nothing to commit makes `git commit` exit 1, which returns `Ok(false)`.
    pub async fn commit(&self, path: &Path, message: &str) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "commit to git repo")?;

        info!(path = %path.display(), "committing all changes");
        Ok(run_in_dir(
            self.runner.as_ref(),
            path,
            &[
                self.git().args(["add", "-A", "."]),
                self.git().args(["commit", "-am", message]),
            ],
        )
        .await?)
    }

    /// Create an annotated tag, message defaulting to "Tagging <name>"
    pub async fn tag(
        &self,
        path: &Path,
        name: &str,
        message: Option<&str>,
        version: Option<&str>,
    ) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "tag git repo")?;

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Tagging {}", name));
        let version = version.unwrap_or(DEFAULT_VERSION);

        info!(path = %path.display(), tag = name, version, "creating annotated tag");
        Ok(run_in_dir(
            self.runner.as_ref(),
            path,
            &[self
                .git()
                .args(["tag", "-a", name, "-m"])
                .arg(message)
                .arg(version)],
        )
        .await?)
    }

    /// Point a lightweight tag at `version`, overwriting any existing tag
    pub async fn move_tag(
        &self,
        path: &Path,
        name: &str,
        version: Option<&str>,
    ) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "move tag in git repo")?;

        let version = version.unwrap_or(DEFAULT_VERSION);
        info!(path = %path.display(), tag = name, version, "moving tag");
        Ok(run_in_dir(
            self.runner.as_ref(),
            path,
            &[self.git().args(["tag", "-f", name, version])],
        )
        .await?)
    }

    /// Fetch `remote`, then merge `remote/branch`
    pub async fn update(
        &self,
        path: &Path,
        remote: Option<&str>,
        branch: Option<&str>,
    ) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "update git repo")?;

        let remote = remote.unwrap_or(self.default_remote.as_str());
        let branch = branch.unwrap_or(self.default_branch.as_str());

        info!(path = %path.display(), remote, branch, "updating git repository");
        Ok(run_in_dir(
            self.runner.as_ref(),
            path,
            &[
                self.git().args(["fetch", remote]),
                self.git().arg("merge").arg(format!("{}/{}", remote, branch)),
            ],
        )
        .await?)
    }

    /// `git submodule update --rebase`
    pub async fn update_submodules(&self, path: &Path) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "update submodules of git repo")?;

        Ok(run_in_dir(
            self.runner.as_ref(),
            path,
            &[self.git().args(["submodule", "update", "--rebase"])],
        )
        .await?)
    }

    /// `git submodule update --init --rebase`
    pub async fn init_submodules(&self, path: &Path) -> Result<bool, RepoError> {
        ensure_working_copy(path, RepositoryKind::Git, "init submodules of git repo")?;

        Ok(run_in_dir(self.runner.as_ref(), path, &[self.init_submodules_command()]).await?)
    }

    fn init_submodules_command(&self) -> CommandSpec {
        self.git().args(["submodule", "update", "--init", "--rebase"])
    }
}

/// Classify `git status --porcelain` output.
///
/// Only the two-character flags ` M`, `A `, `D `, `M `, `R ` and `??` map to a
/// category. Any other flag is recorded as unrecognized, or raised when
/// `strict` is set.
pub fn parse_porcelain<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    strict: bool,
) -> Result<StatusReport, RepoError> {
    let mut report = StatusReport::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let flag = line.get(..2).unwrap_or(line);
        let file = line.get(2..).unwrap_or("").trim();

        let category = match flag {
            " M" => ChangeCategory::Changed,
            "A " => ChangeCategory::New,
            "D " => ChangeCategory::Removed,
            "M " => ChangeCategory::Modified,
            "R " => ChangeCategory::Moved,
            "??" => ChangeCategory::Untracked,
            _ => {
                note_unrecognized(&mut report, RepositoryKind::Git, flag, line, strict)?;
                continue;
            }
        };

        let entry = match category {
            ChangeCategory::Moved => {
                let (from, rest) = split_path_field(file);
                match rest.trim_start().strip_prefix("->") {
                    Some(to) => StatusEntry::moved(from, split_path_field(to.trim()).0),
                    None => StatusEntry::path(from),
                }
            }
            _ if file.starts_with('"') => StatusEntry::path(split_path_field(file).0),
            _ => StatusEntry::path(file),
        };
        report.push(category, entry);
    }

    Ok(report)
}

/// Take one path off the front of `field`.
///
/// Git wraps paths holding whitespace, quotes or non-ASCII bytes in double
/// quotes with C escapes (`\t`, `\"`, `\303\251`). Such a path ends at its
/// closing quote; a bare path ends before ` -> ` or at the end of `field`.
fn split_path_field(field: &str) -> (String, &str) {
    let Some(quoted) = field.strip_prefix('"') else {
        return match field.find(" -> ") {
            Some(end) => (field[..end].to_string(), &field[end..]),
            None => (field.to_string(), ""),
        };
    };

    let mut bytes = Vec::with_capacity(quoted.len());
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return (
                    String::from_utf8_lossy(&bytes).into_owned(),
                    &quoted[i + 1..],
                )
            }
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                match escaped {
                    'a' => bytes.push(0x07),
                    'b' => bytes.push(0x08),
                    'f' => bytes.push(0x0c),
                    'n' => bytes.push(b'\n'),
                    'r' => bytes.push(b'\r'),
                    't' => bytes.push(b'\t'),
                    'v' => bytes.push(0x0b),
                    '0'..='7' => {
                        let mut value = escaped as u32 - '0' as u32;
                        for _ in 0..2 {
                            match chars.clone().next() {
                                Some((_, d @ '0'..='7')) => {
                                    value = value * 8 + (d as u32 - '0' as u32);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        bytes.push(value as u8);
                    }
                    other => {
                        let mut buf = [0; 4];
                        bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
                    }
                }
            }
            c => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    // Unterminated quote: keep the field as git printed it
    (field.to_string(), "")
}

#[async_trait]
impl ScmOperations for GitScm {
    fn is_repository(&self, path: &Path) -> bool {
        self.is_repo(path)
    }

    fn kind(&self) -> RepositoryKind {
        RepositoryKind::Git
    }

    async fn get_status(&self, repo_path: &Path) -> Result<StatusReport, RepoError> {
        self.status(repo_path).await
    }

    async fn export(
        &self,
        src: &Path,
        dest: &Path,
        options: &ExportOptions,
    ) -> Result<bool, RepoError> {
        let version = options.version.as_deref().unwrap_or(DEFAULT_VERSION);

        if let Some(prefix) = &options.prefix {
            return self.export_archive(src, dest, prefix, version).await;
        }

        // No prefix: the archive's top-level directory becomes `dest` itself.
        let prefix = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| RepoError::InvalidExportTarget {
                path: dest.to_path_buf(),
            })?;
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.export_archive(src, parent, &prefix, version).await
    }

    async fn update(&self, repo_path: &Path, options: &UpdateOptions) -> Result<bool, RepoError> {
        GitScm::update(
            self,
            repo_path,
            options.remote.as_deref(),
            options.branch.as_deref(),
        )
        .await
    }
}
