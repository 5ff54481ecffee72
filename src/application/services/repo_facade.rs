//! Backend-agnostic entry points
//!
//! Every call probes the path for `.git` / `.svn` afresh and hands the work
//! to the matching backend. Nothing is remembered between calls.

use crate::common::config::ToolConfig;
use crate::domain::entities::status_report::StatusReport;
use crate::domain::value_objects::repository_kind::RepositoryKind;
use crate::infrastructure::process::ProcessRunner;
use crate::infrastructure::scm::scm_interface::{
    ensure_directory, ExportOptions, RepoError, ScmOperations, UpdateOptions,
};
use crate::infrastructure::scm::ScmFactory;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Dispatches to the Git or SVN backend by marker-directory detection
#[derive(Clone, Default)]
pub struct RepoFacade {
    factory: ScmFactory,
}

impl RepoFacade {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            factory: ScmFactory::new(config),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.factory = self.factory.with_runner(runner);
        self
    }

    pub fn factory(&self) -> &ScmFactory {
        &self.factory
    }

    pub fn kind(&self, path: &Path) -> RepositoryKind {
        ScmFactory::detect_kind(path)
    }

    fn backend(&self, path: &Path) -> Option<Arc<dyn ScmOperations>> {
        let backend = self.factory.for_path(path);
        debug!(
            path = %path.display(),
            kind = %backend.as_ref().map(|b| b.kind()).unwrap_or(RepositoryKind::Unversioned),
            "resolved backend"
        );
        backend
    }

    /// True if `path` is a Git or SVN working copy
    pub fn is_repo(&self, path: &Path) -> bool {
        self.kind(path).is_versioned()
    }

    /// True when the working copy has no changes.
    ///
    /// Unversioned paths count as clean; pair with [`RepoFacade::is_repo`] to
    /// tell the two apart.
    pub async fn is_clean(&self, path: &Path) -> Result<bool, RepoError> {
        match self.backend(path) {
            Some(backend) => backend.is_clean(path).await,
            None => Ok(true),
        }
    }

    /// Status report, `None` for unversioned paths.
    ///
    /// A missing path is an error rather than `None`.
    pub async fn status(&self, path: &Path) -> Result<Option<StatusReport>, RepoError> {
        ensure_directory(path, "get status of")?;
        match self.backend(path) {
            Some(backend) => Ok(Some(backend.get_status(path).await?)),
            None => Ok(None),
        }
    }

    /// Export `src` to `dest`. Returns `false` when `src` is not a working copy.
    pub async fn export(
        &self,
        src: &Path,
        dest: &Path,
        options: &ExportOptions,
    ) -> Result<bool, RepoError> {
        match self.backend(src) {
            Some(backend) => backend.export(src, dest, options).await,
            None => Ok(false),
        }
    }

    /// Update with the backend's defaults. Returns `false` for unversioned paths.
    pub async fn update(&self, path: &Path, options: &UpdateOptions) -> Result<bool, RepoError> {
        ensure_directory(path, "update")?;
        match self.backend(path) {
            Some(backend) => backend.update(path, options).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::status_report::ChangeCategory;
    use crate::infrastructure::process::{CommandResult, MockProcessRunner};
    use tempfile::TempDir;

    fn facade_with(runner: MockProcessRunner) -> RepoFacade {
        RepoFacade::default().with_runner(Arc::new(runner))
    }

    #[tokio::test]
    async fn test_unversioned_path() {
        let plain = TempDir::new().unwrap();
        let facade = facade_with(MockProcessRunner::new());

        assert!(!facade.is_repo(plain.path()));
        assert!(facade.is_clean(plain.path()).await.unwrap());
        assert!(facade.status(plain.path()).await.unwrap().is_none());
        assert!(!facade
            .export(plain.path(), Path::new("/tmp/out"), &ExportOptions::new())
            .await
            .unwrap());
        assert!(!facade.update(plain.path(), &UpdateOptions::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");
        let facade = facade_with(MockProcessRunner::new());

        assert!(!facade.is_repo(&missing));
        assert!(facade.is_clean(&missing).await.unwrap());

        let err = facade.status(&missing).await.unwrap_err();
        assert!(matches!(err, RepoError::PathNotFound { .. }));
        assert!(err.to_string().ends_with("Path does not exist."));

        let err = facade
            .update(&missing, &UpdateOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn test_git_dirty() {
        let repo = TempDir::new().unwrap();
        std::fs::create_dir(repo.path().join(".git")).unwrap();

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "git" && cmd.args == ["status", "--porcelain"])
            .times(2)
            .returning(|_| Ok(CommandResult::success_with([" M README"])));

        let facade = facade_with(runner);
        assert!(facade.is_repo(repo.path()));
        assert!(!facade.is_clean(repo.path()).await.unwrap());

        let report = facade.status(repo.path()).await.unwrap().unwrap();
        assert_eq!(report.get(ChangeCategory::Changed).len(), 1);
    }

    #[tokio::test]
    async fn test_svn_clean() {
        let wc = TempDir::new().unwrap();
        std::fs::create_dir(wc.path().join(".svn")).unwrap();

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "svn" && cmd.args[0] == "status")
            .times(1)
            .returning(|_| Ok(CommandResult::success_with(Vec::<String>::new())));

        assert!(facade_with(runner).is_clean(wc.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_git_wins_when_both_markers_exist() {
        let both = TempDir::new().unwrap();
        std::fs::create_dir(both.path().join(".git")).unwrap();
        std::fs::create_dir(both.path().join(".svn")).unwrap();

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "git")
            .times(1)
            .returning(|_| Ok(CommandResult::success_with(Vec::<String>::new())));

        let facade = facade_with(runner);
        assert_eq!(facade.kind(both.path()), RepositoryKind::Git);
        assert!(facade.is_clean(both.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_svn_export_dispatch() {
        let wc = TempDir::new().unwrap();
        std::fs::create_dir(wc.path().join(".svn")).unwrap();

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.program == "svn" && cmd.args[0] == "export")
            .times(1)
            .returning(|_| Ok(CommandResult::success_with(["Export complete."])));

        let exported = facade_with(runner)
            .export(wc.path(), Path::new("/tmp/out"), &ExportOptions::new())
            .await
            .unwrap();
        assert!(exported);
    }
}
