use super::git_scm::GitScm;
use super::scm_interface::ScmOperations;
use super::svn_scm::SvnScm;
use crate::common::config::ToolConfig;
use crate::domain::value_objects::repository_kind::RepositoryKind;
use crate::infrastructure::process::{ProcessRunner, SystemRunner};
use std::path::Path;
use std::sync::Arc;

/// Builds backends from a [`ToolConfig`] and picks one per path
#[derive(Clone)]
pub struct ScmFactory {
    config: ToolConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl Default for ScmFactory {
    fn default() -> Self {
        Self::new(ToolConfig::default())
    }
}

impl ScmFactory {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            runner: Arc::new(SystemRunner::new()),
        }
    }

    /// Share `runner` with every backend this factory builds
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Detect the kind of working copy at `repo_path`
    pub fn detect_kind(repo_path: &Path) -> RepositoryKind {
        RepositoryKind::detect(repo_path)
    }

    pub fn git(&self) -> GitScm {
        GitScm::with_executable(&self.config.git_executable)
            .with_tar_executable(&self.config.tar_executable)
            .with_update_defaults(&self.config.default_remote, &self.config.default_branch)
            .with_strict_status(self.config.strict_status)
            .with_runner(Arc::clone(&self.runner))
    }

    pub fn svn(&self) -> SvnScm {
        SvnScm::with_executable(&self.config.svn_executable)
            .with_strict_status(self.config.strict_status)
            .with_runner(Arc::clone(&self.runner))
    }

    /// Backend for `kind`, `None` for unversioned paths
    pub fn create_scm(&self, kind: RepositoryKind) -> Option<Arc<dyn ScmOperations>> {
        match kind {
            RepositoryKind::Git => Some(Arc::new(self.git())),
            RepositoryKind::Svn => Some(Arc::new(self.svn())),
            RepositoryKind::Unversioned => None,
        }
    }

    /// Probe `repo_path` and return the matching backend
    pub fn for_path(&self, repo_path: &Path) -> Option<Arc<dyn ScmOperations>> {
        self.create_scm(Self::detect_kind(repo_path))
    }
}
