/// SCM (Source Control Management) operations infrastructure
///
/// This module provides a unified interface over the `git` and `svn`
/// command-line clients.
pub mod scm_interface;
pub mod git_scm;
pub mod svn_scm;
pub mod scm_factory;

pub use git_scm::GitScm;
pub use scm_factory::ScmFactory;
pub use scm_interface::{ExportOptions, RepoError, ScmOperations, UpdateOptions};
pub use svn_scm::SvnScm;
