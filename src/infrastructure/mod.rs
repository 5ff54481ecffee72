/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - SCM operations (Git, SVN)
/// - Process execution (command runner, sequencing)
pub mod process;
pub mod scm;

// Re-export commonly used types
pub use process::{CommandResult, CommandSpec, ProcessError, ProcessRunner, SystemRunner};
pub use scm::{
    ExportOptions, GitScm, RepoError, ScmFactory, ScmOperations, SvnScm, UpdateOptions,
};
