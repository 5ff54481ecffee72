//! # vcskit - one interface over git and svn working copies
//!
//! `vcskit` drives the `git` and `svn` command-line clients to inspect and
//! change working copies. Callers either pick a backend explicitly or let
//! [`RepoFacade`] detect it from the `.git` / `.svn` marker directory.
//!
//! ## Architecture
//!
//! - [`domain`]: status reports and repository kinds
//! - [`application`]: the backend-agnostic [`RepoFacade`]
//! - [`infrastructure`]: process execution plus the Git and SVN backends
//! - [`presentation`]: the `vcskit` command line
//! - [`common`]: configuration and error handling
//!
//! ## Status categories
//!
//! Every status call yields a [`StatusReport`] mapping
//! [`ChangeCategory`] to the affected paths. Categories with no entries are
//! absent, so a clean working copy produces an empty report.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcskit::RepoFacade;
//!
//! # async fn example() -> Result<(), vcskit::RepoError> {
//! let facade = RepoFacade::default();
//! let path = Path::new("checkout");
//!
//! if facade.is_repo(path) && !facade.is_clean(path).await? {
//!     if let Some(report) = facade.status(path).await? {
//!         for (category, entries) in report.iter() {
//!             println!("{}: {}", category, entries.len());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving git directly
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vcskit::GitScm;
//!
//! # async fn example() -> Result<(), vcskit::RepoError> {
//! let git = GitScm::new();
//! let repo = Path::new("checkout");
//!
//! if git.commit(repo, "Release 1.0").await? {
//!     git.tag(repo, "v1.0", None, None).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::application::services::RepoFacade;
pub use crate::common::config::ToolConfig;
pub use crate::common::error::KitError;
pub use crate::common::result::KitResult as Result;
pub use crate::domain::entities::{ChangeCategory, StatusEntry, StatusReport};
pub use crate::domain::value_objects::RepositoryKind;
pub use crate::infrastructure::scm::{
    ExportOptions, GitScm, RepoError, ScmOperations, SvnScm, UpdateOptions,
};
