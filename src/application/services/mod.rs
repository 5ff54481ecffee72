pub mod repo_facade;

pub use repo_facade::RepoFacade;
