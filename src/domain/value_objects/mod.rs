pub mod repository_kind;

pub use repository_kind::RepositoryKind;
