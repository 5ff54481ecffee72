use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of working copy found at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    /// Git working copy (`.git` directory present)
    Git,
    /// Subversion working copy (`.svn` directory present)
    Svn,
    /// Neither marker directory present
    Unversioned,
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryKind::Git => write!(f, "git"),
            RepositoryKind::Svn => write!(f, "svn"),
            RepositoryKind::Unversioned => write!(f, "unversioned"),
        }
    }
}

impl RepositoryKind {
    /// Probe `path` for marker directories.
    ///
    /// Nothing is cached: the working copy may be created or removed between
    /// two calls. When both `.git` and `.svn` are present, Git wins.
    pub fn detect(path: &Path) -> Self {
        for kind in [RepositoryKind::Git, RepositoryKind::Svn] {
            if kind.has_marker(path) {
                return kind;
            }
        }
        RepositoryKind::Unversioned
    }

    /// Whether `path` holds this kind's marker directory
    pub fn has_marker(&self, path: &Path) -> bool {
        match self.metadata_dir() {
            Some(dir) => path.join(dir).is_dir(),
            None => false,
        }
    }

    /// Get the metadata directory name for this kind
    pub fn metadata_dir(&self) -> Option<&'static str> {
        match self {
            RepositoryKind::Git => Some(".git"),
            RepositoryKind::Svn => Some(".svn"),
            RepositoryKind::Unversioned => None,
        }
    }

    /// Whether this is a version-controlled kind
    pub fn is_versioned(&self) -> bool {
        !matches!(self, RepositoryKind::Unversioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_plain_directory() {
        let temp = TempDir::new().unwrap();
        assert_eq!(RepositoryKind::detect(temp.path()), RepositoryKind::Unversioned);
    }

    #[test]
    fn test_detect_markers() {
        let git = TempDir::new().unwrap();
        std::fs::create_dir(git.path().join(".git")).unwrap();
        assert_eq!(RepositoryKind::detect(git.path()), RepositoryKind::Git);

        let svn = TempDir::new().unwrap();
        std::fs::create_dir(svn.path().join(".svn")).unwrap();
        assert_eq!(RepositoryKind::detect(svn.path()), RepositoryKind::Svn);
    }

    #[test]
    fn test_detect_prefers_git_when_both_present() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::create_dir(temp.path().join(".svn")).unwrap();
        assert_eq!(RepositoryKind::detect(temp.path()), RepositoryKind::Git);
    }

    #[test]
    fn test_marker_must_be_a_directory() {
        // A `.git` file (worktree link) does not count as a marker directory.
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".git"), "gitdir: elsewhere\n").unwrap();
        assert!(!RepositoryKind::Git.has_marker(temp.path()));
        assert_eq!(RepositoryKind::detect(temp.path()), RepositoryKind::Unversioned);
    }

    #[test]
    fn test_detect_is_not_cached() {
        let temp = TempDir::new().unwrap();
        assert_eq!(RepositoryKind::detect(temp.path()), RepositoryKind::Unversioned);
        std::fs::create_dir(temp.path().join(".svn")).unwrap();
        assert_eq!(RepositoryKind::detect(temp.path()), RepositoryKind::Svn);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&RepositoryKind::Git).unwrap();
        assert_eq!(json, "\"git\"");

        let deserialized: RepositoryKind = serde_json::from_str("\"svn\"").unwrap();
        assert_eq!(deserialized, RepositoryKind::Svn);
    }
}
