//! Test helper functions and utilities

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// True if `<program> --version` runs successfully
pub fn client_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run a command in `dir`, panic on failure, return trimmed stdout
pub fn run(dir: &Path, program: &str, args: &[&str]) -> String {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("Failed to spawn {}: {}", program, e));

    assert!(
        output.status.success(),
        "{} {:?} failed in {}: {}",
        program,
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    run(dir, "git", args)
}

/// A git repository in a temporary directory with a local identity
pub struct GitFixture {
    _temp: TempDir,
    pub path: PathBuf,
}

impl GitFixture {
    /// Empty repository, no commits
    pub fn empty() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("repo");
        std::fs::create_dir(&path).expect("Failed to create repo dir");

        git(&path, &["init", "-q"]);
        configure_identity(&path);

        Self { _temp: temp, path }
    }

    /// Repository with `README.md` committed
    pub fn with_initial_commit() -> Self {
        let fixture = Self::empty();
        fixture.write("README.md", "# fixture\n");
        fixture.commit_all("Initial commit");
        fixture
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let file = self.path.join(name);
        std::fs::write(&file, content).expect("Failed to write fixture file");
        file
    }

    pub fn git(&self, args: &[&str]) -> String {
        git(&self.path, args)
    }

    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Sibling directory inside the same temp root, not created
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.path
            .parent()
            .expect("fixture repo has a parent")
            .join(name)
    }
}

/// Identity and signing settings so commits and annotated tags work anywhere
pub fn configure_identity(path: &Path) {
    git(path, &["config", "user.name", "Fixture User"]);
    git(path, &["config", "user.email", "fixture@example.com"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    git(path, &["config", "tag.gpgsign", "false"]);
}

/// An svn repository plus a checked-out working copy
pub struct SvnFixture {
    _temp: TempDir,
    pub repo: PathBuf,
    pub wc: PathBuf,
}

impl SvnFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let repo = temp.path().join("svnrepo");
        let wc = temp.path().join("wc");

        run(temp.path(), "svnadmin", &["create", &repo.to_string_lossy()]);
        let url = format!("file://{}", repo.display());
        run(temp.path(), "svn", &["checkout", "-q", &url, &wc.to_string_lossy()]);

        Self {
            _temp: temp,
            repo,
            wc,
        }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let file = self.wc.join(name);
        std::fs::write(&file, content).expect("Failed to write fixture file");
        file
    }

    pub fn svn(&self, args: &[&str]) -> String {
        run(&self.wc, "svn", args)
    }

    /// Second checkout of the same repository
    pub fn checkout(&self, name: &str) -> PathBuf {
        let dest = self.wc.parent().expect("wc has a parent").join(name);
        let url = format!("file://{}", self.repo.display());
        self.svn(&["checkout", "-q", &url, &dest.to_string_lossy()]);
        dest
    }
}
