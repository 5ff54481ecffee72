//! Assertion helpers for testing

/// Assert that a file exists
#[macro_export]
macro_rules! assert_file_exists {
    ($path:expr) => {
        assert!($path.exists(), "File should exist: {}", $path.display());
    };
}

/// Assert that a file does not exist
#[macro_export]
macro_rules! assert_file_not_exists {
    ($path:expr) => {
        assert!(
            !$path.exists(),
            "File should not exist: {}",
            $path.display()
        );
    };
}

/// Assert that file content matches expected content
#[macro_export]
macro_rules! assert_file_content {
    ($path:expr, $expected:expr) => {
        let content = std::fs::read_to_string(&$path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", $path.display(), e));
        assert_eq!(
            content.trim(),
            $expected.trim(),
            "File content mismatch in: {}",
            $path.display()
        );
    };
}

/// Skip the current test when `git` is not on PATH
#[macro_export]
macro_rules! require_git {
    () => {
        if !$crate::common::test_helpers::client_available("git") {
            eprintln!("skipping: git not available");
            return;
        }
    };
}

/// Skip the current test when `svn` or `svnadmin` is not on PATH
#[macro_export]
macro_rules! require_svn {
    () => {
        if !$crate::common::test_helpers::client_available("svn")
            || !$crate::common::test_helpers::client_available("svnadmin")
        {
            eprintln!("skipping: svn not available");
            return;
        }
    };
}
