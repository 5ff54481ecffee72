//! Common test utilities and helpers
//!
//! Fixtures build real git and svn working copies in temporary directories.
//! Tests that need a client call `require_git!()` / `require_svn!()` first
//! and are skipped when it is not installed.
#![allow(dead_code)]

#[macro_use]
pub mod assertion_helpers;
pub mod test_helpers;
