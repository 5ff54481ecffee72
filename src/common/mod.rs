//! Shared configuration, errors and result alias

pub mod config;
pub mod error;
pub mod result;
