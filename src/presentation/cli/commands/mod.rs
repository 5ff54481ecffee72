pub mod status;

pub use status::StatusCommand;
