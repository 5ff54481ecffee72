pub mod status_report;

pub use status_report::{ChangeCategory, StatusEntry, StatusReport, UnrecognizedLine};
