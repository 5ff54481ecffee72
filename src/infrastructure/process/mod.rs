pub mod command_runner;

pub use command_runner::{
    run_in_dir,
    CommandResult,
    CommandSpec,
    ProcessError,
    ProcessRunner,
    SystemRunner,
};

#[cfg(test)]
pub use command_runner::MockProcessRunner;
