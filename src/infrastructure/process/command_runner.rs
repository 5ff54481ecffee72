use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

/// Process runner errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProcessError {
    fn spawn_failed(command: &CommandSpec, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            command: command.to_string(),
            source,
        }
    }
}

/// A program plus its argument vector
///
/// Arguments are handed to the OS as-is; nothing is ever interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir`. The caller's own working directory is untouched.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, -1 when the process was killed by a signal
    pub exit_code: i32,
    pub stdout_lines: Vec<String>,
    pub stderr: String,
}

impl CommandResult {
    pub fn new(exit_code: i32, stdout_lines: Vec<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout_lines,
            stderr: stderr.into(),
        }
    }

    /// Zero exit with the given stdout
    pub fn success_with<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(0, lines.into_iter().map(Into::into).collect(), "")
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::new(exit_code, Vec::new(), stderr)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn from_output(output: std::process::Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout);
        Self {
            exit_code: output.status.code().unwrap_or(-1),
            stdout_lines: stdout.lines().map(str::to_string).collect(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Executes external commands and waits for them to exit
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run one command to completion, capturing its output
    async fn run(&self, command: &CommandSpec) -> Result<CommandResult, ProcessError>;

    /// Run `producer | consumer` without a shell
    ///
    /// The result carries the producer's exit code and stderr when the
    /// producer failed, the consumer's otherwise.
    async fn run_piped(
        &self,
        producer: &CommandSpec,
        consumer: &CommandSpec,
    ) -> Result<CommandResult, ProcessError>;
}

/// [`ProcessRunner`] backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandResult, ProcessError> {
        debug!(command = %command, cwd = ?command.working_dir, "running command");

        let output = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessError::spawn_failed(command, e))?;

        let result = CommandResult::from_output(output);
        debug!(command = %command, exit_code = result.exit_code, "command finished");
        Ok(result)
    }

    async fn run_piped(
        &self,
        producer: &CommandSpec,
        consumer: &CommandSpec,
    ) -> Result<CommandResult, ProcessError> {
        debug!(producer = %producer, consumer = %consumer, "running pipeline");

        let mut producer_child = producer
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessError::spawn_failed(producer, e))?;

        let pipe: Stdio = match producer_child.stdout.take() {
            Some(stdout) => stdout.try_into()?,
            None => Stdio::null(),
        };

        let consumer_child = consumer
            .to_command()
            .stdin(pipe)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::spawn_failed(consumer, e))?;

        let (producer_output, consumer_output) = tokio::try_join!(
            producer_child.wait_with_output(),
            consumer_child.wait_with_output()
        )?;

        let producer_result = CommandResult::from_output(producer_output);
        if !producer_result.success() {
            debug!(producer = %producer, exit_code = producer_result.exit_code, "pipeline producer failed");
            return Ok(producer_result);
        }

        let result = CommandResult::from_output(consumer_output);
        debug!(consumer = %consumer, exit_code = result.exit_code, "pipeline finished");
        Ok(result)
    }
}

/// Run `commands` one after another inside `dir`.
///
/// Stops at the first nonzero exit and reports `false`; later commands are
/// never started. Only the children get `dir` as their working directory.
pub async fn run_in_dir(
    runner: &dyn ProcessRunner,
    dir: &Path,
    commands: &[CommandSpec],
) -> Result<bool, ProcessError> {
    for command in commands {
        let command = command.clone().current_dir(dir);
        let result = runner.run(&command).await?;
        if !result.success() {
            warn!(
                command = %command,
                dir = %dir.display(),
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "command failed, stopping sequence"
            );
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_captures_stdout_lines() {
        let result = SystemRunner::new()
            .run(&CommandSpec::new("printf").arg("one\\ntwo\\n"))
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.stdout_lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let result = SystemRunner::new()
            .run(&CommandSpec::new("false"))
            .await
            .unwrap();

        assert!(!result.success());
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let err = SystemRunner::new()
            .run(&CommandSpec::new("vcskit-no-such-program"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::SpawnFailed { .. }));
        assert!(err.to_string().contains("vcskit-no-such-program"));
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_expanded() {
        let result = SystemRunner::new()
            .run(&CommandSpec::new("echo").arg("$HOME; rm -rf /"))
            .await
            .unwrap();

        assert_eq!(result.stdout_lines, vec!["$HOME; rm -rf /"]);
    }

    #[tokio::test]
    async fn test_working_directory() {
        let temp = TempDir::new().unwrap();
        let expected = temp.path().canonicalize().unwrap();
        let result = SystemRunner::new()
            .run(&CommandSpec::new("pwd").current_dir(&expected))
            .await
            .unwrap();

        assert_eq!(result.stdout_lines, vec![expected.to_string_lossy().to_string()]);
    }

    #[tokio::test]
    async fn test_pipeline_passes_stdout_through() {
        let result = SystemRunner::new()
            .run_piped(
                &CommandSpec::new("printf").arg("a\\nb\\nc\\n"),
                &CommandSpec::new("wc").arg("-l"),
            )
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.stdout_lines.len(), 1);
        assert_eq!(result.stdout_lines[0].trim(), "3");
    }

    #[tokio::test]
    async fn test_pipeline_reports_producer_failure() {
        let result = SystemRunner::new()
            .run_piped(&CommandSpec::new("false"), &CommandSpec::new("cat"))
            .await
            .unwrap();

        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_run_in_dir_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let cwd_before = std::env::current_dir().unwrap();

        let ok = run_in_dir(
            &SystemRunner::new(),
            temp.path(),
            &[
                CommandSpec::new("touch").arg("first"),
                CommandSpec::new("false"),
                CommandSpec::new("touch").arg("second"),
            ],
        )
        .await
        .unwrap();

        assert!(!ok);
        assert!(temp.path().join("first").exists());
        assert!(!temp.path().join("second").exists());
        assert_eq!(std::env::current_dir().unwrap(), cwd_before);
    }

    #[tokio::test]
    async fn test_run_in_dir_all_succeed() {
        let temp = TempDir::new().unwrap();
        let ok = run_in_dir(
            &SystemRunner::new(),
            temp.path(),
            &[
                CommandSpec::new("touch").arg("a"),
                CommandSpec::new("touch").arg("b"),
            ],
        )
        .await
        .unwrap();

        assert!(ok);
        assert!(temp.path().join("a").exists());
        assert!(temp.path().join("b").exists());
    }

    #[tokio::test]
    async fn test_run_in_dir_sets_dir_on_every_command() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.working_dir.as_deref() == Some(Path::new("/repo")))
            .times(2)
            .returning(|_| Ok(CommandResult::success_with(Vec::<String>::new())));

        let ok = run_in_dir(
            &runner,
            Path::new("/repo"),
            &[CommandSpec::new("git").arg("fetch"), CommandSpec::new("git").arg("merge")],
        )
        .await
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_command_display() {
        let cmd = CommandSpec::new("git").args(["tag", "-f", "v1"]);
        assert_eq!(cmd.to_string(), "git tag -f v1");
    }
}
