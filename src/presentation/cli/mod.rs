pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::application::services::RepoFacade;
use crate::common::config::ToolConfig;
use crate::infrastructure::scm::{ExportOptions, GitScm, UpdateOptions};
use crate::presentation::cli::commands::StatusCommand;

/// Exit code for a call that ran but answered "no" or reported failure
const EXIT_FALSE: u8 = 1;
/// Exit code for errors: bad arguments, failed preconditions, config problems
const EXIT_ERROR: u8 = 2;

/// Output format options for status command
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// vcskit - Drive git and svn working copies through one interface
#[derive(Parser)]
#[command(name = "vcskit")]
#[command(about = "Drive git and svn working copies through one interface")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// git executable to use
    #[arg(long, global = true, env = "VCSKIT_GIT")]
    pub git: Option<String>,

    /// svn executable to use
    #[arg(long, global = true, env = "VCSKIT_SVN")]
    pub svn: Option<String>,

    /// Fail on status lines with unknown flags
    #[arg(long, global = true)]
    pub strict_status: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exit 0 if the path is a git or svn working copy
    IsRepo {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Exit 0 if the working copy has no changes
    IsClean {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show changes grouped by category
    Status {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Export a clean copy of the tree without metadata
    Export {
        src: PathBuf,
        dest: PathBuf,

        /// Top-level directory inside the export (git only)
        #[arg(long)]
        prefix: Option<String>,

        /// Revision to export (git only, defaults to HEAD)
        #[arg(long)]
        rev: Option<String>,
    },

    /// Pull upstream changes into the working copy
    Update {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Remote to fetch (git only)
        #[arg(long)]
        remote: Option<String>,

        /// Remote branch to merge (git only)
        #[arg(long)]
        branch: Option<String>,
    },

    /// Clone a git repository
    Clone {
        remote: String,
        dest: PathBuf,

        /// Initialize submodules after cloning
        #[arg(long)]
        init_submodules: bool,
    },

    /// Create an empty git repository
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Stage everything and commit it
    Commit {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Create an annotated tag
    Tag {
        name: String,

        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Tag message (defaults to "Tagging <name>")
        #[arg(short, long)]
        message: Option<String>,

        /// Revision to tag (defaults to HEAD)
        #[arg(long)]
        rev: Option<String>,
    },

    /// Point an existing tag at another revision
    MoveTag {
        name: String,

        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Revision to move the tag to (defaults to HEAD)
        #[arg(long)]
        rev: Option<String>,
    },

    /// Rebase git submodules onto their recorded commits
    UpdateSubmodules {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize and rebase git submodules
    InitSubmodules {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// CLI application
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    /// Log to stderr. `RUST_LOG` wins over `--verbose`.
    pub fn init_logging(&self) {
        let default_level = if self.cli.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("vcskit={}", default_level)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub async fn run(self) -> ExitCode {
        colored::control::set_override(!self.cli.no_color);

        match self.handle_command().await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(EXIT_FALSE),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                ExitCode::from(EXIT_ERROR)
            }
        }
    }

    /// Merge the config file with command-line overrides
    fn load_config(&self) -> anyhow::Result<ToolConfig> {
        let mut config = ToolConfig::load_or_default(self.cli.config.as_deref())?;
        if let Some(git) = &self.cli.git {
            config = config.with_git_executable(git);
        }
        if let Some(svn) = &self.cli.svn {
            config = config.with_svn_executable(svn);
        }
        if self.cli.strict_status {
            config = config.with_strict_status(true);
        }
        Ok(config.validated()?)
    }

    async fn handle_command(&self) -> anyhow::Result<bool> {
        let facade = RepoFacade::new(self.load_config()?);

        match &self.cli.command {
            Commands::IsRepo { path } => Ok(print_answer(facade.is_repo(path))),
            Commands::IsClean { path } => Ok(print_answer(facade.is_clean(path).await?)),
            Commands::Status { path, output } => {
                self.handle_status_command(&facade, path, output.clone())
                    .await
            }
            Commands::Export {
                src,
                dest,
                prefix,
                rev,
            } => {
                let mut options = ExportOptions::new();
                options.prefix = prefix.clone();
                options.version = rev.clone();

                let exported = facade.export(src, dest, &options).await?;
                Ok(report(exported, "Exported", &dest.display().to_string()))
            }
            Commands::Update {
                path,
                remote,
                branch,
            } => {
                let options = UpdateOptions {
                    remote: remote.clone(),
                    branch: branch.clone(),
                };
                let updated = facade.update(path, &options).await?;
                Ok(report(updated, "Updated", &path.display().to_string()))
            }
            Commands::Clone {
                remote,
                dest,
                init_submodules,
            } => {
                let cloned = git(&facade)
                    .clone_repo(remote, dest, *init_submodules)
                    .await?;
                Ok(report(cloned, "Cloned", remote))
            }
            Commands::Init { path } => {
                let created = git(&facade).init_repo(path).await?;
                Ok(report(created, "Initialized", &path.display().to_string()))
            }
            Commands::Commit { path, message } => {
                let committed = git(&facade).commit(path, message).await?;
                Ok(report(committed, "Committed", &path.display().to_string()))
            }
            Commands::Tag {
                name,
                path,
                message,
                rev,
            } => {
                let tagged = git(&facade)
                    .tag(path, name, message.as_deref(), rev.as_deref())
                    .await?;
                Ok(report(tagged, "Tagged", name))
            }
            Commands::MoveTag { name, path, rev } => {
                let moved = git(&facade).move_tag(path, name, rev.as_deref()).await?;
                Ok(report(moved, "Moved tag", name))
            }
            Commands::UpdateSubmodules { path } => {
                let updated = git(&facade).update_submodules(path).await?;
                Ok(report(updated, "Updated submodules of", &path.display().to_string()))
            }
            Commands::InitSubmodules { path } => {
                let initialized = git(&facade).init_submodules(path).await?;
                Ok(report(
                    initialized,
                    "Initialized submodules of",
                    &path.display().to_string(),
                ))
            }
        }
    }

    async fn handle_status_command(
        &self,
        facade: &RepoFacade,
        path: &Path,
        output_format: OutputFormat,
    ) -> anyhow::Result<bool> {
        let Some(status) = facade.status(path).await? else {
            eprintln!(
                "{} {} is not a git or svn working copy",
                "⚠".yellow().bold(),
                path.display()
            );
            return Ok(false);
        };

        let rendered = StatusCommand::new(output_format).render(&status)?;
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
        Ok(true)
    }
}

fn git(facade: &RepoFacade) -> GitScm {
    facade.factory().git()
}

fn print_answer(answer: bool) -> bool {
    println!("{}", answer);
    answer
}

fn report(success: bool, action: &str, subject: &str) -> bool {
    if success {
        println!("{} {} {}", "✓".green().bold(), action, subject);
    } else {
        eprintln!("{} {} {} failed", "✗".red().bold(), action, subject);
    }
    success
}
