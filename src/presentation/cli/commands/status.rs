use colored::{ColoredString, Colorize};

use crate::common::result::KitResult;
use crate::domain::entities::status_report::{ChangeCategory, StatusReport};
use crate::presentation::cli::OutputFormat;

/// Renders a [`StatusReport`] for the terminal or for machines
pub struct StatusCommand {
    pub output: OutputFormat,
}

impl StatusCommand {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub fn render(&self, report: &StatusReport) -> KitResult<String> {
        match self.output {
            OutputFormat::Text => Ok(render_text(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}

fn label(category: ChangeCategory) -> ColoredString {
    let text = format!("{:>10}", category.as_str());
    match category {
        ChangeCategory::New => text.green(),
        ChangeCategory::Modified | ChangeCategory::Changed => text.yellow(),
        ChangeCategory::Removed | ChangeCategory::Missing => text.red(),
        ChangeCategory::Conflicted => text.red().bold(),
        ChangeCategory::Moved | ChangeCategory::Replaced => text.cyan(),
        ChangeCategory::Untracked => text.magenta(),
        ChangeCategory::Obstructed => text.blue(),
    }
}

fn render_text(report: &StatusReport) -> String {
    if report.is_empty() {
        return format!("{}\n", "clean".green());
    }

    let mut out = String::new();
    for (category, entries) in report.iter() {
        for entry in entries {
            out.push_str(&format!("{} {}\n", label(category), entry));
        }
    }
    for unknown in report.unrecognized() {
        out.push_str(&format!("{} {}\n", format!("{:>10}", "unknown").red(), unknown.line));
    }
    out
}
