use std::process::ExitCode;

use vcskit::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> ExitCode {
    let app = CliApp::new();
    app.init_logging();

    // Run the CLI application
    app.run().await
}
