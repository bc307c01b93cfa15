use std::process::ExitCode;

use anyhow::Context;
use status_probe::{
    configurations::get_config,
    startup::{Application, EXIT_MISCONFIGURED},
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> ExitCode {
    let sub = get_subscriber("probe", "info", std::io::stdout);
    if let Err(e) = init_subscriber(sub) {
        eprintln!("{}", e);
        return ExitCode::from(EXIT_MISCONFIGURED);
    }

    let app = match build() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to configure the health probe.");
            return ExitCode::from(EXIT_MISCONFIGURED);
        }
    };

    ExitCode::from(app.run_to_exit_code().await)
}

fn build() -> anyhow::Result<Application> {
    let config = get_config().context("failed to parse configurations.")?;

    Application::build(config).context("failed to build the health probe.")
}
