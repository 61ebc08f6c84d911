//! mailtend - entry point for the standalone maintenance shell

use std::sync::Arc;

use mailtend::app::{App, Command, CommandOutput};
use mailtend::config::Settings;
use mailtend::providers::{OfflineHost, StaticDirectory};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting mailtend");

    // A standalone run has no privileged host bridge: the maintenance
    // capability resolves to absent and diagnostics still render.
    let app = App::new(
        Arc::new(StaticDirectory::empty()),
        None,
        Arc::new(OfflineHost),
        Settings::default(),
    );

    match app
        .dispatch(Command::GenerateDiagnostics {
            selections: Vec::new(),
        })
        .await
    {
        CommandOutput::Report(report) => println!("{report}"),
        CommandOutput::Status(_) => {}
    }
}
