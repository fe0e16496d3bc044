mod agent;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod prompts;
mod session;
mod store;

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::session::Cerebra;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cerebra v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Dataset: {} | Journal entries: {} | Model: {}",
        config.data_path, config.entry_path, config.model
    );

    let session = Cerebra::new(&config);

    // Request-at-a-time loop: each prompt is handled to completion before the
    // next one is read.
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }

        let response = session.handle(prompt).await;
        writeln!(stdout, "{response}")?;
    }

    Ok(())
}
