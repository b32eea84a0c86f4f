// Veritas Entry Point
// Terminal chat for news verification, backed by a remote classifier with a local fallback.

mod actors;
mod brain;
mod config;
mod error;
mod models;
mod repl;
mod session;
mod view;

#[cfg(test)]
mod tests;

use actors::backend::HttpBackend;
use actors::controller::ChatControllerHandle;
use config::{ChatConfig, LogFormat};
use repl::{Command, HELP_TEXT};
use session::SessionState;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use view::TerminalView;

const DEFAULT_LOG_FILTER: &str = "veritas_chat=warn";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ChatConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Veritas against {}", config.backend_url);
    let session = if config.offline {
        SessionState::offline()
    } else {
        SessionState::new()
    };
    let backend = Arc::new(HttpBackend::new(config.backend_url.clone()));
    let controller = ChatControllerHandle::spawn(
        backend,
        TerminalView::new(std::io::stdout()),
        session,
        config.typing_delay,
    );

    if let Err(e) = controller.load_history().await {
        error!("Failed to render history: {}", e);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("  ** {}", e);
                continue;
            }
        };

        // Errors are rendered by the controller; here they are only logged.
        let result = match command {
            Command::Empty => Ok(()),
            Command::Help => {
                println!("{}", HELP_TEXT);
                Ok(())
            }
            Command::Quit => break,
            Command::Say(text) => controller.submit(text).await.map(|_| ()),
            Command::Feedback { action, target } => {
                controller.feedback(target, action).await.map(|_| ())
            }
            Command::ListTraining => controller.list_training().await.map(|_| ()),
            Command::Forget(id) => controller.forget_training(id).await,
            Command::Retrain => controller.retrain().await.map(|_| ()),
        };
        if let Err(e) = result {
            info!("Command failed: {}", e);
        }
    }

    controller.shutdown().await?;
    info!("Veritas stopped");
    Ok(())
}
