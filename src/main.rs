use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use banter::llm::{ConversationController, HttpChatClient, InferenceConfig};
use banter::ui::AppState;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Banter");

    let config = InferenceConfig::from_env();
    info!(endpoint = %config.endpoint, "Using inference endpoint");

    let client = HttpChatClient::new(&config)?;
    let controller = ConversationController::new(Arc::new(client), config)?;
    let state = AppState::new(controller);

    banter::ui::run(state).map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
