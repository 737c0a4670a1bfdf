use std::{error::Error, sync::Arc};

use api::AppState;
use tracing::{info, warn};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `.env` is optional; variables already set in the environment win.
    let dotenv = dotenvy::dotenv();

    telemetry::init()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to read .env, continuing with process env"),
    }

    // Startup phase: every knowledge base is loaded and indexed before the listener binds.
    let state = AppState::from_env().await?;

    api::start(Arc::new(state)).await?;

    Ok(())
}
