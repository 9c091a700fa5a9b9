//! ArchiCanvas API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p canvas-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` when present).

use canvas_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Loads .env before the subscriber reads APP_ENV / LOG_FORMAT
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting ArchiCanvas API server"
    );

    if let Err(e) = canvas_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
