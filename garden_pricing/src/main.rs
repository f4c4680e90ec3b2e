//! Entry point for the Garden pricing binary.
//!
//! Running this binary starts an HTTP server exposing the pricing
//! engine.  The pricing tables are read from the JSON file named by
//! `GARDEN_PRICING_CONFIG` (default `config/pricing.json`) and the
//! server binds to `GARDEN_BIND_ADDR` (default `127.0.0.1:3000`).

use garden_pricing::config::ServerSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garden_pricing=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::from_env();
    if let Err(err) = garden_pricing::api::serve(&settings.bind_addr, &settings.config_path).await {
        tracing::error!("error running server: {err:#}");
        std::process::exit(1);
    }
}
