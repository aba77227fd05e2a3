//! Ordersmith server binary
//!
//! Reads its configuration from environment variables, builds a shared
//! `Composer` and serves the HTTP API.
//!
//! ## Environment Variables
//! - `ORDERSMITH_ADDR`: listen address (default: "0.0.0.0:8080")
//! - `ORDERSMITH_FONT_DIR`: directory with regular.ttf / medium.ttf /
//!   bold.ttf; built-in base fonts are used when unset
//! - `ORDERSMITH_BRANDING`: path to a JSON branding file
//! - `ORDERSMITH_LAYOUT`: layout variant (minimal | extended | full)

use composer::{BrandingConfig, Composer, FontSet, LayoutVariant};
use server::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("server=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("ORDERSMITH_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let fonts = match std::env::var("ORDERSMITH_FONT_DIR") {
        Ok(dir) => {
            tracing::info!("Loading fonts from {dir}");
            FontSet::from_dir(&dir)?
        }
        Err(_) => FontSet::builtin(),
    };

    let branding = match std::env::var("ORDERSMITH_BRANDING") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str::<BrandingConfig>(&raw)?
        }
        Err(_) => BrandingConfig::default(),
    };

    let layout = match std::env::var("ORDERSMITH_LAYOUT") {
        Ok(name) => name
            .parse::<LayoutVariant>()
            .map_err(|e| anyhow::anyhow!(e))?,
        Err(_) => LayoutVariant::default(),
    };

    let state = AppState {
        composer: Arc::new(Composer::new(branding, layout, fonts)),
    };

    tracing::info!("-- Starting ordersmith on {addr} (layout: {layout:?})");

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
