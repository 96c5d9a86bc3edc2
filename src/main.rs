mod api;
mod catalog;
mod config;
mod data;
mod error;
mod models;
mod session;
mod srs;
mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use api::{app_router, ApiState};
use catalog::Catalog;
use config::AppConfig;
use store::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::load();

    let catalog = match &config.deck_path {
        Some(path) => Catalog::load(Path::new(path))?,
        None => Catalog::builtin()?,
    };
    info!("loaded catalog with {} cards", catalog.len());

    let store = SqliteStore::connect(&config.database_url).await?;

    let state = ApiState {
        store: Arc::new(store),
        catalog: Arc::new(catalog),
        scheduler: config.scheduler,
        session: config.session,
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app_router(state)).await?;

    Ok(())
}
