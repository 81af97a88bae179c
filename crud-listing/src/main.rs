//! crud-listing service binary

use anyhow::Context;
use crud_listing::{
    config::Config,
    observability::init_tracing,
    routes::router,
    server::Server,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    let state = AppState::new(config.clone());

    // Demo records so the listing has something to page through
    if config.seed.enabled {
        state
            .repository()
            .seed(&config.seed.team, config.seed.count)
            .await
            .context("failed to seed demo records")?;
    }

    Server::new(config)
        .serve(router(state))
        .await
        .context("server error")?;

    Ok(())
}
