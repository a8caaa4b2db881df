use actix_web::{web, HttpServer};
use anyhow::Context;

use bl_api::{create_app, middleware::create_cors, telemetry, AppState};
use bl_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(&config.logging);

    tracing::info!(
        environment = ?config.environment,
        store = ?config.store.backend,
        "Starting verification service"
    );

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize application state")?;
    let state = web::Data::new(state);

    let bind_address = config.server.bind_address();
    let server_config = config.server.clone();
    let environment = config.environment;
    tracing::info!(address = %bind_address, workers = server_config.workers, "Binding HTTP server");

    let mut server = HttpServer::new(move || {
        create_app(
            state.clone(),
            create_cors(&server_config, environment),
            server_config.max_payload_size,
        )
    });
    // Zero keeps actix's default of one worker per physical core
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    tracing::info!("Verification service stopped");
    Ok(())
}
