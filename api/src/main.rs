use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;
use log::info;
use std::sync::Arc;

use tk_api::app::{configure, session_data};
use tk_api::TokenSessions;
use tk_core::services::{TokenService, TokenServiceConfig};
use tk_infra::{DatabasePool, PgSubjectResolver, PgTokenStore, PgUnitOfWork};
use tk_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting TokenKeep API Server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    database
        .health_check()
        .await
        .context("Database is not reachable")?;
    database
        .run_migrations()
        .await
        .context("Failed to run database migrations")?;

    let token_config = TokenServiceConfig::from_jwt_config(&config.jwt)?;
    let tokens = Arc::new(TokenService::new(
        PgTokenStore::new(),
        PgSubjectResolver::new(),
        token_config,
    )?);

    let sessions = session_data(TokenSessions::new(
        PgUnitOfWork::new(database.get_pool().clone()),
        tokens,
        config.transport.clone(),
    ));
    info!(
        "Token transport: {}",
        if config.transport.use_cookie_auth { "cookie" } else { "bearer" }
    );

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(sessions.clone())
            .wrap(Logger::default())
            .configure(configure)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
