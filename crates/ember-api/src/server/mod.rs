//! Server setup and initialization
//!
//! Wires the database, repositories, collaborators, realtime layer, and
//! router into a runnable application.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use ember_common::{AppConfig, AppError, JwtService};
use ember_core::SnowflakeGenerator;
use ember_db::{
    create_pool, run_migrations, PgBlockRepository, PgConversationRepository, PgMatchRepository,
    PgMessageRepository, PgSwipeRepository, PgUserRepository,
};
use ember_realtime::ConnectionManager;
use ember_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::external::{HttpGeocoder, LocalObjectStorage};
use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config().clone();

    let api = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    // Health stays outside the rate limiter
    health_routes().merge(api).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = ember_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Migrations applied");

    // Shared services
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    // Collaborators
    let geocoder = Arc::new(HttpGeocoder::new(&config.geocoder));
    let storage = Arc::new(LocalObjectStorage::new(&config.storage));

    // Repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let swipe_repo = Arc::new(PgSwipeRepository::new(pool.clone()));
    let match_repo = Arc::new(PgMatchRepository::new(pool.clone()));
    let conversation_repo = Arc::new(PgConversationRepository::new(pool.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(pool.clone()));
    let block_repo = Arc::new(PgBlockRepository::new(pool));

    let service_context = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .swipe_repo(swipe_repo)
        .match_repo(match_repo)
        .conversation_repo(conversation_repo)
        .message_repo(message_repo)
        .block_repo(block_repo)
        .geocoder(geocoder)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Realtime layer: one in-memory registry per process
    let connection_manager = ConnectionManager::new_shared();

    Ok(AppState::new(
        service_context,
        config,
        connection_manager,
        storage,
    ))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
