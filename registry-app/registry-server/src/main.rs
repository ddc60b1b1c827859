use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use registry_api::{build_router, AppState};
use registry_core::services::RegistrationService;
use registry_infrastructure::{
    create_pool, run_migrations, PgRegistrationRepository, PgStudentRepository,
    PgTeacherRepository, PgTransactionManager,
};
use registry_security::JwtService;
use registry_shared::config::AppConfig;
use registry_shared::utils::mask_db_url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    registry_shared::telemetry::init_telemetry();

    info!("Registry server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to Database
    info!("Connecting to database at {}...", mask_db_url(&config.database.url));
    let pool = create_pool(&config.database).await?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied.");
    } else {
        warn!("Skipping migrations (database.run_migrations = false)");
    }

    let registry = RegistrationService::new(
        Arc::new(PgStudentRepository::new(pool.clone())),
        Arc::new(PgTeacherRepository::new(pool.clone())),
        Arc::new(PgRegistrationRepository::new(pool.clone())),
        Arc::new(PgTransactionManager::new(pool.clone())),
    )
    .with_common_students_mode(config.registry.common_students_mode);

    let jwt = JwtService::new(
        &config.jwt.secret,
        config.jwt.client.clone(),
        config.jwt.token_expiry_secs,
    );

    // Create App State
    let state = AppState {
        registry: Arc::new(registry),
        jwt: Arc::new(jwt),
    };

    let app = build_router(state, &config.http);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!(
        "{} ({}) listening on {}, common students mode: {}",
        config.app.name,
        config.app.env,
        addr,
        config.registry.common_students_mode.as_str()
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Registry server stopped.");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
