use std::net::SocketAddr;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use worksite_tracker::{
    config::{DatabaseConfig, EnvironmentConfig},
    controllers::auth_controller::AuthController,
    create_router, database, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenvy::dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,worksite_tracker=debug,tower_http=info")),
        )
        .init();

    info!("🏗️ Worksite Tracker API");
    info!("========================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        e
    })?;
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let pool = database::connect(&DatabaseConfig::new(config.database_url.clone()))
        .await
        .map_err(|e| {
            error!("❌ Error conectando a la base de datos: {}", e);
            e
        })?;
    database::run_migrations(&pool).await?;

    let state = AppState::new(pool, config);

    if let Some(admin) = &state.config.bootstrap_admin {
        let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
        if let Err(e) = controller.ensure_bootstrap_admin(admin).await {
            warn!("⚠️ No se pudo crear el administrador inicial: {}", e);
        }
    }

    let addr: SocketAddr = state.config.server_url().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Servidor escuchando en http://{}", addr);
    info!("📋 Health check: http://{}/api/health", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| {
        error!("❌ Error del servidor: {}", e);
        e
    })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
