//! Conexión a PostgreSQL
//!
//! Abre el pool a partir de [`DatabaseConfig`], aplica las migraciones
//! embebidas y expone el ping usado por `/api/health`.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Crear el pool y verificar que la base responde
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("🔌 Conectando a la base de datos: {}", mask_database_url(&config.url));

    let pool = config.create_pool().await?;
    ping(&pool).await?;

    info!(
        "✅ Pool de conexiones listo (max: {}, min: {})",
        config.max_connections, config.min_connections
    );
    Ok(pool)
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("📦 Migraciones aplicadas");
    Ok(())
}

/// Verificar que la conexión funciona
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Enmascara usuario y contraseña de la URL para los logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
