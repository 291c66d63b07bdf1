use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use crips_transport::{
    config::{DatabaseConfig, EnvironmentConfig},
    create_app,
    database::DatabaseConnection,
    repositories::{DocumentStore, MemoryDocumentStore, PgDocumentStore},
    services::AuthService,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🌱 CRIPS - Transport & Shipment Scheduling API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    let store = create_store().await?;
    let state = AppState::new(store, config.clone());

    // System Manager inicial
    match AuthService::new(&state).ensure_admin(&config).await {
        Ok(Some(user)) => info!("👤 System Manager inicial creado: {}", user.email),
        Ok(None) => {}
        Err(e) => warn!("⚠️ No se pudo crear el System Manager inicial: {}", e),
    }

    let app = create_app(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{} ({})", addr, config.environment);
    info!("🔍 Endpoints disponibles bajo /api:");
    info!("   POST /auth/login, POST /auth/logout, GET /auth/me, POST /users");
    info!("   GET|POST /schedules, PUT /schedules/:id/update, DELETE /schedules/:id");
    info!("   GET /schedules/orders/ready, /schedules/vehicles/available, /schedules/drivers-available");
    info!("   GET /shipments, /shipments/delivered, PUT /shipments/:id, POST /shipments/:id/{{start,delay,deliver}}");
    info!("   GET|POST /quality, /vehicles, /drivers, /fuel, /orders");
    info!("   GET /reports/shipments/monthly, /reports/fuel/monthly, /fuel/summary");
    info!("   GET|DELETE /notifications, GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// PostgreSQL por defecto; `STORE=memory` levanta el servidor sin base de datos
async fn create_store() -> Result<Arc<dyn DocumentStore>> {
    if std::env::var("STORE").map(|v| v == "memory").unwrap_or(false) {
        warn!("⚠️ Usando almacén en memoria: los datos se pierden al reiniciar");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    }

    let db_config = DatabaseConfig::from_env()?;
    let connection = match DatabaseConnection::new(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    connection.run_migrations().await?;
    info!("✅ Migraciones aplicadas");

    Ok(Arc::new(PgDocumentStore::new(connection.pool().clone())))
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
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
