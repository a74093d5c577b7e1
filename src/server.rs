//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database, migrations, admin
//! bootstrap, the retention job, the REST API, metrics and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::start_retention_task;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::{init_database, run_migrations};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type StartupError = Box<dyn std::error::Error + Send + Sync>;

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup
    pub auto_migrate: bool,
    /// Create the configured administrator when none exists
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The global metrics recorder can only be installed once per process.
fn prometheus_handle() -> Result<PrometheusHandle, StartupError> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running service.
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port actually bound (differs from the config when it asked for 0)
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    retention_task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, StartupError> {
        let app_cfg = opts.config;
        info!("Starting park service...");

        let prometheus = prometheus_handle()?;

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        let jwt_config = app_cfg.jwt_config();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            "JWT configured"
        );
        let state = AppState::new(db.clone(), jwt_config, app_cfg.booking_policy());

        if opts.create_default_admin {
            match state.users.ensure_admin(&app_cfg.admin_bootstrap()).await {
                Ok(Some(admin)) => {
                    warn!(username = %admin.username, "Default administrator created, change its password");
                }
                Ok(None) => {}
                Err(e) => error!(error = %e, "Failed to create default administrator"),
            }
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        // ── Shutdown & background tasks ────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let signal = shutdown.signal();

        let retention_task = if app_cfg.retention.cancelled_days > 0 {
            Some(start_retention_task(
                repos.clone(),
                signal.clone(),
                app_cfg.retention.cancelled_days,
                app_cfg.retention.check_interval_secs,
            ))
        } else {
            info!("Retention of cancelled reservations disabled");
            None
        };

        // ── REST API ───────────────────────────────────────────
        let router = create_api_router(state, prometheus);
        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = signal.clone();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
            retention_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for every task to stop after shutdown was triggered. In-flight
    /// requests get `server.shutdown_timeout` seconds.
    pub async fn wait(self) {
        let grace = Duration::from_secs(self.shutdown.timeout_secs());

        match tokio::time::timeout(grace, self.api_task).await {
            Ok(Ok(())) => info!("REST API stopped"),
            Ok(Err(e)) => error!("REST API task panicked: {}", e),
            Err(_) => warn!("REST API did not stop within {}s", grace.as_secs()),
        }
        if let Some(task) = self.retention_task {
            if let Err(e) = task.await {
                error!("Retention task panicked: {}", e);
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_serves_and_stops() {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        assert!(handle.api_port > 0);
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count_admins().await.unwrap(), 1);

        tokio::time::timeout(Duration::from_secs(10), handle.shutdown())
            .await
            .unwrap();
    }
}
