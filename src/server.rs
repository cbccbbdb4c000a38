//! Reusable reservation service runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! storage init, migrations, REST API, metrics, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{AvailabilityResolver, CapacityTracker, ReservationHistory, ReservationWriter};
use crate::config::{AppConfig, StorageBackend};
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, describe_metrics, HealthState, ReservationAppState};
use crate::shared::shutdown::ShutdownCoordinator;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the reservation service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running reservation service.
///
/// # Examples
///
/// ```rust,no_run
/// use campus_reservations::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub api_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global metrics recorder can only be installed once per process;
/// a restart within the same process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_metrics();
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

impl ServerHandle {
    /// Start the reservation service with the given options.
    ///
    /// This will:
    /// 1. Validate the configuration and build the service schedule
    /// 2. Install the Prometheus metrics recorder
    /// 3. Open the reservation store (SQLite + migrations, or in-memory)
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting campus reservation service...");

        let schedule = Arc::new(app_cfg.to_schedule()?);
        let fleet = app_cfg.fleet();
        info!(
            "Schedule: {}-{} every {} min, {} tables",
            app_cfg.schedule.opens_at,
            app_cfg.schedule.closes_at,
            schedule.slot_minutes(),
            fleet.size()
        );

        let prometheus_handle = prometheus_handle();

        // ── Storage ────────────────────────────────────────────
        let (repos, db) = match app_cfg.database.backend {
            StorageBackend::Sqlite => {
                let db = init_database(&app_cfg.database.to_database_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                let repos: Arc<dyn RepositoryProvider> =
                    Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
                (repos, Some(db))
            }
            StorageBackend::Memory => {
                warn!("Using in-memory reservation store; bookings are lost on restart");
                let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
                (repos, None)
            }
        };

        // ── Use cases ──────────────────────────────────────────
        let resolver = AvailabilityResolver::new(
            schedule.clone(),
            CapacityTracker::new(repos.clone(), fleet.clone()),
            app_cfg.reservations.next_available_horizon_days,
        );
        let writer = ReservationWriter::new(repos.clone(), schedule, fleet);
        let history = ReservationHistory::new(repos.clone());

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            ReservationAppState::new(Arc::new(resolver), Arc::new(writer), Arc::new(history)),
            HealthState {
                db: db.clone(),
                started_at: Arc::new(Instant::now()),
            },
            prometheus_handle,
            Duration::from_secs(app_cfg.server.request_timeout_secs),
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let bind_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        let api_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Reservation service started.");

        Ok(Self {
            config: app_cfg,
            api_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop once shutdown has been triggered, then
    /// close the database. In-flight requests get `server.shutdown_timeout`
    /// seconds to drain.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let Self {
            shutdown,
            api_task,
            db,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!("REST API server did not stop in time");
        }

        if let Some(db) = db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("✅ Database connection closed");
            }
        }

        info!("👋 Reservation service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down reservation service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` overrides `logging.level`. A second call is a no-op.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
