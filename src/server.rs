//! Reusable reservation server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, theme seeding, REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::BookingService;
use crate::config::{AppConfig, LogFormat, ThemeSeed};
use crate::domain::{DomainResult, NewTheme, RepositoryProvider};
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the reservation server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured `[[themes]]` that do not exist yet (default: true).
    pub seed_themes: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed_themes: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running reservation server.
///
/// ```rust,no_run
/// use roomescape::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// Booking use-cases shared with the HTTP handlers.
    pub booking: Arc<BookingService>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to (resolves port 0).
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server: connect, migrate, seed themes, then serve the API.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting room escape reservation service...");

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let provider = SeaOrmRepositoryProvider::init(db.clone(), app_cfg.booking.slot_scope).await?;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(provider);
        info!("Slot uniqueness scope: {}", repos.reservations().slot_scope());

        if opts.seed_themes && !app_cfg.themes.is_empty() {
            let created = seed_themes(repos.as_ref(), &app_cfg.themes).await?;
            info!("Seeded {} theme(s)", created);
        }

        let booking = Arc::new(BookingService::new(
            repos.clone(),
            app_cfg.booking.delete_mode,
        ));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            AppState::new(booking.clone(), repos.clone()),
            app_cfg.request_timeout(),
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            booking,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let grace = Duration::from_secs(self.shutdown.timeout_secs());
        let mut api_task = self.api_task;
        match tokio::time::timeout(grace, &mut api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => {
                warn!("REST API server did not stop within {:?}, aborting", grace);
                api_task.abort();
            }
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down reservation service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Create every seed theme whose name is not taken yet. Returns how many
/// themes were created.
pub async fn seed_themes(repos: &dyn RepositoryProvider, seeds: &[ThemeSeed]) -> DomainResult<usize> {
    let themes = repos.themes();
    let mut created = 0;

    for seed in seeds {
        let new = NewTheme::new(&seed.name, seed.description.clone(), seed.price)?;
        if themes.find_by_name(&new.name).await?.is_some() {
            continue;
        }
        let theme = themes.insert(new).await?;
        info!("Theme '{}' created with id {}", theme.name, theme.id);
        created += 1;
    }

    Ok(created)
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlotScope;
    use crate::infrastructure::InMemoryStorage;

    fn seed(name: &str, price: i32) -> ThemeSeed {
        ThemeSeed {
            name: name.into(),
            description: String::new(),
            price,
        }
    }

    #[tokio::test]
    async fn seeding_skips_existing_names() {
        let storage = InMemoryStorage::new(SlotScope::Global);
        let seeds = [seed("Haunted Manor", 1000), seed("Lab 404", 2000)];

        assert_eq!(seed_themes(&storage, &seeds).await.unwrap(), 2);
        assert_eq!(seed_themes(&storage, &seeds).await.unwrap(), 0);

        let lab = storage.themes().find_by_name("Lab 404").await.unwrap().unwrap();
        assert_eq!(lab.price, 2000);
    }

    #[tokio::test]
    async fn starts_and_stops_on_in_memory_sqlite() {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 2;
        config.database.url = "sqlite::memory:".into();
        config.database.pool_size = 1;
        config.themes = vec![seed("Haunted Manor", 1000)];

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        assert_ne!(handle.local_addr.port(), 0);
        assert!(handle.is_running());
        assert_eq!(handle.booking.get_theme(1).await.unwrap().name, "Haunted Manor");

        handle.shutdown().await;
    }
}
