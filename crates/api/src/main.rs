use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adops_api::config::ServerConfig;
use adops_api::notifications::NotificationRouter;
use adops_api::router::build_app_router;
use adops_api::state::AppState;
use adops_db::DbPool;
use adops_events::{EventBus, EventPersistence};

/// How long each event consumer gets to drain after the server stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(
        host = %config.host,
        port = config.port,
        default_avg_downloads = config.default_avg_downloads,
        "Configuration loaded"
    );

    let pool = connect_database().await;

    let event_bus = Arc::new(EventBus::default());
    let consumers = spawn_event_consumers(&pool, &event_bus);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Ad-ops API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router and its state are gone, so this is the last sender.
    // Dropping it closes the channel and the consumers exit once drained.
    drop(event_bus);
    for (name, handle) in consumers {
        if tokio::time::timeout(DRAIN_TIMEOUT, handle).await.is_err() {
            tracing::warn!(consumer = name, "Event consumer did not drain in time");
        }
    }
    tracing::info!("Shutdown complete");
}

/// `RUST_LOG` filters; `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "adops_api=debug,adops_events=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, check and migrate. Any failure here aborts startup.
async fn connect_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = adops_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    adops_db::health_check(&pool)
        .await
        .expect("Database did not answer the health check");
    adops_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

/// Event log persistence and notification fan-out, each on its own receiver.
fn spawn_event_consumers(
    pool: &DbPool,
    bus: &EventBus,
) -> Vec<(&'static str, JoinHandle<()>)> {
    let persistence = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));
    let notifications = tokio::spawn(NotificationRouter::new(pool.clone()).run(bus.subscribe()));

    tracing::info!(subscribers = bus.subscriber_count(), "Event consumers started");
    vec![("persistence", persistence), ("notifications", notifications)]
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down");
}
