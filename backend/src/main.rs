use lnresume::config::Config;
use lnresume::middleware::rate_limit::{CLEANUP_INTERVAL, spawn_cleanup};
use lnresume::server::{self, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,lnresume=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    tracing::info!("Starting transaction history service");

    let state = AppState::from_config(&config).await?;
    spawn_cleanup(state.rate_limiter.clone(), CLEANUP_INTERVAL);
    let app = server::create_app(state);
    let listener = TcpListener::bind(&config.bind_address).await?;

    server::run_server(app, listener).await
}
