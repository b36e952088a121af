use std::time::Duration;

use axum::{Router, routing::get};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing::info;

use adapters::{create_app_state, handle_connection, health};
use domain::RoundConfig;

#[derive(Parser, Debug)]
#[command(name = "wordmatch-server", about = "Two-player word matching game server")]
struct Args {
    /// Interface to listen on.
    #[arg(long, env = "WORDMATCH_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Seconds each round stays open.
    #[arg(long, env = "WORDMATCH_ROUND_SECS", default_value_t = 15)]
    round_secs: u64,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = RoundConfig {
        deadline: Duration::from_secs(args.round_secs),
    };
    let app_state = create_app_state(config);

    let app = Router::new()
        .route("/ws", get(handle_connection))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, round_secs = args.round_secs, "Server listening");
    axum::serve(listener, app).await?;
    info!("Server shut down");
    Ok(())
}
