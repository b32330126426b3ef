//! leanservice - HTTP server for random Reddit pictures.

use std::sync::Arc;

use axum::http::Request;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use leanservice::source::RedditSource;
use leanservice::{router, AppState, Config, Environment, HistoryStore};

/// Serve random picture posts from Reddit and keep a history of picks.
#[derive(Parser, Debug)]
#[command(name = "leanservice")]
#[command(about = "HTTP server for random Reddit pictures", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

/// Log filter from `RUST_LOG`, or else the default for the `ENV` tag.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let env = std::env::var("ENV")
            .ok()
            .and_then(|v| v.parse::<Environment>().ok())
            .unwrap_or(Environment::Prod);
        env.default_log_filter().into()
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Variables already in the environment win over the file.
    let dotenv_loaded = std::path::Path::new(&args.dotenv).exists();
    if dotenv_loaded {
        dotenvy::from_path(&args.dotenv)?;
    }

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv_loaded {
        tracing::info!(path = %args.dotenv, "loaded environment file");
    }

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    let history = HistoryStore::open(&config.database_url).await?;
    let source = RedditSource::new(&config.reddit_url)?;
    let state = AppState::new(config, Arc::new(source), history.clone());

    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                query = request.uri().query().unwrap_or("")
            )
        },
    ));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    history.close().await;
    Ok(())
}
