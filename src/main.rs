// src/main.rs

use std::env;
use std::net::SocketAddr;

use sui_mcp_server::{api, config::Config, mcp::stdio, AppState};
use tokio::io;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = api::create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("🚀 HTTP Server listening on {}", addr);
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("HTTP server stopped: {}", e);
    }
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: AppState) {
    info!("🚀 Starting MCP server on stdin/stdout...");

    let stdin = io::BufReader::new(io::stdin());
    if let Err(e) = stdio::serve(stdin, io::stdout(), state).await {
        error!("MCP transport failed: {}", e);
    }

    info!("MCP server shutting down");
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the MCP stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sui_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    let app_state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to initialize Sui backends: {:#}", e);
            return;
        }
    };

    match app_state.credentials.active_address() {
        Some(address) => info!("Active Sui address: {}", address),
        None => info!(
            "No active Sui address under {}; wallet tools will report errors",
            app_state.credentials.config_dir().display()
        ),
    }

    // Check if running in MCP mode (stdin/stdout) or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--mcp".to_string()) || env::var("MCP_MODE").is_ok() {
        run_mcp_server(app_state).await;
    } else {
        run_http_server(app_state).await;
    }
}
