//! Sockethub handler — gateway invocation entry point.
//!
//! Wires the verifier, registry, and push transport into the dispatcher,
//! then processes a single raw event: read from a file argument when one is
//! given, from stdin otherwise. The response is printed as JSON. The
//! surrounding invocation model (one invocation per event) is provided by
//! whatever runs this binary.

use std::io::Read;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use sockethub_auth::CredentialVerifier;
use sockethub_core::config::AppConfig;
use sockethub_core::error::AppError;
use sockethub_gateway::{HttpPushTransport, RoutingDispatcher};
use sockethub_registry::build_store;

#[tokio::main]
async fn main() {
    let env = std::env::var("SOCKETHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Handler error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Build the dispatcher and process one event.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting sockethub-handler v{}", env!("CARGO_PKG_VERSION"));

    let raw = read_event()?;

    let verifier = CredentialVerifier::new(&config.auth)?;
    let store = build_store(&config.registry).await?;
    let transport = Arc::new(HttpPushTransport::new(&config.push)?);
    let dispatcher = RoutingDispatcher::new(verifier, store, transport, config.push.clone());

    let response = dispatcher.dispatch(&raw).await;
    tracing::info!(status_code = response.status_code, "Event handled");

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Read the raw event JSON from the file argument or stdin.
fn read_event() -> Result<serde_json::Value, AppError> {
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| {
            AppError::validation(format!("Failed to read event file '{path}': {e}"))
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::validation(format!("Failed to read event: {e}")))?;
            buffer
        }
    };

    serde_json::from_str(&raw)
        .map_err(|e| AppError::validation(format!("Event is not valid JSON: {e}")))
}
