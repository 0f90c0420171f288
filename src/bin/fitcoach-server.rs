// ABOUTME: Server binary wiring configuration, gateway, and routes together
// ABOUTME: Starts the HTTP API with structured logging and graceful shutdown
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # FitCoach Server Binary
//!
//! This binary starts the chat API over the configured model providers and
//! the ExerciseDB search client.

use std::sync::Arc;

use anyhow::Result;
use fitcoach_server::{
    config::ServerConfig,
    external::ExerciseDbClient,
    llm::{ModelGateway, ModelRegistry, OpenAiCompatibleGateway},
    logging,
    routes::{self, AppState},
    services::ChatService,
    tools::ToolOrchestrator,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    info!("Starting FitCoach server");
    info!("{}", config.summary());

    let registry = Arc::new(ModelRegistry::from_config(&config));
    let gateway: Arc<dyn ModelGateway> =
        Arc::new(OpenAiCompatibleGateway::new(Arc::clone(&registry))?);

    let exercises = ExerciseDbClient::new()?;
    let chat = Arc::new(ChatService::new(
        Arc::clone(&gateway),
        ToolOrchestrator::new(exercises),
    ));

    let app = routes::router(AppState { chat, gateway }, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FitCoach API listening on http://{addr}");
    display_available_endpoints(config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("FitCoach server stopped");
    Ok(())
}

/// Display all available API endpoints
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available API Endpoints ===");
    info!("Chat:");
    info!("   Send Message:      POST http://{host}:{port}/chat");
    info!("   Stream Message:    POST http://{host}:{port}/chat/stream");
    info!("   List Models:       GET  http://{host}:{port}/chat/models");
    info!("Monitoring:");
    info!("   Health Check:      GET  http://{host}:{port}/api/health");
    info!("=== End of Endpoint List ===");
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
