//! HTTP surface over [`SquadRec`](crate::SquadRec).

pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::SquadRec;
use handlers::*;

pub type AppState = Arc<SquadRec>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/current_squad", get(current_squad_handler))
        .route("/add_player", post(add_player_handler))
        .route("/remove_player", post(remove_player_handler))
        .route("/update_current_squad", post(update_squad_handler))
        .route("/apply_swaps", post(apply_swaps_handler))
        .route("/players", get(players_handler))
        .route("/recommend_substitutes", post(recommend_handler))
        .route("/recommend_individual", post(recommend_individual_handler))
        .route("/analyze_squad", get(analyze_handler))
        .route("/simulate_substitutions", post(simulate_handler))
        .route("/refresh_costs", post(refresh_costs_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
