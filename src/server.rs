use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::types::Update;

use crate::bot::{handle_update, BotContext};

/// header Telegram uses to echo the secret registered with setWebhook
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct WebhookState {
    pub ctx: BotContext,
    pub bot_username: Arc<str>,
    pub secret: Option<Arc<str>>,
}

pub fn router(webhook_path: &str, state: WebhookState) -> Router {
    let webhook_routes = Router::new()
        .route(webhook_path, post(receive_update))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_secret_token,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(webhook_routes)
}

pub async fn serve(
    addr: SocketAddr,
    webhook_path: &str,
    state: WebhookState,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening for updates on {}{}", addr, webhook_path);

    axum::serve(listener, router(webhook_path, state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down...");
}

async fn health() -> &'static str {
    "ok"
}

/// rejects webhook calls that don't echo the registered secret, before the body is read
async fn require_secret_token(
    State(state): State<WebhookState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(secret) = &state.secret {
        let provided = request
            .headers()
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(secret.as_ref()) {
            warn!("Rejected update with missing or wrong secret token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    Ok(next.run(request).await)
}

async fn receive_update(State(state): State<WebhookState>, Json(update): Json<Update>) -> Response {
    let update_id = update.id;
    match handle_update(&state.ctx, &state.bot_username, update).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            // internals stay in the log, the caller only learns that it failed
            error!("Failed to handle update {:?}: {}", update_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}
