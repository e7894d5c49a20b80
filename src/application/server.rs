#[cfg(test)]
#[path = "server_test.rs"]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use axum::extract::multipart::MultipartRejection;
use axum::extract::DefaultBodyLimit;
use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::domain::models::Attachment;
use crate::domain::models::ChatError;
use crate::domain::models::ChatResponse;
use crate::domain::models::ErrorResponse;
use crate::domain::services::validate_request;
use crate::domain::services::Dispatcher;

/// Room for the multipart framing and text fields on top of the largest
/// attachment.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.to_string(),
        };

        return (status, Json(body)).into_response();
    }
}

fn bad_form(err: impl std::fmt::Display) -> ChatError {
    tracing::debug!(error = %err, "Rejected multipart form");
    return ChatError::Validation("Request must be a valid multipart form.".to_string());
}

async fn health_check() -> impl IntoResponse {
    return Json(json!({ "status": "ok" }));
}

async fn chat(
    State(dispatcher): State<Arc<Dispatcher>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let mut multipart = multipart.map_err(bad_form)?;
    let mut message: Option<String> = None;
    let mut history: Option<String> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => message = Some(field.text().await.map_err(bad_form)?),
            "history" => history = Some(field.text().await.map_err(bad_form)?),
            "file" => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                if !bytes.is_empty() {
                    attachment = Some(Attachment::new(&file_name, &mime_type, bytes.to_vec()));
                }
            }
            name => {
                tracing::debug!(field = name, "Ignoring unknown form field");
            }
        }
    }

    let req = validate_request(message.as_deref(), history.as_deref(), attachment)?;
    let res = dispatcher.handle(req).await;
    if let Err(err) = &res {
        tracing::warn!(status = err.status_code(), error = %err, "Chat request failed");
    }

    return Ok(Json(res?));
}

pub fn router(dispatcher: Arc<Dispatcher>, attachment_max_bytes: usize) -> Router {
    return Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(
            attachment_max_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher);
}

pub async fn start(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| return format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?err, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    return Ok(());
}
