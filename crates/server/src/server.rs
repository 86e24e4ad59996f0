use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use {
    axum::{
        Router,
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    secrecy::{ExposeSecret, Secret},
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{debug, info, warn},
};

use {
    meishi_bot::Dispatcher,
    meishi_line::{SIGNATURE_HEADER, parse_envelope, verify_signature},
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub channel_secret: Secret<String>,
    pub download_dir: PathBuf,
    pub static_dir: PathBuf,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the webhook router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/callback", post(callback_handler))
        .route("/downloaded/{*path}", get(downloaded_file_handler))
        .route("/static/{*path}", get(static_file_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the webhook HTTP server. Runs until the process receives
/// ctrl-c, then drains in-flight requests.
pub async fn serve(app: Router, bind: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Receive one webhook delivery.
///
/// Deliveries with a bad signature are rejected before the body is
/// decoded. Once the envelope decodes, every event is dispatched and
/// the delivery is acknowledged with 200 even when handlers fail, so
/// one bad event cannot make the platform redeliver the whole batch.
async fn callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_signature(state.channel_secret.expose_secret(), &body, signature) {
        warn!("webhook delivery failed signature verification");
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }

    let envelope = match parse_envelope(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("webhook body did not decode: {e}");
            return (StatusCode::BAD_REQUEST, "malformed body").into_response();
        },
    };

    debug!(
        destination = %envelope.destination,
        events = envelope.events.len(),
        "webhook delivery received"
    );

    for event in envelope.events {
        if let Err(e) = state.dispatcher.handle_event(event).await {
            warn!("event handling failed: {e}");
        }
    }

    (StatusCode::OK, "OK").into_response()
}

// ── Media file serving ───────────────────────────────────────────────────────

async fn downloaded_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    serve_file(&state.download_dir, &path).await
}

async fn static_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    serve_file(&state.static_dir, &path).await
}

/// Serve one file from under `root`.
async fn serve_file(root: &std::path::Path, path: &str) -> axum::response::Response {
    // The capture is attacker-controlled: no dot-dot segments, no
    // absolute paths, and the joined path must stay under the root.
    if std::path::Path::new(path).is_absolute()
        || path.split('/').any(|segment| segment == "..")
    {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    let file_path = root.join(path);
    if !file_path.starts_with(root) {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }

    match tokio::fs::read(&file_path).await {
        Ok(body) => {
            (StatusCode::OK, [("content-type", mime_for_path(path))], body).into_response()
        },
        Err(_) => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a.jpg", "image/jpeg")]
    #[case("covers/b-preview.jpeg", "image/jpeg")]
    #[case("c.png", "image/png")]
    #[case("c.mp4", "video/mp4")]
    #[case("d.m4a", "audio/mp4")]
    #[case("noext", "application/octet-stream")]
    #[case("weird.xyz", "application/octet-stream")]
    fn mime_covers_materialized_extensions(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_for_path(path), expected);
    }

    #[tokio::test]
    async fn traversal_segments_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("inside.txt"), b"ok").expect("write file");

        let response = serve_file(dir.path(), "../outside.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = serve_file(dir.path(), "inside.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn absolute_captures_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, b"leak").expect("write file");

        // Joining an absolute path would replace the root entirely.
        let root = dir.path().join("files");
        let response = serve_file(&root, outside.to_str().expect("utf8 path")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
