use std::net::SocketAddr;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::gate::require_session;
use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, discovery};

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::session_router())
        .merge(discovery::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(auth::router())
        .merge(protected)
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parse listen address")?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
