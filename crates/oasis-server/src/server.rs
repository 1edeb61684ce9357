use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use oasis_auth::{
    AuthorizeContext, AuthorizeEndpoint, DefaultAuthorizeDecoder, DefaultResponseEncoder,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::AppConfig,
    flow::{StagedDecoder, build_mux},
    handlers,
    tokens::{InMemoryTokenStorage, UuidTokenFactory},
};

pub struct OasisServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the authorization endpoint with in-memory token collaborators.
pub fn build_endpoint(cfg: &AppConfig) -> AuthorizeEndpoint {
    let context = AuthorizeContext::new()
        .with_token_factory(Arc::new(UuidTokenFactory))
        .with_token_storage(Arc::new(InMemoryTokenStorage::new()));
    let decoder = StagedDecoder::new(DefaultAuthorizeDecoder::from_config(&cfg.auth));
    AuthorizeEndpoint::new(context, decoder, build_mux(&cfg.auth), DefaultResponseEncoder)
}

pub fn build_app(cfg: &AppConfig) -> Router {
    build_endpoint(cfg)
        .into_router(&cfg.server.authorize_path)
        .route("/healthz", get(handlers::healthz))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    // the query string carries state and usernames; keep it out of spans
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> OasisServer {
        tracing::info!(
            path = %self.config.server.authorize_path,
            response_types = ?self.config.auth.allowed_response_types,
            "Authorization endpoint configured"
        );
        let app = build_app(&self.config);

        OasisServer {
            addr: self.addr,
            app,
        }
    }
}

impl OasisServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
