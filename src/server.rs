use std::time::Instant;

use axum::{Router, extract::Request, middleware::Next, response::Response};
use log::info;
use tokio::net::TcpListener;

use crate::{
    config::{Config, ServiceKind},
    services::{
        aggregator, fingerprint, recommender,
        errors::Result,
    },
};

/// Router for one service, with request logging
pub fn app(kind: ServiceKind, config: &Config) -> Router {
    let router = match kind {
        ServiceKind::Aggregator => aggregator::router(),
        ServiceKind::Fingerprint => fingerprint::router(config.upload.clone()),
        ServiceKind::Recommender => recommender::router(),
    };
    router.layer(axum::middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{method} {path} -> {} in {}ms",
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(kind: ServiceKind, config: Config) -> Result<()> {
    let app = app(kind, &config);
    let listener = TcpListener::bind(config.addr).await?;
    info!("{kind} service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{kind} service stopped");
    Ok(())
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
