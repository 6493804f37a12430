//! HTTP endpoints for backing service usage amounts:
//!
//! - `POST /usage` - resolve a backing service instance and return its usage report
//! - `POST /resolve` - resolve only, returning the amount service URI suffix
//! - `GET /services` - registered services grouped by driver
//! - `GET /healthz` - liveness probe

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use serde::Serialize;
use svcamount_api::UsageFetcher;
use svcamount_engine::UsageService;
use svcamount_registry::{Drivers, ServiceRegistry};
use svcamount_types::{BackingServiceInstance, UsageReport};
use tokio::net::TcpListener;
use tracing::{debug, info};

mod error;

pub use error::ApiError;

/// Shared handler state.
pub type SharedService<F> = Arc<UsageService<ServiceRegistry, F>>;

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub uri: String,
}

/// Build the router for a usage service.
pub fn router<F>(service: SharedService<F>) -> Router
where
    F: UsageFetcher + 'static,
{
    Router::new()
        .route("/usage", post(usage_amount::<F>))
        .route("/resolve", post(resolve_uri::<F>))
        .route("/services", get(list_services::<F>))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(service)
}

/// Serve `router` on `listener` until `shutdown` completes.
pub async fn serve(listener: TcpListener, router: Router, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    info!(address = %listener.local_addr()?, "amount server listening");
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    info!("amount server stopped");
    Ok(())
}

async fn usage_amount<F: UsageFetcher + 'static>(
    State(service): State<SharedService<F>>,
    headers: HeaderMap,
    Json(instance): Json<BackingServiceInstance>,
) -> Result<Json<UsageReport>, ApiError> {
    debug!(service = %instance.spec.backing_service_name, "POST /usage");
    let report = service.usage_amount(&instance, &headers).await?;
    Ok(Json(report))
}

async fn resolve_uri<F: UsageFetcher + 'static>(
    State(service): State<SharedService<F>>,
    Json(instance): Json<BackingServiceInstance>,
) -> Result<Json<ResolveResponse>, ApiError> {
    debug!(service = %instance.spec.backing_service_name, "POST /resolve");
    let uri = service.resolve_uri(&instance.spec.backing_service_name, &instance.spec.creds)?;
    Ok(Json(ResolveResponse { uri }))
}

async fn list_services<F: UsageFetcher + 'static>(State(service): State<SharedService<F>>) -> Json<Drivers> {
    Json(service.classifier().drivers())
}
