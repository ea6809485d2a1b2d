mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{locations, map, plans, routes, stations, vehicles};

pub fn app(api: DynAPI) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/vehicles", get(vehicles::list))
        .route("/vehicles/:id", get(vehicles::find))
        .route("/locations", post(locations::resolve))
        .route("/routes", post(routes::create))
        .route("/plans", post(plans::create))
        .route("/plans/geojson", post(plans::geojson))
        .route("/stations", get(stations::find))
        .route("/map", get(map::page))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = app(Arc::new(api) as DynAPI);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            tracing::error!(%err, "server error");
            unexpected_error()
        })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}

async fn health() -> &'static str {
    "ok"
}
