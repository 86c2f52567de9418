mod apis;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gridlink_driver::Conn;
use poem::listener::TcpListener;
use poem::Route;
use poem_openapi::OpenApiService;
use tracing::info;

use crate::apis::{GridlinkHealthApi, GridlinkTableApi};

/// Runs the gridlink server, serving the tables of `conn`.
pub async fn run(listen_address: SocketAddr, conn: Arc<dyn Conn>) -> Result<()> {
    run_rest_api(listen_address, conn)
        .await
        .context("Run gridlink REST API")?;

    Ok(())
}

/// Builds the routes of the REST API.
pub fn build_app(conn: Arc<dyn Conn>) -> Route {
    let api = (GridlinkHealthApi, GridlinkTableApi::new(conn));

    let api_service =
        OpenApiService::new(api, "gridlink REST API", env!("CARGO_PKG_VERSION"));
    let ui = api_service.redoc();
    Route::new()
        .nest("/api/v0", api_service)
        .nest("/api/docs", ui)
}

async fn run_rest_api(listen_address: SocketAddr, conn: Arc<dyn Conn>) -> Result<()> {
    let app = build_app(conn);

    info!(listen_addr = %listen_address, "Service API is running");
    poem::Server::new(TcpListener::bind(listen_address))
        .run_with_graceful_shutdown(
            app,
            gridlink_common::signal_handler::wait_shutdown_signal()?,
            Some(Duration::from_secs(5)),
        )
        .await?;

    Ok(())
}
