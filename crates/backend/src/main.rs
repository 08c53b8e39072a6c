pub mod dashboards;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use anyhow::Context;
use std::sync::Arc;

use dashboards::d410_superstore::DashboardContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    // Dataset is loaded once, before the server accepts requests
    let orders_path = config.orders_path();
    let region_codes_path = config.region_codes_path();
    let context = match DashboardContext::load(&orders_path, &region_codes_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to load superstore dataset: {}", e);
            return Err(e).context(format!(
                "loading {} and {}",
                orders_path.display(),
                region_codes_path.display()
            ));
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(Arc::new(context))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
