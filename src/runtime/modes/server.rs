//! Server mode
//!
//! Starts the relay endpoint that receives analytics snapshots.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::analytics_routes;
use crate::config::ServerConfig;
use crate::runtime::shutdown;

/// 请求体上限：1 MiB
pub const PAYLOAD_LIMIT: usize = 1024 * 1024;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(server: &ServerConfig) {
    if server.allowed_origins.is_empty() {
        warn!(
            "allowed_origins is empty. Only same-origin pages can submit analytics. \
            Set server.allowed_origins to the invitation site, or '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from the allowed origins
///
/// - empty: same-origin only
/// - contains `*`: any origin
pub fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();
    let server_config = config.server.clone();

    validate_cors_config(&server_config);

    let cpu_count = server_config.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let allowed_origins = server_config.allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&allowed_origins))
            .wrap(Compress::default())
            .app_data(web::PayloadConfig::new(PAYLOAD_LIMIT))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .service(analytics_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
