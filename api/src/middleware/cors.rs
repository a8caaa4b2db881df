//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive so local frontends and tools can reach the API.
//! Staging and production only admit the origins listed in
//! `ServerConfig::allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use bl_shared::config::{Environment, ServerConfig};

/// Max age for preflight cache, in seconds
const PREFLIGHT_MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance configured for `environment`.
pub fn create_cors(server: &ServerConfig, environment: Environment) -> Cors {
    if environment.is_development() {
        create_development_cors()
    } else {
        create_restricted_cors(&server.allowed_origins)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS]
}

fn create_development_cors() -> Cors {
    tracing::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(PREFLIGHT_MAX_AGE)
}

fn create_restricted_cors(origins: &[String]) -> Cors {
    tracing::info!(origins = origins.len(), "Configuring CORS with allowed origins");

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(PREFLIGHT_MAX_AGE);

    for origin in origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
        tracing::debug!(origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}
