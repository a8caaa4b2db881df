//! Application factory
//!
//! Builds the actix-web `App` from shared state so that `main` and the
//! integration tests run the exact same wiring.

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;

use crate::extractors::{json_config, query_config};
use crate::handlers::not_found;
use crate::routes;
use crate::state::AppState;

/// Create the application with all routes, extractor configs and middleware
///
/// `max_payload` bounds JSON bodies in bytes.
pub fn create_app(
    state: web::Data<AppState>,
    cors: Cors,
    max_payload: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config(max_payload))
        .app_data(query_config())
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::to(not_found))
}
