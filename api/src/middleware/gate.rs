//! Bearer token gate for protected endpoints.
//!
//! Checks only the presence and shape of the `Authorization` header. The token
//! itself is handed to handlers as an [`AccessToken`] request extension;
//! whether it is valid is for the access authority to decide.

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use crate::extractors::AccessToken;
use crate::handlers::error::ApiError;

/// Middleware factory requiring `Authorization: Bearer <token>`
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerGate;

impl BearerGate {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Non-ASCII header values fail the shape check
            let header = req.headers().get(AUTHORIZATION).map(|value| {
                value
                    .to_str()
                    .map(str::to_string)
                    .unwrap_or_else(|_| "invalid".to_string())
            });

            let token = match parse_authorization(header.as_deref()) {
                Ok(token) => token,
                Err(rejection) => {
                    tracing::debug!(path = %req.path(), error = %rejection, "Bearer gate rejected request");
                    let response = rejection.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(token);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Parse an `Authorization` header value into the bearer token it carries
pub fn parse_authorization(header: Option<&str>) -> Result<AccessToken, ApiError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(ApiError::unauthorized(
                "Authentication required",
                "Authorization header is missing",
            ))
        }
    };

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(ApiError::unauthorized(
            "Invalid authentication format",
            "Authorization header format must be Bearer <token>",
        ));
    }

    if parts[1].is_empty() {
        return Err(ApiError::unauthorized(
            "Invalid authentication",
            "Empty token provided",
        ));
    }

    Ok(AccessToken::new(parts[1]))
}
