//! Token extraction middleware.
//!
//! Looks for the session cookie first, then `Authorization: Bearer`. A valid
//! token puts its `Claims` into request extensions; a present but invalid
//! token short-circuits with 401; no token lets the request through
//! anonymously so public endpoints keep working. Handlers that need a caller
//! use the `CurrentUser` extractor.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookie_token = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let token = match cookie_token {
            Some(token) => Some(token),
            None => match bearer_token(req.headers().get(header::AUTHORIZATION)) {
                Ok(token) => token,
                Err(err) => return reject(req, err),
            },
        };

        let Some(token) = token else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        };

        let verified = match req.app_data::<web::Data<AppState>>() {
            Some(state) => verify_access_token(&token, &state.security),
            None => Err(AppError::internal("AppState not available")),
        };

        match verified {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                debug!(error = %err, "Rejected access token");
                reject(req, err)
            }
        }
    }
}

/// Build the error response inside the returned future so it is rendered
/// under the request's trace context.
fn reject<B: 'static>(
    req: ServiceRequest,
    err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    Box::pin(async move { Ok(req.error_response(err).map_into_right_body()) })
}

/// `Ok(None)` when there is no Authorization header at all.
fn bearer_token(value: Option<&HeaderValue>) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(Some(token.to_string())),
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}
