//! Positive integer ids taken from the route path.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

fn parse_id(req: &HttpRequest, key: &str) -> Result<i64, AppError> {
    let raw = req.match_info().get(key).ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidId, format!("Missing {key} parameter"))
    })?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidId,
            format!("{key} must be a positive integer, got '{raw}'"),
        )),
    }
}

macro_rules! path_id {
    ($name:ident, $key:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = AppError;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_id(req, $key).map($name))
            }
        }
    };
}

path_id!(GameId, "game_id");
path_id!(SquadId, "squad_id");
path_id!(OperatorId, "operator_id");
path_id!(JoinRequestId, "request_id");
path_id!(PaymentId, "payment_id");
