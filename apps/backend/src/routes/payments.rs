//! Payment record routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::pagination::{PageQuery, PageResponse};
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::operators::Role;
use crate::entities::payments::{PaymentMethod, PaymentStatus};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::{OperatorId, PaymentId};
use crate::repos::payments::Payment;
use crate::services::payments::{NewPayment, PaymentService};
use crate::state::app_state::AppState;

const PAYMENT_STAFF: [Role; 2] = [Role::Organizer, Role::Admin];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i64,
    pub operator_id: i64,
    pub game_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            operator_id: p.operator_id,
            game_id: p.game_id,
            amount: p.amount,
            method: p.method,
            status: p.status,
            paid_at: p.paid_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub operator_id: i64,
    pub game_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
}

impl From<CreatePaymentRequest> for NewPayment {
    fn from(req: CreatePaymentRequest) -> Self {
        NewPayment {
            operator_id: req.operator_id,
            game_id: req.game_id,
            amount: req.amount,
            method: req.method,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: PaymentStatus,
}

/// POST /api/payments
async fn create_payment(
    http_req: HttpRequest,
    user: CurrentUser,
    body: web::Json<CreatePaymentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let input = NewPayment::from(body.into_inner());

    let payment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PaymentService::new().create_payment(txn, actor, input).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// GET /api/payments
async fn list_payments(
    http_req: HttpRequest,
    user: CurrentUser,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_role(&PAYMENT_STAFF)?;
    let actor = user.actor();
    let request = PageRequest::new(query.page, query.limit)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PaymentService::new()
                .list_payments(txn, actor, request)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, PaymentResponse::from)))
}

/// GET /api/payments/operator/{operator_id}
async fn list_operator_payments(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<PaymentResponse>>, AppError> {
    let actor = user.actor();

    let payments = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PaymentService::new()
                .list_for_operator(txn, actor, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(payments.into_iter().map(Into::into).collect()))
}

/// GET /api/payments/{payment_id}
async fn get_payment(
    http_req: HttpRequest,
    user: CurrentUser,
    payment_id: PaymentId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PaymentResponse>, AppError> {
    let actor = user.actor();

    let payment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PaymentService::new()
                .get_payment(txn, actor, payment_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(payment.into()))
}

/// PATCH /api/payments/{payment_id}/status
async fn update_status(
    http_req: HttpRequest,
    user: CurrentUser,
    payment_id: PaymentId,
    body: web::Json<StatusRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PaymentResponse>, AppError> {
    user.require_role(&PAYMENT_STAFF)?;
    let actor = user.actor();
    let status = body.status;

    let payment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PaymentService::new()
                .update_status(txn, actor, payment_id.0, status)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(payment.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_payments))
            .route(web::post().to(create_payment)),
    );
    cfg.service(
        web::resource("/operator/{operator_id}").route(web::get().to(list_operator_payments)),
    );
    cfg.service(web::resource("/{payment_id}").route(web::get().to(get_payment)));
    cfg.service(web::resource("/{payment_id}/status").route(web::patch().to(update_status)));
}
