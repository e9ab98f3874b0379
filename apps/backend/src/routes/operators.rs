//! Operator directory and profile routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::pagination::{PageQuery, PageResponse};
use crate::adapters::operators_sea::OperatorUpdate;
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::operators::Role;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::OperatorId;
use crate::repos::memberships::Membership;
use crate::repos::operators::Operator;
use crate::services::operators::{OperatorProfile, OperatorService};
use crate::state::app_state::AppState;

/// Public view of an operator. Email is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorResponse {
    pub id: i64,
    pub nickname: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub engagement_score: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Operator> for OperatorResponse {
    fn from(o: Operator) -> Self {
        Self {
            id: o.id,
            nickname: o.nickname,
            full_name: o.full_name,
            avatar_url: o.avatar_url,
            role: o.role,
            verified: o.verified,
            engagement_score: o.engagement_score,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            id: m.squad_id,
            name: m.name,
            tag: m.tag,
            joined_at: m.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorProfileResponse {
    #[serde(flatten)]
    pub operator: OperatorResponse,
    pub squads: Vec<MembershipResponse>,
}

impl From<OperatorProfile> for OperatorProfileResponse {
    fn from(p: OperatorProfile) -> Self {
        Self {
            operator: p.operator.into(),
            squads: p.squads.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperatorRequest {
    pub nickname: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UpdateOperatorRequest> for OperatorUpdate {
    fn from(req: UpdateOperatorRequest) -> Self {
        OperatorUpdate {
            nickname: req.nickname,
            full_name: req.full_name,
            phone: req.phone,
            avatar_url: req.avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/operators
async fn list_operators(
    http_req: HttpRequest,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = PageRequest::new(query.page, query.limit)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(OperatorService::new().list_operators(txn, request).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, OperatorResponse::from)))
}

/// GET /api/operators/search?q=
async fn search_operators(
    http_req: HttpRequest,
    query: web::Query<SearchQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<OperatorResponse>>, AppError> {
    let q = query.into_inner().q;

    let found = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(OperatorService::new().search(txn, &q).await?) })
    })
    .await?;

    Ok(web::Json(found.into_iter().map(Into::into).collect()))
}

/// GET /api/operators/{operator_id}
async fn get_operator(
    http_req: HttpRequest,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<OperatorProfileResponse>, AppError> {
    let profile = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(OperatorService::new().get_operator(txn, operator_id.0).await?) })
    })
    .await?;

    Ok(web::Json(profile.into()))
}

/// PATCH /api/operators/{operator_id}
async fn update_operator(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    body: web::Json<UpdateOperatorRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<OperatorResponse>, AppError> {
    let actor = user.actor();
    let patch = OperatorUpdate::from(body.into_inner());

    let operator = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(OperatorService::new()
                .update_operator(txn, actor, operator_id.0, patch)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operator.into()))
}

/// DELETE /api/operators/{operator_id}
async fn deactivate_operator(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_role(&[Role::Admin])?;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(OperatorService::new().deactivate(txn, operator_id.0).await?) })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(list_operators)));
    cfg.service(web::resource("/search").route(web::get().to(search_operators)));
    cfg.service(
        web::resource("/{operator_id}")
            .route(web::get().to(get_operator))
            .route(web::patch().to(update_operator))
            .route(web::delete().to(deactivate_operator)),
    );
}
