//! Back-office routes. Every handler requires the ADMIN role; mutations
//! additionally require the primary admin.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::games::{EnrolledOperatorResponse, EnrolledSquadResponse, GameResponse};
use super::pagination::PageResponse;
use super::rankings::RankingResponse;
use super::squads::SquadResponse;
use crate::adapters::operators_sea::OperatorFilter;
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::operators::Role;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::OperatorId;
use crate::repos::operators::Operator;
use crate::services::admin::{
    AdminService, AdminSquad, DashboardStats, NextGame, DEFAULT_OPERATOR_LIMIT,
};
use crate::state::app_state::AppState;

/// Full operator record, email and activity included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOperatorResponse {
    pub id: i64,
    pub nickname: String,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub engagement_score: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Operator> for AdminOperatorResponse {
    fn from(o: Operator) -> Self {
        Self {
            id: o.id,
            nickname: o.nickname,
            full_name: o.full_name,
            email: o.email,
            phone: o.phone,
            avatar_url: o.avatar_url,
            role: o.role,
            verified: o.verified,
            engagement_score: o.engagement_score,
            is_active: o.is_active,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextGameResponse {
    #[serde(flatten)]
    pub game: GameResponse,
    pub squads: Vec<EnrolledSquadResponse>,
    pub operators: Vec<EnrolledOperatorResponse>,
}

impl From<NextGame> for NextGameResponse {
    fn from(next: NextGame) -> Self {
        Self {
            game: next.game.into(),
            squads: next.squads.into_iter().map(Into::into).collect(),
            operators: next.operators.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_operators: u64,
    pub active_operators: u64,
    pub inactive_operators: u64,
    pub total_squads: u64,
    pub active_squads: u64,
    pub total_games: u64,
    pub total_payments: u64,
    pub confirmed_payments: u64,
    pub next_game: Option<NextGameResponse>,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            inactive_operators: stats.operators_inactive(),
            total_operators: stats.operators_total,
            active_operators: stats.operators_active,
            total_squads: stats.squads_total,
            active_squads: stats.squads_active,
            total_games: stats.games_total,
            total_payments: stats.payments_total,
            confirmed_payments: stats.payments_settled,
            next_game: stats.next_game.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSquadResponse {
    #[serde(flatten)]
    pub squad: SquadResponse,
    pub leader_nickname: Option<String>,
    pub ranking: Option<RankingResponse>,
}

impl From<AdminSquad> for AdminSquadResponse {
    fn from(row: AdminSquad) -> Self {
        Self {
            squad: row.squad.into(),
            leader_nickname: row.leader.map(|l| l.nickname),
            ranking: row.ranking.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstAdminResponse {
    pub is_first_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct OperatorListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct SquadListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct PointsRequest {
    pub points: i32,
}

/// GET /api/admin/stats
async fn stats(
    http_req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<web::Json<StatsResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let now = OffsetDateTime::now_utc();

    let stats = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(AdminService::new().stats(txn, now).await?) })
    })
    .await?;

    Ok(web::Json(stats.into()))
}

/// GET /api/admin/operators
async fn list_operators(
    http_req: HttpRequest,
    user: CurrentUser,
    query: web::Query<OperatorListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_role(&[Role::Admin])?;
    let OperatorListQuery {
        page,
        limit,
        search,
        role,
    } = query.into_inner();
    let request = PageRequest::new(page, Some(limit.unwrap_or(DEFAULT_OPERATOR_LIMIT)))?;
    let filter = OperatorFilter {
        search: search.filter(|s| !s.trim().is_empty()),
        role,
    };

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .list_operators(txn, filter, request)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, AdminOperatorResponse::from)))
}

/// GET /api/admin/squads
async fn list_squads(
    http_req: HttpRequest,
    user: CurrentUser,
    query: web::Query<SquadListQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<AdminSquadResponse>>, AppError> {
    user.require_role(&[Role::Admin])?;
    let search = query.into_inner().search;

    let rows = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .list_squads(txn, search.as_deref())
                .await?)
        })
    })
    .await?;

    Ok(web::Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/admin/is-first-admin
async fn is_first_admin(
    http_req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<web::Json<FirstAdminResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let actor = user.actor();

    let is_first_admin = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(AdminService::new().is_first_admin(txn, actor).await?) })
    })
    .await?;

    Ok(web::Json(FirstAdminResponse { is_first_admin }))
}

/// PATCH /api/admin/operators/{operator_id}/role
async fn change_role(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    body: web::Json<RoleRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdminOperatorResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let actor = user.actor();
    let role = body.role;

    let operator = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .change_role(txn, actor, operator_id.0, role)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operator.into()))
}

/// PATCH /api/admin/operators/{operator_id}/points
async fn set_points(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    body: web::Json<PointsRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdminOperatorResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let actor = user.actor();
    let points = body.points;

    let operator = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .set_points(txn, actor, operator_id.0, points)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operator.into()))
}

/// PATCH /api/admin/operators/{operator_id}/toggle-active
async fn toggle_active(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdminOperatorResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let actor = user.actor();

    let operator = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .toggle_active(txn, actor, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operator.into()))
}

/// PATCH /api/admin/operators/{operator_id}/toggle-verified
async fn toggle_verified(
    http_req: HttpRequest,
    user: CurrentUser,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdminOperatorResponse>, AppError> {
    user.require_role(&[Role::Admin])?;
    let actor = user.actor();

    let operator = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(AdminService::new()
                .toggle_verified(txn, actor, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operator.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stats").route(web::get().to(stats)));
    cfg.service(web::resource("/operators").route(web::get().to(list_operators)));
    cfg.service(web::resource("/squads").route(web::get().to(list_squads)));
    cfg.service(web::resource("/is-first-admin").route(web::get().to(is_first_admin)));
    cfg.service(web::resource("/operators/{operator_id}/role").route(web::patch().to(change_role)));
    cfg.service(web::resource("/operators/{operator_id}/points").route(web::patch().to(set_points)));
    cfg.service(
        web::resource("/operators/{operator_id}/toggle-active")
            .route(web::patch().to(toggle_active)),
    );
    cfg.service(
        web::resource("/operators/{operator_id}/toggle-verified")
            .route(web::patch().to(toggle_verified)),
    );
}
