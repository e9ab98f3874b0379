//! Squad, membership and join-request routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::pagination::{PageQuery, PageResponse};
use super::rankings::RankingResponse;
use crate::adapters::squads_sea::SquadUpdate;
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::games::GameStatus;
use crate::entities::join_requests::JoinRequestStatus;
use crate::entities::operators::Role;
use crate::entities::squads::Specialty;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::{JoinRequestId, OperatorId, SquadId};
use crate::repos::enrollments::SquadGame;
use crate::repos::memberships::{JoinRequest, PendingJoinRequest, SquadMember};
use crate::repos::squads::Squad;
use crate::services::squads::{NewSquad, SquadDetail, SquadService};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadResponse {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Specialty,
    pub state: Option<String>,
    pub leader_id: Option<i64>,
    pub total_members: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Squad> for SquadResponse {
    fn from(squad: Squad) -> Self {
        Self {
            id: squad.id,
            name: squad.name,
            tag: squad.tag,
            description: squad.description,
            specialty: squad.specialty,
            state: squad.state,
            leader_id: squad.leader_id,
            total_members: squad.total_members,
            is_active: squad.is_active,
            created_at: squad.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadMemberResponse {
    pub id: i64,
    pub nickname: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<SquadMember> for SquadMemberResponse {
    fn from(m: SquadMember) -> Self {
        Self {
            id: m.operator_id,
            nickname: m.nickname,
            full_name: m.full_name,
            avatar_url: m.avatar_url,
            role: m.role,
            joined_at: m.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadGameResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    pub status: GameStatus,
}

impl From<SquadGame> for SquadGameResponse {
    fn from(g: SquadGame) -> Self {
        Self {
            id: g.game_id,
            name: g.name,
            start_date: g.start_date,
            status: g.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadDetailResponse {
    #[serde(flatten)]
    pub squad: SquadResponse,
    pub members: Vec<SquadMemberResponse>,
    pub ranking: Option<RankingResponse>,
    pub recent_games: Vec<SquadGameResponse>,
}

impl From<SquadDetail> for SquadDetailResponse {
    fn from(detail: SquadDetail) -> Self {
        Self {
            squad: detail.squad.into(),
            members: detail.members.into_iter().map(Into::into).collect(),
            ranking: detail.ranking.map(Into::into),
            recent_games: detail.recent_games.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestResponse {
    pub id: i64,
    pub squad_id: i64,
    pub operator_id: i64,
    pub status: JoinRequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<JoinRequest> for JoinRequestResponse {
    fn from(r: JoinRequest) -> Self {
        Self {
            id: r.id,
            squad_id: r.squad_id,
            operator_id: r.operator_id,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingJoinRequestResponse {
    #[serde(flatten)]
    pub request: JoinRequestResponse,
    pub nickname: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<PendingJoinRequest> for PendingJoinRequestResponse {
    fn from(p: PendingJoinRequest) -> Self {
        Self {
            request: p.request.into(),
            nickname: p.nickname,
            full_name: p.full_name,
            avatar_url: p.avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSquadRequest {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<Specialty>,
    pub state: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

impl From<CreateSquadRequest> for NewSquad {
    fn from(req: CreateSquadRequest) -> Self {
        NewSquad {
            name: req.name,
            tag: req.tag,
            description: req.description,
            specialty: req.specialty,
            state: req.state,
            member_ids: req.member_ids,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSquadRequest {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<Specialty>,
    pub state: Option<String>,
}

impl From<UpdateSquadRequest> for SquadUpdate {
    fn from(req: UpdateSquadRequest) -> Self {
        SquadUpdate {
            name: req.name,
            tag: req.tag,
            description: req.description,
            specialty: req.specialty,
            state: req.state,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub operator_id: i64,
}

/// GET /api/squads
async fn list_squads(
    http_req: HttpRequest,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = PageRequest::new(query.page, query.limit)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SquadService::new().list_squads(txn, request).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, SquadResponse::from)))
}

/// POST /api/squads
async fn create_squad(
    http_req: HttpRequest,
    user: CurrentUser,
    body: web::Json<CreateSquadRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let input = NewSquad::from(body.into_inner());

    let squad = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SquadService::new().create_squad(txn, actor, input).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(SquadResponse::from(squad)))
}

/// GET /api/squads/{squad_id}
async fn get_squad(
    http_req: HttpRequest,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<SquadDetailResponse>, AppError> {
    let detail = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SquadService::new().get_squad(txn, squad_id.0).await?) })
    })
    .await?;

    Ok(web::Json(detail.into()))
}

/// PATCH /api/squads/{squad_id}
async fn update_squad(
    http_req: HttpRequest,
    user: CurrentUser,
    squad_id: SquadId,
    body: web::Json<UpdateSquadRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<SquadResponse>, AppError> {
    let actor = user.actor();
    let patch = SquadUpdate::from(body.into_inner());

    let squad = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(SquadService::new()
                .update_squad(txn, actor, squad_id.0, patch)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(squad.into()))
}

/// POST /api/squads/{squad_id}/members
async fn add_member(
    http_req: HttpRequest,
    user: CurrentUser,
    squad_id: SquadId,
    body: web::Json<AddMemberRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let operator_id = body.operator_id;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(SquadService::new()
                .add_member(txn, actor, squad_id.0, operator_id)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/squads/{squad_id}/members/{operator_id}
async fn remove_member(
    http_req: HttpRequest,
    user: CurrentUser,
    squad_id: SquadId,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(SquadService::new()
                .remove_member(txn, actor, squad_id.0, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/squads/{squad_id}/join-requests
async fn request_join(
    http_req: HttpRequest,
    user: CurrentUser,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();

    let request = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(SquadService::new().request_join(txn, actor, squad_id.0).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(JoinRequestResponse::from(request)))
}

/// GET /api/squads/{squad_id}/join-requests
async fn list_join_requests(
    http_req: HttpRequest,
    user: CurrentUser,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<PendingJoinRequestResponse>>, AppError> {
    let actor = user.actor();

    let pending = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(SquadService::new()
                .list_join_requests(txn, actor, squad_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(pending.into_iter().map(Into::into).collect()))
}

async fn respond(
    http_req: HttpRequest,
    user: CurrentUser,
    request_id: JoinRequestId,
    app_state: web::Data<AppState>,
    accept: bool,
) -> Result<web::Json<JoinRequestResponse>, AppError> {
    let actor = user.actor();

    let request = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(SquadService::new()
                .respond_join_request(txn, actor, request_id.0, accept)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(request.into()))
}

/// PATCH /api/squads/join-requests/{request_id}/accept
async fn accept_join_request(
    http_req: HttpRequest,
    user: CurrentUser,
    request_id: JoinRequestId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<JoinRequestResponse>, AppError> {
    respond(http_req, user, request_id, app_state, true).await
}

/// PATCH /api/squads/join-requests/{request_id}/reject
async fn reject_join_request(
    http_req: HttpRequest,
    user: CurrentUser,
    request_id: JoinRequestId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<JoinRequestResponse>, AppError> {
    respond(http_req, user, request_id, app_state, false).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/join-requests/{request_id}/accept")
            .route(web::patch().to(accept_join_request)),
    );
    cfg.service(
        web::resource("/join-requests/{request_id}/reject")
            .route(web::patch().to(reject_join_request)),
    );
    cfg.service(
        web::resource("")
            .route(web::get().to(list_squads))
            .route(web::post().to(create_squad)),
    );
    cfg.service(
        web::resource("/{squad_id}")
            .route(web::get().to(get_squad))
            .route(web::patch().to(update_squad)),
    );
    cfg.service(web::resource("/{squad_id}/members").route(web::post().to(add_member)));
    cfg.service(
        web::resource("/{squad_id}/members/{operator_id}")
            .route(web::delete().to(remove_member)),
    );
    cfg.service(
        web::resource("/{squad_id}/join-requests")
            .route(web::post().to(request_join))
            .route(web::get().to(list_join_requests)),
    );
}
