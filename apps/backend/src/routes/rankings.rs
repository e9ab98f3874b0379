//! Leaderboard and recalculation routes.

use actix_web::{web, HttpRequest};
use serde::Serialize;

use super::pagination::{PageQuery, PageResponse};
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::operators::Role;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::SquadId;
use crate::repos::rankings::LeaderboardEntry;
use crate::services::rankings::RankingService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub position: i32,
    pub squad_id: i64,
    pub squad_name: String,
    pub squad_tag: Option<String>,
    pub total_points: i32,
    pub games_played: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub win_rate: f64,
    pub total_eliminations: i32,
    pub average_eliminations_per_game: f64,
}

impl From<LeaderboardEntry> for RankingResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        let r = entry.ranking;
        Self {
            position: r.position,
            squad_id: r.squad_id,
            squad_name: entry.squad_name,
            squad_tag: entry.squad_tag,
            total_points: r.total_points,
            games_played: r.games_played,
            games_won: r.games_won,
            games_lost: r.games_lost,
            win_rate: r.win_rate,
            total_eliminations: r.total_eliminations,
            average_eliminations_per_game: r.average_eliminations_per_game,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub processed: usize,
}

/// GET /api/rankings
async fn leaderboard(
    http_req: HttpRequest,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<PageResponse<RankingResponse>>, AppError> {
    let request = PageRequest::new(query.page, query.limit)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(RankingService::new().leaderboard(txn, request).await?) })
    })
    .await?;

    Ok(web::Json(PageResponse::from_page(page, RankingResponse::from)))
}

/// GET /api/rankings/squad/{squad_id}
async fn squad_ranking(
    http_req: HttpRequest,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RankingResponse>, AppError> {
    let entry = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(RankingService::new().squad_ranking(txn, squad_id.0).await?) })
    })
    .await?;

    Ok(web::Json(entry.into()))
}

/// POST /api/rankings/recalculate
async fn recalculate(
    http_req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RecalculateResponse>, AppError> {
    user.require_role(&[Role::Admin])?;

    let processed = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(RankingService::new().recalculate(txn).await?) })
    })
    .await?;

    Ok(web::Json(RecalculateResponse { processed }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(leaderboard)));
    cfg.service(web::resource("/squad/{squad_id}").route(web::get().to(squad_ranking)));
    cfg.service(web::resource("/recalculate").route(web::post().to(recalculate)));
}
