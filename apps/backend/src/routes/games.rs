//! Game catalogue and enrollment routes.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::pagination::PageResponse;
use crate::adapters::games_sea::{GameCreate, GameUpdate};
use crate::db::txn::with_txn;
use crate::domain::pagination::PageRequest;
use crate::entities::games::{GameStatus, GameType};
use crate::entities::operators::Role;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::path_ids::{GameId, OperatorId, SquadId};
use crate::repos::enrollments::{EnrolledOperator, EnrolledSquad};
use crate::repos::games::Game;
use crate::services::enrollment::EnrollmentService;
use crate::services::games::{GameDetail, GameService};
use crate::state::app_state::AppState;

const GAME_EDITORS: [Role; 2] = [Role::Organizer, Role::Admin];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    pub game_type: GameType,
    pub status: GameStatus,
    pub max_players: Option<i32>,
    pub current_players: i32,
    pub registration_fee: f64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            name: game.name,
            description: game.description,
            location: game.location,
            start_date: game.start_date,
            end_date: game.end_date,
            game_type: game.game_type,
            status: game.status,
            max_players: game.max_players,
            current_players: game.current_players,
            registration_fee: game.registration_fee,
            is_active: game.is_active,
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledSquadResponse {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub total_members: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<EnrolledSquad> for EnrolledSquadResponse {
    fn from(s: EnrolledSquad) -> Self {
        Self {
            id: s.squad_id,
            name: s.name,
            tag: s.tag,
            total_members: s.total_members,
            joined_at: s.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailResponse {
    #[serde(flatten)]
    pub game: GameResponse,
    pub squads: Vec<EnrolledSquadResponse>,
}

impl From<GameDetail> for GameDetailResponse {
    fn from(detail: GameDetail) -> Self {
        Self {
            game: detail.game.into(),
            squads: detail.squads.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledOperatorResponse {
    pub id: i64,
    pub nickname: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<EnrolledOperator> for EnrolledOperatorResponse {
    fn from(o: EnrolledOperator) -> Self {
        Self {
            id: o.operator_id,
            nickname: o.nickname,
            role: o.role,
            joined_at: o.joined_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    pub game_type: Option<GameType>,
    pub max_players: Option<i32>,
    pub registration_fee: Option<f64>,
}

impl From<CreateGameRequest> for GameCreate {
    fn from(req: CreateGameRequest) -> Self {
        GameCreate {
            name: req.name,
            description: req.description,
            location: req.location,
            start_date: req.start_date,
            end_date: req.end_date,
            game_type: req.game_type.unwrap_or(GameType::Milsim),
            max_players: req.max_players,
            registration_fee: req.registration_fee.unwrap_or(0.0),
        }
    }
}

/// Absent field = unchanged; explicit `null` = cleared.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn nullable_datetime<'de, D>(deserializer: D) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    time::serde::rfc3339::option::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "nullable_datetime")]
    pub end_date: Option<Option<OffsetDateTime>>,
    pub game_type: Option<GameType>,
    pub status: Option<GameStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_players: Option<Option<i32>>,
    pub registration_fee: Option<f64>,
}

impl From<UpdateGameRequest> for GameUpdate {
    fn from(req: UpdateGameRequest) -> Self {
        GameUpdate {
            name: req.name,
            description: req.description,
            location: req.location,
            start_date: req.start_date,
            end_date: req.end_date,
            game_type: req.game_type,
            status: req.status,
            max_players: req.max_players,
            registration_fee: req.registration_fee,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<GameStatus>,
}

/// GET /api/games
async fn list_games(
    http_req: HttpRequest,
    query: web::Query<ListGamesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ListGamesQuery {
        page,
        limit,
        status,
    } = query.into_inner();
    let request = PageRequest::new(page, limit)?;

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(GameService::new().list_games(txn, status, request).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(PageResponse::from_page(page, GameResponse::from)))
}

/// POST /api/games
async fn create_game(
    http_req: HttpRequest,
    user: CurrentUser,
    body: web::Json<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_role(&GAME_EDITORS)?;
    let dto = GameCreate::from(body.into_inner());

    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(GameService::new().create_game(txn, dto).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(GameResponse::from(game)))
}

/// GET /api/games/{game_id}
async fn get_game(
    http_req: HttpRequest,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameDetailResponse>, AppError> {
    let detail = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(GameService::new().get_game(txn, game_id.0).await?) })
    })
    .await?;

    Ok(web::Json(detail.into()))
}

/// PATCH /api/games/{game_id}
async fn update_game(
    http_req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    body: web::Json<UpdateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameResponse>, AppError> {
    user.require_role(&GAME_EDITORS)?;
    let patch = GameUpdate::from(body.into_inner());

    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(GameService::new().update_game(txn, game_id.0, patch).await?) })
    })
    .await?;

    Ok(web::Json(game.into()))
}

/// GET /api/games/{game_id}/operators
async fn list_game_operators(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<EnrolledOperatorResponse>>, AppError> {
    let operators = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(GameService::new()
                .list_game_operators(txn, game_id.0)
                .await?)
        })
    })
    .await?;

    Ok(web::Json(operators.into_iter().map(Into::into).collect()))
}

/// POST /api/games/{game_id}/register/{squad_id}
async fn register_squad(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnrollmentService::new()
                .register_squad(txn, game_id.0, squad_id.0)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/games/{game_id}/register/{squad_id}
async fn unregister_squad(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    squad_id: SquadId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnrollmentService::new()
                .unregister_squad(txn, game_id.0, squad_id.0)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/games/{game_id}/register-operator/{operator_id}
async fn register_operator(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnrollmentService::new()
                .register_operator(txn, game_id.0, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/games/{game_id}/register-operator/{operator_id}
async fn unregister_operator(
    http_req: HttpRequest,
    _user: CurrentUser,
    game_id: GameId,
    operator_id: OperatorId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnrollmentService::new()
                .unregister_operator(txn, game_id.0, operator_id.0)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_games))
            .route(web::post().to(create_game)),
    );
    cfg.service(
        web::resource("/{game_id}")
            .route(web::get().to(get_game))
            .route(web::patch().to(update_game)),
    );
    cfg.service(web::resource("/{game_id}/operators").route(web::get().to(list_game_operators)));
    cfg.service(
        web::resource("/{game_id}/register/{squad_id}")
            .route(web::post().to(register_squad))
            .route(web::delete().to(unregister_squad)),
    );
    cfg.service(
        web::resource("/{game_id}/register-operator/{operator_id}")
            .route(web::post().to(register_operator))
            .route(web::delete().to(unregister_operator)),
    );
}
