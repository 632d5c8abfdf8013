use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use common::CompetitionMode;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{competition, fish, user_competition};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::competition::{
    CompetitionDetail, CompetitionDetailResponse, CompetitionListItem, CompetitionRankingResponse,
    CompetitionResponse, CompetitionSearchQuery, CreateCompetitionRequest, ParticipationResponse,
    RankingQuery, UpdateCompetitionRequest, merged_rules_are_valid, validate_create_competition,
    validate_update_competition,
};
use crate::models::shared::{
    ActionResponse, CountResponse, ListResponse, WindowQuery, validate_limit,
};
use crate::services::ranking;
use crate::state::AppState;
use crate::utils::lookup::{self, find_competition};
use crate::utils::time::now_millis;

/// Number of leaders embedded in the competition detail.
const DETAIL_PODIUM: u64 = 3;

async fn list_items<C: ConnectionTrait>(
    db: &C,
    competitions: Vec<competition::Model>,
) -> Result<Vec<CompetitionListItem>, AppError> {
    let names =
        lookup::fish_type_names(db, competitions.iter().filter_map(|c| c.fish_type_id)).await?;
    Ok(competitions
        .into_iter()
        .map(|c| CompetitionListItem {
            fish_type_name: c.fish_type_id.and_then(|id| names.get(&id).cloned()),
            competition: c.into(),
        })
        .collect())
}

/// Count the matches of `select`, then load the requested window of them.
async fn fetch_window<C: ConnectionTrait>(
    db: &C,
    select: Select<competition::Entity>,
    window: &WindowQuery,
) -> Result<ListResponse<CompetitionListItem>, AppError> {
    validate_limit(window.limit)?;
    let total = select.clone().count(db).await?;
    let rows = select
        .limit(window.limit)
        .offset(window.offset)
        .all(db)
        .await?;
    Ok(ListResponse::counted(list_items(db, rows).await?, total))
}

fn running_at(now: i64) -> Condition {
    Condition::all()
        .add(competition::Column::StartDate.lte(now))
        .add(competition::Column::EndDate.gt(now))
}

fn quest_modes() -> impl Iterator<Item = CompetitionMode> {
    CompetitionMode::ALL.iter().copied().filter(|m| m.is_quest())
}

#[utoipa::path(
    post,
    path = "/competitions",
    tag = "Competitions",
    operation_id = "createCompetition",
    summary = "Register a competition",
    description = "Creates a competition. Requires `competition:manage`. Returns `COMPETITION.REGISTER` and the new id.",
    request_body = CreateCompetitionRequest,
    responses(
        (status = 200, description = "Competition created", body = ActionResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invalid field or unknown fish type (REJECTED, NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCompetitionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("competition:manage")?;
    validate_create_competition(&payload)?;
    if let Some(type_id) = payload.fish_type_id {
        lookup::require_fish_type(&state.db, type_id).await?;
    }

    let model = competition::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        competition_type: Set(payload.competition_type),
        description: Set(payload.description),
        fish_type_id: Set(payload.fish_type_id),
        mode: Set(payload.mode),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        rank_fish_number: Set(payload.rank_fish_number),
        quest_fish_width: Set(payload.quest_fish_width),
        quest_special_width: Set(payload.quest_special_width),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(competition_id = model.id, mode = %model.mode, "Competition registered");
    Ok(Json(ActionResponse::created("COMPETITION.REGISTER", model.id)))
}

#[utoipa::path(
    get,
    path = "/competitions",
    tag = "Competitions",
    operation_id = "listCompetitions",
    summary = "List all competitions",
    params(WindowQuery),
    responses(
        (status = 200, description = "Competitions, oldest first", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_competitions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let select = competition::Entity::find().order_by_asc(competition::Column::Id);
    Ok(Json(fetch_window(&state.db, select, &query).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/upcoming",
    tag = "Competitions",
    operation_id = "listUpcomingCompetitions",
    summary = "List competitions that have not started",
    params(WindowQuery),
    responses(
        (status = 200, description = "Upcoming competitions, soonest first", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_upcoming(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let select = competition::Entity::find()
        .filter(competition::Column::StartDate.gt(now_millis()))
        .order_by_asc(competition::Column::StartDate)
        .order_by_asc(competition::Column::Id);
    Ok(Json(fetch_window(&state.db, select, &query).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/in-progress",
    tag = "Competitions",
    operation_id = "listInProgressCompetitions",
    summary = "List running competitions",
    description = "Competitions whose `[start_date, end_date)` window contains the current time.",
    params(WindowQuery),
    responses(
        (status = 200, description = "Running competitions, ending soonest first", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_in_progress(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let select = competition::Entity::find()
        .filter(running_at(now_millis()))
        .order_by_asc(competition::Column::EndDate)
        .order_by_asc(competition::Column::Id);
    Ok(Json(fetch_window(&state.db, select, &query).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/ranked",
    tag = "Competitions",
    operation_id = "listRankedCompetitions",
    summary = "List top-sum competitions",
    params(WindowQuery),
    responses(
        (status = 200, description = "Competitions in mode 1", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_ranked(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let select = competition::Entity::find()
        .filter(competition::Column::Mode.eq(CompetitionMode::TopSum))
        .order_by_desc(competition::Column::StartDate)
        .order_by_asc(competition::Column::Id);
    Ok(Json(fetch_window(&state.db, select, &query).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/quests",
    tag = "Competitions",
    operation_id = "listQuestCompetitions",
    summary = "List quest competitions",
    params(WindowQuery),
    responses(
        (status = 200, description = "Competitions in modes 2-5", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_quests(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let select = competition::Entity::find()
        .filter(competition::Column::Mode.is_in(quest_modes()))
        .order_by_desc(competition::Column::StartDate)
        .order_by_asc(competition::Column::Id);
    Ok(Json(fetch_window(&state.db, select, &query).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/search",
    tag = "Competitions",
    operation_id = "searchCompetitions",
    summary = "Search competitions by type, mode class and status",
    params(CompetitionSearchQuery),
    responses(
        (status = 200, description = "Matching competitions", body = ListResponse<CompetitionListItem>),
        (status = 404, description = "Unknown filter value or zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_competitions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompetitionSearchQuery>,
) -> Result<Json<ListResponse<CompetitionListItem>>, AppError> {
    let now = now_millis();
    let mut select = competition::Entity::find();

    if let Some(competition_type) = query.competition_type {
        select = select.filter(competition::Column::CompetitionType.eq(competition_type));
    }
    select = match query.mode {
        None => select,
        Some(1) => select.filter(competition::Column::Mode.eq(CompetitionMode::TopSum)),
        Some(2) => select.filter(competition::Column::Mode.is_in(quest_modes())),
        Some(_) => return Err(AppError::Rejected("COMPETITION.INVALID_FILTER")),
    };
    select = match query.status {
        None => select,
        Some(1) => select.filter(competition::Column::EndDate.lte(now)),
        Some(2) => select.filter(running_at(now)),
        Some(3) => select.filter(competition::Column::StartDate.gt(now)),
        Some(_) => return Err(AppError::Rejected("COMPETITION.INVALID_FILTER")),
    };

    let select = select
        .order_by_desc(competition::Column::StartDate)
        .order_by_asc(competition::Column::Id);
    let window = WindowQuery {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(fetch_window(&state.db, select, &window).await?))
}

#[utoipa::path(
    get,
    path = "/competitions/{id}",
    tag = "Competitions",
    operation_id = "getCompetition",
    summary = "Get a competition",
    description = "Returns the competition with its participant count, its three leaders and whether the caller has joined. The token is optional.",
    params(("id" = i32, Path, description = "Competition ID")),
    responses(
        (status = 200, description = "Competition detail", body = CompetitionDetailResponse),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_competition(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CompetitionDetailResponse>, AppError> {
    let model = find_competition(&state.db, id).await?;
    let caller = auth_user.map(|u| u.user_id);

    let user_count = user_competition::Entity::find()
        .filter(user_competition::Column::CompetitionId.eq(id))
        .count(&state.db)
        .await?;
    let my_status = match caller {
        Some(uid) => user_competition::Entity::find_by_id((id, uid))
            .one(&state.db)
            .await?
            .is_some(),
        None => false,
    };
    let podium = ranking::competition_standing(&state.db, &model, Some(DETAIL_PODIUM), caller)
        .await?;

    let fish_type_name = match model.fish_type_id {
        Some(type_id) => lookup::fish_type_names(&state.db, [type_id])
            .await?
            .remove(&type_id),
        None => None,
    };

    Ok(Json(CompetitionDetailResponse {
        result: CompetitionDetail {
            competition: CompetitionResponse::from(model),
            fish_type_name,
            user_count,
        },
        ranking: podium.entries,
        my_status,
    }))
}

#[utoipa::path(
    patch,
    path = "/competitions/{id}",
    tag = "Competitions",
    operation_id = "updateCompetition",
    summary = "Update a competition",
    description = "Partially updates a competition. Requires `competition:manage`. The merged dates and scoring parameters are validated before anything is written.",
    params(("id" = i32, Path, description = "Competition ID")),
    request_body = UpdateCompetitionRequest,
    responses(
        (status = 200, description = "Competition updated", body = ActionResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or invalid field (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCompetitionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("competition:manage")?;
    validate_update_competition(&payload)?;

    let existing = find_competition(&state.db, id).await?;
    if payload == UpdateCompetitionRequest::default() {
        return Ok(Json(ActionResponse::done("COMPETITION.UPDATE_SUCCESS")));
    }
    merged_rules_are_valid(&existing, &payload)?;
    if let Some(Some(type_id)) = payload.fish_type_id {
        lookup::require_fish_type(&state.db, type_id).await?;
    }

    let mut active: competition::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(competition_type) = payload.competition_type {
        active.competition_type = Set(competition_type);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(fish_type_id) = payload.fish_type_id {
        active.fish_type_id = Set(fish_type_id);
    }
    if let Some(mode) = payload.mode {
        active.mode = Set(mode);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(n) = payload.rank_fish_number {
        active.rank_fish_number = Set(n);
    }
    if let Some(width) = payload.quest_fish_width {
        active.quest_fish_width = Set(width);
    }
    if let Some(width) = payload.quest_special_width {
        active.quest_special_width = Set(width);
    }
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("COMPETITION.UPDATE_SUCCESS")))
}

#[utoipa::path(
    delete,
    path = "/competitions/{id}",
    tag = "Competitions",
    operation_id = "deleteCompetition",
    summary = "Delete a competition",
    description = "Deletes a competition and its participant rows. Requires `competition:manage`. Competitions with fish entries cannot be deleted.",
    params(("id" = i32, Path, description = "Competition ID")),
    responses(
        (status = 200, description = "Number of deleted competitions", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or has fish (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("competition:manage")?;

    let txn = state.db.begin().await?;
    let existing = competition::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("COMPETITION.NOT_FOUND"))?;

    let fish_count = fish::Entity::find()
        .filter(fish::Column::CompetitionId.eq(id))
        .count(&txn)
        .await?;
    if fish_count > 0 {
        return Err(AppError::Rejected("COMPETITION.HAS_FISH"));
    }

    user_competition::Entity::delete_many()
        .filter(user_competition::Column::CompetitionId.eq(id))
        .exec(&txn)
        .await?;
    let result = competition::Entity::delete_by_id(existing.id)
        .exec(&txn)
        .await?;
    txn.commit().await?;

    Ok(Json(CountResponse {
        result: result.rows_affected,
    }))
}

#[utoipa::path(
    get,
    path = "/competitions/{id}/ranking",
    tag = "Competitions",
    operation_id = "getCompetitionRanking",
    summary = "Competition leaderboard",
    description = "Ranks participants by the record of the competition's mode: descending for modes 1-4, by absolute deviation for mode 5. Rows without a record come last. The caller's rank is looked up within the returned window only.",
    params(("id" = i32, Path, description = "Competition ID"), RankingQuery),
    responses(
        (status = 200, description = "Leaderboard", body = CompetitionRankingResponse),
        (status = 404, description = "Not found or zero limit (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, query), fields(id))]
pub async fn get_competition_ranking(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppQuery(query): AppQuery<RankingQuery>,
) -> Result<Json<CompetitionRankingResponse>, AppError> {
    validate_limit(query.limit)?;
    let model = find_competition(&state.db, id).await?;
    let standing = ranking::competition_standing(
        &state.db,
        &model,
        query.limit,
        auth_user.map(|u| u.user_id),
    )
    .await?;

    Ok(Json(CompetitionRankingResponse {
        participating: standing.my_ranking.is_some(),
        my_ranking: standing.my_ranking,
        result: standing.entries,
    }))
}

#[utoipa::path(
    post,
    path = "/competitions/{id}/join",
    tag = "Competitions",
    operation_id = "joinCompetition",
    summary = "Join a competition",
    params(("id" = i32, Path, description = "Competition ID")),
    responses(
        (status = 200, description = "Joined", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Competition not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already joined (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn join_competition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ActionResponse>, AppError> {
    find_competition(&state.db, id).await?;

    user_competition::ActiveModel {
        competition_id: Set(id),
        user_id: Set(auth_user.user_id),
        joined_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("COMPETITION.ALREADY_JOINED")
        }
        _ => AppError::from(e),
    })?;

    Ok(Json(ActionResponse::done("COMPETITION.JOIN_SUCCESS")))
}

/// Competitions `user_id` joined that match `condition`, with the user's
/// record in each.
async fn participations(
    db: &DatabaseConnection,
    user_id: i32,
    condition: Condition,
    window: &WindowQuery,
) -> Result<ListResponse<ParticipationResponse>, AppError> {
    validate_limit(window.limit)?;

    let rows: HashMap<i32, user_competition::Model> = user_competition::Entity::find()
        .filter(user_competition::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.competition_id, r))
        .collect();
    if rows.is_empty() {
        return Ok(ListResponse::counted(Vec::new(), 0));
    }

    let select = competition::Entity::find()
        .filter(competition::Column::Id.is_in(rows.keys().copied()))
        .filter(condition)
        .order_by_desc(competition::Column::StartDate)
        .order_by_asc(competition::Column::Id);
    let total = select.clone().count(db).await?;
    let competitions = select
        .limit(window.limit)
        .offset(window.offset)
        .all(db)
        .await?;

    let items = list_items(db, competitions).await?;
    let result = items
        .into_iter()
        .filter_map(|item| {
            let row = rows.get(&item.competition.id)?;
            Some(ParticipationResponse {
                record: row.record_for(item.competition.mode),
                joined_at: row.joined_at,
                competition: item,
            })
        })
        .collect();

    Ok(ListResponse::counted(result, total))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/competitions/in-progress",
    tag = "Competitions",
    operation_id = "listUserInProgressCompetitions",
    summary = "Running competitions a user joined",
    params(("user_id" = i32, Path, description = "User ID"), WindowQuery),
    responses(
        (status = 200, description = "Participations", body = ListResponse<ParticipationResponse>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(user_id))]
pub async fn list_user_in_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<ParticipationResponse>>, AppError> {
    let condition = running_at(now_millis());
    Ok(Json(
        participations(&state.db, user_id, condition, &query).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/competitions/attended",
    tag = "Competitions",
    operation_id = "listUserAttendedCompetitions",
    summary = "Ended competitions a user joined",
    params(("user_id" = i32, Path, description = "User ID"), WindowQuery),
    responses(
        (status = 200, description = "Participations", body = ListResponse<ParticipationResponse>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(user_id))]
pub async fn list_user_attended(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<ParticipationResponse>>, AppError> {
    let condition = Condition::all().add(competition::Column::EndDate.lte(now_millis()));
    Ok(Json(
        participations(&state.db, user_id, condition, &query).await?,
    ))
}
