use axum::{
    Json,
    extract::{Path, State},
};
use common::FishStatus;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{competition, diary_comment, fish, fish_image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::fish::{
    AddDiaryCommentRequest, AddFishImageRequest, CommitFishRequest, DiaryCommentResponse,
    DiarySearchQuery, FishDetail, FishListQuery, FishResponse, RealtimeRankingQuery,
    RealtimeRankingResponse, UpdateFishRequest, VerifyFishRequest, parse_status_filter,
    validate_commit_fish, validate_diary_comment, validate_fish_image, validate_update_fish,
    validate_verify_fish,
};
use crate::models::shared::{
    ActionResponse, ItemResponse, ListResponse, WindowQuery, escape_like, validate_limit,
};
use crate::services::{ranking, scoring};
use crate::state::AppState;
use crate::utils::lookup::{self, find_competition, find_fish};
use crate::utils::time::now_millis;

/// Attach owner, species, competition name and images to each fish.
async fn fish_responses<C: ConnectionTrait>(
    db: &C,
    rows: Vec<fish::Model>,
) -> Result<Vec<FishResponse>, AppError> {
    let users = lookup::user_summaries(db, rows.iter().map(|f| f.user_id)).await?;
    let types = lookup::fish_type_names(db, rows.iter().filter_map(|f| f.fish_type_id)).await?;
    let competitions =
        lookup::competition_names(db, rows.iter().map(|f| f.competition_id)).await?;
    let mut images = lookup::images_by_fish(db, rows.iter().map(|f| f.id).collect()).await?;

    Ok(rows
        .into_iter()
        .map(|f| FishResponse {
            id: f.id,
            competition_id: f.competition_id,
            competition_name: competitions.get(&f.competition_id).cloned(),
            user: lookup::summary_of(&users, f.user_id),
            fish_type_id: f.fish_type_id,
            fish_type_name: f.fish_type_id.and_then(|id| types.get(&id).cloned()),
            fish_width: f.fish_width,
            status: f.status,
            register_date: f.register_date,
            images: images.remove(&f.id).unwrap_or_default(),
        })
        .collect())
}

/// Count the matches of `select`, then load the requested window of them.
async fn fetch_window<C: ConnectionTrait>(
    db: &C,
    select: Select<fish::Entity>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<ListResponse<FishResponse>, AppError> {
    validate_limit(limit)?;
    let total = select.clone().count(db).await?;
    let rows = select.limit(limit).offset(offset).all(db).await?;
    Ok(ListResponse::counted(fish_responses(db, rows).await?, total))
}

fn verified() -> Select<fish::Entity> {
    fish::Entity::find().filter(fish::Column::Status.eq(FishStatus::Verified))
}

#[utoipa::path(
    post,
    path = "/fish",
    tag = "Fish",
    operation_id = "commitFish",
    summary = "Submit a catch",
    description = "Creates a pending fish owned by the caller. Only accepted while the competition is running; otherwise `COMPETITION_DURATION_ERROR` and nothing is stored.",
    request_body = CommitFishRequest,
    responses(
        (status = 200, description = "Fish submitted", body = ActionResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown competition, outside window or invalid width (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, competition_id = payload.competition_id))]
pub async fn commit_fish(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CommitFishRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_commit_fish(&payload)?;

    let competition = find_competition(&state.db, payload.competition_id).await?;
    if !competition.is_running_at(now_millis()) {
        return Err(AppError::Rejected("COMPETITION_DURATION_ERROR"));
    }
    if let Some(type_id) = payload.fish_type_id {
        lookup::require_fish_type(&state.db, type_id).await?;
    }

    let model = fish::ActiveModel {
        competition_id: Set(competition.id),
        user_id: Set(auth_user.user_id),
        fish_type_id: Set(payload.fish_type_id),
        fish_width: Set(payload.fish_width),
        status: Set(FishStatus::Pending),
        register_date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "DIARY_FISH_COMMIT_SUCCESS",
        model.id,
    )))
}

#[utoipa::path(
    post,
    path = "/fish/{id}/images",
    tag = "Fish",
    operation_id = "addFishImage",
    summary = "Attach an image to a fish",
    description = "Allowed for the fish owner and holders of `fish:verify`.",
    params(("id" = i32, Path, description = "Fish ID")),
    request_body = AddFishImageRequest,
    responses(
        (status = 200, description = "Image attached", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Fish not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn add_fish_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AddFishImageRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_fish_image(&payload)?;
    let target = find_fish(&state.db, id).await?;
    auth_user.require_owner_or(target.user_id, "fish:verify")?;

    let image = fish_image::ActiveModel {
        fish_id: Set(target.id),
        image: Set(payload.image.trim().to_string()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "DIARY_FISH_IMAGE_ADD_SUCCESS",
        image.id,
    )))
}

#[utoipa::path(
    post,
    path = "/fish/{id}/verify",
    tag = "Fish",
    operation_id = "verifyFish",
    summary = "Verify a pending fish",
    description = "Confirms species and width, marks the fish verified and updates the participant's competition record and personal best in one transaction. Requires `fish:verify`. A fish can be verified once.",
    params(("id" = i32, Path, description = "Fish ID")),
    request_body = VerifyFishRequest,
    responses(
        (status = 200, description = "Fish verified", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Fish not found or already verified (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, width = payload.fish_width))]
pub async fn verify_fish(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<VerifyFishRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("fish:verify")?;
    validate_verify_fish(&payload)?;

    let outcome = scoring::verify_fish(
        &state.db,
        &state.config.scoring,
        id,
        scoring::Measurement {
            fish_type_id: payload.fish_type_id,
            width: payload.fish_width,
        },
    )
    .await?;

    Ok(Json(ActionResponse::created(
        "FISH_REGISTER_SUCCESS",
        outcome.fish.id,
    )))
}

#[utoipa::path(
    get,
    path = "/fish",
    tag = "Fish",
    operation_id = "listFish",
    summary = "List fish for review",
    description = "All fish, newest first, optionally filtered by competition and status. Requires `fish:verify`.",
    params(FishListQuery),
    responses(
        (status = 200, description = "Fish", body = ListResponse<FishResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invalid status or zero limit (REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_fish(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FishListQuery>,
) -> Result<Json<ListResponse<FishResponse>>, AppError> {
    auth_user.require_permission("fish:verify")?;
    let status = parse_status_filter(query.status)?;

    let mut select = fish::Entity::find();
    if let Some(competition_id) = query.competition_id {
        select = select.filter(fish::Column::CompetitionId.eq(competition_id));
    }
    if let Some(status) = status {
        select = select.filter(fish::Column::Status.eq(status));
    }
    let select = select.order_by_desc(fish::Column::Id);

    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/fish/{id}",
    tag = "Fish",
    operation_id = "getFish",
    summary = "Get a fish with its images and diary comments",
    params(("id" = i32, Path, description = "Fish ID")),
    responses(
        (status = 200, description = "Fish detail", body = ItemResponse<FishDetail>),
        (status = 404, description = "Fish not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_fish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse<FishDetail>>, AppError> {
    let model = find_fish(&state.db, id).await?;

    let comments = diary_comment::Entity::find()
        .filter(diary_comment::Column::FishId.eq(id))
        .order_by_asc(diary_comment::Column::CreatedDate)
        .order_by_asc(diary_comment::Column::Id)
        .all(&state.db)
        .await?;
    let commenters = lookup::user_summaries(&state.db, comments.iter().map(|c| c.user_id)).await?;
    let comments = comments
        .into_iter()
        .map(|c| DiaryCommentResponse {
            id: c.id,
            user: lookup::summary_of(&commenters, c.user_id),
            comment: c.comment,
            created_date: c.created_date,
        })
        .collect();

    let fish = fish_responses(&state.db, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("FISH_NOT_FOUND"))?;

    Ok(Json(ItemResponse {
        result: FishDetail { fish, comments },
    }))
}

#[utoipa::path(
    patch,
    path = "/fish/{id}",
    tag = "Fish",
    operation_id = "updateFish",
    summary = "Update a fish",
    description = "Patches species and width of a pending fish. Allowed for the owner or `fish:verify`. Verified fish are frozen.",
    params(("id" = i32, Path, description = "Fish ID")),
    request_body = UpdateFishRequest,
    responses(
        (status = 200, description = "Fish updated", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found, invalid field or already verified (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_fish(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateFishRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_update_fish(&payload)?;
    let existing = find_fish(&state.db, id).await?;
    auth_user.require_owner_or(existing.user_id, "fish:verify")?;
    // Records and personal bests were computed from the verified width and species.
    if existing.status.is_verified() {
        return Err(AppError::Rejected("FISH_ALREADY_VERIFIED"));
    }

    if payload == UpdateFishRequest::default() {
        return Ok(Json(ActionResponse::done("FISH_UPDATE_SUCCESS")));
    }
    if let Some(type_id) = payload.fish_type_id {
        lookup::require_fish_type(&state.db, type_id).await?;
    }

    let mut active: fish::ActiveModel = existing.into();
    if let Some(type_id) = payload.fish_type_id {
        active.fish_type_id = Set(Some(type_id));
    }
    if let Some(width) = payload.fish_width {
        active.fish_width = Set(Some(width));
    }
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("FISH_UPDATE_SUCCESS")))
}

#[utoipa::path(
    post,
    path = "/fish/{id}/comments",
    tag = "Fish",
    operation_id = "addDiaryComment",
    summary = "Comment on a fish",
    params(("id" = i32, Path, description = "Fish ID")),
    request_body = AddDiaryCommentRequest,
    responses(
        (status = 200, description = "Comment added", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not found or empty comment (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn add_diary_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AddDiaryCommentRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_diary_comment(&payload)?;
    find_fish(&state.db, id).await?;

    let comment = diary_comment::ActiveModel {
        fish_id: Set(id),
        user_id: Set(auth_user.user_id),
        comment: Set(payload.comment.trim().to_string()),
        created_date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "DIARY_COMMENT_REGISTER_SUCCESS",
        comment.id,
    )))
}

#[utoipa::path(
    get,
    path = "/competitions/{id}/fish",
    tag = "Fish",
    operation_id = "listCompetitionFish",
    summary = "Verified fish of a competition",
    params(("id" = i32, Path, description = "Competition ID"), WindowQuery),
    responses(
        (status = 200, description = "Verified fish, newest first", body = ListResponse<FishResponse>),
        (status = 404, description = "Competition not found or zero limit (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id))]
pub async fn list_competition_fish(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<FishResponse>>, AppError> {
    find_competition(&state.db, id).await?;
    let select = verified()
        .filter(fish::Column::CompetitionId.eq(id))
        .order_by_desc(fish::Column::RegisterDate)
        .order_by_desc(fish::Column::Id);
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/competitions/{id}/users/{user_id}/fish",
    tag = "Fish",
    operation_id = "listUserCompetitionFish",
    summary = "Verified fish of one angler in a competition",
    params(
        ("id" = i32, Path, description = "Competition ID"),
        ("user_id" = i32, Path, description = "User ID"),
        WindowQuery,
    ),
    responses(
        (status = 200, description = "Verified fish, widest first", body = ListResponse<FishResponse>),
        (status = 404, description = "Competition not found or zero limit (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id, user_id))]
pub async fn list_user_competition_fish(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, i32)>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<FishResponse>>, AppError> {
    find_competition(&state.db, id).await?;
    let select = verified()
        .filter(fish::Column::CompetitionId.eq(id))
        .filter(fish::Column::UserId.eq(user_id))
        .order_by_desc(fish::Column::FishWidth)
        .order_by_asc(fish::Column::Id);
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/diary",
    tag = "Fish",
    operation_id = "searchDiary",
    summary = "Search an angler's diary",
    description = "Verified fish of the user whose competition name contains `keyword`.",
    params(("user_id" = i32, Path, description = "User ID"), DiarySearchQuery),
    responses(
        (status = 200, description = "Matching fish, newest first", body = ListResponse<FishResponse>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(user_id))]
pub async fn search_diary(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppQuery(query): AppQuery<DiarySearchQuery>,
) -> Result<Json<ListResponse<FishResponse>>, AppError> {
    let mut select = verified().filter(fish::Column::UserId.eq(user_id));

    if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        select = select.filter(
            fish::Column::CompetitionId.in_subquery(
                SeaQuery::select()
                    .column(competition::Column::Id)
                    .from(competition::Entity)
                    .and_where(
                        competition::Column::Name.like(format!("%{}%", escape_like(keyword))),
                    )
                    .to_owned(),
            ),
        );
    }

    let select = select
        .order_by_desc(fish::Column::RegisterDate)
        .order_by_desc(fish::Column::Id);
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/rankings/realtime",
    tag = "Rankings",
    operation_id = "getRealtimeRanking",
    summary = "Global personal-best leaderboard",
    description = "Personal bests, widest first, optionally restricted to one species. The caller's entry is looked up within the returned window; its rank counts from the top of the board.",
    params(RealtimeRankingQuery),
    responses(
        (status = 200, description = "Leaderboard", body = RealtimeRankingResponse),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn get_realtime_ranking(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RealtimeRankingQuery>,
) -> Result<Json<RealtimeRankingResponse>, AppError> {
    validate_limit(query.limit)?;
    let standing = ranking::realtime_standing(
        &state.db,
        query.fish_type_id,
        query.limit,
        query.offset,
        auth_user.map(|u| u.user_id),
    )
    .await?;
    Ok(Json(standing))
}
