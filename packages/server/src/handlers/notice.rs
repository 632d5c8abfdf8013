use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{notice, notice_type};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::content::{
    CreateNoticeRequest, CreateNoticeTypeRequest, NoticeResponse, NoticeTypeResponse,
    RecentNoticeQuery, UpdateNoticeRequest, validate_create_notice, validate_update_notice,
};
use crate::models::shared::{
    ActionResponse, CountResponse, ItemResponse, ListResponse, WindowQuery, validate_limit,
    validate_text,
};
use crate::state::AppState;

async fn find_notice<C: ConnectionTrait>(db: &C, id: i32) -> Result<notice::Model, AppError> {
    notice::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("NOTICE_NOT_FOUND"))
}

async fn require_notice_type<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    notice_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("NOTICE_TYPE_NOT_FOUND"))?;
    Ok(())
}

async fn with_labels<C: ConnectionTrait>(
    db: &C,
    notices: Vec<notice::Model>,
) -> Result<Vec<NoticeResponse>, AppError> {
    let type_ids: Vec<i32> = notices.iter().filter_map(|n| n.notice_type_id).collect();
    let labels: std::collections::HashMap<i32, String> = if type_ids.is_empty() {
        Default::default()
    } else {
        notice_type::Entity::find()
            .filter(notice_type::Column::Id.is_in(type_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.label))
            .collect()
    };
    Ok(notices
        .into_iter()
        .map(|n| {
            let label = n.notice_type_id.and_then(|id| labels.get(&id).cloned());
            NoticeResponse::new(n, label)
        })
        .collect())
}

#[utoipa::path(
    post,
    path = "/notices",
    tag = "Notices",
    operation_id = "createNotice",
    summary = "Register a notice",
    description = "Requires `content:manage`.",
    request_body = CreateNoticeRequest,
    responses(
        (status = 200, description = "Notice created", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invalid field or unknown type (REJECTED, NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_notice(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNoticeRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_create_notice(&payload)?;
    if let Some(type_id) = payload.notice_type_id {
        require_notice_type(&state.db, type_id).await?;
    }

    let now = chrono::Utc::now();
    let model = notice::ActiveModel {
        notice_type_id: Set(payload.notice_type_id),
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        created_date: Set(now),
        updated_date: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created("NOTICE_REGISTER_SUCCESS", model.id)))
}

#[utoipa::path(
    get,
    path = "/notices",
    tag = "Notices",
    operation_id = "listNotices",
    summary = "List notices, newest first",
    params(WindowQuery),
    responses(
        (status = 200, description = "Notices", body = ListResponse<NoticeResponse>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_notices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<NoticeResponse>>, AppError> {
    validate_limit(query.limit)?;
    let select = notice::Entity::find()
        .order_by_desc(notice::Column::CreatedDate)
        .order_by_desc(notice::Column::Id);
    let total = select.clone().count(&state.db).await?;
    let rows = select
        .limit(query.limit)
        .offset(query.offset)
        .all(&state.db)
        .await?;
    Ok(Json(ListResponse::counted(
        with_labels(&state.db, rows).await?,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/notices/recent",
    tag = "Notices",
    operation_id = "listRecentNotices",
    summary = "Most recently updated notices",
    params(RecentNoticeQuery),
    responses(
        (status = 200, description = "Notices", body = ListResponse<NoticeResponse>),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_recent_notices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecentNoticeQuery>,
) -> Result<Json<ListResponse<NoticeResponse>>, AppError> {
    validate_limit(query.limit)?;
    let rows = notice::Entity::find()
        .order_by_desc(notice::Column::UpdatedDate)
        .order_by_desc(notice::Column::Id)
        .limit(query.limit)
        .all(&state.db)
        .await?;
    Ok(Json(ListResponse::new(with_labels(&state.db, rows).await?)))
}

#[utoipa::path(
    get,
    path = "/notices/{id}",
    tag = "Notices",
    operation_id = "getNotice",
    summary = "Get a notice",
    params(("id" = i32, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice", body = ItemResponse<NoticeResponse>),
        (status = 404, description = "Notice not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_notice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse<NoticeResponse>>, AppError> {
    let model = find_notice(&state.db, id).await?;
    let result = with_labels(&state.db, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("NOTICE_NOT_FOUND"))?;
    Ok(Json(ItemResponse { result }))
}

#[utoipa::path(
    patch,
    path = "/notices/{id}",
    tag = "Notices",
    operation_id = "updateNotice",
    summary = "Update a notice",
    description = "Requires `content:manage`. `notice_type_id: null` clears the type.",
    params(("id" = i32, Path, description = "Notice ID")),
    request_body = UpdateNoticeRequest,
    responses(
        (status = 200, description = "Notice updated", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or invalid field (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_notice(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateNoticeRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_update_notice(&payload)?;
    let existing = find_notice(&state.db, id).await?;
    if payload == UpdateNoticeRequest::default() {
        return Ok(Json(ActionResponse::done("NOTICE_UPDATE_SUCCESS")));
    }
    if let Some(Some(type_id)) = payload.notice_type_id {
        require_notice_type(&state.db, type_id).await?;
    }

    let mut active: notice::ActiveModel = existing.into();
    if let Some(notice_type_id) = payload.notice_type_id {
        active.notice_type_id = Set(notice_type_id);
    }
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    active.updated_date = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("NOTICE_UPDATE_SUCCESS")))
}

#[utoipa::path(
    delete,
    path = "/notices/{id}",
    tag = "Notices",
    operation_id = "deleteNotice",
    summary = "Delete a notice",
    description = "Requires `content:manage`.",
    params(("id" = i32, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Number of deleted notices", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Notice not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_notice(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    let result = notice::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("NOTICE_NOT_FOUND"));
    }
    Ok(Json(CountResponse {
        result: result.rows_affected,
    }))
}

#[utoipa::path(
    post,
    path = "/notice-types",
    tag = "Notices",
    operation_id = "createNoticeType",
    summary = "Register a notice type",
    description = "Requires `content:manage`.",
    request_body = CreateNoticeTypeRequest,
    responses(
        (status = 200, description = "Notice type created", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invalid label (REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_notice_type(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNoticeTypeRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_text(&payload.label, 64, "NOTICE_TYPE.INVALID_LABEL")?;

    let model = notice_type::ActiveModel {
        label: Set(payload.label.trim().to_string()),
        created_date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "NOTICE_TYPE_REGISTER_SUCCESS",
        model.id,
    )))
}

#[utoipa::path(
    get,
    path = "/notice-types",
    tag = "Notices",
    operation_id = "listNoticeTypes",
    summary = "List notice types",
    responses(
        (status = 200, description = "Notice types", body = ListResponse<NoticeTypeResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_notice_types(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<NoticeTypeResponse>>, AppError> {
    let rows = notice_type::Entity::find()
        .order_by_asc(notice_type::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(ListResponse::new(
        rows.into_iter().map(NoticeTypeResponse::from).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/notice-types/{id}",
    tag = "Notices",
    operation_id = "deleteNoticeType",
    summary = "Delete a notice type",
    description = "Requires `content:manage`. Notices of this type keep existing without a type.",
    params(("id" = i32, Path, description = "Notice type ID")),
    responses(
        (status = 200, description = "Number of deleted types", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_notice_type(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    let result = notice_type::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;
    Ok(Json(CountResponse {
        result: result.rows_affected,
    }))
}
