use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{report, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::content::{
    CreateReportRequest, ReportListQuery, ReportResponse, UpdateReportRequest,
    validate_create_report, validate_update_report,
};
use crate::models::shared::{
    ActionResponse, CountResponse, ItemResponse, ListResponse, WindowQuery, validate_limit,
};
use crate::state::AppState;
use crate::utils::lookup;

async fn find_report<C: ConnectionTrait>(db: &C, id: i32) -> Result<report::Model, AppError> {
    report::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("REPORT_NOT_FOUND"))
}

async fn with_parties<C: ConnectionTrait>(
    db: &C,
    reports: Vec<report::Model>,
) -> Result<Vec<ReportResponse>, AppError> {
    let users = lookup::user_summaries(
        db,
        reports.iter().flat_map(|r| [r.user_id, r.reporter_id]),
    )
    .await?;
    Ok(reports
        .into_iter()
        .map(|r| {
            let reported = lookup::summary_of(&users, r.user_id);
            let reporter = lookup::summary_of(&users, r.reporter_id);
            ReportResponse::new(r, reported, reporter)
        })
        .collect())
}

async fn fetch_window<C: ConnectionTrait>(
    db: &C,
    select: Select<report::Entity>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<ListResponse<ReportResponse>, AppError> {
    validate_limit(limit)?;
    let select = select
        .order_by_desc(report::Column::CreatedDate)
        .order_by_desc(report::Column::Id);
    let total = select.clone().count(db).await?;
    let rows = select.limit(limit).offset(offset).all(db).await?;
    Ok(ListResponse::counted(with_parties(db, rows).await?, total))
}

#[utoipa::path(
    post,
    path = "/reports",
    tag = "Reports",
    operation_id = "createReport",
    summary = "Report a user",
    request_body = CreateReportRequest,
    responses(
        (status = 200, description = "Report filed", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown user or empty content (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(reporter_id = auth_user.user_id, user_id = payload.user_id))]
pub async fn create_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReportRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_create_report(&payload)?;
    user::Entity::find_by_id(payload.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("USER_NOT_FOUND"))?;

    let now = chrono::Utc::now();
    let model = report::ActiveModel {
        user_id: Set(payload.user_id),
        reporter_id: Set(auth_user.user_id),
        report_type: Set(payload.report_type),
        content: Set(payload.content.trim().to_string()),
        status: Set(report::STATUS_OPEN),
        created_date: Set(now),
        updated_date: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created("REPORT_REGISTER_SUCCESS", model.id)))
}

#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    operation_id = "listReports",
    summary = "List reports, newest first",
    description = "Requires `content:manage`.",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports", body = ListResponse<ReportResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_reports(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReportListQuery>,
) -> Result<Json<ListResponse<ReportResponse>>, AppError> {
    auth_user.require_permission("content:manage")?;
    let mut select = report::Entity::find();
    if let Some(status) = query.status {
        select = select.filter(report::Column::Status.eq(status));
    }
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "Reports",
    operation_id = "getReport",
    summary = "Get a report",
    description = "Allowed for the reporter and holders of `content:manage`.",
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = ItemResponse<ReportResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Report not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse<ReportResponse>>, AppError> {
    let model = find_report(&state.db, id).await?;
    auth_user.require_owner_or(model.reporter_id, "content:manage")?;
    let result = with_parties(&state.db, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("REPORT_NOT_FOUND"))?;
    Ok(Json(ItemResponse { result }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/reports",
    tag = "Reports",
    operation_id = "listReportsAgainstUser",
    summary = "Reports filed against a user",
    description = "Requires `content:manage`.",
    params(("user_id" = i32, Path, description = "Reported user ID"), WindowQuery),
    responses(
        (status = 200, description = "Reports", body = ListResponse<ReportResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id))]
pub async fn list_reports_against(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<ReportResponse>>, AppError> {
    auth_user.require_permission("content:manage")?;
    let select = report::Entity::find().filter(report::Column::UserId.eq(user_id));
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/reports/filed",
    tag = "Reports",
    operation_id = "listReportsFiledBy",
    summary = "Reports filed by a user",
    description = "Allowed for the reporter themself and holders of `content:manage`.",
    params(("user_id" = i32, Path, description = "Reporter user ID"), WindowQuery),
    responses(
        (status = 200, description = "Reports", body = ListResponse<ReportResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id))]
pub async fn list_reports_filed_by(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> Result<Json<ListResponse<ReportResponse>>, AppError> {
    auth_user.require_owner_or(user_id, "content:manage")?;
    let select = report::Entity::find().filter(report::Column::ReporterId.eq(user_id));
    Ok(Json(
        fetch_window(&state.db, select, query.limit, query.offset).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/reports/{id}",
    tag = "Reports",
    operation_id = "updateReport",
    summary = "Update a report",
    description = "Requires `content:manage`.",
    params(("id" = i32, Path, description = "Report ID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report updated", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or invalid field (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateReportRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_update_report(&payload)?;
    let existing = find_report(&state.db, id).await?;
    if payload == UpdateReportRequest::default() {
        return Ok(Json(ActionResponse::done("REPORT_UPDATE_SUCCESS")));
    }

    let mut active: report::ActiveModel = existing.into();
    if let Some(report_type) = payload.report_type {
        active.report_type = Set(report_type);
    }
    if let Some(content) = payload.content {
        active.content = Set(content.trim().to_string());
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_date = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("REPORT_UPDATE_SUCCESS")))
}

#[utoipa::path(
    delete,
    path = "/reports/{id}",
    tag = "Reports",
    operation_id = "deleteReport",
    summary = "Delete a report",
    description = "Requires `content:manage`.",
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Number of deleted reports", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Report not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    let result = report::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("REPORT_NOT_FOUND"));
    }
    Ok(Json(CountResponse {
        result: result.rows_affected,
    }))
}
