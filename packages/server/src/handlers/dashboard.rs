use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{profile, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::query::AppQuery;
use crate::models::dashboard::{DashboardUser, TopUsersQuery};
use crate::models::shared::{CountResponse, ListResponse, validate_limit};
use crate::state::AppState;
use crate::utils::time::start_of_utc_day;

#[utoipa::path(
    get,
    path = "/dashboard/users/count",
    tag = "Dashboard",
    operation_id = "countUsers",
    summary = "Total number of users",
    description = "Requires `dashboard:view`.",
    responses(
        (status = 200, description = "User count", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn count_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("dashboard:view")?;
    let result = user::Entity::find().count(&state.db).await?;
    Ok(Json(CountResponse { result }))
}

#[utoipa::path(
    get,
    path = "/dashboard/users/today",
    tag = "Dashboard",
    operation_id = "countUsersToday",
    summary = "Users registered since midnight UTC",
    description = "Requires `dashboard:view`.",
    responses(
        (status = 200, description = "User count", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn count_users_today(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    auth_user.require_permission("dashboard:view")?;
    let since = start_of_utc_day(chrono::Utc::now());
    let result = user::Entity::find()
        .filter(user::Column::CreatedAt.gte(since))
        .count(&state.db)
        .await?;
    Ok(Json(CountResponse { result }))
}

#[utoipa::path(
    get,
    path = "/dashboard/users/top-level",
    tag = "Dashboard",
    operation_id = "listTopLevelUsers",
    summary = "Anglers by profile level",
    description = "Angler accounts ordered by profile level, highest first. Requires `dashboard:view`.",
    params(TopUsersQuery),
    responses(
        (status = 200, description = "Anglers", body = ListResponse<DashboardUser>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Zero limit (REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_top_level_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TopUsersQuery>,
) -> Result<Json<ListResponse<DashboardUser>>, AppError> {
    auth_user.require_permission("dashboard:view")?;
    validate_limit(query.limit)?;

    let rows = profile::Entity::find()
        .find_also_related(user::Entity)
        .filter(user::Column::UserType.eq(user::ANGLER_TYPE))
        .order_by_desc(profile::Column::Level)
        .order_by_asc(profile::Column::UserId)
        .limit(query.limit)
        .all(&state.db)
        .await?;

    let result = rows
        .into_iter()
        .filter_map(|(p, u)| {
            let u = u?;
            Some(DashboardUser {
                id: u.id,
                username: u.username,
                nickname: Some(p.nickname),
                level: p.level,
                created_at: u.created_at,
            })
        })
        .collect();

    Ok(Json(ListResponse::new(result)))
}
