mod v1;

use utoipa_axum::router::OpenApiRouter;

use crate::state::AppState;

/// Versioned API tree. [`crate::build_router`] mounts it under `/api`, so a
/// handler documented at `/competitions/{id}` is served at
/// `/api/v1/competitions/{id}`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}
