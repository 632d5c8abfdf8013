use serde::{Deserialize, Serialize};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopUsersQuery {
    /// Maximum number of users; absent returns every angler.
    pub limit: Option<u64>,
}

/// An angler as listed on the admin dashboard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DashboardUser {
    pub id: i32,
    pub username: String,
    pub nickname: Option<String>,
    pub level: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
