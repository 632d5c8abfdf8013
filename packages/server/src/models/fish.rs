use chrono::{DateTime, Utc};
use common::FishStatus;
use serde::{Deserialize, Serialize};

use super::shared::{UserSummary, validate_text, validate_width};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CommitFishRequest {
    pub competition_id: i32,
    /// Species as guessed by the angler; confirmed at verification.
    pub fish_type_id: Option<i32>,
    /// Width as measured by the angler; confirmed at verification.
    pub fish_width: Option<f64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddFishImageRequest {
    #[schema(example = "https://cdn.example.com/fish/123.jpg")]
    pub image: String,
}

/// Measurements confirmed by the verifying administrator.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct VerifyFishRequest {
    pub fish_type_id: i32,
    #[schema(example = 42.5)]
    pub fish_width: f64,
}

/// Allow-listed fish patch. Verification status is not patchable.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateFishRequest {
    pub fish_type_id: Option<i32>,
    pub fish_width: Option<f64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddDiaryCommentRequest {
    pub comment: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct FishListQuery {
    pub competition_id: Option<i32>,
    /// 0 = pending, 1 = verified.
    pub status: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct DiarySearchQuery {
    /// Substring of the competition name. Absent matches every competition.
    pub keyword: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RealtimeRankingQuery {
    /// Restrict to personal bests set with this species; absent or 0 means all.
    pub fish_type_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, Clone, utoipa::ToSchema)]
pub struct FishImageResponse {
    pub id: i32,
    pub image: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FishResponse {
    pub id: i32,
    pub competition_id: i32,
    pub competition_name: Option<String>,
    pub user: UserSummary,
    pub fish_type_id: Option<i32>,
    pub fish_type_name: Option<String>,
    pub fish_width: Option<f64>,
    #[schema(value_type = i32)]
    pub status: FishStatus,
    pub register_date: DateTime<Utc>,
    pub images: Vec<FishImageResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DiaryCommentResponse {
    pub id: i32,
    pub user: UserSummary,
    pub comment: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FishDetail {
    #[serde(flatten)]
    pub fish: FishResponse,
    pub comments: Vec<DiaryCommentResponse>,
}

/// One personal best on the realtime leaderboard.
#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
pub struct RealtimeEntry {
    pub user: UserSummary,
    pub record: f64,
    pub fish_id: i32,
    pub fish_type_id: Option<i32>,
    pub fish_type_name: Option<String>,
    pub fish_image: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RealtimeRankingResponse {
    pub result: Vec<RealtimeEntry>,
    /// 1-based overall rank of the caller, `offset` included; `null` when
    /// the caller is not within `result`.
    pub my_ranking: Option<u64>,
    /// The caller's own entry when it is within `result`.
    pub my_fish: Option<RealtimeEntry>,
}

pub fn validate_commit_fish(req: &CommitFishRequest) -> Result<(), AppError> {
    if let Some(width) = req.fish_width {
        validate_width(width, "FISH.INVALID_WIDTH")?;
    }
    Ok(())
}

pub fn validate_verify_fish(req: &VerifyFishRequest) -> Result<(), AppError> {
    validate_width(req.fish_width, "FISH.INVALID_WIDTH")
}

pub fn validate_update_fish(req: &UpdateFishRequest) -> Result<(), AppError> {
    if let Some(width) = req.fish_width {
        validate_width(width, "FISH.INVALID_WIDTH")?;
    }
    Ok(())
}

pub fn validate_fish_image(req: &AddFishImageRequest) -> Result<(), AppError> {
    validate_text(&req.image, 200, "FISH.INVALID_IMAGE")
}

pub fn validate_diary_comment(req: &AddDiaryCommentRequest) -> Result<(), AppError> {
    validate_text(&req.comment, 2000, "DIARY_COMMENT.INVALID_CONTENT")
}

/// Parse the optional status filter of the fish list.
pub fn parse_status_filter(status: Option<i32>) -> Result<Option<FishStatus>, AppError> {
    status
        .map(FishStatus::try_from)
        .transpose()
        .map_err(|_| AppError::Rejected("FISH.INVALID_STATUS"))
}
