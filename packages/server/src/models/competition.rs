use chrono::{DateTime, Utc};
use common::CompetitionMode;
use serde::{Deserialize, Serialize};

use super::shared::{UserSummary, double_option, validate_text, validate_width};
use crate::entity::competition;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCompetitionRequest {
    #[schema(example = "Spring Bass Open")]
    pub name: String,
    /// Free-form category used by the search filter.
    #[serde(default)]
    pub competition_type: i32,
    #[serde(default)]
    pub description: String,
    pub fish_type_id: Option<i32>,
    /// Scoring rule, 0-5.
    #[schema(value_type = i32, example = 1)]
    pub mode: CompetitionMode,
    /// Epoch milliseconds.
    pub start_date: i64,
    /// Epoch milliseconds, exclusive.
    pub end_date: i64,
    #[serde(default)]
    pub rank_fish_number: i32,
    #[serde(default)]
    pub quest_fish_width: f64,
    #[serde(default)]
    pub quest_special_width: f64,
}

/// Allow-listed competition patch. Absent fields are left untouched.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCompetitionRequest {
    pub name: Option<String>,
    pub competition_type: Option<i32>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub fish_type_id: Option<Option<i32>>,
    #[schema(value_type = Option<i32>)]
    pub mode: Option<CompetitionMode>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub rank_fish_number: Option<i32>,
    pub quest_fish_width: Option<f64>,
    pub quest_special_width: Option<f64>,
}

/// Filters of the multi-filter competition search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct CompetitionSearchQuery {
    /// Exact `competition_type`.
    #[serde(rename = "type")]
    pub competition_type: Option<i32>,
    /// 1 = ranked (top-sum) competitions, 2 = quest competitions.
    pub mode: Option<i32>,
    /// 1 = ended, 2 = in progress, 3 = upcoming.
    pub status: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RankingQuery {
    /// Maximum number of entries. Absent means the whole field.
    pub limit: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, Clone, utoipa::ToSchema)]
pub struct CompetitionResponse {
    pub id: i32,
    pub name: String,
    pub competition_type: i32,
    pub description: String,
    pub fish_type_id: Option<i32>,
    #[schema(value_type = i32)]
    pub mode: CompetitionMode,
    pub start_date: i64,
    pub end_date: i64,
    pub rank_fish_number: i32,
    pub quest_fish_width: f64,
    pub quest_special_width: f64,
    pub created_at: DateTime<Utc>,
}

impl From<competition::Model> for CompetitionResponse {
    fn from(m: competition::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            competition_type: m.competition_type,
            description: m.description,
            fish_type_id: m.fish_type_id,
            mode: m.mode,
            start_date: m.start_date,
            end_date: m.end_date,
            rank_fish_number: m.rank_fish_number,
            quest_fish_width: m.quest_fish_width,
            quest_special_width: m.quest_special_width,
            created_at: m.created_at,
        }
    }
}

/// Competition with its fish type name, as shown in lists.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CompetitionListItem {
    #[serde(flatten)]
    pub competition: CompetitionResponse,
    pub fish_type_name: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompetitionDetail {
    #[serde(flatten)]
    pub competition: CompetitionResponse,
    pub fish_type_name: Option<String>,
    /// Number of joined participants.
    pub user_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompetitionDetailResponse {
    pub result: CompetitionDetail,
    /// Top three participants; empty for unranked competitions.
    pub ranking: Vec<RankingEntry>,
    /// Whether the caller has joined.
    pub my_status: bool,
}

#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
pub struct RankingEntry {
    pub user: UserSummary,
    /// Value of the competition's active record slot; `null` before the first
    /// scored fish.
    pub record: Option<f64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompetitionRankingResponse {
    pub result: Vec<RankingEntry>,
    /// 1-based rank of the caller within `result`; `null` when the caller is
    /// not in the returned window.
    pub my_ranking: Option<u64>,
    /// Whether the caller appears in the returned window.
    pub participating: bool,
}

/// A competition the user joined, with their live record in it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipationResponse {
    pub competition: CompetitionListItem,
    pub record: Option<f64>,
    pub joined_at: DateTime<Utc>,
}

fn validate_rules(
    mode: CompetitionMode,
    rank_fish_number: i32,
    quest_fish_width: f64,
    quest_special_width: f64,
) -> Result<(), AppError> {
    if rank_fish_number < 0 || (mode == CompetitionMode::TopSum && rank_fish_number == 0) {
        return Err(AppError::Rejected("COMPETITION.INVALID_RANK_FISH_NUMBER"));
    }
    validate_width(quest_fish_width, "COMPETITION.INVALID_QUEST_WIDTH")?;
    validate_width(quest_special_width, "COMPETITION.INVALID_QUEST_WIDTH")?;
    Ok(())
}

pub fn validate_create_competition(req: &CreateCompetitionRequest) -> Result<(), AppError> {
    validate_text(&req.name, 256, "COMPETITION.INVALID_NAME")?;
    if req.end_date <= req.start_date {
        return Err(AppError::Rejected("COMPETITION.INVALID_DATES"));
    }
    validate_rules(
        req.mode,
        req.rank_fish_number,
        req.quest_fish_width,
        req.quest_special_width,
    )
}

/// Field checks of a patch; cross-field checks against stored values happen
/// in [`merged_rules_are_valid`].
pub fn validate_update_competition(req: &UpdateCompetitionRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_text(name, 256, "COMPETITION.INVALID_NAME")?;
    }
    if let Some(width) = req.quest_fish_width {
        validate_width(width, "COMPETITION.INVALID_QUEST_WIDTH")?;
    }
    if let Some(width) = req.quest_special_width {
        validate_width(width, "COMPETITION.INVALID_QUEST_WIDTH")?;
    }
    Ok(())
}

/// Check a patch against the stored competition it will be merged into.
pub fn merged_rules_are_valid(
    existing: &competition::Model,
    req: &UpdateCompetitionRequest,
) -> Result<(), AppError> {
    let start = req.start_date.unwrap_or(existing.start_date);
    let end = req.end_date.unwrap_or(existing.end_date);
    if end <= start {
        return Err(AppError::Rejected("COMPETITION.INVALID_DATES"));
    }
    validate_rules(
        req.mode.unwrap_or(existing.mode),
        req.rank_fish_number.unwrap_or(existing.rank_fish_number),
        req.quest_fish_width.unwrap_or(existing.quest_fish_width),
        req.quest_special_width.unwrap_or(existing.quest_special_width),
    )
}
