use common::CompetitionMode;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "competition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub competition_type: i32,
    pub description: String,

    pub fish_type_id: Option<i32>,
    #[sea_orm(belongs_to, from = "fish_type_id", to = "id")]
    pub fish_type: HasOne<super::fish_type::Entity>,

    /// Scoring rule; selects which `recordN` slot of `user_competition` is live.
    pub mode: CompetitionMode,
    /// Epoch milliseconds. The competition is running on `[start_date, end_date)`.
    pub start_date: i64,
    pub end_date: i64,

    /// Number of widest fish summed in top-sum mode.
    pub rank_fish_number: i32,
    /// Minimum width counted in threshold-count mode.
    pub quest_fish_width: f64,
    /// Target width in closest-to-target mode.
    pub quest_special_width: f64,

    #[sea_orm(has_many)]
    pub fish: HasMany<super::fish::Entity>,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Whether `now_ms` falls inside the half-open window.
    pub fn is_running_at(&self, now_ms: i64) -> bool {
        self.start_date <= now_ms && now_ms < self.end_date
    }
}

impl ActiveModelBehavior for ActiveModel {}
