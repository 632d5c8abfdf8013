use common::CompetitionMode;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Participation of a user in a competition, with one record slot per mode.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_competition")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub competition_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "competition_id", to = "id")]
    pub competition: HasOne<super::competition::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub record1: Option<f64>,
    pub record2: Option<f64>,
    pub record3: Option<f64>,
    pub record4: Option<f64>,
    pub record5: Option<f64>,

    pub joined_at: DateTimeUtc,
}

impl Model {
    /// The record slot written by `mode`.
    pub fn record_for(&self, mode: CompetitionMode) -> Option<f64> {
        match mode.record_slot()? {
            1 => self.record1,
            2 => self.record2,
            3 => self.record3,
            4 => self.record4,
            _ => self.record5,
        }
    }
}

impl ActiveModel {
    /// Stage `value` into the record slot written by `mode`. No-op for unranked.
    pub fn set_record(&mut self, mode: CompetitionMode, value: f64) {
        match mode.record_slot() {
            Some(1) => self.record1 = Set(Some(value)),
            Some(2) => self.record2 = Set(Some(value)),
            Some(3) => self.record3 = Set(Some(value)),
            Some(4) => self.record4 = Set(Some(value)),
            Some(_) => self.record5 = Set(Some(value)),
            None => {}
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
