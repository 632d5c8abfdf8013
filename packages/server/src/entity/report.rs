use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a freshly filed report.
pub const STATUS_OPEN: i32 = 1;

/// A complaint filed by `reporter_id` against `user_id`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    pub reporter_id: i32,
    pub report_type: i32,
    pub content: String,
    pub status: i32,

    pub created_date: DateTimeUtc,
    pub updated_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
