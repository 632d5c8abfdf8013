use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's all-time widest verified fish across every competition.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// The fish that set the record.
    pub fish_id: i32,
    #[sea_orm(belongs_to, from = "fish_id", to = "id")]
    pub fish: HasOne<super::fish::Entity>,
    pub fish_type_id: Option<i32>,

    pub record: f64,
    pub fish_image: Option<String>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
