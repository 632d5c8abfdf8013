use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Public-facing angler profile, one per user.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub nickname: String,
    pub style: String,
    pub level: i32,
    pub avatar: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
