use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `user_type` of regular angler accounts.
pub const ANGLER_TYPE: i32 = 1;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,

    pub role: String,
    #[sea_orm(belongs_to, from = "role", to = "name")]
    pub role_ref: HasOne<super::role::Entity>,

    pub user_type: i32,

    #[sea_orm(has_one)]
    pub profile: HasOne<super::profile::Entity>,

    #[sea_orm(has_many)]
    pub fish: HasMany<super::fish::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
