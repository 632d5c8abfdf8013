use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notice_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub label: String,

    #[sea_orm(has_many)]
    pub notices: HasMany<super::notice::Entity>,

    pub created_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
