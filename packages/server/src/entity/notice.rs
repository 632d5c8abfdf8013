use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub notice_type_id: Option<i32>,
    #[sea_orm(belongs_to, from = "notice_type_id", to = "id", on_delete = "SetNull")]
    pub notice_type: HasOne<super::notice_type::Entity>,

    pub title: String,
    pub content: String,

    pub created_date: DateTimeUtc,
    pub updated_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
