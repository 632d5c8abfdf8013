use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "answer_comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub question_id: i32,
    #[sea_orm(belongs_to, from = "question_id", to = "id", on_delete = "Cascade")]
    pub question: HasOne<super::question::Entity>,

    pub user_id: i32,
    pub comment: String,
    pub created_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
