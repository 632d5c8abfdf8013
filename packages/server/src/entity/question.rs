use common::QuestionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub question: String,
    pub user_id: i32,
    pub question_date: DateTimeUtc,

    pub answer: Option<String>,
    pub answer_date: Option<DateTimeUtc>,
    pub status: QuestionStatus,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::answer_comment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
