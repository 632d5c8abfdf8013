use common::FishStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A catch submitted to a competition.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fish")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub competition_id: i32,
    #[sea_orm(belongs_to, from = "competition_id", to = "id")]
    pub competition: HasOne<super::competition::Entity>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// Set by the angler or filled in at verification.
    pub fish_type_id: Option<i32>,
    #[sea_orm(belongs_to, from = "fish_type_id", to = "id")]
    pub fish_type: HasOne<super::fish_type::Entity>,
    pub fish_width: Option<f64>,

    pub status: FishStatus,

    #[sea_orm(has_many)]
    pub images: HasMany<super::fish_image::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::diary_comment::Entity>,

    /// Submission time, overwritten with the verification time.
    pub register_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
