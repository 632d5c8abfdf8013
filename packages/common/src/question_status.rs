use serde::{Deserialize, Serialize};

/// Whether a question has been answered. Serialized as `1` (answered) / `2` (pending).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
#[serde(try_from = "i32", into = "i32")]
pub enum QuestionStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Answered,
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid question status {0}. Valid values: 1 (answered), 2 (pending)")]
pub struct ParseQuestionStatusError(pub i32);

impl TryFrom<i32> for QuestionStatus {
    type Error = ParseQuestionStatusError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Answered),
            2 => Ok(Self::Pending),
            other => Err(ParseQuestionStatusError(other)),
        }
    }
}

impl From<QuestionStatus> for i32 {
    fn from(status: QuestionStatus) -> Self {
        match status {
            QuestionStatus::Answered => 1,
            QuestionStatus::Pending => 2,
        }
    }
}
