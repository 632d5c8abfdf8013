use serde::{Deserialize, Serialize};
use std::fmt;

/// Verification state of a submitted fish.
///
/// A fish starts [`FishStatus::Pending`] and moves to [`FishStatus::Verified`]
/// exactly once. Serialized as `0` / `1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
#[serde(try_from = "i32", into = "i32")]
pub enum FishStatus {
    /// Submitted by the angler, waiting for an administrator.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Pending,
    /// Checked by an administrator; counts toward records.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    Verified,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid fish status {0}. Valid values: 0 (pending), 1 (verified)")]
pub struct ParseFishStatusError(pub i32);

impl FishStatus {
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Whether a fish in this state may be verified.
    pub fn can_verify(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl TryFrom<i32> for FishStatus {
    type Error = ParseFishStatusError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Verified),
            other => Err(ParseFishStatusError(other)),
        }
    }
}

impl From<FishStatus> for i32 {
    fn from(status: FishStatus) -> Self {
        match status {
            FishStatus::Pending => 0,
            FishStatus::Verified => 1,
        }
    }
}

impl fmt::Display for FishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
        })
    }
}
