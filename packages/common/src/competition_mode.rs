use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring rule of a competition.
///
/// Stored as an integer column (`0..=5`) and serialized as the same integer on
/// the wire. When the `sea-orm` feature is enabled, this enum can be used
/// directly in SeaORM entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
#[serde(try_from = "i32", into = "i32")]
pub enum CompetitionMode {
    /// No ranking.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Unranked,
    /// Sum of the N widest verified fish.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    TopSum,
    /// Widest single verified fish.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    MaxWidth,
    /// Number of verified fish.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 3))]
    Count,
    /// Number of verified fish at or above the quest width.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 4))]
    ThresholdCount,
    /// Signed deviation of the fish closest to the quest target width.
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 5))]
    ClosestToTarget,
}

/// How record values of a mode compare on a leaderboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOrder {
    /// Higher value ranks first.
    Descending,
    /// Smaller absolute value ranks first; the sign is ignored.
    ClosestToZero,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid competition mode {0}. Valid values: 0-5")]
pub struct ParseModeError(pub i32);

impl CompetitionMode {
    pub const ALL: &'static [CompetitionMode] = &[
        Self::Unranked,
        Self::TopSum,
        Self::MaxWidth,
        Self::Count,
        Self::ThresholdCount,
        Self::ClosestToTarget,
    ];

    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unranked => 0,
            Self::TopSum => 1,
            Self::MaxWidth => 2,
            Self::Count => 3,
            Self::ThresholdCount => 4,
            Self::ClosestToTarget => 5,
        }
    }

    /// Index of the `recordN` slot this mode writes, or `None` for [`Self::Unranked`].
    pub fn record_slot(self) -> Option<usize> {
        match self {
            Self::Unranked => None,
            other => Some(other.as_i32() as usize),
        }
    }

    pub fn is_ranked(self) -> bool {
        !matches!(self, Self::Unranked)
    }

    /// Quest competitions are every ranked mode except the plain top-N sum.
    pub fn is_quest(self) -> bool {
        self.as_i32() > 1
    }

    pub fn record_order(self) -> Option<RecordOrder> {
        match self {
            Self::Unranked => None,
            Self::ClosestToTarget => Some(RecordOrder::ClosestToZero),
            _ => Some(RecordOrder::Descending),
        }
    }
}

impl TryFrom<i32> for CompetitionMode {
    type Error = ParseModeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unranked),
            1 => Ok(Self::TopSum),
            2 => Ok(Self::MaxWidth),
            3 => Ok(Self::Count),
            4 => Ok(Self::ThresholdCount),
            5 => Ok(Self::ClosestToTarget),
            other => Err(ParseModeError(other)),
        }
    }
}

impl From<CompetitionMode> for i32 {
    fn from(mode: CompetitionMode) -> Self {
        mode.as_i32()
    }
}

impl fmt::Display for CompetitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
