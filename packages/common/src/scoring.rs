//! Per-competition record computation.
//!
//! Each verification of a fish produces at most one new value for the
//! participant's active record slot. The rules are pure: the caller loads the
//! current record and, for the aggregate modes, the widths of every verified
//! fish the participant has in the competition (including the one just
//! verified), then persists whatever [`ScoringRules::apply`] returns.

use crate::competition_mode::CompetitionMode;

/// Scoring parameters of a competition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringRules {
    pub mode: CompetitionMode,
    /// How many of the widest fish are summed in [`CompetitionMode::TopSum`].
    pub rank_fish_number: u32,
    /// Minimum width counted by [`CompetitionMode::ThresholdCount`].
    pub quest_fish_width: f64,
    /// Target width of [`CompetitionMode::ClosestToTarget`].
    pub quest_special_width: f64,
}

/// A single verification event as seen by the scoring rules.
#[derive(Clone, Copy, Debug)]
pub struct Verification<'a> {
    /// Width of the fish that was just verified.
    pub width: f64,
    /// Widths of all verified fish of this participant in the competition,
    /// the new one included. Only read when [`ScoringRules::needs_history`].
    pub verified_widths: &'a [f64],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordUpdate {
    /// Keep the stored record.
    Unchanged,
    /// Replace the stored record.
    Set(f64),
}

impl RecordUpdate {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Unchanged => None,
            Self::Set(v) => Some(v),
        }
    }
}

impl ScoringRules {
    /// Whether [`Verification::verified_widths`] must be loaded for this mode.
    pub fn needs_history(&self) -> bool {
        matches!(self.mode, CompetitionMode::TopSum | CompetitionMode::MaxWidth)
    }

    /// Compute the next record value from the stored one.
    ///
    /// `current` is the participant's active slot; `None` means no record yet
    /// (zero for the counting modes, infinitely far for the target mode).
    pub fn apply(&self, current: Option<f64>, verification: &Verification<'_>) -> RecordUpdate {
        match self.mode {
            CompetitionMode::Unranked => RecordUpdate::Unchanged,
            CompetitionMode::TopSum => RecordUpdate::Set(sum_top_n(
                verification.verified_widths,
                self.rank_fish_number as usize,
            )),
            CompetitionMode::MaxWidth => RecordUpdate::Set(
                verification
                    .verified_widths
                    .iter()
                    .copied()
                    .fold(verification.width, f64::max),
            ),
            CompetitionMode::Count => RecordUpdate::Set(current.unwrap_or(0.0) + 1.0),
            CompetitionMode::ThresholdCount => {
                if verification.width >= self.quest_fish_width {
                    RecordUpdate::Set(current.unwrap_or(0.0) + 1.0)
                } else {
                    RecordUpdate::Unchanged
                }
            }
            CompetitionMode::ClosestToTarget => {
                let deviation = verification.width - self.quest_special_width;
                match current {
                    Some(stored) if deviation.abs() >= stored.abs() => RecordUpdate::Unchanged,
                    _ => RecordUpdate::Set(deviation),
                }
            }
        }
    }
}

/// Sum of the `n` largest widths (all of them when fewer than `n` exist).
pub fn sum_top_n(widths: &[f64], n: usize) -> f64 {
    let mut sorted = widths.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.into_iter().take(n).sum()
}

/// Whether `candidate` should replace a stored personal best.
///
/// Only a strictly wider fish replaces the stored value.
pub fn beats_personal_best(stored: Option<f64>, candidate: f64) -> bool {
    match stored {
        None => true,
        Some(best) => candidate > best,
    }
}
