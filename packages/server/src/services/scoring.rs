//! Verification of a fish and everything it triggers.
//!
//! The fish transition, the competition record and the personal best are
//! written in one transaction. The owning user's row is locked first, so two
//! verifications for the same angler run one after the other.

use chrono::Utc;
use common::scoring::{RecordUpdate, ScoringRules, Verification, beats_personal_best};
use common::FishStatus;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::*;
use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::entity::{competition, fish, fish_image, user, user_competition, user_record};
use crate::error::AppError;
use crate::utils::lookup;

/// Confirmed measurements of a fish.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub fish_type_id: i32,
    pub width: f64,
}

/// What a verification changed.
#[derive(Debug)]
pub struct VerificationOutcome {
    pub fish: fish::Model,
    pub record: RecordUpdate,
    pub personal_best: bool,
}

pub fn rules_of(competition: &competition::Model) -> ScoringRules {
    ScoringRules {
        mode: competition.mode,
        rank_fish_number: u32::try_from(competition.rank_fish_number).unwrap_or(0),
        quest_fish_width: competition.quest_fish_width,
        quest_special_width: competition.quest_special_width,
    }
}

/// Mark a pending fish verified and apply its scoring side effects.
pub async fn verify_fish(
    db: &DatabaseConnection,
    config: &ScoringConfig,
    fish_id: i32,
    measurement: Measurement,
) -> Result<VerificationOutcome, AppError> {
    let txn = db.begin().await?;

    let pending = fish::Entity::find_by_id(fish_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("FISH_NOT_FOUND"))?;
    if !pending.status.can_verify() {
        return Err(AppError::Rejected("FISH_ALREADY_VERIFIED"));
    }

    user::Entity::find_by_id(pending.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("USER_NOT_FOUND"))?;

    lookup::require_fish_type(&txn, measurement.fish_type_id).await?;
    let competition = lookup::find_competition(&txn, pending.competition_id).await?;

    let mut active: fish::ActiveModel = pending.into();
    active.fish_type_id = Set(Some(measurement.fish_type_id));
    active.fish_width = Set(Some(measurement.width));
    active.status = Set(FishStatus::Verified);
    active.register_date = Set(Utc::now());
    let verified = active.update(&txn).await?;

    let record = update_competition_record(&txn, config, &competition, &verified, measurement.width)
        .await?;
    let personal_best = update_personal_best(&txn, &verified, measurement.width).await?;

    txn.commit().await?;

    info!(
        fish_id = verified.id,
        user_id = verified.user_id,
        competition_id = verified.competition_id,
        width = measurement.width,
        "Fish verified"
    );

    Ok(VerificationOutcome {
        fish: verified,
        record,
        personal_best,
    })
}

/// Recompute the participant's active record slot for `fish`.
///
/// A participant row that does not exist is created only when `auto_enroll`
/// is on; otherwise the competition record is left alone.
async fn update_competition_record<C: ConnectionTrait>(
    db: &C,
    config: &ScoringConfig,
    competition: &competition::Model,
    fish: &fish::Model,
    width: f64,
) -> Result<RecordUpdate, AppError> {
    if !competition.mode.is_ranked() {
        return Ok(RecordUpdate::Unchanged);
    }
    let rules = rules_of(competition);

    let existing = user_competition::Entity::find_by_id((competition.id, fish.user_id))
        .lock(LockType::Update)
        .one(db)
        .await?;
    let row = match existing {
        Some(row) => row,
        None if config.auto_enroll => {
            // A concurrent join may insert the same row first.
            user_competition::Entity::insert(user_competition::ActiveModel {
                competition_id: Set(competition.id),
                user_id: Set(fish.user_id),
                joined_at: Set(Utc::now()),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([
                    user_competition::Column::CompetitionId,
                    user_competition::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
            user_competition::Entity::find_by_id((competition.id, fish.user_id))
                .lock(LockType::Update)
                .one(db)
                .await?
                .ok_or_else(|| AppError::Internal("participant row vanished".into()))?
        }
        None => {
            warn!(
                user_id = fish.user_id,
                competition_id = competition.id,
                "Verified fish of a non-participant, competition record not updated"
            );
            return Ok(RecordUpdate::Unchanged);
        }
    };

    let verified_widths: Vec<f64> = if rules.needs_history() {
        fish::Entity::find()
            .filter(fish::Column::CompetitionId.eq(competition.id))
            .filter(fish::Column::UserId.eq(fish.user_id))
            .filter(fish::Column::Status.eq(FishStatus::Verified))
            .select_only()
            .column(fish::Column::FishWidth)
            .into_tuple::<Option<f64>>()
            .all(db)
            .await?
            .into_iter()
            .flatten()
            .collect()
    } else {
        Vec::new()
    };

    let update = rules.apply(
        row.record_for(competition.mode),
        &Verification {
            width,
            verified_widths: &verified_widths,
        },
    );

    if let RecordUpdate::Set(value) = update {
        let mut active: user_competition::ActiveModel = row.into();
        active.set_record(competition.mode, value);
        active.update(db).await?;
        info!(
            user_id = fish.user_id,
            competition_id = competition.id,
            mode = %competition.mode,
            record = value,
            "Record updated"
        );
    }

    Ok(update)
}

/// Replace the user's all-time best when `fish` is strictly wider.
async fn update_personal_best<C: ConnectionTrait>(
    db: &C,
    fish: &fish::Model,
    width: f64,
) -> Result<bool, AppError> {
    let existing = user_record::Entity::find()
        .filter(user_record::Column::UserId.eq(fish.user_id))
        .lock(LockType::Update)
        .one(db)
        .await?;

    if !beats_personal_best(existing.as_ref().map(|r| r.record), width) {
        return Ok(false);
    }

    let image = fish_image::Entity::find()
        .filter(fish_image::Column::FishId.eq(fish.id))
        .order_by_asc(fish_image::Column::Id)
        .one(db)
        .await?
        .map(|img| img.image);

    let now = Utc::now();
    match existing {
        Some(row) => {
            let mut active: user_record::ActiveModel = row.into();
            active.fish_id = Set(fish.id);
            active.fish_type_id = Set(fish.fish_type_id);
            active.record = Set(width);
            active.fish_image = Set(image);
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            user_record::ActiveModel {
                user_id: Set(fish.user_id),
                fish_id: Set(fish.id),
                fish_type_id: Set(fish.fish_type_id),
                record: Set(width),
                fish_image: Set(image),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    info!(user_id = fish.user_id, record = width, "Personal best updated");
    Ok(true)
}
