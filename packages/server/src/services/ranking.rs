//! Competition and global leaderboards.

use common::ranking::{caller_rank, rank_rows};
use sea_orm::*;

use crate::entity::{competition, user_competition, user_record};
use crate::error::AppError;
use crate::models::competition::RankingEntry;
use crate::models::fish::{RealtimeEntry, RealtimeRankingResponse};
use crate::utils::lookup;

/// A leaderboard window and the caller's place in it.
pub struct Standing<T> {
    pub entries: Vec<T>,
    /// 1-based; `None` when the caller is anonymous or outside `entries`.
    pub my_ranking: Option<u64>,
}

/// Rank every participant of `competition` by its active record slot.
///
/// Unranked competitions have an empty leaderboard.
pub async fn competition_standing<C: ConnectionTrait>(
    db: &C,
    competition: &competition::Model,
    limit: Option<u64>,
    caller: Option<i32>,
) -> Result<Standing<RankingEntry>, AppError> {
    let Some(order) = competition.mode.record_order() else {
        return Ok(Standing {
            entries: Vec::new(),
            my_ranking: None,
        });
    };
    let mode = competition.mode;

    let rows = user_competition::Entity::find()
        .filter(user_competition::Column::CompetitionId.eq(competition.id))
        .order_by_asc(user_competition::Column::UserId)
        .all(db)
        .await?;

    let ranked = rank_rows(rows, order, limit, |row| row.record_for(mode));
    let my_ranking = caller.and_then(|uid| caller_rank(&ranked, |row| row.user_id == uid));

    let users = lookup::user_summaries(db, ranked.iter().map(|row| row.user_id)).await?;
    let entries = ranked
        .into_iter()
        .map(|row| RankingEntry {
            user: lookup::summary_of(&users, row.user_id),
            record: row.record_for(mode),
        })
        .collect();

    Ok(Standing {
        entries,
        my_ranking,
    })
}

/// Rank personal bests, widest first.
///
/// `fish_type_id` of `None` or `Some(0)` ranks every species.
pub async fn realtime_standing<C: ConnectionTrait>(
    db: &C,
    fish_type_id: Option<i32>,
    limit: Option<u64>,
    offset: Option<u64>,
    caller: Option<i32>,
) -> Result<RealtimeRankingResponse, AppError> {
    let mut select = user_record::Entity::find()
        .order_by_desc(user_record::Column::Record)
        .order_by_asc(user_record::Column::Id);
    if let Some(type_id) = fish_type_id.filter(|&id| id != 0) {
        select = select.filter(user_record::Column::FishTypeId.eq(type_id));
    }
    let rows = select.limit(limit).offset(offset).all(db).await?;

    let users = lookup::user_summaries(db, rows.iter().map(|r| r.user_id)).await?;
    let type_names =
        lookup::fish_type_names(db, rows.iter().filter_map(|r| r.fish_type_id)).await?;

    let entries: Vec<RealtimeEntry> = rows
        .into_iter()
        .map(|r| RealtimeEntry {
            user: lookup::summary_of(&users, r.user_id),
            record: r.record,
            fish_id: r.fish_id,
            fish_type_name: r.fish_type_id.and_then(|id| type_names.get(&id).cloned()),
            fish_type_id: r.fish_type_id,
            fish_image: r.fish_image,
        })
        .collect();

    let position = caller.and_then(|uid| caller_rank(&entries, |e| e.user.id == uid));
    let my_fish = position
        .and_then(|pos| entries.get(usize::try_from(pos).ok()? - 1))
        .cloned();
    // Ranks count from the top of the board, not from the window.
    let my_ranking = position.map(|pos| pos + offset.unwrap_or(0));

    Ok(RealtimeRankingResponse {
        result: entries,
        my_ranking,
        my_fish,
    })
}
