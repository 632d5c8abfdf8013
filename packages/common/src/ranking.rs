//! Leaderboard ordering and caller lookup.

use std::cmp::Ordering;

use crate::competition_mode::RecordOrder;

/// Compare two record values under `order`. Missing values sort last.
pub fn compare_records(order: RecordOrder, a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            RecordOrder::Descending => b.total_cmp(&a),
            RecordOrder::ClosestToZero => a.abs().total_cmp(&b.abs()),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort `rows` best-first and keep at most `limit` of them.
///
/// The sort is stable, so rows with equal records keep the order they were
/// loaded in. `None` keeps every row.
pub fn rank_rows<T, F>(mut rows: Vec<T>, order: RecordOrder, limit: Option<u64>, record: F) -> Vec<T>
where
    F: Fn(&T) -> Option<f64>,
{
    rows.sort_by(|a, b| compare_records(order, record(a), record(b)));
    if let Some(limit) = limit {
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    rows
}

/// 1-based position of the first row matching `is_caller`, scanning only the
/// rows given. A caller outside the window is `None`, never `Some(0)`.
pub fn caller_rank<T, F>(rows: &[T], is_caller: F) -> Option<u64>
where
    F: Fn(&T) -> bool,
{
    rows.iter()
        .position(is_caller)
        .map(|idx| idx as u64 + 1)
}
