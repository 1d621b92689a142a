//! Top-gems ranking helpers.

use chrono::{Datelike, Months, NaiveDate};

use crate::types::PreparedMovie;

/// The `n` highest-scoring rows, best first.
///
/// Ties keep their input order; the input is never mutated.
#[must_use]
pub fn top_gems(rows: &[PreparedMovie], n: usize) -> Vec<PreparedMovie> {
    let mut ranked: Vec<PreparedMovie> = rows.to_vec();
    ranked.sort_by(|a, b| b.gems_score.total_cmp(&a.gems_score));
    ranked.truncate(n);
    ranked
}

/// First and last day of the calendar month before `today`.
#[must_use]
pub fn previous_month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_current = today.with_day(1).unwrap_or(today);
    let last = first_of_current.pred_opt().unwrap_or(first_of_current);
    let first = first_of_current
        .checked_sub_months(Months::new(1))
        .unwrap_or(first_of_current);
    (first, last)
}

/// The `n` top gems released in the month before `today`.
#[must_use]
pub fn previous_month_gems(
    rows: &[PreparedMovie],
    today: NaiveDate,
    n: usize,
) -> Vec<PreparedMovie> {
    let (first, last) = previous_month_bounds(today);
    let in_window: Vec<PreparedMovie> = rows
        .iter()
        .filter(|row| {
            row.release_date
                .is_some_and(|date| date >= first && date <= last)
        })
        .cloned()
        .collect();
    top_gems(&in_window, n)
}
