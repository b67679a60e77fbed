//! Metric calculations for statistics.
//!
//! Streaks and weekday distributions computed from completed tasks, plus the
//! guarded ratio helpers every other calculator uses.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{date_from_epoch_day, day_of, epoch_day};
use crate::tasks::Task;

/// Weekday names in the fixed Sunday-first order used for bucketing.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn percentage(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as i64
}

/// Rounded mean, or `None` for an empty input.
///
/// The sum is accumulated in `i128`, so any mix of `i64` values averages
/// without overflow.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn average_minutes<I: IntoIterator<Item = i64>>(values: I) -> Option<i64> {
    let (sum, count) = values
        .into_iter()
        .fold((0i128, 0usize), |(sum, count), v| (sum + i128::from(v), count + 1));
    if count == 0 {
        return None;
    }
    Some((sum as f64 / count as f64).round() as i64)
}

/// Distinct UTC completion days of the completed tasks, ascending.
fn completion_days(tasks: &[Task]) -> BTreeSet<i64> {
    tasks
        .iter()
        .filter_map(Task::completion)
        .map(day_of)
        .collect()
}

fn longest_run(days: &BTreeSet<i64>) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<i64> = None;

    for &day in days {
        run = match prev {
            Some(p) if day - p == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}

/// Longest run of consecutive calendar days with at least one completion.
///
/// Several completions on one day count once. Returns 0 when nothing was
/// completed.
#[must_use]
pub fn longest_streak(tasks: &[Task]) -> usize {
    longest_run(&completion_days(tasks))
}

/// Streak information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    /// Current streak (consecutive days with completions, ending today or yesterday)
    pub current: usize,
    /// Longest streak in the input
    pub longest: usize,
    /// Last completion date
    pub last_completion: Option<NaiveDate>,
    /// Days since last completion
    pub days_since_completion: usize,
}

impl StreakInfo {
    /// Calculate streaks as seen from `today`.
    #[must_use]
    pub fn calculate(tasks: &[Task], today: NaiveDate) -> Self {
        let days = completion_days(tasks);
        let Some(&last) = days.last() else {
            return Self {
                current: 0,
                longest: 0,
                last_completion: None,
                days_since_completion: 0,
            };
        };

        let today = epoch_day(today);
        // A streak is still alive until a full day passes without a completion.
        let anchor = if days.contains(&today) {
            Some(today)
        } else if days.contains(&(today - 1)) {
            Some(today - 1)
        } else {
            None
        };
        let current = anchor.map_or(0, |start| {
            (0..).take_while(|back| days.contains(&(start - back))).count()
        });

        Self {
            current,
            longest: longest_run(&days),
            last_completion: date_from_epoch_day(last),
            days_since_completion: usize::try_from(today - last).unwrap_or(0),
        }
    }
}

/// The weekday with the most completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductiveDay {
    /// Winning weekday name, `None` when there are no completions
    pub day: Option<String>,
    /// Completions on the winning weekday
    pub count: usize,
    /// Completions per weekday, Sunday first
    pub by_weekday: [usize; 7],
}

impl ProductiveDay {
    /// Bucket completions by weekday and pick the leader.
    ///
    /// The leader only changes on a strictly greater count while walking the
    /// Sunday-first table, so ties go to the earliest weekday in that order.
    #[must_use]
    pub fn calculate(tasks: &[Task]) -> Self {
        let mut by_weekday = [0usize; 7];
        for completed in tasks.iter().filter_map(Task::completion) {
            let slot = completed.date_naive().weekday().num_days_from_sunday() as usize;
            by_weekday[slot] += 1;
        }

        let mut leader: Option<usize> = None;
        let mut count = 0;
        for (slot, &n) in by_weekday.iter().enumerate() {
            if n > count {
                leader = Some(slot);
                count = n;
            }
        }

        Self {
            day: leader.map(|slot| WEEKDAY_NAMES[slot].to_string()),
            count,
            by_weekday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fixtures::{at, done, pending};

    fn completed_on(days: &[(u32, u32)]) -> Vec<Task> {
        days.iter()
            .enumerate()
            .map(|(i, &(month, day))| {
                done(i as i64, at(2025, month, 1, 8), at(2025, month, day, 15))
            })
            .collect()
    }

    #[test]
    fn test_percentage_guards_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(4, 5), 80);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_average_minutes() {
        assert_eq!(average_minutes(Vec::new()), None);
        assert_eq!(average_minutes([30, 45]), Some(38));
        assert_eq!(average_minutes([0]), Some(0));
    }

    #[test]
    fn test_average_minutes_huge_values() {
        let big = i64::MAX / 2 + 10;
        assert_eq!(average_minutes([i64::MAX, i64::MAX]), Some(i64::MAX));
        assert!(average_minutes([big, big]).is_some_and(|m| m > 0));
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(longest_streak(&[]), 0);
        let streak = StreakInfo::calculate(&[], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
        assert!(streak.last_completion.is_none());
    }

    #[test]
    fn test_streak_ignores_pending_tasks() {
        let tasks = vec![pending(1, at(2025, 9, 1, 8))];
        assert_eq!(longest_streak(&tasks), 0);
    }

    #[test]
    fn test_consecutive_days() {
        let tasks = completed_on(&[(9, 1), (9, 2), (9, 3), (9, 4)]);
        assert_eq!(longest_streak(&tasks), 4);
    }

    #[test]
    fn test_same_day_counts_once() {
        let tasks = completed_on(&[(9, 1), (9, 1), (9, 1), (9, 2)]);
        assert_eq!(longest_streak(&tasks), 2);
    }

    #[test]
    fn test_gap_resets_run() {
        let tasks = completed_on(&[(9, 1), (9, 2), (9, 4), (9, 5), (9, 6), (9, 10)]);
        assert_eq!(longest_streak(&tasks), 3);
    }

    #[test]
    fn test_no_consecutive_days_is_one() {
        let tasks = completed_on(&[(9, 1), (9, 3), (9, 5)]);
        assert_eq!(longest_streak(&tasks), 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let tasks = completed_on(&[(8, 30), (8, 31), (9, 1)]);
        assert_eq!(longest_streak(&tasks), 3);
    }

    #[test]
    fn test_completion_day_is_utc_date() {
        // 23:00 and 00:00 the next day are two different days.
        let tasks = vec![
            done(1, at(2025, 9, 1, 8), at(2025, 9, 1, 23)),
            done(2, at(2025, 9, 1, 8), at(2025, 9, 2, 0)),
        ];
        assert_eq!(longest_streak(&tasks), 2);
    }

    #[test]
    fn test_current_streak_from_yesterday() {
        let tasks = completed_on(&[(9, 1), (9, 2), (9, 3)]);
        let today = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap();

        let streak = StreakInfo::calculate(&tasks, today);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
        assert_eq!(streak.days_since_completion, 1);
        assert_eq!(
            streak.last_completion,
            NaiveDate::from_ymd_opt(2025, 9, 3)
        );
    }

    #[test]
    fn test_current_streak_broken() {
        let tasks = completed_on(&[(9, 1), (9, 2)]);
        let today = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();

        let streak = StreakInfo::calculate(&tasks, today);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 2);
        assert_eq!(streak.days_since_completion, 3);
    }

    #[test]
    fn test_productive_day() {
        // 2025-09-01 is a Monday, 2025-09-03 a Wednesday.
        let tasks = completed_on(&[(9, 1), (9, 3), (9, 3), (9, 10)]);
        let day = ProductiveDay::calculate(&tasks);

        assert_eq!(day.day.as_deref(), Some("Wednesday"));
        assert_eq!(day.count, 3);
        assert_eq!(day.by_weekday, [0, 1, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn test_productive_day_tie_goes_to_earliest_weekday() {
        // Saturday 2025-09-06 and Sunday 2025-09-07, one each.
        let tasks = completed_on(&[(9, 6), (9, 7)]);
        let day = ProductiveDay::calculate(&tasks);

        assert_eq!(day.day.as_deref(), Some("Sunday"));
        assert_eq!(day.count, 1);
    }

    #[test]
    fn test_productive_day_empty() {
        let day = ProductiveDay::calculate(&[pending(1, at(2025, 9, 1, 8))]);
        assert!(day.day.is_none());
        assert_eq!(day.count, 0);
    }
}
