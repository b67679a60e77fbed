//! Celebration messages and estimation insights.
//!
//! Wording lives in one table with a row per tone. Adding a tone means adding
//! a row; the tier logic never changes. Output depends only on the inputs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::accuracy::{AccuracyStats, EstimateCategory};

/// Streaks longer than this earn the top-tier streak message.
const LONG_STREAK_DAYS: i64 = 7;

/// Wording style for generated messages.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Enthusiastic, with emoji.
    #[default]
    Upbeat,
    /// Encouraging but calm.
    Measured,
    /// Plain statement of the numbers.
    Neutral,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upbeat => write!(f, "upbeat"),
            Self::Measured => write!(f, "measured"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Full template set for one tone.
///
/// Placeholders: `{rate}`, `{completed}`, `{streak}`, `{accuracy}`.
struct ToneTemplates {
    tone: Tone,
    outstanding_streak: &'static str,
    outstanding: &'static str,
    great: &'static str,
    good: &'static str,
    started: &'static str,
    nothing_yet: &'static str,
    underestimating: &'static str,
    overestimating: &'static str,
    on_target: &'static str,
}

const TEMPLATES: [ToneTemplates; 3] = [
    ToneTemplates {
        tone: Tone::Upbeat,
        outstanding_streak: "🔥 Incredible month! {rate}% completion and a {streak}-day streak. You're unstoppable!",
        outstanding: "🎉 Outstanding month! You finished {rate}% of your tasks ({completed} done).",
        great: "💪 Great work! {completed} tasks done at a {rate}% completion rate.",
        good: "👍 Solid progress: {rate}% of your tasks done, {completed} in total. Keep going!",
        started: "🌱 You're off the ground with {completed} completed. Every task counts!",
        nothing_yet: "✨ Nothing completed yet this month. Your first win is waiting!",
        underestimating: "⏱️ Tasks ran longer than planned. Try padding estimates a little (accuracy {accuracy}%).",
        overestimating: "🚀 You finished faster than you planned. Trust your speed (accuracy {accuracy}%)!",
        on_target: "🎯 Your estimates are landing well: {accuracy}% accuracy.",
    },
    ToneTemplates {
        tone: Tone::Measured,
        outstanding_streak: "Excellent month: {rate}% completion with a {streak}-day streak.",
        outstanding: "Excellent month: {rate}% of tasks completed ({completed} done).",
        great: "Good month: {completed} tasks completed, {rate}% completion rate.",
        good: "Steady progress: {rate}% completion, {completed} tasks done.",
        started: "A start: {completed} completed this month. Momentum builds from here.",
        nothing_yet: "No tasks completed yet this month. There is still time.",
        underestimating: "Tasks tend to take longer than estimated (accuracy {accuracy}%). Consider larger estimates.",
        overestimating: "Tasks tend to finish sooner than estimated (accuracy {accuracy}%). Estimates could be tighter.",
        on_target: "Estimates are reasonably close to actual time ({accuracy}% accuracy).",
    },
    ToneTemplates {
        tone: Tone::Neutral,
        outstanding_streak: "Completion rate: {rate}%. Completed: {completed}. Longest streak: {streak} days.",
        outstanding: "Completion rate: {rate}%. Completed: {completed}.",
        great: "Completion rate: {rate}%. Completed: {completed}.",
        good: "Completion rate: {rate}%. Completed: {completed}.",
        started: "Completion rate: {rate}%. Completed: {completed}.",
        nothing_yet: "Completion rate: 0%. Completed: 0.",
        underestimating: "Estimation accuracy: {accuracy}%. Most misses were underestimates.",
        overestimating: "Estimation accuracy: {accuracy}%. Most misses were overestimates.",
        on_target: "Estimation accuracy: {accuracy}%.",
    },
];

fn templates(tone: Tone) -> &'static ToneTemplates {
    TEMPLATES
        .iter()
        .find(|row| row.tone == tone)
        .unwrap_or(&TEMPLATES[0])
}

fn fill(template: &str, rate: i64, completed: i64, streak: i64) -> String {
    template
        .replace("{rate}", &rate.to_string())
        .replace("{completed}", &completed.to_string())
        .replace("{streak}", &streak.to_string())
}

/// Celebration message in the default (upbeat) tone.
#[must_use]
pub fn celebration_message(completion_rate: i64, completed: i64, longest_streak: i64) -> String {
    celebration_message_with_tone(completion_rate, completed, longest_streak, Tone::default())
}

/// Celebration message for a month's aggregates.
///
/// Tiers by completion rate: above 80 (with a separate message for streaks
/// longer than a week), above 60, above 40, above 0, and 0.
#[must_use]
pub fn celebration_message_with_tone(
    completion_rate: i64,
    completed: i64,
    longest_streak: i64,
    tone: Tone,
) -> String {
    let row = templates(tone);
    let template = match completion_rate {
        r if r > 80 && longest_streak > LONG_STREAK_DAYS => row.outstanding_streak,
        r if r > 80 => row.outstanding,
        r if r > 60 => row.great,
        r if r > 40 => row.good,
        r if r > 0 => row.started,
        _ => row.nothing_yet,
    };
    fill(template, completion_rate, completed, longest_streak)
}

/// One-line insight about estimation habits, `None` if nothing was analyzed.
#[must_use]
pub fn accuracy_insight(stats: &AccuracyStats, tone: Tone) -> Option<String> {
    let accuracy = stats.accuracy?;
    let row = templates(tone);
    let template = match stats.dominant_bias() {
        Some(EstimateCategory::Underestimate) => row.underestimating,
        Some(EstimateCategory::Overestimate) => row.overestimating,
        Some(EstimateCategory::Accurate) | None => row.on_target,
    };
    Some(template.replace("{accuracy}", &accuracy.to_string()))
}
