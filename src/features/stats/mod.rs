//! Productivity analytics.
//!
//! Turns a month of task records into summaries and metrics:
//! - Estimation accuracy with tolerance bands
//! - Completion streaks and most productive weekday
//! - Celebration messages in a configurable tone
//! - Month-over-month and historical trends
//! - Weekly charts and sparklines

pub mod accuracy;
pub mod celebration;
pub mod metrics;
pub mod storage;
pub mod summary;
pub mod trends;
pub mod visualization;

pub use accuracy::{AccuracyStats, EstimateCategory, TaskAccuracy};
pub use celebration::{accuracy_insight, celebration_message, celebration_message_with_tone, Tone};
pub use metrics::{longest_streak, ProductiveDay, StreakInfo};
pub use storage::SummaryStorage;
pub use summary::{MonthlySummary, SummaryDraft, SummaryGenerator};
pub use trends::{
    is_improving, HistoricalTrends, MonthComparison, MonthTrend, TrendAnalyzer, TrendDirection,
    TrendIndicator,
};
pub use visualization::{
    render_bar_chart, render_progress_bar, render_sparkline, render_summary_box,
    render_weekday_chart, render_weekly_chart, PERCENT_DOMAIN,
};
