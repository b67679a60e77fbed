use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::MonthKey;
use crate::features::stats::Tone;

#[derive(Parser)]
#[command(name = "taskpulse")]
#[command(about = "A personal task tracker with monthly productivity analytics")]
#[command(long_about = "taskpulse - track tasks, then see how your months went

Record tasks with optional time estimates, complete them, and let taskpulse
summarize each month: completion rate, estimation accuracy, streaks, your most
productive weekday, and how the month compares with earlier ones.

QUICK START:
  taskpulse add \"Write report\" -e 45    Add a task with a 45 minute estimate
  taskpulse complete 1                  Complete it (duration is measured)
  taskpulse summary generate            Summarize the current month
  taskpulse chart weekly                Weekly completion chart

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Data lives in ~/.taskpulse/ unless TASKPULSE_HOME is set.")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from config.yaml, or 'pretty'.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Database file to use instead of the one in the data directory
    #[arg(long, global = true, env = "TASKPULSE_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Show debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Wording style for celebration messages and insights
    #[arg(long, value_enum, global = true)]
    pub tone: Option<Tone>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    ///
    /// # Examples
    ///
    ///   taskpulse add "Write report"
    ///   taskpulse add "Write report" -e 45 -t work -t writing
    ///   taskpulse add "Backfilled task" --at 2025-09-01
    #[command(alias = "a")]
    Add(AddArgs),

    /// List tasks
    ///
    /// Lists every task by default. Narrow to the tasks created in one month
    /// with --month, and to one state with --completed or --pending.
    ///
    /// # Examples
    ///
    ///   taskpulse list
    ///   taskpulse list --month 2025-09 --pending
    ///   taskpulse ls -o json
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single task
    Show {
        /// Task ID
        id: i64,
    },

    /// Mark a task completed
    ///
    /// Without --actual, the duration is the time between creating and
    /// completing the task, in whole minutes.
    ///
    /// # Examples
    ///
    ///   taskpulse complete 3
    ///   taskpulse complete 3 --actual 50
    ///   taskpulse complete 3 --at 2025-09-04T17:30:00Z
    #[command(alias = "done")]
    Complete {
        /// Task ID
        id: i64,

        /// Actual duration in minutes
        #[arg(long, short = 'a', value_parser = clap::value_parser!(i64).range(0..=MAX_MINUTES))]
        actual: Option<i64>,

        /// Completion time (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },

    /// Reopen a completed task
    Reopen {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: i64,
    },

    /// Generate and browse monthly summaries
    ///
    /// A summary captures one month: tasks created, completion rate, average
    /// duration, estimation accuracy, longest streak, most productive weekday
    /// and a celebration message. Generating a month again replaces its
    /// summary.
    ///
    /// # Subcommands
    ///
    ///   generate   Compute and store a month's summary
    ///   show       Show a stored summary
    ///   list       List stored summaries, newest first
    ///   delete     Remove a stored summary
    ///
    /// # Examples
    ///
    ///   taskpulse summary generate
    ///   taskpulse summary generate 2025-09 --tone neutral
    ///   taskpulse summary list --limit 6
    Summary(SummaryArgs),

    /// Estimation accuracy for a month
    ///
    /// Scores how close estimates came to actual durations for tasks created
    /// in the month. --compare adds the change against the month before.
    Accuracy {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,

        /// Compare with the previous month
        #[arg(long, short = 'c')]
        compare: bool,
    },

    /// Current and longest completion streaks
    Streak,

    /// Completions by weekday for a month
    Days {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,
    },

    /// Compare stored summaries over time
    ///
    /// Trends read stored summaries, so generate the months you want to
    /// compare first.
    ///
    /// # Examples
    ///
    ///   taskpulse trends compare
    ///   taskpulse trends compare 2025-09 --offset 12
    ///   taskpulse trends history --months 12
    Trends(TrendsArgs),

    /// Text charts
    ///
    /// # Examples
    ///
    ///   taskpulse chart weekly 2025-09
    ///   taskpulse chart sparkline --metric accuracy --months 12
    Chart(ChartArgs),

    /// Generate shell completions
    ///
    /// Example: taskpulse completions zsh > ~/.zsh/completions/_taskpulse
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for adding a task.
#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Longer description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Estimated duration in minutes
    #[arg(long, short = 'e', value_parser = clap::value_parser!(i64).range(1..=MAX_MINUTES))]
    pub estimate: Option<i64>,

    /// Tag (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Creation time (RFC 3339 or YYYY-MM-DD); defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

/// Arguments for listing tasks.
#[derive(Args)]
pub struct ListArgs {
    /// Only tasks created in this month (YYYY-MM)
    #[arg(long, short = 'm', value_parser = parse_month)]
    pub month: Option<MonthKey>,

    /// Only completed tasks
    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,

    /// Only pending tasks
    #[arg(long)]
    pub pending: bool,
}

/// Arguments for summaries.
#[derive(Args)]
pub struct SummaryArgs {
    #[command(subcommand)]
    pub command: SummaryCommands,
}

/// Summary subcommands.
#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Compute and store the summary for a month
    Generate {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,
    },

    /// Show the stored summary for a month
    Show {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,
    },

    /// List stored summaries, newest first
    List {
        /// Maximum number of summaries
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Delete the stored summary for a month
    Delete {
        /// Month (YYYY-MM)
        #[arg(value_parser = parse_month)]
        month: MonthKey,
    },
}

/// Arguments for trends.
#[derive(Args)]
pub struct TrendsArgs {
    #[command(subcommand)]
    pub command: TrendsCommands,
}

/// Trend subcommands.
#[derive(Subcommand)]
pub enum TrendsCommands {
    /// Compare a month with an earlier one
    Compare {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,

        /// Months back to compare against (default from config, normally 1)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        offset: Option<u32>,
    },

    /// Show a window of months ending at the current month
    History {
        /// Number of months (default from config, normally 6)
        #[arg(long, short = 'm', value_parser = clap::value_parser!(u16).range(1..=120))]
        months: Option<u16>,
    },
}

/// Arguments for charts.
#[derive(Args)]
pub struct ChartArgs {
    #[command(subcommand)]
    pub command: ChartCommands,
}

/// Chart subcommands.
#[derive(Subcommand)]
pub enum ChartCommands {
    /// Weekly completion bars for a month
    Weekly {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(value_parser = parse_month)]
        month: Option<MonthKey>,
    },

    /// One-line chart of a summary metric across months
    Sparkline {
        /// Which summary field to plot
        #[arg(long, value_enum, default_value = "completion")]
        metric: SparkMetric,

        /// Number of months (default from config, normally 6)
        #[arg(long, short = 'm', value_parser = clap::value_parser!(u16).range(1..=120))]
        months: Option<u16>,
    },
}

/// Summary field plotted by `chart sparkline`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkMetric {
    /// Completion rate (0-100)
    Completion,
    /// Estimation accuracy (0-100)
    Accuracy,
    /// Longest streak in days
    Streak,
}

/// Upper bound for `--estimate` and `--actual`: one year in minutes.
pub const MAX_MINUTES: i64 = 525_600;

static MONTH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap_or_else(|e| panic!("Invalid month regex: {e}"))
});

/// Parse a `YYYY-MM` month argument.
///
/// # Errors
///
/// Returns a message for clap when the argument is not a valid month.
pub fn parse_month(s: &str) -> Result<MonthKey, String> {
    let s = s.trim();
    if !MONTH_PATTERN.is_match(s) {
        return Err(format!("'{s}' is not a month, expected YYYY-MM (e.g. 2025-09)"));
    }
    s.parse().map_err(|e: crate::error::PulseError| e.to_string())
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
///
/// # Errors
///
/// Returns a message for clap when neither form matches.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("'{s}' is not a date, expected RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== value parser Tests ====================

    #[test]
    fn test_parse_month() {
        let month = parse_month("2025-09").unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 9);
        assert_eq!(parse_month(" 2024-12 ").unwrap().to_string(), "2024-12");
    }

    #[test]
    fn test_parse_month_rejects_bad_input() {
        for bad in ["2025-9", "2025-13", "2025-00", "25-09", "2025/09", "september", ""] {
            assert!(parse_month(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_instant() {
        let at = parse_instant("2025-09-04T17:30:00Z").unwrap();
        assert_eq!(at.to_rfc3339(), "2025-09-04T17:30:00+00:00");

        let shifted = parse_instant("2025-09-04T19:30:00+02:00").unwrap();
        assert_eq!(shifted, at);

        let midnight = parse_instant("2025-09-04").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2025-09-04T00:00:00+00:00");

        assert!(parse_instant("yesterday").is_err());
    }

    // ==================== CLI Parsing Tests ====================

    #[test]
    fn test_cli_add_command() {
        let cli = Cli::try_parse_from([
            "taskpulse", "add", "Write report", "-e", "45", "-t", "work", "-t", "writing",
        ])
        .unwrap();
        if let Commands::Add(args) = cli.command {
            assert_eq!(args.title, "Write report");
            assert_eq!(args.estimate, Some(45));
            assert_eq!(args.tags, vec!["work", "writing"]);
            assert!(args.at.is_none());
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_cli_add_rejects_zero_estimate() {
        assert!(Cli::try_parse_from(["taskpulse", "add", "x", "-e", "0"]).is_err());
    }

    #[test]
    fn test_cli_minutes_are_bounded() {
        let max = MAX_MINUTES.to_string();
        let over = (MAX_MINUTES + 1).to_string();

        assert!(Cli::try_parse_from(["taskpulse", "add", "x", "-e", max.as_str()]).is_ok());
        assert!(Cli::try_parse_from(["taskpulse", "add", "x", "-e", over.as_str()]).is_err());
        assert!(Cli::try_parse_from(["taskpulse", "complete", "1", "--actual", over.as_str()]).is_err());
        assert!(Cli::try_parse_from(["taskpulse", "complete", "1", "--actual", "-5"]).is_err());
        assert!(Cli::try_parse_from(["taskpulse", "complete", "1", "--actual", "0"]).is_ok());
    }

    #[test]
    fn test_cli_list_filters() {
        let cli =
            Cli::try_parse_from(["taskpulse", "ls", "--month", "2025-09", "--pending"]).unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.month.map(|m| m.to_string()).as_deref(), Some("2025-09"));
            assert!(args.pending);
            assert!(!args.completed);
        } else {
            panic!("Expected List command");
        }

        assert!(Cli::try_parse_from(["taskpulse", "list", "--completed", "--pending"]).is_err());
    }

    #[test]
    fn test_cli_complete_command() {
        let cli = Cli::try_parse_from([
            "taskpulse", "done", "3", "--actual", "50", "--at", "2025-09-04",
        ])
        .unwrap();
        match cli.command {
            Commands::Complete { id, actual, at } => {
                assert_eq!(id, 3);
                assert_eq!(actual, Some(50));
                assert!(at.is_some());
            }
            _ => panic!("Expected Complete command"),
        }
    }

    #[test]
    fn test_cli_summary_generate() {
        let cli = Cli::try_parse_from(["taskpulse", "summary", "generate", "2025-09"]).unwrap();
        if let Commands::Summary(args) = cli.command {
            assert!(matches!(
                args.command,
                SummaryCommands::Generate { month: Some(m) } if m.to_string() == "2025-09"
            ));
        } else {
            panic!("Expected Summary command");
        }
    }

    #[test]
    fn test_cli_invalid_month() {
        assert!(Cli::try_parse_from(["taskpulse", "summary", "generate", "2025-13"]).is_err());
        assert!(Cli::try_parse_from(["taskpulse", "days", "sept"]).is_err());
    }

    #[test]
    fn test_cli_trends_commands() {
        let cli = Cli::try_parse_from(["taskpulse", "trends", "compare", "--offset", "12"]).unwrap();
        if let Commands::Trends(args) = cli.command {
            assert!(matches!(
                args.command,
                TrendsCommands::Compare { month: None, offset: Some(12) }
            ));
        } else {
            panic!("Expected Trends command");
        }

        let cli = Cli::try_parse_from(["taskpulse", "trends", "history", "-m", "12"]).unwrap();
        if let Commands::Trends(args) = cli.command {
            assert!(matches!(args.command, TrendsCommands::History { months: Some(12) }));
        } else {
            panic!("Expected Trends command");
        }

        assert!(Cli::try_parse_from(["taskpulse", "trends", "compare", "--offset", "0"]).is_err());
    }

    #[test]
    fn test_cli_chart_sparkline_defaults() {
        let cli = Cli::try_parse_from(["taskpulse", "chart", "sparkline"]).unwrap();
        if let Commands::Chart(args) = cli.command {
            assert!(matches!(
                args.command,
                ChartCommands::Sparkline { metric: SparkMetric::Completion, months: None }
            ));
        } else {
            panic!("Expected Chart command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "taskpulse", "streak", "-o", "json", "--tone", "neutral", "-v", "--db", "/tmp/x.db",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.tone, Some(Tone::Neutral));
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Commands::Streak));
    }

    #[test]
    fn test_cli_output_defaults_to_config() {
        let cli = Cli::try_parse_from(["taskpulse", "streak"]).unwrap();
        assert!(cli.output.is_none());
        assert!(cli.tone.is_none());
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["taskpulse", "completions", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
