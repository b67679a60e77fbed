use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use taskpulse::cli::args::{Cli, Commands};
use taskpulse::cli::commands;
use taskpulse::config::{ColorSetting, Config, Paths};
use taskpulse::logging;
use taskpulse::storage::Database;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor database.
    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)
        .with_context(|| format!("loading {}", paths.config_file.display()))?;
    logging::init(&config.logging, cli.verbose);

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let db = match &cli.db {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            Database::open_at(path)
        }
        None => Database::open(),
    }
    .context("opening task database")?;

    let format = cli.output.unwrap_or(config.general.default_output);
    let tone = cli.tone.unwrap_or(config.stats.tone);
    tracing::debug!(?format, %tone, "Running command");

    let output = match cli.command {
        Commands::Add(args) => commands::add(&db, args, format)?,
        Commands::List(args) => commands::list(&db, &args, format)?,
        Commands::Show { id } => commands::show(&db, id, format)?,
        Commands::Complete { id, actual, at } => commands::complete(&db, id, actual, at, format)?,
        Commands::Reopen { id } => commands::reopen(&db, id, format)?,
        Commands::Delete { id } => commands::delete(&db, id, format)?,
        Commands::Summary(args) => commands::summary(&db, args.command, tone, format)?,
        Commands::Accuracy { month, compare } => {
            commands::accuracy(&db, month, compare, tone, format)?
        }
        Commands::Streak => commands::streak(&db, format)?,
        Commands::Days { month } => commands::days(&db, month, format)?,
        Commands::Trends(args) => commands::trends(&db, args.command, &config.stats, format)?,
        Commands::Chart(args) => commands::chart(&db, args.command, &config.stats, format)?,
        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
