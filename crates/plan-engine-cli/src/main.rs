use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use plan_engine::dates::{parse_instant, parse_timezone};
use plan_engine::{
    config_to_readable, config_to_rule, group_by_plan, rule_to_config, rule_to_config_or_default,
    to_calendar_events_batch, DateWindow, Locale, Plan, PlanInstanceException, RecurrenceConfig,
    ViewOptions, DEFAULT_MAX_ITERATIONS,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "plan-engine", version)]
#[command(about = "Encode recurrence rules and expand calendar plans into events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a recurrence config (JSON) and print its rule string
    Encode {
        /// Config file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Parse a rule string and print the config as JSON
    Decode {
        rule: String,

        /// Fall back to the default config instead of failing
        #[arg(long)]
        lenient: bool,
    },
    /// Print a readable phrase for a rule string
    Describe {
        rule: String,

        /// Phrase language (en, es)
        #[arg(long, default_value = "en")]
        locale: String,
    },
    /// Expand plans into calendar events for a date window
    Expand {
        /// JSON array of plan records
        #[arg(long)]
        plans: PathBuf,

        /// JSON array of instance exceptions
        #[arg(long)]
        exceptions: Option<PathBuf>,

        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// IANA timezone deciding which calendar day an instant falls on
        #[arg(long, default_value = "UTC")]
        timezone: String,

        #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,

        /// Fallback instant for plans without times (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { file } => {
            let input = read_input(file.as_deref())?;
            let config: RecurrenceConfig =
                serde_json::from_str(&input).context("Failed to parse recurrence config")?;
            println!("{}", config_to_rule(&config));
        }
        Commands::Decode { rule, lenient } => {
            let config = if lenient {
                rule_to_config_or_default(&rule)
            } else {
                rule_to_config(&rule)?
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Describe { rule, locale } => {
            let locale: Locale = locale.parse()?;
            let config = rule_to_config(&rule)?;
            println!("{}", config_to_readable(&config, locale));
        }
        Commands::Expand {
            plans,
            exceptions,
            from,
            to,
            timezone,
            max_iterations,
            now,
        } => {
            let plans: Vec<Plan> = serde_json::from_str(&read_input(Some(&plans))?)
                .context("Failed to parse plans")?;
            let exceptions: Vec<PlanInstanceException> = match exceptions {
                Some(path) => serde_json::from_str(&read_input(Some(&path))?)
                    .context("Failed to parse exceptions")?,
                None => Vec::new(),
            };
            let window = DateWindow::parse(&from, &to)?;
            let now: DateTime<Utc> = match now {
                Some(s) => parse_instant(&s)?,
                None => Utc::now(),
            };
            let options = ViewOptions::new(now)
                .with_timezone(parse_timezone(&timezone)?)
                .with_max_iterations(max_iterations);

            let events =
                to_calendar_events_batch(&plans, &window, &group_by_plan(exceptions), &options);
            tracing::debug!(plans = plans.len(), events = events.len(), "expanded plans");
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }

    Ok(())
}

/// Read from a file, or from stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
