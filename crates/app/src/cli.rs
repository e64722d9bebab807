//! Command-line front end.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use feedstock_infra::{CorruptDataPolicy, RecordStore};
use feedstock_stock::{
    FoodFilter, FoodType, MovementRecord, MovementType, PendingBatch, PendingRow, RecordFilter,
};

use crate::config::AppConfig;
use crate::session::{EntrySession, SessionError};

/// feedstock - record and review school food-stock movements
#[derive(Parser, Debug)]
#[command(name = "feedstock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override environment configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Directory holding the record file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage key (file name without `.json`)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// What to do with an unreadable record file: fail or reset
    #[arg(long, global = true)]
    pub on_corrupt: Option<CorruptDataPolicy>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(key) = &self.key {
            config.storage_key = key.clone();
        }
        if let Some(policy) = self.on_corrupt {
            config.on_corrupt = policy;
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Submit one or more rows of the same direction
    Record {
        /// incoming or outgoing
        #[arg(long)]
        direction: MovementType,

        /// FOOD:QTY[:DETAIL[:NOTES]], DETAIL being the source (incoming) or purpose (outgoing)
        #[arg(long = "row", required = true)]
        rows: Vec<String>,

        /// Record date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List records, most recent first
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the stock balance of one or every food
    Balance {
        #[arg(long)]
        food: Option<FoodType>,
    },

    /// Remove an entry of the filtered list
    Undo {
        #[command(flatten)]
        filter: FilterArgs,

        /// Position in the filtered list (0 = most recent)
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Stock per food with alerts
    Dashboard {
        /// Low-stock threshold in kilograms (overrides configuration)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// All, Maize, Beans or Rice
    #[arg(long, default_value_t = FoodFilter::All)]
    pub food: FoodFilter,

    /// Exact date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter {
            food: self.food,
            date: self.date,
        }
    }
}

/// How a command finished when it did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Input rows were rejected by validation.
    Rejected,
}

/// Split `FOOD:QTY[:DETAIL[:NOTES]]` into a pending row.
///
/// Only splits; validation happens on submit. Notes may contain `:`.
pub fn parse_row(text: &str, direction: MovementType) -> PendingRow {
    let mut parts = text.splitn(4, ':');
    let mut next = || parts.next().unwrap_or_default().trim().to_string();

    let food_type = next();
    let quantity = next();
    let detail = next();
    let notes = next();

    let row = PendingRow::new(food_type, quantity).with_notes(notes);
    match direction {
        MovementType::Incoming => row.with_source(detail),
        MovementType::Outgoing => row.with_purpose(detail),
    }
}

/// Open the configured file store and run `command` against it.
pub fn run(command: Command, config: &AppConfig, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    let store = config.open_store()?;
    tracing::debug!(path = %store.path().display(), "using record file");
    let mut session = EntrySession::open(store)?;
    let today = chrono::Local::now().date_naive();
    execute(command, &mut session, config.low_stock_kg, today, out)
}

/// Run `command` against an open session.
pub fn execute<S: RecordStore>(
    command: Command,
    session: &mut EntrySession<S>,
    low_stock_kg: f64,
    today: NaiveDate,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match command {
        Command::Record {
            direction,
            rows,
            date,
        } => {
            let rows = rows.iter().map(|r| parse_row(r, direction)).collect();
            *session.pending_mut() = PendingBatch::with_rows(direction, rows);

            match session.submit(date.unwrap_or(today)) {
                Ok(records) => {
                    writeln!(out, "recorded {} {} movement(s)", records.len(), direction)?;
                    for food_type in FoodType::ALL {
                        if records.iter().any(|r| r.food_type() == *food_type) {
                            writeln!(
                                out,
                                "  {:<6} balance {} kg",
                                food_type,
                                session.balance(*food_type)
                            )?;
                        }
                    }
                    Ok(Outcome::Done)
                }
                Err(SessionError::Rejected(report)) => {
                    writeln!(out, "nothing recorded; fix these rows:")?;
                    for (index, errors) in report.invalid_rows() {
                        for (field, message) in errors {
                            writeln!(out, "  row {} {}: {}", index + 1, field, message)?;
                        }
                    }
                    Ok(Outcome::Rejected)
                }
                Err(err) => Err(err.into()),
            }
        }

        Command::List { filter } => {
            let view = session.view(&filter.to_filter());
            if view.is_empty() {
                writeln!(out, "no records")?;
                return Ok(Outcome::Done);
            }
            writeln!(
                out,
                "{:>3}  {:<10}  {:<6}  {:>8}  {:<8}  {:<8}  notes",
                "#", "date", "food", "kg", "movement", "detail"
            )?;
            for (index, entry) in view.iter().enumerate() {
                writeln!(out, "{:>3}  {}", index, format_record(entry.record))?;
            }
            Ok(Outcome::Done)
        }

        Command::Balance { food } => {
            let foods: Vec<FoodType> = match food {
                Some(f) => vec![f],
                None => FoodType::ALL.to_vec(),
            };
            for f in foods {
                writeln!(out, "{:<6} {} kg", f, session.balance(f))?;
            }
            Ok(Outcome::Done)
        }

        Command::Undo { filter, index } => {
            match session.undo(&filter.to_filter(), index)? {
                Some(record) => writeln!(out, "undone: {}", format_record(&record))?,
                None => writeln!(out, "nothing to undo")?,
            }
            Ok(Outcome::Done)
        }

        Command::Dashboard { threshold, json } => {
            let summary = session.summary(threshold.unwrap_or(low_stock_kg));
            if json {
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
                return Ok(Outcome::Done);
            }

            writeln!(out, "records: {}", summary.total_records)?;
            if let Some(last) = summary.last_movement {
                writeln!(out, "last movement: {last}")?;
            }
            for food in &summary.foods {
                write!(
                    out,
                    "{:<6} {:>10} kg  (in {} / out {}, {} movements)",
                    food.food_type, food.balance, food.total_in, food.total_out, food.movements
                )?;
                match food.alert {
                    Some(alert) => writeln!(out, "  [{alert}]")?,
                    None => writeln!(out)?,
                }
            }
            Ok(Outcome::Done)
        }
    }
}

fn format_record(record: &MovementRecord) -> String {
    let detail = match (record.source(), record.purpose()) {
        (Some(source), _) => source.to_string(),
        (None, Some(purpose)) => purpose.to_string(),
        (None, None) => String::new(),
    };
    format!(
        "{:<10}  {:<6}  {:>8}  {:<8}  {:<8}  {}",
        record.date(),
        record.food_type(),
        record.quantity(),
        record.movement_type(),
        detail,
        record.notes().unwrap_or("-")
    )
}
