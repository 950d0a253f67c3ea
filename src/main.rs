mod render;

use analytics::{AnalyticsEngine, compute_stats};
use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, NaiveTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand};
use configuration::{OutputFormat, Settings};
use core_types::{EntryReason, NewTrade, OperationType, TradeId, parse_time_of_day};
use journal_store::{JsonFileStore, Outcome, TradeFilter, TradeStore, distinct_assets};
use render::Renderer;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// The main entry point for the trade journal.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only supplies JOURNAL__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = cli.journal {
        settings.journal.path = path;
    }
    if let Some(format) = cli.format {
        settings.display.output = format;
    }

    // Held until exit so buffered file logs are flushed.
    let _log_guard = configuration::init_logging(&settings.logging)
        .context("Failed to initialize logging")?;

    let mut store = JsonFileStore::open(&settings.journal.path).with_context(|| {
        format!("Failed to open journal at {}", settings.journal.path.display())
    })?;
    tracing::debug!(path = %store.path().display(), trades = store.list_trades().len(), "Journal opened.");

    let app = App {
        renderer: Renderer::new(&settings.display.currency, &settings.display.date_format),
        settings,
    };

    match cli.command {
        Commands::Add(args) => app.handle_add(&mut store, args),
        Commands::Edit(args) => app.handle_edit(&mut store, args),
        Commands::Delete { id, yes } => app.handle_delete(&mut store, id, yes),
        Commands::Show { id } => app.handle_show(&store, id),
        Commands::List { asset, outcome } => app.handle_list(&store, asset, outcome),
        Commands::Assets => app.handle_assets(&store),
        Commands::Stats => app.handle_stats(&store),
        Commands::Analyze => app.handle_analyze(&store),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A trading journal: record executed trades and analyze your performance.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML). Missing files are ignored.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Journal file, overriding `journal.path`.
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Output format, overriding `display.output`.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new trade.
    Add(AddArgs),
    /// Change fields of a recorded trade.
    Edit(EditArgs),
    /// Remove a trade from the journal.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show one trade.
    Show { id: String },
    /// Trade history, most recent first.
    List {
        /// Only trades on this asset.
        #[arg(long)]
        asset: Option<String>,
        /// all, positive or negative.
        #[arg(long, default_value = "all")]
        outcome: Outcome,
    },
    /// Every asset traded so far.
    Assets,
    /// Summary statistics.
    Stats,
    /// Statistics, breakdowns and insights.
    Analyze,
}

#[derive(Args)]
struct AddArgs {
    /// buy or sell.
    #[arg(long)]
    side: OperationType,

    /// Asset symbol, e.g. EURUSD.
    #[arg(long)]
    asset: String,

    #[arg(long)]
    lots: Decimal,

    #[arg(long, allow_negative_numbers = true)]
    entry: Decimal,

    #[arg(long, allow_negative_numbers = true)]
    stop: Decimal,

    #[arg(long, allow_negative_numbers = true)]
    target: Decimal,

    /// Realized profit or loss in account currency.
    #[arg(long, allow_negative_numbers = true)]
    result: Decimal,

    /// Entry reason; repeat or comma-separate for several.
    #[arg(long = "reason", required = true, value_delimiter = ',')]
    reasons: Vec<EntryReason>,

    #[arg(long)]
    description: Option<String>,

    /// Execution date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Execution time (HH:MM). Defaults to now.
    #[arg(long, value_parser = parse_time_of_day)]
    time: Option<NaiveTime>,
}

#[derive(Args)]
struct EditArgs {
    id: String,

    #[arg(long)]
    side: Option<OperationType>,

    #[arg(long)]
    asset: Option<String>,

    #[arg(long)]
    lots: Option<Decimal>,

    #[arg(long, allow_negative_numbers = true)]
    entry: Option<Decimal>,

    #[arg(long, allow_negative_numbers = true)]
    stop: Option<Decimal>,

    #[arg(long, allow_negative_numbers = true)]
    target: Option<Decimal>,

    #[arg(long, allow_negative_numbers = true)]
    result: Option<Decimal>,

    /// Replaces every entry reason of the trade.
    #[arg(long = "reason", value_delimiter = ',')]
    reasons: Vec<EntryReason>,

    /// An empty string clears the description.
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, value_parser = parse_time_of_day)]
    time: Option<NaiveTime>,
}

impl EditArgs {
    fn apply_to(self, draft: &mut NewTrade) {
        if let Some(side) = self.side {
            draft.operation_type = side;
        }
        if let Some(asset) = self.asset {
            draft.asset = asset;
        }
        if let Some(lots) = self.lots {
            draft.lots = lots;
        }
        if let Some(entry) = self.entry {
            draft.entry_price = entry;
        }
        if let Some(stop) = self.stop {
            draft.stop_loss = stop;
        }
        if let Some(target) = self.target {
            draft.take_profit = target;
        }
        if let Some(result) = self.result {
            draft.result = result;
        }
        if !self.reasons.is_empty() {
            draft.reasons = self.reasons;
        }
        if let Some(description) = self.description {
            draft.description = Some(description);
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(time) = self.time {
            draft.time = time;
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    settings: Settings,
    renderer: Renderer,
}

impl App {
    fn json(&self) -> bool {
        self.settings.display.output == OutputFormat::Json
    }

    fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn handle_add(&self, store: &mut JsonFileStore, args: AddArgs) -> anyhow::Result<()> {
        let now = Local::now();
        let draft = NewTrade {
            operation_type: args.side,
            asset: args.asset,
            lots: args.lots,
            entry_price: args.entry,
            stop_loss: args.stop,
            take_profit: args.target,
            result: args.result,
            reasons: args.reasons,
            description: args.description,
            date: args.date.unwrap_or_else(|| now.date_naive()),
            time: args.time.unwrap_or_else(|| minute_of(now.time())),
        };
        let trade = draft.record(Utc::now()).context("Invalid trade")?;
        store.add(trade.clone()).context("Failed to save trade")?;

        if self.json() {
            return self.print_json(&trade);
        }
        println!("Recorded trade {}.", trade.id);
        println!("{}", self.renderer.trades(std::slice::from_ref(&trade)));
        Ok(())
    }

    fn handle_edit(&self, store: &mut JsonFileStore, args: EditArgs) -> anyhow::Result<()> {
        let id = TradeId::from(args.id.as_str());
        let Some(current) = store.get(&id) else {
            bail!("No trade with id {id}");
        };
        let mut draft = NewTrade::from(&current);
        args.apply_to(&mut draft);

        let revised = current.revise(draft, Utc::now()).context("Invalid trade")?;
        store.update(revised.clone()).context("Failed to save trade")?;

        if self.json() {
            return self.print_json(&revised);
        }
        println!("Updated trade {}.", revised.id);
        println!("{}", self.renderer.trades(std::slice::from_ref(&revised)));
        Ok(())
    }

    fn handle_delete(&self, store: &mut JsonFileStore, id: String, yes: bool) -> anyhow::Result<()> {
        let id = TradeId::from(id);
        let Some(trade) = store.get(&id) else {
            bail!("No trade with id {id}");
        };
        if !yes && !confirm(&format!("Delete {} {} from {}?", trade.operation_type, trade.asset, trade.date))? {
            println!("Nothing deleted.");
            return Ok(());
        }
        let removed = store.delete(&id).context("Failed to delete trade")?;

        if self.json() {
            return self.print_json(&removed);
        }
        println!("Deleted trade {}.", removed.id);
        Ok(())
    }

    fn handle_show(&self, store: &JsonFileStore, id: String) -> anyhow::Result<()> {
        let id = TradeId::from(id);
        let Some(trade) = store.get(&id) else {
            bail!("No trade with id {id}");
        };
        if self.json() {
            return self.print_json(&trade);
        }
        println!("{}", self.renderer.trades(std::slice::from_ref(&trade)));
        if let Some(description) = &trade.description {
            println!("{description}");
        }
        Ok(())
    }

    fn handle_list(
        &self,
        store: &JsonFileStore,
        asset: Option<String>,
        outcome: Outcome,
    ) -> anyhow::Result<()> {
        let filter = TradeFilter { asset, outcome };
        let trades = filter.apply(&store.list_trades());

        if self.json() {
            return self.print_json(&trades);
        }
        if trades.is_empty() {
            println!("No trades match.");
            return Ok(());
        }
        println!("{}", self.renderer.trades(&trades));
        Ok(())
    }

    fn handle_assets(&self, store: &JsonFileStore) -> anyhow::Result<()> {
        let assets = distinct_assets(&store.list_trades());
        if self.json() {
            return self.print_json(&assets);
        }
        for asset in assets {
            println!("{asset}");
        }
        Ok(())
    }

    fn handle_stats(&self, store: &JsonFileStore) -> anyhow::Result<()> {
        let stats = compute_stats(&store.list_trades());
        if self.json() {
            return self.print_json(&stats);
        }
        println!("{}", self.renderer.stats(&stats));
        Ok(())
    }

    fn handle_analyze(&self, store: &JsonFileStore) -> anyhow::Result<()> {
        let snapshot = store.list_trades();
        let engine = AnalyticsEngine::with_formatter(self.renderer.amounts());
        let analysis = engine.analyze(&snapshot);

        if self.json() {
            return self.print_json(&analysis);
        }
        self.renderer.print_analysis(&analysis);
        Ok(())
    }
}

fn minute_of(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
