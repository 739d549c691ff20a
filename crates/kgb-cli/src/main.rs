mod display;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use kgb_core::{Roster, StatusFilter};
use kgb_host::{
    CsvFileSource, EvalOutcome, HostConfig, LogNotifier, ReminderEvaluator, RosterSource,
    UnparsedPolicy,
};
use kgb_store::{FileStore, clear_pending, load_pending};
use kgb_sync::SheetClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kgb", version, about = "KGB salary-increment reminder")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Directory for the key-value store.
    #[arg(long, env = "KGB_DATA_DIR", default_value = ".kgb", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Google Sheets document id of the roster.
    #[arg(long, env = "KGB_SHEET_ID", global = true)]
    sheet_id: Option<String>,

    /// Explicit CSV export URL (takes precedence over --sheet-id).
    #[arg(long, env = "KGB_SHEET_URL", global = true)]
    url: Option<String>,

    /// Read the roster from a local CSV file instead of the network.
    #[arg(long, env = "KGB_CSV_FILE", global = true)]
    csv_file: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long, env = "KGB_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// List the roster, overdue first.
    List {
        /// Case-insensitive match on name or NIP.
        #[arg(short, long, default_value = "")]
        query: String,
        /// semua, terlambat, waktunya or akan_datang.
        #[arg(short, long, default_value = "semua")]
        status: StatusFilter,
        /// Print JSON with status keys, labels and colours.
        #[arg(long)]
        json: bool,
    },
    /// Show one record by its record number.
    Show { no: String },
    /// Report ingestion defects in the roster.
    Defects,
    /// Run one reminder evaluation now.
    Check {
        #[command(flatten)]
        eval: EvalArgs,
    },
    /// Print the pending-notification snapshot from the last evaluation.
    Pending {
        /// Delete the snapshot instead of printing it.
        #[arg(long)]
        clear: bool,
    },
    /// Evaluate on a recurring interval until interrupted.
    Watch {
        /// Seconds between evaluations.
        #[arg(long, default_value_t = 3600)]
        interval_secs: u64,
        /// Abort an evaluation that runs longer than this many seconds.
        #[arg(long)]
        eval_timeout_secs: Option<u64>,
        #[command(flatten)]
        eval: EvalArgs,
    },
}

#[derive(Args)]
struct EvalArgs {
    /// Leave records with an unparseable TMT KGB BARU out of reminders.
    #[arg(long)]
    exclude_unparsed: bool,
}

impl EvalArgs {
    fn policy(&self) -> UnparsedPolicy {
        if self.exclude_unparsed {
            UnparsedPolicy::Exclude
        } else {
            UnparsedPolicy::Include
        }
    }
}

impl SourceArgs {
    fn build(&self) -> anyhow::Result<Arc<dyn RosterSource>> {
        if let Some(path) = &self.csv_file {
            return Ok(Arc::new(CsvFileSource::new(path)));
        }
        let client = match (&self.url, &self.sheet_id) {
            (Some(url), _) => SheetClient::new(url.clone()),
            (None, Some(id)) => SheetClient::for_sheet(id),
            (None, None) => bail!("no roster source: pass --sheet-id, --url or --csv-file"),
        };
        let client = client
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .context("building HTTP client")?;
        tracing::debug!(url = client.url(), "roster source");
        Ok(Arc::new(client))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("kgb v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::List {
            query,
            status,
            json,
        } => {
            let today = kgb_core::today();
            let roster = load_roster(&cli.source, today).await?;
            let visible = roster.select(&query, status, today);
            if json {
                let out = display::render_json(&roster, &visible, today);
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            print!("{}", display::render_list(&visible, today));
            println!();
            println!("{}", display::render_counts(&roster.counts(today)));
            eprintln!("  {} of {} records shown (filter: {status})", visible.len(), roster.len());
        }
        Command::Show { no } => {
            let today = kgb_core::today();
            let roster = load_roster(&cli.source, today).await?;
            match roster.find(&no) {
                Some(record) => print!("{}", display::render_card(record, today)),
                None => {
                    eprintln!("{}", display::NOT_FOUND);
                    std::process::exit(1);
                }
            }
        }
        Command::Defects => {
            let roster = load_roster(&cli.source, kgb_core::today()).await?;
            if roster.defects().is_empty() {
                println!("No defects in {} records.", roster.len());
            } else {
                println!("{} defects in {} records:", roster.defects().len(), roster.len());
                print!("{}", display::render_defects(roster.defects()));
            }
        }
        Command::Check { eval } => {
            let evaluator = build_evaluator(&cli.source, &cli.data_dir, eval.policy())?;
            let outcome = evaluator.run_once().await;
            println!("{outcome:?}");
            if outcome == EvalOutcome::Failed {
                std::process::exit(1);
            }
        }
        Command::Pending { clear } => {
            let store = FileStore::open(&cli.data_dir)
                .with_context(|| format!("opening store at {}", cli.data_dir.display()))?;
            if clear {
                clear_pending(&store).await?;
                println!("Cleared pending reminders in {}.", store.root().display());
                return Ok(());
            }
            match load_pending(&store).await? {
                Some(entries) if !entries.is_empty() => {
                    for entry in entries {
                        println!(
                            "{:>4}  {}  ({})  KGB berikutnya: {}",
                            entry.no.as_deref().unwrap_or("-"),
                            entry.nama,
                            entry.nip,
                            kgb_core::format_date(&entry.kgb_berikutnya),
                        );
                    }
                }
                _ => println!("No pending reminders in {}.", store.root().display()),
            }
        }
        Command::Watch {
            interval_secs,
            eval_timeout_secs,
            eval,
        } => {
            let config = HostConfig {
                interval: Duration::from_secs(interval_secs.max(1)),
                evaluation_timeout: eval_timeout_secs.map(Duration::from_secs),
                unparsed: eval.policy(),
                degraded: true,
            };
            let evaluator = build_evaluator(&cli.source, &cli.data_dir, config.unparsed)?;
            let Some(handle) = kgb_host::initialize(config, evaluator).await? else {
                bail!("notifications are unavailable on this host");
            };

            tokio::signal::ctrl_c()
                .await
                .context("waiting for interrupt")?;
            eprintln!("  Stopping...");
            handle.shutdown().await;
        }
    }

    Ok(())
}

async fn load_roster(source: &SourceArgs, today: chrono::NaiveDate) -> anyhow::Result<Roster> {
    let records = source
        .build()?
        .fetch()
        .await
        .context("fetching KGB roster")?;
    let roster = Roster::load(records, today);
    if !roster.defects().is_empty() {
        eprintln!(
            "  {} record defects (run `kgb defects` for details)",
            roster.defects().len()
        );
    }
    Ok(roster)
}

fn build_evaluator(
    source: &SourceArgs,
    data_dir: &std::path::Path,
    policy: UnparsedPolicy,
) -> anyhow::Result<ReminderEvaluator> {
    let store = FileStore::open(data_dir)
        .with_context(|| format!("opening store at {}", data_dir.display()))?;
    Ok(
        ReminderEvaluator::new(source.build()?, Arc::new(store), Arc::new(LogNotifier))
            .with_unparsed_policy(policy),
    )
}
