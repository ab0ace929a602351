use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;

use tax_core::{FiscalMonth, TaxType, compute_deadline};
use tax_ui::config::AppConfig;
use tax_ui::{
    RecordingNotifier, TaxCaseQuickCreate, ToastVariant, TracingNotifier, app, logging,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Creates tax cases and calculates their filing deadlines from an
/// account's fiscal year-end month.
#[derive(Debug, Parser)]
#[command(name = "tax-case", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository backend, overriding the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Log level or filter directive, overriding the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the filing deadline for a tax type and fiscal year-end.
    Deadline {
        /// Tax type label, e.g. 法人税.
        #[arg(long)]
        tax_type: String,

        /// Fiscal year-end month label, e.g. 3月.
        #[arg(long)]
        fiscal_month: String,

        /// Reference date (YYYY-MM-DD); defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print deadlines for every fiscal month and tax type.
    Table {
        /// Reference date (YYYY-MM-DD); defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Create a tax case for an account loaded from CSV.
    Create {
        /// Accounts CSV (id,name,fiscal_year_end,tax_accountant).
        #[arg(long)]
        accounts: PathBuf,

        /// Account id to create the case for.
        #[arg(long)]
        account: String,

        /// Tax type label, e.g. 消費税.
        #[arg(long)]
        tax_type: String,

        /// Reference date (YYYY-MM-DD); defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List the tax-type menu and the fiscal month labels.
    Options,
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    logging::init_logging(&config.log_level);
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Deadline {
            tax_type,
            fiscal_month,
            today,
        } => {
            let tax_type = TaxType::from_label(&tax_type);
            let deadline = compute_deadline(&tax_type, &fiscal_month, today_or_local(today))?;
            println!("{deadline}");
        }

        Command::Table { today } => {
            let today = today_or_local(today);
            let header: Vec<_> = TaxType::all().iter().map(|t| t.label().to_string()).collect();
            println!("決算月\t{}", header.join("\t"));
            for row in app::deadline_table(today)? {
                let cells: Vec<_> = row.deadlines.iter().map(|(_, d)| d.to_string()).collect();
                println!("{}\t{}", row.fiscal_month, cells.join("\t"));
            }
        }

        Command::Create {
            accounts,
            account,
            tax_type,
            today,
        } => {
            let repo = app::open_repository(&config.database).await?;
            app::seed_accounts(&*repo, &accounts).await?;

            let recorder = Arc::new(RecordingNotifier::new());
            let notifier = (TracingNotifier, recorder.clone());
            let mut form = TaxCaseQuickCreate::new(repo, notifier, account);
            form.select_tax_type(&tax_type);

            let created = form.create_tax_case(today_or_local(today)).await;
            for toast in recorder.take() {
                match toast.variant {
                    ToastVariant::Error | ToastVariant::Warning => eprintln!("{toast}"),
                    ToastVariant::Success | ToastVariant::Info => println!("{toast}"),
                }
            }

            let Some(case) = created else {
                bail!("tax case was not created");
            };
            let deadline = case
                .filing_deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "#{} {} {} {}",
                case.id, case.account_id, case.tax_type, deadline
            );
        }

        Command::Options => {
            println!("申告種別:");
            for option in TaxType::options() {
                println!("  {}", option.label);
            }
            println!("決算月:");
            let months = FiscalMonth::labels();
            println!("  {}", months.join(" "));
        }
    }

    Ok(())
}
