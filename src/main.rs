use std::io;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use akowe::config::{self, Config};
use akowe::db::{self, Database, migrate::Migrator};
use akowe::reconcile::link_income_to_invoices;
use akowe::report::{Period, TaxReport};
use akowe::schema::RevisionChain;
use akowe::tax::{TaxRate, decompose};
use akowe::ui::dashboard::{DashboardAction, DashboardState, handle_input, render_dashboard};

#[derive(Parser)]
#[command(name = "akowe", version, about = "Bookkeeping and GST/HST reporting for freelancers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a tax-inclusive amount into pre-tax amount and tax collected
    Tax {
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        /// Tax rate as a fraction, e.g. 0.13
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<TaxRate>,
    },
    /// Inspect or move the database schema
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Show the income to invoice links the backfill would write
    Reconcile,
    /// Period reports
    Report {
        #[command(subcommand)]
        report: ReportKind,
    },
    /// Interactive income, expense and client overview
    Dashboard {
        #[arg(long)]
        user: i32,
        /// Calendar year, defaults to the current one
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// List every revision, oldest first
    History,
    /// Show the applied revision and what is pending
    Status,
    /// Apply pending revisions
    Up {
        /// Stop at this revision instead of head
        #[arg(long)]
        to: Option<String>,
    },
    /// Revert revisions newer than the target
    Down {
        /// Revision to keep, or "base" to revert everything
        #[arg(long)]
        to: String,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// GST/HST collected on income over a date range
    Tax {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        rate: Option<TaxRate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // keep the alternate screen free of log lines
    let default_filter = match cli.command {
        Command::Dashboard { .. } => "akowe=warn",
        _ => "akowe=info",
    };
    init_logging(default_filter);

    match cli.command {
        Command::Tax { amount, rate } => run_tax(amount, rate.unwrap_or_default()),
        Command::Migrate { action } => run_migrate(action).await,
        Command::Reconcile => run_reconcile().await,
        Command::Report {
            report: ReportKind::Tax { from, to, rate },
        } => run_tax_report(from, to, rate).await,
        Command::Dashboard { user, year } => run_dashboard(user, year).await,
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn connect() -> Result<(Config, Database)> {
    let config = config::init()?;
    let db = db::init(&config)
        .await
        .context("connecting to the database")?;
    info!("Database connection established");
    Ok((config, db))
}

fn run_tax(amount: Decimal, rate: TaxRate) -> Result<()> {
    let split = decompose(amount, rate.value())?;
    println!("Amount:        {:.2}", amount);
    println!("Tax rate:      {}", rate);
    println!("Pre-tax:       {:.2}", split.pre_tax);
    println!("Tax collected: {:.2}", split.tax_collected);
    Ok(())
}

async fn run_migrate(action: MigrateAction) -> Result<()> {
    let chain = RevisionChain::akowe()?;

    if let MigrateAction::History = action {
        for revision in chain.revisions() {
            println!(
                "{} -> {}  {}",
                revision.parent.unwrap_or("<base>"),
                revision.id,
                revision.summary
            );
        }
        return Ok(());
    }

    let (_, db) = connect().await?;
    let migrator = Migrator::new(db.get_pool(), chain);

    match action {
        MigrateAction::History => {}
        MigrateAction::Status => {
            let status = migrator.status().await?;
            println!("Current: {}", status.current.as_deref().unwrap_or("<base>"));
            println!("Head:    {}", status.head);
            if status.pending.is_empty() {
                println!("Up to date");
            } else {
                println!("Pending: {}", status.pending.join(", "));
            }
        }
        MigrateAction::Up { to } => {
            let applied = migrator.upgrade(to.as_deref()).await?;
            println!("Applied {} revision(s)", applied.len());
        }
        MigrateAction::Down { to } => {
            let target = if to == "base" { None } else { Some(to.as_str()) };
            let reverted = migrator.downgrade(target).await?;
            println!("Reverted {} revision(s)", reverted.len());
        }
    }

    Ok(())
}

async fn run_reconcile() -> Result<()> {
    let (_, db) = connect().await?;
    let incomes = db.legacy_invoice_refs().await?;
    let invoices = db.invoice_numbers().await?;

    let links = link_income_to_invoices(&incomes, &invoices);
    for link in &links {
        println!("income {} -> invoice {}", link.income_id, link.invoice_id);
    }

    let unlinked = incomes.iter().filter(|i| i.invoice_id.is_none()).count();
    println!(
        "{} link(s) to write, {} legacy reference(s) without a match",
        links.len(),
        unlinked - links.len()
    );
    Ok(())
}

async fn run_tax_report(from: NaiveDate, to: NaiveDate, rate: Option<TaxRate>) -> Result<()> {
    let period = Period::new(from, to)?;
    let (config, db) = connect().await?;
    let rate = match rate {
        Some(rate) => rate,
        None => config.tax_rate()?,
    };

    let incomes = db.list_income(period.start, period.end).await?;
    let report = TaxReport::build(period, &incomes, rate)?;

    println!("Period:        {} to {}", report.period.start, report.period.end);
    println!("Income rows:   {}", report.income_count);
    println!("Gross income:  {:.2}", report.gross);
    println!("Pre-tax:       {:.2}", report.pre_tax);
    println!("Tax collected: {:.2} ({})", report.tax_collected, report.rate);
    Ok(())
}

async fn run_dashboard(user_id: i32, year: Option<i32>) -> Result<()> {
    let (config, db) = connect().await?;
    let user = db.get_user(user_id).await.context("loading user")?;
    db.record_login(user.id).await?;

    let period = Period::year(year.unwrap_or_else(|| chrono::Local::now().year()))?;
    let incomes = db.list_income(period.start, period.end).await?;
    let expenses = db.list_expenses(period.start, period.end).await?;
    let clients = db.list_clients(user.id).await?;
    let mut state = DashboardState::new(period, config.tax_rate()?, incomes, expenses, clients)?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, state: &mut DashboardState) -> Result<()> {
    loop {
        terminal.draw(|f| render_dashboard(f, state))?;

        if let Some(DashboardAction::Exit) = handle_input(state)? {
            return Ok(());
        }
    }
}
