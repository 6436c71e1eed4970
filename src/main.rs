// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secards::config::{self, Config};
use secards::present::{self, Segment};
use secards::{normalize_amount, Catalog, LookupError, Severity, ThresholdMode, ViewState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "secards")]
#[command(about = "Browse secured credit cards by fixed-deposit amount", long_about = None)]
#[command(version)]
struct Cli {
    /// Cards JSON file (defaults to $SECARDS_DATA, then the bundled dataset)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal browser (default)
    Browse,

    /// Print the card list for a filter state
    List {
        /// "minimum" (cards within budget) or "maximum" (cards needing at least the amount)
        #[arg(long, default_value = "minimum")]
        mode: ThresholdMode,

        /// FD amount; non-digits are ignored, 0 or empty means no threshold
        #[arg(long, default_value = "")]
        amount: String,

        #[arg(long, default_value = "")]
        search: String,

        #[arg(long)]
        json: bool,
    },

    /// Print one card
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Validate the dataset
    Check,
}

fn main() -> Result<()> {
    config::init_logging();

    let cli = Cli::parse();
    let config = Config::from_env();
    let data_path = cli.data.or(config.data_path);

    let catalog = Catalog::load(data_path.as_deref()).context("Failed to load card catalog")?;
    tracing::debug!(cards = catalog.len(), "catalog ready");

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => run_ui_mode(catalog),
        Commands::List { mode, amount, search, json } => {
            let state = ViewState::new(mode, normalize_amount(&amount), &search);
            run_list(&catalog, &state, json)
        }
        Commands::Show { id, json } => run_show(&catalog, &id, json),
        Commands::Check => run_check(&catalog),
    }
}

fn run_list(catalog: &Catalog, state: &ViewState, json: bool) -> Result<()> {
    let view = catalog.compose(state);

    if json {
        println!("{}", serde_json::to_string_pretty(&view.cards)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No cards found matching your criteria");
        return Ok(());
    }

    println!("{:<24} {:<30} {:>10} {:>12} {:>7}  NETWORK", "BANK", "CARD", "MIN FD", "JOINING", "LIMIT");
    for card in view.iter() {
        println!(
            "{:<24} {:<30} {:>10} {:>12} {:>6}%  {}",
            card.bank_name,
            card.card_name,
            present::format_inr(card.min_fd),
            present::fee_label(card.joining_fee),
            card.credit_limit,
            card.network.join(", ")
        );
    }
    println!("\n{} of {} cards ({} mode)", view.len(), catalog.len(), state.mode);

    Ok(())
}

fn run_show(catalog: &Catalog, id: &str, json: bool) -> Result<()> {
    let detail = match catalog.detail(id) {
        Ok(detail) => detail,
        Err(LookupError::NotFound { id }) => {
            // Same fallback as the browser: back to the full list
            eprintln!("No card with id '{}'. Available cards:\n", id);
            return run_list(catalog, &ViewState::default(), false);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{}", detail.issuer_line);
    println!("{}\n", detail.card.card_name);
    println!("  Min. FD       {}", detail.min_fd_label);
    println!("  Joining Fee   {}", detail.joining_fee_label);
    println!("  Annual Fee    {}", detail.annual_fee_label);
    println!("  Credit Limit  {}", detail.credit_limit_label);
    println!("  Network       {}", detail.network_label);

    println!("\nBEST FOR YOU IF");
    for segments in &detail.best_for_you {
        println!("  • {}", emphasize(segments));
    }

    println!("\nHIGHLIGHTS");
    for segments in &detail.highlights {
        println!("  • {}", emphasize(segments));
    }

    println!("\n{}", detail.card.website_url);

    Ok(())
}

fn run_check(catalog: &Catalog) -> Result<()> {
    let report = catalog.validate();

    for issue in &report.issues {
        let marker = match issue.severity {
            Severity::Critical => "✗",
            Severity::Warning => "!",
            Severity::Info => "·",
        };
        println!("{} [{}] {}: {}", marker, issue.card_id, issue.field, issue.issue);
    }
    println!("{}", report.summary());

    if report.has_critical_issues() {
        anyhow::bail!("dataset has {} critical issues", report.count(Severity::Critical));
    }

    Ok(())
}

/// Emphasized segments in upper case for plain terminals
fn emphasize(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| if s.emphasized { s.text.to_uppercase() } else { s.text.clone() })
        .collect()
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog: Catalog) -> Result<()> {
    tracing::info!(cards = catalog.len(), "starting terminal browser");

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog: Catalog) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: secards list / secards show <id>");
    std::process::exit(1);
}
