use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use expense_tracker::config::Config;
use expense_tracker::logging;
use expense_tracker::report::{report_file_name, write_csv_file, write_pdf, ExpenseReport};
use expense_tracker::{
    format_currency, format_date, CategoryFilter, Expense, ExpenseDraft, ExpenseStore, HistoryView,
    SqliteStorage, Summary, DATE_FORMAT,
};

#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version, about = "Personal expense tracker")]
struct Cli {
    /// Config file (defaults to <config_dir>/expense-tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Add an expense
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "food")]
        category: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List expenses, newest first
    List {
        /// "all" or a category value
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Edit an expense; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense by id
    Delete { id: String },
    /// Totals and per-category breakdown
    Summary,
    /// Write a PDF or CSV report
    Export {
        format: ExportFormat,
        #[arg(long, default_value = "all")]
        category: String,
        /// Output directory (defaults to export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Pdf,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(&config, cli.verbose),
        command => {
            logging::init_stderr_logging(cli.verbose);
            let mut store = open_store(&config)?;
            run_command(&mut store, &config, command)
        }
    }
}

fn open_store(config: &Config) -> Result<ExpenseStore> {
    let storage = SqliteStorage::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;
    let mut store = ExpenseStore::open(Box::new(storage));
    if let Some(error) = store.error() {
        eprintln!("⚠️  {}", error);
        store.clear_error();
    }
    Ok(store)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_filter(input: &str) -> Result<CategoryFilter> {
    match CategoryFilter::parse(input) {
        Some(filter) => Ok(filter),
        None => bail!("Unknown category filter: {}", input),
    }
}

fn run_command(store: &mut ExpenseStore, config: &Config, command: Command) -> Result<()> {
    let money = |amount: f64| format_currency(amount, &config.currency_symbol);

    match command {
        Command::Tui => bail!("the terminal UI is not a batch command"),

        Command::Add { description, amount, category, date } => {
            let draft = ExpenseDraft {
                description,
                amount,
                category,
                date: date.unwrap_or_else(|| today().format(DATE_FORMAT).to_string()),
            };
            let expense = store.add_expense(&draft)?;
            persist_check(store)?;
            println!("✅ Expense added successfully");
            println!("   {}  {}  {}  {}", expense.id, format_date(expense.date),
                expense.description, money(expense.amount));
        }

        Command::List { category } => {
            let mut view = HistoryView::new();
            view.set_filter(parse_filter(&category)?);
            let rows = view.rows(store.expenses());

            println!("📜 {} ({} entries)", view.filter.label(), rows.len());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            if rows.is_empty() {
                println!("No expenses found");
            }
            for expense in &rows {
                println!(
                    "{:<36}  {:<12}  {:<30}  {:<22}  {:>14}",
                    expense.id,
                    format_date(expense.date),
                    expense.description,
                    expense.category.label(),
                    money(expense.amount)
                );
            }
        }

        Command::Edit { id, description, amount, category, date } => {
            let draft = match store.get(&id) {
                Some(current) => merge_edit(current, description, amount, category, date),
                None => bail!("Expense not found: {}", id),
            };
            let expense = store.replace_expense(&id, &draft)?;
            persist_check(store)?;
            println!("✅ Expense updated successfully");
            println!("   {}  {}  {}  {}", expense.id, format_date(expense.date),
                expense.description, money(expense.amount));
        }

        Command::Delete { id } => {
            if !store.delete_expense(&id) {
                bail!("Expense not found: {}", id);
            }
            persist_check(store)?;
            println!("🗑️  Expense deleted successfully");
        }

        Command::Summary => {
            let summary = Summary::from_expenses(store.expenses());
            println!("📊 Expense Summary");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Total Expenses:   {}", money(summary.total));
            match &summary.highest {
                Some((category, amount)) => {
                    println!("Highest Category: {} ({})", category.label(), money(*amount))
                }
                None => println!("Highest Category: None"),
            }
            println!("Total Entries:    {}", summary.count);

            let slices = expense_tracker::chart_data(store.expenses());
            if !slices.is_empty() {
                println!("\nBy category:");
                for slice in slices {
                    println!(
                        "  {:<22} {:>14}  {:>5.1}%",
                        slice.category.label(),
                        money(slice.value),
                        slice.percentage
                    );
                }
            }

            let months = expense_tracker::monthly_chart_data(store.expenses());
            if !months.is_empty() {
                println!("\nBy month:");
                for (label, total) in months {
                    println!("  {:<22} {:>14}", label, money(total));
                }
            }
        }

        Command::Export { format, category, out } => {
            let filter = parse_filter(&category)?;
            let mut view = HistoryView::new();
            view.set_filter(filter.clone());
            let report = ExpenseReport::new(view.rows(store.expenses()), &filter, today());
            let dir = out.unwrap_or_else(|| config.export_dir.clone());

            let path = match format {
                ExportFormat::Pdf => write_pdf(&report, &dir, &config.currency_code)
                    .with_context(|| format!("Failed to generate {}", report_file_name(report.generated_on)))?,
                ExportFormat::Csv => write_csv_file(&report, &dir)?,
            };
            println!("📄 Wrote {} ({} entries)", path.display(), report.count());
        }
    }

    Ok(())
}

/// Draft for `edit`: fields left out keep the expense's current value
fn merge_edit(
    current: &Expense,
    description: Option<String>,
    amount: Option<String>,
    category: Option<String>,
    date: Option<String>,
) -> ExpenseDraft {
    let current = current.to_draft();
    ExpenseDraft {
        description: description.unwrap_or(current.description),
        amount: amount.unwrap_or(current.amount),
        category: category.unwrap_or(current.category),
        date: date.unwrap_or(current.date),
    }
}

/// Mutations keep the in-memory change even when persisting fails; the CLI
/// exits non-zero so the failure is not silent.
fn persist_check(store: &ExpenseStore) -> Result<()> {
    match store.error() {
        Some(error) => bail!("{}", error),
        None => Ok(()),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config, verbose: bool) -> Result<()> {
    use expense_tracker::ui;

    match logging::init_file_logging(&config.log_dir, verbose) {
        Ok(path) => println!("📝 Logging to {}", path.display()),
        Err(err) => eprintln!("⚠️  File logging disabled: {:#}", err),
    }

    println!("🖥️  Loading Expense Tracker UI...");
    let store = open_store(config)?;
    println!("✓ Loaded {} expenses", store.expenses().len());

    let mut app = ui::App::new(store, config);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config, _verbose: bool) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: expense-tracker --help");
    std::process::exit(1);
}
