// Expense Tracker - Core Library
// Exposes all modules for use in the CLI, the TUI and tests

pub mod entities;   // Expense + Category models
pub mod db;         // Key/value storage (SQLite, in-memory)
pub mod store;      // State container: actions, reducer, persistence
pub mod analytics;  // Totals, category and monthly aggregation
pub mod history;    // Filter, sort, pagination, edit form
pub mod format;     // Currency and date display
pub mod report;     // PDF + CSV export
pub mod config;
pub mod logging;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use entities::{
    Category, Expense, ExpenseDraft, ValidExpense, ValidationError,
    DATE_FORMAT, DEFAULT_COLOR, MAX_AMOUNT,
};
pub use db::{
    Storage, SqliteStorage, MemoryStorage,
    backup_raw_expenses, load_expenses, save_expenses, setup_database,
    CORRUPT_BACKUP_KEY, STORAGE_KEY,
};
pub use store::{Action, ExpenseState, ExpenseStore, StoreError, reduce};
pub use analytics::{
    ChartSlice, MonthlyTotal, Summary,
    chart_data, expenses_by_category, expenses_by_month, highest_category,
    monthly_chart_data, total_expenses,
};
pub use history::{
    CategoryFilter, EditForm, HistoryView, ITEMS_PER_PAGE,
    filter_and_sort, page_items, total_pages,
};
pub use format::{format_amount, format_currency, format_date};
pub use report::{ExpenseReport, ReportError, render_pdf, write_csv, write_pdf};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
