// Rabbitry - Core Library
// Exposes all modules for use in the CLI, the dashboard, and tests

pub mod error;
pub mod status;
pub mod entities;
pub mod db;
pub mod aggregator;
pub mod i18n;
pub mod export;
pub mod config;
pub mod logging;

// Only compile the dashboard when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::{Result, StoreError, ValidationError};
pub use status::{age_in_days, derive_status};
pub use entities::{
    Collection, Record, RecordId,
    Rabbit, RabbitDraft, RabbitPatch, RabbitStatus, Sex,
    StockItem, StockDraft, StockPatch, StockType,
    FinanceTransaction, FinanceDraft, FinancePatch, FinanceKind,
    ReproductionEvent, ReproductionDraft, ReproductionPatch,
    HealthEvent, HealthDraft, HealthPatch, HealthEventType,
};
pub use db::{Clock, Event, Snapshot, Store, SCHEMA_VERSION};
pub use aggregator::{
    Period, Kpis, Report, StatusCounts, CategoryTotal, FinanceTotals,
    compute_kpis, compute_report, stock_value, top_expense_categories, finance_totals,
    filter_rabbits, filter_finances, low_stock_items, partition_stocks,
};
pub use i18n::{lookup, translate, Locale, MessageKey};
pub use export::{
    ExportSummary, ReportExport,
    export_report, default_report_filename, write_report,
    export_finances_csv, load_finances_csv, import_finances_csv,
};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
