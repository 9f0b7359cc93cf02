// Tutorial Apps - Core Library
// Exposes the screen state models for use in the TUI, CLI, API server, and tests

pub mod calculator;
pub mod bill_form;
pub mod counter;
pub mod bizcard;
pub mod format;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use calculator::{
    compute_tip, compute_total_per_person, tip_percent_from_slider,
    BillInput, TipResult,
};
pub use bill_form::BillForm;
pub use counter::{MoneyCounter, CounterSnapshot};
pub use bizcard::{BizCard, Project};
pub use format::{format_currency, format_percent};
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
