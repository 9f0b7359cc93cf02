// ⚠️ Error Types - Everything the library can refuse
// The calculator itself never fails; these come from the layers around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bill text that does not parse as a decimal amount
    #[error("Invalid bill amount: {0:?}")]
    InvalidBill(String),

    /// Split count below 1
    #[error("Invalid split count: {0} (must be at least 1)")]
    InvalidSplit(u32),

    /// Tip percent outside 0-100
    #[error("Invalid tip percent: {0} (must be 0-100)")]
    InvalidTipPercent(u32),

    /// Config file could not be parsed or serialized
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
