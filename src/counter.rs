// 🪙 Money Counter - Tap-to-earn demo state

use serde::Serialize;

use crate::config::CounterConfig;
use crate::format::format_whole_currency;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyCounter {
    value: u64,
    tap_amount: u64,
    rich_threshold: u64,
}

impl Default for MoneyCounter {
    fn default() -> Self {
        Self::new(&CounterConfig::default())
    }
}

impl MoneyCounter {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            value: 0,
            tap_amount: config.tap_amount,
            rich_threshold: config.rich_threshold,
        }
    }

    /// Add one tap's worth and return the new value
    pub fn tap(&mut self) -> u64 {
        self.value = self.value.saturating_add(self.tap_amount);
        log::debug!("moneyCount: {}", self.value);
        self.value
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn is_rich(&self) -> bool {
        self.value > self.rich_threshold
    }

    /// Big counter text, e.g. `$3`
    pub fn display(&self) -> String {
        format_whole_currency(self.value)
    }

    /// Text inside the tap circle
    pub fn label(&self) -> String {
        format!("Tap {}", self.value)
    }
}

/// Serializable view for the web API
#[derive(Debug, Clone, Serialize)]
pub struct CounterSnapshot {
    pub value: u64,
    pub display: String,
    pub rich: bool,
}

impl From<&MoneyCounter> for CounterSnapshot {
    fn from(counter: &MoneyCounter) -> Self {
        Self {
            value: counter.value(),
            display: counter.display(),
            rich: counter.is_rich(),
        }
    }
}
