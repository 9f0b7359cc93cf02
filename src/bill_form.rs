// 🧾 Bill Form - State behind the tip calculator screen
// Caller-owned; every input event rebuilds a BillInput and recomputes.

use crate::calculator::{tip_percent_from_slider, BillInput, TipResult};
use crate::config::{TipConfig, MAX_SLIDER_STEPS};
use crate::error::{AppError, AppResult};

const ZERO_RESULT: TipResult = TipResult {
    tip_amount: 0.0,
    per_person_amount: 0.0,
};

#[derive(Debug, Clone)]
pub struct BillForm {
    bill_text: String,
    split_by: u32,
    slider_steps: u32,
    slider_stop: u32,
    result: TipResult,
    last_error: Option<String>,
}

impl Default for BillForm {
    fn default() -> Self {
        Self::new(&TipConfig::default())
    }
}

impl BillForm {
    pub fn new(config: &TipConfig) -> Self {
        Self {
            bill_text: String::new(),
            split_by: config.default_split.max(1),
            slider_steps: config.slider_steps.min(MAX_SLIDER_STEPS),
            slider_stop: 0,
            result: ZERO_RESULT,
            last_error: None,
        }
    }

    // ========================================================================
    // BILL TEXT
    // ========================================================================

    pub fn bill_text(&self) -> &str {
        &self.bill_text
    }

    pub fn set_bill_text(&mut self, text: &str) {
        self.bill_text = text.to_string();
        self.recompute();
    }

    /// Key-by-key entry: digits and a single decimal point only.
    /// Returns false when the character was rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        let accepted = c.is_ascii_digit() || (c == '.' && !self.bill_text.contains('.'));
        if accepted {
            self.bill_text.push(c);
            self.recompute();
        }
        accepted
    }

    pub fn pop_char(&mut self) {
        if self.bill_text.pop().is_some() {
            self.recompute();
        }
    }

    pub fn clear(&mut self) {
        self.bill_text.clear();
        self.recompute();
    }

    /// Anything other than whitespace counts as entered
    pub fn is_valid(&self) -> bool {
        !self.bill_text.trim().is_empty()
    }

    pub fn parse_bill(&self) -> AppResult<f64> {
        let trimmed = self.bill_text.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::InvalidBill(trimmed.to_string()))
    }

    // ========================================================================
    // SPLIT
    // ========================================================================

    pub fn split_by(&self) -> u32 {
        self.split_by
    }

    pub fn increment_split(&mut self) {
        self.split_by = self.split_by.saturating_add(1);
        log::debug!("Split increased to {}", self.split_by);
        self.recompute();
    }

    /// Never drops below 1
    pub fn decrement_split(&mut self) {
        self.split_by = if self.split_by > 1 { self.split_by - 1 } else { 1 };
        log::debug!("Split decreased to {}", self.split_by);
        self.recompute();
    }

    // ========================================================================
    // SLIDER
    // ========================================================================

    fn slider_intervals(&self) -> u32 {
        self.slider_steps + 1
    }

    pub fn slider_position(&self) -> f32 {
        self.slider_stop as f32 / self.slider_intervals() as f32
    }

    /// Move the slider, snapping to the nearest stop.
    pub fn set_slider(&mut self, position: f32) {
        let intervals = self.slider_intervals();
        let stop = (position.clamp(0.0, 1.0) * intervals as f32).round() as u32;
        self.slider_stop = stop.min(intervals);
        self.recompute();
    }

    pub fn step_slider_up(&mut self) {
        if self.slider_stop < self.slider_intervals() {
            self.slider_stop += 1;
            self.recompute();
        }
    }

    pub fn step_slider_down(&mut self) {
        if self.slider_stop > 0 {
            self.slider_stop -= 1;
            self.recompute();
        }
    }

    pub fn tip_percent(&self) -> u32 {
        tip_percent_from_slider(self.slider_position())
    }

    // ========================================================================
    // DERIVED VALUES
    // ========================================================================

    /// Current inputs, or None while the bill text is blank or unparsable
    pub fn input(&self) -> Option<BillInput> {
        if !self.is_valid() {
            return None;
        }
        self.parse_bill()
            .ok()
            .map(|amount| BillInput::new(amount, self.split_by, self.tip_percent()))
    }

    pub fn result(&self) -> TipResult {
        self.result
    }

    pub fn tip_amount(&self) -> f64 {
        self.result.tip_amount
    }

    pub fn total_per_person(&self) -> f64 {
        self.result.per_person_amount
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn recompute(&mut self) {
        if !self.is_valid() {
            self.result = ZERO_RESULT;
            self.last_error = None;
            return;
        }

        match self.parse_bill() {
            Ok(amount) => {
                let input = BillInput::new(amount, self.split_by, self.tip_percent());
                self.result = input.compute();
                self.last_error = None;
                log::debug!(
                    "Recomputed: bill={} split={} tip={}% -> tip={:.2} per_person={:.2}",
                    input.amount,
                    input.split_count,
                    input.tip_percent,
                    self.result.tip_amount,
                    self.result.per_person_amount
                );
            }
            Err(e) => {
                self.result = ZERO_RESULT;
                self.last_error = Some(e.to_string());
            }
        }
    }
}
