// 🧮 Bill Split Calculator - Tip and per-person totals
// Pure functions, recomputed on every input change. No state, no caching.
//
// Inputs are assumed pre-validated by the caller:
// - unparsable bill text never reaches this module
// - split_by = 0 is NOT guarded here (result is inf/NaN)
// - negative bills are not clamped

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Tip is only applied to bills strictly above this amount.
pub const TIP_THRESHOLD: f64 = 1.0;

pub const MAX_TIP_PERCENT: u32 = 100;

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Tip owed on `total_bill` at `tip_percent`.
///
/// Returns 0 for bills at or below [`TIP_THRESHOLD`], including zero and
/// negative amounts.
pub fn compute_tip(total_bill: f64, tip_percent: u32) -> f64 {
    if total_bill > TIP_THRESHOLD {
        (total_bill * tip_percent as f64) / 100.0
    } else {
        0.0
    }
}

/// Bill plus tip, divided evenly by `split_by`.
pub fn compute_total_per_person(total_bill: f64, split_by: u32, tip_percent: u32) -> f64 {
    let bill = compute_tip(total_bill, tip_percent) + total_bill;
    bill / split_by as f64
}

/// Slider position (0.0 - 1.0) scaled to a whole tip percent.
pub fn tip_percent_from_slider(position: f32) -> u32 {
    (position.clamp(0.0, 1.0) * 100.0).round() as u32
}

// ============================================================================
// VALUE TYPES
// ============================================================================

/// Snapshot of the calculator inputs at one recompute trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillInput {
    pub amount: f64,
    pub split_count: u32,
    pub tip_percent: u32,
}

/// Derived output, rendered then discarded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipResult {
    pub tip_amount: f64,
    pub per_person_amount: f64,
}

impl BillInput {
    /// Build an input, flooring split at 1 and capping tip at 100.
    pub fn new(amount: f64, split_count: u32, tip_percent: u32) -> Self {
        Self {
            amount,
            split_count: split_count.max(1),
            tip_percent: tip_percent.min(MAX_TIP_PERCENT),
        }
    }

    /// Build an input, rejecting out-of-range values instead of clamping them.
    pub fn validated(amount: f64, split_count: u32, tip_percent: u32) -> AppResult<Self> {
        if !amount.is_finite() {
            return Err(AppError::InvalidBill(amount.to_string()));
        }
        if split_count < 1 {
            return Err(AppError::InvalidSplit(split_count));
        }
        if tip_percent > MAX_TIP_PERCENT {
            return Err(AppError::InvalidTipPercent(tip_percent));
        }

        Ok(Self {
            amount,
            split_count,
            tip_percent,
        })
    }

    pub fn compute(&self) -> TipResult {
        TipResult {
            tip_amount: compute_tip(self.amount, self.tip_percent),
            per_person_amount: compute_total_per_person(
                self.amount,
                self.split_count,
                self.tip_percent,
            ),
        }
    }
}
