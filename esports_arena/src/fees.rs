//! Centralized fee policy.
//!
//! All fee math lives here so the percentages and rounding rules exist in
//! exactly one place. Fees are computed on integer points with ceiling
//! division, so the platform never undercharges by a fractional point and
//! the payout never exceeds `gross - fees`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GST applied to withdrawals, in percent.
pub const GST_RATE_PERCENT: i64 = 18;

/// Platform fee applied to withdrawals, in percent.
pub const PLATFORM_FEE_PERCENT: i64 = 10;

/// Service fee added on top of the prize pool when a user funds a
/// tournament of their own, in percent.
pub const CREATION_FEE_PERCENT: i64 = 20;

/// Fee policy errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
    /// Amount must be strictly positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Fee computation would overflow
    #[error("Amount too large: {0}")]
    AmountTooLarge(i64),

    /// Amount does not cover the withheld fees
    #[error("Amount too small to cover fees: {0}")]
    AmountTooSmall(i64),
}

/// Result type for fee computations
pub type FeeResult<T> = Result<T, FeeError>;

/// Breakdown of a withdrawal into fees and the paid-out remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalBreakdown {
    /// Amount debited from the wallet
    pub gross: i64,
    /// GST portion withheld
    pub gst: i64,
    /// Platform fee portion withheld
    pub platform_fee: i64,
    /// Amount actually paid out
    pub net: i64,
}

/// Compute the fee breakdown for a withdrawal of `gross` points.
///
/// Both fees are taken from the gross amount; the remainder is what gets
/// paid out via UPI or a Google Play code. Fees round up.
///
/// # Errors
///
/// * `FeeError::InvalidAmount` - `gross` is zero or negative
/// * `FeeError::AmountTooSmall` - fees would leave nothing to pay out
/// * `FeeError::AmountTooLarge` - computation would overflow `i64`
pub fn withdrawal_breakdown(gross: i64) -> FeeResult<WithdrawalBreakdown> {
    if gross <= 0 {
        return Err(FeeError::InvalidAmount(gross));
    }
    let gst = percent_ceil(gross, GST_RATE_PERCENT)?;
    let platform_fee = percent_ceil(gross, PLATFORM_FEE_PERCENT)?;
    let net = gross - gst - platform_fee;
    if net <= 0 {
        return Err(FeeError::AmountTooSmall(gross));
    }
    Ok(WithdrawalBreakdown {
        gross,
        gst,
        platform_fee,
        net,
    })
}

/// Total a creator must fund for a tournament: the full prize pool plus the
/// creation service fee.
///
/// # Errors
///
/// * `FeeError::InvalidAmount` - `prize_pool` is zero or negative
/// * `FeeError::AmountTooLarge` - computation would overflow `i64`
pub fn creation_total(prize_pool: i64) -> FeeResult<i64> {
    if prize_pool <= 0 {
        return Err(FeeError::InvalidAmount(prize_pool));
    }
    let surcharge = percent_ceil(prize_pool, CREATION_FEE_PERCENT)?;
    prize_pool
        .checked_add(surcharge)
        .ok_or(FeeError::AmountTooLarge(prize_pool))
}

/// `ceil(amount * percent / 100)` with overflow checking. `amount` and
/// `percent` are both positive here.
fn percent_ceil(amount: i64, percent: i64) -> FeeResult<i64> {
    let scaled = amount
        .checked_mul(percent)
        .ok_or(FeeError::AmountTooLarge(amount))?;
    let rounded = scaled
        .checked_add(99)
        .ok_or(FeeError::AmountTooLarge(amount))?;
    Ok(rounded / 100)
}
