//! Emission-rate controller.
//!
//! A dead-band feedback loop over pool solvency: it observes only the vault
//! balance and the current emission rate, and proposes at most a ±10% step
//! per adjustment period. Inside the 90–150% band of the sustainability
//! target it proposes nothing, which keeps the loop free of oscillation.

use soroban_sdk::contracttype;

use crate::fees::{BPS_DENOMINATOR, SECONDS_PER_DAY};

pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Percent step applied outside the dead band.
const STEP_PCT: i128 = 10;
/// Lower edge of the dead band, in percent of target.
const LOW_BAND_PCT: i128 = 90;
/// Upper edge of the dead band, in percent of target.
const HIGH_BAND_PCT: i128 = 150;

/// Why a rate change was committed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdjustmentReason {
    /// Empty pool or empty ledger: the rate was forced to the floor.
    FloorForced = 1,
    /// Sustainability fell below 90% of target: stepped down.
    DecreasedLowSustainability = 2,
    /// Sustainability rose above 150% of target: stepped up.
    IncreasedHighSustainability = 3,
    /// Explicit admin override.
    Manual = 4,
}

/// Outcome of one controller evaluation.
pub struct RateProposal {
    /// Whether a full adjustment period had elapsed.
    pub due: bool,
    /// The proposed emission rate; equals the current rate inside the band.
    pub rate: i128,
    /// Cause of a differing proposal; `None` inside the dead band.
    pub reason: Option<AdjustmentReason>,
    /// The sustainability reading the decision was based on.
    pub days: i128,
}

/// Custody balance in excess of staked principal.
///
/// External mis-transfers can push custody below principal; that case floors
/// at zero rather than underflowing.
pub fn available_rewards(vault_balance: i128, total_staked: i128) -> i128 {
    if vault_balance > total_staked {
        vault_balance - total_staked
    } else {
        0
    }
}

/// Days the pool can sustain the given emission rate before depletion.
pub fn sustainability_days(available: i128, rate: i128) -> i128 {
    if rate <= 0 || available <= 0 {
        return 0;
    }
    available / rate / SECONDS_PER_DAY as i128
}

/// Annualized emission as basis points of the staked principal.
pub fn apr_bps(rate: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 {
        return Some(0);
    }
    Some(
        rate.checked_mul(SECONDS_PER_YEAR as i128)?
            .checked_mul(BPS_DENOMINATOR)?
            / total_staked,
    )
}

/// The emission rate implied by the APR ceiling at the current ledger size.
fn rate_at_apr_cap(max_apr_bps: i128, total_staked: i128) -> Option<i128> {
    let annual_denominator = BPS_DENOMINATOR.checked_mul(SECONDS_PER_YEAR as i128)?;
    Some(max_apr_bps.checked_mul(total_staked)? / annual_denominator)
}

/// Evaluate the control law against the current solvency reading.
///
/// Not due (less than one period since the last committed adjustment): the
/// current rate is echoed back with `due == false`. Due with an empty pool
/// or empty ledger: the floor is proposed. Otherwise the sustainability
/// reading is compared against the dead band; the band edges themselves do
/// not trigger. The upward step is capped by recomputing the rate directly
/// from `max_apr_bps` — at a small ledger this moves the rate further than
/// the step would — and both directions floor at `min_rate`.
#[allow(clippy::too_many_arguments)]
pub fn check_adjustment(
    now: u64,
    last_adjustment_time: u64,
    adjustment_period: u64,
    available: i128,
    total_staked: i128,
    rate: i128,
    min_rate: i128,
    max_apr_bps: i128,
    target_days: i128,
) -> Option<RateProposal> {
    let days = sustainability_days(available, rate);

    if now.saturating_sub(last_adjustment_time) < adjustment_period {
        return Some(RateProposal {
            due: false,
            rate,
            reason: None,
            days,
        });
    }

    if available <= 0 || total_staked <= 0 {
        return Some(RateProposal {
            due: true,
            rate: min_rate,
            reason: Some(AdjustmentReason::FloorForced),
            days,
        });
    }

    let scaled = days.checked_mul(100)?;

    if scaled < target_days.checked_mul(LOW_BAND_PCT)? {
        let mut reduced = rate.checked_mul(100 - STEP_PCT)? / 100;
        if reduced < min_rate {
            reduced = min_rate;
        }
        return Some(RateProposal {
            due: true,
            rate: reduced,
            reason: Some(AdjustmentReason::DecreasedLowSustainability),
            days,
        });
    }

    if scaled > target_days.checked_mul(HIGH_BAND_PCT)? {
        let mut increased = rate.checked_mul(100 + STEP_PCT)? / 100;
        if apr_bps(increased, total_staked)? > max_apr_bps {
            increased = rate_at_apr_cap(max_apr_bps, total_staked)?;
        }
        if increased < min_rate {
            increased = min_rate;
        }
        return Some(RateProposal {
            due: true,
            rate: increased,
            reason: Some(AdjustmentReason::IncreasedHighSustainability),
            days,
        });
    }

    Some(RateProposal {
        due: true,
        rate,
        reason: None,
        days,
    })
}

// ── Unit tests ──────────────────────────────────────────────────────────────
