//! Entry and exit fee schedule.
//!
//! Deposits pay a flat entry fee. Withdrawals pay a duration-tiered exit fee
//! keyed on the position's weighted stake-entry time: the longer the stake
//! has been held, the lower the tier. Every collected fee splits between the
//! reward pool (stays in custody) and the configured fee recipient.

pub const BPS_DENOMINATOR: i128 = 10_000;
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Flat fee charged on every deposit, independent of duration.
pub const ENTRY_FEE_BPS: i128 = 100;

/// Share of every fee that stays in custody as pool reward, in percent.
pub const POOL_SHARE_PCT: i128 = 70;
/// Share of every fee paid out to the fee recipient, in percent.
pub const RECIPIENT_SHARE_PCT: i128 = 30;

/// Exit-fee tiers as `(minimum holding duration, fee in basis points)`.
///
/// Lookup picks the last tier whose threshold the holding duration has
/// reached, so each boundary belongs to the cheaper tier: exactly 7 days
/// pays 350 bp, exactly 30 days pays 100 bp.
pub const EXIT_FEE_TIERS: [(u64, i128); 4] = [
    (0, 500),
    (7 * SECONDS_PER_DAY, 350),
    (14 * SECONDS_PER_DAY, 200),
    (30 * SECONDS_PER_DAY, 100),
];

/// Exit fee in basis points for a position held for `held_for` seconds.
pub fn exit_fee_bps(held_for: u64) -> i128 {
    let mut bps = EXIT_FEE_TIERS[0].1;
    for (threshold, tier_bps) in EXIT_FEE_TIERS {
        if held_for >= threshold {
            bps = tier_bps;
        }
    }
    bps
}

/// Fee owed on `amount` at `bps`, floored by integer division.
pub fn fee_amount(amount: i128, bps: i128) -> Option<i128> {
    Some(amount.checked_mul(bps)? / BPS_DENOMINATOR)
}

/// Flat entry fee owed on a deposit of `amount`.
pub fn entry_fee(amount: i128) -> Option<i128> {
    fee_amount(amount, ENTRY_FEE_BPS)
}

/// Split a collected fee into `(pool_share, recipient_share)`.
///
/// Both shares are floored independently, so they can undershoot the total
/// by a rounding residual. Only the recipient share ever leaves custody;
/// the pool share and the residual both stay behind as pool reward.
pub fn split(total_fee: i128) -> (i128, i128) {
    let pool_share = total_fee * POOL_SHARE_PCT / 100;
    let recipient_share = total_fee * RECIPIENT_SHARE_PCT / 100;
    (pool_share, recipient_share)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
