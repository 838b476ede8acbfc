//! Pure accrual math for the reward-per-unit accumulator.
//!
//! Everything in this module is side-effect free; the contract's settlement
//! plumbing in `lib.rs` is responsible for reading and writing storage.

/// Fixed-point scaling factor.
///
/// Reward-per-unit values are multiplied by 10^18 before storage so sub-unit
/// precision survives integer division across many small settlements. All
/// multiplications are checked; callers map `None` to an explicit overflow
/// error rather than wrapping or saturating.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// Advance the global reward-per-unit accumulator.
///
/// ```text
/// Δrpu = elapsed × reward_rate × SCALE / total_staked
/// new  = stored + Δrpu
/// ```
///
/// When `total_staked` is zero the accumulator is returned unchanged: with
/// nothing staked there is nobody to distribute to, and the division is
/// never evaluated. Calling this twice with the same inputs yields the same
/// value; it only becomes a settlement once the caller stores the result.
pub fn reward_per_unit(
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> Option<i128> {
    if total_staked <= 0 {
        return Some(stored);
    }

    let delta = reward_rate
        .checked_mul(elapsed as i128)?
        .checked_mul(SCALE)?
        / total_staked;

    stored.checked_add(delta)
}

/// Total reward a position has earned and not yet claimed.
///
/// ```text
/// earned = balance × (current_rpu − rpu_paid) / SCALE + pending
/// ```
///
/// `rpu_paid` is only ever a past snapshot of the monotone accumulator, so
/// the delta — and therefore the result — is never negative.
pub fn earned(balance: i128, current_rpu: i128, rpu_paid: i128, pending: i128) -> Option<i128> {
    let fresh = balance.checked_mul(current_rpu.checked_sub(rpu_paid)?)? / SCALE;

    pending.checked_add(fresh)
}

/// Blend a new deposit into the amount-weighted average stake-entry time.
///
/// ```text
/// new_wst = (old_wst × old_balance + now × net_amount) / (old_balance + net_amount)
/// ```
///
/// A first deposit sets the weighted time to its own timestamp; each further
/// deposit pulls it toward `now` in proportion to the deposit's share of the
/// resulting balance. Withdrawals never touch this value.
pub fn blend_stake_time(
    old_wst: u64,
    old_balance: i128,
    now: u64,
    net_amount: i128,
) -> Option<u64> {
    if old_balance <= 0 {
        return Some(now);
    }

    let total = old_balance.checked_add(net_amount)?;
    let weighted = (old_wst as i128)
        .checked_mul(old_balance)?
        .checked_add((now as i128).checked_mul(net_amount)?)?;

    Some((weighted / total) as u64)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
