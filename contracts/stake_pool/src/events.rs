use soroban_sdk::{symbol_short, Address, Env};

use crate::controller::AdjustmentReason;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub token: Address,
    pub fee_recipient: Address,
    pub reward_rate: i128,
    pub timestamp: u64,
}

/// Fired when a user deposits stake. `amount` is the gross deposit; the
/// entry fee has already been deducted from `net_amount`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub fee: i128,
    pub net_amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws stake. The exit fee comes out of the gross
/// `amount`; `payout` is what actually left custody toward the staker.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub fee: i128,
    pub payout: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user claims accumulated rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired whenever a fee is collected and split.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeDistributedEvent {
    pub total_fee: i128,
    pub pool_share: i128,
    pub recipient_share: i128,
    pub recipient: Address,
    pub timestamp: u64,
}

/// Fired when a duration-tiered exit fee is applied to a withdrawal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitFeeAppliedEvent {
    pub staker: Address,
    pub held_for: u64,
    pub fee_bps: i128,
    pub fee: i128,
    pub timestamp: u64,
}

/// Fired when the emission rate changes, whether by the controller or by an
/// admin override.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateAdjustedEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub reason: AdjustmentReason,
    pub sustainability_days: i128,
    pub timestamp: u64,
}

/// Fired when the sustainability target changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SustainabilityTargetSetEvent {
    pub old_days: i128,
    pub new_days: i128,
    pub timestamp: u64,
}

/// Fired when reward funding is added to the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsAddedEvent {
    pub from: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    token: Address,
    fee_recipient: Address,
    reward_rate: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            token,
            fee_recipient,
            reward_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    staker: Address,
    amount: i128,
    fee: i128,
    net_amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            fee,
            net_amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    staker: Address,
    amount: i128,
    fee: i128,
    payout: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            fee,
            payout,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_fee_distributed(
    env: &Env,
    total_fee: i128,
    pool_share: i128,
    recipient_share: i128,
    recipient: Address,
) {
    env.events().publish(
        (symbol_short!("FEE_DIST"),),
        FeeDistributedEvent {
            total_fee,
            pool_share,
            recipient_share,
            recipient,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_exit_fee_applied(
    env: &Env,
    staker: Address,
    held_for: u64,
    fee_bps: i128,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("EXIT_FEE"), staker.clone()),
        ExitFeeAppliedEvent {
            staker,
            held_for,
            fee_bps,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_adjusted(
    env: &Env,
    old_rate: i128,
    new_rate: i128,
    reason: AdjustmentReason,
    sustainability_days: i128,
) {
    env.events().publish(
        (symbol_short!("RATE_ADJ"),),
        RewardRateAdjustedEvent {
            old_rate,
            new_rate,
            reason,
            sustainability_days,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_sustainability_target_set(env: &Env, old_days: i128, new_days: i128) {
    env.events().publish(
        (symbol_short!("SUST_TGT"),),
        SustainabilityTargetSetEvent {
            old_days,
            new_days,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_added(env: &Env, from: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), from.clone()),
        RewardsAddedEvent {
            from,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_minimum_stake_set(env: &Env, minimum_stake: i128) {
    env.events().publish(
        (symbol_short!("MIN_STAKE"),),
        (minimum_stake, env.ledger().timestamp()),
    );
}

pub fn publish_max_apr_set(env: &Env, max_apr_bps: i128) {
    env.events().publish(
        (symbol_short!("MAX_APR"),),
        (max_apr_bps, env.ledger().timestamp()),
    );
}

pub fn publish_adjustment_period_set(env: &Env, period: u64) {
    env.events().publish(
        (symbol_short!("ADJ_PER"),),
        (period, env.ledger().timestamp()),
    );
}

pub fn publish_min_reward_rate_set(env: &Env, min_rate: i128) {
    env.events().publish(
        (symbol_short!("MIN_RATE"),),
        (min_rate, env.ledger().timestamp()),
    );
}
