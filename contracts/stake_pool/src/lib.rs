#![no_std]

pub mod controller;
pub mod events;
pub mod fees;
pub mod rewards;

use common::{auth, reentrancy, AccessTier};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol,
};

use controller::AdjustmentReason;

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const STATE: Symbol = symbol_short!("STATE");

// Per-staker positions use tuple keys:  (prefix, staker_address)
const POSITION: Symbol = symbol_short!("POS");

// ── Policy defaults applied at initialization ────────────────────────────────

const DEFAULT_MINIMUM_STAKE: i128 = 100;
const DEFAULT_MAX_APR_BPS: i128 = 5_000;
const DEFAULT_TARGET_SUSTAINABILITY_DAYS: i128 = 180;
const DEFAULT_MIN_REWARD_RATE: i128 = 1;
const DEFAULT_ADJUSTMENT_PERIOD: u64 = 86_400;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfiguration = 4,
    BelowMinimumStake = 5,
    InsufficientBalance = 6,
    ZeroAmount = 7,
    TransferFailed = 8,
    ReentrantCall = 9,
    MathOverflow = 10,
}

// ── Storage types ────────────────────────────────────────────────────────────

/// Policy parameters, set at initialization and adjusted through the admin
/// setters. Each field is range-checked independently on update.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub admin: Address,
    pub token: Address,
    pub fee_recipient: Address,
    pub minimum_stake: i128,
    pub max_apr_bps: i128,
    pub target_sustainability_days: i128,
    pub min_reward_rate: i128,
    pub adjustment_period: u64,
}

/// Accounting state. `total_staked` always equals the sum of all position
/// balances; `reward_per_unit_stored` only ever grows.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub total_staked: i128,
    pub reward_rate: i128,
    pub reward_per_unit_stored: i128,
    pub last_update_time: u64,
    pub last_adjustment_time: u64,
    pub total_fees_collected: i128,
    pub total_rewards_distributed: i128,
}

/// A staker's position, created lazily on first stake. A position with zero
/// balance and zero pending reward is equivalent to no position at all.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub balance: i128,
    pub reward_per_unit_paid: i128,
    pub pending_reward: i128,
    pub weighted_stake_time: u64,
}

/// Snapshot of a staker's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub balance: i128,
    pub earned: i128,
    pub held_for: u64,
    pub exit_fee_bps: i128,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn load_config(env: &Env) -> Result<PoolConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

fn save_config(env: &Env, cfg: &PoolConfig) {
    env.storage().instance().set(&CONFIG, cfg);
}

fn load_state(env: &Env) -> Result<PoolState, ContractError> {
    env.storage()
        .instance()
        .get(&STATE)
        .ok_or(ContractError::NotInitialized)
}

fn save_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&STATE, state);
}

fn peek_state(env: &Env) -> Option<PoolState> {
    env.storage().instance().get(&STATE)
}

fn position_key(staker: &Address) -> (Symbol, Address) {
    (POSITION, staker.clone())
}

fn load_position(env: &Env, staker: &Address) -> Position {
    env.storage()
        .persistent()
        .get(&position_key(staker))
        .unwrap_or(Position {
            balance: 0,
            reward_per_unit_paid: 0,
            pending_reward: 0,
            weighted_stake_time: 0,
        })
}

fn save_position(env: &Env, staker: &Address, pos: &Position) {
    env.storage().persistent().set(&position_key(staker), pos);
}

fn clear_position(env: &Env, staker: &Address) {
    env.storage().persistent().remove(&position_key(staker));
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakePoolContract;

#[contractimpl]
impl StakePoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `token`         – SAC address of the single staked/reward asset.
    /// * `fee_recipient` – receives the 30% share of every collected fee.
    /// * `reward_rate`   – tokens emitted **per second** across all stakers.
    ///
    /// Policy bounds (minimum stake, APR ceiling, sustainability target,
    /// rate floor, adjustment cadence) start at their defaults and are
    /// adjusted through the setters below.
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        fee_recipient: Address,
        reward_rate: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate < 0 {
            return Err(ContractError::InvalidConfiguration);
        }

        let now = env.ledger().timestamp();

        save_config(
            &env,
            &PoolConfig {
                admin: admin.clone(),
                token: token.clone(),
                fee_recipient: fee_recipient.clone(),
                minimum_stake: DEFAULT_MINIMUM_STAKE,
                max_apr_bps: DEFAULT_MAX_APR_BPS,
                target_sustainability_days: DEFAULT_TARGET_SUSTAINABILITY_DAYS,
                min_reward_rate: DEFAULT_MIN_REWARD_RATE,
                adjustment_period: DEFAULT_ADJUSTMENT_PERIOD,
            },
        );
        save_state(
            &env,
            &PoolState {
                total_staked: 0,
                reward_rate,
                reward_per_unit_stored: 0,
                last_update_time: now,
                last_adjustment_time: now,
                total_fees_collected: 0,
                total_rewards_distributed: 0,
            },
        );

        // The initializing admin becomes the access-tier owner.
        auth::set_owner(&env, &admin);

        events::publish_initialized(&env, admin, token, fee_recipient, reward_rate);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` tokens, net of the flat entry fee.
    ///
    /// Accrual is settled before the balance changes so the deposit cannot
    /// earn retroactively, and the rate controller gets its opportunistic
    /// pass before the ledger moves.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::guarded(&env, || Self::stake_inner(&env, &staker, amount))
    }

    fn stake_inner(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        let cfg = load_config(env)?;
        if amount < cfg.minimum_stake {
            return Err(ContractError::BelowMinimumStake);
        }

        Self::settle_position(env, staker)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let now = env.ledger().timestamp();
        let fee = fees::entry_fee(amount).ok_or(ContractError::MathOverflow)?;
        let net_amount = amount - fee;

        let mut state = load_state(env)?;
        let mut pos = load_position(env, staker);

        pos.weighted_stake_time =
            rewards::blend_stake_time(pos.weighted_stake_time, pos.balance, now, net_amount)
                .ok_or(ContractError::MathOverflow)?;
        pos.balance = pos
            .balance
            .checked_add(net_amount)
            .ok_or(ContractError::MathOverflow)?;
        state.total_staked = state
            .total_staked
            .checked_add(net_amount)
            .ok_or(ContractError::MathOverflow)?;
        state.total_fees_collected = state.total_fees_collected.saturating_add(fee);

        save_position(env, staker, &pos);
        save_state(env, &state);

        // Custody: pull the full deposit in, then pay out the recipient's
        // fee share. The pool share never leaves.
        let contract = env.current_contract_address();
        Self::transfer_or_abort(env, &cfg.token, staker, &contract, amount)?;
        let (pool_share, recipient_share) = fees::split(fee);
        if recipient_share > 0 {
            Self::transfer_or_abort(env, &cfg.token, &contract, &cfg.fee_recipient, recipient_share)?;
        }

        events::publish_staked(
            env,
            staker.clone(),
            amount,
            fee,
            net_amount,
            state.total_staked,
        );
        events::publish_fee_distributed(
            env,
            fee,
            pool_share,
            recipient_share,
            cfg.fee_recipient.clone(),
        );

        Ok(())
    }

    // ── Withdrawing ─────────────────────────────────────────────────────────

    /// Withdraw `amount` of staked balance, paying the duration-tiered exit
    /// fee out of the gross amount.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::guarded(&env, || Self::withdraw_inner(&env, &staker, amount))
    }

    fn withdraw_inner(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        let cfg = load_config(env)?;
        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        Self::settle_position(env, staker)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let mut state = load_state(env)?;
        let mut pos = load_position(env, staker);
        if amount > pos.balance {
            return Err(ContractError::InsufficientBalance);
        }

        Self::withdraw_settled(env, &cfg, &mut state, &mut pos, staker, amount)?;

        save_position(env, staker, &pos);
        save_state(env, &state);
        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim all accumulated rewards for `staker`. Returns the amount paid;
    /// a zero pending balance returns 0 without failing.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::guarded(&env, || Self::claim_inner(&env, &staker))
    }

    fn claim_inner(env: &Env, staker: &Address) -> Result<i128, ContractError> {
        let cfg = load_config(env)?;

        Self::settle_position(env, staker)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let mut state = load_state(env)?;
        let mut pos = load_position(env, staker);

        let reward = Self::claim_settled(env, &cfg, &mut state, &mut pos, staker)?;

        save_position(env, staker, &pos);
        save_state(env, &state);
        Ok(reward)
    }

    /// Withdraw the full balance and claim all rewards in one settlement
    /// pass. Either half silently no-ops when there is nothing to pay, and
    /// the emptied position is removed from storage.
    pub fn exit(env: Env, staker: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::guarded(&env, || Self::exit_inner(&env, &staker))
    }

    fn exit_inner(env: &Env, staker: &Address) -> Result<(), ContractError> {
        let cfg = load_config(env)?;

        Self::settle_position(env, staker)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let mut state = load_state(env)?;
        let mut pos = load_position(env, staker);

        let balance = pos.balance;
        if balance > 0 {
            Self::withdraw_settled(env, &cfg, &mut state, &mut pos, staker, balance)?;
        }
        Self::claim_settled(env, &cfg, &mut state, &mut pos, staker)?;

        if pos.balance == 0 && pos.pending_reward == 0 {
            clear_position(env, staker);
        } else {
            save_position(env, staker, &pos);
        }
        save_state(env, &state);
        Ok(())
    }

    /// Add reward funding to the pool. Anyone may top up; the amount goes
    /// straight into custody and extends the pool's runway.
    pub fn add_rewards(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();
        Self::guarded(&env, || Self::add_rewards_inner(&env, &from, amount))
    }

    fn add_rewards_inner(env: &Env, from: &Address, amount: i128) -> Result<(), ContractError> {
        let cfg = load_config(env)?;
        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        Self::settle_global(env)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let contract = env.current_contract_address();
        Self::transfer_or_abort(env, &cfg.token, from, &contract, amount)?;

        events::publish_rewards_added(env, from.clone(), amount);
        Ok(())
    }

    // ── Admin: emission rate ────────────────────────────────────────────────

    /// Manually override the emission rate.
    ///
    /// The accumulator is flushed at the old rate *before* the change, so no
    /// staker's accrued rewards move retroactively. The override is recorded
    /// as an adjustment with reason `Manual`.
    ///
    /// Requires at least `Manager` tier.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || Self::set_reward_rate_inner(&env, &caller, new_rate))
    }

    fn set_reward_rate_inner(
        env: &Env,
        caller: &Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        let cfg = load_config(env)?;
        Self::require_manager(env, caller)?;
        if new_rate < cfg.min_reward_rate {
            return Err(ContractError::InvalidConfiguration);
        }

        Self::settle_global(env)?;
        Self::maybe_adjust_rate(env, &cfg)?;

        let mut state = load_state(env)?;
        let old_rate = state.reward_rate;
        let now = env.ledger().timestamp();

        state.reward_rate = new_rate;
        state.last_adjustment_time = now;
        save_state(env, &state);

        let vault = token::Client::new(env, &cfg.token).balance(&env.current_contract_address());
        let available = controller::available_rewards(vault, state.total_staked);
        let days = controller::sustainability_days(available, new_rate);
        events::publish_reward_rate_adjusted(env, old_rate, new_rate, AdjustmentReason::Manual, days);

        Ok(())
    }

    // ── Admin: policy bounds ────────────────────────────────────────────────

    /// Update the minimum acceptable deposit. Requires `Manager` tier.
    pub fn set_minimum_stake(
        env: Env,
        caller: Address,
        minimum_stake: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            let mut cfg = load_config(&env)?;
            Self::require_manager(&env, &caller)?;
            if minimum_stake <= 0 {
                return Err(ContractError::InvalidConfiguration);
            }
            cfg.minimum_stake = minimum_stake;
            save_config(&env, &cfg);
            events::publish_minimum_stake_set(&env, minimum_stake);
            Ok(())
        })
    }

    /// Update the APR ceiling used to cap upward rate adjustments.
    /// Requires `Manager` tier.
    pub fn set_max_apr(env: Env, caller: Address, max_apr_bps: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            let mut cfg = load_config(&env)?;
            Self::require_manager(&env, &caller)?;
            if max_apr_bps <= 0 {
                return Err(ContractError::InvalidConfiguration);
            }
            cfg.max_apr_bps = max_apr_bps;
            save_config(&env, &cfg);
            events::publish_max_apr_set(&env, max_apr_bps);
            Ok(())
        })
    }

    /// Update the controller's sustainability target, in days.
    /// Requires `Manager` tier.
    pub fn set_target_sustainability_days(
        env: Env,
        caller: Address,
        target_days: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            let mut cfg = load_config(&env)?;
            Self::require_manager(&env, &caller)?;
            if target_days <= 0 {
                return Err(ContractError::InvalidConfiguration);
            }
            let old_days = cfg.target_sustainability_days;
            cfg.target_sustainability_days = target_days;
            save_config(&env, &cfg);
            events::publish_sustainability_target_set(&env, old_days, target_days);
            Ok(())
        })
    }

    /// Update the controller cadence, in seconds. Requires `Manager` tier.
    pub fn set_adjustment_period(
        env: Env,
        caller: Address,
        period: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            let mut cfg = load_config(&env)?;
            Self::require_manager(&env, &caller)?;
            if period == 0 {
                return Err(ContractError::InvalidConfiguration);
            }
            cfg.adjustment_period = period;
            save_config(&env, &cfg);
            events::publish_adjustment_period_set(&env, period);
            Ok(())
        })
    }

    /// Update the emission-rate floor. Requires `Manager` tier.
    pub fn set_min_reward_rate(
        env: Env,
        caller: Address,
        min_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            let mut cfg = load_config(&env)?;
            Self::require_manager(&env, &caller)?;
            if min_rate <= 0 {
                return Err(ContractError::InvalidConfiguration);
            }
            cfg.min_reward_rate = min_rate;
            save_config(&env, &cfg);
            events::publish_min_reward_rate_set(&env, min_rate);
            Ok(())
        })
    }

    // ── Admin: access tiers ─────────────────────────────────────────────────

    /// Grant `target` an access tier. Only an `Owner` may call this.
    pub fn grant_access(
        env: Env,
        caller: Address,
        target: Address,
        tier: AccessTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            if !auth::grant(&env, &caller, &target, tier) {
                return Err(ContractError::Unauthorized);
            }
            Ok(())
        })
    }

    /// Revoke `target`'s access tier entirely. Only an `Owner` may call this.
    pub fn revoke_access(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::guarded(&env, || {
            if !auth::revoke(&env, &caller, &target) {
                return Err(ContractError::Unauthorized);
            }
            Ok(())
        })
    }

    /// Returns the access tier of the given address, if any.
    pub fn get_access_tier(env: Env, who: Address) -> Option<AccessTier> {
        auth::tier_of(&env, &who)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Current reward-per-unit accumulator, accrued to `now` without
    /// mutating state. Two reads at the same timestamp always agree.
    pub fn get_reward_per_unit(env: Env) -> Result<i128, ContractError> {
        let state = load_state(&env)?;
        let elapsed = env.ledger().timestamp().saturating_sub(state.last_update_time);
        rewards::reward_per_unit(
            state.reward_per_unit_stored,
            state.reward_rate,
            elapsed,
            state.total_staked,
        )
        .ok_or(ContractError::MathOverflow)
    }

    /// Real-time earned-but-unclaimed rewards for a staker.
    pub fn get_earned(env: Env, staker: Address) -> Result<i128, ContractError> {
        let current_rpu = Self::get_reward_per_unit(env.clone())?;
        let pos = load_position(&env, &staker);
        rewards::earned(
            pos.balance,
            current_rpu,
            pos.reward_per_unit_paid,
            pos.pending_reward,
        )
        .ok_or(ContractError::MathOverflow)
    }

    /// Current annualized emission in basis points of staked principal.
    pub fn get_apr_bps(env: Env) -> Result<i128, ContractError> {
        let state = load_state(&env)?;
        controller::apr_bps(state.reward_rate, state.total_staked)
            .ok_or(ContractError::MathOverflow)
    }

    /// Custody balance in excess of staked principal.
    pub fn get_available_rewards(env: Env) -> Result<i128, ContractError> {
        let cfg = load_config(&env)?;
        let state = load_state(&env)?;
        let vault = token::Client::new(&env, &cfg.token).balance(&env.current_contract_address());
        Ok(controller::available_rewards(vault, state.total_staked))
    }

    /// Days the pool can sustain the current emission rate.
    pub fn get_sustainability_days(env: Env) -> Result<i128, ContractError> {
        let state = load_state(&env)?;
        let available = Self::get_available_rewards(env)?;
        Ok(controller::sustainability_days(available, state.reward_rate))
    }

    /// Combined position snapshot: balance, live earned amount, holding
    /// duration, and the exit-fee tier that duration selects.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let current_rpu = Self::get_reward_per_unit(env.clone())?;
        let pos = load_position(&env, &staker);

        let earned = rewards::earned(
            pos.balance,
            current_rpu,
            pos.reward_per_unit_paid,
            pos.pending_reward,
        )
        .ok_or(ContractError::MathOverflow)?;

        let held_for = if pos.balance > 0 {
            env.ledger().timestamp().saturating_sub(pos.weighted_stake_time)
        } else {
            0
        };

        Ok(StakerInfo {
            balance: pos.balance,
            earned,
            held_for,
            exit_fee_bps: fees::exit_fee_bps(held_for),
        })
    }

    /// Return the staker's current balance (net of entry fees).
    pub fn get_staked(env: Env, staker: Address) -> i128 {
        load_position(&env, &staker).balance
    }

    pub fn get_total_staked(env: Env) -> i128 {
        peek_state(&env).map(|s| s.total_staked).unwrap_or(0)
    }

    pub fn get_reward_rate(env: Env) -> i128 {
        peek_state(&env).map(|s| s.reward_rate).unwrap_or(0)
    }

    pub fn get_total_fees_collected(env: Env) -> i128 {
        peek_state(&env).map(|s| s.total_fees_collected).unwrap_or(0)
    }

    pub fn get_total_rewards_distributed(env: Env) -> i128 {
        peek_state(&env)
            .map(|s| s.total_rewards_distributed)
            .unwrap_or(0)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, ContractError> {
        load_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the pool is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&CONFIG) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` does not hold at least `Manager` tier.
    fn require_manager(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if !auth::is_authorized(env, caller, &AccessTier::Manager) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Run `op` behind the call-depth guard. A nested mutating call while an
    /// operation is in progress is rejected; the flag clears on every exit
    /// path, and error returns revert it with the rest of the invocation.
    fn guarded<T>(
        env: &Env,
        op: impl FnOnce() -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        if !reentrancy::enter(env) {
            return Err(ContractError::ReentrantCall);
        }
        let result = op();
        reentrancy::exit(env);
        result
    }

    /// Flush the global reward-per-unit accumulator up to `now`.
    ///
    /// This is the first step of every operation that reads or mutates
    /// balances, the emission rate, or the staked total; skipping it would
    /// corrupt every later accrual computation.
    fn settle_global(env: &Env) -> Result<PoolState, ContractError> {
        let mut state = load_state(env)?;
        let now = env.ledger().timestamp();
        let elapsed = now.saturating_sub(state.last_update_time);

        state.reward_per_unit_stored = rewards::reward_per_unit(
            state.reward_per_unit_stored,
            state.reward_rate,
            elapsed,
            state.total_staked,
        )
        .ok_or(ContractError::MathOverflow)?;
        state.last_update_time = now;

        save_state(env, &state);
        Ok(state)
    }

    /// Full per-staker settlement: flush the global accumulator, fold the
    /// staker's newly earned rewards into `pending_reward`, and snapshot the
    /// accumulator so their next interaction starts fresh.
    fn settle_position(env: &Env, staker: &Address) -> Result<(), ContractError> {
        let state = Self::settle_global(env)?;

        let mut pos = load_position(env, staker);
        pos.pending_reward = rewards::earned(
            pos.balance,
            state.reward_per_unit_stored,
            pos.reward_per_unit_paid,
            pos.pending_reward,
        )
        .ok_or(ContractError::MathOverflow)?;
        pos.reward_per_unit_paid = state.reward_per_unit_stored;

        save_position(env, staker, &pos);
        Ok(())
    }

    /// Opportunistic controller pass: every settling operation runs this
    /// before its own mutation, so the rate adapts on user traffic rather
    /// than on a timer. State must already be settled by the caller.
    fn maybe_adjust_rate(env: &Env, cfg: &PoolConfig) -> Result<(), ContractError> {
        let mut state = load_state(env)?;
        let now = env.ledger().timestamp();

        let vault = token::Client::new(env, &cfg.token).balance(&env.current_contract_address());
        let available = controller::available_rewards(vault, state.total_staked);

        let proposal = controller::check_adjustment(
            now,
            state.last_adjustment_time,
            cfg.adjustment_period,
            available,
            state.total_staked,
            state.reward_rate,
            cfg.min_reward_rate,
            cfg.max_apr_bps,
            cfg.target_sustainability_days,
        )
        .ok_or(ContractError::MathOverflow)?;

        if let Some(reason) = proposal.reason {
            if proposal.due && proposal.rate != state.reward_rate {
                let old_rate = state.reward_rate;
                state.reward_rate = proposal.rate;
                state.last_adjustment_time = now;
                save_state(env, &state);

                events::publish_reward_rate_adjusted(
                    env,
                    old_rate,
                    proposal.rate,
                    reason,
                    proposal.days,
                );
            }
        }

        Ok(())
    }

    /// Apply an exit-fee withdrawal to already-settled state. The fee comes
    /// out of the gross amount, and the weighted entry time is deliberately
    /// left untouched on partial withdrawals. The caller persists `state`
    /// and `pos`.
    fn withdraw_settled(
        env: &Env,
        cfg: &PoolConfig,
        state: &mut PoolState,
        pos: &mut Position,
        staker: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let now = env.ledger().timestamp();
        let held_for = now.saturating_sub(pos.weighted_stake_time);
        let fee_bps = fees::exit_fee_bps(held_for);
        let fee = fees::fee_amount(amount, fee_bps).ok_or(ContractError::MathOverflow)?;
        let payout = amount - fee;

        pos.balance -= amount;
        state.total_staked -= amount;
        state.total_fees_collected = state.total_fees_collected.saturating_add(fee);

        let contract = env.current_contract_address();
        Self::transfer_or_abort(env, &cfg.token, &contract, staker, payout)?;
        let (pool_share, recipient_share) = fees::split(fee);
        if recipient_share > 0 {
            Self::transfer_or_abort(env, &cfg.token, &contract, &cfg.fee_recipient, recipient_share)?;
        }

        events::publish_exit_fee_applied(env, staker.clone(), held_for, fee_bps, fee);
        events::publish_withdrawn(
            env,
            staker.clone(),
            amount,
            fee,
            payout,
            state.total_staked,
        );
        events::publish_fee_distributed(
            env,
            fee,
            pool_share,
            recipient_share,
            cfg.fee_recipient.clone(),
        );

        Ok(())
    }

    /// Pay out the pending reward from already-settled state. Returns the
    /// amount paid; zero pending is a silent no-op. The caller persists
    /// `state` and `pos`.
    fn claim_settled(
        env: &Env,
        cfg: &PoolConfig,
        state: &mut PoolState,
        pos: &mut Position,
        staker: &Address,
    ) -> Result<i128, ContractError> {
        let reward = pos.pending_reward;
        if reward <= 0 {
            return Ok(0);
        }

        pos.pending_reward = 0;
        state.total_rewards_distributed = state.total_rewards_distributed.saturating_add(reward);

        let contract = env.current_contract_address();
        Self::transfer_or_abort(env, &cfg.token, &contract, staker, reward)?;

        events::publish_reward_claimed(env, staker.clone(), reward);
        Ok(reward)
    }

    /// Move tokens through the custody collaborator, treating any
    /// non-success as a fatal abort of the whole operation.
    fn transfer_or_abort(
        env: &Env,
        token_id: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let result = token::Client::new(env, token_id).try_transfer(from, to, &amount);
        match result {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_auth;

#[cfg(test)]
mod test_controller;
