use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const TIER_PREFIX: Symbol = symbol_short!("ACC_TIER");
const OWNER: Symbol = symbol_short!("ACC_OWNER");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Access tiers ─────────────────────────────────────────────────────────────

/// Three-tier access hierarchy for administrative operations.
///
/// - `Owner`    – full control, including granting and revoking tiers.
/// - `Manager`  – may change pool policy (emission rate, fee floor,
///                controller bounds) but cannot touch the tier registry.
/// - `Operator` – may trigger maintenance operations only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AccessTier {
    Operator = 1,
    Manager = 2,
    Owner = 3,
}

impl AccessTier {
    /// Numeric rank used for tier comparison.
    pub fn rank(&self) -> u32 {
        match self {
            AccessTier::Operator => 1,
            AccessTier::Manager => 2,
            AccessTier::Owner => 3,
        }
    }

    /// Returns true if this tier is at least as high as `min`.
    pub fn covers(&self, min: &AccessTier) -> bool {
        self.rank() >= min.rank()
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn tier_key(who: &Address) -> (Symbol, Address) {
    (TIER_PREFIX, who.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Bootstrap the owner during contract initialization. The owner also
/// receives the `Owner` tier.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
    grant_tier(env, owner, AccessTier::Owner);
}

/// The bootstrap owner address, if set.
pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Assign a tier to an address. Callers must verify authorization first.
pub fn grant_tier(env: &Env, who: &Address, tier: AccessTier) {
    let key = tier_key(who);
    env.storage().persistent().set(&key, &tier);
    extend_ttl(env, &key);
}

/// The tier held by an address, if any.
pub fn tier_of(env: &Env, who: &Address) -> Option<AccessTier> {
    let key = tier_key(who);
    let tier: Option<AccessTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        extend_ttl(env, &key);
    }
    tier
}

/// Remove an address's tier entirely.
pub fn revoke_tier(env: &Env, who: &Address) {
    env.storage().persistent().remove(&tier_key(who));
}

/// Returns true when `caller` holds at least `min`. An address with no
/// tier is never authorized.
pub fn is_authorized(env: &Env, caller: &Address, min: &AccessTier) -> bool {
    match tier_of(env, caller) {
        Some(tier) => tier.covers(min),
        None => false,
    }
}

// ── Owner-gated mutations ────────────────────────────────────────────────────

/// Grant `target` a tier on behalf of `caller`. Returns `false` when the
/// caller is not an `Owner`; the caller must already be authenticated.
pub fn grant(env: &Env, caller: &Address, target: &Address, tier: AccessTier) -> bool {
    if !is_authorized(env, caller, &AccessTier::Owner) {
        return false;
    }
    grant_tier(env, target, tier);
    true
}

/// Revoke `target`'s tier on behalf of `caller`. Returns `false` when the
/// caller is not an `Owner`.
pub fn revoke(env: &Env, caller: &Address, target: &Address) -> bool {
    if !is_authorized(env, caller, &AccessTier::Owner) {
        return false;
    }
    revoke_tier(env, target);
    true
}

// ── Unit tests ──────────────────────────────────────────────────────────────
