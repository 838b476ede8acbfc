use soroban_sdk::{symbol_short, Env, Symbol};

// ── Call-depth guard ─────────────────────────────────────────────────────────
//
// The host serializes invocations, so the only interleaving hazard left is a
// nested call back into the contract while an outbound token transfer is in
// flight. Mutating entry points bracket themselves with `enter`/`exit`; a
// nested `enter` is refused. An entry point that fails never leaks the flag
// either, because the host reverts the invocation's storage writes wholesale.

const ENTERED: Symbol = symbol_short!("ENTERED");

/// Mark the start of a mutating operation. Returns `false` when another
/// mutating operation is already in progress.
#[must_use]
pub fn enter(env: &Env) -> bool {
    if env.storage().instance().get(&ENTERED).unwrap_or(false) {
        return false;
    }
    env.storage().instance().set(&ENTERED, &true);
    true
}

/// Clear the in-progress flag. Must run on every exit path.
pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}

// ── Unit tests ──────────────────────────────────────────────────────────────
