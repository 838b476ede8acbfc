extern crate std;

use common::AccessTier;
use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{ContractError, StakePoolContract, StakePoolContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakePoolContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(StakePoolContract, ());
    let client = StakePoolContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let fee_recipient = Address::generate(&env);
    client.initialize(&admin, &token.address(), &fee_recipient, &10);

    (env, client, admin)
}

// ── Owner bootstrapped on initialize ─────────────────────────────────────────

#[test]
fn test_admin_is_owner_after_init() {
    let (_env, client, admin) = setup();
    assert_eq!(client.get_access_tier(&admin), Some(AccessTier::Owner));
}

#[test]
fn test_stranger_has_no_tier() {
    let (env, client, _admin) = setup();
    let stranger = Address::generate(&env);
    assert_eq!(client.get_access_tier(&stranger), None);
}

// ── Granting & revoking ──────────────────────────────────────────────────────

#[test]
fn test_owner_grants_and_revokes() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);

    client.grant_access(&admin, &manager, &AccessTier::Manager);
    assert_eq!(client.get_access_tier(&manager), Some(AccessTier::Manager));

    client.revoke_access(&admin, &manager);
    assert_eq!(client.get_access_tier(&manager), None);
}

#[test]
fn test_manager_cannot_grant() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);
    let target = Address::generate(&env);

    client.grant_access(&admin, &manager, &AccessTier::Manager);

    let result = client.try_grant_access(&manager, &target, &AccessTier::Operator);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_manager_cannot_revoke() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);
    let operator = Address::generate(&env);

    client.grant_access(&admin, &manager, &AccessTier::Manager);
    client.grant_access(&admin, &operator, &AccessTier::Operator);

    let result = client.try_revoke_access(&manager, &operator);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_non_admin_cannot_grant() {
    let (env, client, _admin) = setup();
    let intruder = Address::generate(&env);
    let target = Address::generate(&env);

    let result = client.try_grant_access(&intruder, &target, &AccessTier::Operator);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

// ── Tier gating on configuration ─────────────────────────────────────────────

#[test]
fn test_manager_can_change_policy() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);

    client.grant_access(&admin, &manager, &AccessTier::Manager);
    client.set_minimum_stake(&manager, &500);
    assert_eq!(client.get_config().minimum_stake, 500);

    client.set_reward_rate(&manager, &25);
    assert_eq!(client.get_reward_rate(), 25);
}

#[test]
fn test_operator_cannot_change_policy() {
    let (env, client, admin) = setup();
    let operator = Address::generate(&env);

    client.grant_access(&admin, &operator, &AccessTier::Operator);

    let result = client.try_set_minimum_stake(&operator, &500);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_revoked_manager_loses_access() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);

    client.grant_access(&admin, &manager, &AccessTier::Manager);
    client.set_minimum_stake(&manager, &500);

    client.revoke_access(&admin, &manager);
    let result = client.try_set_minimum_stake(&manager, &900);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    // The earlier change stands; the revoked attempt changed nothing.
    assert_eq!(client.get_config().minimum_stake, 500);
}
