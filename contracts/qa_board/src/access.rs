//! # Access & circuit-breaker control
//!
//! Single-owner authorization plus the global pause flag. Predicates are
//! re-evaluated on every call; nothing is cached between invocations.
//!
//! The pause flag gates value intake (question submission, answer submission,
//! bounty top-ups). Settlement paths — acceptance, refund, cancellation —
//! stay available while paused so escrowed funds are never stranded.

use soroban_sdk::{Address, Env};

use crate::storage::{bump_instance, DataKey};
use crate::Error;

/// Store the initial owner. Fails if an owner is already set.
pub fn init_owner(env: &Env, owner: &Address) -> Result<(), Error> {
    if env.storage().instance().has(&DataKey::Owner) {
        return Err(Error::AlreadyInitialized);
    }
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
    Ok(())
}

/// Retrieve the current owner.
pub fn owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

/// Replace the owner. `current` must be the present owner and must authorize.
pub fn transfer_ownership(env: &Env, current: &Address, new_owner: &Address) -> Result<(), Error> {
    current.require_auth();
    require_owner(env, current)?;
    env.storage().instance().set(&DataKey::Owner, new_owner);
    bump_instance(env);
    Ok(())
}

/// Fail unless `caller` is the contract owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if *caller != owner(env)? {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

/// Return the pause flag.
pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

/// Set the pause flag.
pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

/// Fail when the circuit breaker is engaged.
pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    if is_paused(env) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}
