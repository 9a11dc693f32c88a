//! # Escrow transfer protocol
//!
//! One interface over the two payment rails. `Currency::Native` resolves to
//! the native asset's Stellar Asset Contract address stored at `init`;
//! `Currency::Token` carries the token contract address directly. Inbound
//! value is pulled from the depositor under their authorization; outbound
//! value is pushed from the contract's custody. A failed transfer panics
//! inside the token contract and aborts the whole invocation, so partial
//! transfers are impossible.
//!
//! Outbound transfers run under a settlement lock: a nested re-entry into any
//! settlement path while a payout is in flight fails with `ReentrantCall`.
//! The host already refuses reentrant contract calls; the lock makes the
//! boundary explicit in contract state.

use soroban_sdk::{token, Address, Env};

use crate::storage::{self, DataKey};
use crate::types::Currency;
use crate::Error;

/// Resolve a currency selector to the token contract that settles it.
pub fn resolve(env: &Env, currency: &Currency) -> Result<Address, Error> {
    match currency {
        Currency::Native => storage::native_token(env),
        Currency::Token(addr) => Ok(addr.clone()),
    }
}

/// Pull `amount` of `currency` from `from` into contract custody.
///
/// A zero amount is a no-op so unfunded questions skip the token call.
pub fn deposit(env: &Env, from: &Address, currency: &Currency, amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    if amount == 0 {
        return Ok(());
    }
    let token_addr = resolve(env, currency)?;
    let client = token::Client::new(env, &token_addr);
    client.transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Push `amount` of `currency` from contract custody to `to`, under the
/// settlement lock. Callers must have zeroed the escrow field and persisted
/// the terminal state before invoking this.
pub fn payout(env: &Env, to: &Address, currency: &Currency, amount: i128) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    acquire_lock(env)?;
    let token_addr = resolve(env, currency)?;
    let client = token::Client::new(env, &token_addr);
    client.transfer(&env.current_contract_address(), to, &amount);
    release_lock(env);
    Ok(())
}

fn acquire_lock(env: &Env) -> Result<(), Error> {
    if env.storage().instance().has(&DataKey::SettleLock) {
        return Err(Error::ReentrantCall);
    }
    env.storage().instance().set(&DataKey::SettleLock, &true);
    Ok(())
}

fn release_lock(env: &Env) {
    env.storage().instance().remove(&DataKey::SettleLock);
}
