//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the board:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type      | Description                          |
//! |-----------------|-----------|--------------------------------------|
//! | `Owner`         | `Address` | Contract owner (admin override)      |
//! | `NativeToken`   | `Address` | SAC address for the native asset     |
//! | `Moderation`    | `Address` | Optional moderation registry         |
//! | `Paused`        | `bool`    | Circuit-breaker flag                 |
//! | `QuestionCount` | `u64`     | Auto-increment question ID counter   |
//! | `SettleLock`    | `bool`    | Settlement lock, held across payouts |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type             | Description                      |
//! |--------------------|------------------|----------------------------------|
//! | `QConfig(id)`      | `QuestionConfig` | Immutable question configuration |
//! | `QState(id)`       | `QuestionState`  | Mutable question state           |
//! | `Answer(qid, aid)` | `Answer`         | Answer records, 1-indexed        |
//! | `Rep(address)`     | `Reputation`     | Per-account counters             |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining. Records are never deleted; terminal states are retained.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Answer, Question, QuestionConfig, QuestionState, Reputation};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys live as long as the contract and are extended together.
/// Persistent-tier keys hold per-question, per-answer and per-account data
/// with independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Contract owner (Instance).
    Owner,
    /// Native asset SAC address (Instance).
    NativeToken,
    /// Optional moderation registry contract (Instance).
    Moderation,
    /// Circuit-breaker flag (Instance).
    Paused,
    /// Global auto-increment counter for question IDs (Instance).
    QuestionCount,
    /// Settlement lock held across outbound transfers (Instance).
    SettleLock,
    /// Immutable question configuration keyed by ID (Persistent).
    QConfig(u64),
    /// Mutable question state keyed by ID (Persistent).
    QState(u64),
    /// Answer keyed by (question_id, answer_id) (Persistent).
    Answer(u64, u32),
    /// Per-account reputation counters (Persistent).
    Rep(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Allocate the next question ID. IDs are 1-indexed and never reused.
pub fn next_question_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::QuestionCount)
        .unwrap_or(0);
    let id = current + 1;
    env.storage().instance().set(&DataKey::QuestionCount, &id);
    id
}

/// Read the question counter without advancing it.
pub fn question_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::QuestionCount)
        .unwrap_or(0)
}

/// Store the native asset SAC address in instance storage.
pub fn set_native_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::NativeToken, token);
    bump_instance(env);
}

/// Retrieve the native asset SAC address.
pub fn native_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NativeToken)
        .ok_or(Error::NotInitialized)
}

/// Store the optional moderation registry contract address.
pub fn set_moderation(env: &Env, registry: &Address) {
    env.storage().instance().set(&DataKey::Moderation, registry);
    bump_instance(env);
}

/// Retrieve the moderation registry, if one has been configured.
pub fn moderation(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Moderation)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new question.
pub fn save_question(env: &Env, config: &QuestionConfig, state: &QuestionState) {
    let config_key = DataKey::QConfig(config.id);
    let state_key = DataKey::QState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Question` by combining config and state.
pub fn load_question(env: &Env, id: u64) -> Result<Question, Error> {
    let config = load_question_config(env, id)?;
    let state = load_question_state(env, id)?;
    Ok(Question {
        id: config.id,
        asker: config.asker,
        currency: config.currency,
        bounty: state.bounty,
        content: config.content,
        created_at: config.created_at,
        deadline: config.deadline,
        status: state.status,
        accepted_answer_id: state.accepted_answer_id,
        refunded: state.refunded,
        answers_count: state.answers_count,
    })
}

/// Load only the immutable question configuration.
pub fn load_question_config(env: &Env, id: u64) -> Result<QuestionConfig, Error> {
    let key = DataKey::QConfig(id);
    let config: QuestionConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::QuestionNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable question state.
pub fn load_question_state(env: &Env, id: u64) -> Result<QuestionState, Error> {
    let key = DataKey::QState(id);
    let state: QuestionState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::QuestionNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Save only the mutable question state (top-ups and settlement).
pub fn save_question_state(env: &Env, id: u64, state: &QuestionState) {
    let key = DataKey::QState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Save an answer record.
pub fn save_answer(env: &Env, answer: &Answer) {
    let key = DataKey::Answer(answer.question_id, answer.answer_id);
    env.storage().persistent().set(&key, answer);
    bump_persistent(env, &key);
}

/// Load an answer by its composite key.
pub fn load_answer(env: &Env, question_id: u64, answer_id: u32) -> Result<Answer, Error> {
    let key = DataKey::Answer(question_id, answer_id);
    let answer: Answer = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::AnswerNotFound)?;
    bump_persistent(env, &key);
    Ok(answer)
}

/// Load an account's reputation counters, zeroed if none exist yet.
pub fn load_reputation(env: &Env, account: &Address) -> Reputation {
    let key = DataKey::Rep(account.clone());
    env.storage().persistent().get(&key).unwrap_or(Reputation {
        questions_asked: 0,
        answers_posted: 0,
        answers_accepted: 0,
    })
}

/// Save an account's reputation counters.
pub fn save_reputation(env: &Env, account: &Address, rep: &Reputation) {
    let key = DataKey::Rep(account.clone());
    env.storage().persistent().set(&key, rep);
    bump_persistent(env, &key);
}
