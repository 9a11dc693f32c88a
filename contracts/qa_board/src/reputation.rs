//! Per-account reputation counters.
//!
//! Counters are derived side effects of lifecycle transitions and are bumped
//! in the same invocation as the transition that earns them, so they commit
//! or roll back together with the escrow mutation. They only ever increase.

use soroban_sdk::{Address, Env};

use crate::storage::{load_reputation, save_reputation};
use crate::types::Reputation;

pub fn record_question_asked(env: &Env, account: &Address) {
    let mut rep = load_reputation(env, account);
    rep.questions_asked += 1;
    save_reputation(env, account, &rep);
}

pub fn record_answer_posted(env: &Env, account: &Address) {
    let mut rep = load_reputation(env, account);
    rep.answers_posted += 1;
    save_reputation(env, account, &rep);
}

pub fn record_answer_accepted(env: &Env, account: &Address) {
    let mut rep = load_reputation(env, account);
    rep.answers_accepted += 1;
    save_reputation(env, account, &rep);
}

pub fn get(env: &Env, account: &Address) -> Reputation {
    load_reputation(env, account)
}
