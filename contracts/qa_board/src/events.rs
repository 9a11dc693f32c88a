//! # Events
//!
//! Event payloads and emit helpers. Every state transition publishes exactly
//! one record (acceptance publishes two: the acceptance itself and, when the
//! bounty is non-zero, the payout). Topics follow the
//! `(symbol_short!(topic), question_id)` scheme consumed by the off-chain
//! indexer.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::Currency;

/// A question was created (`created` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionCreated {
    pub question_id: u64,
    pub asker: Address,
    pub currency: Currency,
    pub bounty: i128,
    pub deadline: u64,
}

/// A question's escrow was topped up (`funded` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyAdded {
    pub question_id: u64,
    pub from: Address,
    pub amount: i128,
}

/// An answer was posted (`answered` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerPosted {
    pub question_id: u64,
    pub answer_id: u32,
    pub answerer: Address,
}

/// An answer was accepted (`accepted` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerAccepted {
    pub question_id: u64,
    pub answer_id: u32,
    pub accepted_by: Address,
}

/// An answer was rejected by the asker (`rejected` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerRejected {
    pub question_id: u64,
    pub answer_id: u32,
    pub rejected_by: Address,
}

/// The escrowed bounty was paid to the winning answerer (`paid` topic).
/// Not emitted for zero-bounty questions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyPaid {
    pub question_id: u64,
    pub answer_id: u32,
    pub winner: Address,
    pub amount: i128,
}

/// The escrowed bounty was returned to the asker (`refunded` topic).
/// Emitted by both expiry refunds and cancellations.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyRefunded {
    pub question_id: u64,
    pub to: Address,
    pub amount: i128,
}

/// A question was cancelled before any answer existed (`cancelled` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionCancelled {
    pub question_id: u64,
    pub asker: Address,
}

/// Ownership changed hands (`owner_set` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub previous: Address,
    pub new: Address,
}

pub fn emit_question_created(env: &Env, event: QuestionCreated) {
    env.events()
        .publish((symbol_short!("created"), event.question_id), event);
}

pub fn emit_bounty_added(env: &Env, event: BountyAdded) {
    env.events()
        .publish((symbol_short!("funded"), event.question_id), event);
}

pub fn emit_answer_posted(env: &Env, event: AnswerPosted) {
    env.events()
        .publish((symbol_short!("answered"), event.question_id), event);
}

pub fn emit_answer_accepted(env: &Env, event: AnswerAccepted) {
    env.events()
        .publish((symbol_short!("accepted"), event.question_id), event);
}

pub fn emit_answer_rejected(env: &Env, event: AnswerRejected) {
    env.events()
        .publish((symbol_short!("rejected"), event.question_id), event);
}

pub fn emit_bounty_paid(env: &Env, event: BountyPaid) {
    env.events()
        .publish((symbol_short!("paid"), event.question_id), event);
}

pub fn emit_bounty_refunded(env: &Env, event: BountyRefunded) {
    env.events()
        .publish((symbol_short!("refunded"), event.question_id), event);
}

pub fn emit_question_cancelled(env: &Env, event: QuestionCancelled) {
    env.events()
        .publish((symbol_short!("cancelled"), event.question_id), event);
}

pub fn emit_paused(env: &Env, caller: Address) {
    env.events().publish((symbol_short!("paused"),), caller);
}

pub fn emit_unpaused(env: &Env, caller: Address) {
    env.events().publish((symbol_short!("unpaused"),), caller);
}

pub fn emit_ownership_transferred(env: &Env, event: OwnershipTransferred) {
    env.events().publish((symbol_short!("owner_set"),), event);
}
