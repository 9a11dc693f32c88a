//! # Types
//!
//! Shared data structures used across all modules of the Q&A board contract.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Question` is internally stored as two separate ledger entries:
//!
//! - [`QuestionConfig`] — written once at submission; never mutated.
//! - [`QuestionState`] — written on every top-up, acceptance, refund and
//!   cancellation.
//!
//! The public API exposes the reconstructed [`Question`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`QuestionStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Open ──► Resolved    (answer accepted)
//! Open ──► Cancelled   (asker cancels, only while no answers exist)
//! Open ──► Expired     (asker reclaims escrow after the deadline)
//! ```
//!
//! All three right-hand states are terminal; no entry point transitions out of
//! them. [`AnswerStatus`] moves `Posted → Accepted` at most once per question;
//! `Posted → Rejected` takes an answer out of the running without touching the
//! question.

use soroban_sdk::{contracttype, Address, BytesN};

/// Settlement currency for a question's bounty.
///
/// `Native` is the sentinel for the chain's base asset, settled through the
/// native Stellar Asset Contract address configured at `init`. `Token` selects
/// any other fungible token contract. The currency is fixed at question
/// creation; top-ups, payout and refund all use the same rail.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Currency {
    /// The chain's native settlement asset.
    Native,
    /// A specific fungible token contract.
    Token(Address),
}

/// Lifecycle status of a question.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QuestionStatus {
    /// Accepting answers; bounty held in escrow.
    Open,
    /// An answer was accepted and the bounty paid out. Terminal.
    Resolved,
    /// Cancelled by the asker before any answer existed. Terminal.
    Cancelled,
    /// Deadline passed and the asker reclaimed the escrow. Terminal.
    Expired,
}

/// Lifecycle status of an answer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnswerStatus {
    /// Submitted; eligible for acceptance while the question is Open.
    Posted,
    /// Chosen as the winning answer. Immutable from here on.
    Accepted,
    /// Rejected by the asker (or owner); no longer eligible for acceptance.
    Rejected,
}

/// Immutable question configuration, written once at submission.
///
/// Stored separately from mutable state so the frequent writes (top-ups,
/// settlement) only touch the small [`QuestionState`] entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionConfig {
    pub id: u64,
    pub asker: Address,
    pub currency: Currency,
    /// Opaque content pointer (e.g. an IPFS CID digest); never interpreted.
    pub content: BytesN<32>,
    pub created_at: u64,
    pub deadline: u64,
}

/// Mutable question state, updated on top-ups and settlement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuestionState {
    /// Escrowed bounty currently held by the contract. Zeroed before any
    /// outbound transfer is issued.
    pub bounty: i128,
    pub status: QuestionStatus,
    /// Id of the accepted answer; 0 while none is accepted.
    pub accepted_answer_id: u32,
    /// Set exactly once, by `refund_expired`.
    pub refunded: bool,
    /// Highest answer id assigned so far; monotonically non-decreasing.
    pub answers_count: u32,
}

/// Full representation of a question.
///
/// Used as the public API return type; reconstructed internally from the split
/// `QuestionConfig` + `QuestionState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    /// Unique identifier (auto-incremented, 1-indexed, never reused).
    pub id: u64,
    /// Account that posted the question and funded the bounty.
    pub asker: Address,
    /// Settlement currency, fixed at creation.
    pub currency: Currency,
    /// Escrowed bounty amount.
    pub bounty: i128,
    /// Opaque content pointer.
    pub content: BytesN<32>,
    /// Ledger timestamp at submission.
    pub created_at: u64,
    /// Ledger timestamp after which the escrow becomes reclaimable.
    pub deadline: u64,
    /// Current lifecycle status.
    pub status: QuestionStatus,
    /// Id of the accepted answer; 0 while none is accepted.
    pub accepted_answer_id: u32,
    /// Whether the escrow was returned via `refund_expired`.
    pub refunded: bool,
    /// Number of answers submitted so far.
    pub answers_count: u32,
}

/// An answer to a question, identified by `(question_id, answer_id)` with
/// answer ids 1-indexed per question.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Answer {
    pub question_id: u64,
    pub answer_id: u32,
    pub answerer: Address,
    /// Opaque content pointer.
    pub content: BytesN<32>,
    pub created_at: u64,
    pub status: AnswerStatus,
}

/// Per-account reputation counters, maintained as a derived side effect of
/// lifecycle transitions. Monotonically increasing; never reset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reputation {
    pub questions_asked: u32,
    pub answers_posted: u32,
    pub answers_accepted: u32,
}
