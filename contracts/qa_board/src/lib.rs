//! # Q&A Bounty Board Contract
//!
//! This is the root crate of the escrow-backed question/answer bounty board.
//! It exposes the single Soroban contract `QaBoard` whose entry points cover
//! the full question lifecycle:
//!
//! | Phase       | Entry Point(s)                                       |
//! |-------------|------------------------------------------------------|
//! | Bootstrap   | [`QaBoard::init`]                                    |
//! | Admin       | `pause`, `unpause`, `transfer_ownership`, `set_moderation` |
//! | Questions   | [`QaBoard::submit_question`], [`QaBoard::add_bounty`], [`QaBoard::refund_expired`], [`QaBoard::cancel_question`] |
//! | Answers     | [`QaBoard::post_answer`], [`QaBoard::accept_answer`], [`QaBoard::reject_answer`] |
//! | Queries     | `get_question`, `get_answer`, `get_reputation`, `is_paused`, `get_owner` |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`access`]. Storage access is fully
//! delegated to [`storage`]. Value movement is fully delegated to [`escrow`].
//! This file contains **only** the public entry points and event emissions —
//! no business logic lives here directly.
//!
//! ## Settlement safety
//!
//! Every payout and refund follows the same ordering: the question and answer
//! records are driven to their terminal state and the escrow field zeroed
//! *before* the outbound transfer is issued. Combined with the settlement lock
//! in [`escrow`] and the host's transactional rollback, a reentrant call can
//! never observe a question that is still Open with a nonzero bounty, and a
//! failed transfer leaves no trace of the attempted settlement.

#![no_std]

use soroban_sdk::{contract, contractclient, contracterror, contractimpl, Address, BytesN, Env};

mod access;
mod escrow;
mod events;
mod reputation;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_settlement;

use storage::{
    load_answer, load_question, load_question_config, load_question_state, next_question_id,
    save_answer, save_question, save_question_state,
};
pub use types::{
    Answer, AnswerStatus, Currency, Question, QuestionConfig, QuestionState, QuestionStatus,
    Reputation,
};

/// Minimum lead time between submission and deadline (seconds).
pub const MIN_DEADLINE_DELAY: u64 = 3_600;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    ContractPaused = 4,
    QuestionNotFound = 5,
    AnswerNotFound = 6,
    QuestionNotOpen = 7,
    DeadlineTooSoon = 8,
    DeadlineNotReached = 9,
    InvalidAmount = 10,
    AlreadyRefunded = 11,
    AnswerAlreadyHandled = 12,
    QuestionHasAnswers = 13,
    ContentFlagged = 14,
    ReentrantCall = 15,
}

/// Interface of the optional moderation registry collaborator.
///
/// When a registry is configured, acceptance consults it and refuses payout
/// for flagged content. Without one there is no moderation gate.
#[contractclient(name = "ModerationClient")]
pub trait Moderation {
    fn is_flagged(env: Env, content: BytesN<32>) -> bool;
}

#[contract]
pub struct QaBoard;

#[contractimpl]
impl QaBoard {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract with its owner and the native asset's SAC
    /// address.
    ///
    /// Must be called exactly once immediately after deployment. Subsequent
    /// calls fail with `Error::AlreadyInitialized`.
    pub fn init(env: Env, owner: Address, native_token: Address) -> Result<(), Error> {
        owner.require_auth();
        access::init_owner(&env, &owner)?;
        storage::set_native_token(&env, &native_token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Admin
    // ─────────────────────────────────────────────────────────

    /// Engage the circuit breaker. Owner only.
    ///
    /// While paused, question submission, answer submission and bounty
    /// top-ups fail; acceptance, refund and cancellation stay available.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        access::set_paused(&env, true);
        events::emit_paused(&env, caller);
        Ok(())
    }

    /// Release the circuit breaker. Owner only.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        access::set_paused(&env, false);
        events::emit_unpaused(&env, caller);
        Ok(())
    }

    /// Transfer ownership to `new_owner`. Current owner only.
    pub fn transfer_ownership(env: Env, current: Address, new_owner: Address) -> Result<(), Error> {
        access::transfer_ownership(&env, &current, &new_owner)?;
        events::emit_ownership_transferred(
            &env,
            events::OwnershipTransferred {
                previous: current,
                new: new_owner,
            },
        );
        Ok(())
    }

    /// Configure the moderation registry consulted on acceptance. Owner only.
    pub fn set_moderation(env: Env, caller: Address, registry: Address) -> Result<(), Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        storage::set_moderation(&env, &registry);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Question lifecycle
    // ─────────────────────────────────────────────────────────

    /// Post a question, escrowing `bounty` in `currency`.
    ///
    /// * `deadline` must be at least [`MIN_DEADLINE_DELAY`] in the future.
    /// * `bounty` may be zero; a nonzero bounty is pulled from `asker` into
    ///   contract custody, failing the whole call if the transfer fails.
    ///
    /// Returns the new question id (1-indexed, never reused).
    pub fn submit_question(
        env: Env,
        asker: Address,
        currency: Currency,
        bounty: i128,
        deadline: u64,
        content: BytesN<32>,
    ) -> Result<u64, Error> {
        asker.require_auth();
        access::require_not_paused(&env)?;

        if bounty < 0 {
            return Err(Error::InvalidAmount);
        }
        let now = env.ledger().timestamp();
        if deadline < now + MIN_DEADLINE_DELAY {
            return Err(Error::DeadlineTooSoon);
        }

        escrow::deposit(&env, &asker, &currency, bounty)?;

        let id = next_question_id(&env);
        let config = QuestionConfig {
            id,
            asker: asker.clone(),
            currency: currency.clone(),
            content,
            created_at: now,
            deadline,
        };
        let state = QuestionState {
            bounty,
            status: QuestionStatus::Open,
            accepted_answer_id: 0,
            refunded: false,
            answers_count: 0,
        };
        save_question(&env, &config, &state);
        reputation::record_question_asked(&env, &asker);

        events::emit_question_created(
            &env,
            events::QuestionCreated {
                question_id: id,
                asker,
                currency,
                bounty,
                deadline,
            },
        );
        Ok(id)
    }

    /// Top up an Open question's escrow by `amount` in its fixed currency.
    pub fn add_bounty(env: Env, question_id: u64, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        access::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let config = load_question_config(&env, question_id)?;
        let mut state = load_question_state(&env, question_id)?;
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }

        escrow::deposit(&env, &from, &config.currency, amount)?;
        state.bounty += amount;
        save_question_state(&env, question_id, &state);

        events::emit_bounty_added(
            &env,
            events::BountyAdded {
                question_id,
                from,
                amount,
            },
        );
        Ok(())
    }

    /// Reclaim the escrow of an Open question whose deadline has passed.
    /// Asker only; succeeds at most once.
    pub fn refund_expired(env: Env, question_id: u64) -> Result<(), Error> {
        let config = load_question_config(&env, question_id)?;
        config.asker.require_auth();

        let mut state = load_question_state(&env, question_id)?;
        if state.refunded {
            return Err(Error::AlreadyRefunded);
        }
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }
        if env.ledger().timestamp() < config.deadline {
            return Err(Error::DeadlineNotReached);
        }

        // Terminal state and zeroed escrow are persisted before the transfer.
        state.status = QuestionStatus::Expired;
        state.refunded = true;
        let amount = state.bounty;
        state.bounty = 0;
        save_question_state(&env, question_id, &state);

        escrow::payout(&env, &config.asker, &config.currency, amount)?;

        events::emit_bounty_refunded(
            &env,
            events::BountyRefunded {
                question_id,
                to: config.asker,
                amount,
            },
        );
        Ok(())
    }

    /// Cancel an Open question before any answer exists, refunding the escrow.
    /// Asker only.
    pub fn cancel_question(env: Env, question_id: u64) -> Result<(), Error> {
        let config = load_question_config(&env, question_id)?;
        config.asker.require_auth();

        let mut state = load_question_state(&env, question_id)?;
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }
        if state.answers_count > 0 {
            return Err(Error::QuestionHasAnswers);
        }

        state.status = QuestionStatus::Cancelled;
        let amount = state.bounty;
        state.bounty = 0;
        save_question_state(&env, question_id, &state);

        escrow::payout(&env, &config.asker, &config.currency, amount)?;

        if amount > 0 {
            events::emit_bounty_refunded(
                &env,
                events::BountyRefunded {
                    question_id,
                    to: config.asker.clone(),
                    amount,
                },
            );
        }
        events::emit_question_cancelled(
            &env,
            events::QuestionCancelled {
                question_id,
                asker: config.asker,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Answer lifecycle & settlement
    // ─────────────────────────────────────────────────────────

    /// Post an answer to an Open question.
    ///
    /// Any account may answer, the asker included; an Open question accepts
    /// unlimited answers. Returns the per-question answer id (1-indexed).
    pub fn post_answer(
        env: Env,
        question_id: u64,
        answerer: Address,
        content: BytesN<32>,
    ) -> Result<u32, Error> {
        answerer.require_auth();
        access::require_not_paused(&env)?;

        let mut state = load_question_state(&env, question_id)?;
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }

        state.answers_count += 1;
        let answer_id = state.answers_count;
        let answer = Answer {
            question_id,
            answer_id,
            answerer: answerer.clone(),
            content,
            created_at: env.ledger().timestamp(),
            status: AnswerStatus::Posted,
        };
        save_answer(&env, &answer);
        save_question_state(&env, question_id, &state);
        reputation::record_answer_posted(&env, &answerer);

        events::emit_answer_posted(
            &env,
            events::AnswerPosted {
                question_id,
                answer_id,
                answerer,
            },
        );
        Ok(answer_id)
    }

    /// Reject a Posted answer, removing it from acceptance eligibility.
    ///
    /// Callable by the question's asker, or by the owner. No value moves; the
    /// question stays Open and other answers remain acceptable.
    pub fn reject_answer(
        env: Env,
        caller: Address,
        question_id: u64,
        answer_id: u32,
    ) -> Result<(), Error> {
        caller.require_auth();

        let config = load_question_config(&env, question_id)?;
        let state = load_question_state(&env, question_id)?;

        if caller != config.asker {
            access::require_owner(&env, &caller)?;
        }
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }
        if answer_id == 0 || answer_id > state.answers_count {
            return Err(Error::AnswerNotFound);
        }
        let mut answer = load_answer(&env, question_id, answer_id)?;
        if answer.status != AnswerStatus::Posted {
            return Err(Error::AnswerAlreadyHandled);
        }

        answer.status = AnswerStatus::Rejected;
        save_answer(&env, &answer);

        events::emit_answer_rejected(
            &env,
            events::AnswerRejected {
                question_id,
                answer_id,
                rejected_by: caller,
            },
        );
        Ok(())
    }

    /// Accept an answer and pay out the escrowed bounty to its author.
    ///
    /// Callable by the question's asker, or by the owner as an administrative
    /// override through the identical procedure. The answer is marked
    /// Accepted, the question Resolved and the escrow zeroed before the
    /// outbound transfer is issued; a failed transfer rolls the whole
    /// invocation back, so no partial acceptance is ever observable.
    pub fn accept_answer(
        env: Env,
        caller: Address,
        question_id: u64,
        answer_id: u32,
    ) -> Result<(), Error> {
        caller.require_auth();

        let config = load_question_config(&env, question_id)?;
        let mut state = load_question_state(&env, question_id)?;

        if caller != config.asker {
            access::require_owner(&env, &caller)?;
        }
        if state.status != QuestionStatus::Open {
            return Err(Error::QuestionNotOpen);
        }
        if answer_id == 0 || answer_id > state.answers_count {
            return Err(Error::AnswerNotFound);
        }
        let mut answer = load_answer(&env, question_id, answer_id)?;
        if answer.status != AnswerStatus::Posted {
            return Err(Error::AnswerAlreadyHandled);
        }

        if let Some(registry) = storage::moderation(&env) {
            let moderation = ModerationClient::new(&env, &registry);
            if moderation.is_flagged(&answer.content) {
                return Err(Error::ContentFlagged);
            }
        }

        answer.status = AnswerStatus::Accepted;
        save_answer(&env, &answer);

        state.status = QuestionStatus::Resolved;
        state.accepted_answer_id = answer_id;
        let amount = state.bounty;
        state.bounty = 0;
        save_question_state(&env, question_id, &state);

        escrow::payout(&env, &answer.answerer, &config.currency, amount)?;

        reputation::record_answer_accepted(&env, &answer.answerer);

        events::emit_answer_accepted(
            &env,
            events::AnswerAccepted {
                question_id,
                answer_id,
                accepted_by: caller,
            },
        );
        if amount > 0 {
            events::emit_bounty_paid(
                &env,
                events::BountyPaid {
                    question_id,
                    answer_id,
                    winner: answer.answerer,
                    amount,
                },
            );
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a question by its id.
    pub fn get_question(env: Env, id: u64) -> Result<Question, Error> {
        load_question(&env, id)
    }

    /// Retrieve an answer by its composite id.
    pub fn get_answer(env: Env, question_id: u64, answer_id: u32) -> Result<Answer, Error> {
        load_answer(&env, question_id, answer_id)
    }

    /// Retrieve an account's reputation counters (zeroed if unseen).
    pub fn get_reputation(env: Env, account: Address) -> Reputation {
        reputation::get(&env, &account)
    }

    /// Return true if the circuit breaker is engaged.
    pub fn is_paused(env: Env) -> bool {
        access::is_paused(&env)
    }

    /// Return the contract owner.
    pub fn get_owner(env: Env) -> Result<Address, Error> {
        access::owner(&env)
    }
}
