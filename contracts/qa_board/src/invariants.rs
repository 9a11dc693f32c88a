#![allow(dead_code)]

extern crate std;

use crate::types::{Question, QuestionStatus};

/// INV-1: Escrowed bounty must never be negative.
pub fn assert_bounty_non_negative(question: &Question) {
    assert!(
        question.bounty >= 0,
        "INV-1 violated: question {} has negative bounty ({})",
        question.id,
        question.bounty
    );
}

/// INV-2: A question in a terminal state holds no escrow.
pub fn assert_terminal_has_zero_bounty(question: &Question) {
    if question.status != QuestionStatus::Open {
        assert_eq!(
            question.bounty, 0,
            "INV-2 violated: question {} is terminal ({:?}) with bounty {}",
            question.id, question.status, question.bounty
        );
    }
}

/// INV-3: Status transition validity. Only forward transitions out of Open
/// are allowed:
///   Open ─► Resolved | Cancelled | Expired
///   Resolved / Cancelled / Expired ─► (none)
pub fn assert_valid_status_transition(from: &QuestionStatus, to: &QuestionStatus) {
    let valid = matches!(
        (from, to),
        (QuestionStatus::Open, QuestionStatus::Resolved)
            | (QuestionStatus::Open, QuestionStatus::Cancelled)
            | (QuestionStatus::Open, QuestionStatus::Expired)
    );

    assert!(
        valid,
        "INV-3 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-4: `accepted_answer_id` is 0 unless the question is Resolved, and when
/// set it refers to an allocated answer id.
pub fn assert_accepted_id_consistent(question: &Question) {
    match question.status {
        QuestionStatus::Resolved => {
            assert!(
                question.accepted_answer_id >= 1
                    && question.accepted_answer_id <= question.answers_count,
                "INV-4 violated: question {} resolved with accepted id {} of {}",
                question.id,
                question.accepted_answer_id,
                question.answers_count
            );
        }
        _ => {
            assert_eq!(
                question.accepted_answer_id, 0,
                "INV-4 violated: question {} is {:?} but has accepted id {}",
                question.id, question.status, question.accepted_answer_id
            );
        }
    }
}

/// INV-5: `refunded` implies the Expired terminal state.
pub fn assert_refunded_implies_expired(question: &Question) {
    if question.refunded {
        assert_eq!(
            question.status,
            QuestionStatus::Expired,
            "INV-5 violated: question {} refunded but status is {:?}",
            question.id,
            question.status
        );
    }
}

/// INV-6: `answers_count` never decreases.
pub fn assert_answers_count_monotonic(count_before: u32, count_after: u32) {
    assert!(
        count_after >= count_before,
        "INV-6 violated: answers_count decreased from {} to {}",
        count_before,
        count_after
    );
}

/// INV-7: Question config immutability — fields fixed at submission (asker,
/// currency, content, created_at, deadline) remain unchanged.
pub fn assert_question_immutable_fields(original: &Question, current: &Question) {
    assert_eq!(original.id, current.id, "INV-7 violated: question id changed");
    assert_eq!(
        original.asker, current.asker,
        "INV-7 violated: question asker changed"
    );
    assert_eq!(
        original.currency, current.currency,
        "INV-7 violated: question currency changed"
    );
    assert_eq!(
        original.content, current.content,
        "INV-7 violated: question content changed"
    );
    assert_eq!(
        original.created_at, current.created_at,
        "INV-7 violated: question created_at changed"
    );
    assert_eq!(
        original.deadline, current.deadline,
        "INV-7 violated: question deadline changed"
    );
}

/// INV-8: Value conservation — everything deposited is accounted for by
/// payouts, refunds and the escrow still held.
pub fn assert_value_conservation(deposits: i128, payouts: i128, refunds: i128, escrowed: i128) {
    assert_eq!(
        deposits,
        payouts + refunds + escrowed,
        "INV-8 violated: {} deposited != {} paid + {} refunded + {} escrowed",
        deposits,
        payouts,
        refunds,
        escrowed
    );
}

/// Run all stateless question invariants.
pub fn assert_all_question_invariants(question: &Question) {
    assert_bounty_non_negative(question);
    assert_terminal_has_zero_bounty(question);
    assert_accepted_id_consistent(question);
    assert_refunded_implies_expired(question);
}
