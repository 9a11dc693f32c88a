//! Canonical event types emitted by the Q&A board contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/qa_board/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the board contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A question was posted (`created` topic).
    QuestionCreated,
    /// A question's escrow was topped up (`funded` topic).
    BountyAdded,
    /// An answer was posted (`answered` topic).
    AnswerPosted,
    /// An answer was accepted (`accepted` topic).
    AnswerAccepted,
    /// An answer was rejected by the asker (`rejected` topic).
    AnswerRejected,
    /// The bounty was paid to the winning answerer (`paid` topic).
    BountyPaid,
    /// The bounty was returned to the asker (`refunded` topic).
    BountyRefunded,
    /// A question was cancelled before any answer existed (`cancelled` topic).
    QuestionCancelled,
    /// The board was paused (`paused` topic).
    BoardPaused,
    /// The board was unpaused (`unpaused` topic).
    BoardUnpaused,
    /// Ownership changed hands (`owner_set` topic).
    OwnerSet,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::QuestionCreated,
            "funded" => Self::BountyAdded,
            "answered" => Self::AnswerPosted,
            "accepted" => Self::AnswerAccepted,
            "rejected" => Self::AnswerRejected,
            "paid" => Self::BountyPaid,
            "refunded" => Self::BountyRefunded,
            "cancelled" => Self::QuestionCancelled,
            "paused" => Self::BoardPaused,
            "unpaused" => Self::BoardUnpaused,
            "owner_set" => Self::OwnerSet,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuestionCreated => "question_created",
            Self::BountyAdded => "bounty_added",
            Self::AnswerPosted => "answer_posted",
            Self::AnswerAccepted => "answer_accepted",
            Self::AnswerRejected => "answer_rejected",
            Self::BountyPaid => "bounty_paid",
            Self::BountyRefunded => "bounty_refunded",
            Self::QuestionCancelled => "question_cancelled",
            Self::BoardPaused => "board_paused",
            Self::BoardUnpaused => "board_unpaused",
            Self::OwnerSet => "owner_set",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded board event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    pub event_type: String,
    pub question_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    /// Lowercased 32-byte hex, or `""` when the RPC supplied no usable hash.
    /// Never NULL in the database: the insert-idempotency key includes it.
    pub tx_hash: String,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub question_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: String,
    pub created_at: i64,
}
