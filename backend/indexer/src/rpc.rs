//! Soroban JSON-RPC client for `getEvents`, plus the event decoder.
//!
//! Transient failures (network errors, rate limiting, soft RPC errors) are
//! retried with exponential back-off up to [`MAX_BACKOFF_SECS`]; malformed
//! requests (-32600) and unknown methods (-32601) fail hard since retrying
//! them can never succeed.

use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{BoardEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// XDR ScValType discriminants for the topic encodings the board emits.
const SCV_U64: u32 = 5;
const SCV_SYMBOL: u32 = 15;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<EventsResult>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// One page of the `getEvents` response.
#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// Topic list; entries are either XDR base64 or pre-decoded JSON.
    pub topic: Vec<String>,
    /// Event data, decoded to JSON by the RPC.
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Fetch
// ─────────────────────────────────────────────────────────

/// Fetch one page of events, retrying transient failures.
///
/// The back-off sleep races against `shutdown`, so an unreachable endpoint
/// never wedges the poll loop past a shutdown request.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
    shutdown: &CancellationToken,
) -> Result<EventsResult> {
    let params = build_params(contract_id, start_ledger, cursor, limit);
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        match request_events(client, rpc_url, &params).await {
            Ok(page) => {
                debug!(
                    fetched = page.events.len(),
                    latest_ledger = ?page.latest_ledger,
                    "getEvents page"
                );
                return Ok(page);
            }
            Err(e @ IndexerError::Rpc(_)) => return Err(e),
            Err(e) => {
                warn!("getEvents failed, retrying in {backoff}s: {e}");
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        return Err(IndexerError::Transient(
                            "shutdown requested during back-off".to_string(),
                        ));
                    }
                    _ = tokio::time::sleep(Duration::from_secs(backoff)) => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
            }
        }
    }
}

/// One `getEvents` round-trip. Soft RPC errors surface as [`IndexerError::Http`]
/// equivalents the caller retries; hard protocol errors become
/// [`IndexerError::Rpc`].
async fn request_events(client: &Client, rpc_url: &str, params: &Value) -> Result<EventsResult> {
    let resp = client
        .post(rpc_url)
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getEvents",
            "params": params,
        }))
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(IndexerError::Transient("rate limited".to_string()));
    }

    let body: RpcResponse = resp.json().await?;
    if let Some(err) = body.error {
        if err.code == -32600 || err.code == -32601 {
            return Err(IndexerError::Rpc(format!(
                "hard error {}: {}",
                err.code, err.message
            )));
        }
        return Err(IndexerError::Transient(format!(
            "soft error {}: {}",
            err.code, err.message
        )));
    }
    body.result
        .ok_or_else(|| IndexerError::Rpc("empty result from getEvents".to_string()))
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    // A ledger of 0 means "no configured start": omit startLedger entirely so
    // the RPC begins at the oldest ledger it retains, instead of rejecting a
    // sequence outside the retention window.
    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else if start_ledger > 0 {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Decode
// ─────────────────────────────────────────────────────────

/// Decode a page of raw RPC events into [`BoardEvent`] rows.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<BoardEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<BoardEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&decode_topic_symbol(first_topic)?);

    // Lifecycle topics carry the question id as the second topic entry;
    // board-level topics (paused/unpaused/owner_set) have none.
    let question_id = raw.topic.get(1).map(|t| decode_topic_u64(t));
    let (actor, amount) = decode_data(&raw.value, &kind);

    Some(BoardEvent {
        event_type: kind.as_str().to_string(),
        question_id,
        actor,
        amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_iso_to_unix)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: normalize_tx_hash(raw.tx_hash.as_deref()),
    })
}

/// Pull the actor and amount out of the JSON-decoded event payload.
fn decode_data(value: &Value, kind: &EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::QuestionCreated => (
            extract_field(value, &["asker", "address"]),
            extract_field(value, &["bounty"]),
        ),
        EventKind::BountyAdded => (
            extract_field(value, &["from", "address"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::AnswerPosted => (extract_field(value, &["answerer", "address"]), None),
        EventKind::AnswerAccepted => (extract_field(value, &["accepted_by", "address"]), None),
        EventKind::AnswerRejected => (extract_field(value, &["rejected_by", "address"]), None),
        EventKind::BountyPaid => (
            extract_field(value, &["winner", "address"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::BountyRefunded => (
            extract_field(value, &["to", "address"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::QuestionCancelled => (extract_field(value, &["asker", "address"]), None),
        // For pause events the payload is the caller address itself.
        EventKind::BoardPaused | EventKind::BoardUnpaused => (
            value
                .as_str()
                .map(String::from)
                .or_else(|| extract_field(value, &["address", "caller"])),
            None,
        ),
        EventKind::OwnerSet => (extract_field(value, &["new", "address"]), None),
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Decode a topic entry into its symbol string.
///
/// Depending on the RPC's `xdrFormat`, the entry is either a JSON object like
/// `{"type":"symbol","value":"created"}`, raw XDR base64, or a bare string.
fn decode_topic_symbol(raw: &str) -> Option<String> {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return Some(s.to_string());
        }
    }
    if let Some(sym) = symbol_from_xdr(raw) {
        return Some(sym);
    }
    Some(raw.to_string())
}

/// Decode a topic entry into a decimal question-id string.
fn decode_topic_u64(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(n) = v.get("value").and_then(|x| x.as_u64()) {
            return n.to_string();
        }
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    if let Some(n) = u64_from_xdr(raw) {
        return n.to_string();
    }
    raw.to_string()
}

/// Decode a base64 `ScVal` symbol: 4-byte type tag, 4-byte length, bytes.
fn symbol_from_xdr(raw: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(raw).ok()?;
    if bytes.len() < 8 || u32::from_be_bytes(bytes[0..4].try_into().ok()?) != SCV_SYMBOL {
        return None;
    }
    let len = u32::from_be_bytes(bytes[4..8].try_into().ok()?) as usize;
    let body = bytes.get(8..8 + len)?;
    String::from_utf8(body.to_vec()).ok()
}

/// Decode a base64 `ScVal` u64: 4-byte type tag, 8-byte big-endian value.
fn u64_from_xdr(raw: &str) -> Option<u64> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(raw).ok()?;
    if bytes.len() != 12 || u32::from_be_bytes(bytes[0..4].try_into().ok()?) != SCV_U64 {
        return None;
    }
    Some(u64::from_be_bytes(bytes[4..12].try_into().ok()?))
}

/// Normalize a transaction hash to lowercased 32-byte hex, or `""` when the
/// RPC supplied none or a malformed value. The empty string (never NULL)
/// keeps the hash usable inside the database's insert-idempotency key.
fn normalize_tx_hash(raw: Option<&str>) -> String {
    raw.and_then(|h| hex::decode(h).ok())
        .filter(|bytes| bytes.len() == 32)
        .map(hex::encode)
        .unwrap_or_default()
}

/// Parse an ISO-8601 close time into Unix seconds.
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
