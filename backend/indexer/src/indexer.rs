//! Background poll loop: Soroban `getEvents` → decode → SQLite.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{self, Cursor};
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Run the indexer until `shutdown` is cancelled.
///
/// The resume position is loaded from the database on startup, so a restarted
/// indexer picks up where the previous run stopped; a fresh database starts
/// from the configured `start_ledger`.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(
        contract = %state.config.contract_id,
        "indexer starting"
    );

    let mut cursor = match db::load_cursor(&state.pool).await {
        Ok(Some(cursor)) => cursor,
        Ok(None) => Cursor {
            ledger: state.config.start_ledger as i64,
            pagination: None,
        },
        Err(e) => {
            error!("failed to load cursor, starting from config: {e}");
            Cursor {
                ledger: state.config.start_ledger as i64,
                pagination: None,
            }
        }
    };
    info!(ledger = cursor.ledger, "resuming");

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        match poll_once(&state, &cursor, &shutdown).await {
            Ok(next) => cursor = next,
            // Shutdown mid-poll surfaces as an error from the back-off race;
            // the select below exits, so don't report it as a failure.
            Err(e) if !shutdown.is_cancelled() => error!("poll failed: {e}"),
            Err(_) => {}
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("indexer stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// One fetch-decode-store round. Returns the cursor for the next round.
async fn poll_once(
    state: &IndexerState,
    cursor: &Cursor,
    shutdown: &CancellationToken,
) -> crate::errors::Result<Cursor> {
    let page = rpc::fetch_events(
        &state.client,
        &state.config.rpc_url,
        &state.config.contract_id,
        cursor.ledger as u32,
        cursor.pagination.as_deref(),
        state.config.events_per_page,
        shutdown,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &state.config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            fetched = page.events.len(),
            stored = inserted,
            "indexed events"
        );
    }

    // With a pagination cursor the same ledger range continues next round;
    // otherwise advance to the newest ledger the RPC has seen.
    let next = Cursor {
        ledger: page
            .latest_ledger
            .map(|l| (l as i64).max(cursor.ledger))
            .unwrap_or(cursor.ledger),
        pagination: page.cursor,
    };
    db::store_cursor(&state.pool, &next).await?;
    Ok(next)
}
