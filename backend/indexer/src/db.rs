//! SQLite persistence: event storage, resume cursor, and read queries
//! backing the REST API.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{BoardEvent, EventRecord};

/// Resume position of the indexer. `pagination` carries the opaque
/// `getEvents` cursor when a ledger range spans more than one page.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub ledger: i64,
    pub pagination: Option<String>,
}

/// Open the connection pool and bring the schema up to date.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {url}");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────

/// Load the persisted resume position, if any run has stored one.
pub async fn load_cursor(pool: &SqlitePool) -> Result<Option<Cursor>> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(ledger, pagination)| Cursor { ledger, pagination }))
}

/// Persist the resume position, creating the row on first use.
pub async fn store_cursor(pool: &SqlitePool, cursor: &Cursor) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor)
        VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET last_ledger = ?1, last_cursor = ?2
        "#,
    )
    .bind(cursor.ledger)
    .bind(&cursor.pagination)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Writes
// ─────────────────────────────────────────────────────────

/// Store a batch of decoded events inside one transaction.
///
/// The `(ledger, tx_hash, event_type, question_id)` uniqueness key makes
/// re-polling an already-indexed ledger range a no-op, so the poll loop never
/// has to track exactly-once delivery itself. Returns the number of rows that
/// were actually new.
pub async fn insert_events(pool: &SqlitePool, events: &[BoardEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for ev in events {
        let outcome = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_type, question_id, actor, amount, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ev.event_type)
        .bind(&ev.question_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?;

        inserted += outcome.rows_affected() as usize;
    }

    tx.commit().await?;
    Ok(inserted)
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

const EVENT_COLUMNS: &str = "id, event_type, question_id, actor, amount, ledger, timestamp, \
                             contract_id, tx_hash, created_at";

/// Every indexed event for one question, in ledger order.
pub async fn events_for_question(pool: &SqlitePool, question_id: &str) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE question_id = ?1 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(question_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every indexed event, in ledger order.
pub async fn all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Per-event-type counts for one question, used by the summary endpoint.
pub async fn event_counts_for_question(
    pool: &SqlitePool,
    question_id: &str,
) -> Result<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT event_type, COUNT(*)
        FROM   events
        WHERE  question_id = ?1
        GROUP  BY event_type
        "#,
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sum of all `bounty_paid` amounts recorded for one question.
///
/// Amounts are stored as decimal strings; SQLite integer arithmetic is enough
/// here because a question settles through at most one payout.
pub async fn total_paid_for_question(pool: &SqlitePool, question_id: &str) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(CAST(amount AS INTEGER)), 0)
        FROM   events
        WHERE  question_id = ?1 AND event_type = 'bounty_paid'
        "#,
    )
    .bind(question_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
