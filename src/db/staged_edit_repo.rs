use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use super::parse_id;
use crate::error::{AbookError, AbookResult};
use crate::model::{Contact, Id};

/// How long a staged shared-address edit stays consumable. An abandoned
/// confirmation should not linger forever.
pub const STAGED_EDIT_TTL_MINUTES: i64 = 30;

/// A candidate address update awaiting the user's shared-edit decision.
/// One per session; re-staging overwrites, consuming deletes.
#[derive(Debug, Clone)]
pub struct StagedEdit {
    pub session_key: String,
    pub contact_id: Id<Contact>,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

pub fn stage(
    conn: &Connection,
    session_key: &str,
    contact_id: Id<Contact>,
    payload: &str,
) -> AbookResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO staged_edits (session_key, contact_id, payload, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            session_key,
            contact_id.to_string(),
            payload,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Consume the staged edit for a session: the row is removed whether or not
/// it is still fresh, and an expired row reads as absent.
pub fn take(conn: &Connection, session_key: &str) -> AbookResult<Option<StagedEdit>> {
    let mut stmt = conn.prepare(
        "SELECT contact_id, payload, created_at FROM staged_edits WHERE session_key = ?1",
    )?;

    let result = stmt.query_row(params![session_key], |row| {
        let contact_id: String = row.get(0)?;
        let payload: String = row.get(1)?;
        let created_at: String = row.get(2)?;
        Ok((contact_id, payload, created_at))
    });

    let (contact_id, payload, created_at) = match result {
        Ok(row) => row,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    clear(conn, session_key)?;

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| AbookError::Other(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc);

    if Utc::now() - created_at > Duration::minutes(STAGED_EDIT_TTL_MINUTES) {
        return Ok(None);
    }

    Ok(Some(StagedEdit {
        session_key: session_key.to_string(),
        contact_id: parse_id(&contact_id)?,
        payload,
        created_at,
    }))
}

pub fn clear(conn: &Connection, session_key: &str) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM staged_edits WHERE session_key = ?1",
        params![session_key],
    )?;
    Ok(())
}

/// Sweep rows past the TTL. Returns how many were removed.
pub fn clear_expired(conn: &Connection) -> AbookResult<usize> {
    let cutoff = (Utc::now() - Duration::minutes(STAGED_EDIT_TTL_MINUTES)).to_rfc3339();
    let removed = conn.execute(
        "DELETE FROM staged_edits WHERE created_at < ?1",
        params![cutoff],
    )?;
    Ok(removed)
}

/// Test hook: backdate a staged edit so expiry paths can be exercised.
#[doc(hidden)]
pub fn backdate(conn: &Connection, session_key: &str, minutes: i64) -> AbookResult<()> {
    let when = (Utc::now() - Duration::minutes(minutes)).to_rfc3339();
    conn.execute(
        "UPDATE staged_edits SET created_at = ?1 WHERE session_key = ?2",
        params![when, session_key],
    )?;
    Ok(())
}
