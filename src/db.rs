//! The saved branch selection, kept in SQLite so checkout can pick it up later.
//!
//! Nothing in the resolver or ranker writes here; the app calls
//! [`SelectionStore::save`] when the user settles on a branch.

use crate::models::{Salon, Suburb};
use chrono::{DateTime, Utc};
use color_eyre::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SavedSelection {
    pub salon: Salon,
    /// Distance from the user or suburb when the branch was picked by proximity.
    pub distance_km: Option<u32>,
    pub suburb: Option<Suburb>,
    pub saved_at: DateTime<Utc>,
}

pub struct SelectionStore {
    conn: Connection,
}

impl SelectionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS selection (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                salon_json TEXT NOT NULL,
                distance_km INTEGER,
                suburb_json TEXT,
                saved_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Replaces whatever selection was saved before.
    pub fn save(
        &self,
        salon: &Salon,
        distance_km: Option<u32>,
        suburb: Option<&Suburb>,
    ) -> Result<SavedSelection> {
        let saved_at = Utc::now();
        let salon_json = serde_json::to_string(salon)?;
        let suburb_json = suburb.map(serde_json::to_string).transpose()?;

        self.conn.execute(
            "INSERT OR REPLACE INTO selection (slot, salon_json, distance_km, suburb_json, saved_at)
             VALUES (0, ?1, ?2, ?3, ?4)",
            params![salon_json, distance_km, suburb_json, saved_at.to_rfc3339()],
        )?;
        info!(salon_id = ?salon.id(), "Saved branch selection");

        Ok(SavedSelection {
            salon: salon.clone(),
            distance_km,
            suburb: suburb.cloned(),
            saved_at,
        })
    }

    /// Returns the saved selection. A row that no longer parses is treated as absent.
    pub fn load(&self) -> Result<Option<SavedSelection>> {
        let row = self
            .conn
            .query_row(
                "SELECT salon_json, distance_km, suburb_json, saved_at FROM selection WHERE slot = 0",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<u32>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((salon_json, distance_km, suburb_json, saved_at)) = row else {
            return Ok(None);
        };

        let parsed = (|| -> Result<SavedSelection> {
            Ok(SavedSelection {
                salon: serde_json::from_str(&salon_json)?,
                distance_km,
                suburb: suburb_json.as_deref().map(serde_json::from_str::<Suburb>).transpose()?,
                saved_at: DateTime::parse_from_rfc3339(&saved_at)?.with_timezone(&Utc),
            })
        })();

        match parsed {
            Ok(selection) => Ok(Some(selection)),
            Err(e) => {
                warn!("Ignoring unreadable saved selection: {}", e);
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM selection", [])?;
        info!("Cleared branch selection");
        Ok(())
    }
}
