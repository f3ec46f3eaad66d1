use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::entities::{
    Collection, FinanceTransaction, HealthEvent, Rabbit, Record, RecordId, ReproductionEvent,
    StockItem,
};
use crate::error::{Result, StoreError};
use crate::i18n::Locale;

/// Schema version written next to every collection
pub const SCHEMA_VERSION: i64 = 1;

/// Source of "now" for creation timestamps and status derivation
pub type Clock = fn() -> DateTime<Utc>;

/// Event for audit trail: every store mutation is recorded
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: RecordId,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(event_type: &str, collection: Collection, entity_id: RecordId, data: serde_json::Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            event_type: event_type.to_string(),
            entity_type: collection.entity_type().to_string(),
            entity_id,
            data,
        }
    }
}

/// The three collections every dashboard and report reads together
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub rabbits: Vec<Rabbit>,
    pub finances: Vec<FinanceTransaction>,
    pub stocks: Vec<StockItem>,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Collections Table (one row per entity collection, whole-collection JSON)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections (
            key TEXT PRIMARY KEY,
            schema_version INTEGER NOT NULL,
            data TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id INTEGER NOT NULL,
            data TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Settings Table (plain key-value)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// STORE
// ============================================================================

/// Record store over a single SQLite file.
///
/// Each collection is read and written as a whole. There is no global
/// instance: open one, pass it by reference, close it when done.
pub struct Store {
    conn: Connection,
    clock: Clock,
}

impl Store {
    /// Open (or create) a store file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        // WAL for crash recovery of the SQLite file itself
        let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "opened store file");
        Self::from_connection(conn)
    }

    /// Store that lives only as long as this value; used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        let store = Store { conn, clock: Utc::now };
        store.initialize_collections()?;
        Ok(store)
    }

    /// Replace the clock used for timestamps and status derivation
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))?;
        debug!("store closed");
        Ok(())
    }

    /// Write an empty, versioned collection for every key not yet present
    fn initialize_collections(&self) -> Result<()> {
        for collection in Collection::ALL {
            let inserted = self.conn.execute(
                "INSERT OR IGNORE INTO collections (key, schema_version, data, updated_at)
                 VALUES (?1, ?2, '[]', ?3)",
                params![collection.key(), SCHEMA_VERSION, self.now().to_rfc3339()],
            )?;
            if inserted > 0 {
                debug!(collection = %collection, "initialized empty collection");
            }
        }
        Ok(())
    }

    /// Schema version currently recorded for a collection, if it exists
    pub fn schema_version(&self, collection: Collection) -> Result<Option<i64>> {
        let version = self
            .conn
            .query_row(
                "SELECT schema_version FROM collections WHERE key = ?1",
                [collection.key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    // ========================================================================
    // WHOLE-COLLECTION READ / WRITE
    // ========================================================================

    fn read_collection<T: Record>(&self) -> Result<Vec<T>> {
        let collection = T::COLLECTION;
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT schema_version, data FROM collections WHERE key = ?1",
                [collection.key()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((version, data)) = row else {
            return Ok(Vec::new());
        };

        if version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                collection: collection.key(),
                found: version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(serde_json::from_str(&data)?)
    }

    fn write_collection<T: Record>(&self, records: &[T]) -> Result<()> {
        let collection = T::COLLECTION;
        let data = serde_json::to_string(records)?;

        self.conn.execute(
            "INSERT INTO collections (key, schema_version, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                schema_version = excluded.schema_version,
                data = excluded.data,
                updated_at = excluded.updated_at",
            params![collection.key(), SCHEMA_VERSION, data, self.now().to_rfc3339()],
        )?;

        debug!(collection = %collection, records = records.len(), "collection written");
        Ok(())
    }

    // ========================================================================
    // GENERIC RECORD OPERATIONS
    // ========================================================================

    /// Next identifier for a collection.
    ///
    /// The audit trail remembers every id ever handed out, so ids of removed
    /// records are never reissued.
    fn next_id<T: Record>(&self, collection: Collection, records: &[T]) -> Result<RecordId> {
        let highest_logged: Option<RecordId> = self.conn.query_row(
            "SELECT MAX(entity_id) FROM events WHERE entity_type = ?1",
            [collection.entity_type()],
            |row| row.get(0),
        )?;
        let highest_stored = records.iter().map(|r| r.id()).max();

        Ok(highest_logged.max(highest_stored).unwrap_or(0) + 1)
    }

    /// All records of a collection, in insertion order
    pub fn list<T: Record>(&self) -> Result<Vec<T>> {
        self.read_collection()
    }

    pub fn find<T: Record>(&self, id: RecordId) -> Result<Option<T>> {
        Ok(self.read_collection::<T>()?.into_iter().find(|r| r.id() == id))
    }

    /// Append a new record; returns the assigned identifier.
    ///
    /// No uniqueness or foreign-key checks: dangling references are allowed.
    pub fn append<T: Record>(&self, draft: T::Draft) -> Result<RecordId> {
        let tx = self.conn.unchecked_transaction()?;
        let mut records = self.read_collection::<T>()?;
        let id = self.next_id(T::COLLECTION, &records)?;
        let now = self.now();

        let mut record = T::from_draft(id, now, draft);
        record.refresh(now);
        record.validate()?;

        let data = serde_json::to_value(&record)?;
        records.push(record);
        self.write_collection(&records)?;
        self.insert_event(&Event::new("created", T::COLLECTION, id, data, now))?;
        tx.commit()?;

        info!(collection = %T::COLLECTION, id, "record appended");
        Ok(id)
    }

    /// Overwrite the fields present in `patch`; returns the stored record
    pub fn replace<T: Record>(&self, id: RecordId, patch: T::Patch) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let mut records = self.read_collection::<T>()?;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            warn!(collection = %T::COLLECTION, id, "replace on unknown id");
            return Err(StoreError::NotFound { collection: T::COLLECTION.key(), id });
        };

        let now = self.now();
        let mut updated = records[index].clone();
        updated.apply(patch);
        updated.refresh(now);
        updated.validate()?;

        records[index] = updated.clone();
        self.write_collection(&records)?;
        self.insert_event(&Event::new("updated", T::COLLECTION, id, serde_json::to_value(&updated)?, now))?;
        tx.commit()?;

        info!(collection = %T::COLLECTION, id, "record replaced");
        Ok(updated)
    }

    fn remove<T: Record>(&self, id: RecordId) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let mut records = self.read_collection::<T>()?;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            warn!(collection = %T::COLLECTION, id, "remove on unknown id");
            return Err(StoreError::NotFound { collection: T::COLLECTION.key(), id });
        };

        let removed = records.remove(index);
        self.write_collection(&records)?;
        self.insert_event(&Event::new("deleted", T::COLLECTION, id, serde_json::to_value(&removed)?, self.now()))?;
        tx.commit()?;

        info!(collection = %T::COLLECTION, id, "record removed");
        Ok(removed)
    }

    // ========================================================================
    // TYPED ACCESSORS
    // ========================================================================

    pub fn rabbits(&self) -> Result<Vec<Rabbit>> {
        self.list()
    }

    pub fn stocks(&self) -> Result<Vec<StockItem>> {
        self.list()
    }

    pub fn finances(&self) -> Result<Vec<FinanceTransaction>> {
        self.list()
    }

    pub fn reproductions(&self) -> Result<Vec<ReproductionEvent>> {
        self.list()
    }

    pub fn health_events(&self) -> Result<Vec<HealthEvent>> {
        self.list()
    }

    /// Finance transactions are the only records that can be deleted
    pub fn remove_finance(&self, id: RecordId) -> Result<FinanceTransaction> {
        self.remove(id)
    }

    /// Read rabbits, finances and stocks; each read is independent
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            rabbits: self.rabbits()?,
            finances: self.finances()?,
            stocks: self.stocks()?,
        })
    }

    // ========================================================================
    // WEAK-REFERENCE LOOKUPS
    // ========================================================================

    /// `None` when the rabbit has no mother or the link dangles
    pub fn mother_of(&self, rabbit: &Rabbit) -> Result<Option<Rabbit>> {
        match rabbit.mother_id {
            Some(id) => self.find(id),
            None => Ok(None),
        }
    }

    pub fn father_of(&self, rabbit: &Rabbit) -> Result<Option<Rabbit>> {
        match rabbit.father_id {
            Some(id) => self.find(id),
            None => Ok(None),
        }
    }

    /// Rabbits naming `parent_id` as mother or father
    pub fn offspring_of(&self, parent_id: RecordId) -> Result<Vec<Rabbit>> {
        Ok(self
            .rabbits()?
            .into_iter()
            .filter(|r| r.is_child_of(parent_id))
            .collect())
    }

    pub fn health_events_for(&self, rabbit_id: RecordId) -> Result<Vec<HealthEvent>> {
        Ok(self
            .health_events()?
            .into_iter()
            .filter(|e| e.rabbit_id == rabbit_id)
            .collect())
    }

    /// Matings in which the rabbit took part, as either parent
    pub fn reproductions_for(&self, rabbit_id: RecordId) -> Result<Vec<ReproductionEvent>> {
        Ok(self
            .reproductions()?
            .into_iter()
            .filter(|e| e.mother_id == rabbit_id || e.father_id == rabbit_id)
            .collect())
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    /// Persisted interface language; French until set otherwise
    pub fn language(&self) -> Result<Locale> {
        let code: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = 'language'", [], |row| row.get(0))
            .optional()?;

        Ok(code.as_deref().and_then(Locale::from_code).unwrap_or_default())
    }

    pub fn set_language(&self, locale: Locale) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES ('language', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [locale.code()],
        )?;
        info!(language = locale.code(), "language changed");
        Ok(())
    }

    // ========================================================================
    // AUDIT TRAIL
    // ========================================================================

    /// Insert event into audit trail
    pub fn insert_event(&self, event: &Event) -> Result<()> {
        let data_json = serde_json::to_string(&event.data)?;

        self.conn.execute(
            "INSERT INTO events (
                event_id, timestamp, event_type, entity_type, entity_id, data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.event_id,
                event.timestamp.to_rfc3339(),
                event.event_type,
                event.entity_type,
                event.entity_id,
                data_json,
            ],
        )?;

        Ok(())
    }

    /// Events for a specific entity, newest first
    pub fn events_for(&self, collection: Collection, entity_id: RecordId) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, timestamp, event_type, entity_type, entity_id, data
             FROM events
             WHERE entity_type = ?1 AND entity_id = ?2
             ORDER BY id DESC",
        )?;

        let events = stmt
            .query_map(params![collection.entity_type(), entity_id], |row| {
                let timestamp_str: String = row.get(1)?;
                let data_json: String = row.get(5)?;

                Ok(Event {
                    event_id: row.get(0)?,
                    timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                        .map_err(|_| rusqlite::Error::InvalidQuery)?
                        .with_timezone(&Utc),
                    event_type: row.get(2)?,
                    entity_type: row.get(3)?,
                    entity_id: row.get(4)?,
                    data: serde_json::from_str(&data_json)
                        .map_err(|_| rusqlite::Error::InvalidQuery)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }
}
