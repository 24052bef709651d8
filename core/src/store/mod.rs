//! SQLite persistence layer for base records.
//!
//! RULE: Only store/ talks to the database.
//! RULE: Only base inputs are stored. Derived records are never persisted.

use crate::{
    error::PlanResult,
    record::{FieldValue, Record},
    source::RecordSource,
    types::{HubCode, ShiftSlot},
};
use rusqlite::{params, types::ValueRef, Connection, OptionalExtension};

mod import_batch;

pub use import_batch::ImportBatch;

pub struct HubStore {
    conn: Connection,
}

impl HubStore {
    /// Open (or create) the hub database at `path`.
    pub fn open(path: &str) -> PlanResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests and demo runs).
    pub fn in_memory() -> PlanResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PlanResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_hub_records.sql"))?;
        Ok(())
    }

    // ── Hub rows ───────────────────────────────────────────────

    pub fn row_count(&self) -> PlanResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM hub_row", [], |row| row.get(0))?;
        Ok(count)
    }

    fn first_row_id(&self, hub: &str, shift: &str) -> PlanResult<Option<i64>> {
        let row_id = self
            .conn
            .query_row(
                "SELECT MIN(row_id) FROM hub_row WHERE hub_code = ?1 AND shift_slot = ?2",
                params![hub, shift],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();
        Ok(row_id)
    }

    fn first_hub_row_id(&self, hub: &str) -> PlanResult<Option<i64>> {
        let row_id = self
            .conn
            .query_row(
                "SELECT MIN(row_id) FROM hub_row WHERE hub_code = ?1",
                params![hub],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();
        Ok(row_id)
    }

    fn load_record(&self, row_id: i64) -> PlanResult<Record> {
        let mut stmt = self
            .conn
            .prepare("SELECT field, value FROM hub_field WHERE row_id = ?1 ORDER BY field")?;
        let fields = stmt
            .query_map(params![row_id], |row| {
                let name: String = row.get(0)?;
                let value = match row.get_ref(1)? {
                    ValueRef::Real(v) => Some(FieldValue::Number(v)),
                    ValueRef::Integer(v) => Some(FieldValue::Number(v as f64)),
                    ValueRef::Text(t) | ValueRef::Blob(t) => {
                        Some(FieldValue::Text(String::from_utf8_lossy(t).into_owned()))
                    }
                    ValueRef::Null => None,
                };
                Ok((name, value))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut record = Record::new();
        for (name, value) in fields {
            if let Some(value) = value {
                record.set(name, value);
            }
        }
        Ok(record)
    }
}

impl RecordSource for HubStore {
    fn hubs(&self) -> PlanResult<Vec<HubCode>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT hub_code FROM hub_row ORDER BY hub_code ASC")?;
        let hubs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(hubs)
    }

    fn shifts(&self, hub: &str) -> PlanResult<Vec<ShiftSlot>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT shift_slot FROM hub_row WHERE hub_code = ?1 ORDER BY shift_slot ASC",
        )?;
        let shifts = stmt
            .query_map(params![hub], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(shifts)
    }

    fn base_record(&self, hub: &str, shift: &str) -> PlanResult<Option<Record>> {
        match self.first_row_id(hub, shift)? {
            Some(row_id) => Ok(Some(self.load_record(row_id)?)),
            None => Ok(None),
        }
    }

    fn first_record(&self, hub: &str) -> PlanResult<Option<Record>> {
        match self.first_hub_row_id(hub)? {
            Some(row_id) => Ok(Some(self.load_record(row_id)?)),
            None => Ok(None),
        }
    }
}
