use super::HubStore;
use crate::{
    error::PlanResult,
    record::FieldValue,
    source::BaseRow,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Value};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub source: String,
    pub imported_at: DateTime<Utc>,
    pub row_count: i64,
}

impl HubStore {
    // ── Import batches ─────────────────────────────────────────

    /// Store `rows` as one batch, atomically. Rows keep their delivery
    /// order, so earlier rows win when a (hub, shift) repeats.
    pub fn import_rows(&self, source: &str, rows: &[BaseRow]) -> PlanResult<ImportBatch> {
        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            source: source.to_string(),
            imported_at: Utc::now(),
            row_count: rows.len() as i64,
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO import_batch (batch_id, source, imported_at, row_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![batch.batch_id, batch.source, batch.imported_at.to_rfc3339(), batch.row_count],
        )?;
        for row in rows {
            tx.execute(
                "INSERT INTO hub_row (batch_id, hub_code, shift_slot) VALUES (?1, ?2, ?3)",
                params![batch.batch_id, row.hub, row.shift],
            )?;
            let row_id = tx.last_insert_rowid();
            for (name, value) in row.record.iter() {
                let stored = match value {
                    FieldValue::Number(v) if v.is_nan() => Value::Null,
                    FieldValue::Number(v) => Value::Real(*v),
                    FieldValue::Text(s) => Value::Text(s.clone()),
                    FieldValue::Failed(_) => {
                        log::warn!(
                            "Not storing failed field '{name}' for {}/{}",
                            row.hub,
                            row.shift
                        );
                        continue;
                    }
                };
                tx.execute(
                    "INSERT INTO hub_field (row_id, field, value) VALUES (?1, ?2, ?3)",
                    params![row_id, name, stored],
                )?;
            }
        }
        tx.commit()?;

        log::info!(
            "Imported {} rows from {} (batch {})",
            batch.row_count,
            batch.source,
            batch.batch_id
        );
        Ok(batch)
    }

    pub fn batches(&self) -> PlanResult<Vec<ImportBatch>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_id, source, imported_at, row_count
             FROM import_batch ORDER BY imported_at ASC, batch_id ASC",
        )?;
        let batches = stmt
            .query_map([], |row| {
                let imported_at: String = row.get(2)?;
                let imported_at = DateTime::parse_from_rfc3339(&imported_at)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .with_timezone(&Utc);
                Ok(ImportBatch {
                    batch_id: row.get(0)?,
                    source: row.get(1)?,
                    imported_at,
                    row_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batches)
    }
}
