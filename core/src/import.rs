//! Parsing tabular base data (CSV or JSON) into base rows.
//!
//! Each row carries a hub code, a shift slot and any number of field
//! columns. Cells are interpreted as:
//!   - empty / null   → field absent
//!   - parses as f64  → number
//!   - true / false   → 1 / 0 (JSON only)
//!   - anything else  → text (surfaces as a type mismatch if a formula reads it)

use crate::{
    error::{PlanError, PlanResult},
    record::Record,
    source::BaseRow,
};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

pub const HUB_COLUMN: &str = "hub_code";
pub const SHIFT_COLUMN: &str = "shift_slots";

/// Read rows from a `.csv` or `.json` file.
pub fn read_rows(path: &Path) -> PlanResult<Vec<BaseRow>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => parse_csv(std::fs::File::open(path)?),
        Some("json") => parse_json(&std::fs::read_to_string(path)?),
        _ => Err(PlanError::InvalidInput(format!(
            "{}: expected a .csv or .json file",
            path.display()
        ))),
    }
}

pub fn parse_csv<R: Read>(reader: R) -> PlanResult<Vec<BaseRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let hub_idx = column_index(&headers, HUB_COLUMN)?;
    let shift_idx = column_index(&headers, SHIFT_COLUMN)?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let cells = result?;
        let hub = required_cell(cells.get(hub_idx), HUB_COLUMN, line)?;
        let shift = required_cell(cells.get(shift_idx), SHIFT_COLUMN, line)?;

        let mut record = Record::new();
        for (idx, (name, cell)) in headers.iter().zip(cells.iter()).enumerate() {
            if idx == hub_idx || idx == shift_idx || cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => record.set(name, v),
                Err(_) => record.set_text(name, cell),
            }
        }
        rows.push(BaseRow { hub, shift, record });
    }
    log::debug!("Parsed {} CSV rows", rows.len());
    Ok(rows)
}

/// Parse a JSON array of flat objects.
pub fn parse_json(content: &str) -> PlanResult<Vec<BaseRow>> {
    let items: Vec<serde_json::Map<String, Value>> = serde_json::from_str(content)?;
    let mut rows = Vec::with_capacity(items.len());
    for (line, mut object) in items.into_iter().enumerate() {
        let hub = identity(object.remove(HUB_COLUMN), HUB_COLUMN, line)?;
        let shift = identity(object.remove(SHIFT_COLUMN), SHIFT_COLUMN, line)?;

        let mut record = Record::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::Number(n) => match n.as_f64() {
                    Some(v) => record.set(name, v),
                    None => record.set_text(name, n.to_string()),
                },
                Value::Bool(b) => record.set(name, if b { 1.0 } else { 0.0 }),
                Value::String(s) if s.trim().is_empty() => {}
                Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(v) => record.set(name, v),
                    Err(_) => record.set_text(name, s),
                },
                Value::Array(_) | Value::Object(_) => {
                    return Err(PlanError::InvalidInput(format!(
                        "row {line}: field '{name}' is not a scalar"
                    )));
                }
            }
        }
        rows.push(BaseRow { hub, shift, record });
    }
    log::debug!("Parsed {} JSON rows", rows.len());
    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> PlanResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| PlanError::InvalidInput(format!("missing '{column}' column")))
}

fn required_cell(cell: Option<&str>, column: &str, line: usize) -> PlanResult<String> {
    match cell {
        Some(c) if !c.is_empty() => Ok(c.to_string()),
        _ => Err(PlanError::InvalidInput(format!("row {line}: empty '{column}'"))),
    }
}

fn identity(value: Option<Value>, column: &str, line: usize) -> PlanResult<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(PlanError::InvalidInput(format!("row {line}: missing '{column}'"))),
    }
}
