//! Process-wide, read-only planning configuration.
//!
//! Loaded once at start-up from `{data_dir}/staffing/plan_config.json`.
//! Every key is optional; omitted keys keep the built-in values. In tests,
//! use `PlanConfig::default()`.

use crate::{
    error::{PlanError, PlanResult},
    fields,
};
use serde::{Deserialize, Serialize};

/// Operational constants used by the standard formula registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConstants {
    /// Working days per month; monthly volumes are divided by this.
    pub working_days: f64,
    pub docs_per_packet: f64,
    pub packets_per_bag: f64,
    pub ndx_volume_per_bag: f64,
    pub ndx_weight_per_bag: f64,
    pub air_shipments_per_bag: f64,
    pub seconds_per_hour: f64,
    pub cd_seconds_per_bag: f64,
    pub sorter_seconds_per_shipment: f64,
    pub sorter_utilisation: f64,
    pub non_conveyable_share: f64,
    pub non_conveyable_handling_factor: f64,
    pub manual_sort_seconds_per_shipment: f64,
    pub xray_seconds_per_bag: f64,
    pub air_seconds_per_bag: f64,
    pub surface_seconds_per_bag: f64,
    pub doc_handling_share: f64,
    pub doc_seconds_per_shipment: f64,
    pub exception_rate: f64,
    pub exception_seconds: f64,
    /// Skidder workload as a share of all other process units.
    pub skidder_share: f64,
    pub total_buffer: f64,
    /// Buffer applied before dividing a unit by the productivity constant.
    pub manpower_buffer: f64,
}

impl Default for WorkloadConstants {
    fn default() -> Self {
        Self {
            working_days: 25.0,
            docs_per_packet: 15.0,
            packets_per_bag: 15.0,
            ndx_volume_per_bag: 13.0,
            ndx_weight_per_bag: 25.0,
            air_shipments_per_bag: 12.0,
            seconds_per_hour: 3600.0,
            cd_seconds_per_bag: 35.0,
            sorter_seconds_per_shipment: 20.16,
            sorter_utilisation: 0.55,
            non_conveyable_share: 0.3,
            non_conveyable_handling_factor: 1.5,
            manual_sort_seconds_per_shipment: 31.1,
            xray_seconds_per_bag: 15.0,
            air_seconds_per_bag: 38.0,
            surface_seconds_per_bag: 38.0,
            doc_handling_share: 0.6,
            doc_seconds_per_shipment: 10.02222222,
            exception_rate: 0.05,
            exception_seconds: 30.0,
            skidder_share: 0.1,
            total_buffer: 1.2,
            manpower_buffer: 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Fields supplied by the record source and never computed.
    pub base_fields: Vec<String>,
    /// Advisory only: pairs an operator should edit together.
    pub correlated_pairs: Vec<(String, String)>,
    pub constants: WorkloadConstants,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            base_fields: fields::BASE_INPUT_FIELDS.iter().map(|f| f.to_string()).collect(),
            correlated_pairs: fields::CORRELATED_PAIRS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            constants: WorkloadConstants::default(),
        }
    }
}

impl PlanConfig {
    /// Load from the data/ directory.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/staffing/plan_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!(
            "Loaded plan config from {path} ({} base fields, {} correlated pairs)",
            config.base_fields.len(),
            config.correlated_pairs.len()
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn is_base_field(&self, field: &str) -> bool {
        self.base_fields.iter().any(|f| f == field)
    }

    pub fn require_base_field(&self, field: &str) -> PlanResult<()> {
        if self.is_base_field(field) {
            Ok(())
        } else {
            Err(PlanError::UnknownField { field: field.to_string() })
        }
    }
}
