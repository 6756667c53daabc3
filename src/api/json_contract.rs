use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

use super::DashboardSnapshot;

pub const DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: DashboardSnapshot,
}

impl DashboardSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> DashboardResult<String> {
        let payload = DashboardSnapshotJsonContractV1 {
            schema_version: DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DashboardError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> DashboardResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<DashboardSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: DashboardSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DashboardError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(DashboardError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
