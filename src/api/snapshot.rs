use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::{DrillDownSelection, DrillDownState};
use crate::core::{EntityKey, EventType, YearRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub selected_year: i32,
    pub enabled_event_types: Vec<EventType>,
    pub drill_down: Option<DrillDownSelection>,
    pub year_domain: YearRange,
}

/// What one chart currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub rendered: bool,
    pub keys: Vec<EntityKey>,
    pub drill: DrillDownState,
    pub legend_items: usize,
    pub control_ids: Vec<String>,
    pub annotation_ids: Vec<String>,
    pub tooltip_visible: bool,
    pub transitions_in_flight: usize,
}

/// Deterministic dashboard state used by regression fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub passes: u64,
    pub filter: FilterSnapshot,
    /// Keyed by chart id, in registration order.
    pub charts: IndexMap<String, ChartSnapshot>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn chart(&self, chart_id: &str) -> Option<&ChartSnapshot> {
        self.charts.get(chart_id)
    }
}
