use crate::error::{DashboardError, DashboardResult};
use crate::render::Renderer;

use super::{
    ChartSnapshot, Dashboard, DashboardSnapshot, DrillDownState, FilterSnapshot,
};

impl<R: Renderer> Dashboard<R> {
    /// Builds a deterministic snapshot useful for regression tests.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        let filter = FilterSnapshot {
            selected_year: self.filter.selected_year(),
            enabled_event_types: self.filter.enabled_event_types().iter().collect(),
            drill_down: self.filter.drill_down().cloned(),
            year_domain: self.filter.year_domain(),
        };
        let charts = self
            .registry
            .slots()
            .map(|(chart_id, slot)| {
                let overlays = slot.overlays();
                let snapshot = ChartSnapshot {
                    rendered: slot.is_rendered(),
                    keys: slot.last_rendered_keys().iter().cloned().collect(),
                    drill: DrillDownState::for_chart(self.filter.drill_down(), chart_id),
                    legend_items: overlays.legend.len(),
                    control_ids: overlays.controls.iter().map(|item| item.id.clone()).collect(),
                    annotation_ids: overlays
                        .annotations
                        .iter()
                        .map(|item| item.id.clone())
                        .collect(),
                    tooltip_visible: !overlays.tooltip.is_empty(),
                    transitions_in_flight: slot.ledger().in_flight(),
                };
                (chart_id.to_string(), snapshot)
            })
            .collect();
        DashboardSnapshot {
            passes: self.coordinator.passes(),
            filter,
            charts,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| DashboardError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
