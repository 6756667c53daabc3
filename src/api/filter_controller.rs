use std::iter;

use tracing::{debug, warn};

use crate::core::{ChartId, EntityKey, EventType};
use crate::error::{DashboardError, DashboardResult};
use crate::extensions::DashboardEvent;
use crate::render::Renderer;

use super::{
    ChangeTopic, ChangeTopics, Dashboard, DrillDownInput, DrillDownSelection, DrillDownState,
    FilteredView, RedrawReport, RedrawRequest,
};

impl<R: Renderer> Dashboard<R> {
    /// Selects `year` and redraws every chart that depends on it.
    ///
    /// Any drill-down is reset first. Years outside the observed domain are
    /// rejected without touching state.
    pub fn set_year(&mut self, year: i32) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        let previous = self.filter.drill_down().cloned();
        let topics = self.filter.set_year(year).inspect_err(|error| {
            warn!(year, error = %error, "rejected year selection");
        })?;
        self.apply_filter_change(topics, previous)
    }

    pub fn set_event_type_enabled(
        &mut self,
        event_type: EventType,
        enabled: bool,
    ) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        let previous = self.filter.drill_down().cloned();
        let topics = self.filter.set_event_type_enabled(event_type, enabled)?;
        self.apply_filter_change(topics, previous)
    }

    /// Toggles a category by its dataset label, e.g. `"Battles"`.
    pub fn set_event_type_label_enabled(
        &mut self,
        label: &str,
        enabled: bool,
    ) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        let previous = self.filter.drill_down().cloned();
        let topics = self
            .filter
            .set_event_type_label_enabled(label, enabled)
            .inspect_err(|error| {
                warn!(label, error = %error, "rejected event type toggle");
            })?;
        self.apply_filter_change(topics, previous)
    }

    pub fn set_all_event_types(&mut self, enabled: bool) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        let previous = self.filter.drill_down().cloned();
        let topics = self.filter.set_all_event_types(enabled)?;
        self.apply_filter_change(topics, previous)
    }

    /// Drills `chart_id` into `entity`, or back to its overview for `None`.
    ///
    /// Only the chart itself and the chart that previously held the
    /// drill-down are redrawn.
    pub fn set_drill_down(
        &mut self,
        chart_id: &ChartId,
        entity: Option<EntityKey>,
    ) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        let slot = self.registry.require_slot(chart_id)?;
        let current = DrillDownState::for_chart(self.filter.drill_down(), chart_id);
        let next = match entity {
            Some(key) => {
                let view = FilteredView::compute(&self.datasets, &self.filter);
                if !slot.chart().accepts_drill_target(&key, &view) {
                    warn!(chart = %chart_id, entity = %key, "rejected drill-down target");
                    return Err(DashboardError::InvalidSelection(format!(
                        "chart `{chart_id}` cannot drill into `{key}`"
                    )));
                }
                current.next(DrillDownInput::Select(key))
            }
            None => current.next(DrillDownInput::Back),
        };

        let previous_owner = self
            .filter
            .drill_down()
            .map(|selection| selection.chart_id.clone())
            .filter(|owner| owner != chart_id);
        let topics = if current.is_detail() || next.is_detail() {
            self.filter
                .set_drill_down(chart_id.clone(), next.entity().cloned())?
        } else {
            ChangeTopics::from_topic(ChangeTopic::DrillDown)
        };
        debug!(chart = %chart_id, drill = ?next, "drill-down state updated");

        self.emit(DashboardEvent::FilterChanged { topics });
        if next != current {
            self.emit(DashboardEvent::DrillDownChanged {
                chart_id: chart_id.clone(),
                entity: next.entity().cloned(),
            });
        }
        let displaced = previous_owner.filter(|_| next.is_detail());
        if let Some(owner) = &displaced {
            self.emit(DashboardEvent::DrillDownChanged {
                chart_id: owner.clone(),
                entity: None,
            });
        }

        let charts = iter::once(chart_id.clone()).chain(displaced);
        self.run_pass(RedrawRequest::scoped(topics, charts))
    }

    /// Explicit back action of a drilled-down chart.
    pub fn back(&mut self, chart_id: &ChartId) -> DashboardResult<RedrawReport> {
        self.registry.require_slot(chart_id)?;
        if !DrillDownState::for_chart(self.filter.drill_down(), chart_id).is_detail() {
            return Err(DashboardError::InvalidSelection(format!(
                "chart `{chart_id}` is not drilled down"
            )));
        }
        self.set_drill_down(chart_id, None)
    }

    fn apply_filter_change(
        &mut self,
        topics: ChangeTopics,
        previous_drill: Option<DrillDownSelection>,
    ) -> DashboardResult<RedrawReport> {
        debug!(
            year = self.filter.selected_year(),
            event_types = self.filter.enabled_event_types().len(),
            "filter changed"
        );
        self.emit(DashboardEvent::FilterChanged { topics });
        if topics.contains_topic(ChangeTopic::DrillDown)
            && let Some(previous) = previous_drill
        {
            self.emit(DashboardEvent::DrillDownChanged {
                chart_id: previous.chart_id,
                entity: None,
            });
        }
        self.run_pass(RedrawRequest::topics(topics))
    }
}
