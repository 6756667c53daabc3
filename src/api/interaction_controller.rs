use tracing::{debug, warn};

use crate::core::{ChartId, EntityKey};
use crate::error::{DashboardError, DashboardResult};
use crate::extensions::DashboardEvent;
use crate::interaction::{HoverTarget, tooltip_overlay};
use crate::render::{FrameKind, OverlayItem, RenderFrame, Renderer};

use super::{
    ChangeTopic, ChangeTopics, ClickAction, Dashboard, DrillDownState, FilteredView,
    InteractionPayload, RedrawReport, RedrawRequest, RelayReport, ViewCommand,
};

/// What a click ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    DrillChanged(RedrawReport),
    Relayed(RelayReport),
    ViewChanged(RedrawReport),
}

impl<R: Renderer> Dashboard<R> {
    /// Routes a click on a rendered element or control to the chart.
    pub fn click(&mut self, chart_id: &ChartId, key: &EntityKey) -> DashboardResult<ClickOutcome> {
        self.ensure_idle()?;
        let action = {
            let slot = self.registry.require_slot(chart_id)?;
            if !slot.last_rendered_keys().contains(key) && !slot.overlays().has_control(key.as_str())
            {
                return Err(not_rendered(chart_id, key));
            }
            let view = FilteredView::compute(&self.datasets, &self.filter);
            let drill = DrillDownState::for_chart(self.filter.drill_down(), chart_id);
            slot.chart().on_click(key, &view, &drill)
        };
        debug!(chart = %chart_id, key = %key, action = ?action, "click routed");

        match action {
            ClickAction::None => Ok(ClickOutcome::Ignored),
            ClickAction::DrillDown(entity) => self
                .set_drill_down(chart_id, Some(entity))
                .map(ClickOutcome::DrillChanged),
            ClickAction::DrillUp => self.back(chart_id).map(ClickOutcome::DrillChanged),
            ClickAction::Relay { target, payload } => self
                .relay(chart_id, &payload, &target)
                .map(ClickOutcome::Relayed),
            ClickAction::AdjustView(command) => Ok(self
                .adjust_view(chart_id, command)?
                .map_or(ClickOutcome::Ignored, ClickOutcome::ViewChanged)),
        }
    }

    /// Applies a view command to one chart and redraws only that chart.
    ///
    /// Returns `None` without a pass when the command leaves the view as it
    /// was, such as zooming in at the scale limit.
    pub fn adjust_view(
        &mut self,
        chart_id: &ChartId,
        command: ViewCommand,
    ) -> DashboardResult<Option<RedrawReport>> {
        self.ensure_idle()?;
        let slot = self.registry.require_slot_mut(chart_id)?;
        if !slot.chart.apply_view(command) {
            debug!(chart = %chart_id, command = ?command, "view unchanged");
            return Ok(None);
        }
        let topics = ChangeTopics::from_topic(ChangeTopic::View);
        self.run_pass(RedrawRequest::scoped(topics, [chart_id.clone()]))
            .map(Some)
    }

    /// Replaces `target`'s annotations with what `payload` asks for.
    ///
    /// Never changes the filter state and never starts a redraw pass.
    pub fn relay(
        &mut self,
        source: &ChartId,
        payload: &InteractionPayload,
        target: &ChartId,
    ) -> DashboardResult<RelayReport> {
        self.ensure_idle()?;
        let report = self
            .bridge
            .relay(
                source,
                payload,
                target,
                &self.filter,
                &self.datasets,
                &mut self.registry,
                &mut self.renderer,
                self.coordinator.passes(),
            )
            .inspect_err(|error| {
                warn!(source = %source, target = %target, error = %error, "relay failed");
            })?;
        self.emit(DashboardEvent::AnnotationsRelayed {
            source: report.source.clone(),
            target: report.target.clone(),
            annotations: report.annotations,
        });
        Ok(report)
    }

    /// Shows the tooltip of a rendered element at pointer `(x, y)`.
    ///
    /// Returns `false` when the chart has nothing to say about the element.
    /// Moving to another chart tears the previous chart's tooltip down.
    pub fn hover(
        &mut self,
        chart_id: &ChartId,
        key: &EntityKey,
        x: f64,
        y: f64,
    ) -> DashboardResult<bool> {
        self.ensure_idle()?;
        let (text, viewport) = {
            let slot = self.registry.require_slot(chart_id)?;
            if !slot.last_rendered_keys().contains(key) {
                return Err(not_rendered(chart_id, key));
            }
            let view = FilteredView::compute(&self.datasets, &self.filter);
            let drill = DrillDownState::for_chart(self.filter.drill_down(), chart_id);
            (
                slot.chart().describe(key, &view, &drill),
                slot.chart().viewport(),
            )
        };

        let target = HoverTarget {
            chart_id: chart_id.clone(),
            key: key.clone(),
        };
        if let Some(previous) = self.hover.on_hover(target, x, y) {
            self.set_tooltip(&previous.chart_id, Vec::new())?;
        }
        let items = text
            .map(|text| tooltip_overlay(&text, (x, y), viewport, self.tooltip_style))
            .unwrap_or_default();
        let shown = !items.is_empty();
        self.set_tooltip(chart_id, items)?;
        Ok(shown)
    }

    /// Hides whatever tooltip is visible.
    pub fn pointer_leave(&mut self) -> DashboardResult<()> {
        self.ensure_idle()?;
        if let Some(previous) = self.hover.on_pointer_leave() {
            self.set_tooltip(&previous.chart_id, Vec::new())?;
        }
        Ok(())
    }

    /// Steps every chart's transitions forward; returns how many finished
    /// during this step.
    pub fn advance_time(&mut self, elapsed_ms: f64) -> usize {
        self.registry
            .slots_mut()
            .map(|(_, slot)| slot.ledger.advance(elapsed_ms))
            .sum()
    }

    fn set_tooltip(
        &mut self,
        chart_id: &ChartId,
        items: Vec<OverlayItem>,
    ) -> DashboardResult<()> {
        let pass = self.coordinator.passes();
        let slot = self.registry.require_slot_mut(chart_id)?;
        if !slot.rendered || (items.is_empty() && slot.overlays.tooltip.is_empty()) {
            return Ok(());
        }
        let mut overlays = slot.overlays.clone();
        overlays.tooltip = items;
        let mut frame = RenderFrame::new(
            chart_id.clone(),
            slot.chart.viewport(),
            pass,
            FrameKind::OverlayOnly,
        );
        frame.overlays = overlays.items();
        self.renderer.render(&frame)?;
        slot.overlays = overlays;
        Ok(())
    }
}

fn not_rendered(chart_id: &ChartId, key: &EntityKey) -> DashboardError {
    DashboardError::InvalidSelection(format!("`{key}` is not rendered in chart `{chart_id}`"))
}
