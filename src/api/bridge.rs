use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ChartRegistry, FilterState, FilteredView, InteractionPayload};
use crate::core::ChartId;
use crate::data::Datasets;
use crate::error::{DashboardError, DashboardResult};
use crate::render::{FrameKind, RenderFrame, Renderer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReport {
    pub source: ChartId,
    pub target: ChartId,
    pub annotations: usize,
    pub cleared: usize,
}

/// One-way relay of an interaction into another chart's annotation layer.
///
/// Takes the filter state by shared reference only: a relay can never
/// become a filter change or trigger a redraw pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossChartBridge;

impl CrossChartBridge {
    #[allow(clippy::too_many_arguments)]
    pub fn relay<R: Renderer>(
        &self,
        source: &ChartId,
        payload: &InteractionPayload,
        target: &ChartId,
        filter: &FilterState,
        datasets: &Datasets,
        registry: &mut ChartRegistry,
        renderer: &mut R,
        pass: u64,
    ) -> DashboardResult<RelayReport> {
        registry.require_slot(source)?;
        let slot = registry.require_slot_mut(target)?;
        if !slot.rendered {
            return Err(DashboardError::InvalidSelection(format!(
                "chart `{target}` has not rendered yet"
            )));
        }

        let view = FilteredView::compute(datasets, filter);
        let annotations = match payload {
            InteractionPayload::ClearAnnotations => Vec::new(),
            InteractionPayload::SelectEvents(_) => slot.chart.accept_relay(payload, &view)?,
        };

        let mut overlays = slot.overlays.clone();
        let cleared = overlays.annotations.len();
        overlays.annotations = annotations;
        let mut frame = RenderFrame::new(
            target.clone(),
            slot.chart.viewport(),
            pass,
            FrameKind::OverlayOnly,
        );
        frame.overlays = overlays.items();
        renderer.render(&frame)?;

        let annotations = overlays.annotations.len();
        slot.overlays = overlays;
        debug!(source = %source, target = %target, annotations, cleared, "relayed annotations");
        Ok(RelayReport {
            source: source.clone(),
            target: target.clone(),
            annotations,
            cleared,
        })
    }
}
