use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::api::{
    ChangeTopics, ChartOverlays, ChartRegistry, ChartScene, ChartSlot, DiffCounts,
    DrillDownState, FilterState, FilteredView, KeyIdentity, TransitionTiming, diff_keys,
    rebuild_keys,
};
use crate::core::ChartId;
use crate::data::Datasets;
use crate::error::{DashboardError, DashboardResult};
use crate::render::{FrameKind, RenderFrame, Renderer};

/// Which charts a pass may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pub topics: ChangeTopics,
    /// When set, only these charts are considered.
    pub only: Option<SmallVec<[ChartId; 2]>>,
}

impl RedrawRequest {
    #[must_use]
    pub fn topics(topics: ChangeTopics) -> Self {
        Self { topics, only: None }
    }

    #[must_use]
    pub fn scoped(topics: ChangeTopics, charts: impl IntoIterator<Item = ChartId>) -> Self {
        Self {
            topics,
            only: Some(charts.into_iter().collect()),
        }
    }

    fn admits(&self, chart_id: &ChartId) -> bool {
        self.only
            .as_ref()
            .is_none_or(|charts| charts.contains(chart_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartRedrawStatus {
    Redrawn(DiffCounts),
    /// A required dataset is not loaded; the chart is left blank.
    Unrendered,
    /// Build or render failed; the previous frame stays.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRedrawOutcome {
    pub chart_id: ChartId,
    pub status: ChartRedrawStatus,
}

/// Result of one coordinated pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawReport {
    pub pass: u64,
    pub topics: ChangeTopics,
    pub outcomes: Vec<ChartRedrawOutcome>,
}

impl RedrawReport {
    #[must_use]
    pub fn outcome(&self, chart_id: &ChartId) -> Option<&ChartRedrawStatus> {
        self.outcomes
            .iter()
            .find(|outcome| &outcome.chart_id == chart_id)
            .map(|outcome| &outcome.status)
    }

    #[must_use]
    pub fn redrawn(&self) -> usize {
        self.count(|status| matches!(status, ChartRedrawStatus::Redrawn(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, ChartRedrawStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&ChartRedrawStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

/// Runs redraw passes: filters once, then diffs and renders every affected
/// chart in isolation.
#[derive(Debug, Clone, Default)]
pub struct RedrawCoordinator {
    in_progress: bool,
    passes: u64,
    timing: TransitionTiming,
}

impl RedrawCoordinator {
    #[must_use]
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            in_progress: false,
            passes: 0,
            timing,
        }
    }

    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    #[must_use]
    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Marks a pass as running; fails when one already is.
    pub fn begin(&mut self) -> DashboardResult<u64> {
        if self.in_progress {
            return Err(DashboardError::RedrawInProgress);
        }
        self.in_progress = true;
        self.passes += 1;
        Ok(self.passes)
    }

    pub fn finish(&mut self) {
        self.in_progress = false;
    }

    pub fn recompute_and_redraw<R: Renderer>(
        &mut self,
        request: &RedrawRequest,
        filter: &FilterState,
        datasets: &Datasets,
        registry: &mut ChartRegistry,
        renderer: &mut R,
    ) -> DashboardResult<RedrawReport> {
        let pass = self.begin()?;
        let view = FilteredView::compute(datasets, filter);
        let available = datasets.available(filter.selected_year());

        let mut report = RedrawReport {
            pass,
            topics: request.topics,
            outcomes: Vec::new(),
        };
        for (chart_id, slot) in registry.slots_mut() {
            if !request.admits(chart_id) || !slot.chart.dependencies().intersects(request.topics) {
                continue;
            }
            let status = if available.covers(slot.chart.requirements()) {
                let drill = DrillDownState::for_chart(filter.drill_down(), chart_id);
                redraw_chart(slot, &view, &drill, pass, self.timing, renderer)
            } else {
                blank_chart(slot, pass, renderer)
            };
            if let ChartRedrawStatus::Failed(reason) = &status {
                warn!(chart = %chart_id, pass, reason = %reason, "chart redraw failed");
            }
            report.outcomes.push(ChartRedrawOutcome {
                chart_id: chart_id.clone(),
                status,
            });
        }
        self.finish();

        debug!(
            pass,
            charts = report.outcomes.len(),
            redrawn = report.redrawn(),
            failed = report.failed(),
            "redraw pass completed"
        );
        Ok(report)
    }
}

fn redraw_chart<R: Renderer>(
    slot: &mut ChartSlot,
    view: &FilteredView<'_>,
    drill: &DrillDownState,
    pass: u64,
    timing: TransitionTiming,
    renderer: &mut R,
) -> ChartRedrawStatus {
    let scene = match slot.chart.build_scene(view, drill) {
        Ok(scene) => scene,
        Err(error) => return ChartRedrawStatus::Failed(error.to_string()),
    };
    let new_keys = scene.keys();
    let (diff, kind, timing) = match slot.chart.identity() {
        KeyIdentity::Persistent => (
            diff_keys(&slot.last_rendered_keys, &new_keys),
            FrameKind::Structural,
            timing,
        ),
        KeyIdentity::Rebuilt => (
            rebuild_keys(&slot.last_rendered_keys, &new_keys),
            FrameKind::Rebuilt,
            TransitionTiming::immediate(),
        ),
    };

    let mut ledger = slot.ledger.clone();
    if kind == FrameKind::Rebuilt {
        ledger.clear();
    } else {
        ledger.interrupt();
    }
    let elements = ledger.begin_pass(
        &diff,
        |key| {
            scene
                .element(key)
                .map(|element| (element.layer, &element.primitive))
        },
        timing,
    );
    let mut frame = RenderFrame::new(slot.chart.id().clone(), slot.chart.viewport(), pass, kind);
    frame.elements = elements;
    let overlays = scene_overlays(&scene);
    frame.overlays = overlays.items();

    if let Err(error) = renderer.render(&frame) {
        return ChartRedrawStatus::Failed(error.to_string());
    }

    slot.ledger = ledger;
    slot.last_rendered_keys = new_keys;
    slot.overlays = overlays;
    slot.rendered = true;
    ChartRedrawStatus::Redrawn(diff.counts())
}

/// Structural redraws tear every overlay down and keep only what the new
/// scene declares.
fn scene_overlays(scene: &ChartScene) -> ChartOverlays {
    ChartOverlays {
        legend: scene.legend.to_vec(),
        controls: scene.controls.clone(),
        annotations: Vec::new(),
        tooltip: Vec::new(),
    }
}

fn blank_chart<R: Renderer>(slot: &mut ChartSlot, pass: u64, renderer: &mut R) -> ChartRedrawStatus {
    if slot.rendered {
        let frame = RenderFrame::new(
            slot.chart.id().clone(),
            slot.chart.viewport(),
            pass,
            FrameKind::Rebuilt,
        );
        if let Err(error) = renderer.render(&frame) {
            return ChartRedrawStatus::Failed(error.to_string());
        }
    }
    slot.ledger.clear();
    slot.last_rendered_keys.clear();
    slot.overlays.teardown();
    slot.rendered = false;
    ChartRedrawStatus::Unrendered
}
