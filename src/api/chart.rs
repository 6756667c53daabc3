use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::api::{ChangeTopics, DrillDownState, FilteredView};
use crate::core::{ChartId, EntityKey, Viewport};
use crate::data::DatasetKinds;
use crate::error::{DashboardError, DashboardResult};
use crate::render::{CanvasLayerKind, OverlayItem, Primitive};

/// Whether a chart's keys carry identity from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyIdentity {
    /// Keys are diffed into enter/update/exit.
    Persistent,
    /// Every frame replaces the previous one wholesale.
    Rebuilt,
}

/// Cross-chart interaction carried by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionPayload {
    /// Point annotations for these events.
    SelectEvents(Vec<EntityKey>),
    /// Removes the target's annotations.
    ClearAnnotations,
}

/// Change to a chart's own view that leaves the shared filter alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

/// What a click on a chart element asks the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    None,
    DrillDown(EntityKey),
    DrillUp,
    Relay {
        target: ChartId,
        payload: InteractionPayload,
    },
    AdjustView(ViewCommand),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub layer: CanvasLayerKind,
    pub primitive: Primitive,
}

/// Everything one chart draws for one filtered view.
///
/// Keyed elements are unique per scene. Legend rows and controls are
/// transient overlays and never take part in key diffing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScene {
    elements: IndexMap<EntityKey, SceneElement>,
    pub legend: SmallVec<[OverlayItem; 8]>,
    pub controls: Vec<OverlayItem>,
}

impl ChartScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        key: EntityKey,
        layer: CanvasLayerKind,
        primitive: Primitive,
    ) -> DashboardResult<()> {
        if layer.is_transient() {
            return Err(DashboardError::InvalidData(format!(
                "keyed element `{key}` cannot use transient layer {layer:?}"
            )));
        }
        if self.elements.contains_key(&key) {
            return Err(DashboardError::InvalidData(format!(
                "duplicate element key `{key}` in one scene"
            )));
        }
        self.elements.insert(key, SceneElement { layer, primitive });
        Ok(())
    }

    pub fn push_legend(&mut self, id: impl Into<String>, primitive: Primitive) {
        self.legend.push(OverlayItem {
            layer: CanvasLayerKind::Legend,
            id: id.into(),
            primitive,
        });
    }

    pub fn push_control(&mut self, layer: CanvasLayerKind, id: impl Into<String>, primitive: Primitive) {
        self.controls.push(OverlayItem {
            layer,
            id: id.into(),
            primitive,
        });
    }

    #[must_use]
    pub fn keys(&self) -> IndexSet<EntityKey> {
        self.elements.keys().cloned().collect()
    }

    #[must_use]
    pub fn element(&self, key: &EntityKey) -> Option<&SceneElement> {
        self.elements.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = (&EntityKey, &SceneElement)> {
        self.elements.iter()
    }
}

/// One independently owned chart.
///
/// Charts are pure functions of the filtered view and their drill-down
/// state: they describe what to draw and the dashboard owns diffing,
/// transitions and overlays.
pub trait DashboardChart {
    fn id(&self) -> &ChartId;

    fn viewport(&self) -> Viewport;

    /// Fields whose change requires this chart to redraw.
    fn dependencies(&self) -> ChangeTopics;

    /// Datasets that must be fully loaded before the chart renders.
    fn requirements(&self) -> DatasetKinds;

    fn identity(&self) -> KeyIdentity;

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        drill: &DrillDownState,
    ) -> DashboardResult<ChartScene>;

    /// Tooltip text for a rendered element; lines separated by `\n`.
    fn describe(
        &self,
        _key: &EntityKey,
        _view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        None
    }

    fn on_click(
        &self,
        _key: &EntityKey,
        _view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> ClickAction {
        ClickAction::None
    }

    /// `true` when `key` names an aggregate this chart can drill into.
    fn accepts_drill_target(&self, _key: &EntityKey, _view: &FilteredView<'_>) -> bool {
        false
    }

    /// Applies a view command; returns `true` when the view changed and the
    /// chart needs a redraw.
    fn apply_view(&mut self, _command: ViewCommand) -> bool {
        false
    }

    /// Builds annotation overlays for a relayed interaction.
    fn accept_relay(
        &self,
        _payload: &InteractionPayload,
        _view: &FilteredView<'_>,
    ) -> DashboardResult<Vec<OverlayItem>> {
        Err(DashboardError::UnsupportedRelay(self.id().to_string()))
    }
}
