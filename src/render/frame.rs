use serde::{Deserialize, Serialize};

use crate::core::{ChartId, EntityKey, Viewport};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{CanvasLayerKind, Primitive};

/// Enter/update/exit classification of a keyed element within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementPhase {
    Enter,
    Update,
    Exit,
}

/// One keyed mark with the state it animates from and to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameElement {
    pub key: EntityKey,
    pub layer: CanvasLayerKind,
    pub phase: ElementPhase,
    pub from: Primitive,
    pub to: Primitive,
    /// Zero means "apply immediately".
    pub duration_ms: f64,
}

/// Unkeyed transient item (tooltip, legend row, pinpoint, backdrop, control).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayItem {
    pub layer: CanvasLayerKind,
    pub id: String,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// Keyed marks changed; overlays were torn down and rebuilt.
    Structural,
    /// Every previous mark was cleared; all elements enter at once.
    Rebuilt,
    /// Only overlay items changed; marks are untouched.
    OverlayOnly,
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub chart_id: ChartId,
    pub viewport: Viewport,
    pub pass: u64,
    pub kind: FrameKind,
    pub elements: Vec<FrameElement>,
    pub overlays: Vec<OverlayItem>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(chart_id: ChartId, viewport: Viewport, pass: u64, kind: FrameKind) -> Self {
        Self {
            chart_id,
            viewport,
            pass,
            kind,
            elements: Vec::new(),
            overlays: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: FrameElement) -> Self {
        self.elements.push(element);
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: OverlayItem) -> Self {
        self.overlays.push(overlay);
        self
    }

    pub fn validate(&self) -> DashboardResult<()> {
        self.viewport.validate()?;
        for element in &self.elements {
            if element.layer.is_transient() {
                return Err(DashboardError::InvalidData(format!(
                    "keyed element `{}` cannot live on transient layer {:?}",
                    element.key, element.layer
                )));
            }
            if !element.duration_ms.is_finite() || element.duration_ms < 0.0 {
                return Err(DashboardError::InvalidData(
                    "element transition duration must be finite and >= 0".to_owned(),
                ));
            }
            element.from.validate()?;
            element.to.validate()?;
        }
        for overlay in &self.overlays {
            overlay.primitive.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.overlays.is_empty()
    }

    #[must_use]
    pub fn count_phase(&self, phase: ElementPhase) -> usize {
        self.elements
            .iter()
            .filter(|element| element.phase == phase)
            .count()
    }

    /// Overlays sorted back to front; stable within a layer.
    #[must_use]
    pub fn overlays_in_paint_order(&self) -> Vec<&OverlayItem> {
        let mut ordered: Vec<&OverlayItem> = self.overlays.iter().collect();
        ordered.sort_by_key(|item| item.layer);
        ordered
    }
}
