use serde::{Deserialize, Serialize};

use crate::core::{ChartId, EntityKey, Viewport};
use crate::render::{
    CanvasLayerKind, Color, OverlayItem, Primitive, RectPrimitive, TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Hovering,
}

/// Element currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub chart_id: ChartId,
    pub key: EntityKey,
}

/// Pointer state shared by all charts; at most one tooltip is visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    target: Option<HoverTarget>,
    pointer: Option<(f64, f64)>,
}

impl HoverState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.target.is_some() {
            InteractionMode::Hovering
        } else {
            InteractionMode::Idle
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&HoverTarget> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    /// Returns the previously hovered target when it belonged to another
    /// chart, so its tooltip can be torn down.
    pub fn on_hover(&mut self, target: HoverTarget, x: f64, y: f64) -> Option<HoverTarget> {
        let previous = self.target.replace(target);
        self.pointer = Some((x, y));
        previous.filter(|previous| {
            self.target
                .as_ref()
                .is_some_and(|current| current.chart_id != previous.chart_id)
        })
    }

    pub fn on_pointer_leave(&mut self) -> Option<HoverTarget> {
        self.pointer = None;
        self.target.take()
    }
}

/// Visual parameters of tooltip overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipStyle {
    pub font_size_px: f64,
    pub line_height_px: f64,
    pub padding_px: f64,
    pub char_width_px: f64,
    pub offset_px: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            font_size_px: 12.0,
            line_height_px: 16.0,
            padding_px: 10.0,
            char_width_px: 7.0,
            offset_px: 15.0,
        }
    }
}

/// Builds a tooltip box with one text row per line of `text`, kept inside
/// the viewport.
#[must_use]
pub fn tooltip_overlay(
    text: &str,
    pointer: (f64, f64),
    viewport: Viewport,
    style: TooltipStyle,
) -> Vec<OverlayItem> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return Vec::new();
    }
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let width = widest as f64 * style.char_width_px + 2.0 * style.padding_px;
    let height = lines.len() as f64 * style.line_height_px + 2.0 * style.padding_px;
    let max_x = (f64::from(viewport.width) - width).max(0.0);
    let max_y = (f64::from(viewport.height) - height).max(0.0);
    let x = (pointer.0 + style.offset_px).clamp(0.0, max_x);
    let y = (pointer.1 - style.offset_px).clamp(0.0, max_y);

    let mut items = Vec::with_capacity(lines.len() + 1);
    items.push(OverlayItem {
        layer: CanvasLayerKind::Tooltip,
        id: "tooltip:box".to_owned(),
        primitive: Primitive::Rect(RectPrimitive {
            x,
            y,
            width,
            height,
            fill: Color::rgb(1.0, 1.0, 1.0).with_alpha(0.9),
        }),
    });
    for (index, line) in lines.into_iter().enumerate() {
        items.push(OverlayItem {
            layer: CanvasLayerKind::Tooltip,
            id: format!("tooltip:line:{index}"),
            primitive: Primitive::Text(TextPrimitive::new(
                line.trim(),
                x + style.padding_px,
                y + style.padding_px + (index as f64 + 0.75) * style.line_height_px,
                style.font_size_px,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Left,
            )),
        });
    }
    items
}
