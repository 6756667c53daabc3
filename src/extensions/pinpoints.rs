use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{EventRecord, GeoProjection};
use crate::render::{
    CanvasLayerKind, Color, OverlayItem, PolygonPrimitive, Primitive, TextHAlign, TextPrimitive,
};

/// Shape of map pinpoints: a downward triangle anchored at its apex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinpointStyle {
    pub half_width_px: f64,
    pub height_px: f64,
    pub fill: Color,
    pub stroke: Color,
    pub label_font_size_px: f64,
    pub label_offset: (f64, f64),
}

impl Default for PinpointStyle {
    fn default() -> Self {
        Self {
            half_width_px: 7.0,
            height_px: 15.0,
            fill: Color::rgb(1.0, 0.0, 0.0),
            stroke: Color::rgb(0.0, 0.0, 0.0),
            label_font_size_px: 10.0,
            label_offset: (10.0, 25.0),
        }
    }
}

/// One requested pinpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pinpoint {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
    pub label: Option<String>,
}

impl Pinpoint {
    #[must_use]
    pub fn for_event(event: &EventRecord) -> Self {
        Self {
            id: event.id.clone(),
            longitude: event.longitude,
            latitude: event.latitude,
            label: None,
        }
    }

    fn has_coordinates(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude != 0.0
            && self.latitude != 0.0
    }
}

/// Projects pinpoints into annotation overlays.
///
/// Pinpoints with zero or non-finite coordinates, or that the projection
/// cannot place, are skipped with a warning.
#[must_use]
pub fn place_pinpoints(
    pinpoints: &[Pinpoint],
    projection: &dyn GeoProjection,
    style: PinpointStyle,
) -> Vec<OverlayItem> {
    let mut items = Vec::with_capacity(pinpoints.len());
    for pinpoint in pinpoints {
        if !pinpoint.has_coordinates() {
            warn!(
                id = %pinpoint.id,
                longitude = pinpoint.longitude,
                latitude = pinpoint.latitude,
                "invalid coordinates for pinpoint"
            );
            continue;
        }
        let Some((x, y)) = projection.project(pinpoint.longitude, pinpoint.latitude) else {
            warn!(id = %pinpoint.id, "pinpoint falls outside the projection");
            continue;
        };
        items.push(OverlayItem {
            layer: CanvasLayerKind::Annotation,
            id: format!("pin:{}", pinpoint.id),
            primitive: Primitive::Polygon(PolygonPrimitive {
                points: vec![
                    (x, y),
                    (x - style.half_width_px, y + style.height_px),
                    (x + style.half_width_px, y + style.height_px),
                ],
                fill: style.fill,
                stroke: Some(style.stroke),
            }),
        });
        if let Some(label) = pinpoint.label.as_deref().filter(|label| !label.is_empty()) {
            items.push(OverlayItem {
                layer: CanvasLayerKind::Annotation,
                id: format!("pin-label:{}", pinpoint.id),
                primitive: Primitive::Text(TextPrimitive::new(
                    label,
                    x + style.label_offset.0,
                    y + style.label_offset.1,
                    style.label_font_size_px,
                    Color::rgb(0.0, 0.0, 0.0),
                    TextHAlign::Left,
                )),
            });
        }
    }
    items
}
