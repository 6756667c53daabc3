use std::f64::consts::TAU;

use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, DashboardChart, DrillDownState, FilteredView,
    KeyIdentity,
};
use crate::core::{ChartId, EntityKey, ShareSlice, Viewport, country_totals, highlighted_first_shares};
use crate::data::{DatasetKind, DatasetKinds};
use crate::error::DashboardResult;
use crate::render::{
    ArcPrimitive, CanvasLayerKind, Color, PolylinePrimitive, Primitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use super::format_thousands;
use super::palette::{CATEGORY10, PERMANENT_MEMBER_COLORS, hex, ordinal};

const MARGIN_VERTICAL: f64 = 20.0;
const MARGIN_HORIZONTAL: f64 = 40.0;
const SEPARATOR_KEY: &str = "pie:separator";

/// Country shares of the selected year's revenue, permanent members first.
pub struct RevenuePieChart {
    id: ChartId,
    viewport: Viewport,
    permanent_members: Vec<String>,
}

impl RevenuePieChart {
    #[must_use]
    pub fn new(viewport: Viewport, permanent_members: Vec<String>) -> Self {
        Self {
            id: ChartId::new(ChartId::PIE),
            viewport,
            permanent_members,
        }
    }

    /// `(cx, cy, radius)`; the pie sits left of center to leave room for
    /// the legend.
    fn geometry(&self) -> (f64, f64, f64) {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let plot_width = width - 2.0 * MARGIN_HORIZONTAL;
        let plot_height = height - 2.0 * MARGIN_VERTICAL;
        let radius = (plot_width.min(plot_height) / 2.0 - 50.0).max(10.0);
        (width / 2.0 - radius, height / 2.0, radius)
    }

    fn slices(&self, view: &FilteredView<'_>) -> Vec<ShareSlice> {
        view.revenue()
            .map(|rows| highlighted_first_shares(&country_totals(rows), &self.permanent_members))
            .unwrap_or_default()
    }

    fn slice_color(&self, slice: &ShareSlice, other_index: usize) -> Color {
        self.permanent_members
            .iter()
            .position(|member| *member == slice.label)
            .map_or_else(
                || ordinal(&CATEGORY10, other_index).with_alpha(0.6),
                |member| ordinal(&PERMANENT_MEMBER_COLORS, member),
            )
    }

    fn push_legend(&self, scene: &mut ChartScene, x: f64, y: f64) {
        let rows = self
            .permanent_members
            .iter()
            .enumerate()
            .map(|(index, member)| (member.as_str(), ordinal(&PERMANENT_MEMBER_COLORS, index)))
            .chain(std::iter::once((
                "Other countries",
                ordinal(&CATEGORY10, 0).with_alpha(0.6),
            )));
        for (row, (label, fill)) in rows.enumerate() {
            let row_y = y + row as f64 * 18.0;
            scene.push_legend(
                format!("legend:swatch:{label}"),
                Primitive::Rect(RectPrimitive {
                    x,
                    y: row_y,
                    width: 12.0,
                    height: 12.0,
                    fill,
                }),
            );
            scene.push_legend(
                format!("legend:label:{label}"),
                Primitive::Text(TextPrimitive::new(
                    label,
                    x + 18.0,
                    row_y + 10.0,
                    11.0,
                    hex(0x333333),
                    TextHAlign::Left,
                )),
            );
        }
    }
}

impl DashboardChart for RevenuePieChart {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn dependencies(&self) -> ChangeTopics {
        ChangeTopics::from_topic(ChangeTopic::Year).with_topic(ChangeTopic::Datasets)
    }

    fn requirements(&self) -> DatasetKinds {
        [DatasetKind::Revenue].into_iter().collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Persistent
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let (cx, cy, radius) = self.geometry();
        let slices = self.slices(view);
        let mut scene = ChartScene::new();

        let mut cursor = 0.0;
        let mut other_index = 0;
        let mut separator_angle = None;
        for slice in &slices {
            let start_angle = cursor;
            cursor += slice.percentage / 100.0 * TAU;
            scene.push(
                EntityKey::scoped("slice", &slice.label),
                CanvasLayerKind::Marks,
                Primitive::Arc(ArcPrimitive {
                    cx,
                    cy,
                    inner_radius: 0.0,
                    outer_radius: radius,
                    start_angle,
                    end_angle: cursor,
                    fill: self.slice_color(slice, other_index),
                }),
            )?;
            if slice.highlighted {
                separator_angle = Some(cursor);
            } else {
                other_index += 1;
            }
        }

        if let Some(angle) = separator_angle {
            scene.push(
                EntityKey::new(SEPARATOR_KEY),
                CanvasLayerKind::Labels,
                Primitive::Polyline(PolylinePrimitive {
                    points: vec![(cx, cy), (cx + radius * angle.sin(), cy - radius * angle.cos())],
                    stroke_width: 2.0,
                    color: hex(0x000000),
                }),
            )?;
        }

        scene.push(
            EntityKey::new("title"),
            CanvasLayerKind::Labels,
            Primitive::Text(TextPrimitive::new(
                format!("Arms Company Revenues by Country ({})", view.year()),
                f64::from(self.viewport.width) / 2.0,
                MARGIN_VERTICAL,
                14.0,
                hex(0x000000),
                TextHAlign::Center,
            )),
        )?;
        self.push_legend(&mut scene, cx + radius + 30.0, cy - radius);
        Ok(scene)
    }

    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        let country = key.strip_scope("slice")?;
        let slice = self
            .slices(view)
            .into_iter()
            .find(|slice| slice.label == country)?;
        Some(format!(
            "{}: {} million US$",
            slice.label,
            format_thousands(slice.value)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::RevenuePieChart;
    use crate::core::Viewport;

    #[test]
    fn default_size_matches_dashboard_layout() {
        let chart = RevenuePieChart::new(Viewport::new(430, 300), Vec::new());
        assert_eq!(chart.geometry(), (135.0, 150.0, 80.0));
    }
}
