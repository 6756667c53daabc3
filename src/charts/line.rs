use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, DashboardChart, DrillDownState, FilteredView,
    KeyIdentity,
};
use crate::core::{
    ChartId, EntityKey, LinearScale, MetricSeries, Viewport, metric_series, yearly_metrics,
};
use crate::data::{DatasetKind, DatasetKinds};
use crate::error::DashboardResult;
use crate::render::{
    CanvasLayerKind, CirclePrimitive, PolylinePrimitive, Primitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use super::format_thousands;
use super::palette::{METRIC_LINE_COLORS, hex, ordinal};

const MARGIN_TOP: f64 = 50.0;
const MARGIN_RIGHT: f64 = 100.0;
const MARGIN_BOTTOM: f64 = 50.0;
const MARGIN_LEFT: f64 = 80.0;
const DOT_RADIUS: f64 = 4.0;

/// Yearly fatalities, event counts and per-type counts over the whole
/// event table.
pub struct ConflictMetricsLineChart {
    id: ChartId,
    viewport: Viewport,
}

impl ConflictMetricsLineChart {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            id: ChartId::new(ChartId::LINE),
            viewport,
        }
    }

    fn plot_size(&self) -> (f64, f64) {
        (
            (f64::from(self.viewport.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            (f64::from(self.viewport.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        )
    }

    fn series(view: &FilteredView<'_>) -> Vec<MetricSeries> {
        metric_series(&yearly_metrics(view.all_events()))
    }

    fn scales(&self, series: &[MetricSeries]) -> DashboardResult<(LinearScale, LinearScale)> {
        let (plot_width, plot_height) = self.plot_size();
        let years = series.iter().flat_map(|entry| entry.values.iter().map(|(year, _)| *year));
        let (first, last) = years.fold((i32::MAX, i32::MIN), |(low, high), year| {
            (low.min(year), high.max(year))
        });
        let (first, last) = if first > last { (0, 0) } else { (first, last) };
        let max_value = series
            .iter()
            .flat_map(|entry| entry.values.iter().map(|(_, value)| *value))
            .fold(0.0, f64::max);
        let x = LinearScale::covering(
            (f64::from(first), f64::from(last)),
            (MARGIN_LEFT, MARGIN_LEFT + plot_width),
        )?;
        let y = LinearScale::covering(
            (0.0, max_value * 1.1),
            (MARGIN_TOP + plot_height, MARGIN_TOP),
        )?;
        Ok((x, y))
    }

    fn push_legend(&self, scene: &mut ChartScene, series: &[MetricSeries]) {
        let (plot_width, _) = self.plot_size();
        let x = MARGIN_LEFT + plot_width - 180.0;
        for (index, entry) in series.iter().enumerate() {
            let y = MARGIN_TOP + index as f64 * 20.0;
            scene.push_legend(
                format!("legend:swatch:{}", entry.name),
                Primitive::Rect(RectPrimitive {
                    x,
                    y,
                    width: 12.0,
                    height: 12.0,
                    fill: ordinal(&METRIC_LINE_COLORS, index),
                }),
            );
            scene.push_legend(
                format!("legend:label:{}", entry.name),
                Primitive::Text(TextPrimitive::new(
                    entry.name.as_str(),
                    x + 18.0,
                    y + 10.0,
                    12.0,
                    hex(0x333333),
                    TextHAlign::Left,
                )),
            );
        }
    }
}

impl DashboardChart for ConflictMetricsLineChart {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn dependencies(&self) -> ChangeTopics {
        ChangeTopics::from_topic(ChangeTopic::Datasets)
    }

    fn requirements(&self) -> DatasetKinds {
        [DatasetKind::Events].into_iter().collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Persistent
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let series = Self::series(view);
        let (x, y) = self.scales(&series)?;
        let mut scene = ChartScene::new();

        for (index, entry) in series.iter().enumerate() {
            let color = ordinal(&METRIC_LINE_COLORS, index);
            let points = entry
                .values
                .iter()
                .map(|(year, value)| -> DashboardResult<(f64, f64)> {
                    Ok((x.map(f64::from(*year))?, y.map(*value)?))
                })
                .collect::<DashboardResult<Vec<_>>>()?;
            for ((year, _), (cx, cy)) in entry.values.iter().zip(&points) {
                scene.push(
                    EntityKey::new(format!("dot:{}:{year}", entry.name)),
                    CanvasLayerKind::Marks,
                    Primitive::Circle(CirclePrimitive {
                        cx: *cx,
                        cy: *cy,
                        radius: DOT_RADIUS,
                        fill: color,
                    }),
                )?;
            }
            scene.push(
                EntityKey::scoped("line", &entry.name),
                CanvasLayerKind::Marks,
                Primitive::Polyline(PolylinePrimitive {
                    points,
                    stroke_width: 2.0,
                    color,
                }),
            )?;
        }

        scene.push(
            EntityKey::new("title"),
            CanvasLayerKind::Labels,
            Primitive::Text(TextPrimitive::new(
                "Conflict Metrics by Year",
                f64::from(self.viewport.width) / 2.0,
                MARGIN_TOP / 2.0,
                16.0,
                hex(0x000000),
                TextHAlign::Center,
            )),
        )?;
        self.push_legend(&mut scene, &series);
        Ok(scene)
    }

    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        let (name, year) = key.strip_scope("dot")?.rsplit_once(':')?;
        let year: i32 = year.parse().ok()?;
        let value = Self::series(view)
            .into_iter()
            .find(|entry| entry.name == name)?
            .values
            .into_iter()
            .find(|(sample_year, _)| *sample_year == year)?
            .1;
        Some(format!("{name}\nYear: {year}\nValue: {}", format_thousands(value)))
    }
}
