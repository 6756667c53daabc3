use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, DashboardChart, DrillDownState, FilteredView,
    KeyIdentity,
};
use crate::core::{
    ChartId, EntityKey, LinearScale, StackedLayer, Viewport, YearRange, country_totals,
    stack_silhouette,
};
use crate::data::{DatasetKind, DatasetKinds, Datasets};
use crate::error::DashboardResult;
use crate::render::{
    AreaPrimitive, CanvasLayerKind, Primitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use super::format_thousands;
use super::palette::{CATEGORY10, hex, ordinal};

const MARGIN_TOP: f64 = 50.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_BOTTOM: f64 = 100.0;
const MARGIN_LEFT: f64 = 80.0;

/// Multi-year revenue stream of a fixed set of countries.
///
/// Independent of the year and event-type filters; only dataset arrival
/// redraws it.
pub struct RevenueStreamChart {
    id: ChartId,
    viewport: Viewport,
    countries: Vec<String>,
    years: YearRange,
}

impl RevenueStreamChart {
    #[must_use]
    pub fn new(viewport: Viewport, countries: Vec<String>, years: YearRange) -> Self {
        Self {
            id: ChartId::new(ChartId::STREAM),
            viewport,
            countries,
            years,
        }
    }

    /// `values[country][year]` in millions, zero where a year is missing.
    fn revenue_matrix(&self, datasets: &Datasets) -> Vec<Vec<f64>> {
        let per_year: Vec<_> = self
            .years
            .years()
            .map(|year| datasets.revenue_for(year).map(country_totals).unwrap_or_default())
            .collect();
        self.countries
            .iter()
            .map(|country| {
                per_year
                    .iter()
                    .map(|totals| totals.get(country).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }

    fn plot_size(&self) -> (f64, f64) {
        (
            (f64::from(self.viewport.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            (f64::from(self.viewport.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        )
    }

    fn scales(&self, layers: &[StackedLayer]) -> DashboardResult<(LinearScale, LinearScale)> {
        let (plot_width, plot_height) = self.plot_size();
        let x = LinearScale::covering(
            (f64::from(self.years.start), f64::from(self.years.end)),
            (MARGIN_LEFT, MARGIN_LEFT + plot_width),
        )?;
        let extent = layers
            .iter()
            .flat_map(|layer| layer.bands.iter())
            .map(|(lower, upper)| lower.abs().max(upper.abs()))
            .fold(0.0, f64::max);
        let half = if extent > 0.0 { extent * 1.1 } else { 1.0 };
        let y = LinearScale::new((-half, half), (MARGIN_TOP + plot_height, MARGIN_TOP))?;
        Ok((x, y))
    }

    fn push_legend(&self, scene: &mut ChartScene) {
        let (plot_width, _) = self.plot_size();
        let x = MARGIN_LEFT + plot_width + 20.0;
        for (index, country) in self.countries.iter().enumerate() {
            let y = MARGIN_TOP + index as f64 * 20.0;
            scene.push_legend(
                format!("legend:swatch:{country}"),
                Primitive::Rect(RectPrimitive {
                    x,
                    y,
                    width: 12.0,
                    height: 12.0,
                    fill: ordinal(&CATEGORY10, index),
                }),
            );
            scene.push_legend(
                format!("legend:label:{country}"),
                Primitive::Text(TextPrimitive::new(
                    country.as_str(),
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

impl DashboardChart for RevenueStreamChart {
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
        [DatasetKind::RevenueHistory, DatasetKind::Gdp]
            .into_iter()
            .collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Persistent
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let values = self.revenue_matrix(view.datasets());
        let layers = stack_silhouette(&self.countries, &values)?;
        let (x, y) = self.scales(&layers)?;
        let years: Vec<f64> = self.years.years().map(f64::from).collect();

        let mut scene = ChartScene::new();
        for (index, layer) in layers.iter().enumerate() {
            let mut upper = Vec::with_capacity(years.len());
            let mut lower = Vec::with_capacity(years.len());
            for (year, (low, high)) in years.iter().zip(&layer.bands) {
                let px = x.map(*year)?;
                upper.push((px, y.map(*high)?));
                lower.push((px, y.map(*low)?));
            }
            scene.push(
                EntityKey::scoped("stream", &layer.key),
                CanvasLayerKind::Marks,
                Primitive::Area(AreaPrimitive {
                    upper,
                    lower,
                    fill: ordinal(&CATEGORY10, index),
                }),
            )?;
        }

        let (_, plot_height) = self.plot_size();
        for year in self.years.years() {
            scene.push(
                EntityKey::scoped("axis:x", year),
                CanvasLayerKind::Labels,
                Primitive::Text(TextPrimitive::new(
                    year.to_string(),
                    x.map(f64::from(year))?,
                    MARGIN_TOP + plot_height + 20.0,
                    10.0,
                    hex(0x000000),
                    TextHAlign::Center,
                )),
            )?;
        }
        self.push_legend(&mut scene);
        Ok(scene)
    }

    /// Revenue and GDP change of the hovered country in the selected year.
    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        let country = key.strip_scope("stream")?;
        let year = view.year();
        let revenue = view
            .datasets()
            .revenue_for(year)
            .map(country_totals)
            .and_then(|totals| totals.get(country).copied())
            .unwrap_or(0.0);
        let growth = view
            .datasets()
            .gdp()
            .and_then(|series| series.iter().find(|entry| entry.country == country))
            .and_then(|entry| entry.growth(year))
            .map_or_else(|| "n/a".to_owned(), |growth| format!("{growth:.2}%"));
        Some(format!(
            "{country}\nYear: {year}\nRevenue: ${} million\nGDP Change: {growth}",
            format_thousands(revenue)
        ))
    }
}
