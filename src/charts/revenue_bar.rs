use std::f64::consts::TAU;

use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, ClickAction, DashboardChart, DrillDownState,
    FilteredView, KeyIdentity,
};
use crate::core::{
    BandScale, ChartId, CountryRevenue, EntityKey, LinearScale, ShareSlice, Viewport,
    company_shares, revenue_by_country,
};
use crate::data::{DatasetKind, DatasetKinds};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{
    ArcPrimitive, CanvasLayerKind, Primitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use super::format_thousands;
use super::palette::{TABLEAU10, hex, ordinal, truncate_label};

pub const BACK_CONTROL_ID: &str = "control:back";
pub const BACKDROP_CONTROL_ID: &str = "control:backdrop";
const COUNTRY_SCOPE: &str = "country";
const BAND_PADDING: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Margin {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

/// Per-country revenue bars stacked by company, drilling into a company
/// donut for one country.
pub struct RevenueBarChart {
    id: ChartId,
    viewport: Viewport,
    margin: Margin,
    min_share_pct: f64,
    label_min_pct: f64,
    legend_max_chars: usize,
}

impl RevenueBarChart {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            id: ChartId::new(ChartId::REVENUE_BAR),
            viewport,
            margin: Margin {
                top: 60.0,
                right: 50.0,
                bottom: 80.0,
                left: 120.0,
            },
            min_share_pct: 1.0,
            label_min_pct: 3.0,
            legend_max_chars: 25,
        }
    }

    /// Slices at or below `min_share_pct` are dropped; slices at or below
    /// `label_min_pct` lose their percentage label.
    #[must_use]
    pub fn with_share_thresholds(mut self, min_share_pct: f64, label_min_pct: f64) -> Self {
        self.min_share_pct = min_share_pct;
        self.label_min_pct = label_min_pct;
        self
    }

    #[must_use]
    pub fn with_legend_max_chars(mut self, max_chars: usize) -> Self {
        self.legend_max_chars = max_chars;
        self
    }

    #[must_use]
    pub fn country_key(country: &str) -> EntityKey {
        EntityKey::scoped(COUNTRY_SCOPE, country)
    }

    fn plot_size(&self) -> (f64, f64) {
        (
            (f64::from(self.viewport.width) - self.margin.left - self.margin.right).max(1.0),
            (f64::from(self.viewport.height) - self.margin.top - self.margin.bottom).max(1.0),
        )
    }

    fn donut_geometry(&self) -> (f64, f64, f64) {
        let (plot_width, plot_height) = self.plot_size();
        (
            self.margin.left + plot_width / 2.0,
            self.margin.top + plot_height / 2.0,
            plot_width.min(plot_height) / 4.0,
        )
    }

    fn countries(view: &FilteredView<'_>) -> Vec<CountryRevenue> {
        view.revenue().map(revenue_by_country).unwrap_or_default()
    }

    fn selected_country(
        &self,
        view: &FilteredView<'_>,
        drill: &DrillDownState,
    ) -> DashboardResult<Option<CountryRevenue>> {
        let Some(key) = drill.entity() else {
            return Ok(None);
        };
        let country = key.strip_scope(COUNTRY_SCOPE).ok_or_else(|| {
            DashboardError::InvalidSelection(format!("`{key}` is not a country key"))
        })?;
        Self::countries(view)
            .into_iter()
            .find(|entry| entry.country == country)
            .map(Some)
            .ok_or_else(|| {
                DashboardError::InvalidSelection(format!(
                    "no revenue for `{country}` in {}",
                    view.year()
                ))
            })
    }

    fn build_overview(
        &self,
        scene: &mut ChartScene,
        countries: &[CountryRevenue],
        year: i32,
    ) -> DashboardResult<()> {
        let (plot_width, plot_height) = self.plot_size();
        let x = BandScale::new(
            countries.iter().map(|entry| entry.country.clone()).collect(),
            (0.0, plot_width),
            BAND_PADDING,
        )?;
        let max_total = countries.iter().map(|entry| entry.total).fold(0.0, f64::max);
        let y = LinearScale::covering((0.0, max_total), (plot_height, 0.0))?;

        for entry in countries {
            let Some(band_start) = x.position(&entry.country) else {
                continue;
            };
            let mut stacked = 0.0;
            for (rank, company) in entry.companies.iter().enumerate() {
                let bottom = y.map(stacked)?;
                stacked += company.revenue.max(0.0);
                let top = y.map(stacked)?;
                scene.push(
                    EntityKey::scoped("bar", format!("{}/{rank}", entry.country)),
                    CanvasLayerKind::Marks,
                    Primitive::Rect(RectPrimitive {
                        x: self.margin.left + band_start,
                        y: self.margin.top + top,
                        width: x.bandwidth(),
                        height: (bottom - top).max(0.0),
                        fill: ordinal(&TABLEAU10, rank),
                    }),
                )?;
            }
            scene.push(
                EntityKey::scoped("axis:x", &entry.country),
                CanvasLayerKind::Labels,
                Primitive::Text(TextPrimitive::new(
                    entry.country.as_str(),
                    self.margin.left + band_start + x.bandwidth() / 2.0,
                    self.margin.top + plot_height + 20.0,
                    10.0,
                    hex(0x000000),
                    TextHAlign::Center,
                )),
            )?;
        }

        self.push_title(
            scene,
            format!("Arms Revenue by Company and Country ({year})"),
        )
    }

    fn build_detail(
        &self,
        scene: &mut ChartScene,
        country: &CountryRevenue,
        year: i32,
    ) -> DashboardResult<()> {
        let (cx, cy, radius) = self.donut_geometry();
        let slices = company_shares(country, self.min_share_pct);
        let total: f64 = slices.iter().map(|slice| slice.value).sum();

        scene.push_control(
            CanvasLayerKind::Backdrop,
            BACKDROP_CONTROL_ID,
            Primitive::Rect(RectPrimitive {
                x: 0.0,
                y: 0.0,
                width: f64::from(self.viewport.width),
                height: f64::from(self.viewport.height),
                fill: hex(0xf9f9f9).with_alpha(0.8),
            }),
        );

        let mut cursor = 0.0;
        for (index, slice) in slices.iter().enumerate() {
            let span = if total > 0.0 { slice.value / total * TAU } else { 0.0 };
            let (start_angle, end_angle) = (cursor, cursor + span);
            cursor = end_angle;
            scene.push(
                EntityKey::scoped("donut", index),
                CanvasLayerKind::Marks,
                Primitive::Arc(ArcPrimitive {
                    cx,
                    cy,
                    inner_radius: radius * 0.5,
                    outer_radius: radius,
                    start_angle,
                    end_angle,
                    fill: ordinal(&TABLEAU10, index),
                }),
            )?;
            if slice.percentage > self.label_min_pct {
                let mid = (start_angle + end_angle) / 2.0;
                scene.push(
                    EntityKey::scoped("donut-label", index),
                    CanvasLayerKind::Labels,
                    Primitive::Text(TextPrimitive::new(
                        format!("{:.1}%", slice.percentage),
                        cx + radius * 0.6 * mid.sin(),
                        cy - radius * 0.6 * mid.cos(),
                        10.0,
                        hex(0xffffff),
                        TextHAlign::Center,
                    )),
                )?;
            }
        }

        self.push_donut_legend(scene, &slices, cx + radius + 50.0, cy - radius - 100.0);

        scene.push_control(
            CanvasLayerKind::Control,
            BACK_CONTROL_ID,
            Primitive::Text(TextPrimitive::new(
                "← Back to Chart",
                cx - 70.0,
                cy - radius - 20.0,
                12.0,
                hex(0x007bff),
                TextHAlign::Left,
            )),
        );

        self.push_title(
            scene,
            format!("Arms Revenue Distribution in {} ({year})", country.country),
        )
    }

    fn push_donut_legend(&self, scene: &mut ChartScene, slices: &[ShareSlice], x: f64, y: f64) {
        for (index, slice) in slices.iter().enumerate() {
            let row_y = y + index as f64 * 20.0;
            scene.push_legend(
                format!("legend:swatch:{index}"),
                Primitive::Rect(RectPrimitive {
                    x,
                    y: row_y,
                    width: 18.0,
                    height: 18.0,
                    fill: ordinal(&TABLEAU10, index),
                }),
            );
            scene.push_legend(
                format!("legend:label:{index}"),
                Primitive::Text(TextPrimitive::new(
                    truncate_label(&slice.label, self.legend_max_chars),
                    x + 24.0,
                    row_y + 13.0,
                    12.0,
                    hex(0x333333),
                    TextHAlign::Left,
                )),
            );
        }
    }

    fn push_title(&self, scene: &mut ChartScene, title: String) -> DashboardResult<()> {
        scene.push(
            EntityKey::new("title"),
            CanvasLayerKind::Labels,
            Primitive::Text(TextPrimitive::new(
                title,
                f64::from(self.viewport.width) / 2.0,
                self.margin.top / 2.0,
                16.0,
                hex(0x000000),
                TextHAlign::Center,
            )),
        )
    }
}

impl DashboardChart for RevenueBarChart {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn dependencies(&self) -> ChangeTopics {
        ChangeTopics::from_topic(ChangeTopic::Year)
            .with_topic(ChangeTopic::DrillDown)
            .with_topic(ChangeTopic::Datasets)
    }

    fn requirements(&self) -> DatasetKinds {
        [DatasetKind::Revenue].into_iter().collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Rebuilt
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let mut scene = ChartScene::new();
        match self.selected_country(view, drill)? {
            Some(country) => self.build_detail(&mut scene, &country, view.year())?,
            None => self.build_overview(&mut scene, &Self::countries(view), view.year())?,
        }
        Ok(scene)
    }

    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        drill: &DrillDownState,
    ) -> Option<String> {
        if let Some(index) = key.strip_scope("donut") {
            let country = self.selected_country(view, drill).ok()??;
            let slice = company_shares(&country, self.min_share_pct)
                .into_iter()
                .nth(index.parse().ok()?)?;
            return Some(format!(
                "{}\nRevenue: {} million US$\n{:.1}%",
                slice.label,
                format_thousands(slice.value),
                slice.percentage
            ));
        }
        let (country, rank) = key.strip_scope("bar")?.rsplit_once('/')?;
        let countries = Self::countries(view);
        let company = countries
            .iter()
            .find(|entry| entry.country == country)?
            .companies
            .get(rank.parse::<usize>().ok()?)?;
        Some(format!(
            "Company: {}\nRevenue: {} million US$",
            company.company,
            format_thousands(company.revenue)
        ))
    }

    fn on_click(
        &self,
        key: &EntityKey,
        _view: &FilteredView<'_>,
        drill: &DrillDownState,
    ) -> ClickAction {
        if drill.is_detail() {
            return if key.as_str() == BACK_CONTROL_ID {
                ClickAction::DrillUp
            } else {
                ClickAction::None
            };
        }
        match key
            .strip_scope("bar")
            .and_then(|rest| rest.rsplit_once('/'))
        {
            Some((country, _)) => ClickAction::DrillDown(Self::country_key(country)),
            None => ClickAction::None,
        }
    }

    fn accepts_drill_target(&self, key: &EntityKey, view: &FilteredView<'_>) -> bool {
        let Some(country) = key.strip_scope(COUNTRY_SCOPE) else {
            return false;
        };
        view.revenue()
            .is_some_and(|rows| rows.iter().any(|row| row.country == country))
    }
}
