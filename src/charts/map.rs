use tracing::trace;

use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, ClickAction, DashboardChart, DrillDownState,
    FilteredView, InteractionPayload, KeyIdentity, ViewCommand,
};
use crate::core::{
    ChartId, EntityKey, EventRecord, GeoProjection, MercatorProjection, SqrtScale, Viewport,
    ZoomTransform, ZoomedProjection, planar_centroid,
};
use crate::data::{DatasetKind, DatasetKinds, WorldGeometry};
use crate::error::DashboardResult;
use crate::extensions::{Pinpoint, PinpointStyle, place_pinpoints};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, OverlayItem, PathPrimitive, Primitive, RectPrimitive,
    TextHAlign, TextPrimitive,
};

use super::palette::{event_type_color, hex};

pub const ZOOM_IN_CONTROL_ID: &str = "control:zoom-in";
pub const ZOOM_OUT_CONTROL_ID: &str = "control:zoom-out";
pub const ZOOM_RESET_CONTROL_ID: &str = "control:zoom-reset";
const SPHERE_KEY: &str = "background:sphere";
const COUNTRY_SCOPE: &str = "country";
const COUNTRY_LABEL_SCOPE: &str = "country-label";
const ZOOM_IN_FACTOR: f64 = 1.5;
const ZOOM_OUT_FACTOR: f64 = 0.667;
const LEGEND_X: f64 = 20.0;
const LEGEND_Y: f64 = 20.0;
const LEGEND_ROW_PX: f64 = 20.0;

/// Conflict events as circles over country outlines, one circle per event id.
///
/// The zoom is chart-local: it survives filter changes and only moves
/// positions, so circles, labels and pinpoints keep their on-screen size.
pub struct ConflictMapChart {
    id: ChartId,
    viewport: Viewport,
    projection: Box<dyn GeoProjection>,
    radius_range: (f64, f64),
    pinpoint_style: PinpointStyle,
    zoom: ZoomTransform,
}

impl ConflictMapChart {
    #[must_use]
    pub fn new(viewport: Viewport, radius_range: (f64, f64)) -> Self {
        Self {
            id: ChartId::new(ChartId::MAP),
            viewport,
            projection: Box::new(MercatorProjection::middle_east(viewport)),
            radius_range,
            pinpoint_style: PinpointStyle::default(),
            zoom: ZoomTransform::IDENTITY,
        }
    }

    fn zoomed(&self) -> ZoomedProjection<'_> {
        ZoomedProjection {
            projection: self.projection.as_ref(),
            zoom: self.zoom,
        }
    }

    #[must_use]
    pub fn with_projection(mut self, projection: impl GeoProjection + 'static) -> Self {
        self.projection = Box::new(projection);
        self
    }

    #[must_use]
    pub fn with_pinpoint_style(mut self, style: PinpointStyle) -> Self {
        self.pinpoint_style = style;
        self
    }

    /// Radius scale over the whole table so circle sizes stay comparable
    /// across years.
    fn radius_scale(&self, view: &FilteredView<'_>) -> DashboardResult<SqrtScale> {
        let max_fatalities = view
            .all_events()
            .iter()
            .map(|event| event.fatalities)
            .max()
            .unwrap_or(0);
        SqrtScale::new(f64::from(max_fatalities), self.radius_range)
    }

    fn event_circle(&self, event: &EventRecord, scale: SqrtScale) -> Option<Primitive> {
        if !event.has_coordinates() {
            trace!(id = %event.id, "event without coordinates left off the map");
            return None;
        }
        let (cx, cy) = self.zoomed().project(event.longitude, event.latitude)?;
        Some(Primitive::Circle(CirclePrimitive {
            cx,
            cy,
            radius: scale.map(f64::from(event.fatalities)),
            fill: event_type_color(event.event_type).with_alpha(0.6),
        }))
    }

    /// Outlines keyed by country name, then their centroid labels so no
    /// outline covers a neighbour's label.
    fn push_countries(&self, scene: &mut ChartScene, world: &WorldGeometry) -> DashboardResult<()> {
        let projection = self.zoomed();
        let mut labels = Vec::new();
        for country in &world.countries {
            let Some(name) = country.label() else {
                continue;
            };
            let key = EntityKey::scoped(COUNTRY_SCOPE, name);
            if scene.element(&key).is_some() {
                trace!(country = name, "duplicate country outline skipped");
                continue;
            }
            let rings: Vec<Vec<(f64, f64)>> = country
                .rings()
                .map(|ring| {
                    ring.iter()
                        .filter_map(|&(longitude, latitude)| projection.project(longitude, latitude))
                        .collect::<Vec<_>>()
                })
                .filter(|ring| ring.len() >= 3)
                .collect();
            if rings.is_empty() {
                continue;
            }
            if let Some(centroid) = planar_centroid(&rings) {
                labels.push((name, centroid));
            }
            scene.push(
                key,
                CanvasLayerKind::Background,
                Primitive::Path(PathPrimitive {
                    rings,
                    fill: hex(0xeeeeee),
                    stroke: Some(hex(0xd2691e)),
                    stroke_width: 0.5,
                }),
            )?;
        }
        for (name, (x, y)) in labels {
            scene.push(
                EntityKey::scoped(COUNTRY_LABEL_SCOPE, name),
                CanvasLayerKind::Background,
                Primitive::Text(TextPrimitive::new(
                    name,
                    x,
                    y,
                    8.0,
                    hex(0x333333),
                    TextHAlign::Center,
                )),
            )?;
        }
        Ok(())
    }

    fn push_zoom_controls(&self, scene: &mut ChartScene) {
        let x = f64::from(self.viewport.width) - 30.0;
        for (row, (id, text)) in [
            (ZOOM_IN_CONTROL_ID, "+"),
            (ZOOM_OUT_CONTROL_ID, "-"),
            (ZOOM_RESET_CONTROL_ID, "Reset"),
        ]
        .into_iter()
        .enumerate()
        {
            scene.push_control(
                CanvasLayerKind::Control,
                id,
                Primitive::Text(TextPrimitive::new(
                    text,
                    x,
                    30.0 + row as f64 * 25.0,
                    16.0,
                    hex(0x333333),
                    TextHAlign::Center,
                )),
            );
        }
    }

    fn push_legend(&self, scene: &mut ChartScene, view: &FilteredView<'_>) {
        let mut row = 0.0;
        for event_type in view.event_types().iter() {
            let y = LEGEND_Y + row * LEGEND_ROW_PX;
            scene.push_legend(
                format!("legend:swatch:{}", event_type.label()),
                Primitive::Circle(CirclePrimitive {
                    cx: LEGEND_X,
                    cy: y,
                    radius: 5.0,
                    fill: event_type_color(event_type),
                }),
            );
            scene.push_legend(
                format!("legend:label:{}", event_type.label()),
                legend_text(event_type.label(), y),
            );
            row += 1.0;
        }
        scene.push_legend(
            "legend:size",
            legend_text("Circle size: Number of fatalities", LEGEND_Y + row * LEGEND_ROW_PX),
        );
    }
}

fn legend_text(text: &str, y: f64) -> Primitive {
    Primitive::Text(TextPrimitive::new(
        text,
        LEGEND_X + 12.0,
        y + 4.0,
        12.0,
        hex(0x333333),
        TextHAlign::Left,
    ))
}

impl DashboardChart for ConflictMapChart {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn dependencies(&self) -> ChangeTopics {
        ChangeTopics::from_topic(ChangeTopic::Year)
            .with_topic(ChangeTopic::EventTypes)
            .with_topic(ChangeTopic::Datasets)
            .with_topic(ChangeTopic::View)
    }

    fn requirements(&self) -> DatasetKinds {
        [DatasetKind::Events, DatasetKind::World].into_iter().collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Persistent
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let scale = self.radius_scale(view)?;
        let mut scene = ChartScene::new();
        scene.push(
            EntityKey::new(SPHERE_KEY),
            CanvasLayerKind::Background,
            Primitive::Rect(RectPrimitive {
                x: 0.0,
                y: 0.0,
                width: f64::from(self.viewport.width),
                height: f64::from(self.viewport.height),
                fill: hex(0xa5d6f7),
            }),
        )?;
        if let Some(world) = view.datasets().world() {
            self.push_countries(&mut scene, world)?;
        }
        for event in view.events() {
            if let Some(circle) = self.event_circle(event, scale) {
                scene.push(event.key(), CanvasLayerKind::Marks, circle)?;
            }
        }
        self.push_legend(&mut scene, view);
        self.push_zoom_controls(&mut scene);
        Ok(scene)
    }

    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        if let Some(country) = key.strip_scope(COUNTRY_SCOPE) {
            return Some(country.to_owned());
        }
        let event = view.event(key.as_str())?;
        let date = event
            .event_date
            .map_or_else(|| "unknown".to_owned(), |date| date.to_string());
        let mut text = format!(
            "{}\nLocation: {}\nDate: {date}\nFatalities: {}",
            event.event_type, event.location, event.fatalities
        );
        if let Some(notes) = event.notes.as_deref().filter(|notes| !notes.is_empty()) {
            text.push('\n');
            text.push_str(notes);
        }
        Some(text)
    }

    fn on_click(
        &self,
        key: &EntityKey,
        _view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> ClickAction {
        match key.as_str() {
            ZOOM_IN_CONTROL_ID => ClickAction::AdjustView(ViewCommand::ZoomIn),
            ZOOM_OUT_CONTROL_ID => ClickAction::AdjustView(ViewCommand::ZoomOut),
            ZOOM_RESET_CONTROL_ID => ClickAction::AdjustView(ViewCommand::ResetZoom),
            _ => ClickAction::None,
        }
    }

    /// Zooms about the viewport centre within `ZoomTransform`'s scale limits.
    fn apply_view(&mut self, command: ViewCommand) -> bool {
        let center = self.viewport.center();
        let next = match command {
            ViewCommand::ZoomIn => self.zoom.zoomed_about(ZOOM_IN_FACTOR, center),
            ViewCommand::ZoomOut => self.zoom.zoomed_about(ZOOM_OUT_FACTOR, center),
            ViewCommand::ResetZoom => ZoomTransform::IDENTITY,
        };
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    /// Pinpoints for the selected events that are part of the current view.
    fn accept_relay(
        &self,
        payload: &InteractionPayload,
        view: &FilteredView<'_>,
    ) -> DashboardResult<Vec<OverlayItem>> {
        let InteractionPayload::SelectEvents(keys) = payload else {
            return Ok(Vec::new());
        };
        let pinpoints: Vec<Pinpoint> = keys
            .iter()
            .filter_map(|key| view.event(key.as_str()))
            .map(Pinpoint::for_event)
            .collect();
        Ok(place_pinpoints(
            &pinpoints,
            &self.zoomed(),
            self.pinpoint_style,
        ))
    }
}
