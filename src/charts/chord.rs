use std::f64::consts::PI;

use crate::api::{
    ChangeTopic, ChangeTopics, ChartScene, ClickAction, DashboardChart, DrillDownState,
    FilteredView, InteractionPayload, KeyIdentity,
};
use crate::core::{
    ChartId, ChordLayout, ChordRibbon, EntityKey, EventRecord, RelationshipMatrix, Viewport,
    chord_layout,
};
use crate::data::{DatasetKind, DatasetKinds};
use crate::error::DashboardResult;
use crate::render::{
    ArcPrimitive, CanvasLayerKind, Primitive, RibbonPrimitive, TextHAlign, TextPrimitive,
};

use super::palette::{CHORD_SET, hex, ordinal};

const PAD_ANGLE: f64 = 0.05;

/// Actor-to-actor interaction chord diagram over the filtered events.
///
/// Rebuilt from scratch on every pass; ribbon clicks relay the matching
/// events to the map as pinpoints.
pub struct ActorChordChart {
    id: ChartId,
    viewport: Viewport,
    event_limit: usize,
    relay_target: ChartId,
}

struct ChordModel<'v> {
    events: &'v [&'v EventRecord],
    matrix: RelationshipMatrix,
    layout: ChordLayout,
}

impl ActorChordChart {
    #[must_use]
    pub fn new(viewport: Viewport, event_limit: usize) -> Self {
        Self {
            id: ChartId::new(ChartId::CHORD),
            viewport,
            event_limit,
            relay_target: ChartId::new(ChartId::MAP),
        }
    }

    #[must_use]
    pub fn with_relay_target(mut self, target: ChartId) -> Self {
        self.relay_target = target;
        self
    }

    /// Only the first `event_limit` filtered events feed the diagram.
    fn model<'v>(&self, view: &'v FilteredView<'_>) -> ChordModel<'v> {
        let events = view.events();
        let events = &events[..events.len().min(self.event_limit)];
        let matrix = RelationshipMatrix::from_events(events.iter().copied()).pruned();
        let layout = chord_layout(&matrix, PAD_ANGLE);
        ChordModel {
            events,
            matrix,
            layout,
        }
    }

    fn inner_radius(&self) -> f64 {
        f64::from(self.viewport.width.min(self.viewport.height)) * 0.24
    }
}

impl ChordModel<'_> {
    fn pair(&self, ribbon: &ChordRibbon) -> Option<(&str, &str)> {
        Some((
            self.matrix.actor(ribbon.source.index)?,
            self.matrix.actor(ribbon.target.index)?,
        ))
    }

    fn ribbon_for(&self, key: &EntityKey) -> Option<(&str, &str, u32)> {
        self.layout.ribbons.iter().find_map(|ribbon| {
            let (source, target) = self.pair(ribbon)?;
            (ribbon_key(source, target) == *key).then_some((source, target, ribbon.value))
        })
    }
}

fn ribbon_key(source: &str, target: &str) -> EntityKey {
    EntityKey::scoped("ribbon", format!("{source}|{target}"))
}

impl DashboardChart for ActorChordChart {
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
    }

    fn requirements(&self) -> DatasetKinds {
        [DatasetKind::Events].into_iter().collect()
    }

    fn identity(&self) -> KeyIdentity {
        KeyIdentity::Rebuilt
    }

    fn build_scene(
        &self,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> DashboardResult<ChartScene> {
        let model = self.model(view);
        let (cx, cy) = self.viewport.center();
        let inner_radius = self.inner_radius();
        let outer_radius = inner_radius * 1.05;
        let mut scene = ChartScene::new();

        for group in &model.layout.groups {
            let Some(actor) = model.matrix.actor(group.index) else {
                continue;
            };
            scene.push(
                EntityKey::scoped("actor", actor),
                CanvasLayerKind::Marks,
                Primitive::Arc(ArcPrimitive {
                    cx,
                    cy,
                    inner_radius,
                    outer_radius,
                    start_angle: group.start_angle,
                    end_angle: group.end_angle,
                    fill: ordinal(&CHORD_SET, group.index),
                }),
            )?;

            let angle = (group.start_angle + group.end_angle) / 2.0;
            let label_radius = outer_radius + 10.0;
            scene.push(
                EntityKey::scoped("label", actor),
                CanvasLayerKind::Labels,
                Primitive::Text(TextPrimitive::new(
                    actor,
                    cx + label_radius * angle.sin(),
                    cy - label_radius * angle.cos(),
                    10.0,
                    hex(0x000000),
                    if angle > PI {
                        TextHAlign::Right
                    } else {
                        TextHAlign::Left
                    },
                )),
            )?;
        }

        for ribbon in &model.layout.ribbons {
            let Some((source, target)) = model.pair(ribbon) else {
                continue;
            };
            scene.push(
                ribbon_key(source, target),
                CanvasLayerKind::Marks,
                Primitive::Ribbon(RibbonPrimitive {
                    cx,
                    cy,
                    radius: inner_radius,
                    source_angles: (ribbon.source.start_angle, ribbon.source.end_angle),
                    target_angles: (ribbon.target.start_angle, ribbon.target.end_angle),
                    fill: ordinal(&CHORD_SET, ribbon.source.index).with_alpha(0.75),
                }),
            )?;
        }
        Ok(scene)
    }

    fn describe(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> Option<String> {
        let model = self.model(view);
        if let Some(actor) = key.strip_scope("actor") {
            let index = model.matrix.index_of(actor)?;
            return Some(format!(
                "{actor}\nTotal Interactions: {}",
                model.matrix.row_total(index)
            ));
        }
        let (source, target, count) = model.ribbon_for(key)?;
        Some(format!("{source} ↔ {target}\nInteractions: {count}"))
    }

    /// A ribbon click selects every diagram event between its two actors,
    /// in either order.
    fn on_click(
        &self,
        key: &EntityKey,
        view: &FilteredView<'_>,
        _drill: &DrillDownState,
    ) -> ClickAction {
        let model = self.model(view);
        let Some((source, target, _)) = model.ribbon_for(key) else {
            return ClickAction::None;
        };
        let selected = model
            .events
            .iter()
            .filter(|event| event.involves_pair(source, target))
            .map(|event| event.key())
            .collect();
        ClickAction::Relay {
            target: self.relay_target.clone(),
            payload: InteractionPayload::SelectEvents(selected),
        }
    }
}
