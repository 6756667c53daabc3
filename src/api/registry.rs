use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use crate::api::{DashboardChart, TransitionLedger};
use crate::core::{ChartId, EntityKey};
use crate::error::{DashboardError, DashboardResult};
use crate::render::OverlayItem;

/// Transient overlays owned by one chart, grouped by lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOverlays {
    pub legend: Vec<OverlayItem>,
    pub controls: Vec<OverlayItem>,
    pub annotations: Vec<OverlayItem>,
    pub tooltip: Vec<OverlayItem>,
}

impl ChartOverlays {
    /// Everything currently shown, back to front within the frame.
    #[must_use]
    pub fn items(&self) -> Vec<OverlayItem> {
        let mut items: Vec<OverlayItem> = self
            .controls
            .iter()
            .chain(&self.annotations)
            .chain(&self.legend)
            .chain(&self.tooltip)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.layer);
        items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.legend.len() + self.controls.len() + self.annotations.len() + self.tooltip.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn teardown(&mut self) {
        self.legend.clear();
        self.controls.clear();
        self.annotations.clear();
        self.tooltip.clear();
    }

    #[must_use]
    pub fn has_control(&self, id: &str) -> bool {
        self.controls.iter().any(|item| item.id == id)
    }
}

/// Registered chart plus the state the dashboard keeps for it.
pub struct ChartSlot {
    pub(crate) chart: Box<dyn DashboardChart>,
    pub(crate) last_rendered_keys: IndexSet<EntityKey>,
    pub(crate) ledger: TransitionLedger,
    pub(crate) overlays: ChartOverlays,
    pub(crate) rendered: bool,
}

impl ChartSlot {
    fn new(chart: Box<dyn DashboardChart>) -> Self {
        Self {
            chart,
            last_rendered_keys: IndexSet::new(),
            ledger: TransitionLedger::new(),
            overlays: ChartOverlays::default(),
            rendered: false,
        }
    }

    #[must_use]
    pub fn chart(&self) -> &dyn DashboardChart {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn last_rendered_keys(&self) -> &IndexSet<EntityKey> {
        &self.last_rendered_keys
    }

    #[must_use]
    pub fn overlays(&self) -> &ChartOverlays {
        &self.overlays
    }

    #[must_use]
    pub fn ledger(&self) -> &TransitionLedger {
        &self.ledger
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }
}

/// Charts in registration order.
#[derive(Default)]
pub struct ChartRegistry {
    slots: IndexMap<ChartId, ChartSlot>,
}

impl ChartRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chart under its id; a second chart with the same id is
    /// rejected and the first one stays.
    pub fn register(&mut self, chart: Box<dyn DashboardChart>) -> DashboardResult<()> {
        let chart_id = chart.id().clone();
        if chart_id.as_str().is_empty() {
            return Err(DashboardError::InvalidData(
                "chart id must not be empty".to_owned(),
            ));
        }
        chart.viewport().validate()?;
        if self.slots.contains_key(&chart_id) {
            warn!(chart = %chart_id, "rejecting duplicate chart registration");
            return Err(DashboardError::DuplicateChart(chart_id.to_string()));
        }
        self.slots.insert(chart_id, ChartSlot::new(chart));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, chart_id: &ChartId) -> Option<&dyn DashboardChart> {
        self.slots.get(chart_id).map(ChartSlot::chart)
    }

    #[must_use]
    pub fn slot(&self, chart_id: &ChartId) -> Option<&ChartSlot> {
        self.slots.get(chart_id)
    }

    pub(crate) fn require_slot(&self, chart_id: &ChartId) -> DashboardResult<&ChartSlot> {
        self.slots
            .get(chart_id)
            .ok_or_else(|| DashboardError::UnknownChart(chart_id.to_string()))
    }

    pub(crate) fn require_slot_mut(&mut self, chart_id: &ChartId) -> DashboardResult<&mut ChartSlot> {
        self.slots
            .get_mut(chart_id)
            .ok_or_else(|| DashboardError::UnknownChart(chart_id.to_string()))
    }

    pub fn for_each(&self, mut visit: impl FnMut(&ChartId, &dyn DashboardChart)) {
        for (chart_id, slot) in &self.slots {
            visit(chart_id, slot.chart());
        }
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = (&ChartId, &mut ChartSlot)> {
        self.slots.iter_mut()
    }

    pub fn slots(&self) -> impl Iterator<Item = (&ChartId, &ChartSlot)> {
        self.slots.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChartId> {
        self.slots.keys()
    }

    #[must_use]
    pub fn contains(&self, chart_id: &ChartId) -> bool {
        self.slots.contains_key(chart_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
