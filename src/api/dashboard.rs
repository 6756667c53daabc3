use crate::core::{ChartId, EntityKey};
use crate::data::Datasets;
use crate::error::{DashboardError, DashboardResult};
use crate::extensions::{DashboardEvent, DashboardObserver};
use crate::interaction::{HoverState, TooltipStyle};
use crate::render::Renderer;

use super::{
    ChartOverlays, ChartRedrawStatus, ChartRegistry, CrossChartBridge, DashboardChart,
    DashboardConfig, FetchTracker, FilterState, RedrawCoordinator, RedrawReport, RedrawRequest,
};

/// Main orchestration facade consumed by host applications.
///
/// `Dashboard` owns the shared filter state, the loaded datasets and every
/// registered chart. Each successful setter runs exactly one redraw pass;
/// hover and cross-chart relays only touch overlays.
pub struct Dashboard<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: DashboardConfig,
    pub(super) filter: FilterState,
    pub(super) datasets: Datasets,
    pub(super) registry: ChartRegistry,
    pub(super) coordinator: RedrawCoordinator,
    pub(super) bridge: CrossChartBridge,
    pub(super) fetches: FetchTracker,
    pub(super) hover: HoverState,
    pub(super) tooltip_style: TooltipStyle,
    pub(super) observers: Vec<Box<dyn DashboardObserver>>,
}

impl<R: Renderer> Dashboard<R> {
    /// Creates a dashboard with no charts and no datasets.
    ///
    /// The year domain starts as the configured fallback range until data
    /// is installed.
    pub fn new(renderer: R, config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let filter = FilterState::new(config.initial_year, config.fallback_year_range)?;
        let datasets = Datasets::new(config.revenue_year_list());
        let coordinator = RedrawCoordinator::new(config.transitions);
        Ok(Self {
            renderer,
            config,
            filter,
            datasets,
            registry: ChartRegistry::new(),
            coordinator,
            bridge: CrossChartBridge,
            fetches: FetchTracker::new(),
            hover: HoverState::default(),
            tooltip_style: TooltipStyle::default(),
            observers: Vec::new(),
        })
    }

    /// Registers the six standard charts built from the configuration.
    pub fn with_standard_charts(mut self) -> DashboardResult<Self> {
        for chart in crate::charts::standard_charts(&self.config) {
            self.register_chart(chart)?;
        }
        Ok(self)
    }

    pub fn register_chart(&mut self, chart: Box<dyn DashboardChart>) -> DashboardResult<()> {
        self.registry.register(chart)
    }

    #[must_use]
    pub fn with_tooltip_style(mut self, style: TooltipStyle) -> Self {
        self.tooltip_style = style;
        self
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    #[must_use]
    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    #[must_use]
    pub fn hover_state(&self) -> &HoverState {
        &self.hover
    }

    #[must_use]
    pub fn passes(&self) -> u64 {
        self.coordinator.passes()
    }

    /// Keys drawn by `chart_id` in its last successful pass.
    pub fn rendered_keys(&self, chart_id: &ChartId) -> DashboardResult<Vec<EntityKey>> {
        let slot = self.registry.require_slot(chart_id)?;
        Ok(slot.last_rendered_keys().iter().cloned().collect())
    }

    pub fn overlays(&self, chart_id: &ChartId) -> DashboardResult<&ChartOverlays> {
        Ok(self.registry.require_slot(chart_id)?.overlays())
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub(super) fn ensure_idle(&self) -> DashboardResult<()> {
        if self.coordinator.is_in_progress() {
            return Err(DashboardError::RedrawInProgress);
        }
        Ok(())
    }

    /// Runs one redraw pass and reports its outcome to observers.
    pub(super) fn run_pass(&mut self, request: RedrawRequest) -> DashboardResult<RedrawReport> {
        let report = self.coordinator.recompute_and_redraw(
            &request,
            &self.filter,
            &self.datasets,
            &mut self.registry,
            &mut self.renderer,
        )?;

        // A structural redraw tears the hovered chart's tooltip down.
        let hovered_chart_redrew = self.hover.target().is_some_and(|target| {
            report
                .outcome(&target.chart_id)
                .is_some_and(|status| !matches!(status, ChartRedrawStatus::Failed(_)))
        });
        if hovered_chart_redrew {
            self.hover.on_pointer_leave();
        }

        for outcome in &report.outcomes {
            match &outcome.status {
                ChartRedrawStatus::Redrawn(counts) => self.emit(DashboardEvent::ChartRedrawn {
                    chart_id: outcome.chart_id.clone(),
                    counts: *counts,
                }),
                ChartRedrawStatus::Failed(reason) => self.emit(DashboardEvent::ChartFailed {
                    chart_id: outcome.chart_id.clone(),
                    reason: reason.clone(),
                }),
                ChartRedrawStatus::Unrendered => {}
            }
        }
        self.emit(DashboardEvent::PassCompleted {
            pass: report.pass,
            redrawn: report.redrawn(),
            failed: report.failed(),
        });
        Ok(report)
    }
}
