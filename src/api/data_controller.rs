use tracing::{debug, info, warn};

use crate::core::RevenueRecord;
use crate::data::{DataSource, DatasetKind, DatasetLoader, ParsedTable, Table};
use crate::error::{DashboardResult, LoadError};
use crate::extensions::DashboardEvent;
use crate::render::Renderer;

use super::{
    ChangeTopic, ChangeTopics, Dashboard, FetchOutcome, FetchTicket, RedrawReport, RedrawRequest,
};

/// What `Dashboard::load_all` managed to install.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<DatasetKind>,
    pub revenue_years: Vec<i32>,
    pub failures: Vec<LoadError>,
    pub skipped_rows: usize,
    pub report: RedrawReport,
}

impl LoadSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<R: Renderer> Dashboard<R> {
    /// Loads every dataset, installs what succeeded and runs one pass.
    ///
    /// A failed source leaves only its dependent charts blank. Revenue years
    /// are fetched as a join; when the join fails each year is retried on
    /// its own so one missing year does not hide the others. Every year that
    /// still fails is reported in `LoadSummary::failures`.
    pub fn load_all<S: DataSource>(
        &mut self,
        loader: &DatasetLoader<S>,
    ) -> DashboardResult<LoadSummary> {
        self.ensure_idle()?;
        let mut summary = LoadSummary::default();

        match loader.load_events() {
            Ok(table) => {
                summary.skipped_rows += table.skipped;
                self.datasets.install_events(table.rows);
                summary.loaded.push(DatasetKind::Events);
            }
            Err(error) => self.record_load_failure(error, &mut summary),
        }
        match loader.load_gdp() {
            Ok(table) => {
                summary.skipped_rows += table.skipped;
                self.datasets.install_gdp(table.rows);
                summary.loaded.push(DatasetKind::Gdp);
            }
            Err(error) => self.record_load_failure(error, &mut summary),
        }
        match loader.load_world() {
            Ok(world) => {
                self.datasets.install_world(world);
                summary.loaded.push(DatasetKind::World);
            }
            Err(error) => self.record_load_failure(error, &mut summary),
        }

        let years = self.config.revenue_year_list();
        match loader.load_revenue_years(&years) {
            Ok(tables) => {
                for (year, table) in tables {
                    self.install_revenue_table(year, table, &mut summary);
                }
            }
            Err(error) => {
                debug!(%error, "revenue join failed, retrying each year");
                for year in years {
                    match loader.load_revenue_year(year) {
                        Ok(table) => self.install_revenue_table(year, table, &mut summary),
                        Err(error) => self.record_load_failure(error, &mut summary),
                    }
                }
            }
        }
        if !summary.revenue_years.is_empty() {
            summary.loaded.push(DatasetKind::Revenue);
        }

        let topics = self.refresh_year_domain();
        summary.report = self.run_pass(RedrawRequest::topics(topics))?;
        info!(
            loaded = summary.loaded.len(),
            failed = summary.failures.len(),
            skipped_rows = summary.skipped_rows,
            revenue_years = summary.revenue_years.len(),
            "datasets loaded"
        );
        Ok(summary)
    }

    /// Installs one already-loaded table and redraws what depends on data.
    pub fn install(&mut self, table: Table) -> DashboardResult<RedrawReport> {
        self.ensure_idle()?;
        debug!(kind = ?table.kind(), "installing dataset");
        self.datasets.install(table);
        let topics = self.refresh_year_domain();
        self.run_pass(RedrawRequest::topics(topics))
    }

    /// Issues a ticket for an asynchronous fetch of one revenue year.
    pub fn begin_revenue_fetch(&mut self, year: i32) -> FetchTicket {
        let ticket = self.fetches.issue(year);
        debug!(year, generation = ticket.generation, "revenue fetch issued");
        ticket
    }

    /// Applies a finished fetch if it still matches the selection.
    ///
    /// A result for a year that is no longer selected, or superseded by a
    /// newer ticket, is dropped without installing anything.
    pub fn complete_revenue_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ParsedTable<RevenueRecord>, LoadError>,
    ) -> DashboardResult<FetchOutcome> {
        self.ensure_idle()?;
        let current_year = self.filter.selected_year();
        if !self.fetches.accepts(ticket, current_year) {
            debug!(
                year = ticket.year,
                generation = ticket.generation,
                current_year,
                "discarding stale revenue fetch"
            );
            self.emit(DashboardEvent::FetchDiscarded {
                year: ticket.year,
                current_year,
            });
            return Ok(FetchOutcome::Discarded {
                ticket,
                current_year,
            });
        }
        self.fetches.settle(ticket);

        match result {
            Ok(table) => {
                self.datasets.install_revenue_year(ticket.year, table.rows);
                let topics = self.refresh_year_domain();
                Ok(FetchOutcome::Applied(
                    self.run_pass(RedrawRequest::topics(topics))?,
                ))
            }
            Err(error) => {
                warn!(year = ticket.year, error = %error, "revenue fetch failed");
                self.emit(DashboardEvent::DatasetLoadFailed {
                    source_name: error.source_name().to_owned(),
                    reason: error.to_string(),
                });
                Ok(FetchOutcome::Failed(error))
            }
        }
    }

    /// Fetches `year` through `loader` and applies it in one step.
    pub fn fetch_revenue_year<S: DataSource>(
        &mut self,
        loader: &DatasetLoader<S>,
        year: i32,
    ) -> DashboardResult<FetchOutcome> {
        let ticket = self.begin_revenue_fetch(year);
        let result = loader.load_revenue_year(year);
        self.complete_revenue_fetch(ticket, result)
    }

    fn install_revenue_table(
        &mut self,
        year: i32,
        table: ParsedTable<RevenueRecord>,
        summary: &mut LoadSummary,
    ) {
        summary.skipped_rows += table.skipped;
        self.datasets.install_revenue_year(year, table.rows);
        summary.revenue_years.push(year);
    }

    fn record_load_failure(&mut self, error: LoadError, summary: &mut LoadSummary) {
        warn!(source = error.source_name(), error = %error, "dataset failed to load");
        self.emit(DashboardEvent::DatasetLoadFailed {
            source_name: error.source_name().to_owned(),
            reason: error.to_string(),
        });
        summary.failures.push(error);
    }

    /// Re-derives the year domain from installed data; always reports a
    /// dataset change.
    fn refresh_year_domain(&mut self) -> ChangeTopics {
        let previous = self.filter.drill_down().cloned();
        let domain = self
            .datasets
            .observed_years()
            .unwrap_or(self.config.fallback_year_range);
        let topics = self.filter.set_year_domain(domain);
        if topics.contains_topic(ChangeTopic::Year) {
            self.emit(DashboardEvent::FilterChanged { topics });
        }
        if topics.contains_topic(ChangeTopic::DrillDown)
            && let Some(previous) = previous
        {
            self.emit(DashboardEvent::DrillDownChanged {
                chart_id: previous.chart_id,
                entity: None,
            });
        }
        topics
    }
}
