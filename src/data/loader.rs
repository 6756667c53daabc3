use tracing::{debug, warn};

use crate::core::{EventRecord, GdpSeries, RevenueRecord, YearRange};
use crate::data::event_csv::parse_event_csv;
use crate::data::gdp_csv::parse_gdp_csv;
use crate::data::geometry::parse_world_geometry;
use crate::data::revenue_csv::parse_revenue_csv;
use crate::data::{DataPaths, DataSource, ParsedTable, SourceDescriptor, Table, WorldGeometry};
use crate::error::LoadError;

/// Fetches and normalizes the dashboard's static datasets.
///
/// The loader writes no shared state; callers decide where returned tables
/// are installed.
#[derive(Debug, Clone)]
pub struct DatasetLoader<S: DataSource> {
    source: S,
    paths: DataPaths,
    gdp_window: YearRange,
}

impl<S: DataSource> DatasetLoader<S> {
    #[must_use]
    pub fn new(source: S, paths: DataPaths, gdp_window: YearRange) -> Self {
        Self {
            source,
            paths,
            gdp_window,
        }
    }

    #[must_use]
    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load(&self, descriptor: SourceDescriptor) -> Result<Table, LoadError> {
        let location = self.paths.locate(descriptor);
        let result = self
            .source
            .fetch_text(&location)
            .and_then(|text| self.parse(descriptor, &location, &text));
        match &result {
            Ok(table) => debug!(?descriptor, kind = ?table.kind(), location = %location, "dataset loaded"),
            Err(error) => warn!(?descriptor, error = %error, "error loading data"),
        }
        result
    }

    fn parse(
        &self,
        descriptor: SourceDescriptor,
        location: &str,
        text: &str,
    ) -> Result<Table, LoadError> {
        Ok(match descriptor {
            SourceDescriptor::YearlyRevenue(year) => Table::Revenue {
                year,
                table: parse_revenue_csv(location, year, text)?,
            },
            SourceDescriptor::Gdp => Table::Gdp(parse_gdp_csv(location, text, self.gdp_window)?),
            SourceDescriptor::ConflictEvents => Table::Events(parse_event_csv(location, text)?),
            SourceDescriptor::WorldGeometry => Table::World(parse_world_geometry(location, text)?),
        })
    }

    pub fn load_revenue_year(&self, year: i32) -> Result<ParsedTable<RevenueRecord>, LoadError> {
        match self.load(SourceDescriptor::YearlyRevenue(year))? {
            Table::Revenue { table, .. } => Ok(table),
            other => Err(unexpected_table(&self.paths, SourceDescriptor::YearlyRevenue(year), &other)),
        }
    }

    pub fn load_events(&self) -> Result<ParsedTable<EventRecord>, LoadError> {
        match self.load(SourceDescriptor::ConflictEvents)? {
            Table::Events(table) => Ok(table),
            other => Err(unexpected_table(&self.paths, SourceDescriptor::ConflictEvents, &other)),
        }
    }

    pub fn load_gdp(&self) -> Result<ParsedTable<GdpSeries>, LoadError> {
        match self.load(SourceDescriptor::Gdp)? {
            Table::Gdp(table) => Ok(table),
            other => Err(unexpected_table(&self.paths, SourceDescriptor::Gdp, &other)),
        }
    }

    pub fn load_world(&self) -> Result<WorldGeometry, LoadError> {
        match self.load(SourceDescriptor::WorldGeometry)? {
            Table::World(world) => Ok(world),
            other => Err(unexpected_table(&self.paths, SourceDescriptor::WorldGeometry, &other)),
        }
    }

    /// Fetches every year and joins the results: all succeed or the first
    /// failure (in year order) is surfaced with the failure count.
    pub fn load_revenue_years(
        &self,
        years: &[i32],
    ) -> Result<Vec<(i32, ParsedTable<RevenueRecord>)>, LoadError> {
        let results = self.fetch_years(years);
        let requested = results.len();
        let mut tables = Vec::with_capacity(requested);
        let mut failures = Vec::new();
        for (year, result) in years.iter().copied().zip(results) {
            match result {
                Ok(table) => tables.push((year, table)),
                Err(error) => failures.push(error),
            }
        }
        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(tables),
            Some(first) => Err(LoadError::Join {
                requested,
                failed,
                first: Box::new(first),
            }),
        }
    }

    #[cfg(feature = "parallel-loading")]
    fn fetch_years(&self, years: &[i32]) -> Vec<Result<ParsedTable<RevenueRecord>, LoadError>> {
        use rayon::prelude::*;

        years
            .par_iter()
            .map(|&year| self.load_revenue_year(year))
            .collect()
    }

    #[cfg(not(feature = "parallel-loading"))]
    fn fetch_years(&self, years: &[i32]) -> Vec<Result<ParsedTable<RevenueRecord>, LoadError>> {
        years
            .iter()
            .map(|&year| self.load_revenue_year(year))
            .collect()
    }
}

fn unexpected_table(paths: &DataPaths, descriptor: SourceDescriptor, table: &Table) -> LoadError {
    LoadError::Io {
        source_name: paths.locate(descriptor),
        reason: format!("parsed as {:?} table", table.kind()),
    }
}
