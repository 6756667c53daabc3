use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{EventRecord, GdpSeries, RevenueRecord, YearRange};
use crate::data::WorldGeometry;

/// Rows kept from one source plus the count dropped by data-quality rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> ParsedTable<T> {
    #[must_use]
    pub fn new(rows: Vec<T>, skipped: usize) -> Self {
        Self { rows, skipped }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for ParsedTable<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// One normalized dataset as returned by `DatasetLoader::load`.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Revenue {
        year: i32,
        table: ParsedTable<RevenueRecord>,
    },
    Gdp(ParsedTable<GdpSeries>),
    Events(ParsedTable<EventRecord>),
    World(WorldGeometry),
}

impl Table {
    #[must_use]
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Revenue { .. } => DatasetKind::Revenue,
            Self::Gdp(_) => DatasetKind::Gdp,
            Self::Events(_) => DatasetKind::Events,
            Self::World(_) => DatasetKind::World,
        }
    }
}

/// Dataset a chart may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Events,
    /// Revenue rows of the selected year.
    Revenue,
    /// Revenue rows of every configured year.
    RevenueHistory,
    Gdp,
    World,
}

impl DatasetKind {
    const fn bit(self) -> u8 {
        match self {
            Self::Events => 1 << 0,
            Self::Revenue => 1 << 1,
            Self::RevenueHistory => 1 << 2,
            Self::Gdp => 1 << 3,
            Self::World => 1 << 4,
        }
    }
}

/// Bitmask of dataset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DatasetKinds {
    bits: u8,
}

impl DatasetKinds {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn with(self, kind: DatasetKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, kind: DatasetKind) -> bool {
        (self.bits & kind.bit()) != 0
    }

    /// `true` when every kind in `required` is present in `self`.
    #[must_use]
    pub const fn covers(self, required: Self) -> bool {
        (self.bits & required.bits) == required.bits
    }
}

impl FromIterator<DatasetKind> for DatasetKinds {
    fn from_iter<I: IntoIterator<Item = DatasetKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// Read-only tables installed after loading.
///
/// A table that has not been installed is absent, never partial: charts that
/// need it stay unrendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    events: Option<Vec<EventRecord>>,
    revenue: BTreeMap<i32, Vec<RevenueRecord>>,
    gdp: Option<Vec<GdpSeries>>,
    world: Option<WorldGeometry>,
    expected_revenue_years: Vec<i32>,
}

impl Datasets {
    #[must_use]
    pub fn new(expected_revenue_years: Vec<i32>) -> Self {
        Self {
            expected_revenue_years,
            ..Self::default()
        }
    }

    pub fn install(&mut self, table: Table) {
        match table {
            Table::Revenue { year, table } => self.install_revenue_year(year, table.rows),
            Table::Gdp(table) => self.gdp = Some(table.rows),
            Table::Events(table) => self.events = Some(table.rows),
            Table::World(world) => self.world = Some(world),
        }
    }

    pub fn install_events(&mut self, events: Vec<EventRecord>) {
        self.events = Some(events);
    }

    pub fn install_revenue_year(&mut self, year: i32, rows: Vec<RevenueRecord>) {
        self.revenue.insert(year, rows);
    }

    pub fn install_gdp(&mut self, series: Vec<GdpSeries>) {
        self.gdp = Some(series);
    }

    pub fn install_world(&mut self, world: WorldGeometry) {
        self.world = Some(world);
    }

    #[must_use]
    pub fn events(&self) -> Option<&[EventRecord]> {
        self.events.as_deref()
    }

    #[must_use]
    pub fn revenue_for(&self, year: i32) -> Option<&[RevenueRecord]> {
        self.revenue.get(&year).map(Vec::as_slice)
    }

    /// Loaded revenue years, ascending.
    pub fn revenue_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.revenue.keys().copied()
    }

    #[must_use]
    pub fn gdp(&self) -> Option<&[GdpSeries]> {
        self.gdp.as_deref()
    }

    #[must_use]
    pub fn world(&self) -> Option<&WorldGeometry> {
        self.world.as_ref()
    }

    /// Datasets usable when `year` is selected.
    #[must_use]
    pub fn available(&self, year: i32) -> DatasetKinds {
        let mut kinds = DatasetKinds::none();
        if self.events.is_some() {
            kinds = kinds.with(DatasetKind::Events);
        }
        if self.revenue.contains_key(&year) {
            kinds = kinds.with(DatasetKind::Revenue);
        }
        let history_complete = !self.revenue.is_empty()
            && self
                .expected_revenue_years
                .iter()
                .all(|expected| self.revenue.contains_key(expected));
        if history_complete {
            kinds = kinds.with(DatasetKind::RevenueHistory);
        }
        if self.gdp.is_some() {
            kinds = kinds.with(DatasetKind::Gdp);
        }
        if self.world.is_some() {
            kinds = kinds.with(DatasetKind::World);
        }
        kinds
    }

    /// Years observed across loaded events and loaded revenue years.
    #[must_use]
    pub fn observed_years(&self) -> Option<YearRange> {
        let event_years = self
            .events
            .iter()
            .flat_map(|events| events.iter().map(|event| event.year));
        YearRange::spanning(event_years.chain(self.revenue_years()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetKind, DatasetKinds, Datasets};
    use crate::core::{RevenueRecord, YearRange};

    #[test]
    fn coverage_requires_every_kind() {
        let have = DatasetKinds::none()
            .with(DatasetKind::Events)
            .with(DatasetKind::World);
        let need: DatasetKinds = [DatasetKind::Events, DatasetKind::World].into_iter().collect();
        assert!(have.covers(need));
        assert!(!have.covers(need.with(DatasetKind::Gdp)));
        assert!(have.covers(DatasetKinds::none()));
    }

    #[test]
    fn revenue_history_needs_every_expected_year() {
        let mut datasets = Datasets::new(vec![2019, 2020]);
        datasets.install_revenue_year(2019, vec![RevenueRecord::new(2019, "A", "France", 1.0)]);
        let available = datasets.available(2019);
        assert!(available.contains(DatasetKind::Revenue));
        assert!(!available.contains(DatasetKind::RevenueHistory));
        assert!(!datasets.available(2020).contains(DatasetKind::Revenue));

        datasets.install_revenue_year(2020, Vec::new());
        assert!(datasets.available(2020).contains(DatasetKind::RevenueHistory));
        assert_eq!(
            datasets.observed_years(),
            Some(YearRange { start: 2019, end: 2020 })
        );
    }
}
