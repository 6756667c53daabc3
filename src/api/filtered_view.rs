use std::collections::HashMap;

use crate::api::FilterState;
use crate::core::{EventRecord, EventTypeSet, RevenueRecord};
use crate::data::Datasets;

/// Records matching the current selection, borrowed from the loaded tables.
///
/// Recomputed at the start of every redraw pass; charts never see a table
/// that is still loading.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    year: i32,
    event_types: EventTypeSet,
    events: Vec<&'a EventRecord>,
    by_id: HashMap<&'a str, &'a EventRecord>,
    datasets: &'a Datasets,
}

impl<'a> FilteredView<'a> {
    /// Keeps events whose year equals the selected year and whose category is
    /// enabled.
    #[must_use]
    pub fn compute(datasets: &'a Datasets, filter: &FilterState) -> Self {
        let year = filter.selected_year();
        let event_types = filter.enabled_event_types();
        let all = datasets.events().unwrap_or_default();
        let events = filter_events(all, year, event_types);
        let mut by_id = HashMap::with_capacity(events.len());
        for event in &events {
            by_id.entry(event.id.as_str()).or_insert(*event);
        }
        Self {
            year,
            event_types,
            events,
            by_id,
            datasets,
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn event_types(&self) -> EventTypeSet {
        self.event_types
    }

    #[must_use]
    pub fn events(&self) -> &[&'a EventRecord] {
        &self.events
    }

    /// The whole event table, ignoring the selection.
    #[must_use]
    pub fn all_events(&self) -> &'a [EventRecord] {
        self.datasets.events().unwrap_or_default()
    }

    /// Selected event by id; the first row wins when ids repeat.
    #[must_use]
    pub fn event(&self, id: &str) -> Option<&'a EventRecord> {
        self.by_id.get(id).copied()
    }

    /// Revenue rows of the selected year.
    #[must_use]
    pub fn revenue(&self) -> Option<&'a [RevenueRecord]> {
        self.datasets.revenue_for(self.year)
    }

    #[must_use]
    pub fn datasets(&self) -> &'a Datasets {
        self.datasets
    }
}

fn is_selected(event: &EventRecord, year: i32, event_types: EventTypeSet) -> bool {
    event.year == year && event_types.contains(event.event_type)
}

#[cfg(feature = "parallel-filter")]
fn filter_events(all: &[EventRecord], year: i32, event_types: EventTypeSet) -> Vec<&EventRecord> {
    use rayon::prelude::*;

    all.par_iter()
        .filter(|event| is_selected(event, year, event_types))
        .collect()
}

#[cfg(not(feature = "parallel-filter"))]
fn filter_events(all: &[EventRecord], year: i32, event_types: EventTypeSet) -> Vec<&EventRecord> {
    all.iter()
        .filter(|event| is_selected(event, year, event_types))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::FilteredView;
    use crate::api::FilterState;
    use crate::core::{EventRecord, EventType, YearRange};
    use crate::data::Datasets;

    fn event(id: &str, year: i32, fatalities: u32) -> EventRecord {
        EventRecord {
            id: id.to_owned(),
            year,
            event_date: None,
            event_type: EventType::Battles,
            location: "Homs".to_owned(),
            latitude: 34.7,
            longitude: 36.7,
            fatalities,
            actor1: None,
            actor2: None,
            notes: None,
        }
    }

    #[test]
    fn lookup_by_id_only_sees_selected_events() {
        let mut datasets = Datasets::new(Vec::new());
        datasets.install_events(vec![
            event("A", 2019, 1),
            event("B", 2020, 2),
            event("A", 2019, 3),
        ]);
        let filter = FilterState::new(2019, YearRange { start: 2019, end: 2020 }).expect("filter");
        let view = FilteredView::compute(&datasets, &filter);

        assert_eq!(view.events().len(), 2);
        assert_eq!(view.event("A").map(|event| event.fatalities), Some(1));
        assert!(view.event("B").is_none());
        assert!(view.event("missing").is_none());
    }
}
