use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{EventRecord, EventType};

/// Per-year totals over the whole conflict table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyConflictMetrics {
    pub year: i32,
    pub total_fatalities: u64,
    pub total_events: usize,
    pub events_by_type: BTreeMap<EventType, usize>,
}

impl YearlyConflictMetrics {
    #[must_use]
    pub fn events_of(&self, event_type: EventType) -> usize {
        self.events_by_type.get(&event_type).copied().unwrap_or(0)
    }
}

/// Aggregates events by year, ascending.
#[must_use]
pub fn yearly_metrics<'a>(
    events: impl IntoIterator<Item = &'a EventRecord>,
) -> Vec<YearlyConflictMetrics> {
    let mut by_year: BTreeMap<i32, YearlyConflictMetrics> = BTreeMap::new();
    for event in events {
        let entry = by_year
            .entry(event.year)
            .or_insert_with(|| YearlyConflictMetrics {
                year: event.year,
                total_fatalities: 0,
                total_events: 0,
                events_by_type: BTreeMap::new(),
            });
        entry.total_fatalities += u64::from(event.fatalities);
        entry.total_events += 1;
        *entry.events_by_type.entry(event.event_type).or_insert(0) += 1;
    }
    by_year.into_values().collect()
}

/// Named `(year, value)` series derived from yearly metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    pub values: Vec<(i32, f64)>,
}

pub const FATALITIES_SERIES: &str = "Fatalities";
pub const TOTAL_EVENTS_SERIES: &str = "Total Events";

/// Fatalities, total events, then one series per event type seen in the data.
#[must_use]
pub fn metric_series(metrics: &[YearlyConflictMetrics]) -> Vec<MetricSeries> {
    let mut series = vec![
        MetricSeries {
            name: FATALITIES_SERIES.to_owned(),
            values: metrics
                .iter()
                .map(|entry| (entry.year, entry.total_fatalities as f64))
                .collect(),
        },
        MetricSeries {
            name: TOTAL_EVENTS_SERIES.to_owned(),
            values: metrics
                .iter()
                .map(|entry| (entry.year, entry.total_events as f64))
                .collect(),
        },
    ];

    for event_type in EventType::ALL {
        if metrics
            .iter()
            .all(|entry| !entry.events_by_type.contains_key(&event_type))
        {
            continue;
        }
        series.push(MetricSeries {
            name: event_type.label().to_owned(),
            values: metrics
                .iter()
                .map(|entry| (entry.year, entry.events_of(event_type) as f64))
                .collect(),
        });
    }
    series
}
