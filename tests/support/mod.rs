#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use battlelens::api::{Dashboard, DashboardConfig, TransitionTiming};
use battlelens::core::{EventRecord, EventType, GdpSeries, RevenueRecord, YearRange};
use battlelens::data::{ParsedTable, Table, WorldGeometry};
use battlelens::extensions::{DashboardEvent, DashboardObserver, ObserverContext};
use battlelens::render::NullRenderer;

pub fn event(
    id: &str,
    year: i32,
    event_type: EventType,
    actors: (Option<&str>, Option<&str>),
    fatalities: u32,
) -> EventRecord {
    EventRecord {
        id: id.to_owned(),
        year,
        event_date: None,
        event_type,
        location: "Aleppo".to_owned(),
        latitude: 36.2,
        longitude: 37.1,
        fatalities,
        actor1: actors.0.map(str::to_owned),
        actor2: actors.1.map(str::to_owned),
        notes: None,
    }
}

pub fn sample_events() -> Vec<EventRecord> {
    vec![
        event("SYR1", 2019, EventType::Battles, (Some("Army"), Some("Rebels")), 12),
        event("SYR2", 2019, EventType::Battles, (Some("Rebels"), Some("Army")), 3),
        event("SYR3", 2019, EventType::Protests, (Some("Protesters"), None), 0),
        event("SYR4", 2020, EventType::Battles, (Some("Army"), Some("Militia")), 7),
        event(
            "SYR5",
            2020,
            EventType::ExplosionsRemoteViolence,
            (Some("Air Force"), Some("Civilians")),
            20,
        ),
    ]
}

pub fn revenue_2019() -> Vec<RevenueRecord> {
    vec![
        RevenueRecord::new(2019, "Lockheed Martin", "United States", 60.0),
        RevenueRecord::new(2019, "Raytheon", "United States", 40.0),
        RevenueRecord::new(2019, "Thales", "France", 30.0),
        RevenueRecord::new(2019, "Elbit", "Israel", 10.0),
    ]
}

pub fn revenue_2020() -> Vec<RevenueRecord> {
    vec![
        RevenueRecord::new(2020, "Lockheed Martin", "United States", 65.0),
        RevenueRecord::new(2020, "Thales", "France", 35.0),
    ]
}

pub fn gdp() -> Vec<GdpSeries> {
    vec![GdpSeries {
        country: "United States".to_owned(),
        growth_by_year: vec![(2019, 2.3), (2020, -3.4)],
    }]
}

pub fn config() -> DashboardConfig {
    DashboardConfig::default().with_transitions(TransitionTiming::immediate())
}

pub fn empty_dashboard() -> Dashboard<NullRenderer> {
    empty_dashboard_with(config())
}

pub fn empty_dashboard_with(config: DashboardConfig) -> Dashboard<NullRenderer> {
    Dashboard::new(NullRenderer::default(), config)
        .and_then(Dashboard::with_standard_charts)
        .expect("dashboard init")
}

/// `config()` expecting revenue only for the two fixture years.
pub fn loaded_config() -> DashboardConfig {
    config().with_revenue_years(YearRange {
        start: 2019,
        end: 2020,
    })
}

/// Standard dashboard with events, world, gdp and revenue for 2019-2020.
pub fn loaded_dashboard() -> Dashboard<NullRenderer> {
    loaded_dashboard_with(loaded_config())
}

pub fn loaded_dashboard_with(config: DashboardConfig) -> Dashboard<NullRenderer> {
    let mut dashboard = empty_dashboard_with(config);
    for table in [
        Table::Events(ParsedTable::new(sample_events(), 0)),
        Table::World(WorldGeometry::default()),
        Table::Gdp(ParsedTable::new(gdp(), 0)),
        Table::Revenue {
            year: 2019,
            table: ParsedTable::new(revenue_2019(), 0),
        },
        Table::Revenue {
            year: 2020,
            table: ParsedTable::new(revenue_2020(), 0),
        },
    ] {
        dashboard.install(table).expect("install");
    }
    dashboard.set_year(2019).expect("select 2019");
    dashboard
}

/// Observer that records every event into a shared log.
pub struct RecordingObserver {
    id: String,
    pub log: Rc<RefCell<Vec<DashboardEvent>>>,
}

impl RecordingObserver {
    pub fn new(id: &str) -> (Self, Rc<RefCell<Vec<DashboardEvent>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                id: id.to_owned(),
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

impl DashboardObserver for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &DashboardEvent, _context: &ObserverContext) {
        self.log.borrow_mut().push(event.clone());
    }
}
