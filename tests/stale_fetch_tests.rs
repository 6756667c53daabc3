mod support;

use battlelens::api::FetchOutcome;
use battlelens::core::{ChartId, EntityKey, RevenueRecord};
use battlelens::data::ParsedTable;
use battlelens::extensions::DashboardEvent;
use battlelens::LoadError;

fn revised_2020() -> ParsedTable<RevenueRecord> {
    ParsedTable::new(
        vec![RevenueRecord::new(2020, "Leonardo", "Italy", 80.0)],
        0,
    )
}

#[test]
fn fetch_for_a_deselected_year_is_discarded() {
    let mut dashboard = support::loaded_dashboard();
    let (observer, log) = support::RecordingObserver::new("recorder");
    dashboard.register_observer(Box::new(observer)).expect("observer");

    let ticket = dashboard.begin_revenue_fetch(2020);
    let passes = dashboard.passes();
    let outcome = dashboard
        .complete_revenue_fetch(ticket, Ok(revised_2020()))
        .expect("complete");

    assert!(outcome.is_discarded());
    assert_eq!(dashboard.passes(), passes);
    let untouched = dashboard.datasets().revenue_for(2020).expect("2020 revenue");
    assert_eq!(untouched.len(), 2);
    assert!(log.borrow().iter().any(|event| matches!(
        event,
        DashboardEvent::FetchDiscarded { year: 2020, current_year: 2019 }
    )));
}

#[test]
fn only_the_newest_ticket_applies() {
    let mut dashboard = support::loaded_dashboard();
    dashboard.set_year(2020).expect("year");

    let older = dashboard.begin_revenue_fetch(2020);
    let newer = dashboard.begin_revenue_fetch(2020);
    let outcome = dashboard
        .complete_revenue_fetch(older, Ok(revised_2020()))
        .expect("older");
    assert!(outcome.is_discarded());

    let outcome = dashboard
        .complete_revenue_fetch(newer, Ok(revised_2020()))
        .expect("newer");
    assert!(outcome.is_applied());
    let keys = dashboard
        .rendered_keys(&ChartId::new(ChartId::REVENUE_BAR))
        .expect("keys");
    assert!(keys.contains(&EntityKey::new("bar:Italy/0")));

    let replay = dashboard
        .complete_revenue_fetch(newer, Ok(ParsedTable::default()))
        .expect("replay");
    assert!(replay.is_discarded());
}

#[test]
fn year_change_during_fetch_keeps_the_new_view() {
    let mut dashboard = support::loaded_dashboard();
    let ticket = dashboard.begin_revenue_fetch(2019);
    dashboard.set_year(2020).expect("year moved on");
    let before = dashboard.snapshot();

    let outcome = dashboard
        .complete_revenue_fetch(ticket, Ok(ParsedTable::default()))
        .expect("complete");
    assert!(matches!(
        outcome,
        FetchOutcome::Discarded { current_year: 2020, .. }
    ));
    assert_eq!(dashboard.snapshot(), before);
}

#[test]
fn failed_fetch_is_reported_not_installed() {
    let mut dashboard = support::loaded_dashboard();
    let (observer, log) = support::RecordingObserver::new("recorder");
    dashboard.register_observer(Box::new(observer)).expect("observer");

    let ticket = dashboard.begin_revenue_fetch(2019);
    let outcome = dashboard
        .complete_revenue_fetch(
            ticket,
            Err(LoadError::Io {
                source_name: "2019.csv".to_owned(),
                reason: "not found".to_owned(),
            }),
        )
        .expect("complete");
    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(dashboard.datasets().revenue_for(2019).map(<[_]>::len), Some(4));
    assert!(log
        .borrow()
        .iter()
        .any(|event| matches!(event, DashboardEvent::DatasetLoadFailed { .. })));
}
