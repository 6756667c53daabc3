mod support;

use battlelens::api::{ClickOutcome, InteractionPayload};
use battlelens::core::{ChartId, EntityKey};
use battlelens::DashboardError;

fn map() -> ChartId {
    ChartId::new(ChartId::MAP)
}

fn chord() -> ChartId {
    ChartId::new(ChartId::CHORD)
}

fn annotation_ids(dashboard: &battlelens::Dashboard<battlelens::render::NullRenderer>) -> Vec<String> {
    dashboard
        .snapshot()
        .chart(ChartId::MAP)
        .expect("map snapshot")
        .annotation_ids
        .clone()
}

#[test]
fn ribbon_click_pins_the_pair_events_on_the_map() {
    let mut dashboard = support::loaded_dashboard();
    let ribbon = EntityKey::new("ribbon:Army|Rebels");
    assert!(dashboard.rendered_keys(&chord()).expect("keys").contains(&ribbon));
    let passes = dashboard.passes();
    let filter = dashboard.filter().clone();

    let outcome = dashboard.click(&chord(), &ribbon).expect("click");
    let ClickOutcome::Relayed(report) = outcome else {
        panic!("expected a relay, got {outcome:?}");
    };
    assert_eq!(report.target, map());
    assert_eq!(report.annotations, 2);
    assert_eq!(report.cleared, 0);
    assert_eq!(annotation_ids(&dashboard), vec!["pin:SYR1", "pin:SYR2"]);

    assert_eq!(dashboard.passes(), passes);
    assert_eq!(dashboard.filter(), &filter);
}

#[test]
fn second_relay_replaces_the_first() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .relay(
            &chord(),
            &InteractionPayload::SelectEvents(vec![EntityKey::new("SYR1"), EntityKey::new("SYR2")]),
            &map(),
        )
        .expect("first relay");
    let report = dashboard
        .relay(
            &chord(),
            &InteractionPayload::SelectEvents(vec![EntityKey::new("SYR3")]),
            &map(),
        )
        .expect("second relay");
    assert_eq!(report.cleared, 2);
    assert_eq!(annotation_ids(&dashboard), vec!["pin:SYR3"]);

    let report = dashboard
        .relay(&chord(), &InteractionPayload::ClearAnnotations, &map())
        .expect("clear");
    assert_eq!(report.cleared, 1);
    assert!(annotation_ids(&dashboard).is_empty());
}

#[test]
fn events_outside_the_view_are_not_pinned() {
    let mut dashboard = support::loaded_dashboard();
    let report = dashboard
        .relay(
            &chord(),
            &InteractionPayload::SelectEvents(vec![EntityKey::new("SYR4"), EntityKey::new("nope")]),
            &map(),
        )
        .expect("relay");
    assert_eq!(report.annotations, 0);
}

#[test]
fn filter_change_tears_annotations_down() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .relay(
            &chord(),
            &InteractionPayload::SelectEvents(vec![EntityKey::new("SYR1")]),
            &map(),
        )
        .expect("relay");
    assert_eq!(annotation_ids(&dashboard).len(), 1);
    dashboard.set_year(2020).expect("year");
    assert!(annotation_ids(&dashboard).is_empty());
}

#[test]
fn charts_without_annotations_reject_relays() {
    let mut dashboard = support::loaded_dashboard();
    let error = dashboard
        .relay(
            &chord(),
            &InteractionPayload::SelectEvents(vec![EntityKey::new("SYR1")]),
            &ChartId::new(ChartId::PIE),
        )
        .expect_err("pie takes no relays");
    assert!(matches!(error, DashboardError::UnsupportedRelay(_)));

    let error = dashboard
        .relay(&chord(), &InteractionPayload::ClearAnnotations, &ChartId::new("radar"))
        .expect_err("unknown chart");
    assert!(matches!(error, DashboardError::UnknownChart(_)));
}
