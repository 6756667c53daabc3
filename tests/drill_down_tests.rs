mod support;

use battlelens::api::{ChartRedrawStatus, ClickOutcome, DrillDownInput, DrillDownState};
use battlelens::charts::{BACK_CONTROL_ID, RevenueBarChart};
use battlelens::core::{ChartId, EntityKey};
use battlelens::DashboardError;

fn bar() -> ChartId {
    ChartId::new(ChartId::REVENUE_BAR)
}

#[test]
fn state_machine_transitions() {
    let key = EntityKey::new("country:France");
    let detail = DrillDownState::Overview.next(DrillDownInput::Select(key.clone()));
    assert_eq!(detail, DrillDownState::Detail(key.clone()));
    assert_eq!(
        detail.next(DrillDownInput::Select(EntityKey::new("country:Israel"))),
        DrillDownState::Detail(key)
    );
    assert_eq!(detail.next(DrillDownInput::Back), DrillDownState::Overview);
    assert_eq!(detail.next(DrillDownInput::FilterChanged), DrillDownState::Overview);
    assert_eq!(
        DrillDownState::Overview.next(DrillDownInput::Back),
        DrillDownState::Overview
    );
}

#[test]
fn clicking_a_bar_opens_the_company_donut() {
    let mut dashboard = support::loaded_dashboard();
    let keys = dashboard.rendered_keys(&bar()).expect("keys");
    assert!(keys.contains(&EntityKey::new("bar:France/0")));

    let outcome = dashboard
        .click(&bar(), &EntityKey::new("bar:France/0"))
        .expect("click");
    let ClickOutcome::DrillChanged(report) = outcome else {
        panic!("expected a drill-down, got {outcome:?}");
    };
    assert!(matches!(report.outcome(&bar()), Some(ChartRedrawStatus::Redrawn(_))));
    assert_eq!(report.outcomes.len(), 1);

    let snapshot = dashboard.snapshot();
    let chart = snapshot.chart(ChartId::REVENUE_BAR).expect("bar snapshot");
    assert_eq!(
        chart.drill,
        DrillDownState::Detail(RevenueBarChart::country_key("France"))
    );
    assert!(chart.keys.contains(&EntityKey::new("donut:0")));
    assert!(chart.control_ids.iter().any(|id| id == BACK_CONTROL_ID));
}

#[test]
fn back_control_returns_to_overview() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("United States")))
        .expect("drill");

    let outcome = dashboard
        .click(&bar(), &EntityKey::new(BACK_CONTROL_ID))
        .expect("back click");
    assert!(matches!(outcome, ClickOutcome::DrillChanged(_)));
    assert!(dashboard.filter().drill_down().is_none());
    let keys = dashboard.rendered_keys(&bar()).expect("keys");
    assert!(keys.contains(&EntityKey::new("bar:United States/1")));
    assert!(dashboard.overlays(&bar()).expect("overlays").controls.is_empty());
}

#[test]
fn any_filter_setter_resets_detail() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("France")))
        .expect("drill");
    dashboard
        .set_event_type_label_enabled("Battles", false)
        .expect("toggle");
    assert!(dashboard.filter().drill_down().is_none());
    assert_eq!(
        dashboard.snapshot().chart(ChartId::REVENUE_BAR).expect("bar").drill,
        DrillDownState::Overview
    );

    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("France")))
        .expect("drill again");
    dashboard.set_year(2020).expect("year");
    let keys = dashboard.rendered_keys(&bar()).expect("keys");
    assert!(keys.iter().all(|key| !key.as_str().starts_with("donut")));
}

#[test]
fn invalid_drill_targets_are_rejected_without_mutation() {
    let mut dashboard = support::loaded_dashboard();
    let passes = dashboard.passes();

    let error = dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("Atlantis")))
        .expect_err("unknown country");
    assert!(matches!(error, DashboardError::InvalidSelection(_)));

    let error = dashboard
        .set_drill_down(&ChartId::new(ChartId::MAP), Some(EntityKey::new("SYR1")))
        .expect_err("map has no drill-down");
    assert!(matches!(error, DashboardError::InvalidSelection(_)));

    let error = dashboard.back(&bar()).expect_err("not drilled down");
    assert!(matches!(error, DashboardError::InvalidSelection(_)));

    assert!(dashboard.filter().drill_down().is_none());
    assert_eq!(dashboard.passes(), passes);
}

#[test]
fn selecting_again_in_detail_keeps_the_entity() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("France")))
        .expect("drill");
    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("Israel")))
        .expect("second select");
    let selection = dashboard.filter().drill_down().expect("selection");
    assert_eq!(selection.entity_key, RevenueBarChart::country_key("France"));
}

#[test]
fn donut_tooltip_names_the_company() {
    let mut dashboard = support::loaded_dashboard();
    dashboard
        .set_drill_down(&bar(), Some(RevenueBarChart::country_key("United States")))
        .expect("drill");
    let shown = dashboard
        .hover(&bar(), &EntityKey::new("donut:0"), 300.0, 200.0)
        .expect("hover");
    assert!(shown);
    assert!(dashboard.snapshot().chart(ChartId::REVENUE_BAR).expect("bar").tooltip_visible);
}
