use battlelens::api::{ChangeTopic, FilterState};
use battlelens::core::{ChartId, EntityKey, EventType, YearRange};
use battlelens::DashboardError;
use proptest::prelude::*;

fn domain() -> YearRange {
    YearRange::new(2015, 2024).expect("range")
}

#[test]
fn initial_year_must_be_inside_domain() {
    assert!(FilterState::new(2014, domain()).is_err());
    let state = FilterState::new(2015, domain()).expect("state");
    assert_eq!(state.selected_year(), 2015);
    assert_eq!(state.enabled_event_types().len(), 6);
    assert!(state.drill_down().is_none());
}

#[test]
fn out_of_domain_year_leaves_state_untouched() {
    let mut state = FilterState::new(2019, domain()).expect("state");
    let error = state.set_year(2030).expect_err("outside domain");
    assert!(matches!(error, DashboardError::InvalidSelection(_)));
    assert_eq!(state.selected_year(), 2019);
}

#[test]
fn year_change_clears_drill_down() {
    let mut state = FilterState::new(2019, domain()).expect("state");
    state
        .set_drill_down(ChartId::new(ChartId::REVENUE_BAR), Some(EntityKey::new("country:France")))
        .expect("drill");
    let topics = state.set_year(2020).expect("year");
    assert!(topics.contains_topic(ChangeTopic::Year));
    assert!(topics.contains_topic(ChangeTopic::DrillDown));
    assert!(state.drill_down().is_none());

    let topics = state.set_year(2021).expect("year");
    assert!(!topics.contains_topic(ChangeTopic::DrillDown));
}

#[test]
fn event_type_toggles_by_label() {
    let mut state = FilterState::new(2019, domain()).expect("state");
    let topics = state
        .set_event_type_label_enabled("Protests", false)
        .expect("toggle");
    assert!(topics.contains_topic(ChangeTopic::EventTypes));
    assert!(!state.enabled_event_types().contains(EventType::Protests));
    assert!(state.set_event_type_label_enabled("Looting", false).is_err());

    state.set_all_event_types(false).expect("none");
    assert!(state.enabled_event_types().is_empty());
    state.set_all_event_types(true).expect("all");
    assert_eq!(state.enabled_event_types().len(), 6);
}

#[test]
fn empty_drill_key_is_rejected() {
    let mut state = FilterState::new(2019, domain()).expect("state");
    assert!(state
        .set_drill_down(ChartId::new(ChartId::REVENUE_BAR), Some(EntityKey::new("")))
        .is_err());
}

#[test]
fn narrowing_domain_clamps_selected_year() {
    let mut state = FilterState::new(2015, domain()).expect("state");
    let topics = state.set_year_domain(YearRange::new(2019, 2020).expect("range"));
    assert_eq!(state.selected_year(), 2019);
    assert!(topics.contains_topic(ChangeTopic::Year));
    assert!(topics.contains_topic(ChangeTopic::Datasets));
}

proptest! {
    #[test]
    fn selected_year_always_stays_in_domain(
        years in proptest::collection::vec(2000i32..2040, 1..40)
    ) {
        let mut state = FilterState::new(2019, domain()).expect("state");
        for year in years {
            let accepted = state.set_year(year).is_ok();
            prop_assert_eq!(accepted, domain().contains(year));
            prop_assert!(state.year_domain().contains(state.selected_year()));
        }
    }

    #[test]
    fn toggles_match_a_model_set(
        toggles in proptest::collection::vec((0usize..6, any::<bool>()), 0..40)
    ) {
        let mut state = FilterState::new(2019, domain()).expect("state");
        let mut model = [true; 6];
        for (index, enabled) in toggles {
            state.set_event_type_enabled(EventType::ALL[index], enabled).expect("toggle");
            model[index] = enabled;
        }
        for (index, event_type) in EventType::ALL.into_iter().enumerate() {
            prop_assert_eq!(state.enabled_event_types().contains(event_type), model[index]);
        }
    }
}
