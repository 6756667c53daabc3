mod support;

use battlelens::DashboardError;
use battlelens::api::{DashboardConfig, DashboardSnapshot};
use battlelens::core::{ChartId, EntityKey, EventType};

#[test]
fn dashboard_config_json_roundtrip() {
    let config = DashboardConfig::default().with_data_root("/srv/battlelens");
    let json = config.to_json_pretty().expect("config should serialize");
    let restored = DashboardConfig::from_json_str(&json).expect("config should deserialize");
    assert_eq!(restored, config);
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let config = DashboardConfig::from_json_str(r#"{"initial_year": 2020, "chord_event_limit": 50}"#)
        .expect("partial config");
    assert_eq!(config.initial_year, 2020);
    assert_eq!(config.chord_event_limit, 50);
    assert_eq!(config.revenue_year_list().len(), 10);
    assert_eq!(config.permanent_members.len(), 5);
}

#[test]
fn invalid_config_is_rejected() {
    for json in [
        r#"{"initial_year": 1999}"#,
        r#"{"chord_event_limit": 0}"#,
        r#"{"donut_min_share_pct": 120.0}"#,
        r#"{"map_radius_range": [15.0, 3.0]}"#,
    ] {
        assert!(
            matches!(DashboardConfig::from_json_str(json), Err(DashboardError::InvalidData(_))),
            "{json} should be rejected"
        );
    }
}

#[test]
fn snapshot_preserves_registration_order() {
    let dashboard = support::loaded_dashboard();
    let snapshot = dashboard.snapshot();
    let ids: Vec<&str> = snapshot.charts.keys().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec![
            ChartId::MAP,
            ChartId::REVENUE_BAR,
            ChartId::PIE,
            ChartId::CHORD,
            ChartId::STREAM,
            ChartId::LINE,
        ]
    );
    assert_eq!(snapshot.filter.selected_year, 2019);
    assert_eq!(snapshot.filter.enabled_event_types, EventType::ALL.to_vec());
    assert!(snapshot.filter.drill_down.is_none());
}

#[test]
fn snapshot_reflects_drill_down_controls() {
    let mut dashboard = support::loaded_dashboard();
    let bar = ChartId::new(ChartId::REVENUE_BAR);
    dashboard
        .set_drill_down(&bar, Some(EntityKey::new("country:United States")))
        .expect("drill");

    let snapshot = dashboard.snapshot();
    let chart = snapshot.chart(ChartId::REVENUE_BAR).expect("bar snapshot");
    assert!(chart.drill.is_detail());
    assert!(chart.control_ids.iter().any(|id| id == "control:back"));
    assert!(chart.legend_items > 0);
}

#[test]
fn snapshot_contract_v1_roundtrip() {
    let snapshot = support::loaded_dashboard().snapshot();
    let json = snapshot
        .to_json_contract_v1_pretty()
        .expect("contract should serialize");
    assert!(json.contains("\"schema_version\": 1"));

    let restored = DashboardSnapshot::from_json_compat_str(&json).expect("contract should parse");
    assert_eq!(restored, snapshot);
}

#[test]
fn compat_parser_accepts_bare_snapshots() {
    let dashboard = support::loaded_dashboard();
    let json = dashboard.snapshot_json_pretty().expect("snapshot json");
    let restored = DashboardSnapshot::from_json_compat_str(&json).expect("bare snapshot");
    assert_eq!(restored, dashboard.snapshot());
}

#[test]
fn compat_parser_rejects_unknown_schema_versions() {
    let json = support::loaded_dashboard()
        .snapshot()
        .to_json_contract_v1_pretty()
        .expect("contract")
        .replace("\"schema_version\": 1", "\"schema_version\": 2");
    assert!(matches!(
        DashboardSnapshot::from_json_compat_str(&json),
        Err(DashboardError::InvalidData(_))
    ));
    assert!(DashboardSnapshot::from_json_compat_str("{}").is_err());
}
