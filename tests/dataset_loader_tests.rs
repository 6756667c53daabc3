mod support;

use battlelens::api::{ChartRedrawStatus, Dashboard};
use battlelens::core::{ChartId, EntityKey, YearRange};
use battlelens::data::{
    DataPaths, DatasetKind, DatasetLoader, SourceDescriptor, StaticSource, Table,
};
use battlelens::render::NullRenderer;
use battlelens::LoadError;

const EVENTS_CSV: &str = "\
event_id_cnty,event_date,year,event_type,actor1,actor2,location,latitude,longitude,notes,fatalities
SYR1,2019-03-14,2019,Battles,Army,Rebels,Idlib,35.9,36.6,clash,4
SYR2,,2019,Looting,Army,,Idlib,35.9,36.6,,0
IRQ1,2020-01-02,2020,Explosions/Remote violence,Militia,Police,Mosul,36.3,43.1,,2
";

const GDP_CSV: &str = "\
country_name,2019,2020
USA,2.3,-3.4
France,1.8,-7.9
";

const WORLD_JSON: &str = r#"{
    "type": "Topology",
    "objects": {"countries": {"type": "GeometryCollection", "geometries": [
        {"type": "Polygon", "id": "760", "properties": {"name": "Syria"}, "arcs": [[0]]}
    ]}},
    "arcs": [[[36.0, 32.5], [42.0, 37.0], [35.7, 36.8], [36.0, 32.5]]]
}"#;

fn revenue_csv(year: i32) -> String {
    format!(
        "Rank,Prev,Company,Flag,Country,a,b,c,Revenue\n\
         1,1,Lockheed Martin,,USA,,,,\"${}\"\n\
         2,2,Thales,,France,,,,$30\n",
        1000 + year
    )
}

fn paths() -> DataPaths {
    DataPaths::default().with_root("data")
}

fn source(revenue_years: impl IntoIterator<Item = i32>, with_world: bool) -> StaticSource {
    let paths = paths();
    let mut source = StaticSource::new()
        .with_entry(paths.locate(SourceDescriptor::ConflictEvents), EVENTS_CSV)
        .with_entry(paths.locate(SourceDescriptor::Gdp), GDP_CSV);
    if with_world {
        source.insert(paths.locate(SourceDescriptor::WorldGeometry), WORLD_JSON);
    }
    for year in revenue_years {
        source.insert(
            paths.locate(SourceDescriptor::YearlyRevenue(year)),
            revenue_csv(year),
        );
    }
    source
}

fn loader(source: StaticSource) -> DatasetLoader<StaticSource> {
    DatasetLoader::new(source, paths(), YearRange::new(2010, 2024).expect("window"))
}

fn dashboard() -> Dashboard<NullRenderer> {
    support::empty_dashboard()
}

#[test]
fn load_dispatches_on_descriptor() {
    let loader = loader(source([2019], true));
    let table = loader.load(SourceDescriptor::ConflictEvents).expect("events");
    let Table::Events(events) = table else {
        panic!("expected events table");
    };
    assert_eq!(events.rows.len(), 2);
    assert_eq!(events.skipped, 1);

    let revenue = loader.load_revenue_year(2019).expect("revenue");
    assert_eq!(revenue.rows.len(), 2);
    assert_eq!(revenue.rows[0].country, "United States");

    let gdp = loader.load_gdp().expect("gdp");
    assert_eq!(gdp.rows[0].growth(2020), Some(-3.4));

    let world = loader.load_world().expect("world");
    assert_eq!(world.countries.len(), 1);
    let syria = world.country("Syria").expect("syria");
    assert_eq!(syria.rings().next().map(Vec::len), Some(4));
}

#[test]
fn joined_revenue_fetch_fails_as_a_unit() {
    let loader = loader(source([2019, 2021], true));
    let error = loader
        .load_revenue_years(&[2019, 2020, 2021])
        .expect_err("2020 is missing");
    assert!(matches!(error, LoadError::Join { requested: 3, failed: 1, .. }));
    assert!(error.source_name().ends_with("2020.csv"));

    let tables = loader.load_revenue_years(&[2019, 2021]).expect("join");
    let years: Vec<_> = tables.iter().map(|(year, _)| *year).collect();
    assert_eq!(years, vec![2019, 2021]);
}

#[test]
fn complete_load_renders_every_chart() {
    let mut dashboard = dashboard();
    let summary = dashboard
        .load_all(&loader(source(2015..=2024, true)))
        .expect("load");
    assert!(summary.is_complete());
    assert_eq!(summary.revenue_years.len(), 10);
    assert_eq!(summary.skipped_rows, 1 + 10);
    assert_eq!(summary.report.outcomes.len(), 6);
    assert_eq!(summary.report.redrawn(), 6);
    assert_eq!(dashboard.filter().year_domain(), YearRange::new(2015, 2024).expect("range"));

    let stream = dashboard
        .rendered_keys(&ChartId::new(ChartId::STREAM))
        .expect("stream keys");
    assert!(stream.contains(&EntityKey::new("stream:United States")));
    assert!(stream.contains(&EntityKey::new("stream:Germany")));

    let map = dashboard
        .rendered_keys(&ChartId::new(ChartId::MAP))
        .expect("map keys");
    assert!(map.contains(&EntityKey::new("country:Syria")));
    assert!(map.contains(&EntityKey::new("country-label:Syria")));
}

#[test]
fn missing_revenue_year_falls_back_per_year() {
    let mut dashboard = dashboard();
    let summary = dashboard
        .load_all(&loader(source([2015, 2019, 2020], true)))
        .expect("load");
    assert!(!summary.is_complete());
    assert_eq!(summary.revenue_years, vec![2015, 2019, 2020]);
    assert_eq!(summary.failures.len(), 7);
    assert!(
        summary
            .failures
            .iter()
            .all(|failure| !matches!(failure, LoadError::Join { .. }))
    );
    let failed_years: Vec<bool> = [2016, 2017, 2018, 2021, 2022, 2023, 2024]
        .into_iter()
        .map(|year| {
            summary
                .failures
                .iter()
                .any(|failure| failure.source_name().contains(&year.to_string()))
        })
        .collect();
    assert!(failed_years.iter().all(|found| *found), "{:?}", summary.failures);
    assert!(summary.loaded.contains(&DatasetKind::Revenue));

    assert_eq!(
        summary.report.outcome(&ChartId::new(ChartId::STREAM)),
        Some(&ChartRedrawStatus::Unrendered)
    );
    assert!(matches!(
        summary.report.outcome(&ChartId::new(ChartId::PIE)),
        Some(ChartRedrawStatus::Redrawn(_))
    ));
}

#[test]
fn failed_source_blanks_only_its_dependents() {
    let mut dashboard = dashboard();
    let summary = dashboard
        .load_all(&loader(source(2015..=2024, false)))
        .expect("load");
    assert_eq!(summary.failures.len(), 1);
    assert!(!summary.loaded.contains(&DatasetKind::World));

    let report = &summary.report;
    assert_eq!(
        report.outcome(&ChartId::new(ChartId::MAP)),
        Some(&ChartRedrawStatus::Unrendered)
    );
    for chart in [ChartId::CHORD, ChartId::LINE, ChartId::PIE, ChartId::STREAM] {
        assert!(
            matches!(report.outcome(&ChartId::new(chart)), Some(ChartRedrawStatus::Redrawn(_))),
            "{chart} should render"
        );
    }
    assert!(!dashboard.snapshot().chart(ChartId::MAP).expect("map").rendered);
}
