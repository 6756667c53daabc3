use approx::assert_relative_eq;
use battlelens::core::{company_shares, country_totals, highlighted_first_shares, revenue_by_country};
use battlelens::data::parse_revenue_csv;

fn row(company: &str, country: &str, revenue: &str) -> String {
    format!("1,1,{company},,{country},,,,\"{revenue}\"")
}

#[test]
fn aliased_totals_drop_unparsable_rows() {
    let text = [
        row("A", "USA", "$10"),
        row("B", "USA", "$5"),
        row("C", "France", "bad"),
    ]
    .join("\n");
    let table = parse_revenue_csv("2019.csv", 2019, &text).expect("parse");
    assert_eq!(table.skipped, 1);

    let totals = country_totals(&table.rows);
    assert_eq!(totals.len(), 1);
    assert_relative_eq!(totals["United States"], 15.0);
}

#[test]
fn header_row_is_skipped_by_the_country_rule() {
    let text = format!(
        "Rank,Prev,Company,Flag,Country,a,b,c,Revenue\n{}",
        row("Thales", "France", "$1,250.5")
    );
    let table = parse_revenue_csv("2020.csv", 2020, &text).expect("parse");
    assert_eq!(table.skipped, 1);
    assert_eq!(table.rows.len(), 1);
    assert_relative_eq!(table.rows[0].revenue_millions_usd, 1250.5);
}

#[test]
fn ranged_revenue_cells_keep_their_leading_figure() {
    let text = [row("Rheinmetall", "Germany", "$1.2-1.5"), row("Saab", "Sweden", "2.5.1")].join("\n");
    let table = parse_revenue_csv("2018.csv", 2018, &text).expect("parse");
    assert_eq!(table.skipped, 0);
    assert_relative_eq!(table.rows[0].revenue_millions_usd, 1.2);
    assert_relative_eq!(table.rows[1].revenue_millions_usd, 2.5);
}

#[test]
fn donut_shares_filter_small_companies() {
    let text = [
        row("Big", "UK", "$900"),
        row("Mid", "UK", "$95"),
        row("Tiny", "UK", "$5"),
    ]
    .join("\n");
    let table = parse_revenue_csv("2021.csv", 2021, &text).expect("parse");
    let grouped = revenue_by_country(&table.rows);
    assert_eq!(grouped[0].country, "United Kingdom");

    let shares = company_shares(&grouped[0], 1.0);
    let labels: Vec<_> = shares.iter().map(|slice| slice.label.as_str()).collect();
    assert_eq!(labels, vec!["Big", "Mid"]);
    assert_relative_eq!(shares[0].percentage, 90.0, epsilon = 1e-9);
    assert_relative_eq!(shares[1].percentage, 9.5, epsilon = 1e-9);
}

#[test]
fn permanent_members_lead_the_pie_order() {
    let text = [
        row("A", "Israel", "$500"),
        row("B", "France", "$100"),
        row("C", "Russia", "$200"),
    ]
    .join("\n");
    let table = parse_revenue_csv("2022.csv", 2022, &text).expect("parse");
    let members = vec!["France".to_owned(), "Russia".to_owned()];
    let slices = highlighted_first_shares(&country_totals(&table.rows), &members);
    let labels: Vec<_> = slices.iter().map(|slice| slice.label.as_str()).collect();
    assert_eq!(labels, vec!["Russia", "France", "Israel"]);
    let total: f64 = slices.iter().map(|slice| slice.percentage).sum();
    assert_relative_eq!(total, 100.0, epsilon = 1e-9);
}
