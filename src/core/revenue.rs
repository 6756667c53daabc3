use std::cmp::Reverse;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::RevenueRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRevenue {
    pub company: String,
    pub revenue: f64,
}

/// One country's total and its companies, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
    pub country: String,
    pub total: f64,
    pub companies: Vec<CompanyRevenue>,
}

/// Slice of a part-of-whole chart (pie, donut).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSlice {
    pub label: String,
    pub value: f64,
    pub percentage: f64,
    pub highlighted: bool,
}

/// Sums revenue per country, ordered by total descending (ties by name).
#[must_use]
pub fn country_totals(records: &[RevenueRecord]) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        *totals.entry(record.country.clone()).or_insert(0.0) += record.revenue_millions_usd;
    }
    totals.sort_by(|left_country, left, right_country, right| {
        OrderedFloat(*right)
            .cmp(&OrderedFloat(*left))
            .then_with(|| left_country.cmp(right_country))
    });
    totals
}

/// Groups records per country with per-company breakdowns.
///
/// Countries are ordered by total descending, companies by revenue descending.
#[must_use]
pub fn revenue_by_country(records: &[RevenueRecord]) -> Vec<CountryRevenue> {
    let mut grouped: IndexMap<&str, Vec<CompanyRevenue>> = IndexMap::new();
    for record in records {
        grouped
            .entry(record.country.as_str())
            .or_default()
            .push(CompanyRevenue {
                company: record.company.clone(),
                revenue: record.revenue_millions_usd,
            });
    }

    let mut countries: Vec<CountryRevenue> = grouped
        .into_iter()
        .map(|(country, mut companies)| {
            companies.sort_by_key(|entry| Reverse(OrderedFloat(entry.revenue)));
            CountryRevenue {
                country: country.to_owned(),
                total: companies.iter().map(|entry| entry.revenue).sum(),
                companies,
            }
        })
        .collect();
    countries.sort_by(|left, right| {
        OrderedFloat(right.total)
            .cmp(&OrderedFloat(left.total))
            .then_with(|| left.country.cmp(&right.country))
    });
    countries
}

/// Per-company shares of one country's total, dropping slices at or below
/// `min_share_pct` percent.
#[must_use]
pub fn company_shares(country: &CountryRevenue, min_share_pct: f64) -> Vec<ShareSlice> {
    if country.total <= 0.0 {
        return Vec::new();
    }
    country
        .companies
        .iter()
        .map(|entry| ShareSlice {
            label: entry.company.clone(),
            value: entry.revenue,
            percentage: entry.revenue / country.total * 100.0,
            highlighted: false,
        })
        .filter(|slice| slice.percentage > min_share_pct)
        .collect()
}

/// Country shares with `highlighted` countries first, each group by value
/// descending.
#[must_use]
pub fn highlighted_first_shares(
    totals: &IndexMap<String, f64>,
    highlighted: &[String],
) -> Vec<ShareSlice> {
    let grand_total: f64 = totals.values().sum();
    let mut slices: Vec<ShareSlice> = totals
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .map(|(country, value)| ShareSlice {
            label: country.clone(),
            value: *value,
            percentage: if grand_total > 0.0 {
                value / grand_total * 100.0
            } else {
                0.0
            },
            highlighted: highlighted.iter().any(|member| member == country),
        })
        .collect();
    slices.sort_by(|left, right| {
        right
            .highlighted
            .cmp(&left.highlighted)
            .then_with(|| OrderedFloat(right.value).cmp(&OrderedFloat(left.value)))
            .then_with(|| left.label.cmp(&right.label))
    });
    slices
}
