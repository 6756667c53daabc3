use indexmap::IndexMap;
use tracing::trace;

use crate::core::{GdpSeries, YearRange, canonical_country};
use crate::data::ParsedTable;
use crate::error::LoadError;

const COUNTRY_COLUMN: &str = "country_name";

/// Parses the wide GDP growth table: one row per country, one column per year.
///
/// Only year columns inside `window` are kept. Empty or unparsable cells are
/// left out of the series; rows without a country are skipped. Countries that
/// appear twice after aliasing are merged, later cells winning.
pub fn parse_gdp_csv(
    source_name: &str,
    text: &str,
    window: YearRange,
) -> Result<ParsedTable<GdpSeries>, LoadError> {
    let csv_error = |reason: String| LoadError::Csv {
        source_name: source_name.to_owned(),
        reason,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| csv_error(e.to_string()))?.clone();
    let country_index = headers
        .iter()
        .position(|header| header.trim() == COUNTRY_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn {
            source_name: source_name.to_owned(),
            column: COUNTRY_COLUMN.to_owned(),
        })?;
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| Some((index, header.trim().parse::<i32>().ok()?)))
        .filter(|(_, year)| window.contains(*year))
        .collect();

    let mut by_country: IndexMap<String, Vec<(i32, f64)>> = IndexMap::new();
    let mut skipped = 0;
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| csv_error(format!("row {}: {e}", index + 1)))?;
        let Some(country) = row.get(country_index).and_then(canonical_country) else {
            trace!(source = source_name, row = index + 1, "skipping gdp row without country");
            skipped += 1;
            continue;
        };
        let samples = by_country.entry(country).or_default();
        for &(column, year) in &year_columns {
            let Some(growth) = row
                .get(column)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
            else {
                continue;
            };
            match samples.iter_mut().find(|(sample_year, _)| *sample_year == year) {
                Some(sample) => sample.1 = growth,
                None => samples.push((year, growth)),
            }
        }
    }

    let rows = by_country
        .into_iter()
        .map(|(country, mut growth_by_year)| {
            growth_by_year.sort_by_key(|(year, _)| *year);
            GdpSeries {
                country,
                growth_by_year,
            }
        })
        .collect();
    Ok(ParsedTable::new(rows, skipped))
}

#[cfg(test)]
mod tests {
    use super::parse_gdp_csv;
    use crate::core::YearRange;

    #[test]
    fn window_and_aliases_apply() {
        let text = "\
country_name,2009,2010,2011,2024
USA,1.0,2.5,,3.1
France,0.1,0.2,bad,0.4
,9,9,9,9
";
        let window = YearRange::new(2010, 2024).expect("range");
        let table = parse_gdp_csv("gdp.csv", text, window).expect("parse");
        assert_eq!(table.skipped, 1);
        assert_eq!(table.rows[0].country, "United States");
        assert_eq!(table.rows[0].growth_by_year, vec![(2010, 2.5), (2024, 3.1)]);
        assert_eq!(table.rows[1].growth(2011), None);
        assert_eq!(table.rows[1].growth(2009), None);
    }
}
