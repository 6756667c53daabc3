use tracing::trace;

use crate::core::primitives::parse_currency_amount;
use crate::core::{RevenueRecord, canonical_country};
use crate::data::ParsedTable;
use crate::error::LoadError;

const COMPANY_COLUMN: usize = 2;
const COUNTRY_COLUMN: usize = 4;
const REVENUE_COLUMN: usize = 8;

/// Parses one yearly revenue export.
///
/// The export carries no reliable header, so columns are positional and the
/// header line is dropped by the country rule. Rows with an empty country or
/// an unparsable revenue are skipped.
pub fn parse_revenue_csv(
    source_name: &str,
    year: i32,
    text: &str,
) -> Result<ParsedTable<RevenueRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut table = ParsedTable::default();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Csv {
            source_name: source_name.to_owned(),
            reason: format!("row {}: {e}", index + 1),
        })?;

        let Some(country) = row.get(COUNTRY_COLUMN).and_then(canonical_country) else {
            trace!(source = source_name, row = index + 1, "skipping row without country");
            table.skipped += 1;
            continue;
        };
        let Some(revenue) = row.get(REVENUE_COLUMN).and_then(parse_currency_amount) else {
            trace!(source = source_name, row = index + 1, "skipping row with unparsable revenue");
            table.skipped += 1;
            continue;
        };
        let company = row.get(COMPANY_COLUMN).unwrap_or_default().trim();

        table
            .rows
            .push(RevenueRecord::new(year, company, country, revenue));
    }
    Ok(table)
}
