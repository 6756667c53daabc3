use std::collections::HashSet;

use tracing::trace;

use crate::core::primitives::parse_event_date;
use crate::core::{EventRecord, EventType};
use crate::data::ParsedTable;
use crate::error::LoadError;

const REQUIRED_COLUMNS: [&str; 6] = [
    "event_id_cnty",
    "year",
    "event_type",
    "latitude",
    "longitude",
    "fatalities",
];

struct Columns {
    id: usize,
    year: usize,
    event_type: usize,
    latitude: usize,
    longitude: usize,
    fatalities: usize,
    location: Option<usize>,
    actor1: Option<usize>,
    actor2: Option<usize>,
    notes: Option<usize>,
    event_date: Option<usize>,
}

impl Columns {
    fn resolve(source_name: &str, headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let mut required = [0_usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name).ok_or_else(|| LoadError::MissingColumn {
                source_name: source_name.to_owned(),
                column: name.to_owned(),
            })?;
        }
        let [id, year, event_type, latitude, longitude, fatalities] = required;
        Ok(Self {
            id,
            year,
            event_type,
            latitude,
            longitude,
            fatalities,
            location: find("location"),
            actor1: find("actor1"),
            actor2: find("actor2"),
            notes: find("notes"),
            event_date: find("event_date"),
        })
    }
}

fn cell(row: &csv::StringRecord, index: usize) -> Option<&str> {
    row.get(index).map(str::trim).filter(|value| !value.is_empty())
}

fn optional_cell(row: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index.and_then(|index| cell(row, index)).map(str::to_owned)
}

/// Integral years sometimes arrive as `2019.0`.
fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().or_else(|| {
        let value = raw.parse::<f64>().ok()?;
        (value.fract() == 0.0 && value.abs() < f64::from(i32::MAX)).then_some(value as i32)
    })
}

fn parse_row(row: &csv::StringRecord, columns: &Columns) -> Result<EventRecord, &'static str> {
    let id = cell(row, columns.id).ok_or("missing event id")?;
    let year = cell(row, columns.year)
        .and_then(parse_year)
        .ok_or("unparsable year")?;
    let event_type = cell(row, columns.event_type)
        .and_then(EventType::from_label)
        .ok_or("unknown event type")?;
    let latitude = cell(row, columns.latitude)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or("unparsable latitude")?;
    let longitude = cell(row, columns.longitude)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or("unparsable longitude")?;
    let fatalities = cell(row, columns.fatalities)
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or("unparsable fatalities")?;

    Ok(EventRecord {
        id: id.to_owned(),
        year,
        event_date: columns
            .event_date
            .and_then(|index| cell(row, index))
            .and_then(parse_event_date),
        event_type,
        location: optional_cell(row, columns.location).unwrap_or_default(),
        latitude,
        longitude,
        fatalities,
        actor1: optional_cell(row, columns.actor1),
        actor2: optional_cell(row, columns.actor2),
        notes: optional_cell(row, columns.notes),
    })
}

/// Parses the conflict-event export.
///
/// Missing required columns fail the whole source. Rows with unparsable
/// numbers, unknown event types or a repeated `event_id_cnty` are skipped.
pub fn parse_event_csv(source_name: &str, text: &str) -> Result<ParsedTable<EventRecord>, LoadError> {
    let csv_error = |reason: String| LoadError::Csv {
        source_name: source_name.to_owned(),
        reason,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| csv_error(e.to_string()))?.clone();
    let columns = Columns::resolve(source_name, &headers)?;

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut table = ParsedTable::default();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| csv_error(format!("row {}: {e}", index + 1)))?;
        match parse_row(&row, &columns) {
            Ok(event) if seen_ids.insert(event.id.clone()) => table.rows.push(event),
            Ok(event) => {
                trace!(source = source_name, id = %event.id, "skipping duplicate event id");
                table.skipped += 1;
            }
            Err(reason) => {
                trace!(source = source_name, row = index + 1, reason, "skipping event row");
                table.skipped += 1;
            }
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::parse_event_csv;
    use crate::core::EventType;
    use crate::error::LoadError;

    const HEADER: &str =
        "event_id_cnty,event_date,year,event_type,actor1,actor2,location,latitude,longitude,notes,fatalities";

    #[test]
    fn parses_rows_and_skips_bad_ones() {
        let text = format!(
            "{HEADER}
SYR1,2019-03-14,2019,Battles,Army,Rebels,Idlib,35.9,36.6,clash,4
SYR2,,2019,Looting,Army,,Idlib,35.9,36.6,,0
SYR3,,2019.0,Riots,,,Homs,34.7,36.7,,x
SYR1,,2020,Protests,,,Homs,34.7,36.7,,0
IRQ1,,2020,Explosions/Remote violence,Militia,,Mosul,36.3,43.1,,2
"
        );
        let table = parse_event_csv("events.csv", &text).expect("parse");
        assert_eq!(table.skipped, 3);
        assert_eq!(table.rows.len(), 2);
        let first = &table.rows[0];
        assert_eq!(first.actor2.as_deref(), Some("Rebels"));
        assert!(first.event_date.is_some());
        assert_eq!(table.rows[1].event_type, EventType::ExplosionsRemoteViolence);
        assert_eq!(table.rows[1].actor2, None);
    }

    #[test]
    fn missing_required_column_fails_the_source() {
        let error = parse_event_csv("events.csv", "year,event_type\n2019,Battles\n")
            .expect_err("missing columns");
        assert!(matches!(error, LoadError::MissingColumn { ref column, .. } if column == "event_id_cnty"));
    }
}
