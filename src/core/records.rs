use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{EntityKey, EventType};

/// One conflict event. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// `event_id_cnty` from the export; unique per event.
    pub id: String,
    pub year: i32,
    pub event_date: Option<NaiveDate>,
    pub event_type: EventType,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub fatalities: u32,
    pub actor1: Option<String>,
    pub actor2: Option<String>,
    pub notes: Option<String>,
}

impl EventRecord {
    #[must_use]
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.id.as_str())
    }

    /// `true` when the event's two actors are `a` and `b` in either order.
    #[must_use]
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        match (self.actor1.as_deref(), self.actor2.as_deref()) {
            (Some(first), Some(second)) => {
                (first == a && second == b) || (first == b && second == a)
            }
            _ => false,
        }
    }

    /// Zero coordinates are how the export marks unknown positions.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude != 0.0
            && self.longitude != 0.0
    }
}

/// One company's arms revenue in one year, country already canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub year: i32,
    pub company: String,
    pub country: String,
    pub revenue_millions_usd: f64,
}

impl RevenueRecord {
    #[must_use]
    pub fn new(
        year: i32,
        company: impl Into<String>,
        country: impl Into<String>,
        revenue_millions_usd: f64,
    ) -> Self {
        Self {
            year,
            company: company.into(),
            country: country.into(),
            revenue_millions_usd,
        }
    }
}

/// GDP growth samples for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpSeries {
    pub country: String,
    pub growth_by_year: Vec<(i32, f64)>,
}

impl GdpSeries {
    #[must_use]
    pub fn growth(&self, year: i32) -> Option<f64> {
        self.growth_by_year
            .iter()
            .find(|(sample_year, _)| *sample_year == year)
            .map(|(_, growth)| *growth)
    }
}
