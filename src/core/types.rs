use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> DashboardResult<Self> {
        if !self.is_valid() {
            return Err(DashboardError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// The six event categories present in the conflict-event dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    ExplosionsRemoteViolence,
    Battles,
    ViolenceAgainstCivilians,
    Protests,
    Riots,
    StrategicDevelopments,
}

impl EventType {
    pub const ALL: [Self; 6] = [
        Self::ExplosionsRemoteViolence,
        Self::Battles,
        Self::ViolenceAgainstCivilians,
        Self::Protests,
        Self::Riots,
        Self::StrategicDevelopments,
    ];

    /// Label as it appears in the `event_type` column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExplosionsRemoteViolence => "Explosions/Remote violence",
            Self::Battles => "Battles",
            Self::ViolenceAgainstCivilians => "Violence against civilians",
            Self::Protests => "Protests",
            Self::Riots => "Riots",
            Self::StrategicDevelopments => "Strategic developments",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|event_type| event_type.label().eq_ignore_ascii_case(label))
    }

    const fn bit(self) -> u8 {
        match self {
            Self::ExplosionsRemoteViolence => 1 << 0,
            Self::Battles => 1 << 1,
            Self::ViolenceAgainstCivilians => 1 << 2,
            Self::Protests => 1 << 3,
            Self::Riots => 1 << 4,
            Self::StrategicDevelopments => 1 << 5,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bitmask of enabled event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTypeSet {
    bits: u8,
}

impl Default for EventTypeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl EventTypeSet {
    const ALL_BITS: u8 = EventType::ExplosionsRemoteViolence.bit()
        | EventType::Battles.bit()
        | EventType::ViolenceAgainstCivilians.bit()
        | EventType::Protests.bit()
        | EventType::Riots.bit()
        | EventType::StrategicDevelopments.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn with(self, event_type: EventType) -> Self {
        Self {
            bits: self.bits | event_type.bit(),
        }
    }

    #[must_use]
    pub const fn without(self, event_type: EventType) -> Self {
        Self {
            bits: self.bits & !event_type.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, event_type: EventType) -> bool {
        (self.bits & event_type.bit()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = EventType> {
        EventType::ALL
            .into_iter()
            .filter(move |event_type| self.contains(*event_type))
    }
}

impl FromIterator<EventType> for EventTypeSet {
    fn from_iter<I: IntoIterator<Item = EventType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |set, event_type| set.with(event_type))
    }
}

/// Stable identifier of a registered chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(String);

impl ChartId {
    pub const MAP: &'static str = "map";
    pub const CHORD: &'static str = "chord";
    pub const REVENUE_BAR: &'static str = "revenue-bar";
    pub const STREAM: &'static str = "stream";
    pub const PIE: &'static str = "pie";
    pub const LINE: &'static str = "line";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stable identity of one visual element across redraws.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(String);

impl EntityKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Builds a `prefix:rest` key.
    #[must_use]
    pub fn scoped(prefix: &str, rest: impl fmt::Display) -> Self {
        Self(format!("{prefix}:{rest}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after `prefix:` when the key carries that scope.
    #[must_use]
    pub fn strip_scope(&self, prefix: &str) -> Option<&str> {
        self.0.strip_prefix(prefix)?.strip_prefix(':')
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> DashboardResult<Self> {
        if start > end {
            return Err(DashboardError::InvalidData(format!(
                "year range start {start} must be <= end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }

    /// Smallest range covering every year yielded, or `None` for no years.
    pub fn spanning(years: impl IntoIterator<Item = i32>) -> Option<Self> {
        years.into_iter().fold(None, |range, year| {
            let single = Self {
                start: year,
                end: year,
            };
            Some(range.map_or(single, |range: Self| range.union(single)))
        })
    }

    pub fn years(self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}
