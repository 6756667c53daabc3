use serde::{Deserialize, Serialize};

use crate::core::{ChartId, EntityKey, EventType, EventTypeSet, YearRange};
use crate::error::{DashboardError, DashboardResult};

use super::{DrillDownInput, DrillDownState};

/// Field of the dashboard state a chart can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeTopic {
    Year,
    EventTypes,
    DrillDown,
    Datasets,
    /// Chart-local view state such as the map zoom.
    View,
}

impl ChangeTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Year => 1 << 0,
            Self::EventTypes => 1 << 1,
            Self::DrillDown => 1 << 2,
            Self::Datasets => 1 << 3,
            Self::View => 1 << 4,
        }
    }
}

/// Bitmask of changed fields, used to select which charts redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChangeTopics {
    bits: u8,
}

impl ChangeTopics {
    const ALL_BITS: u8 = ChangeTopic::Year.bit()
        | ChangeTopic::EventTypes.bit()
        | ChangeTopic::DrillDown.bit()
        | ChangeTopic::Datasets.bit()
        | ChangeTopic::View.bit();

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
    pub const fn from_topic(topic: ChangeTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: ChangeTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    #[must_use]
    pub const fn contains_topic(self, topic: ChangeTopic) -> bool {
        self.intersects(Self::from_topic(topic))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// The one chart currently showing a per-member breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillDownSelection {
    pub chart_id: ChartId,
    pub entity_key: EntityKey,
}

/// Current selection shared by every chart.
///
/// Setters validate first and mutate only on success; each successful call
/// reports the topics it changed. A year or event-type change always clears
/// the drill-down selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    selected_year: i32,
    enabled_event_types: EventTypeSet,
    drill_down: Option<DrillDownSelection>,
    year_domain: YearRange,
}

impl FilterState {
    pub fn new(initial_year: i32, year_domain: YearRange) -> DashboardResult<Self> {
        if !year_domain.contains(initial_year) {
            return Err(year_out_of_domain(initial_year, year_domain));
        }
        Ok(Self {
            selected_year: initial_year,
            enabled_event_types: EventTypeSet::all(),
            drill_down: None,
            year_domain,
        })
    }

    #[must_use]
    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    #[must_use]
    pub fn enabled_event_types(&self) -> EventTypeSet {
        self.enabled_event_types
    }

    #[must_use]
    pub fn drill_down(&self) -> Option<&DrillDownSelection> {
        self.drill_down.as_ref()
    }

    #[must_use]
    pub fn year_domain(&self) -> YearRange {
        self.year_domain
    }

    pub fn set_year(&mut self, year: i32) -> DashboardResult<ChangeTopics> {
        if !self.year_domain.contains(year) {
            return Err(year_out_of_domain(year, self.year_domain));
        }
        self.selected_year = year;
        Ok(self.clear_drill_down(ChangeTopics::from_topic(ChangeTopic::Year)))
    }

    pub fn set_event_type_enabled(
        &mut self,
        event_type: EventType,
        enabled: bool,
    ) -> DashboardResult<ChangeTopics> {
        self.enabled_event_types = if enabled {
            self.enabled_event_types.with(event_type)
        } else {
            self.enabled_event_types.without(event_type)
        };
        Ok(self.clear_drill_down(ChangeTopics::from_topic(ChangeTopic::EventTypes)))
    }

    /// Same as `set_event_type_enabled` but resolves the category from its
    /// dataset label first.
    pub fn set_event_type_label_enabled(
        &mut self,
        label: &str,
        enabled: bool,
    ) -> DashboardResult<ChangeTopics> {
        let event_type = EventType::from_label(label).ok_or_else(|| {
            DashboardError::InvalidSelection(format!("unknown event type `{label}`"))
        })?;
        self.set_event_type_enabled(event_type, enabled)
    }

    pub fn set_all_event_types(&mut self, enabled: bool) -> DashboardResult<ChangeTopics> {
        self.enabled_event_types = if enabled {
            EventTypeSet::all()
        } else {
            EventTypeSet::none()
        };
        Ok(self.clear_drill_down(ChangeTopics::from_topic(ChangeTopic::EventTypes)))
    }

    /// Whether the chart may drill is checked by the caller; this only
    /// records the selection.
    pub fn set_drill_down(
        &mut self,
        chart_id: ChartId,
        entity_key: Option<EntityKey>,
    ) -> DashboardResult<ChangeTopics> {
        if let Some(key) = &entity_key
            && key.as_str().is_empty()
        {
            return Err(DashboardError::InvalidSelection(
                "drill-down entity key must not be empty".to_owned(),
            ));
        }
        self.drill_down = entity_key.map(|entity_key| DrillDownSelection {
            chart_id,
            entity_key,
        });
        Ok(ChangeTopics::from_topic(ChangeTopic::DrillDown))
    }

    /// Replaces the valid year range after datasets load.
    ///
    /// A selected year outside the new range moves to the nearest bound.
    pub fn set_year_domain(&mut self, year_domain: YearRange) -> ChangeTopics {
        self.year_domain = year_domain;
        if year_domain.contains(self.selected_year) {
            return ChangeTopics::from_topic(ChangeTopic::Datasets);
        }
        self.selected_year = self.selected_year.clamp(year_domain.start, year_domain.end);
        self.clear_drill_down(
            ChangeTopics::from_topic(ChangeTopic::Datasets).with_topic(ChangeTopic::Year),
        )
    }

    /// Feeds a filter change to the drilled chart's state machine.
    fn clear_drill_down(&mut self, topics: ChangeTopics) -> ChangeTopics {
        let Some(selection) = self.drill_down.take() else {
            return topics;
        };
        let next = DrillDownState::for_chart(Some(&selection), &selection.chart_id)
            .next(DrillDownInput::FilterChanged);
        match next {
            DrillDownState::Overview => topics.with_topic(ChangeTopic::DrillDown),
            DrillDownState::Detail(entity_key) => {
                self.drill_down = Some(DrillDownSelection {
                    chart_id: selection.chart_id,
                    entity_key,
                });
                topics
            }
        }
    }
}

fn year_out_of_domain(year: i32, domain: YearRange) -> DashboardError {
    DashboardError::InvalidSelection(format!(
        "year {year} is outside the observed range {}..={}",
        domain.start, domain.end
    ))
}
