use serde::{Deserialize, Serialize};

use crate::api::DrillDownSelection;
use crate::core::{ChartId, EntityKey};

/// Hierarchical view state of one chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrillDownState {
    #[default]
    Overview,
    Detail(EntityKey),
}

/// Input driving a chart's drill-down state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillDownInput {
    /// Click on an aggregate element.
    Select(EntityKey),
    /// Explicit back action.
    Back,
    /// Any upstream filter change.
    FilterChanged,
}

impl DrillDownState {
    /// State of `chart_id` given the shared selection.
    #[must_use]
    pub fn for_chart(selection: Option<&DrillDownSelection>, chart_id: &ChartId) -> Self {
        match selection {
            Some(selection) if &selection.chart_id == chart_id => {
                Self::Detail(selection.entity_key.clone())
            }
            _ => Self::Overview,
        }
    }

    /// `Overview -> Detail(k)` on select; any state returns to `Overview` on
    /// back or a filter change. Selecting while already in detail keeps the
    /// current entity.
    #[must_use]
    pub fn next(&self, input: DrillDownInput) -> Self {
        match (self, input) {
            (Self::Overview, DrillDownInput::Select(key)) => Self::Detail(key),
            (Self::Detail(current), DrillDownInput::Select(_)) => Self::Detail(current.clone()),
            (_, DrillDownInput::Back | DrillDownInput::FilterChanged) => Self::Overview,
        }
    }

    #[must_use]
    pub fn is_detail(&self) -> bool {
        matches!(self, Self::Detail(_))
    }

    #[must_use]
    pub fn entity(&self) -> Option<&EntityKey> {
        match self {
            Self::Overview => None,
            Self::Detail(key) => Some(key),
        }
    }
}
