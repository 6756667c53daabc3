use serde::{Deserialize, Serialize};

use crate::api::{ChangeTopics, DiffCounts, DrillDownSelection};
use crate::core::{ChartId, EntityKey, EventTypeSet};

/// Read-only dashboard state passed to observer hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub selected_year: i32,
    pub enabled_event_types: EventTypeSet,
    pub drill_down: Option<DrillDownSelection>,
    pub passes: u64,
    pub charts: usize,
}

/// Typed state-change events delivered to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashboardEvent {
    FilterChanged {
        topics: ChangeTopics,
    },
    ChartRedrawn {
        chart_id: ChartId,
        counts: DiffCounts,
    },
    ChartFailed {
        chart_id: ChartId,
        reason: String,
    },
    PassCompleted {
        pass: u64,
        redrawn: usize,
        failed: usize,
    },
    DrillDownChanged {
        chart_id: ChartId,
        entity: Option<EntityKey>,
    },
    AnnotationsRelayed {
        source: ChartId,
        target: ChartId,
        annotations: usize,
    },
    DatasetLoadFailed {
        source_name: String,
        reason: String,
    },
    FetchDiscarded {
        year: i32,
        current_year: i32,
    },
}

/// Subscription interface for host code.
///
/// Observers see events and a context snapshot; they cannot reach the
/// dashboard's setters from inside a hook.
pub trait DashboardObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &DashboardEvent, context: &ObserverContext);
}
