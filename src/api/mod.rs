mod bridge;
mod chart;
mod config;
mod dashboard;
mod data_controller;
mod drill_down;
mod fetch;
mod filter_controller;
mod filter_state;
mod filtered_view;
mod interaction_controller;
mod json_contract;
mod key_diff;
mod observer_dispatch;
mod redraw;
mod registry;
mod snapshot;
mod snapshot_controller;
mod transitions;

pub use bridge::{CrossChartBridge, RelayReport};
pub use chart::{
    ChartScene, ClickAction, DashboardChart, InteractionPayload, KeyIdentity, SceneElement,
    ViewCommand,
};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use data_controller::LoadSummary;
pub use drill_down::{DrillDownInput, DrillDownState};
pub use fetch::{FetchOutcome, FetchTicket, FetchTracker};
pub use filter_state::{ChangeTopic, ChangeTopics, DrillDownSelection, FilterState};
pub use filtered_view::FilteredView;
pub use interaction_controller::ClickOutcome;
pub use json_contract::{DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1, DashboardSnapshotJsonContractV1};
pub use key_diff::{DiffCounts, KeyDiff, diff_keys, rebuild_keys};
pub use redraw::{
    ChartRedrawOutcome, ChartRedrawStatus, RedrawCoordinator, RedrawReport, RedrawRequest,
};
pub use registry::{ChartOverlays, ChartRegistry, ChartSlot};
pub use snapshot::{ChartSnapshot, DashboardSnapshot, FilterSnapshot};
pub use transitions::{InterruptSummary, TransitionLedger, TransitionTiming};
