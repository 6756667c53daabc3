//! battlelens: cross-chart coordination and incremental redraw engine.
//!
//! This crate drives a conflict-event and arms-revenue dashboard: one shared
//! filter state, keyed enter/update/exit diffing per chart, drill-down views
//! and one-way annotation relays between charts. Rendering stays behind the
//! `render::Renderer` trait.

pub mod api;
pub mod charts;
pub mod core;
pub mod data;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Dashboard, DashboardConfig};
pub use error::{DashboardError, DashboardResult, LoadError};
