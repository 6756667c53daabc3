//! Hooks for host code and overlay helpers that sit outside the redraw core.

pub mod observers;
pub mod pinpoints;

pub use observers::{DashboardEvent, DashboardObserver, ObserverContext};
pub use pinpoints::{Pinpoint, PinpointStyle, place_pinpoints};
