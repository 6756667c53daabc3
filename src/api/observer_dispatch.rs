use crate::error::{DashboardError, DashboardResult};
use crate::extensions::{DashboardEvent, DashboardObserver, ObserverContext};
use crate::render::Renderer;

use super::Dashboard;

impl<R: Renderer> Dashboard<R> {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn DashboardObserver>) -> DashboardResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(DashboardError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(DashboardError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn observer_context(&self) -> ObserverContext {
        ObserverContext {
            selected_year: self.filter.selected_year(),
            enabled_event_types: self.filter.enabled_event_types(),
            drill_down: self.filter.drill_down().cloned(),
            passes: self.coordinator.passes(),
            charts: self.registry.len(),
        }
    }

    pub(super) fn emit(&mut self, event: DashboardEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(&event, &context);
        }
    }
}
