use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::KeyDiff;
use crate::core::EntityKey;
use crate::render::{CanvasLayerKind, ElementPhase, FrameElement, Primitive};

/// Durations applied to keyed element transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    pub enter_ms: f64,
    pub update_ms: f64,
    pub exit_ms: f64,
    pub overlay_fade_ms: f64,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            enter_ms: 300.0,
            update_ms: 300.0,
            exit_ms: 300.0,
            overlay_fade_ms: 500.0,
        }
    }
}

impl TransitionTiming {
    /// No animation at all.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            enter_ms: 0.0,
            update_ms: 0.0,
            exit_ms: 0.0,
            overlay_fade_ms: 0.0,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.enter_ms, self.update_ms, self.exit_ms, self.overlay_fade_ms]
            .into_iter()
            .all(|value| value.is_finite() && value >= 0.0)
    }
}

/// One keyed element's slot: where it animates from and to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ElementSlot {
    layer: CanvasLayerKind,
    phase: ElementPhase,
    from: Primitive,
    to: Primitive,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl ElementSlot {
    fn is_settled(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Outcome of interrupting in-flight transitions at the start of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptSummary {
    /// Exits cut short and removed.
    pub finalized_exits: usize,
    /// Enters/updates jumped to their target state.
    pub snapped: usize,
}

/// Visual slots of one chart and their in-flight transitions.
///
/// A new pass first interrupts every running transition so that an exiting
/// slot is gone before a key can enter again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionLedger {
    slots: IndexMap<EntityKey, ElementSlot>,
}

impl TransitionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&mut self) -> InterruptSummary {
        let mut summary = InterruptSummary::default();
        self.slots.retain(|_, slot| {
            if slot.is_settled() {
                return slot.phase != ElementPhase::Exit;
            }
            if slot.phase == ElementPhase::Exit {
                summary.finalized_exits += 1;
                return false;
            }
            summary.snapped += 1;
            slot.elapsed_ms = slot.duration_ms;
            true
        });
        summary
    }

    /// Turns a diff plus the new scene's elements into frame elements and
    /// records them as the chart's slots.
    ///
    /// Call `interrupt` first. Enter elements start from their neutral state,
    /// updates from the slot's settled state, exits animate to neutral.
    pub fn begin_pass<'a>(
        &mut self,
        diff: &KeyDiff,
        mut element: impl FnMut(&EntityKey) -> Option<(CanvasLayerKind, &'a Primitive)>,
        timing: TransitionTiming,
    ) -> Vec<FrameElement> {
        let mut frame_elements = Vec::with_capacity(diff.len());

        for key in &diff.exit {
            let Some((layer, from)) = self
                .slots
                .get(key)
                .map(|slot| (slot.layer, slot.to.clone()))
            else {
                continue;
            };
            let to = from.neutral();
            frame_elements.push(FrameElement {
                key: key.clone(),
                layer,
                phase: ElementPhase::Exit,
                from: from.clone(),
                to: to.clone(),
                duration_ms: timing.exit_ms,
            });
            if timing.exit_ms > 0.0 {
                self.slots.insert(
                    key.clone(),
                    ElementSlot {
                        layer,
                        phase: ElementPhase::Exit,
                        from,
                        to,
                        duration_ms: timing.exit_ms,
                        elapsed_ms: 0.0,
                    },
                );
            } else {
                self.slots.shift_remove(key);
            }
        }

        for (phase, keys, duration_ms) in [
            (ElementPhase::Enter, &diff.enter, timing.enter_ms),
            (ElementPhase::Update, &diff.update, timing.update_ms),
        ] {
            for key in keys {
                let Some((layer, target)) = element(key) else {
                    continue;
                };
                let from = match (phase, self.slots.get(key)) {
                    (ElementPhase::Update, Some(slot)) => slot.to.clone(),
                    _ => target.neutral(),
                };
                frame_elements.push(FrameElement {
                    key: key.clone(),
                    layer,
                    phase,
                    from: from.clone(),
                    to: target.clone(),
                    duration_ms,
                });
                self.slots.insert(
                    key.clone(),
                    ElementSlot {
                        layer,
                        phase,
                        from,
                        to: target.clone(),
                        duration_ms,
                        elapsed_ms: 0.0,
                    },
                );
            }
        }

        frame_elements
    }

    /// Advances every transition by `elapsed_ms`; finished exits are removed.
    /// Returns how many transitions finished during this step.
    pub fn advance(&mut self, elapsed_ms: f64) -> usize {
        let step = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let mut finished = 0;
        self.slots.retain(|_, slot| {
            if slot.is_settled() {
                return true;
            }
            slot.elapsed_ms += step;
            if !slot.is_settled() {
                return true;
            }
            finished += 1;
            slot.phase != ElementPhase::Exit
        });
        finished
    }

    /// Removes every slot at once; used when a chart loses its data.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.slots.values().filter(|slot| !slot.is_settled()).count()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    /// Number of occupied slots, including exits still animating out.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn phase_of(&self, key: &EntityKey) -> Option<ElementPhase> {
        self.slots.get(key).map(|slot| slot.phase)
    }
}
