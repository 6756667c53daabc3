use serde::{Deserialize, Serialize};

/// Paint layers of one chart surface, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Marks,
    Labels,
    Backdrop,
    Annotation,
    Legend,
    Control,
    Tooltip,
}

impl CanvasLayerKind {
    pub const CANONICAL_ORDER: [Self; 8] = [
        Self::Background,
        Self::Marks,
        Self::Labels,
        Self::Backdrop,
        Self::Annotation,
        Self::Legend,
        Self::Control,
        Self::Tooltip,
    ];

    /// `true` for layers owned by transient overlays rather than keyed marks.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Backdrop | Self::Annotation | Self::Legend | Self::Control | Self::Tooltip
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn canonical_order_is_sorted_and_transient_layers_follow_marks() {
        let mut sorted = CanvasLayerKind::CANONICAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, CanvasLayerKind::CANONICAL_ORDER);
        assert!(!CanvasLayerKind::Marks.is_transient());
        assert!(!CanvasLayerKind::Labels.is_transient());
        assert!(CanvasLayerKind::Tooltip.is_transient());
    }
}
