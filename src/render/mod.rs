mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;

pub use frame::{ElementPhase, FrameElement, FrameKind, OverlayItem, RenderFrame};
pub use layer_stack::CanvasLayerKind;
pub use null_renderer::NullRenderer;
pub use primitives::{
    AreaPrimitive, ArcPrimitive, CirclePrimitive, Color, PathPrimitive, PolygonPrimitive,
    PolylinePrimitive, Primitive, RectPrimitive, RibbonPrimitive, TextHAlign, TextPrimitive,
};

use crate::error::DashboardResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` per
/// chart so drawing code stays isolated from filtering, diffing and
/// interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> DashboardResult<()>;
}
