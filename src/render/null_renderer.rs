use crate::error::DashboardResult;
use crate::render::{ElementPhase, FrameKind, RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests catch invalid geometry before a
/// real backend is attached.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub structural_frames: usize,
    pub last_enter_count: usize,
    pub last_update_count: usize,
    pub last_exit_count: usize,
    pub last_overlay_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> DashboardResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        if frame.kind != FrameKind::OverlayOnly {
            self.structural_frames += 1;
            self.last_enter_count = frame.count_phase(ElementPhase::Enter);
            self.last_update_count = frame.count_phase(ElementPhase::Update);
            self.last_exit_count = frame.count_phase(ElementPhase::Exit);
        }
        self.last_overlay_count = frame.overlays.len();
        Ok(())
    }
}
