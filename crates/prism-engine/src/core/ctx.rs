use winit::window::Window;

use crate::device::{FrameSubmitter, SurfaceErrorAction, WgpuPlatform};
use crate::paint::Color;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by the surface
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub submitter: &'a mut FrameSubmitter<WgpuPlatform<'w>>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the window to `color` and presents it.
    ///
    /// Surface errors are routed through [`FrameSubmitter::recover`]; only a
    /// fatal one asks the runtime to exit.
    pub fn clear(&mut self, color: Color) -> AppControl {
        self.window.pre_present_notify();

        let Err(err) = self.submitter.submit_clear_frame(color) else {
            return AppControl::Continue;
        };

        match self.submitter.recover(&err) {
            SurfaceErrorAction::Fatal => AppControl::Exit,
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                AppControl::Continue
            }
        }
    }

    /// Number of frames presented in this window so far.
    pub fn frames_submitted(&self) -> u64 {
        self.submitter.frames_submitted()
    }
}
