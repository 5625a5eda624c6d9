use thiserror::Error;

/// Fatal failures while bringing up the GPU.
///
/// None of these are retried: hardware and platform support do not change
/// within a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// The platform exposes no GPU entry point at all.
    #[error("GPU access is not supported on this platform")]
    NoGpuSupport,

    /// GPU access exists but no adapter satisfies the request.
    #[error("no appropriate GPU adapter found")]
    NoAdapterFound,

    #[error("failed to create surface: {0}")]
    Surface(String),

    #[error("surface has zero size ({width}x{height})")]
    ZeroSizedSurface { width: u32, height: u32 },

    #[error("failed to create device: {0}")]
    DeviceRequest(String),

    /// The surface reports no format for the selected adapter.
    #[error("surface reports no supported formats for the adapter")]
    NoSurfaceFormat,
}

/// Failure to produce a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A texture was requested before the surface was configured.
    #[error("surface is not configured")]
    Unconfigured,

    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl FrameError {
    /// Maps the error to the action a frame loop should take.
    pub fn action(&self) -> SurfaceErrorAction {
        match self {
            FrameError::Unconfigured => SurfaceErrorAction::Fatal,
            FrameError::Surface(err) => match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    SurfaceErrorAction::Reconfigured
                }
                wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
                wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
                    SurfaceErrorAction::SkipFrame
                }
            },
        }
    }
}

/// High-level response after a frame error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(
            FrameError::from(wgpu::SurfaceError::Lost).action(),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            FrameError::from(wgpu::SurfaceError::Outdated).action(),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn timeout_skips_frame() {
        assert_eq!(
            FrameError::from(wgpu::SurfaceError::Timeout).action(),
            SurfaceErrorAction::SkipFrame
        );
    }

    #[test]
    fn oom_and_unconfigured_are_fatal() {
        assert_eq!(
            FrameError::from(wgpu::SurfaceError::OutOfMemory).action(),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(FrameError::Unconfigured.action(), SurfaceErrorAction::Fatal);
    }

    #[test]
    fn init_error_messages() {
        assert_eq!(
            InitError::NoGpuSupport.to_string(),
            "GPU access is not supported on this platform"
        );
        assert_eq!(
            InitError::ZeroSizedSurface { width: 0, height: 600 }.to_string(),
            "surface has zero size (0x600)"
        );
    }
}
