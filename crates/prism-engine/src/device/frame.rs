use winit::dpi::PhysicalSize;

use crate::paint::Color;

use super::platform::{
    Adapter, ColorAttachment, CommandRecording, Device, Platform, RenderPass, RenderPassDesc,
    SurfaceContext, SurfaceTexture,
};
use super::surface;
use super::{FrameError, GpuInit, InitError, SurfaceErrorAction};

/// Owns the device and the configured surface, and submits clear frames.
///
/// Lifecycle:
/// - [`initialize`](Self::initialize) acquires adapter and device, then
///   configures the surface with the platform-preferred format
/// - [`submit_clear_frame`](Self::submit_clear_frame) records and submits one
///   clear pass against a freshly acquired surface texture
pub struct FrameSubmitter<P: Platform> {
    adapter: P::Adapter,
    device: P::Device,
    surface: P::Surface,

    /// Configuration the surface was last configured with.
    config: wgpu::SurfaceConfiguration,

    frames_submitted: u64,
}

impl<P: Platform> FrameSubmitter<P> {
    /// Brings up the GPU for `target`.
    ///
    /// Adapter and device acquisition are the only suspension points.
    pub async fn initialize(
        platform: &P,
        target: P::Target,
        init: &GpuInit,
    ) -> Result<Self, InitError> {
        if !platform.is_supported() {
            return Err(InitError::NoGpuSupport);
        }

        let mut surface = platform.create_surface(target)?;
        let size = surface.size();
        if size.width == 0 || size.height == 0 {
            return Err(InitError::ZeroSizedSurface {
                width: size.width,
                height: size.height,
            });
        }

        let adapter = platform
            .request_adapter(&init.adapter_request(), &surface)
            .await
            .ok_or(InitError::NoAdapterFound)?;
        log::info!("using adapter: {}", adapter.summary());

        let device = adapter.request_device(&init.device_request()).await?;

        let caps = surface.capabilities(&adapter);
        let format = surface::preferred_format(&caps).ok_or(InitError::NoSurfaceFormat)?;
        let config = surface::surface_config(&caps, format, size, init);

        surface.configure(&device, &config);
        log::debug!(
            "surface configured: {:?} {}x{} {:?}",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Self {
            adapter,
            device,
            surface,
            config,
            frames_submitted: 0,
        })
    }

    /// Schedules the surface to be cleared to `color`.
    ///
    /// Records exactly one render pass with one color attachment
    /// (load: clear, store: store) and no draw commands, submits it, then
    /// presents. Submission only enqueues work.
    pub fn submit_clear_frame(&mut self, color: Color) -> Result<(), FrameError> {
        let mut recording = self.device.create_recording(Some("prism clear encoder"));

        // A view is only valid for the texture of the current frame.
        let texture = self.surface.current_texture()?;
        let view = texture.create_view();

        {
            let attachments = [ColorAttachment::clear(&view, color.into())];
            let pass = recording.begin_render_pass(&RenderPassDesc::new(
                Some("prism clear pass"),
                &attachments,
            ));
            pass.end();
        }

        let buffer = recording.finish();
        self.device.submit(std::iter::once(buffer));

        drop(view);
        texture.present();

        self.frames_submitted += 1;
        log::trace!("clear frame {} submitted ({color})", self.frames_submitted);

        Ok(())
    }

    /// Converts a frame error into a higher-level action.
    ///
    /// Lost or outdated surfaces are configured again with the current
    /// configuration, once.
    pub fn recover(&mut self, err: &FrameError) -> SurfaceErrorAction {
        let action = err.action();
        match action {
            SurfaceErrorAction::Reconfigured => {
                log::warn!("{err}; reconfiguring surface");
                self.surface.configure(&self.device, &self.config);
            }
            SurfaceErrorAction::SkipFrame => log::debug!("{err}; skipping frame"),
            SurfaceErrorAction::Fatal => log::error!("{err}"),
        }
        action
    }

    /// Returns the active surface format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the configured drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    pub fn adapter(&self) -> &P::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &P::Device {
        &self.device
    }

    pub fn surface(&self) -> &P::Surface {
        &self.surface
    }

    /// Number of clear frames submitted so far.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }
}
