use winit::dpi::PhysicalSize;

use crate::device::{
    Adapter, AdapterRequest, AdapterSummary, CommandRecording, Device, DeviceRequest, FrameError,
    InitError, Platform, RenderPass, RenderPassDesc, SurfaceContext, SurfaceTexture,
};

use super::journal::{
    Call, Journal, PassCommand, RecordedAttachment, RecordedBuffer, RecordedPass,
};

/// What the fake hardware reports.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Whether a GPU entry point is exposed at all.
    pub gpu_supported: bool,

    /// Whether an adapter request yields an adapter.
    pub adapter_available: bool,

    pub adapter_name: String,

    /// Surface formats, preferred first.
    pub formats: Vec<wgpu::TextureFormat>,
    pub present_modes: Vec<wgpu::PresentMode>,
    pub alpha_modes: Vec<wgpu::CompositeAlphaMode>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            gpu_supported: true,
            adapter_available: true,
            adapter_name: "headless adapter".to_string(),
            formats: vec![
                wgpu::TextureFormat::Bgra8UnormSrgb,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            ],
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
        }
    }
}

/// Platform that needs no GPU and journals every call.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    config: HeadlessConfig,
    journal: Journal,
}

impl HeadlessPlatform {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            journal: Journal::new(),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Makes the next texture acquisition on any surface of this platform fail.
    pub fn fail_next_acquire(&self, err: wgpu::SurfaceError) {
        self.journal.push_acquire_failure(err);
    }
}

/// Size-only presentation target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HeadlessTarget {
    pub size: PhysicalSize<u32>,
}

impl HeadlessTarget {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self { size }
    }
}

impl Platform for HeadlessPlatform {
    type Target = HeadlessTarget;
    type Adapter = HeadlessAdapter;
    type Device = HeadlessDevice;
    type Surface = HeadlessSurface;

    fn is_supported(&self) -> bool {
        self.config.gpu_supported
    }

    fn create_surface(&self, target: HeadlessTarget) -> Result<HeadlessSurface, InitError> {
        self.journal.record(Call::CreateSurface);
        Ok(HeadlessSurface {
            journal: self.journal.clone(),
            size: target.size,
            formats: self.config.formats.clone(),
            present_modes: self.config.present_modes.clone(),
            alpha_modes: self.config.alpha_modes.clone(),
            config: None,
        })
    }

    async fn request_adapter(
        &self,
        _request: &AdapterRequest,
        _surface: &HeadlessSurface,
    ) -> Option<HeadlessAdapter> {
        self.journal.record(Call::RequestAdapter);
        self.config.adapter_available.then(|| HeadlessAdapter {
            journal: self.journal.clone(),
            name: self.config.adapter_name.clone(),
        })
    }
}

#[derive(Debug)]
pub struct HeadlessAdapter {
    journal: Journal,
    name: String,
}

impl Adapter for HeadlessAdapter {
    type Device = HeadlessDevice;

    fn summary(&self) -> AdapterSummary {
        AdapterSummary {
            name: self.name.clone(),
            backend: "Noop".to_string(),
            device_type: "Cpu".to_string(),
        }
    }

    async fn request_device(&self, _request: &DeviceRequest<'_>) -> Result<HeadlessDevice, InitError> {
        self.journal.record(Call::RequestDevice);
        Ok(HeadlessDevice {
            journal: self.journal.clone(),
        })
    }
}

#[derive(Debug)]
pub struct HeadlessDevice {
    journal: Journal,
}

impl HeadlessDevice {
    /// Device with a journal of its own, not reachable from any platform.
    pub fn detached() -> Self {
        Self {
            journal: Journal::new(),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl Device for HeadlessDevice {
    type View = HeadlessView;
    type CommandBuffer = HeadlessCommandBuffer;
    type Recording = HeadlessRecording;

    fn create_recording(&self, label: Option<&str>) -> HeadlessRecording {
        let id = self.journal.next_id();
        self.journal.record(Call::CreateRecording { recording: id });
        HeadlessRecording {
            journal: self.journal.clone(),
            id,
            label: label.map(str::to_owned),
            passes: Vec::new(),
        }
    }

    fn submit<I>(&self, buffers: I)
    where
        I: IntoIterator<Item = HeadlessCommandBuffer>,
    {
        let records = buffers.into_iter().map(|b| b.record).collect();
        self.journal.push_submission(records);
    }
}

/// View over a headless texture.
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessView {
    pub id: u64,
    pub texture: u64,
}

impl HeadlessView {
    /// View not backed by any surface texture.
    pub fn detached() -> Self {
        Self { id: 0, texture: 0 }
    }
}

#[derive(Debug)]
pub struct HeadlessRecording {
    journal: Journal,
    id: u64,
    label: Option<String>,
    passes: Vec<RecordedPass>,
}

impl CommandRecording for HeadlessRecording {
    type View = HeadlessView;
    type Buffer = HeadlessCommandBuffer;
    type Pass<'p> = HeadlessPass<'p>;

    fn begin_render_pass<'p>(&'p mut self, desc: &RenderPassDesc<'_, HeadlessView>) -> HeadlessPass<'p> {
        self.journal.record(Call::BeginRenderPass { recording: self.id });
        let pass = RecordedPass {
            label: desc.label.map(str::to_owned),
            color_attachments: desc
                .color_attachments
                .iter()
                .map(|a| RecordedAttachment {
                    view: a.view.id,
                    texture: a.view.texture,
                    ops: a.ops,
                })
                .collect(),
            commands: Vec::new(),
        };
        HeadlessPass {
            recording: self,
            pass: Some(pass),
        }
    }

    fn finish(self) -> HeadlessCommandBuffer {
        self.journal.record(Call::Finish { recording: self.id });
        HeadlessCommandBuffer {
            record: RecordedBuffer {
                id: self.id,
                label: self.label,
                passes: self.passes,
            },
        }
    }
}

/// Open pass on a [`HeadlessRecording`].
///
/// Like a wgpu pass, dropping it ends it.
#[derive(Debug)]
pub struct HeadlessPass<'p> {
    recording: &'p mut HeadlessRecording,
    pass: Option<RecordedPass>,
}

impl HeadlessPass<'_> {
    fn close(&mut self) {
        if let Some(pass) = self.pass.take() {
            self.recording.journal.record(Call::EndRenderPass {
                recording: self.recording.id,
            });
            self.recording.passes.push(pass);
        }
    }
}

impl RenderPass for HeadlessPass<'_> {
    fn insert_debug_marker(&mut self, label: &str) {
        if let Some(pass) = self.pass.as_mut() {
            self.recording.journal.record(Call::DebugMarker {
                recording: self.recording.id,
                label: label.to_owned(),
            });
            pass.commands.push(PassCommand::DebugMarker(label.to_owned()));
        }
    }

    fn end(mut self) {
        self.close();
    }
}

impl Drop for HeadlessPass<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Finished, not yet submitted command buffer.
#[derive(Debug)]
pub struct HeadlessCommandBuffer {
    record: RecordedBuffer,
}

impl HeadlessCommandBuffer {
    pub fn record(&self) -> &RecordedBuffer {
        &self.record
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    journal: Journal,
    size: PhysicalSize<u32>,
    formats: Vec<wgpu::TextureFormat>,
    present_modes: Vec<wgpu::PresentMode>,
    alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    config: Option<wgpu::SurfaceConfiguration>,
}

impl HeadlessSurface {
    pub fn config(&self) -> Option<&wgpu::SurfaceConfiguration> {
        self.config.as_ref()
    }
}

impl SurfaceContext for HeadlessSurface {
    type Adapter = HeadlessAdapter;
    type Device = HeadlessDevice;
    type Texture = HeadlessTexture;

    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn capabilities(&self, _adapter: &HeadlessAdapter) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: self.formats.clone(),
            present_modes: self.present_modes.clone(),
            alpha_modes: self.alpha_modes.clone(),
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    fn configure(&mut self, _device: &HeadlessDevice, config: &wgpu::SurfaceConfiguration) {
        self.journal.record(Call::Configure {
            format: config.format,
            width: config.width,
            height: config.height,
        });
        self.config = Some(config.clone());
    }

    fn current_texture(&mut self) -> Result<HeadlessTexture, FrameError> {
        if self.config.is_none() {
            return Err(FrameError::Unconfigured);
        }
        if let Some(err) = self.journal.take_acquire_failure() {
            return Err(err.into());
        }

        let id = self.journal.next_id();
        self.journal.record(Call::AcquireTexture { texture: id });
        Ok(HeadlessTexture {
            journal: self.journal.clone(),
            id,
        })
    }
}

#[derive(Debug)]
pub struct HeadlessTexture {
    journal: Journal,
    id: u64,
}

impl SurfaceTexture for HeadlessTexture {
    type View = HeadlessView;

    fn create_view(&self) -> HeadlessView {
        let view = self.journal.next_id();
        self.journal.record(Call::CreateView {
            texture: self.id,
            view,
        });
        HeadlessView {
            id: view,
            texture: self.id,
        }
    }

    fn present(self) {
        self.journal.record(Call::Present { texture: self.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ColorAttachment;

    fn configured_surface(platform: &HeadlessPlatform) -> (HeadlessSurface, HeadlessDevice) {
        let mut surface = platform
            .create_surface(HeadlessTarget::new(PhysicalSize::new(64, 64)))
            .unwrap();
        let adapter =
            pollster::block_on(platform.request_adapter(&AdapterRequest::default(), &surface))
                .unwrap();
        let init = crate::device::GpuInit::default();
        let device = pollster::block_on(adapter.request_device(&init.device_request())).unwrap();

        let caps = surface.capabilities(&adapter);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: caps.formats[0],
            width: 64,
            height: 64,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        (surface, device)
    }

    // ── surface ───────────────────────────────────────────────────────────

    #[test]
    fn unconfigured_surface_rejects_acquire() {
        let platform = HeadlessPlatform::new(HeadlessConfig::default());
        let mut surface = platform
            .create_surface(HeadlessTarget::new(PhysicalSize::new(64, 64)))
            .unwrap();

        assert_eq!(surface.current_texture().err(), Some(FrameError::Unconfigured));
        assert!(!platform.journal().calls().iter().any(|c| c.name() == "acquire_texture"));
    }

    #[test]
    fn configured_surface_hands_out_distinct_textures() {
        let platform = HeadlessPlatform::new(HeadlessConfig::default());
        let (mut surface, _device) = configured_surface(&platform);

        let a = surface.current_texture().unwrap();
        let b = surface.current_texture().unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.create_view(), b.create_view());
    }

    #[test]
    fn adapter_summary_uses_configured_name() {
        let platform = HeadlessPlatform::new(HeadlessConfig {
            adapter_name: "test gpu".to_string(),
            ..Default::default()
        });
        let surface = platform
            .create_surface(HeadlessTarget::new(PhysicalSize::new(1, 1)))
            .unwrap();
        let adapter =
            pollster::block_on(platform.request_adapter(&AdapterRequest::default(), &surface))
                .unwrap();

        assert_eq!(adapter.summary().to_string(), "test gpu (Noop, Cpu)");
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[test]
    fn dropped_pass_is_ended() {
        let device = HeadlessDevice::detached();
        let view = HeadlessView::detached();
        let mut recording = device.create_recording(Some("drop"));
        {
            let attachments = [ColorAttachment::clear(&view, wgpu::Color::GREEN)];
            let _pass = recording.begin_render_pass(&RenderPassDesc::new(None, &attachments));
        }

        let buffer = recording.finish();

        assert_eq!(buffer.record().passes.len(), 1);
        assert_eq!(device.journal().count(|c| c.name() == "end_render_pass"), 1);
    }

    #[test]
    fn pass_commands_are_kept_in_order() {
        let device = HeadlessDevice::detached();
        let view = HeadlessView::detached();
        let mut recording = device.create_recording(None);
        {
            let attachments = [ColorAttachment::clear(&view, wgpu::Color::BLACK)];
            let mut pass = recording.begin_render_pass(&RenderPassDesc::new(Some("p"), &attachments));
            pass.insert_debug_marker("first");
            pass.insert_debug_marker("second");
            pass.end();
        }
        let buffer = recording.finish();

        let pass = &buffer.record().passes[0];
        assert_eq!(pass.label.as_deref(), Some("p"));
        assert_eq!(
            pass.commands,
            vec![
                PassCommand::DebugMarker("first".to_string()),
                PassCommand::DebugMarker("second".to_string()),
            ]
        );
    }

    #[test]
    fn one_submit_keeps_buffer_order() {
        let device = HeadlessDevice::detached();
        let first = device.create_recording(Some("a")).finish();
        let second = device.create_recording(Some("b")).finish();
        let ids = [first.record().id, second.record().id];

        device.submit([first, second]);

        let batches = device.journal().submissions();
        assert_eq!(batches.len(), 1);
        let submitted: Vec<u64> = batches[0].buffers.iter().map(|b| b.id).collect();
        assert_eq!(submitted, ids);
    }
}
