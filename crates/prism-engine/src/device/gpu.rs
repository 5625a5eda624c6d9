use std::marker::PhantomData;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::platform::{
    Adapter, AdapterRequest, AdapterSummary, CommandRecording, Device, DeviceRequest, Platform,
    RenderPass, RenderPassDesc, SurfaceContext, SurfaceTexture,
};
use super::{FrameError, GpuInit, InitError};

/// wgpu-backed platform.
///
/// `'w` is the lifetime of the presentation target the surface borrows.
pub struct WgpuPlatform<'w> {
    /// wgpu instance used to create the adapter and surface.
    instance: wgpu::Instance,

    /// Backends the instance was created with.
    backends: wgpu::Backends,

    _target: PhantomData<&'w ()>,
}

impl<'w> WgpuPlatform<'w> {
    pub fn new(init: &GpuInit) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        Self {
            instance,
            backends: init.backends,
            _target: PhantomData,
        }
    }
}

/// A presentation target plus its drawable size.
pub struct WgpuTarget<'w> {
    target: wgpu::SurfaceTarget<'w>,
    size: PhysicalSize<u32>,
}

impl<'w> WgpuTarget<'w> {
    pub fn new(target: impl Into<wgpu::SurfaceTarget<'w>>, size: PhysicalSize<u32>) -> Self {
        Self {
            target: target.into(),
            size,
        }
    }

    /// Targets `window` at its current inner size.
    pub fn from_window(window: &'w Window) -> Self {
        Self::new(window, window.inner_size())
    }
}

impl<'w> Platform for WgpuPlatform<'w> {
    type Target = WgpuTarget<'w>;
    type Adapter = WgpuAdapter;
    type Device = WgpuDevice;
    type Surface = WgpuSurface<'w>;

    fn is_supported(&self) -> bool {
        let compiled = wgpu::Instance::enabled_backend_features();
        !(compiled & self.backends).is_empty() && web_gpu_entry_point()
    }

    fn create_surface(&self, target: WgpuTarget<'w>) -> Result<WgpuSurface<'w>, InitError> {
        let surface = self
            .instance
            .create_surface(target.target)
            .map_err(|e| InitError::Surface(e.to_string()))?;

        Ok(WgpuSurface {
            surface,
            size: target.size,
            config: None,
        })
    }

    async fn request_adapter(
        &self,
        request: &AdapterRequest,
        surface: &WgpuSurface<'w>,
    ) -> Option<WgpuAdapter> {
        let result = self
            .instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: request.power_preference,
                compatible_surface: Some(&surface.surface),
                force_fallback_adapter: request.force_fallback_adapter,
            })
            .await;

        match result {
            Ok(adapter) => Some(WgpuAdapter(adapter)),
            Err(e) => {
                log::warn!("adapter request failed: {e}");
                None
            }
        }
    }
}

/// On the web the browser must expose `navigator.gpu`; WebGL2 fallback is
/// not a GPU entry point in this sense.
#[cfg(target_arch = "wasm32")]
fn web_gpu_entry_point() -> bool {
    web_sys::window()
        .map(|w| w.navigator())
        .and_then(|nav| {
            js_sys::Reflect::has(nav.as_ref(), &wasm_bindgen::JsValue::from_str("gpu")).ok()
        })
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn web_gpu_entry_point() -> bool {
    true
}

pub struct WgpuAdapter(wgpu::Adapter);

impl WgpuAdapter {
    pub fn raw(&self) -> &wgpu::Adapter {
        &self.0
    }
}

impl Adapter for WgpuAdapter {
    type Device = WgpuDevice;

    fn summary(&self) -> AdapterSummary {
        let info = self.0.get_info();
        AdapterSummary {
            name: info.name,
            backend: format!("{:?}", info.backend),
            device_type: format!("{:?}", info.device_type),
        }
    }

    async fn request_device(&self, request: &DeviceRequest<'_>) -> Result<WgpuDevice, InitError> {
        let (device, queue) = self
            .0
            .request_device(&wgpu::DeviceDescriptor {
                label: request.label,
                required_features: request.required_features,
                required_limits: request.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| InitError::DeviceRequest(e.to_string()))?;

        Ok(WgpuDevice { device, queue })
    }
}

/// Logical device and its command queue.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuDevice {
    pub fn raw(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl Device for WgpuDevice {
    type View = wgpu::TextureView;
    type CommandBuffer = wgpu::CommandBuffer;
    type Recording = WgpuRecording;

    fn create_recording(&self, label: Option<&str>) -> WgpuRecording {
        WgpuRecording(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label }),
        )
    }

    fn submit<I>(&self, buffers: I)
    where
        I: IntoIterator<Item = wgpu::CommandBuffer>,
    {
        self.queue.submit(buffers);
    }
}

pub struct WgpuRecording(wgpu::CommandEncoder);

impl CommandRecording for WgpuRecording {
    type View = wgpu::TextureView;
    type Buffer = wgpu::CommandBuffer;
    type Pass<'p> = WgpuRenderPass<'p>;

    fn begin_render_pass<'p>(
        &'p mut self,
        desc: &RenderPassDesc<'_, wgpu::TextureView>,
    ) -> WgpuRenderPass<'p> {
        let color_attachments: Vec<_> = desc
            .color_attachments
            .iter()
            .map(|a| {
                Some(wgpu::RenderPassColorAttachment {
                    view: a.view,
                    resolve_target: None,
                    ops: a.ops,
                    depth_slice: None,
                })
            })
            .collect();

        let pass = self.0.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: desc.label,
            color_attachments: &color_attachments,
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        WgpuRenderPass(pass)
    }

    fn finish(self) -> wgpu::CommandBuffer {
        self.0.finish()
    }
}

pub struct WgpuRenderPass<'p>(wgpu::RenderPass<'p>);

impl RenderPass for WgpuRenderPass<'_> {
    fn insert_debug_marker(&mut self, label: &str) {
        self.0.insert_debug_marker(label);
    }

    fn end(self) {
        // wgpu closes the pass when it is dropped.
        drop(self.0);
    }
}

/// Surface bound to a presentation target.
pub struct WgpuSurface<'w> {
    surface: wgpu::Surface<'w>,

    /// Size the target had when the surface was created.
    size: PhysicalSize<u32>,

    /// Active configuration; `None` until configured.
    config: Option<wgpu::SurfaceConfiguration>,
}

impl<'w> SurfaceContext for WgpuSurface<'w> {
    type Adapter = WgpuAdapter;
    type Device = WgpuDevice;
    type Texture = WgpuSurfaceTexture;

    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn capabilities(&self, adapter: &WgpuAdapter) -> wgpu::SurfaceCapabilities {
        self.surface.get_capabilities(&adapter.0)
    }

    fn configure(&mut self, device: &WgpuDevice, config: &wgpu::SurfaceConfiguration) {
        self.surface.configure(&device.device, config);
        self.config = Some(config.clone());
    }

    fn current_texture(&mut self) -> Result<WgpuSurfaceTexture, FrameError> {
        if self.config.is_none() {
            return Err(FrameError::Unconfigured);
        }
        let texture = self.surface.get_current_texture()?;
        Ok(WgpuSurfaceTexture(texture))
    }
}

pub struct WgpuSurfaceTexture(wgpu::SurfaceTexture);

impl SurfaceTexture for WgpuSurfaceTexture {
    type View = wgpu::TextureView;

    fn create_view(&self) -> wgpu::TextureView {
        self.0
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn present(self) {
        self.0.present();
    }
}
