//! Platform interface over GPU handles.
//!
//! Every handle the frame pipeline touches is reached through these traits,
//! so the wgpu backend and the headless backend are interchangeable.
//!
//! Single use is enforced by ownership: [`RenderPass::end`],
//! [`CommandRecording::finish`], [`Device::submit`] and
//! [`SurfaceTexture::present`] all consume their receiver or arguments.
//!
//! ```
//! use prism_engine::device::{
//!     ColorAttachment, CommandRecording, Device, RenderPass, RenderPassDesc,
//! };
//! use prism_engine::headless::{HeadlessDevice, HeadlessView};
//!
//! let device = HeadlessDevice::detached();
//! let view = HeadlessView::detached();
//! let mut recording = device.create_recording(None);
//! let attachments = [ColorAttachment::clear(&view, prism_engine::wgpu::Color::BLACK)];
//! let mut pass = recording.begin_render_pass(&RenderPassDesc::new(None, &attachments));
//! pass.insert_debug_marker("clear");
//! pass.end();
//! let buffer = recording.finish();
//! device.submit(std::iter::once(buffer));
//! ```
//!
//! A pass accepts no command once ended:
//!
//! ```compile_fail
//! use prism_engine::device::{
//!     ColorAttachment, CommandRecording, Device, RenderPass, RenderPassDesc,
//! };
//! use prism_engine::headless::{HeadlessDevice, HeadlessView};
//!
//! let device = HeadlessDevice::detached();
//! let view = HeadlessView::detached();
//! let mut recording = device.create_recording(None);
//! let attachments = [ColorAttachment::clear(&view, prism_engine::wgpu::Color::BLACK)];
//! let mut pass = recording.begin_render_pass(&RenderPassDesc::new(None, &attachments));
//! pass.end();
//! pass.insert_debug_marker("too late");
//! ```
//!
//! A recording is finished at most once:
//!
//! ```compile_fail
//! use prism_engine::device::{CommandRecording, Device};
//! use prism_engine::headless::HeadlessDevice;
//!
//! let device = HeadlessDevice::detached();
//! let recording = device.create_recording(None);
//! let first = recording.finish();
//! let second = recording.finish();
//! ```
//!
//! A command buffer is submitted at most once:
//!
//! ```compile_fail
//! use prism_engine::device::{CommandRecording, Device};
//! use prism_engine::headless::HeadlessDevice;
//!
//! let device = HeadlessDevice::detached();
//! let buffer = device.create_recording(None).finish();
//! device.submit(std::iter::once(buffer));
//! device.submit(std::iter::once(buffer));
//! ```

use std::fmt;
use std::future::Future;

use winit::dpi::PhysicalSize;

use super::{FrameError, InitError};

/// Options for adapter acquisition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct AdapterRequest {
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
}

/// Options for device acquisition.
#[derive(Debug, Clone)]
pub struct DeviceRequest<'a> {
    pub label: Option<&'a str>,
    pub required_features: wgpu::Features,
    pub required_limits: &'a wgpu::Limits,
}

/// Human-readable adapter identity, used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSummary {
    pub name: String,
    pub backend: String,
    pub device_type: String,
}

impl fmt::Display for AdapterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.backend, self.device_type)
    }
}

/// One color attachment of a render pass.
#[derive(Debug)]
pub struct ColorAttachment<'a, V> {
    pub view: &'a V,
    pub ops: wgpu::Operations<wgpu::Color>,
}

impl<V> Clone for ColorAttachment<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for ColorAttachment<'_, V> {}

impl<'a, V> ColorAttachment<'a, V> {
    /// Attachment that clears `view` to `color` and stores the result.
    pub fn clear(view: &'a V, color: wgpu::Color) -> Self {
        Self {
            view,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color),
                store: wgpu::StoreOp::Store,
            },
        }
    }
}

/// Render pass layout: the attachments the pass writes to.
#[derive(Debug)]
pub struct RenderPassDesc<'a, V> {
    pub label: Option<&'a str>,
    pub color_attachments: &'a [ColorAttachment<'a, V>],
}

impl<'a, V> RenderPassDesc<'a, V> {
    pub fn new(label: Option<&'a str>, color_attachments: &'a [ColorAttachment<'a, V>]) -> Self {
        Self { label, color_attachments }
    }
}

/// Entry point into a GPU implementation.
pub trait Platform {
    /// Presentation target a surface is created for (a window, a canvas, ...).
    type Target;
    type Adapter: Adapter<Device = Self::Device>;
    type Device: Device;
    type Surface: SurfaceContext<Adapter = Self::Adapter, Device = Self::Device>;

    /// Feature-presence check for a GPU entry point.
    fn is_supported(&self) -> bool;

    fn create_surface(&self, target: Self::Target) -> Result<Self::Surface, InitError>;

    /// Resolves to `None` when no adapter satisfies the request.
    fn request_adapter(
        &self,
        request: &AdapterRequest,
        surface: &Self::Surface,
    ) -> impl Future<Output = Option<Self::Adapter>>;
}

pub trait Adapter {
    type Device: Device;

    fn summary(&self) -> AdapterSummary;

    fn request_device(
        &self,
        request: &DeviceRequest<'_>,
    ) -> impl Future<Output = Result<Self::Device, InitError>>;
}

/// Logical device together with its single work queue.
pub trait Device {
    type View;
    type CommandBuffer;
    type Recording: CommandRecording<View = Self::View, Buffer = Self::CommandBuffer>;

    fn create_recording(&self, label: Option<&str>) -> Self::Recording;

    /// Enqueues `buffers` in order. Returns once the work is scheduled, not
    /// once it has executed.
    fn submit<I>(&self, buffers: I)
    where
        I: IntoIterator<Item = Self::CommandBuffer>;
}

pub trait CommandRecording {
    type View;
    type Buffer;
    type Pass<'p>: RenderPass
    where
        Self: 'p;

    /// Opens a pass. The recording stays mutably borrowed until the pass ends.
    fn begin_render_pass<'p>(&'p mut self, desc: &RenderPassDesc<'_, Self::View>) -> Self::Pass<'p>;

    fn finish(self) -> Self::Buffer;
}

pub trait RenderPass {
    fn insert_debug_marker(&mut self, label: &str);

    /// Closes the pass.
    fn end(self);
}

pub trait SurfaceContext {
    type Adapter;
    type Device: Device;
    type Texture: SurfaceTexture<View = <Self::Device as Device>::View>;

    /// Drawable size in physical pixels.
    fn size(&self) -> PhysicalSize<u32>;

    /// Formats, present modes and alpha modes usable with `adapter`.
    /// The first format is the platform's preferred one.
    fn capabilities(&self, adapter: &Self::Adapter) -> wgpu::SurfaceCapabilities;

    fn configure(&mut self, device: &Self::Device, config: &wgpu::SurfaceConfiguration);

    /// Acquires the texture to draw the next frame into.
    fn current_texture(&mut self) -> Result<Self::Texture, FrameError>;
}

pub trait SurfaceTexture {
    type View;

    /// Creates a view over the whole texture.
    fn create_view(&self) -> Self::View;

    fn present(self);
}
