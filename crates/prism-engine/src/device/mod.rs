//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the platform interface over adapter, device, surface and command handles
//! - the wgpu implementation of that interface
//! - [`FrameSubmitter`], which acquires the device, configures the surface and
//!   submits clear frames

mod error;
mod frame;
mod gpu;
mod init;
mod platform;
mod surface;

pub use error::{FrameError, InitError, SurfaceErrorAction};
pub use frame::FrameSubmitter;
pub use gpu::{
    WgpuAdapter, WgpuDevice, WgpuPlatform, WgpuRecording, WgpuRenderPass, WgpuSurface,
    WgpuSurfaceTexture, WgpuTarget,
};
pub use init::GpuInit;
pub use platform::{
    Adapter, AdapterRequest, AdapterSummary, ColorAttachment, CommandRecording, Device,
    DeviceRequest, Platform, RenderPass, RenderPassDesc, SurfaceContext, SurfaceTexture,
};
