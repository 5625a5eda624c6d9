//! Prism engine crate.
//!
//! Acquires a GPU device, configures a presentation surface and submits
//! clear-color frames, over wgpu or a headless backend.

pub mod device;
pub mod headless;
pub mod paint;
pub mod logging;
pub mod core;
pub mod window;

pub use wgpu;
