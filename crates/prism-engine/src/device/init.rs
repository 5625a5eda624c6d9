use super::platform::{AdapterRequest, DeviceRequest};

/// Initialization parameters for the GPU layer.
///
/// The defaults describe an unconstrained request: default power preference,
/// no required features, default limits.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the wgpu instance may use.
    pub backends: wgpu::Backends,

    /// Adapter power preference. `None` leaves the choice to the platform.
    pub power_preference: wgpu::PowerPreference,

    /// Only accept a software fallback adapter.
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Present mode (swap behavior). Falls back to FIFO when unsupported.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Debug label attached to the device.
    pub device_label: Option<String>,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            device_label: Some("prism device".to_string()),
        }
    }
}

impl GpuInit {
    pub fn adapter_request(&self) -> AdapterRequest {
        AdapterRequest {
            power_preference: self.power_preference,
            force_fallback_adapter: self.force_fallback_adapter,
        }
    }

    pub fn device_request(&self) -> DeviceRequest<'_> {
        DeviceRequest {
            label: self.device_label.as_deref(),
            required_features: self.required_features,
            required_limits: &self.required_limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_unconstrained() {
        let init = GpuInit::default();

        let adapter = init.adapter_request();
        assert_eq!(adapter.power_preference, wgpu::PowerPreference::None);
        assert!(!adapter.force_fallback_adapter);

        let device = init.device_request();
        assert!(device.required_features.is_empty());
        assert_eq!(device.label, Some("prism device"));
    }
}
