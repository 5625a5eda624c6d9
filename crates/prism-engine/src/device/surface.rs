use winit::dpi::PhysicalSize;

use super::GpuInit;

/// The platform-preferred format: the first one the surface reports.
pub(crate) fn preferred_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    caps.formats.first().copied()
}

pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    // FIFO is the one mode every surface must support.
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Builds the surface configuration for `format` at `size`.
pub(crate) fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    init: &GpuInit,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: choose_present_mode(caps, init.present_mode),
        alpha_mode: choose_alpha_mode(caps, init.alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: &[wgpu::TextureFormat],
        present_modes: &[wgpu::PresentMode],
        alpha_modes: &[wgpu::CompositeAlphaMode],
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: present_modes.to_vec(),
            alpha_modes: alpha_modes.to_vec(),
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn preferred_format_is_first_reported() {
        let c = caps(
            &[wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Bgra8UnormSrgb],
            &[],
            &[],
        );
        assert_eq!(preferred_format(&c), Some(wgpu::TextureFormat::Rgba16Float));
    }

    #[test]
    fn preferred_format_none_when_empty() {
        assert_eq!(preferred_format(&caps(&[], &[], &[])), None);
    }

    // ── present mode ──────────────────────────────────────────────────────

    #[test]
    fn present_mode_kept_when_supported() {
        let c = caps(&[], &[wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox], &[]);
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let c = caps(&[], &[wgpu::PresentMode::Fifo], &[]);
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );
    }

    // ── alpha mode ────────────────────────────────────────────────────────

    #[test]
    fn alpha_mode_requested_when_supported() {
        let c = caps(
            &[],
            &[],
            &[wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied],
        );
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn alpha_mode_first_supported_otherwise() {
        let c = caps(&[], &[], &[wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PostMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn alpha_mode_auto_when_nothing_reported() {
        assert_eq!(choose_alpha_mode(&caps(&[], &[], &[]), None), wgpu::CompositeAlphaMode::Auto);
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn config_uses_given_format_and_size() {
        let c = caps(
            &[wgpu::TextureFormat::Bgra8Unorm],
            &[wgpu::PresentMode::Fifo],
            &[wgpu::CompositeAlphaMode::Opaque],
        );
        let config = surface_config(
            &c,
            wgpu::TextureFormat::Bgra8Unorm,
            PhysicalSize::new(640, 480),
            &GpuInit::default(),
        );

        assert_eq!(config.format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(config.desired_maximum_frame_latency, 2);
    }
}
