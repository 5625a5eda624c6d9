use clap::{Parser, ValueEnum};

use prism_engine::device::GpuInit;
use prism_engine::logging::LoggingConfig;
use prism_engine::paint::Color;

/// Clears a window to a single color with one GPU render pass.
#[derive(Debug, Parser)]
#[command(name = "prism-demo", version)]
pub struct Args {
    /// Clear color as `r,g,b[,a]` in [0, 1] or `#rrggbb[aa]`.
    #[arg(long, default_value = "0,0.5,0.7,1")]
    pub color: Color,

    #[arg(long, default_value = "prism")]
    pub title: String,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Adapter power preference.
    #[arg(long, value_enum, default_value_t = Power::Default)]
    pub power: Power,

    /// Log filter in `env_logger` syntax; overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,

    /// Run one frame against the headless backend and print the journal.
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Power {
    Default,
    Low,
    High,
}

impl From<Power> for wgpu::PowerPreference {
    fn from(p: Power) -> Self {
        match p {
            Power::Default => wgpu::PowerPreference::None,
            Power::Low => wgpu::PowerPreference::LowPower,
            Power::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl Args {
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            power_preference: self.power.into(),
            ..Default::default()
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..Default::default()
        }
    }
}
