mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::{LogicalSize, PhysicalSize};

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::{FrameSubmitter, GpuInit};
use prism_engine::headless::{HeadlessConfig, HeadlessPlatform, HeadlessTarget};
use prism_engine::logging::init_logging;
use prism_engine::paint::Color;
use prism_engine::window::{Runtime, RuntimeConfig};

use cli::Args;

/// Clears the window on every redraw.
struct ClearApp {
    color: Color,
}

impl App for ClearApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let control = ctx.clear(self.color);
        log::debug!("frame {} cleared to {}", ctx.frames_submitted(), self.color);
        control
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging());

    let init = args.gpu_init();
    if args.headless {
        return run_headless(&args, &init);
    }

    let config = RuntimeConfig {
        title: args.title.clone(),
        initial_size: LogicalSize::new(args.width as f64, args.height as f64),
    };

    Runtime::run(config, init, ClearApp { color: args.color })
}

fn run_headless(args: &Args, init: &GpuInit) -> Result<()> {
    let platform = HeadlessPlatform::new(HeadlessConfig::default());
    let target = HeadlessTarget::new(PhysicalSize::new(args.width, args.height));

    let mut submitter = pollster::block_on(FrameSubmitter::initialize(&platform, target, init))
        .context("headless initialization failed")?;
    submitter
        .submit_clear_frame(args.color)
        .context("headless frame failed")?;

    for call in platform.journal().calls() {
        log::info!("call: {call:?}");
    }
    for batch in platform.journal().submissions() {
        for buffer in &batch.buffers {
            log::info!(
                "submission {}: buffer {} with {} pass(es)",
                batch.sequence,
                buffer.id,
                buffer.passes.len()
            );
        }
    }

    Ok(())
}
