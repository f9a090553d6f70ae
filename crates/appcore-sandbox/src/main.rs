use std::process::ExitCode;

use appcore_engine::device::GpuInit;
use appcore_engine::logging::{init_logging, LoggingConfig};
use appcore_engine::{RenderLoopRunner, RunnerConfig, WinitHost};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let mut host = WinitHost::new(GpuInit::default());
    match RenderLoopRunner::new(RunnerConfig::default()).run(&mut host) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                log::warn!("ran with initialization error: {diagnostic}");
            }
            log::info!("exited cleanly after {} frames", report.frames);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("initialization failed: {err}");
            ExitCode::FAILURE
        }
    }
}
