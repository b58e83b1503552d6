//! 2D ferromagnetic Ising model simulator — checkerboard Metropolis
//! algorithm on a CPU bit-packed lattice or a `wgpu` compute-shader GPU
//! pipeline, driven across a descending β-schedule to the Binder cumulant.
//!
//! The positional argument selects one of eight run modes (see
//! `ising2d::cli::RunMode`); interactive modes prompt on stdin, hardcoded
//! modes use the presets `ising2d::params::RunParams` ships.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use ising2d::cli::{self, Cli, RunMode};
use ising2d::error::IsingError;
use ising2d::io;
use ising2d::params::{Engine, RunParams};
use ising2d::plot;
use ising2d::rundriver::{self, RunResult};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mode = match RunMode::try_from(cli.mode) {
        Ok(mode) => mode,
        Err(raw) => {
            log::error!("{}", IsingError::InvalidRunMode { raw });
            return ExitCode::FAILURE;
        }
    };

    match dispatch(mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("run failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(mode: RunMode) -> Result<(), IsingError> {
    match mode {
        RunMode::InteractiveGpu => interactive_run(Engine::GpuBitPacked),
        RunMode::HardcodedGpu => hardcoded_run(RunParams::hardcoded_gpu()),
        RunMode::InteractiveCpu => interactive_run(Engine::Cpu),
        RunMode::HardcodedCpu => hardcoded_run(RunParams::hardcoded_cpu()),
        RunMode::LoadAndPlotSingle => load_and_plot_single(),
        RunMode::HardcodedMultiGridGpuAutoSave => {
            hardcoded_multigrid_autosave(Engine::GpuBitPacked, Path::new("output0.txt"))
        }
        RunMode::HardcodedMultiGridCpuAutoSave => {
            hardcoded_multigrid_autosave(Engine::Cpu, Path::new("output0.txt"))
        }
        RunMode::LoadAndPlotMultiple => load_and_plot_multiple(),
    }
}

fn run_for_engine(params: &RunParams) -> Result<RunResult, IsingError> {
    match params.engine {
        Engine::Cpu => Ok(rundriver::run_cpu(params)),
        Engine::GpuBitPacked | Engine::GpuIntPacked => rundriver::run_gpu(params),
    }
}

fn interactive_run(engine: Engine) -> Result<(), IsingError> {
    let params = cli::prompt_run_params(engine);

    log::info!("The computation has started...");
    let started = Instant::now();
    let result = run_for_engine(&params)?;
    let elapsed = started.elapsed().as_secs_f64();
    log::info!("The computation has finished. COMPUTATION TIME (seconds): {elapsed}");

    cli::maybe_save_interactively(&params, elapsed, &result.betas, &result.binder_cumulants);

    plot::display_curve(
        &format!("Binder cumulant vs beta ({})", params.engine.label()),
        &result.betas,
        &result.binder_cumulants,
    );
    Ok(())
}

fn hardcoded_run(params: RunParams) -> Result<(), IsingError> {
    log::info!("The computation has started...");
    let started = Instant::now();
    let result = run_for_engine(&params)?;
    let elapsed = started.elapsed().as_secs_f64();
    log::info!("The computation has finished. COMPUTATION TIME (seconds): {elapsed}");

    cli::maybe_save_interactively(&params, elapsed, &result.betas, &result.binder_cumulants);

    plot::display_curve(
        &format!("Binder cumulant vs beta ({})", params.engine.label()),
        &result.betas,
        &result.binder_cumulants,
    );
    Ok(())
}

/// The original ships this mode with a single preset in its "multiple
/// grids" array (`IsingGPUHardcodedMultipleGridsAndAutoSaveRun` only ever
/// fills index 0); reproduced as-is rather than inventing additional grid
/// sizes the source never runs.
fn hardcoded_multigrid_autosave(engine: Engine, output_path: &Path) -> Result<(), IsingError> {
    let params = RunParams::hardcoded_multigrid(engine);
    let started = Instant::now();
    let result = run_for_engine(&params)?;
    let elapsed = started.elapsed().as_secs_f64();

    io::save_binder_cumulant_data(
        output_path,
        &params,
        elapsed,
        &result.betas,
        &result.binder_cumulants,
    )
    .unwrap_or_else(|err| log::error!("failed to save results: {err}"));
    Ok(())
}

fn load_and_plot_single() -> Result<(), IsingError> {
    let filename = cli::prompt_load_filename();
    let curve = io::load_binder_cumulant_curve(Path::new(&filename))?;
    plot::display_multi_curve(
        "Binder cumulant vs beta",
        &[(format!("L: {}", curve.ising_l), curve)],
    );
    Ok(())
}

fn load_and_plot_multiple() -> Result<(), IsingError> {
    let mut curves = Vec::new();
    for path in io::default_multigrid_filenames() {
        match io::load_binder_cumulant_curve(&path) {
            Ok(curve) => {
                let legend = format!("L: {}", curve.ising_l);
                curves.push((legend, curve));
            }
            Err(err) => log::error!("skipping {}: {err}", path.display()),
        }
    }
    plot::display_multi_curve("Binder cumulant vs beta", &curves);
    Ok(())
}
