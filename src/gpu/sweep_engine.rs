//! Per-β-step sweep loop: record dispatches, let wgpu's automatic
//! resource-hazard tracking stand in for the manual pipeline barriers spec
//! §4.8 describes, copy samples out at the sampling stride, and flush
//! periodically to bound in-flight command-buffer size — the `wgpu`
//! counterpart of `DoTheIsingGridSweepsGPU`.

use crate::error::IsingError;
use crate::gpu::context::GpuContext;
use crate::gpu::pipeline::GpuPipeline;
use crate::gpu::resources::GpuResources;
use crate::lattice::transition_probabilities;

/// The 500,000-sweep periodic flush spec §4.8 names, parameterized per
/// §9's design note ("Reimplementers should parameterize it").
pub const DEFAULT_FLUSH_INTERVAL: u32 = 500_000;

pub struct SweepEngine {
    flush_interval: u32,
}

impl SweepEngine {
    pub fn new() -> Self {
        SweepEngine {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    pub fn with_flush_interval(flush_interval: u32) -> Self {
        SweepEngine { flush_interval }
    }

    /// Runs `n_sweeps` checkerboard half-sweep dispatches at inverse
    /// temperature `beta`, sampling the spin-sum SSB into the host-visible
    /// sample-output buffer at the configured stride, and returns the
    /// recovered samples. The lattice state carried in `resources`' device-
    /// local spin storage is *not* reset between calls — annealing across
    /// β-steps is the caller's (RunDriver's) responsibility, matching spec
    /// §5's ordering guarantee.
    pub fn run_beta_step(
        &self,
        ctx: &GpuContext,
        resources: &GpuResources,
        pipeline: &GpuPipeline,
        bind_group: &wgpu::BindGroup,
        beta: f64,
        n_sweeps: u32,
        burn_in: u32,
        sample_period: u32,
    ) -> Result<Vec<i32>, IsingError> {
        let (q4, q8) = transition_probabilities(beta);
        resources.write_uniforms(ctx, q4, q8);

        let wg_x = pipeline.workgroup_count(resources.ising_n());
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ising beta-step"),
            });

        let mut dispatches_since_flush: u32 = 0;
        for s in 0..n_sweeps {
            let phase: u32 = s % 2;
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("ising half-sweep"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&pipeline.pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.set_push_constants(0, bytemuck::bytes_of(&phase));
                pass.dispatch_workgroups(wg_x, 1, 1);
            }

            // The naive guard fires once more than K times over 0..n_sweeps
            // (see LatticeCpu::sweep's matching comment); capping on
            // resources.sample_count() keeps exactly K copies and avoids
            // writing past the sample-output buffer's K*4-byte extent.
            if s >= burn_in && (s - burn_in) % sample_period == 0 {
                let sample_index = (s - burn_in) / sample_period;
                if sample_index < resources.sample_count() {
                    encoder.copy_buffer_to_buffer(
                        ctx.device_local_buffer(),
                        resources.spin_sum_offset_in_device_local(),
                        resources.sample_output_buffer(),
                        sample_index as u64 * 4,
                        4,
                    );
                }
            }

            dispatches_since_flush += 1;
            if dispatches_since_flush >= self.flush_interval {
                ctx.queue.submit(Some(encoder.finish()));
                ctx.device.poll(wgpu::Maintain::Wait);
                encoder = ctx
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("ising beta-step"),
                    });
                dispatches_since_flush = 0;
            }
        }

        ctx.queue.submit(Some(encoder.finish()));
        ctx.device.poll(wgpu::Maintain::Wait);

        self.read_back_samples(ctx, resources)
    }

    fn read_back_samples(
        &self,
        ctx: &GpuContext,
        resources: &GpuResources,
    ) -> Result<Vec<i32>, IsingError> {
        let k = resources.sample_count();
        if k == 0 {
            return Ok(Vec::new());
        }

        let slice = resources.sample_output_buffer().slice(..(k as u64 * 4));
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| IsingError::ReadbackChannelClosed)??;

        let data = slice.get_mapped_range();
        let samples: Vec<i32> = bytemuck::cast_slice::<u8, i32>(&data).to_vec();
        drop(data);
        resources.sample_output_buffer().unmap();

        Ok(samples)
    }
}

impl Default for SweepEngine {
    fn default() -> Self {
        Self::new()
    }
}
