//! Builds and binds the named storage buffers and uniform buffer for one
//! run series — the `wgpu` counterpart of `cSetup`'s
//! `PrepareVulkanSSBSpinBuffer` / `PrepareVulkanSSBSpinBatchesBuffer` /
//! `PrepareVulkanSSBRandomNumbersBuffer` / `PrepareVulkanSSBSpinSumBuffer` /
//! `PrepareVulkanSpinSumOutputBuffer`.

use bytemuck::{Pod, Zeroable};

use crate::error::IsingError;
use crate::gpu::allocator::Allocation;
use crate::gpu::context::GpuContext;
use crate::gpu::KernelVariant;
use crate::lattice::LatticeCpu;
use crate::rng::Xorshift32;

/// Mirrors `sUniformBufferObject`: {Q4, Q8, L, N}, all `u32`.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub q4: u32,
    pub q8: u32,
    pub l: u32,
    pub n: u32,
}

pub struct GpuResources {
    variant: KernelVariant,
    ising_l: u32,
    ising_n: u32,
    sample_count: u32,

    spin_storage: Allocation,
    random_numbers: Allocation,
    spin_sum: Allocation,

    uniform_buffer: wgpu::Buffer,
    sample_output_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,
}

impl GpuResources {
    /// One-shot setup for a run series: sub-allocates the three
    /// device-local storage buffers from `ctx`'s shared arena, creates the
    /// uniform and sample-output buffers in the host-visible region, and
    /// performs the one-time all-up-spin / per-site-random-seed uploads
    /// through a transient command buffer (spec §4.6). `init_rng_seed`
    /// seeds the host-side xorshift stream that populates per-site random
    /// seeds — the GPU-path analogue of spec §4.1's "populated once at
    /// setup with a host-side xorshift stream".
    pub fn new(
        ctx: &mut GpuContext,
        ising_l: u32,
        n_sweeps: u32,
        burn_in: u32,
        sample_period: u32,
        variant: KernelVariant,
        init_rng_seed: u32,
    ) -> Result<Self, IsingError> {
        // The kernels' global-id -> (row, col) mapping packs one checkerboard
        // color into L/2 columns per row; an odd L gives rows an unequal
        // split between the two colors that a flat half-index can't invert.
        // The CPU engine has no such restriction (its row/col loop just
        // strides by 2 from the right starting column), so this is a
        // GPU-only setup failure, not a parameter violation.
        if ising_l % 2 != 0 {
            return Err(IsingError::UnsupportedGpuGridLength { ising_l });
        }

        let ising_n = ising_l * ising_l;
        let sample_count = LatticeCpu::sample_count(n_sweeps, burn_in, sample_period);

        let storage_usage = wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST;

        let spin_storage_bytes = variant.spin_storage_bytes(ising_n);
        let spin_storage = ctx.suballocate_device_local(spin_storage_bytes, storage_usage)?;
        let random_numbers =
            ctx.suballocate_device_local(ising_n as u64 * 4, storage_usage)?;
        let spin_sum = ctx.suballocate_device_local(4, storage_usage)?;

        // Bookkeeping only: the uniform and sample-output buffers below are
        // each their own wgpu::Buffer (see crate::gpu::context's doc
        // comment on why the host-visible arena cannot share one real
        // buffer across mutually incompatible usage flags), but their
        // combined footprint is still charged against the host-visible
        // arena so spec §8's capacity invariant holds for the arena as a
        // whole.
        ctx.reserve_host_visible(16, wgpu::BufferUsages::UNIFORM)?;
        // Sized strictly from K = sample_count, not padded to a minimum of
        // one element: K = 0 (spec §8's N_sweeps = W + 1 boundary) means no
        // samples are ever emitted, and sweep_engine's dispatch loop never
        // records a copy into this buffer in that case (sample_index < K is
        // never true), so there is nothing to make room for. wgpu still
        // requires a nonzero buffer size, so the K = 0 case alone falls back
        // to 4 bytes that are allocated but never written or read.
        let sample_output_bytes = if sample_count == 0 {
            4
        } else {
            sample_count as u64 * 4
        };
        ctx.reserve_host_visible(
            sample_output_bytes,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        )?;

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ising uniform buffer"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sample_output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ising sample-output buffer"),
            size: sample_output_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // COPY_DST (not MAP_WRITE) so `queue.write_buffer` can target it
        // directly — wgpu only allows MAP_WRITE combined with COPY_SRC, and
        // the queue's internal staging belt already does the host->device
        // copy queue.write_buffer needs without an explicit map.
        let staging_bytes = spin_storage_bytes.max(ising_n as u64 * 4);
        let staging_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ising persistent staging buffer"),
            size: staging_bytes,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let mut resources = GpuResources {
            variant,
            ising_l,
            ising_n,
            sample_count,
            spin_storage,
            random_numbers,
            spin_sum,
            uniform_buffer,
            sample_output_buffer,
            staging_buffer,
        };

        resources.upload_initial_payloads(ctx, init_rng_seed)?;
        Ok(resources)
    }

    fn upload_initial_payloads(
        &mut self,
        ctx: &GpuContext,
        init_rng_seed: u32,
    ) -> Result<(), IsingError> {
        let spin_bytes = match self.variant {
            KernelVariant::BitPacked => {
                let words = (self.ising_n as u64).div_ceil(32) as usize;
                bytemuck::cast_slice::<u32, u8>(&vec![!0u32; words]).to_vec()
            }
            KernelVariant::IntPacked => {
                bytemuck::cast_slice::<i32, u8>(&vec![1i32; self.ising_n as usize]).to_vec()
            }
        };
        self.upload_to_device_local(ctx, self.spin_storage, &spin_bytes)?;

        let mut rng = Xorshift32::new(init_rng_seed);
        let seeds: Vec<u32> = (0..self.ising_n).map(|_| rng.next()).collect();
        let seed_bytes = bytemuck::cast_slice::<u32, u8>(&seeds).to_vec();
        self.upload_to_device_local(ctx, self.random_numbers, &seed_bytes)?;

        // All-up start: the spin-sum SSB begins at N, matching
        // LatticeCpu::new's invariant.
        let initial_spin_sum = self.ising_n as i32;
        self.upload_to_device_local(ctx, self.spin_sum, bytemuck::bytes_of(&initial_spin_sum))?;

        Ok(())
    }

    /// Copies `data` into the shared device-local buffer at `alloc`'s
    /// offset via the persistent staging buffer and a transient one-time
    /// command buffer, submitted and awaited synchronously (spec §4.6).
    fn upload_to_device_local(
        &self,
        ctx: &GpuContext,
        alloc: Allocation,
        data: &[u8],
    ) -> Result<(), IsingError> {
        ctx.queue.write_buffer(&self.staging_buffer, 0, data);

        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ising one-time upload"),
        });
        encoder.copy_buffer_to_buffer(
            &self.staging_buffer,
            0,
            ctx.device_local_buffer(),
            alloc.offset,
            data.len() as u64,
        );
        ctx.queue.submit(Some(encoder.finish()));
        ctx.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }

    pub fn write_uniforms(&self, ctx: &GpuContext, q4: u32, q8: u32) {
        let uniforms = Uniforms {
            q4,
            q8,
            l: self.ising_l,
            n: self.ising_n,
        };
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn variant(&self) -> KernelVariant {
        self.variant
    }

    pub fn ising_n(&self) -> u32 {
        self.ising_n
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn spin_storage_binding<'a>(&self, ctx: &'a GpuContext) -> wgpu::BufferBinding<'a> {
        wgpu::BufferBinding {
            buffer: ctx.device_local_buffer(),
            offset: self.spin_storage.offset,
            size: std::num::NonZeroU64::new(self.spin_storage.size),
        }
    }

    pub fn random_numbers_binding<'a>(&self, ctx: &'a GpuContext) -> wgpu::BufferBinding<'a> {
        wgpu::BufferBinding {
            buffer: ctx.device_local_buffer(),
            offset: self.random_numbers.offset,
            size: std::num::NonZeroU64::new(self.random_numbers.size),
        }
    }

    pub fn spin_sum_binding<'a>(&self, ctx: &'a GpuContext) -> wgpu::BufferBinding<'a> {
        wgpu::BufferBinding {
            buffer: ctx.device_local_buffer(),
            offset: self.spin_sum.offset,
            size: std::num::NonZeroU64::new(self.spin_sum.size),
        }
    }

    pub fn spin_sum_offset_in_device_local(&self) -> u64 {
        self.spin_sum.offset
    }

    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    pub fn sample_output_buffer(&self) -> &wgpu::Buffer {
        &self.sample_output_buffer
    }
}
