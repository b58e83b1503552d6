//! Device/queue selection and the two backing arenas, the wgpu counterpart
//! of `cSetup::PrepareVulkanInstance` / `PrepareVulkanDevice` /
//! `PrepareBig{DeviceLocal,HostVisible}VulkanBufferAndMore`.

use crate::error::IsingError;
use crate::gpu::allocator::{Allocation, BumpArena};

/// Matches the original's two 48 MiB backing allocations.
pub const ARENA_BYTES: u64 = 48_000_000;

/// wgpu does not surface a per-buffer memory-requirements alignment the
/// way `vkGetBufferMemoryRequirements` does; 256 bytes covers the common
/// storage/uniform/copy alignment constraints across wgpu's backends and is
/// used uniformly for every sub-allocation in both arenas.
pub const SUB_ALLOCATION_ALIGNMENT: u64 = 256;

pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub local_wg_x: u32,
    pub max_dispatch_wg_x: u32,

    /// Backs the spin/spin-batches, random-numbers, and spin-sum storage
    /// sub-buffers — all usage-compatible, so they genuinely share this one
    /// real buffer via `(offset, size)` views (spec §9's design note).
    device_local_buffer: wgpu::Buffer,
    device_local_arena: BumpArena,

    /// Pure bookkeeping: the uniform buffer and the host-readable
    /// sample-output buffer want mutually incompatible wgpu usage flags
    /// (`UNIFORM` vs `MAP_READ | COPY_DST`) and so are each realized as
    /// their own `wgpu::Buffer`; this arena only tracks the combined
    /// capacity/offset invariants spec §8 requires of the host-visible
    /// region as a whole.
    host_visible_arena: BumpArena,
}

impl GpuContext {
    pub async fn new() -> Result<Self, IsingError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .ok_or(IsingError::NoAdapter)?;

        log::info!(
            "selected GPU adapter: {} (backend {:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let limits = adapter.limits();
        let local_wg_x = limits.max_compute_workgroup_size_x.min(64);
        let max_dispatch_wg_x = limits.max_compute_workgroups_per_dimension;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("ising compute device"),
                    required_features: wgpu::Features::PUSH_CONSTANTS,
                    required_limits: wgpu::Limits {
                        max_push_constant_size: 4,
                        ..wgpu::Limits::default()
                    },
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let device_local_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ising device-local arena"),
            size: ARENA_BYTES,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(GpuContext {
            device,
            queue,
            local_wg_x,
            max_dispatch_wg_x,
            device_local_buffer,
            device_local_arena: BumpArena::new(
                ARENA_BYTES,
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
            ),
            host_visible_arena: BumpArena::new(
                ARENA_BYTES,
                wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::MAP_READ
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            ),
        })
    }

    pub fn device_local_buffer(&self) -> &wgpu::Buffer {
        &self.device_local_buffer
    }

    pub fn suballocate_device_local(
        &mut self,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Allocation, IsingError> {
        self.device_local_arena
            .allocate(size, SUB_ALLOCATION_ALIGNMENT, usage)
    }

    /// Reserves `size` bytes of host-visible capacity for bookkeeping
    /// purposes only — the caller still creates its own `wgpu::Buffer` for
    /// the sub-allocation, since host-visible sub-buffers in this crate do
    /// not share physical storage.
    pub fn reserve_host_visible(
        &mut self,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Allocation, IsingError> {
        self.host_visible_arena
            .allocate(size, SUB_ALLOCATION_ALIGNMENT, usage)
    }

    pub fn device_local_bytes_left(&self) -> u64 {
        self.device_local_arena.bytes_left()
    }

    pub fn host_visible_bytes_left(&self) -> u64 {
        self.host_visible_arena.bytes_left()
    }
}
