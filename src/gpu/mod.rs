//! The `wgpu`-backed GPU checkerboard Metropolis engine: dual bump arenas
//! (`allocator`), device/queue selection (`context`), buffer/descriptor
//! wiring for one run series (`resources`), pipeline + shader loading
//! (`pipeline`), and the per-β-step dispatch/barrier/flush loop
//! (`sweep_engine`).

pub mod allocator;
pub mod context;
pub mod pipeline;
pub mod resources;
pub mod sweep_engine;

/// The "one-bit-per-spin" vs "one-int-per-spin" compute-kernel distinction
/// from spec §4.7/§9 ("multi-modal kernel selection -> sum type"), encoded
/// as a tagged variant consumed once at `GPUResources`/`GPUPipeline`
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    /// Spin storage packs 32 spins per `u32` word (matches
    /// `COMPUTE_SHADER_TYPE_1_BIT_PER_SPIN`); binding 0 targets the
    /// spin-batches SSB.
    BitPacked,
    /// Spin storage uses one `i32` per spin (matches
    /// `COMPUTE_SHADER_TYPE_1_INT_PER_SPIN`); binding 0 targets the spins
    /// SSB.
    IntPacked,
}

impl KernelVariant {
    pub fn shader_source(self) -> &'static str {
        match self {
            KernelVariant::BitPacked => include_str!("shaders/ising_bitpacked.wgsl"),
            KernelVariant::IntPacked => include_str!("shaders/ising_intpacked.wgsl"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KernelVariant::BitPacked => "ising bit-packed kernel",
            KernelVariant::IntPacked => "ising int-packed kernel",
        }
    }

    /// Bytes one spin storage element occupies: 1/32 of a word for the
    /// bit-packed variant (rounded up to whole words), one `i32` otherwise.
    pub fn spin_storage_bytes(self, ising_n: u32) -> u64 {
        match self {
            KernelVariant::BitPacked => (ising_n as u64).div_ceil(32) * 4,
            KernelVariant::IntPacked => ising_n as u64 * 4,
        }
    }
}
