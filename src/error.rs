//! Error taxonomy for the simulator: parameter violations are handled at
//! intake (fail-fast, see `params::RunParams::validate`) and never reach
//! this type. Everything that can fail once a run is underway funnels
//! through `IsingError`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IsingError {
    #[error("no compute-capable GPU adapter found")]
    NoAdapter,

    #[error("failed to acquire GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("GPU arena exhausted: requested {requested} bytes, {available} available")]
    ArenaExhausted { requested: u64, available: u64 },

    #[error("sub-allocation usage {requested:?} is not a subset of arena usage {arena:?}")]
    UsageMismatch {
        requested: wgpu::BufferUsages,
        arena: wgpu::BufferUsages,
    },

    #[error("GPU readback channel closed before the mapped buffer was returned")]
    ReadbackChannelClosed,

    #[error("failed to map GPU buffer for readback: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("failed to open result file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("result file {path} has a malformed header: {reason}")]
    MalformedHeader { path: PathBuf, reason: String },

    #[error("result file {path} has a malformed data line {line_number}: {text:?}")]
    MalformedDataLine {
        path: PathBuf,
        line_number: usize,
        text: String,
    },

    #[error("run mode must be 0-7, got {raw}")]
    InvalidRunMode { raw: u8 },

    #[error(
        "grid length {ising_l} is odd; the GPU kernels' checkerboard indexing only supports even L (use the CPU engine instead)"
    )]
    UnsupportedGpuGridLength { ising_l: u32 },
}
