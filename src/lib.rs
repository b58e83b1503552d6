//! 2D ferromagnetic Ising model simulator: a bit-packed checkerboard
//! Metropolis CPU engine and an equivalent `wgpu` compute-shader GPU engine,
//! driven across a descending β-schedule and reduced to the Binder
//! cumulant U₄ at each step.

pub mod cli;
pub mod error;
pub mod gpu;
pub mod io;
pub mod lattice;
pub mod observables;
pub mod params;
pub mod plot;
pub mod rng;
pub mod rundriver;
