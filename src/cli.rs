//! The CLI surface spec §6 describes: the single positional run-mode
//! integer, and the interactive prompt sequence `IsingGPUUserInputRun` /
//! `IsingCPUUserInputRun` use to gather parameters (exact prompt text and
//! assertion order preserved).

use std::io::{self, Write};

use clap::Parser;

use crate::params::{Engine, RunParams};

#[derive(Parser, Debug)]
#[command(
    name = "ising2d",
    about = "2D ferromagnetic Ising model checkerboard Metropolis simulator"
)]
pub struct Cli {
    /// Run mode, 0-7 (see the run-mode table in the project documentation).
    pub mode: u8,
}

/// The eight run modes spec §6's table enumerates; the exact integer
/// values are part of the contract, matching `eIsingRunCommands`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    InteractiveGpu = 0,
    HardcodedGpu = 1,
    InteractiveCpu = 2,
    HardcodedCpu = 3,
    LoadAndPlotSingle = 4,
    HardcodedMultiGridGpuAutoSave = 5,
    HardcodedMultiGridCpuAutoSave = 6,
    LoadAndPlotMultiple = 7,
}

impl TryFrom<u8> for RunMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(RunMode::InteractiveGpu),
            1 => Ok(RunMode::HardcodedGpu),
            2 => Ok(RunMode::InteractiveCpu),
            3 => Ok(RunMode::HardcodedCpu),
            4 => Ok(RunMode::LoadAndPlotSingle),
            5 => Ok(RunMode::HardcodedMultiGridGpuAutoSave),
            6 => Ok(RunMode::HardcodedMultiGridCpuAutoSave),
            7 => Ok(RunMode::LoadAndPlotMultiple),
            other => Err(other),
        }
    }
}

fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).expect("failed to read from stdin");
    line.trim().to_string()
}

fn read_u32(prompt: &str) -> u32 {
    read_line(prompt)
        .parse()
        .unwrap_or_else(|_| panic!("expected an unsigned integer"))
}

fn read_f64(prompt: &str) -> f64 {
    read_line(prompt)
        .parse()
        .unwrap_or_else(|_| panic!("expected a floating-point number"))
}

/// Gathers parameters from stdin in the exact sequence and wording
/// `IsingGPUUserInputRun`/`IsingCPUUserInputRun` use, then validates them
/// (fail-fast, spec §7's parameter-violation policy).
pub fn prompt_run_params(engine: Engine) -> RunParams {
    let ising_l = read_u32("Enter the grid length: ");
    let start_beta = read_f64("Enter the start value of beta: ");
    let end_beta = read_f64("Enter the end value of beta (should be lower than the start value): ");
    let beta_decrement =
        read_f64("Enter how much the value of beta is decremented for every set of sweeps: ");
    let n_sweeps = read_u32("Enter the number of sweeps for every value of beta: ");
    let burn_in = read_u32(
        "Enter how many sweeps to wait for every value of beta before spin sum sampling starts: ",
    );
    let sample_period = read_u32("Enter how many sweeps should happen per sample after the wait: ");
    println!();

    let params = RunParams {
        ising_l,
        start_beta,
        end_beta,
        beta_decrement,
        n_sweeps,
        burn_in,
        sample_period,
        engine,
    };
    params.validate();
    params
}

/// The `Y`/`y` (ASCII 89/121) save-confirmation convention from
/// `Control.cpp`'s post-run prompt.
pub fn prompt_save_confirmation() -> bool {
    let answer = read_line("\nSave data before displaying plot (Y/n)?\n");
    matches!(answer.as_bytes().first(), Some(b'Y') | Some(b'y'))
}

pub fn prompt_filename() -> String {
    read_line("Enter the filename: ")
}

pub fn prompt_load_filename() -> String {
    read_line("Enter the filename of the file to load: ")
}

/// Saves a run's results if the user confirms, logging (rather than
/// aborting) on an I/O failure — spec §7's "I/O failures on save print a
/// message and continue without persisting" policy.
pub fn maybe_save_interactively(
    params: &RunParams,
    computation_time_secs: f64,
    betas: &[f64],
    binder_cumulants: &[f64],
) {
    if !prompt_save_confirmation() {
        return;
    }
    let filename = prompt_filename();
    match crate::io::save_binder_cumulant_data(
        std::path::Path::new(&filename),
        params,
        computation_time_secs,
        betas,
        binder_cumulants,
    ) {
        Ok(()) => log::info!("saved results to {filename}"),
        Err(err) => log::error!("failed to save results: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_mode_value_round_trips() {
        for raw in 0u8..=7 {
            assert!(RunMode::try_from(raw).is_ok());
        }
    }

    #[test]
    fn out_of_range_mode_is_rejected() {
        assert_eq!(RunMode::try_from(8), Err(8));
    }
}
