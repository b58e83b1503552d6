//! Run parameters: the typed equivalent of the original `sIsingParameters`,
//! its validation asserts, the β-schedule it drives, and the hardcoded
//! presets shipped by the CLI's non-interactive modes.

/// Which engine a run targets, and (for the GPU engine) which kernel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Cpu,
    GpuBitPacked,
    GpuIntPacked,
}

impl Engine {
    pub fn label(self) -> &'static str {
        match self {
            Engine::Cpu => "CPU",
            Engine::GpuBitPacked | Engine::GpuIntPacked => "GPU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunParams {
    pub ising_l: u32,
    pub start_beta: f64,
    pub end_beta: f64,
    pub beta_decrement: f64,
    pub n_sweeps: u32,
    pub burn_in: u32,
    pub sample_period: u32,
    pub engine: Engine,
}

impl RunParams {
    /// Reproduces the exact assertion order `IsingGPUUserInputRun` /
    /// `IsingCPUUserInputRun` run against interactively-gathered parameters.
    /// A violation is a programmer/user error and aborts the process
    /// (spec §7's "parameter violations" fail-fast policy), so this
    /// panics rather than returning a `Result`.
    pub fn validate(&self) {
        assert!(self.ising_l <= 2000, "grid length must be <= 2000");
        assert!(self.start_beta > 0.0, "start beta must be > 0");
        assert!(
            self.end_beta < self.start_beta,
            "end beta must be lower than start beta"
        );
        assert!(
            self.beta_decrement > 0.0 && self.beta_decrement <= (self.start_beta - self.end_beta),
            "beta decrement must be > 0 and <= start beta - end beta"
        );
        assert!(
            self.n_sweeps <= 10_000_000,
            "number of sweeps per temperature must be <= 10,000,000"
        );
        assert!(
            self.burn_in < self.n_sweeps,
            "burn-in must be less than the number of sweeps"
        );
        assert!(
            self.sample_period <= self.n_sweeps - self.burn_in,
            "sample period must be <= sweeps - burn-in"
        );
    }

    pub fn ising_n(&self) -> u32 {
        self.ising_l * self.ising_l
    }

    /// Number of spin-sum samples one β-step at these parameters produces.
    /// Truncating division, matching `numberOfElementsInTheSpinSumOutputArray`.
    pub fn sample_count(&self) -> u32 {
        (self.n_sweeps - self.burn_in - 1) / self.sample_period
    }

    /// D = floor((start - end) / decrement), the number of β-steps in the schedule.
    pub fn schedule_len(&self) -> u32 {
        ((self.start_beta - self.end_beta) / self.beta_decrement).floor() as u32
    }

    /// The descending β sequence this run walks, annealing from `start_beta`.
    pub fn beta_schedule(&self) -> Vec<f64> {
        let mut betas = Vec::with_capacity(self.schedule_len() as usize);
        let mut beta = self.start_beta;
        for _ in 0..self.schedule_len() {
            betas.push(beta);
            beta -= self.beta_decrement;
        }
        betas
    }

    /// The preset `IsingGPUHardcodedRun` uses: L=20, β 0.50→0.35 step 0.01,
    /// N_sweeps=10,000, W=100, P=2.
    pub fn hardcoded_gpu() -> RunParams {
        RunParams {
            ising_l: 20,
            start_beta: 0.50,
            end_beta: 0.35,
            beta_decrement: 0.01,
            n_sweeps: 10_000,
            burn_in: 100,
            sample_period: 2,
            engine: Engine::GpuBitPacked,
        }
    }

    /// The preset `IsingCPUHardcodedRun` uses: identical to the GPU preset
    /// except N_sweeps=100,000 (the CPU path has no driver-imposed command
    /// buffer limit pushing it toward shorter runs).
    pub fn hardcoded_cpu() -> RunParams {
        RunParams {
            n_sweeps: 100_000,
            engine: Engine::Cpu,
            ..RunParams::hardcoded_gpu()
        }
    }

    /// The preset `IsingGPUHardcodedMultipleGridsAndAutoSaveRun` /
    /// `IsingCPUHardcodedMultipleGridsAndAutoSaveRun` use for their single
    /// grid entry: same shape as the GPU preset, N_sweeps=10,000.
    pub fn hardcoded_multigrid(engine: Engine) -> RunParams {
        RunParams {
            engine,
            ..RunParams::hardcoded_gpu()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardcoded_presets_validate() {
        RunParams::hardcoded_gpu().validate();
        RunParams::hardcoded_cpu().validate();
    }

    #[test]
    fn schedule_len_matches_scenario_3() {
        let p = RunParams::hardcoded_gpu();
        assert_eq!(p.schedule_len(), 15);
        assert_eq!(p.beta_schedule().len(), 15);
        assert!((p.beta_schedule()[0] - 0.50).abs() < 1e-9);
    }

    #[test]
    fn sample_count_matches_scenario_1() {
        let p = RunParams {
            ising_l: 4,
            start_beta: 10.0,
            end_beta: 9.0,
            beta_decrement: 1.0,
            n_sweeps: 1000,
            burn_in: 0,
            sample_period: 1,
            engine: Engine::Cpu,
        };
        assert_eq!(p.sample_count(), 999);
    }

    #[test]
    #[should_panic]
    fn rejects_oversized_grid() {
        let mut p = RunParams::hardcoded_gpu();
        p.ising_l = 2001;
        p.validate();
    }

    #[test]
    #[should_panic]
    fn rejects_burn_in_past_sweep_count() {
        let mut p = RunParams::hardcoded_gpu();
        p.burn_in = p.n_sweeps;
        p.validate();
    }
}
