/*!
Configuration of a sampling session.

All configuration for a session, and for the built-in solvers of a session, is contained within [Config].
The configuration is fixed when a session is created, and is not revised during sampling.

Each option is a [ConfigOption], which records the permitted range of the option alongside its value.
*/

mod config_option;
pub use config_option::ConfigOption;

mod mode;
pub use mode::Mode;

use std::time::Duration;

/// Representation for the probability of pinning a variable to the value of the last stochastic model.
pub type PinProbability = f64;

/// Representation for the bound on the absolute value of integer variables in the built-in solvers.
pub type VarBound = i64;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// The strategy used to sample.
    pub mode: ConfigOption<Mode>,

    /// Sampling stops once this many unique samples have been written.
    pub max_samples: ConfigOption<usize>,

    /// Sampling stops once this much time has elapsed since the session began.
    pub time_limit: ConfigOption<Duration>,

    /// The probability of pinning each (integer) variable to the value of the last stochastic model.
    pub fixed_var_pct: ConfigOption<PinProbability>,

    /// The number of complete solver checks made between each stochastic attempt when sampling with [Mode::Hybrid].
    pub cdcl_epoch: ConfigOption<usize>,

    /// The seed of the random stream of a session.
    pub seed: ConfigOption<u64>,

    /// The time limit on a single check of the complete solver.
    pub cdcl_timeout: ConfigOption<Duration>,

    /// The time limit on a single attempt of the stochastic solver.
    pub ls_timeout: ConfigOption<Duration>,

    /// The limit on moves made during a single attempt of the stochastic solver.
    pub ls_max_steps: ConfigOption<usize>,

    /// The built-in solvers consider integer values within [-var_bound, var_bound].
    pub var_bound: ConfigOption<VarBound>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: ConfigOption {
                name: "mode",
                min: Mode::MIN,
                max: Mode::MAX,
                value: Mode::default(),
            },

            max_samples: ConfigOption {
                name: "samples",
                min: 0,
                max: usize::MAX,
                value: 10_000,
            },

            time_limit: ConfigOption {
                name: "time",
                min: Duration::from_secs(0),
                max: Duration::MAX,
                value: Duration::from_secs(3600),
            },

            fixed_var_pct: ConfigOption {
                name: "fixed_var_pct",
                min: 0.0,
                max: 1.0,
                value: 0.5,
            },

            cdcl_epoch: ConfigOption {
                name: "cdcl_epoch",
                min: 1,
                max: usize::MAX,
                value: 10,
            },

            seed: ConfigOption {
                name: "seed",
                min: u64::MIN,
                max: u64::MAX,
                value: 0,
            },

            cdcl_timeout: ConfigOption {
                name: "cdcl_timeout",
                min: Duration::from_millis(1),
                max: Duration::MAX,
                value: Duration::from_secs(50),
            },

            ls_timeout: ConfigOption {
                name: "ls_timeout",
                min: Duration::from_millis(1),
                max: Duration::MAX,
                value: Duration::from_secs(60),
            },

            ls_max_steps: ConfigOption {
                name: "ls_max_steps",
                min: 1,
                max: usize::MAX,
                value: 1_000_000,
            },

            var_bound: ConfigOption {
                name: "var_bound",
                min: 1,
                max: 1 << 40,
                value: 1 << 20,
            },
        }
    }
}
