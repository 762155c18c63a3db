use std::path::PathBuf;

use clap::Parser;

use lia_sampler::{
    config::{Config, ConfigOption, Mode, PinProbability, VarBound},
    types::err::ConfigError,
};

/// Samples diverse models of a quantifier-free linear integer arithmetic formula
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The SMT-LIB file to sample from
    pub file: PathBuf,

    /// The sampling strategy
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Stop after this many unique samples
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub time: Option<u64>,

    /// The directory to write samples to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// The seed of the random stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// The probability of pinning a variable to the value of the last stochastic model
    #[arg(long)]
    pub fixed_var_pct: Option<PinProbability>,

    /// Complete solver checks between stochastic attempts, in hybrid mode
    #[arg(long)]
    pub cdcl_epoch: Option<usize>,

    /// Seconds allowed to each check of the complete solver
    #[arg(long)]
    pub cdcl_timeout: Option<u64>,

    /// Seconds allowed to each attempt of the stochastic solver
    #[arg(long)]
    pub ls_timeout: Option<u64>,

    /// Moves allowed to each attempt of the stochastic solver
    #[arg(long)]
    pub ls_max_steps: Option<usize>,

    /// The bound on the absolute value of integers considered by the built-in solvers
    #[arg(long)]
    pub var_bound: Option<VarBound>,
}

/// Sets the option to the value, if some, and echoes the value.
fn apply<T, V>(option: &mut ConfigOption<T>, value: Option<V>, convert: impl Fn(V) -> T) -> Result<(), ConfigError>
where
    T: Clone + PartialOrd + std::fmt::Debug,
    V: std::fmt::Display + Copy,
{
    if let Some(value) = value {
        if let Err(e) = option.set(convert(value)) {
            let (min, max) = option.min_max();
            println!("c {} requires a value between {min:?} and {max:?}", option.name);
            return Err(e);
        }
        println!("c {} set to: {value}", option.name);
    }
    Ok(())
}

impl Args {
    /// A configuration with each given option set.
    ///
    /// Errors with the name of the first option given a value outside of its range.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let seconds = std::time::Duration::from_secs;

        apply(&mut config.mode, self.mode, |mode| mode)?;
        apply(&mut config.max_samples, self.samples, |count| count)?;
        apply(&mut config.time_limit, self.time, seconds)?;
        apply(&mut config.seed, self.seed, |seed| seed)?;
        apply(&mut config.fixed_var_pct, self.fixed_var_pct, |pct| pct)?;
        apply(&mut config.cdcl_epoch, self.cdcl_epoch, |epoch| epoch)?;
        apply(&mut config.cdcl_timeout, self.cdcl_timeout, seconds)?;
        apply(&mut config.ls_timeout, self.ls_timeout, seconds)?;
        apply(&mut config.ls_max_steps, self.ls_max_steps, |steps| steps)?;
        apply(&mut config.var_bound, self.var_bound, |bound| bound)?;

        Ok(config)
    }
}
