/*!
The sampling session driver.

A session owns everything used while sampling: the formula, the solvers (through a [Backend]), the stream of randomness, the [store](SampleStore) of samples, and the [budget](Budget).

The budget starts when the session is made.
A session is [run](Session::run) once, which:
1. Simplifies the formula to a subgoal (skipped by [Mode::Cdcl], as the complete solver works on the formula as given).
2. Makes solvers for the [strategy](Strategy) of the configured mode, drawing solver seeds from the session's random stream.
3. Steps the strategy until the budget is exhausted, or the strategy halts.

For example, sampling a handful of models to a buffer:

```rust
# use lia_sampler::{builder::smtlib, config::{Config, Mode}, sampler::Session};
let formula = smtlib::read("
(declare-const x Int)
(declare-const y Int)
(assert (= (+ x y) 10))
(assert (<= 0 x 10))
").unwrap();

let mut config = Config::default();
config.mode.value = Mode::Cdcl;
config.max_samples.value = 3;

let mut session = Session::new(formula, config, Vec::default());
let summary = session.run().unwrap();
assert_eq!(summary.samples, 3);

let written = String::from_utf8(session.into_sink()).unwrap();
assert!(written.starts_with("0: x:"));
```
*/

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    builder::preprocess::Subgoal,
    config::{Config, Mode},
    generic::MinimalPCG32,
    misc::log::targets::{self},
    sampler::{
        store::SampleStore,
        strategy::{Flow, Round, Strategy},
        Budget, Summary,
    },
    solvers::{Backend, Builtin},
    structures::formula::Formula,
    types::err::{self, ErrorKind},
};

/// A sampling session.
pub struct Session<W: Write, B: Backend = Builtin> {
    formula: Formula,
    config: Config,
    backend: B,
    store: SampleStore<W>,
    budget: Budget,
}

impl<W: Write> Session<W, Builtin> {
    /// A session with the built-in backend, configured from `config`.
    pub fn new(formula: Formula, config: Config, sink: W) -> Self {
        let backend = Builtin::from_config(&config);
        Session::with_backend(formula, config, sink, backend)
    }
}

impl Session<BufWriter<File>, Builtin> {
    /// A session writing to `<out_dir>/<basename of input>.samples`.
    ///
    /// Errors if the file cannot be created, before any solving.
    pub fn to_file(
        formula: Formula,
        config: Config,
        input: &Path,
        out_dir: &Path,
    ) -> Result<Self, ErrorKind> {
        let path = samples_path(input, out_dir);
        log::info!(target: targets::SAMPLER, "Writing samples to {}", path.display());

        match File::create(&path) {
            Ok(file) => Ok(Session::new(formula, config, BufWriter::new(file))),
            Err(e) => Err(err::IOError::OpenSamples(e.kind()).into()),
        }
    }
}

/// The path of the samples file of an input.
pub fn samples_path(input: &Path, out_dir: &Path) -> std::path::PathBuf {
    let mut name = input.file_name().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".samples");
    out_dir.join(name)
}

impl<W: Write, B: Backend> Session<W, B> {
    pub fn with_backend(formula: Formula, config: Config, sink: W, backend: B) -> Self {
        let budget = Budget::start(config.time_limit.value, config.max_samples.value);
        Session {
            formula,
            config,
            backend,
            store: SampleStore::new(sink),
            budget,
        }
    }

    /// Samples until the budget is exhausted, or the strategy of the mode halts.
    ///
    /// Errors are fatal to the session, though samples written before an error remain written.
    pub fn run(&mut self) -> Result<Summary, ErrorKind> {
        let mode = self.config.mode.value;
        let mut rng = MinimalPCG32::from_u64(self.config.seed.value);

        let subgoal = match mode {
            Mode::Cdcl => Subgoal::identity(self.formula.clone()),
            Mode::Ls | Mode::Hybrid | Mode::LsIterative => self.backend.simplify(&self.formula),
        };

        let mut strategy: Strategy<B::Complete, B::Stochastic> = Strategy::new(
            mode,
            &self.backend,
            &self.formula,
            &subgoal,
            self.config.cdcl_epoch.value,
            &mut rng,
        );

        log::info!(target: targets::SAMPLER, "Sampling with {mode} over {} variables", subgoal.order().len());

        let mut round = Round {
            subgoal: &subgoal,
            store: &mut self.store,
            budget: &self.budget,
            rng: &mut rng,
            pin_probability: self.config.fixed_var_pct.value,
        };

        if !round.budget.exhausted(round.store.count()) {
            while let Flow::Continue = strategy.step(&mut round)? {}
        }

        self.store.flush()?;

        let summary = Summary {
            elapsed: self.budget.elapsed(),
            samples: self.store.count(),
        };
        log::info!(target: targets::SAMPLER, "{} samples in {:.3}s", summary.samples, summary.elapsed.as_secs_f64());
        Ok(summary)
    }

    /// The count of samples written.
    pub fn samples(&self) -> usize {
        self.store.count()
    }

    /// The sink of the session, consuming the session.
    pub fn into_sink(self) -> W {
        self.store.into_sink()
    }
}

#[cfg(test)]
mod session_tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn samples_file_name() {
        assert_eq!(
            samples_path(Path::new("bench/a/f.smt2"), Path::new("out")),
            PathBuf::from("out/f.smt2.samples")
        );
    }

    #[test]
    fn unopenable_output() {
        let formula = Formula::default();
        let result = Session::to_file(
            formula,
            Config::default(),
            Path::new("f.smt2"),
            Path::new("/nonexistent/directory/for/samples"),
        );
        assert!(matches!(
            result,
            Err(ErrorKind::IO(err::IOError::OpenSamples(_)))
        ));
    }
}
