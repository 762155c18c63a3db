//! A library for sampling diverse models of quantifier-free linear integer arithmetic formulas.
//!
//! lia_sampler repeatedly asks solvers for models of a satisfiable formula, and keeps each model which differs from every model kept so far.
//! Models are sought by interleaving two kinds of search:
//! - A complete search, which finds a model whenever one exists (within a bound on integer values, for the built-in solver).
//! - A stochastic local search, which is incomplete, though quick to find models near to some other model.
//!
//! The searches are coupled by *pinning*: some of the variables of the last stochastic model are fixed for a following search, so models are found around known models.
//!
//! # Orientation
//!
//! The library is designed around a sampling [session](crate::sampler::Session).
//!
//! A session is made from a [formula](crate::structures::formula::Formula), a [configuration](crate::config), and a sink for samples.
//! Formulas may be read from [SMT-LIB](crate::builder::smtlib) scripts, and are [simplified](crate::builder::preprocess) once per session.
//!
//! Solvers are used only through the traits of the [solvers] module, so a session may be made with some other [Backend](crate::solvers::Backend) in place of the built-in solvers.
//!
//! Useful starting points, then, may be:
//! - The [sampling strategies](crate::sampler::strategy), to see how solvers are interleaved.
//! - The [canonical form](crate::sampler::canonical) of a sample, to see how duplicates are detected.
//! - The [configuration](crate::config) to see what may be tuned.
//!
//! # Examples
//!
//! ```rust
//! # use lia_sampler::{builder::smtlib, config::{Config, Mode}, sampler::Session};
//! let formula = smtlib::read("
//! (set-logic QF_LIA)
//! (declare-const x Int)
//! (declare-const b Bool)
//! (assert (and (<= 1 x 4) (=> b (> x 2))))
//! ").unwrap();
//!
//! let mut config = Config::default();
//! config.mode.value = Mode::Ls;
//! config.max_samples.value = 2;
//!
//! let mut session = Session::new(formula, config, Vec::default());
//! let summary = session.run().unwrap();
//! assert_eq!(summary.samples, 2);
//!
//! for line in String::from_utf8(session.into_sink()).unwrap().lines() {
//!     assert!(line.contains("b:") && line.contains(";x:"));
//! }
//! ```
//!
//! # Logging
//!
//! Logs are made through the [log](https://docs.rs/log) facade, with a target for each area of the library (see [misc::log::targets]).
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/), only the store may be traced with `RUST_LOG=store=trace`.

pub mod builder;
pub mod config;
pub mod generic;
pub mod misc;
pub mod reports;
pub mod sampler;
pub mod solvers;
pub mod structures;
pub mod types;
