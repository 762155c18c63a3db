/*!
Sampling strategies.

Each strategy makes a *round* of solver calls per [step](Strategy::step), and offers each model found to the [store](crate::sampler::store).
After every attempted extraction the budget is consulted, and a step halts as soon as the budget is exhausted.

- [Complete](Strategy::Complete): one unpinned check of the complete solver on the original formula.
  A check which is not satisfiable is terminal.
- [Stochastic](Strategy::Stochastic): one reseeded check of the stochastic solver on the subgoal.
  A check which is not satisfiable is skipped.
- [Hybrid](Strategy::Hybrid): a burst of checks of the complete solver, each pinned by the last (converted) model of the stochastic solver, followed by one reseeded check of the stochastic solver.
- [DualStochastic](Strategy::DualStochastic): as hybrid, though with a burst of one check, of a second stochastic solver.
  The second solver is pinned by the last model of the first, and only the first is reseeded.

A pin is made for each integer binding of the pinning model with (independent) probability given by the configuration.
*/

use std::io::Write;

use rand::Rng;

use crate::{
    builder::preprocess::Subgoal,
    config::{Mode, PinProbability},
    generic::MinimalPCG32,
    misc::log::targets::{self},
    reports::Report,
    sampler::{
        canonical::parse_literal,
        store::{Offer, SampleStore},
        Budget,
    },
    solvers::{Backend, Solver, StochasticSolver},
    structures::{
        formula::Formula,
        model::{Model, Pin},
    },
    types::err::ErrorKind,
};

/// Whether sampling should continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// The parts of a session a strategy uses during a step.
pub struct Round<'r, W: Write> {
    pub subgoal: &'r Subgoal,
    pub store: &'r mut SampleStore<W>,
    pub budget: &'r Budget,
    pub rng: &'r mut MinimalPCG32,
    pub pin_probability: PinProbability,
}

impl<W: Write> Round<'_, W> {
    fn offer(&mut self, model: &Model) -> Result<(), ErrorKind> {
        if let Offer::Duplicate = self.store.offer(model, self.subgoal.order())? {
            log::trace!(target: targets::SAMPLER, "Duplicate sample");
        }
        Ok(())
    }

    /// [Flow::Halt] if the budget is exhausted, and otherwise [Flow::Continue].
    fn flow(&self) -> Flow {
        match self.budget.exhausted(self.store.count()) {
            true => Flow::Halt,
            false => Flow::Continue,
        }
    }
}

pub enum Strategy<C: Solver, S: StochasticSolver> {
    Complete {
        solver: C,
    },

    Stochastic {
        solver: S,
    },

    Hybrid {
        complete: C,
        stochastic: S,
        epoch: usize,
        last: Option<Model>,
    },

    DualStochastic {
        pinned: S,
        free: S,
        last: Option<Model>,
    },
}

impl<C: Solver, S: StochasticSolver> Strategy<C, S> {
    /// The strategy of the mode, with solvers from the backend.
    ///
    /// Seeds for the solvers are drawn from `rng`.
    pub fn new<B>(
        mode: Mode,
        backend: &B,
        formula: &Formula,
        subgoal: &Subgoal,
        epoch: usize,
        rng: &mut MinimalPCG32,
    ) -> Self
    where
        B: Backend<Complete = C, Stochastic = S>,
    {
        match mode {
            Mode::Cdcl => Strategy::Complete {
                solver: backend.complete_solver(formula, rng.random()),
            },

            Mode::Ls => Strategy::Stochastic {
                solver: backend.stochastic_solver(subgoal, rng.random()),
            },

            Mode::Hybrid => Strategy::Hybrid {
                stochastic: backend.stochastic_solver(subgoal, rng.random()),
                complete: backend.complete_solver(formula, rng.random()),
                epoch,
                last: None,
            },

            Mode::LsIterative => Strategy::DualStochastic {
                free: backend.stochastic_solver(subgoal, rng.random()),
                pinned: backend.stochastic_solver(subgoal, rng.random()),
                last: None,
            },
        }
    }

    /// A step of the strategy.
    pub fn step<W: Write>(&mut self, round: &mut Round<W>) -> Result<Flow, ErrorKind> {
        match self {
            Self::Complete { solver } => {
                let report = solver.check(&[]);
                let Some(model) = satisfiable_model(report, &*solver) else {
                    log::warn!(target: targets::SAMPLER, "Complete check {report} on the formula, stopping");
                    return Ok(Flow::Halt);
                };
                round.offer(&model)?;
                Ok(round.flow())
            }

            Self::Stochastic { solver } => {
                stochastic_attempt(solver, round)?;
                Ok(round.flow())
            }

            Self::Hybrid {
                complete,
                stochastic,
                epoch,
                last,
            } => {
                for _ in 0..*epoch {
                    let pins = match last {
                        Some(model) => pins_from(model, round.pin_probability, round.rng)?,
                        None => Vec::default(),
                    };

                    let report = complete.check(&pins);
                    match satisfiable_model(report, &*complete) {
                        Some(model) => round.offer(&model)?,
                        None => log::info!(target: targets::SAMPLER, "Complete check {report} with {} pins", pins.len()),
                    }

                    if let Flow::Halt = round.flow() {
                        return Ok(Flow::Halt);
                    }
                }

                if let Some(model) = stochastic_attempt(stochastic, round)? {
                    *last = Some(model);
                }
                Ok(round.flow())
            }

            Self::DualStochastic { pinned, free, last } => {
                let pins = match last {
                    Some(model) => pins_from(model, round.pin_probability, round.rng)?,
                    None => Vec::default(),
                };

                let report = pinned.check(&pins);
                match satisfiable_model(report, &*pinned) {
                    Some(model) => {
                        let converted = round.subgoal.convert_model(&model)?;
                        round.offer(&converted)?;
                    }
                    None => log::info!(target: targets::SAMPLER, "Pinned stochastic check {report} with {} pins", pins.len()),
                }

                if let Flow::Halt = round.flow() {
                    return Ok(Flow::Halt);
                }

                if let Some(model) = stochastic_attempt(free, round)? {
                    *last = Some(model);
                }
                Ok(round.flow())
            }
        }
    }
}

/// The model of the solver, if the report is satisfiable.
fn satisfiable_model<T: Solver>(report: Report, solver: &T) -> Option<Model> {
    match report {
        Report::Satisfiable => solver.model(),
        Report::Unsatisfiable | Report::Unknown => None,
    }
}

/// A reseeded, unpinned, check of the stochastic solver, with the converted model offered to the store.
///
/// Returns the converted model, if any.
fn stochastic_attempt<S: StochasticSolver, W: Write>(
    solver: &mut S,
    round: &mut Round<W>,
) -> Result<Option<Model>, ErrorKind> {
    solver.reseed(round.rng.random());

    let report = solver.check(&[]);
    let Some(model) = satisfiable_model(report, &*solver) else {
        log::info!(target: targets::SAMPLER, "Stochastic check {report}, skipped");
        return Ok(None);
    };

    let converted = round.subgoal.convert_model(&model)?;
    round.offer(&converted)?;
    Ok(Some(converted))
}

/// Pins of integer bindings of the model, each made with the given probability.
pub fn pins_from(
    model: &Model,
    probability: PinProbability,
    rng: &mut MinimalPCG32,
) -> Result<Vec<Pin>, ErrorKind> {
    let mut pins = Vec::default();
    for (name, printed) in model.iter() {
        if matches!(printed, "true" | "false") {
            continue;
        }
        if rng.random_bool(probability) {
            pins.push(Pin {
                name: name.to_owned(),
                value: parse_literal(printed)?,
            });
        }
    }
    Ok(pins)
}

#[cfg(test)]
mod strategy_tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::structures::model::Value;

    fn model() -> Model {
        let mut model = Model::default();
        model.push("p", Value::from(true));
        model.push("x", Value::from(-3));
        model.push("y", Value::from(12));
        model.push("q", Value::from(false));
        model
    }

    #[test]
    fn pins_skip_booleans() {
        let mut rng = MinimalPCG32::from_u64(0);
        let pins = pins_from(&model(), 1.0, &mut rng).unwrap();

        assert_eq!(
            pins,
            vec![
                Pin {
                    name: "x".to_owned(),
                    value: BigInt::from(-3)
                },
                Pin {
                    name: "y".to_owned(),
                    value: BigInt::from(12)
                },
            ]
        );
    }

    #[test]
    fn pin_probability_bounds() {
        let mut rng = MinimalPCG32::from_u64(0);
        assert!(pins_from(&model(), 0.0, &mut rng).unwrap().is_empty());

        let mut counts = [0; 2];
        for _ in 0..400 {
            for pin in pins_from(&model(), 0.5, &mut rng).unwrap() {
                counts[(pin.name == "y") as usize] += 1;
            }
        }
        assert!(counts.iter().all(|count| (120..280).contains(count)));
    }
}
