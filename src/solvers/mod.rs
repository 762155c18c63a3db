/*!
Solvers, as consumed by a sampler.

A sampler uses solvers through a narrow contract:
- [Solver::check], to check satisfiability under some (possibly empty) collection of transient [pins](Pin).
- [Solver::model], to obtain a model after a satisfiable check.
- [StochasticSolver::reseed], to replace the random stream of a stochastic solver.

And, a [Backend] makes solvers, together with the [subgoal](Subgoal) of a formula.

Pins are transient: a pin applies to the check it is given to, and to no later check.
A pin which names a variable unknown to the solver is ignored.

# Built-in solvers

[Builtin] is a backend made of:
- A [complete](complete::Backtracker) solver, which searches over intervals of values with bounds propagation.
- A [stochastic](local_search::LocalSearch) solver, which searches over complete assignments with weighted clauses.

Both solvers consider integer values within some symmetric bound, set by the [configuration](crate::config::Config).
So, a formula reported unsatisfiable by the complete solver is unsatisfiable *within the bound*.
*/

pub mod complete;
pub mod local_search;

use std::time::Duration;

use num_traits::ToPrimitive;

use crate::{
    builder::preprocess::{self, Subgoal},
    config::{Config, VarBound},
    misc::log::targets::{self},
    reports::Report,
    structures::{
        formula::{Formula, Signature, Sort},
        linear::Var,
        model::{Model, Pin, Value},
    },
};

/// A solver.
pub trait Solver {
    /// Checks satisfiability, with each pin as a transient assumption.
    fn check(&mut self, pins: &[Pin]) -> Report;

    /// The model found by the most recent check, if that check was satisfiable.
    fn model(&self) -> Option<Model>;
}

/// A solver whose search depends on a (replaceable) source of randomness.
pub trait StochasticSolver: Solver {
    fn reseed(&mut self, seed: u64);
}

/// A source of solvers, and of subgoals for those solvers.
pub trait Backend {
    type Complete: Solver;
    type Stochastic: StochasticSolver;

    /// The subgoal of a formula.
    fn simplify(&self, formula: &Formula) -> Subgoal;

    /// A complete solver, holding a copy of the formula.
    fn complete_solver(&self, formula: &Formula, seed: u64) -> Self::Complete;

    /// A stochastic solver, holding a copy of the formula of the subgoal.
    fn stochastic_solver(&self, subgoal: &Subgoal, seed: u64) -> Self::Stochastic;
}

/// The built-in backend.
#[derive(Clone, Debug)]
pub struct Builtin {
    pub cdcl_timeout: Duration,
    pub ls_timeout: Duration,
    pub ls_max_steps: usize,
    pub var_bound: VarBound,
}

impl Builtin {
    pub fn from_config(config: &Config) -> Self {
        Builtin {
            cdcl_timeout: config.cdcl_timeout.value,
            ls_timeout: config.ls_timeout.value,
            ls_max_steps: config.ls_max_steps.value,
            var_bound: config.var_bound.value,
        }
    }
}

impl Default for Builtin {
    fn default() -> Self {
        Builtin::from_config(&Config::default())
    }
}

impl Backend for Builtin {
    type Complete = complete::Backtracker;
    type Stochastic = local_search::LocalSearch;

    fn simplify(&self, formula: &Formula) -> Subgoal {
        preprocess::simplify(formula)
    }

    fn complete_solver(&self, formula: &Formula, seed: u64) -> Self::Complete {
        complete::Backtracker::new(formula.clone(), self.var_bound, self.cdcl_timeout, seed)
    }

    fn stochastic_solver(&self, subgoal: &Subgoal, seed: u64) -> Self::Stochastic {
        local_search::LocalSearch::new(
            subgoal.formula.clone(),
            self.var_bound,
            self.ls_timeout,
            self.ls_max_steps,
            seed,
        )
    }
}

/// The variable and value of each pin, skipping pins of unknown variables.
///
/// A pin whose value escapes an `i64` is returned as `None`, as no built-in solver admits the value.
fn resolve_pins(signature: &Signature, pins: &[Pin]) -> Option<Vec<(Var, i64)>> {
    let mut resolved = Vec::with_capacity(pins.len());
    for pin in pins {
        match signature.get(&pin.name) {
            Some(var) => resolved.push((var, pin.value.to_i64()?)),
            None => log::trace!(target: targets::SAMPLER, "Ignored pin of unknown variable {}", pin.name),
        }
    }
    Some(resolved)
}

/// A model binding every variable of the signature to the given value.
fn model_of(signature: &Signature, values: &[i64]) -> Model {
    let mut model = Model::default();
    for (var, symbol) in signature.symbols() {
        match symbol.sort {
            Sort::Bool => model.push(&symbol.name, Value::Bool(values[var] != 0)),
            Sort::Int => model.push(&symbol.name, Value::from(values[var])),
        }
    }
    model
}

#[cfg(test)]
mod solver_tests {
    use num_bigint::BigInt;

    use super::*;

    #[test]
    fn pins_of_unknown_variables_are_skipped() {
        let mut signature = Signature::default();
        let x = signature.declare("x", Sort::Int).unwrap();

        let pins = [
            Pin {
                name: "x".to_owned(),
                value: BigInt::from(-4),
            },
            Pin {
                name: "ghost".to_owned(),
                value: BigInt::from(1),
            },
        ];
        assert_eq!(resolve_pins(&signature, &pins), Some(vec![(x, -4)]));

        let wide = [Pin {
            name: "x".to_owned(),
            value: BigInt::from(i64::MAX) * 4,
        }];
        assert_eq!(resolve_pins(&signature, &wide), None);
    }

    #[test]
    fn models_print_every_variable() {
        let mut signature = Signature::default();
        let _ = signature.declare("p", Sort::Bool);
        let _ = signature.declare("x", Sort::Int);
        let _ = signature.fresh_hidden(Sort::Bool);

        let model = model_of(&signature, &[1, -3, 0]);
        assert_eq!(model.to_string(), "p:true;x:(- 3);!aux0:false;");
    }
}
