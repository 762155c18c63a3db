/*!
A stochastic solver, by local search over complete assignments.

Every variable holds a value at every step, and a step moves a single variable to a new value.

## Moves

Moves are *critical*: each move makes some literal of some false clause true, where possible.
- A boolean literal flips its variable.
- For an arithmetic literal and each variable *x* of the literal, the values of *x* which make the literal true form an interval (or, for a disequality, a choice of two intervals).
  After intersecting the interval with the admissible values of *x*, there are two moves: to the value nearest the current value of *x*, and to a value drawn uniformly from the interval.
  If no admissible value makes the literal true, the move is to the admissible value nearest the interval.

A check starts from values drawn uniformly from the admissible values of each variable.

## Scores

Each clause has a weight, initially one.
The score of a move is the weight of the clauses made true by the move, less the weight of clauses made false by the move.

At each step a false clause is chosen at random and:
- With some small probability, a random move from the clause is made.
- Otherwise, the best scoring move from the clause is made, ignoring moves of tabu variables.
  If the best score is not positive, the weight of every false clause is increased before the move.

A moved variable is tabu for a few steps.
Pinned variables never move.

A check ends when every clause is true, or the step or time limit is reached.
*/

use std::time::{Duration, Instant};

use rand::Rng;

use crate::{
    generic::{
        interval::{self, Interval},
        MinimalPCG32,
    },
    misc::log::targets::{self},
    reports::Report,
    solvers::{model_of, resolve_pins, Solver, StochasticSolver},
    structures::{
        formula::Formula,
        linear::{div_ceil, div_floor, saturate, Var},
        literal::{Literal, Relation},
        model::{Model, Pin},
    },
};

/// The probability of a random move.
const NOISE: f64 = 0.02;

/// The least number of steps a moved variable is tabu.
const TABU_BASE: usize = 3;

/// The tabu tenure is TABU_BASE plus at most TABU_SPREAD further steps.
const TABU_SPREAD: usize = 10;

/// Steps between reads of the clock.
const CLOCK_INTERVAL: usize = 256;

pub struct LocalSearch {
    formula: Formula,

    /// For each variable, the clauses which mention the variable.
    occurrences: Vec<Vec<usize>>,

    /// The admissible values of each variable, before pins.
    domains: Vec<Interval>,

    rng: MinimalPCG32,

    timeout: Duration,

    max_steps: usize,

    model: Option<Model>,
}

/// A move of a variable to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Move {
    var: Var,
    value: i64,
}

/// The state of a single check.
struct Walk<'s> {
    solver: &'s LocalSearch,
    values: Vec<i64>,
    domains: Vec<Interval>,
    pinned: Vec<bool>,
    weights: Vec<u64>,
    tabu_until: Vec<usize>,

    /// Indices of false clauses.
    falsified: Vec<usize>,

    /// The position of each false clause in `falsified`.
    position: Vec<Option<usize>>,
}

impl LocalSearch {
    pub fn new(formula: Formula, bound: i64, timeout: Duration, max_steps: usize, seed: u64) -> Self {
        let domains = formula.signature.domains(bound);
        let occurrences = formula.occurrences();
        LocalSearch {
            formula,
            occurrences,
            domains,
            rng: MinimalPCG32::from_u64(seed),
            timeout,
            max_steps,
            model: None,
        }
    }

    /// The domains, with each pinned variable restricted to the value of its pin.
    fn pinned_domains(&self, pins: &[(Var, i64)]) -> Option<(Vec<Interval>, Vec<bool>)> {
        let mut domains = self.domains.clone();
        let mut pinned = vec![false; domains.len()];
        for (var, value) in pins {
            domains[*var] = domains[*var].meet(&Interval::point(*value));
            if domains[*var].is_empty() {
                return None;
            }
            pinned[*var] = true;
        }
        Some((domains, pinned))
    }
}

impl<'s> Walk<'s> {
    fn clause_holds(&self, clause: usize) -> bool {
        self.solver.formula.clauses[clause]
            .iter()
            .any(|literal| literal.holds(&self.values))
    }

    fn refresh(&mut self, clause: usize) {
        match (self.clause_holds(clause), self.position[clause]) {
            (true, Some(index)) => {
                self.falsified.swap_remove(index);
                if let Some(&moved) = self.falsified.get(index) {
                    self.position[moved] = Some(index);
                }
                self.position[clause] = None;
            }
            (false, None) => {
                self.position[clause] = Some(self.falsified.len());
                self.falsified.push(clause);
            }
            _ => {}
        }
    }

    fn apply(&mut self, step: usize, tenure: usize, mv: Move) {
        self.values[mv.var] = mv.value;
        self.tabu_until[mv.var] = step + tenure;
        let solver = self.solver;
        for &clause in &solver.occurrences[mv.var] {
            self.refresh(clause);
        }
    }

    /// The weight of clauses made true, less the weight of clauses made false.
    fn score(&mut self, mv: Move) -> i64 {
        let previous = self.values[mv.var];
        let solver = self.solver;
        let occurrences = &solver.occurrences[mv.var];

        let before = occurrences.iter().map(|&c| self.clause_holds(c)).collect::<Vec<_>>();
        self.values[mv.var] = mv.value;
        let mut score: i64 = 0;
        for (&clause, held) in occurrences.iter().zip(before) {
            let weight = self.weights[clause] as i64;
            match (held, self.clause_holds(clause)) {
                (false, true) => score += weight,
                (true, false) => score -= weight,
                _ => {}
            }
        }
        self.values[mv.var] = previous;
        score
    }

    /// Critical moves from some literal, skipping pinned variables.
    fn moves<R: Rng>(&self, literal: &Literal, rng: &mut R) -> Vec<Move> {
        match literal {
            Literal::Bool { var, polarity } => match self.pinned[*var] {
                true => Vec::default(),
                false => vec![Move {
                    var: *var,
                    value: *polarity as i64,
                }],
            },

            Literal::Arith(constraint) => {
                let sum = &constraint.sum;
                let total = sum.evaluate(&self.values);
                let mut moves = Vec::default();

                for (var, coefficient) in sum.terms() {
                    if self.pinned[*var] {
                        continue;
                    }
                    let current = self.values[*var];
                    let a = *coefficient as i128;
                    // a·x + rest ⋈ 0
                    let rest = total - a * current as i128;

                    let satisfying = match constraint.relation {
                        Relation::Le => match a > 0 {
                            true => Interval::new(i64::MIN, saturate(div_floor(-rest, a))),
                            false => Interval::new(saturate(div_ceil(-rest, a)), i64::MAX),
                        },
                        Relation::Eq => match -rest % a == 0 {
                            true => Interval::point(saturate(-rest / a)),
                            false => Interval::point(saturate(div_floor(-rest, a))),
                        },
                        // The literal is false, so the current value is the only excluded value.
                        Relation::Ne => interval::complement(Interval::point(current), rng),
                    };

                    let domain = self.domains[*var];
                    let admissible = satisfying.meet(&domain);
                    if admissible.is_empty() {
                        let closest = interval::intersect(satisfying, domain, rng);
                        if let Some(value) = closest.nearest(current).and_then(|v| domain.nearest(v)) {
                            if value != current {
                                moves.push(Move { var: *var, value });
                            }
                        }
                        continue;
                    }

                    let targets = [admissible.nearest(current), admissible.sample(rng)];
                    for value in targets.into_iter().flatten() {
                        if value != current && !moves.contains(&Move { var: *var, value }) {
                            moves.push(Move { var: *var, value });
                        }
                    }
                }
                moves
            }
        }
    }
}

impl Solver for LocalSearch {
    fn check(&mut self, pins: &[Pin]) -> Report {
        let start = Instant::now();
        self.model = None;

        if self.formula.has_empty_clause() {
            return Report::Unsatisfiable;
        }

        let Some(pins) = resolve_pins(&self.formula.signature, pins) else {
            return Report::Unsatisfiable;
        };
        let Some((domains, pinned)) = self.pinned_domains(&pins) else {
            log::debug!(target: targets::LOCAL_SEARCH, "Pins escape the domains");
            return Report::Unsatisfiable;
        };

        let mut rng = std::mem::take(&mut self.rng);
        let report = self.walk(domains, pinned, &mut rng, start);
        self.rng = rng;

        log::debug!(target: targets::LOCAL_SEARCH, "{report} in {:.3?}", start.elapsed());
        report
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }
}

impl StochasticSolver for LocalSearch {
    fn reseed(&mut self, seed: u64) {
        self.rng = MinimalPCG32::from_u64(seed);
    }
}

impl LocalSearch {
    fn walk(&mut self, domains: Vec<Interval>, pinned: Vec<bool>, rng: &mut MinimalPCG32, start: Instant) -> Report {
        let clause_count = self.formula.clauses.len();

        let values = domains
            .iter()
            .map(|domain| domain.sample(rng).unwrap_or_default())
            .collect::<Vec<_>>();

        let mut walk = Walk {
            solver: &*self,
            values,
            domains,
            pinned,
            weights: vec![1; clause_count],
            tabu_until: vec![0; self.formula.signature.len()],
            falsified: Vec::default(),
            position: vec![None; clause_count],
        };
        for clause in 0..clause_count {
            walk.refresh(clause);
        }

        for step in 0..self.max_steps {
            if walk.falsified.is_empty() {
                log::trace!(target: targets::LOCAL_SEARCH, "Model after {step} steps");
                break;
            }

            if step % CLOCK_INTERVAL == 0 && start.elapsed() > self.timeout {
                log::info!(target: targets::LOCAL_SEARCH, "Timeout after {step} steps");
                break;
            }

            let clause = walk.falsified[rng.random_range(0..walk.falsified.len())];
            let candidates = self.formula.clauses[clause]
                .iter()
                .flat_map(|literal| walk.moves(literal, rng))
                .collect::<Vec<_>>();
            if candidates.is_empty() {
                continue;
            }

            let tenure = TABU_BASE + rng.random_range(0..=TABU_SPREAD);

            if rng.random_bool(NOISE) {
                let mv = candidates[rng.random_range(0..candidates.len())];
                walk.apply(step, tenure, mv);
                continue;
            }

            let mut best: Option<(i64, Move)> = None;
            for mv in candidates.iter().copied() {
                if walk.tabu_until[mv.var] > step {
                    continue;
                }
                let score = walk.score(mv);
                let replace = match best {
                    None => true,
                    Some((best_score, _)) => score > best_score || (score == best_score && rng.random_bool(0.5)),
                };
                if replace {
                    best = Some((score, mv));
                }
            }

            let mv = match best {
                Some((score, mv)) if score > 0 => mv,
                best => {
                    for &falsified in &walk.falsified {
                        walk.weights[falsified] += 1;
                    }
                    match best {
                        Some((_, mv)) => mv,
                        None => candidates[rng.random_range(0..candidates.len())],
                    }
                }
            };
            walk.apply(step, tenure, mv);
        }

        match walk.falsified.is_empty() {
            true => {
                let values = walk.values;
                self.model = Some(model_of(&self.formula.signature, &values));
                Report::Satisfiable
            }
            false => Report::Unknown,
        }
    }
}

#[cfg(test)]
mod local_search_tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::{builder::smtlib, sampler::canonical::parse_literal};

    fn solver(input: &str, seed: u64) -> LocalSearch {
        let formula = smtlib::read(input).unwrap();
        LocalSearch::new(formula, 1 << 10, Duration::from_secs(10), 100_000, seed)
    }

    fn value_of(model: &Model, name: &str) -> i64 {
        parse_literal(model.get(name).unwrap())
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[test]
    fn satisfies_linear_constraints() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int) (declare-const z Int)
             (assert (<= (+ x y z) 30))
             (assert (>= (- x y) 7))
             (assert (distinct z 0))
             (assert (or (> z 20) (< z (- 20))))",
            9,
        );

        assert_eq!(solver.check(&[]), Report::Satisfiable);
        let model = solver.model().unwrap();
        let (x, y, z) = (value_of(&model, "x"), value_of(&model, "y"), value_of(&model, "z"));
        assert!(x + y + z <= 30);
        assert!(x - y >= 7);
        assert!(z > 20 || z < -20);
    }

    #[test]
    fn pinned_variables_hold() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int)
             (assert (= (+ x y) 10))",
            4,
        );

        let pin = Pin {
            name: "y".to_owned(),
            value: BigInt::from(-5),
        };
        assert_eq!(solver.check(&[pin]), Report::Satisfiable);
        let model = solver.model().unwrap();
        assert_eq!(value_of(&model, "y"), -5);
        assert_eq!(value_of(&model, "x"), 15);
    }

    #[test]
    fn conflicting_pins_fail() {
        let mut solver = LocalSearch::new(
            smtlib::read("(declare-const x Int) (assert (= x 3))").unwrap(),
            1 << 10,
            Duration::from_secs(1),
            1_000,
            0,
        );

        let pin = Pin {
            name: "x".to_owned(),
            value: BigInt::from(4),
        };
        assert_eq!(solver.check(&[pin]), Report::Unknown);
        assert!(solver.model().is_none());
    }

    #[test]
    fn empty_clause_is_unsatisfiable() {
        let mut solver = solver("(assert false)", 0);
        assert_eq!(solver.check(&[]), Report::Unsatisfiable);
    }

    #[test]
    fn reseeding_varies_models() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int)
             (assert (<= 0 x 100)) (assert (<= 0 y 100))",
            0,
        );

        let mut models = Vec::default();
        for seed in 0..8 {
            solver.reseed(seed);
            assert_eq!(solver.check(&[]), Report::Satisfiable);
            models.push(solver.model().unwrap());
        }
        models.dedup();
        assert!(models.len() > 1);
    }

    #[test]
    fn reseeding_varies_distant_models() {
        let mut solver = solver(
            "(declare-const u Int) (declare-const v Int)
             (assert (< u (- 500))) (assert (> u (- 600)))
             (assert (<= v 1000))
             (assert (>= (+ u v) 300))",
            0,
        );

        let mut models = std::collections::HashSet::new();
        for seed in 0..8 {
            solver.reseed(seed);
            assert_eq!(solver.check(&[]), Report::Satisfiable);
            let model = solver.model().unwrap();
            let (u, v) = (value_of(&model, "u"), value_of(&model, "v"));
            assert!(-600 < u && u < -500);
            assert!(v <= 1000 && u + v >= 300);
            models.insert((u, v));
        }
        assert!(models.len() > 1);
    }
}
