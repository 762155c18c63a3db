/*!
A complete solver, over intervals of values.

Each variable has a domain, an interval of admissible values.
Booleans have the domain [0, 1], and integers the domain [-bound, bound].

# Search

A check is a depth-first search over domains:
1. Propagate, by repeatedly revising domains against each clause with exactly one open literal.
   If some clause has no literal which may hold, the domains are in conflict, and the search backtracks.
2. If every clause holds on all values within the domains, a value is drawn from each domain to form a model.
3. Otherwise, a variable *x* of some open clause and a value *v* of the domain of *x* are chosen at random, and the search branches on *x* = *v*, *x* ≤ *v* - 1, and *x* ≥ *v* + 1, in that order.

Each branch strictly narrows some domain, and domains are finite, so the search is exhaustive.
And, as the search is exhaustive relative to the domains, an unsatisfiable report is unsatisfiability *within the bound* on integers.

Randomness is drawn from a generator seeded when the solver is made, and so repeated checks of a solver explore in different orders.
*/

use std::time::{Duration, Instant};

use rand::Rng;

use crate::{
    generic::{interval::Interval, MinimalPCG32},
    misc::log::targets::{self},
    reports::Report,
    solvers::{model_of, resolve_pins, Solver},
    structures::{
        formula::Formula,
        linear::{div_ceil, div_floor, saturate, term_range, Var},
        literal::{Constraint, Literal, Relation, Status},
        model::{Model, Pin},
    },
};

/// A bound on rounds of propagation between decisions.
const PROPAGATION_ROUNDS: usize = 64;

/// Domains are in conflict with some clause.
struct Conflict;

pub struct Backtracker {
    formula: Formula,

    /// The domain of each variable, before pins.
    domains: Vec<Interval>,

    rng: MinimalPCG32,

    timeout: Duration,

    model: Option<Model>,
}

impl Backtracker {
    pub fn new(formula: Formula, bound: i64, timeout: Duration, seed: u64) -> Self {
        let domains = formula.signature.domains(bound);
        Backtracker {
            formula,
            domains,
            rng: MinimalPCG32::from_u64(seed),
            timeout,
            model: None,
        }
    }

    /// Revises domains against the clauses until no revision is made, or the round bound is reached.
    fn propagate(&self, domains: &mut [Interval]) -> Result<(), Conflict> {
        for _ in 0..PROPAGATION_ROUNDS {
            let mut revised = false;

            'clause_loop: for clause in &self.formula.clauses {
                let mut open = None;

                for literal in clause {
                    match literal.status(domains) {
                        Status::True => continue 'clause_loop,
                        Status::False => {}
                        Status::Open => match open {
                            None => open = Some(literal),
                            Some(_) => continue 'clause_loop,
                        },
                    }
                }

                match open {
                    None => return Err(Conflict),
                    Some(literal) => revised |= enforce(literal, domains)?,
                }
            }

            if !revised {
                break;
            }
        }
        Ok(())
    }

    /// Some variable of some open clause, if any clause is open.
    fn choose_variable(&mut self, domains: &[Interval]) -> Option<Var> {
        let open_clauses = self
            .formula
            .clauses
            .iter()
            .filter(|clause| !clause.iter().any(|literal| literal.status(domains) == Status::True))
            .collect::<Vec<_>>();

        if open_clauses.is_empty() {
            return None;
        }
        let clause = open_clauses[self.rng.random_range(0..open_clauses.len())];

        let unfixed = clause
            .iter()
            .flat_map(|literal| literal.vars())
            .filter(|var| !domains[*var].is_point())
            .collect::<Vec<_>>();

        match unfixed.is_empty() {
            // The clause is false, though propagation stopped at the round bound before noting this.
            true => None,
            false => Some(unfixed[self.rng.random_range(0..unfixed.len())]),
        }
    }

    fn search(&mut self, domains: Vec<Interval>, start: Instant) -> Report {
        let mut stack = vec![domains];
        let mut decisions: usize = 0;

        while let Some(mut domains) = stack.pop() {
            if start.elapsed() > self.timeout {
                log::info!(target: targets::COMPLETE, "Timeout after {decisions} decisions");
                return Report::Unknown;
            }

            if self.propagate(&mut domains).is_err() {
                continue;
            }

            let Some(var) = self.choose_variable(&domains) else {
                let values = domains
                    .iter()
                    .map(|domain| self.rng.random_range(domain.start..=domain.end))
                    .collect::<Vec<_>>();

                if !self.formula.holds(&values) {
                    // Propagation stopped at the round bound, with open clauses on fixed variables.
                    continue;
                }

                log::debug!(target: targets::COMPLETE, "Model after {decisions} decisions");
                self.model = Some(model_of(&self.formula.signature, &values));
                return Report::Satisfiable;
            };

            decisions += 1;
            let domain = domains[var];
            let value = self.rng.random_range(domain.start..=domain.end);
            log::trace!(target: targets::COMPLETE, "Decision v{var} = {value} in {domain}");

            let branches = [
                Interval::new(value.saturating_add(1), domain.end),
                Interval::new(domain.start, value.saturating_sub(1)),
                Interval::point(value),
            ];
            for branch in branches {
                let narrowed = domain.meet(&branch);
                if narrowed.is_empty() || narrowed == domain {
                    continue;
                }
                let mut branch_domains = domains.clone();
                branch_domains[var] = narrowed;
                stack.push(branch_domains);
            }
        }

        Report::Unsatisfiable
    }
}

impl Solver for Backtracker {
    fn check(&mut self, pins: &[Pin]) -> Report {
        let start = Instant::now();
        self.model = None;

        if self.formula.has_empty_clause() {
            return Report::Unsatisfiable;
        }

        let mut domains = self.domains.clone();
        let Some(pins) = resolve_pins(&self.formula.signature, pins) else {
            return Report::Unsatisfiable;
        };
        for (var, value) in pins {
            domains[var] = domains[var].meet(&Interval::point(value));
            if domains[var].is_empty() {
                log::debug!(target: targets::COMPLETE, "Pin of v{var} to {value} escapes the domain");
                return Report::Unsatisfiable;
            }
        }

        let report = self.search(domains, start);
        log::debug!(target: targets::COMPLETE, "{report} in {:.3?}", start.elapsed());
        report
    }

    fn model(&self) -> Option<Model> {
        self.model.clone()
    }
}

/// Narrows `domain` to `[low, high]`, noting whether a revision was made.
fn narrow(domain: &mut Interval, low: i128, high: i128) -> Result<bool, Conflict> {
    let narrowed = domain.meet(&Interval::new(saturate(low), saturate(high)));
    if narrowed.is_empty() {
        return Err(Conflict);
    }
    let revised = narrowed != *domain;
    *domain = narrowed;
    Ok(revised)
}

/// Narrows domains so the (open) literal may hold, noting whether a revision was made.
fn enforce(literal: &Literal, domains: &mut [Interval]) -> Result<bool, Conflict> {
    match literal {
        Literal::Bool { var, polarity } => {
            let value = *polarity as i128;
            narrow(&mut domains[*var], value, value)
        }
        Literal::Arith(constraint) => enforce_constraint(constraint, domains),
    }
}

fn enforce_constraint(constraint: &Constraint, domains: &mut [Interval]) -> Result<bool, Conflict> {
    let sum = &constraint.sum;
    let mut revised = false;

    match constraint.relation {
        Relation::Le | Relation::Eq => {
            for (var, coefficient) in sum.terms() {
                let (min, max) = sum.range(domains);
                let (term_min, term_max) = term_range(*coefficient, &domains[*var]);
                let rest_min = min.saturating_sub(term_min);
                let rest_max = max.saturating_sub(term_max);
                let a = *coefficient as i128;

                // a·x ≤ -rest_min, and for equalities also a·x ≥ -rest_max
                let upper = rest_min.saturating_neg();
                let lower = match constraint.relation {
                    Relation::Eq => rest_max.saturating_neg().max(i128::MIN + 1),
                    _ => i128::MIN,
                };

                let (low, high) = match a > 0 {
                    true => (ceil_or_min(lower, a), div_floor(upper, a)),
                    false => (div_ceil(upper, a), floor_or_max(lower, a)),
                };
                revised |= narrow(&mut domains[*var], low, high)?;
            }
        }

        Relation::Ne => {
            // Only a single unfixed variable allows revision, and only at the ends of its domain.
            let mut unfixed = sum.terms().iter().filter(|(var, _)| !domains[*var].is_point());
            let (Some((var, coefficient)), None) = (unfixed.next(), unfixed.next()) else {
                return Ok(false);
            };

            let (min, _) = sum.range(domains);
            let (term_min, _) = term_range(*coefficient, &domains[*var]);
            let rest = min.saturating_sub(term_min);
            let a = *coefficient as i128;
            if rest % a != 0 {
                return Ok(false);
            }
            let excluded = -rest / a;

            let domain = &mut domains[*var];
            let (start, end) = (domain.start as i128, domain.end as i128);
            if excluded == start {
                revised |= narrow(domain, excluded + 1, end)?;
            } else if excluded == end {
                revised |= narrow(domain, start, excluded - 1)?;
            }
        }
    }

    Ok(revised)
}

/// ⌈lower / a⌉ for positive a, with no bound kept as no bound.
fn ceil_or_min(lower: i128, a: i128) -> i128 {
    match lower == i128::MIN {
        true => i128::MIN,
        false => div_ceil(lower, a),
    }
}

/// ⌊lower / a⌋ for negative a, with no bound kept as no bound.
fn floor_or_max(lower: i128, a: i128) -> i128 {
    match lower == i128::MIN {
        true => i128::MAX,
        false => div_floor(lower, a),
    }
}

#[cfg(test)]
mod complete_tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::{builder::smtlib, sampler::canonical::parse_literal};

    fn solver(input: &str, seed: u64) -> Backtracker {
        let formula = smtlib::read(input).unwrap();
        Backtracker::new(formula, 1 << 10, Duration::from_secs(10), seed)
    }

    fn value_of(model: &Model, name: &str) -> BigInt {
        parse_literal(model.get(name).unwrap()).unwrap()
    }

    #[test]
    fn sum_with_bounds() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int)
             (assert (= (+ x y) 10)) (assert (>= x 0)) (assert (>= y 0))",
            5,
        );

        for _ in 0..8 {
            assert_eq!(solver.check(&[]), Report::Satisfiable);
            let model = solver.model().unwrap();
            let (x, y) = (value_of(&model, "x"), value_of(&model, "y"));
            assert_eq!(x.clone() + y.clone(), BigInt::from(10));
            assert!(x >= BigInt::from(0) && y >= BigInt::from(0));
        }
    }

    #[test]
    fn unsatisfiable_within_bound() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int)
             (assert (>= x 0)) (assert (>= y 0)) (assert (<= (+ x y) (- 1)))",
            1,
        );
        assert_eq!(solver.check(&[]), Report::Unsatisfiable);
        assert!(solver.model().is_none());
    }

    #[test]
    fn pins_are_transient() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const y Int)
             (assert (= (+ x y) 10)) (assert (<= 0 x 10))",
            2,
        );

        let pin = Pin {
            name: "x".to_owned(),
            value: BigInt::from(7),
        };
        assert_eq!(solver.check(std::slice::from_ref(&pin)), Report::Satisfiable);
        let model = solver.model().unwrap();
        assert_eq!(value_of(&model, "x"), BigInt::from(7));
        assert_eq!(value_of(&model, "y"), BigInt::from(3));

        let bad = Pin {
            name: "x".to_owned(),
            value: BigInt::from(11),
        };
        assert_eq!(solver.check(&[bad]), Report::Unsatisfiable);
        assert_eq!(solver.check(&[]), Report::Satisfiable);
    }

    #[test]
    fn disequalities_and_booleans() {
        let mut solver = solver(
            "(declare-const x Int) (declare-const p Bool)
             (assert (<= 0 x 2))
             (assert (distinct x 0)) (assert (distinct x 2))
             (assert (=> p (= x 0)))",
            3,
        );

        assert_eq!(solver.check(&[]), Report::Satisfiable);
        let model = solver.model().unwrap();
        assert_eq!(value_of(&model, "x"), BigInt::from(1));
        assert_eq!(model.get("p"), Some("false"));
    }

    #[test]
    fn propagation_narrows() {
        let formula = smtlib::read("(declare-const x Int) (declare-const y Int) (assert (<= (+ (* 2 x) y) 3)) (assert (>= y 1))").unwrap();
        let solver = Backtracker::new(formula, 100, Duration::from_secs(1), 0);
        let mut domains = solver.domains.clone();

        assert!(solver.propagate(&mut domains).is_ok());
        // y ≥ 1 so 2x ≤ 2
        assert_eq!(domains[0].end, 1);
        // x ≥ -100 so y ≤ 203, though y ≤ 100 already
        assert_eq!(domains[1], Interval::new(1, 100));
    }
}
