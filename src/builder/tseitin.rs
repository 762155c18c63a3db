//! Clausification of boolean structure.
//!
//! Each connective applied to non-constant operands is named by a fresh hidden boolean variable, and clauses are added to define the variable.
//! Constants are folded as they are met, so no clause mentions `true` or `false`.

use crate::{
    structures::{
        formula::{Formula, Sort},
        linear::LinearSum,
        literal::{Clause, Constraint, Literal, Relation},
    },
    types::err::{self},
};

/// An elaborated proposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prop {
    Const(bool),
    Lit(Literal),
}

impl Prop {
    /// A proposition from a literal, with ground literals folded to constants.
    pub fn from_literal(literal: Literal) -> Self {
        match literal.ground() {
            Some(value) => Prop::Const(value),
            None => Prop::Lit(literal),
        }
    }

    pub fn negate(&self) -> Result<Self, err::BuildError> {
        match self {
            Self::Const(value) => Ok(Self::Const(!value)),
            Self::Lit(literal) => Ok(Self::Lit(negate(literal)?)),
        }
    }
}

fn negate(literal: &Literal) -> Result<Literal, err::BuildError> {
    literal.negate().ok_or(err::BuildError::Overflow)
}

/// Adds definitions of connectives to a formula.
pub struct Encoder<'f> {
    pub formula: &'f mut Formula,
}

impl Encoder<'_> {
    fn fresh(&mut self) -> Literal {
        Literal::Bool {
            var: self.formula.signature.fresh_hidden(Sort::Bool),
            polarity: true,
        }
    }

    /// Asserts the proposition, as a unit clause.
    pub fn assert(&mut self, prop: Prop) {
        match prop {
            Prop::Const(true) => {}
            Prop::Const(false) => self.formula.add_clause(Clause::default()),
            Prop::Lit(literal) => self.formula.add_clause(vec![literal]),
        }
    }

    /// Asserts the disjunction of the propositions, as a single clause.
    pub fn assert_any(&mut self, props: Vec<Prop>) {
        let mut clause = Clause::default();
        for prop in props {
            match prop {
                Prop::Const(true) => return,
                Prop::Const(false) => {}
                Prop::Lit(literal) => {
                    if !clause.contains(&literal) {
                        clause.push(literal)
                    }
                }
            }
        }
        self.formula.add_clause(clause);
    }

    pub fn and(&mut self, props: Vec<Prop>) -> Result<Prop, err::BuildError> {
        let mut literals = Vec::with_capacity(props.len());
        for prop in props {
            match prop {
                Prop::Const(true) => {}
                Prop::Const(false) => return Ok(Prop::Const(false)),
                Prop::Lit(literal) => literals.push(literal),
            }
        }

        match literals.len() {
            0 => Ok(Prop::Const(true)),
            1 => Ok(Prop::Lit(literals.remove(0))),
            _ => {
                // a ↔ (l₁ ∧ … ∧ lₙ)
                let a = self.fresh();
                let not_a = negate(&a)?;
                let mut long = vec![a.clone()];
                for literal in literals {
                    long.push(negate(&literal)?);
                    self.formula.add_clause(vec![not_a.clone(), literal]);
                }
                self.formula.add_clause(long);
                Ok(Prop::Lit(a))
            }
        }
    }

    pub fn or(&mut self, props: Vec<Prop>) -> Result<Prop, err::BuildError> {
        let negated = props
            .iter()
            .map(Prop::negate)
            .collect::<Result<Vec<_>, _>>()?;
        self.and(negated)?.negate()
    }

    pub fn iff(&mut self, a: Prop, b: Prop) -> Result<Prop, err::BuildError> {
        match (a, b) {
            (Prop::Const(x), Prop::Const(y)) => Ok(Prop::Const(x == y)),
            (Prop::Const(true), other) | (other, Prop::Const(true)) => Ok(other),
            (Prop::Const(false), other) | (other, Prop::Const(false)) => other.negate(),
            (Prop::Lit(a), Prop::Lit(b)) => {
                let x = self.fresh();
                let not_x = negate(&x)?;
                let not_a = negate(&a)?;
                let not_b = negate(&b)?;
                self.formula
                    .add_clause(vec![not_x.clone(), not_a.clone(), b.clone()]);
                self.formula.add_clause(vec![not_x, a.clone(), not_b.clone()]);
                self.formula.add_clause(vec![x.clone(), a, b]);
                self.formula.add_clause(vec![x.clone(), not_a, not_b]);
                Ok(Prop::Lit(x))
            }
        }
    }

    pub fn ite(&mut self, condition: Prop, then: Prop, otherwise: Prop) -> Result<Prop, err::BuildError> {
        match condition {
            Prop::Const(true) => Ok(then),
            Prop::Const(false) => Ok(otherwise),
            condition => {
                let left = self.and(vec![condition.clone(), then])?;
                let right = self.and(vec![condition.negate()?, otherwise])?;
                self.or(vec![left, right])
            }
        }
    }

    /// A sum naming `condition ? then : otherwise`, through a hidden integer variable.
    pub fn ite_int(
        &mut self,
        condition: Prop,
        then: LinearSum,
        otherwise: LinearSum,
    ) -> Result<LinearSum, err::BuildError> {
        let condition = match condition {
            Prop::Const(true) => return Ok(then),
            Prop::Const(false) => return Ok(otherwise),
            Prop::Lit(literal) => literal,
        };

        let h = LinearSum::from_var(self.formula.signature.fresh_hidden(Sort::Int));
        let equal = |sum: &LinearSum| -> Result<Literal, err::BuildError> {
            let difference = h.checked_sub(sum).ok_or(err::BuildError::Overflow)?;
            Ok(Literal::Arith(Constraint::new(difference, Relation::Eq)))
        };

        let then_equal = equal(&then)?;
        let otherwise_equal = equal(&otherwise)?;
        self.formula
            .add_clause(vec![negate(&condition)?, then_equal]);
        self.formula.add_clause(vec![condition, otherwise_equal]);
        Ok(h)
    }
}

#[cfg(test)]
mod tseitin_tests {
    use super::*;

    fn all_valuations(count: usize) -> impl Iterator<Item = Vec<i64>> {
        (0..(1 << count)).map(move |bits: usize| (0..count).map(|i| ((bits >> i) & 1) as i64).collect())
    }

    fn holds(prop: &Prop, values: &[i64]) -> bool {
        match prop {
            Prop::Const(value) => *value,
            Prop::Lit(literal) => literal.holds(values),
        }
    }

    /// Whether some extension of the valuation to the hidden variables satisfies the formula and the unit `prop`.
    fn extends(formula: &Formula, prop: &Prop, base: &[i64], hidden: usize) -> bool {
        all_valuations(hidden).any(|extra| {
            let values = base.iter().chain(extra.iter()).copied().collect::<Vec<_>>();
            formula.holds(&values) && holds(prop, &values)
        })
    }

    #[test]
    fn connectives_are_equisatisfiable() {
        let mut formula = Formula::default();
        let p = formula.signature.declare("p", Sort::Bool).unwrap();
        let q = formula.signature.declare("q", Sort::Bool).unwrap();
        let lit = |var| Prop::Lit(Literal::Bool { var, polarity: true });

        let mut encoder = Encoder {
            formula: &mut formula,
        };
        let and = encoder.and(vec![lit(p), lit(q)]).unwrap();
        let or = encoder.or(vec![lit(p), lit(q)]).unwrap();
        let iff = encoder.iff(lit(p), lit(q)).unwrap();
        let hidden = formula.signature.len() - 2;

        for base in all_valuations(2) {
            let (p, q) = (base[0] == 1, base[1] == 1);
            assert_eq!(extends(&formula, &and, &base, hidden), p && q);
            assert_eq!(extends(&formula, &or, &base, hidden), p || q);
            assert_eq!(extends(&formula, &iff, &base, hidden), p == q);
        }
    }

    #[test]
    fn constants_fold() {
        let mut formula = Formula::default();
        let p = formula.signature.declare("p", Sort::Bool).unwrap();
        let p = Prop::Lit(Literal::Bool {
            var: p,
            polarity: true,
        });

        let mut encoder = Encoder {
            formula: &mut formula,
        };
        assert_eq!(encoder.and(vec![p.clone(), Prop::Const(false)]), Ok(Prop::Const(false)));
        assert_eq!(encoder.or(vec![p.clone(), Prop::Const(false)]), Ok(p.clone()));
        assert_eq!(encoder.iff(Prop::Const(true), p.clone()), Ok(p));
        assert!(formula.clauses.is_empty());
    }
}
