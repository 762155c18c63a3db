//! Literals, and the clauses they form.
//!
//! A literal is either a boolean variable with a polarity, or an arithmetic [Constraint] `sum ⋈ 0` with ⋈ one of ≤, =, or ≠.
//!
//! Strict and reversed comparisons are normalised when a formula is built.
//! As variables range over the integers `s < 0` is `s + 1 ≤ 0`, `s ≥ 0` is `-s ≤ 0`, etc.
//! With this, the negation of a literal is again a literal, which keeps clausification simple.
//!
//! Boolean variables take the values 0 and 1 in valuations.

use crate::{
    generic::interval::Interval,
    structures::linear::{LinearSum, Var},
};

/// The status of a literal relative to a domain of values for each variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The literal holds on every valuation within the domains.
    True,

    /// The literal fails on every valuation within the domains.
    False,

    /// Neither of the above, or not known to be either.
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Le,
    Eq,
    Ne,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Le => write!(f, "≤"),
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "≠"),
        }
    }
}

/// The constraint `sum ⋈ 0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub sum: LinearSum,
    pub relation: Relation,
}

impl Constraint {
    pub fn new(sum: LinearSum, relation: Relation) -> Self {
        Constraint { sum, relation }
    }

    /// The negation of the constraint, if the negation can be represented.
    pub fn negate(&self) -> Option<Self> {
        match self.relation {
            // ¬(s ≤ 0) ⇔ s ≥ 1 ⇔ -s + 1 ≤ 0
            Relation::Le => Some(Constraint {
                sum: self.sum.checked_neg()?.checked_add_constant(1)?,
                relation: Relation::Le,
            }),
            Relation::Eq => Some(Constraint {
                sum: self.sum.clone(),
                relation: Relation::Ne,
            }),
            Relation::Ne => Some(Constraint {
                sum: self.sum.clone(),
                relation: Relation::Eq,
            }),
        }
    }

    /// Whether the constraint holds when the sum takes the given value.
    pub fn holds_on(&self, value: i128) -> bool {
        match self.relation {
            Relation::Le => value <= 0,
            Relation::Eq => value == 0,
            Relation::Ne => value != 0,
        }
    }

    pub fn holds(&self, values: &[i64]) -> bool {
        self.holds_on(self.sum.evaluate(values))
    }

    /// The truth value of a constraint with a constant sum.
    pub fn ground(&self) -> Option<bool> {
        match self.sum.is_constant() {
            true => Some(self.holds_on(self.sum.constant() as i128)),
            false => None,
        }
    }

    pub fn status(&self, domains: &[Interval]) -> Status {
        let (min, max) = self.sum.range(domains);
        let eq_status = || {
            if min == 0 && max == 0 {
                Status::True
            } else if min > 0 || max < 0 {
                Status::False
            } else {
                Status::Open
            }
        };

        match self.relation {
            Relation::Le => {
                if max <= 0 {
                    Status::True
                } else if min > 0 {
                    Status::False
                } else {
                    Status::Open
                }
            }
            Relation::Eq => eq_status(),
            Relation::Ne => match eq_status() {
                Status::True => Status::False,
                Status::False => Status::True,
                Status::Open => Status::Open,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool { var: Var, polarity: bool },
    Arith(Constraint),
}

impl Literal {
    pub fn negate(&self) -> Option<Self> {
        match self {
            Self::Bool { var, polarity } => Some(Self::Bool {
                var: *var,
                polarity: !polarity,
            }),
            Self::Arith(constraint) => Some(Self::Arith(constraint.negate()?)),
        }
    }

    pub fn holds(&self, values: &[i64]) -> bool {
        match self {
            Self::Bool { var, polarity } => (values[*var] != 0) == *polarity,
            Self::Arith(constraint) => constraint.holds(values),
        }
    }

    pub fn status(&self, domains: &[Interval]) -> Status {
        match self {
            Self::Bool { var, polarity } => {
                let domain = &domains[*var];
                let value = match (domain.contains(0), domain.contains(1)) {
                    (true, false) => false,
                    (false, true) => true,
                    _ => return Status::Open,
                };
                match value == *polarity {
                    true => Status::True,
                    false => Status::False,
                }
            }
            Self::Arith(constraint) => constraint.status(domains),
        }
    }

    /// The truth value of a literal free of variables.
    pub fn ground(&self) -> Option<bool> {
        match self {
            Self::Bool { .. } => None,
            Self::Arith(constraint) => constraint.ground(),
        }
    }

    pub fn vars(&self) -> Vec<Var> {
        match self {
            Self::Bool { var, .. } => vec![*var],
            Self::Arith(constraint) => constraint.sum.vars().collect(),
        }
    }

    pub fn mentions(&self, var: Var) -> bool {
        match self {
            Self::Bool { var: v, .. } => *v == var,
            Self::Arith(constraint) => constraint.sum.coefficient(var) != 0,
        }
    }
}

/// A clause is a disjunction of literals, and the empty clause is unsatisfiable.
pub type Clause = Vec<Literal>;

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool { var, polarity } => match polarity {
                true => write!(f, "v{var}"),
                false => write!(f, "¬v{var}"),
            },
            Self::Arith(constraint) => write!(f, "{} {} 0", constraint.sum, constraint.relation),
        }
    }
}
