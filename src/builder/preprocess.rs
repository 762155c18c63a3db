/*!
Simplification of a formula to a [Subgoal].

Simplification applies the following to a fixpoint:
- Ground literals are folded, satisfied clauses are removed, and duplicate literals are removed.
- Boolean unit clauses fix the value of a variable, which is then folded into other clauses.
- Unit equalities are solved for a variable with a coefficient of ±1, and the solution substituted throughout.
- Unit equalities over a single variable fix the value of the variable, or produce the empty clause if the variable has no integral solution.

Variables keep their index, and eliminated variables no longer appear in any clause.
Each elimination is recorded as a [Definition] and [Subgoal::convert_model] replays the definitions, last first, to extend a model of the subgoal to a model of the formula.
*/

use std::collections::HashSet;

use num_bigint::BigInt;

use crate::{
    misc::log::targets::{self},
    sampler::canonical::parse_literal,
    structures::{
        formula::Formula,
        linear::{LinearSum, Var},
        literal::{Clause, Literal, Relation},
        model::{Model, Value, VarOrder},
    },
    types::err::ErrorKind,
};

/// The value of an eliminated variable, in terms of the variables which remain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Definition {
    Bool { var: Var, value: bool },
    Int { var: Var, sum: LinearSum },
}

/// A simplified formula, together with the means to map a model of the simplified formula back to the original.
#[derive(Clone, Debug)]
pub struct Subgoal {
    /// The simplified formula, with the signature of the original.
    pub formula: Formula,

    order: VarOrder,

    definitions: Vec<Definition>,
}

impl Subgoal {
    /// The formula as a subgoal of itself.
    pub fn identity(formula: Formula) -> Self {
        Subgoal {
            order: formula.order(),
            formula,
            definitions: Vec::default(),
        }
    }

    /// The canonical order on the visible variables of the original formula.
    pub fn order(&self) -> &VarOrder {
        &self.order
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Extends a model of the subgoal to a model of the original formula.
    ///
    /// Bindings of eliminated variables are replaced.
    /// If the model omits some variable used in a definition, the variable is read as zero.
    pub fn convert_model(&self, model: &Model) -> Result<Model, ErrorKind> {
        let mut converted = model.clone();
        let signature = &self.formula.signature;

        for definition in self.definitions.iter().rev() {
            match definition {
                Definition::Bool { var, value } => {
                    converted.bind(&signature.symbol(*var).name, Value::Bool(*value));
                }

                Definition::Int { var, sum } => {
                    let mut value = BigInt::from(sum.constant());
                    for (term_var, coefficient) in sum.terms() {
                        let name = &signature.symbol(*term_var).name;
                        let term_value = match converted.get(name) {
                            Some(literal) => parse_literal(literal)?,
                            None => {
                                log::debug!(target: targets::PREPROCESSING, "No binding of {name} to convert, read as 0");
                                BigInt::default()
                            }
                        };
                        value += term_value * *coefficient;
                    }
                    converted.bind(&signature.symbol(*var).name, Value::Int(value));
                }
            }
        }

        Ok(converted)
    }
}

/// Simplifies a formula.
pub fn simplify(formula: &Formula) -> Subgoal {
    let mut subgoal = Subgoal::identity(formula.clone());
    let mut blocked: HashSet<Var> = HashSet::default();

    loop {
        tidy(&mut subgoal.formula.clauses);

        if subgoal.formula.has_empty_clause() {
            log::info!(target: targets::PREPROCESSING, "Simplification found the empty clause");
            subgoal.formula.clauses = vec![Clause::default()];
            break;
        }

        match next_definition(&subgoal.formula.clauses, &blocked) {
            None => break,

            Some(Err(var)) => {
                // A single variable equality without integral solution.
                log::info!(target: targets::PREPROCESSING, "No integral value for v{var}");
                subgoal.formula.clauses = vec![Clause::default()];
                break;
            }

            Some(Ok(definition)) => match substitute(&subgoal.formula.clauses, &definition) {
                Some(clauses) => {
                    log::trace!(target: targets::PREPROCESSING, "Eliminated {definition:?}");
                    subgoal.formula.clauses = clauses;
                    subgoal.definitions.push(definition);
                }
                None => {
                    let var = match definition {
                        Definition::Bool { var, .. } | Definition::Int { var, .. } => var,
                    };
                    log::debug!(target: targets::PREPROCESSING, "Substitution for v{var} overflows, kept");
                    blocked.insert(var);
                }
            },
        }
    }

    log::info!(target: targets::PREPROCESSING, "Simplified to {} clauses, eliminating {} variables", subgoal.formula.clauses.len(), subgoal.definitions.len());
    subgoal
}

/// Folds ground literals, removes satisfied clauses and tautologies, and removes duplicate literals and clauses.
fn tidy(clauses: &mut Vec<Clause>) {
    let mut seen: HashSet<Clause> = HashSet::default();

    clauses.retain_mut(|clause| {
        let mut tidied = Clause::with_capacity(clause.len());
        for literal in clause.drain(..) {
            match literal.ground() {
                Some(true) => return false,
                Some(false) => continue,
                None => {}
            }
            if tidied.contains(&literal) {
                continue;
            }
            if literal.negate().is_some_and(|negation| tidied.contains(&negation)) {
                return false;
            }
            tidied.push(literal);
        }
        *clause = tidied;

        let mut key = clause.clone();
        key.sort_unstable_by_key(|literal| literal.to_string());
        seen.insert(key)
    });
}

/// A definition from some unit clause, or the variable of a single variable equality without integral solution.
fn next_definition(clauses: &[Clause], blocked: &HashSet<Var>) -> Option<Result<Definition, Var>> {
    for clause in clauses {
        let [literal] = clause.as_slice() else {
            continue;
        };

        match literal {
            Literal::Bool { var, polarity } if !blocked.contains(var) => {
                return Some(Ok(Definition::Bool {
                    var: *var,
                    value: *polarity,
                }));
            }

            Literal::Arith(constraint) if constraint.relation == Relation::Eq => {
                let sum = &constraint.sum;

                if let [(var, coefficient)] = sum.terms() {
                    if blocked.contains(var) {
                        continue;
                    }
                    // c·x + k = 0
                    let k = sum.constant() as i128;
                    let c = *coefficient as i128;
                    if k % c != 0 {
                        return Some(Err(*var));
                    }
                    let value = -k / c;
                    match i64::try_from(value) {
                        Ok(value) => {
                            return Some(Ok(Definition::Int {
                                var: *var,
                                sum: LinearSum::from_constant(value),
                            }))
                        }
                        Err(_) => continue,
                    }
                }

                // x·c + rest = 0 with c = ±1, so x = -c·rest
                let unit = sum
                    .terms()
                    .iter()
                    .find(|(var, coefficient)| coefficient.abs() == 1 && !blocked.contains(var));

                if let Some((var, coefficient)) = unit {
                    let definition = LinearSum::from_var(*var)
                        .checked_scale(*coefficient)
                        .and_then(|term| sum.checked_sub(&term))
                        .and_then(|rest| rest.checked_scale(-coefficient));
                    if let Some(definition) = definition {
                        return Some(Ok(Definition::Int {
                            var: *var,
                            sum: definition,
                        }));
                    }
                }
            }

            _ => {}
        }
    }
    None
}

/// The clauses, with the definition applied, if no arithmetic overflows.
fn substitute(clauses: &[Clause], definition: &Definition) -> Option<Vec<Clause>> {
    let mut substituted = Vec::with_capacity(clauses.len());

    for clause in clauses {
        let mut revised = Clause::with_capacity(clause.len());
        let mut satisfied = false;

        for literal in clause {
            match (definition, literal) {
                (Definition::Bool { var, value }, Literal::Bool { var: v, polarity }) if v == var => {
                    match value == polarity {
                        true => satisfied = true,
                        false => {}
                    }
                }

                (Definition::Int { var, sum }, Literal::Arith(constraint)) if literal.mentions(*var) => {
                    let mut constraint = constraint.clone();
                    constraint.sum = constraint.sum.substitute(*var, sum)?;
                    revised.push(Literal::Arith(constraint));
                }

                _ => revised.push(literal.clone()),
            }
        }

        if !satisfied {
            substituted.push(revised);
        }
    }

    Some(substituted)
}
