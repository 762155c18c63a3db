//! Formulas, as a signature of variables together with a conjunction of clauses.
//!
//! Variables are indexed by their position in the [Signature].
//! Each variable has a [Sort], and variables introduced while encoding a formula are marked *hidden*.
//! Hidden variables are part of every solver model, though never part of a sample.

use std::collections::HashMap;

use crate::{
    generic::interval::Interval,
    structures::{
        linear::Var,
        literal::{Clause, Literal},
        model::VarOrder,
    },
    types::err::{self},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sort {
    Bool,
    Int,
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub sort: Sort,
    pub hidden: bool,
}

/// The variables of a formula.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    symbols: Vec<Symbol>,
    index: HashMap<String, Var>,
    fresh_count: usize,
}

impl Signature {
    /// Declares a (visible) variable, returning an error if the name has already been declared.
    pub fn declare(&mut self, name: &str, sort: Sort) -> Result<Var, err::BuildError> {
        if self.index.contains_key(name) {
            return Err(err::BuildError::Redeclaration);
        }
        Ok(self.push(name.to_owned(), sort, false))
    }

    /// A fresh hidden variable, named so as not to clash with any declared name.
    pub fn fresh_hidden(&mut self, sort: Sort) -> Var {
        loop {
            let name = format!("!aux{}", self.fresh_count);
            self.fresh_count += 1;
            if !self.index.contains_key(&name) {
                return self.push(name, sort, true);
            }
        }
    }

    fn push(&mut self, name: String, sort: Sort, hidden: bool) -> Var {
        let var = self.symbols.len();
        self.index.insert(name.clone(), var);
        self.symbols.push(Symbol { name, sort, hidden });
        var
    }

    pub fn get(&self, name: &str) -> Option<Var> {
        self.index.get(name).copied()
    }

    pub fn symbol(&self, var: Var) -> &Symbol {
        &self.symbols[var]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (Var, &Symbol)> {
        self.symbols.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The initial domain of each variable, with integers bounded by `bound` in absolute value.
    pub fn domains(&self, bound: i64) -> Vec<Interval> {
        self.symbols
            .iter()
            .map(|symbol| match symbol.sort {
                Sort::Bool => Interval::new(0, 1),
                Sort::Int => Interval::new(-bound, bound),
            })
            .collect()
    }
}

/// A formula in conjunctive normal form.
#[derive(Clone, Debug, Default)]
pub struct Formula {
    pub signature: Signature,
    pub clauses: Vec<Clause>,
}

impl Formula {
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Whether every clause holds on the given valuation.
    pub fn holds(&self, values: &[i64]) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|literal| literal.holds(values)))
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|clause| clause.is_empty())
    }

    /// The visible variables of the formula, in canonical order.
    pub fn order(&self) -> VarOrder {
        VarOrder::new(
            self.signature
                .symbols()
                .filter(|(_, symbol)| !symbol.hidden)
                .map(|(_, symbol)| symbol.name.clone()),
        )
    }

    /// For each variable, the indices of the clauses which mention the variable.
    pub fn occurrences(&self) -> Vec<Vec<usize>> {
        let mut occurrences = vec![Vec::default(); self.signature.len()];
        for (index, clause) in self.clauses.iter().enumerate() {
            for literal in clause {
                for var in literal.vars() {
                    if occurrences[var].last() != Some(&index) {
                        occurrences[var].push(index);
                    }
                }
            }
        }
        occurrences
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for clause in &self.clauses {
            let literals = clause.iter().map(Literal::to_string).collect::<Vec<_>>();
            writeln!(f, "{}", literals.join(" ∨ "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod formula_tests {
    use super::*;

    #[test]
    fn redeclaration_is_noted() {
        let mut signature = Signature::default();
        assert!(signature.declare("x", Sort::Int).is_ok());
        assert_eq!(
            signature.declare("x", Sort::Bool),
            Err(err::BuildError::Redeclaration)
        );
    }

    #[test]
    fn hidden_variables_avoid_names() {
        let mut signature = Signature::default();
        let _ = signature.declare("!aux0", Sort::Int);
        let aux = signature.fresh_hidden(Sort::Bool);

        assert_eq!(signature.symbol(aux).name, "!aux1");
        assert!(signature.symbol(aux).hidden);
    }

    #[test]
    fn order_skips_hidden() {
        let mut formula = Formula::default();
        let _ = formula.signature.declare("y", Sort::Int);
        let _ = formula.signature.fresh_hidden(Sort::Bool);
        let _ = formula.signature.declare("b", Sort::Bool);
        let _ = formula.signature.declare("x", Sort::Int);

        let order = formula.order();
        assert_eq!(order.names(), &["b", "x", "y"]);
    }
}
