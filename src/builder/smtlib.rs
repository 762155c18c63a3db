/*!
A reader for SMT-LIB2 scripts in the QF_LIA fragment.

The supported commands are `set-logic`, `set-info`, `set-option`, `declare-fun` and `define-fun` without arguments, `declare-const`, `assert`, `check-sat`, `get-model`, `get-info`, `get-value`, `echo`, and `exit`.
Commands which query a solver are ignored, and reading stops at `exit`.

Terms are built from numerals, `true`, `false`, the arithmetic operators `+`, `-`, `*`, the (chainable) comparisons `<=`, `<`, `>=`, `>`, `=`, `distinct`, the connectives `and`, `or`, `not`, `=>`, `xor`, `ite` over either sort, and `let`.
A product must have at most one non-constant factor.

```rust
# use lia_sampler::builder::smtlib;
let formula = smtlib::read("
(set-logic QF_LIA)
(declare-fun x () Int)
(declare-fun y () Int)
(assert (and (>= x 0) (>= y 0)))
(assert (= (+ x y) 10))
(check-sat)
").unwrap();

assert_eq!(formula.signature.len(), 2);
assert_eq!(formula.clauses.len(), 3);
```
*/

use std::{collections::HashMap, io::Read};

use crate::{
    builder::{
        sexp::{self, SExpr},
        tseitin::{Encoder, Prop},
    },
    misc::log::targets::{self},
    structures::{
        formula::{Formula, Sort},
        linear::LinearSum,
        literal::{Constraint, Literal, Relation},
    },
    types::err::{self, ErrorKind},
};

/// An elaborated term.
#[derive(Clone, Debug)]
enum Term {
    Prop(Prop),
    Int(LinearSum),
}

/// Reads a formula from a string.
pub fn read(input: &str) -> Result<Formula, ErrorKind> {
    let mut reader = Reader::default();
    for command in sexp::parse_all(input)? {
        if !reader.command(&command)? {
            break;
        }
    }
    log::info!(target: targets::PARSER, "Read {} variables and {} clauses", reader.formula.signature.len(), reader.formula.clauses.len());
    Ok(reader.formula)
}

/// Reads a formula from some source.
pub fn read_from(mut source: impl Read) -> Result<Formula, ErrorKind> {
    let mut input = String::default();
    if let Err(e) = source.read_to_string(&mut input) {
        return Err(err::IOError::Read(e.kind()).into());
    }
    read(&input)
}

#[derive(Default)]
struct Reader {
    formula: Formula,
    definitions: HashMap<String, Term>,
    scopes: Vec<HashMap<String, Term>>,
}

fn unsupported(expr: &SExpr) -> ErrorKind {
    err::ParseError::Unsupported(expr.to_string()).into()
}

fn overflow() -> ErrorKind {
    err::BuildError::Overflow.into()
}

impl Reader {
    fn encoder(&mut self) -> Encoder<'_> {
        Encoder {
            formula: &mut self.formula,
        }
    }

    /// Applies a command, returning false if reading should stop.
    fn command(&mut self, expr: &SExpr) -> Result<bool, ErrorKind> {
        let list = expr.as_list().ok_or_else(|| unsupported(expr))?;
        let head = list.first().and_then(SExpr::as_atom).ok_or_else(|| unsupported(expr))?;

        match (head, &list[1..]) {
            ("set-logic", [logic]) => {
                if logic.as_atom() != Some("QF_LIA") {
                    log::warn!(target: targets::PARSER, "Reading {logic} as QF_LIA");
                }
            }

            ("set-info" | "set-option" | "check-sat" | "get-model" | "get-info" | "get-value" | "echo", _) => {}

            ("exit", _) => return Ok(false),

            ("declare-const", [name, sort]) => {
                self.declare(name, sort)?;
            }

            ("declare-fun", [name, SExpr::List(arguments), sort]) if arguments.is_empty() => {
                self.declare(name, sort)?;
            }

            ("define-fun", [name, SExpr::List(arguments), sort, body]) if arguments.is_empty() => {
                let name = name.as_atom().ok_or_else(|| unsupported(expr))?;
                if self.definitions.contains_key(name) || self.formula.signature.get(name).is_some() {
                    return Err(err::BuildError::Redeclaration.into());
                }
                let term = self.term(body)?;
                match (self.sort(sort)?, &term) {
                    (Sort::Bool, Term::Prop(_)) | (Sort::Int, Term::Int(_)) => {}
                    _ => return Err(err::ParseError::Sort(expr.to_string()).into()),
                }
                self.definitions.insert(name.to_owned(), term);
            }

            ("assert", [term]) => self.assert(term)?,

            _ => return Err(unsupported(expr)),
        }

        Ok(true)
    }

    fn sort(&self, sort: &SExpr) -> Result<Sort, ErrorKind> {
        match sort.as_atom() {
            Some("Int") => Ok(Sort::Int),
            Some("Bool") => Ok(Sort::Bool),
            _ => Err(err::ParseError::Sort(sort.to_string()).into()),
        }
    }

    fn declare(&mut self, name: &SExpr, sort: &SExpr) -> Result<(), ErrorKind> {
        let sort = self.sort(sort)?;
        let name = name.as_atom().ok_or_else(|| unsupported(name))?;
        if self.definitions.contains_key(name) {
            return Err(err::BuildError::Redeclaration.into());
        }
        self.formula.signature.declare(name, sort)?;
        Ok(())
    }

    /// Asserts a term, splitting top-level conjunctions and chains and writing top-level disjunctions as a single clause.
    fn assert(&mut self, expr: &SExpr) -> Result<(), ErrorKind> {
        if let Some([head, arguments @ ..]) = expr.as_list() {
            match head.as_atom() {
                Some(head @ ("<=" | "<" | ">=" | ">")) => {
                    for prop in self.comparisons(head, expr, arguments)? {
                        self.encoder().assert(prop);
                    }
                    return Ok(());
                }
                Some(head @ ("=" | "distinct")) => {
                    for prop in self.equalities(head, expr, arguments)? {
                        self.encoder().assert(prop);
                    }
                    return Ok(());
                }
                Some("and") => {
                    for argument in arguments {
                        self.assert(argument)?;
                    }
                    return Ok(());
                }
                Some("or") => {
                    let props = arguments
                        .iter()
                        .map(|argument| self.prop(argument))
                        .collect::<Result<Vec<_>, _>>()?;
                    self.encoder().assert_any(props);
                    return Ok(());
                }
                _ => {}
            }
        }

        let prop = self.prop(expr)?;
        self.encoder().assert(prop);
        Ok(())
    }

    fn prop(&mut self, expr: &SExpr) -> Result<Prop, ErrorKind> {
        match self.term(expr)? {
            Term::Prop(prop) => Ok(prop),
            Term::Int(_) => Err(err::ParseError::Sort(expr.to_string()).into()),
        }
    }

    fn int(&mut self, expr: &SExpr) -> Result<LinearSum, ErrorKind> {
        match self.term(expr)? {
            Term::Int(sum) => Ok(sum),
            Term::Prop(_) => Err(err::ParseError::Sort(expr.to_string()).into()),
        }
    }

    fn lookup(&self, name: &str) -> Result<Term, ErrorKind> {
        for scope in self.scopes.iter().rev() {
            if let Some(term) = scope.get(name) {
                return Ok(term.clone());
            }
        }
        if let Some(term) = self.definitions.get(name) {
            return Ok(term.clone());
        }
        match self.formula.signature.get(name) {
            Some(var) => match self.formula.signature.symbol(var).sort {
                Sort::Bool => Ok(Term::Prop(Prop::Lit(Literal::Bool {
                    var,
                    polarity: true,
                }))),
                Sort::Int => Ok(Term::Int(LinearSum::from_var(var))),
            },
            None => Err(err::ParseError::UnknownSymbol(name.to_owned()).into()),
        }
    }

    fn term(&mut self, expr: &SExpr) -> Result<Term, ErrorKind> {
        let list = match expr {
            SExpr::Atom(atom) => return self.atom(atom),
            SExpr::List(list) => list,
        };

        let (head, arguments) = match list.split_first() {
            Some((SExpr::Atom(head), arguments)) => (head.as_str(), arguments),
            _ => return Err(unsupported(expr)),
        };

        match head {
            "let" => return self.let_(expr, arguments),
            "ite" => return self.ite(expr, arguments),
            "=" | "distinct" => {
                let props = self.equalities(head, expr, arguments)?;
                return Ok(Term::Prop(self.encoder().and(props)?));
            }
            _ => {}
        }

        match head {
            "+" | "-" | "*" => self.arithmetic(head, expr, arguments).map(Term::Int),
            "<=" | "<" | ">=" | ">" => {
                let props = self.comparisons(head, expr, arguments)?;
                Ok(Term::Prop(self.encoder().and(props)?))
            }
            "and" | "or" | "not" | "=>" | "xor" => self.connective(head, expr, arguments).map(Term::Prop),
            _ => Err(unsupported(expr)),
        }
    }

    fn atom(&self, atom: &str) -> Result<Term, ErrorKind> {
        match atom {
            "true" => Ok(Term::Prop(Prop::Const(true))),
            "false" => Ok(Term::Prop(Prop::Const(false))),
            numeral if numeral.starts_with(|c: char| c.is_ascii_digit()) => {
                match numeral.parse::<i64>() {
                    Ok(value) => Ok(Term::Int(LinearSum::from_constant(value))),
                    Err(_) => Err(err::ParseError::Numeral(numeral.to_owned()).into()),
                }
            }
            name => self.lookup(name),
        }
    }

    fn let_(&mut self, expr: &SExpr, arguments: &[SExpr]) -> Result<Term, ErrorKind> {
        let [SExpr::List(bindings), body] = arguments else {
            return Err(unsupported(expr));
        };

        let mut scope = HashMap::default();
        for binding in bindings {
            match binding.as_list() {
                Some([SExpr::Atom(name), term]) => {
                    let term = self.term(term)?;
                    scope.insert(name.clone(), term);
                }
                _ => return Err(unsupported(binding)),
            }
        }

        self.scopes.push(scope);
        let term = self.term(body);
        self.scopes.pop();
        term
    }

    fn ite(&mut self, expr: &SExpr, arguments: &[SExpr]) -> Result<Term, ErrorKind> {
        let [condition, then, otherwise] = arguments else {
            return Err(unsupported(expr));
        };

        let condition = self.prop(condition)?;
        match (self.term(then)?, self.term(otherwise)?) {
            (Term::Prop(then), Term::Prop(otherwise)) => {
                Ok(Term::Prop(self.encoder().ite(condition, then, otherwise)?))
            }
            (Term::Int(then), Term::Int(otherwise)) => {
                Ok(Term::Int(self.encoder().ite_int(condition, then, otherwise)?))
            }
            _ => Err(err::ParseError::Sort(expr.to_string()).into()),
        }
    }

    /// The pairwise (dis)equalities of the arguments, whose conjunction is the term.
    fn equalities(&mut self, head: &str, expr: &SExpr, arguments: &[SExpr]) -> Result<Vec<Prop>, ErrorKind> {
        if arguments.len() < 2 {
            return Err(unsupported(expr));
        }
        let terms = arguments
            .iter()
            .map(|argument| self.term(argument))
            .collect::<Result<Vec<_>, _>>()?;

        if terms.iter().all(|term| matches!(term, Term::Int(_))) {
            let sums = terms
                .into_iter()
                .filter_map(|term| match term {
                    Term::Int(sum) => Some(sum),
                    Term::Prop(_) => None,
                })
                .collect::<Vec<_>>();

            let mut props = Vec::default();
            match head {
                "=" => {
                    for pair in sums.windows(2) {
                        props.push(relate(&pair[0], &pair[1], Relation::Eq, 0)?);
                    }
                }
                _ => {
                    for (index, a) in sums.iter().enumerate() {
                        for b in &sums[index + 1..] {
                            props.push(relate(a, b, Relation::Ne, 0)?);
                        }
                    }
                }
            }
            return Ok(props);
        }

        if terms.iter().all(|term| matches!(term, Term::Prop(_))) {
            let props = terms
                .into_iter()
                .filter_map(|term| match term {
                    Term::Prop(prop) => Some(prop),
                    Term::Int(_) => None,
                })
                .collect::<Vec<_>>();

            return match head {
                "=" => {
                    let mut equivalences = Vec::default();
                    for pair in props.windows(2) {
                        equivalences.push(self.encoder().iff(pair[0].clone(), pair[1].clone())?);
                    }
                    Ok(equivalences)
                }
                // Only two boolean values exist.
                _ if props.len() > 2 => Ok(vec![Prop::Const(false)]),
                _ => {
                    let iff = self.encoder().iff(props[0].clone(), props[1].clone())?;
                    Ok(vec![iff.negate()?])
                }
            };
        }

        Err(err::ParseError::Sort(expr.to_string()).into())
    }

    fn arithmetic(&mut self, head: &str, expr: &SExpr, arguments: &[SExpr]) -> Result<LinearSum, ErrorKind> {
        let sums = arguments
            .iter()
            .map(|argument| self.int(argument))
            .collect::<Result<Vec<_>, _>>()?;

        let Some((first, rest)) = sums.split_first() else {
            return Err(unsupported(expr));
        };

        match head {
            "+" => rest
                .iter()
                .try_fold(first.clone(), |total, sum| total.checked_add(sum))
                .ok_or_else(overflow),

            "-" if rest.is_empty() => first.checked_neg().ok_or_else(overflow),

            "-" => rest
                .iter()
                .try_fold(first.clone(), |total, sum| total.checked_sub(sum))
                .ok_or_else(overflow),

            _ => {
                let mut product = first.clone();
                for factor in rest {
                    product = match (product.is_constant(), factor.is_constant()) {
                        (true, _) => factor.checked_scale(product.constant()),
                        (false, true) => product.checked_scale(factor.constant()),
                        (false, false) => return Err(err::ParseError::Nonlinear.into()),
                    }
                    .ok_or_else(overflow)?;
                }
                Ok(product)
            }
        }
    }

    /// The comparisons of adjacent arguments, whose conjunction is the term.
    fn comparisons(&mut self, head: &str, expr: &SExpr, arguments: &[SExpr]) -> Result<Vec<Prop>, ErrorKind> {
        if arguments.len() < 2 {
            return Err(unsupported(expr));
        }
        let sums = arguments
            .iter()
            .map(|argument| self.int(argument))
            .collect::<Result<Vec<_>, _>>()?;

        let mut props = Vec::default();
        for pair in sums.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let prop = match head {
                "<=" => relate(a, b, Relation::Le, 0)?,
                "<" => relate(a, b, Relation::Le, 1)?,
                ">=" => relate(b, a, Relation::Le, 0)?,
                _ => relate(b, a, Relation::Le, 1)?,
            };
            props.push(prop);
        }
        Ok(props)
    }

    fn connective(&mut self, head: &str, expr: &SExpr, arguments: &[SExpr]) -> Result<Prop, ErrorKind> {
        let props = arguments
            .iter()
            .map(|argument| self.prop(argument))
            .collect::<Result<Vec<_>, _>>()?;

        match head {
            "and" => Ok(self.encoder().and(props)?),
            "or" => Ok(self.encoder().or(props)?),
            "not" if props.len() == 1 => Ok(props[0].negate()?),
            "=>" if props.len() >= 2 => {
                // Right associative, so a => b => c is a => (b => c).
                let mut props = props;
                let mut implication = props.pop().ok_or_else(|| unsupported(expr))?;
                while let Some(antecedent) = props.pop() {
                    implication = self.encoder().or(vec![antecedent.negate()?, implication])?;
                }
                Ok(implication)
            }
            "xor" if props.len() >= 2 => {
                let mut props = props.into_iter();
                let mut parity = props.next().ok_or_else(|| unsupported(expr))?;
                for prop in props {
                    parity = self.encoder().iff(parity, prop)?.negate()?;
                }
                Ok(parity)
            }
            _ => Err(unsupported(expr)),
        }
    }
}

/// The proposition `a - b + offset ⋈ 0`.
fn relate(a: &LinearSum, b: &LinearSum, relation: Relation, offset: i64) -> Result<Prop, ErrorKind> {
    let sum = a
        .checked_sub(b)
        .and_then(|sum| sum.checked_add_constant(offset))
        .ok_or_else(overflow)?;
    Ok(Prop::from_literal(Literal::Arith(Constraint::new(sum, relation))))
}

#[cfg(test)]
mod smtlib_tests {
    use super::*;

    fn values_of(formula: &Formula, pairs: &[(&str, i64)]) -> Vec<i64> {
        let mut values = vec![0; formula.signature.len()];
        for (name, value) in pairs {
            values[formula.signature.get(name).unwrap()] = *value;
        }
        values
    }

    #[test]
    fn linear_terms() {
        let formula = read(
            "(declare-const x Int) (declare-const y Int)
             (assert (<= (+ (* 2 x) (- y) (* 3 (- 1 x))) 5))",
        )
        .unwrap();

        // 2x - y + 3 - 3x ≤ 5, i.e. -x - y - 2 ≤ 0
        assert_eq!(formula.clauses.len(), 1);
        assert!(formula.holds(&values_of(&formula, &[("x", -1), ("y", -1)])));
        assert!(!formula.holds(&values_of(&formula, &[("x", -2), ("y", -1)])));
    }

    #[test]
    fn strict_comparisons_and_chains() {
        let formula = read("(declare-const x Int) (assert (< 0 x 3))").unwrap();

        for x in -2..5 {
            let values = values_of(&formula, &[("x", x)]);
            assert_eq!(formula.holds(&values), 0 < x && x < 3);
        }
    }

    #[test]
    fn asserted_chains_are_units() {
        let formula = read(
            "(declare-const x Int) (declare-const y Int)
             (assert (<= 0 x 5))
             (assert (= x y 3))",
        )
        .unwrap();

        assert_eq!(formula.signature.len(), 2);
        assert_eq!(formula.clauses.len(), 4);
        assert!(formula.clauses.iter().all(|clause| clause.len() == 1));
        assert!(formula.holds(&values_of(&formula, &[("x", 3), ("y", 3)])));
        assert!(!formula.holds(&values_of(&formula, &[("x", 3), ("y", 2)])));
    }

    #[test]
    fn let_and_definitions() {
        let formula = read(
            "(declare-fun x () Int)
             (define-fun two () Int 2)
             (assert (let ((y (+ x two))) (= y 5)))",
        )
        .unwrap();

        assert!(formula.holds(&values_of(&formula, &[("x", 3)])));
        assert!(!formula.holds(&values_of(&formula, &[("x", 4)])));
    }

    #[test]
    fn nonlinear_is_rejected() {
        let result = read("(declare-const x Int) (assert (= (* x x) 4))");
        assert_eq!(result.err(), Some(ErrorKind::Parse(err::ParseError::Nonlinear)));
    }

    #[test]
    fn unknown_symbols() {
        let result = read("(assert (= z 4))");
        assert_eq!(
            result.err(),
            Some(ErrorKind::Parse(err::ParseError::UnknownSymbol("z".to_owned())))
        );
    }

    #[test]
    fn sort_mismatch() {
        let result = read("(declare-const p Bool) (assert (<= p 1))");
        assert!(matches!(result, Err(ErrorKind::Parse(err::ParseError::Sort(_)))));
    }

    #[test]
    fn integer_ite_introduces_hidden() {
        let formula = read(
            "(declare-const p Bool) (declare-const x Int)
             (assert (= x (ite p 1 (- 1))))",
        )
        .unwrap();

        assert_eq!(formula.signature.len(), 3);
        assert_eq!(formula.order().names(), &["p", "x"]);
    }

    #[test]
    fn ground_assertions_fold() {
        let formula = read("(assert (<= 1 2)) (assert (distinct 3 3))").unwrap();
        assert_eq!(formula.clauses.len(), 1);
        assert!(formula.has_empty_clause());
    }

    #[test]
    fn exit_stops_reading() {
        let formula = read("(declare-const x Int) (exit) (assert (= y 1))").unwrap();
        assert!(formula.clauses.is_empty());
    }
}
