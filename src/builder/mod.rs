/*!
Tools for building a formula, and the subgoal of a formula.

# Reading

Formulas are read from SMT-LIB2 scripts, with [smtlib::read] or [smtlib::read_from].
Boolean structure is clausified as the script is read, with each connective named by a fresh hidden variable.
Likewise, each integer `ite` is named by a fresh hidden integer variable.

# Preprocessing

A formula is simplified to a [Subgoal](preprocess::Subgoal) with [simplify](preprocess::simplify).
A subgoal keeps the signature of the formula, and so a model of the subgoal may be converted to a model of the formula by [Subgoal::convert_model](preprocess::Subgoal::convert_model).

# Examples

```rust
# use lia_sampler::builder::{preprocess, smtlib};
let formula = smtlib::read("
(declare-const x Int)
(declare-const y Int)
(assert (= y (+ x 1)))
(assert (<= 0 x 5))
").unwrap();

let subgoal = preprocess::simplify(&formula);
assert_eq!(subgoal.definitions().len(), 1);
assert_eq!(subgoal.order().names(), &["x", "y"]);
```
*/

pub mod preprocess;
mod sexp;
pub mod smtlib;
mod tseitin;
