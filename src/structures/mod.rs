//! Key structures, such as formulas, literals, and models.
//!
//! ## Formulas
//!
//! A [formula](formula::Formula) is a conjunction of clauses, each a disjunction of [literals](literal::Literal), over a [signature](formula::Signature) of boolean and integer variables.
//! Arithmetic literals are [linear](linear::LinearSum) constraints.
//!
//! ## Models
//!
//! A [model](model::Model) binds variable names to printed values.
//! Models are the only structure passed from a solver to a sampler.

pub mod formula;
pub mod linear;
pub mod literal;
pub mod model;
