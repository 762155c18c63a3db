//! Generic structures, independent of formulas and models.

pub mod interval;

mod minimal_pcg;
pub use minimal_pcg::MinimalPCG32;
