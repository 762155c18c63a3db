//! Linear sums over integer variables.
//!
//! A [LinearSum] is a sum `c₁·x₁ + … + cₙ·xₙ + k` with `i64` coefficients and constant.
//! Terms are kept sorted by variable, with at most one term per variable and no zero coefficients, so equal sums are structurally equal.
//!
//! All arithmetic on sums is checked, returning `None` on overflow.
//! Evaluation, by contrast, is made with `i128` so evaluating a sum on values within the bounds of the built-in solvers does not overflow.

use crate::generic::interval::Interval;

/// Variables are indices into the [signature](crate::structures::formula::Signature) of a formula.
pub type Var = usize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinearSum {
    terms: Vec<(Var, i64)>,
    constant: i64,
}

impl LinearSum {
    pub fn from_constant(constant: i64) -> Self {
        LinearSum {
            terms: Vec::default(),
            constant,
        }
    }

    pub fn from_var(var: Var) -> Self {
        LinearSum {
            terms: vec![(var, 1)],
            constant: 0,
        }
    }

    /// A sum from some collection of terms, which may repeat variables.
    pub fn from_parts(terms: impl IntoIterator<Item = (Var, i64)>, constant: i64) -> Option<Self> {
        let mut terms = terms.into_iter().collect::<Vec<_>>();
        terms.sort_unstable_by_key(|(var, _)| *var);

        let mut merged: Vec<(Var, i64)> = Vec::with_capacity(terms.len());
        for (var, coefficient) in terms {
            match merged.last_mut() {
                Some((last, sum)) if *last == var => *sum = sum.checked_add(coefficient)?,
                _ => merged.push((var, coefficient)),
            }
        }
        merged.retain(|(_, coefficient)| *coefficient != 0);

        Some(LinearSum {
            terms: merged,
            constant,
        })
    }

    pub fn terms(&self) -> &[(Var, i64)] {
        &self.terms
    }

    pub fn constant(&self) -> i64 {
        self.constant
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.terms.iter().map(|(var, _)| *var)
    }

    /// The coefficient of `var`, which is zero if `var` does not occur in the sum.
    pub fn coefficient(&self, var: Var) -> i64 {
        match self.terms.binary_search_by_key(&var, |(v, _)| *v) {
            Ok(index) => self.terms[index].1,
            Err(_) => 0,
        }
    }

    pub fn checked_add(&self, other: &LinearSum) -> Option<Self> {
        let constant = self.constant.checked_add(other.constant)?;
        LinearSum::from_parts(self.terms.iter().chain(other.terms.iter()).copied(), constant)
    }

    pub fn checked_sub(&self, other: &LinearSum) -> Option<Self> {
        self.checked_add(&other.checked_neg()?)
    }

    pub fn checked_add_constant(&self, k: i64) -> Option<Self> {
        Some(LinearSum {
            terms: self.terms.clone(),
            constant: self.constant.checked_add(k)?,
        })
    }

    pub fn checked_scale(&self, k: i64) -> Option<Self> {
        if k == 0 {
            return Some(LinearSum::default());
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for (var, coefficient) in &self.terms {
            terms.push((*var, coefficient.checked_mul(k)?));
        }
        Some(LinearSum {
            terms,
            constant: self.constant.checked_mul(k)?,
        })
    }

    pub fn checked_neg(&self) -> Option<Self> {
        self.checked_scale(-1)
    }

    /// The sum with each occurrence of `var` replaced by `definition`.
    pub fn substitute(&self, var: Var, definition: &LinearSum) -> Option<Self> {
        let coefficient = self.coefficient(var);
        if coefficient == 0 {
            return Some(self.clone());
        }

        let rest = LinearSum {
            terms: self.terms.iter().filter(|(v, _)| *v != var).copied().collect(),
            constant: self.constant,
        };
        rest.checked_add(&definition.checked_scale(coefficient)?)
    }

    /// The value of the sum, given a value for each variable.
    pub fn evaluate(&self, values: &[i64]) -> i128 {
        self.terms
            .iter()
            .fold(self.constant as i128, |sum, (var, coefficient)| {
                sum.saturating_add((*coefficient as i128).saturating_mul(values[*var] as i128))
            })
    }

    /// The least and greatest values of the sum, given an interval of values for each variable.
    ///
    /// Empty domains are not expected, and are treated as the point at their start.
    pub fn range(&self, domains: &[Interval]) -> (i128, i128) {
        let mut min = self.constant as i128;
        let mut max = self.constant as i128;
        for (var, coefficient) in &self.terms {
            let (low, high) = term_range(*coefficient, &domains[*var]);
            min = min.saturating_add(low);
            max = max.saturating_add(high);
        }
        (min, max)
    }
}

/// The least and greatest values of `coefficient · x` for `x` in `domain`.
pub fn term_range(coefficient: i64, domain: &Interval) -> (i128, i128) {
    let a = (coefficient as i128).saturating_mul(domain.start as i128);
    let b = (coefficient as i128).saturating_mul(domain.end as i128);
    (a.min(b), a.max(b))
}

/// Floor division on `i128`, for a non-zero divisor.
pub fn div_floor(a: i128, b: i128) -> i128 {
    let q = a / b;
    match (a % b != 0) && ((a < 0) != (b < 0)) {
        true => q - 1,
        false => q,
    }
}

/// Ceiling division on `i128`, for a non-zero divisor.
pub fn div_ceil(a: i128, b: i128) -> i128 {
    let q = a / b;
    match (a % b != 0) && ((a < 0) == (b < 0)) {
        true => q + 1,
        false => q,
    }
}

/// `value` clamped to the range of an `i64`.
pub fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

impl std::fmt::Display for LinearSum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (var, coefficient) in &self.terms {
            write!(f, "{coefficient}·v{var} + ")?;
        }
        write!(f, "{}", self.constant)
    }
}

#[cfg(test)]
mod linear_tests {
    use super::*;

    #[test]
    fn parts_merge_and_drop_zeros() {
        let sum = LinearSum::from_parts([(2, 3), (0, 1), (2, -3), (1, 4), (0, 1)], 7).unwrap();

        assert_eq!(sum.terms(), &[(0, 2), (1, 4)]);
        assert_eq!(sum.constant(), 7);
        assert_eq!(sum.coefficient(2), 0);
    }

    #[test]
    fn substitution() {
        // 2x + y + 1, with x := y - 3, is 3y - 5
        let sum = LinearSum::from_parts([(0, 2), (1, 1)], 1).unwrap();
        let definition = LinearSum::from_parts([(1, 1)], -3).unwrap();

        let substituted = sum.substitute(0, &definition).unwrap();
        assert_eq!(substituted, LinearSum::from_parts([(1, 3)], -5).unwrap());
    }

    #[test]
    fn overflow_is_noted() {
        let sum = LinearSum::from_parts([(0, i64::MAX)], 0).unwrap();
        assert!(sum.checked_scale(2).is_none());
        assert!(sum.checked_add(&sum).is_none());
    }

    #[test]
    fn ranges() {
        let sum = LinearSum::from_parts([(0, 2), (1, -1)], 1).unwrap();
        let domains = [Interval::new(0, 3), Interval::new(-2, 5)];

        assert_eq!(sum.range(&domains), (1 - 5, 6 + 2 + 1));
        assert_eq!(sum.evaluate(&[3, -2]), 9);
    }

    #[test]
    fn rounding() {
        assert_eq!(div_floor(7, 2), 3);
        assert_eq!(div_floor(-7, 2), -4);
        assert_eq!(div_floor(7, -2), -4);
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(-7, 2), -3);
        assert_eq!(div_ceil(-7, -2), 4);
        assert_eq!(div_floor(6, 3), 2);
        assert_eq!(div_ceil(6, 3), 2);
    }
}
