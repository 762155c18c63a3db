/*!
Canonical forms of models, and their fingerprints.

A model is canonicalised relative to a [VarOrder]: the value of each variable of the order is read, in order, from its printed form.
- Negative integers may be printed in prefix form, e.g. `(- 42)` or `( - 42 )`, and are normalised to `-42`.
- `true` and `false` are read as 1 and 0.
- Anything else is a [ModelLiteral](err::ParseError::ModelLiteral) error.

The fingerprint of a sample is the polynomial hash of its values, by Horner's rule with base [BASE] modulo the prime [MODULUS], starting from 1.
Distinct samples may share a fingerprint, with probability roughly 1 / [MODULUS] for a pair of samples.
Such a sample would be rejected as a duplicate, and this is accepted.

```rust
# use lia_sampler::sampler::canonical;
# use num_bigint::BigInt;
assert_eq!(canonical::normalize_negatives("(- 42)"), "-42");
assert_eq!(canonical::parse_literal("(- 42)"), Ok(BigInt::from(-42)));
assert_eq!(canonical::parse_literal("true"), Ok(BigInt::from(1)));
```
*/

use num_bigint::BigInt;
use num_traits::{Euclid, ToPrimitive};

use crate::{
    misc::log::targets::{self},
    structures::model::{Model, VarOrder},
    types::err::{self},
};

/// The base of the fingerprint polynomial.
pub const BASE: u64 = 37;

/// The modulus of the fingerprint polynomial, the Mersenne prime 2⁶¹ - 1.
pub const MODULUS: u64 = 2_305_843_009_213_693_951;

/// The printed value with each parenthesised negative numeral written as a signed numeral.
pub fn normalize_negatives(printed: &str) -> String {
    let mut normalized = String::with_capacity(printed.len());
    let mut rest = printed;

    while let Some(open) = rest.find('(') {
        normalized.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match negative_numeral(after) {
            Some((numeral, consumed)) => {
                normalized.push('-');
                normalized.push_str(numeral);
                rest = &after[consumed..];
            }
            None => {
                normalized.push('(');
                rest = after;
            }
        }
    }
    normalized.push_str(rest);

    normalized
}

/// If `s` begins `- digits )`, allowing whitespace between parts, the digits and the length of the match.
fn negative_numeral(s: &str) -> Option<(&str, usize)> {
    let trimmed = s.trim_start();
    let mut consumed = s.len() - trimmed.len();

    let after_minus = trimmed.strip_prefix('-')?;
    consumed += 1;

    let digits_start = after_minus.trim_start();
    consumed += after_minus.len() - digits_start.len();

    let digit_count = digits_start.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    let digits = &digits_start[..digit_count];
    consumed += digit_count;

    let after_digits = &digits_start[digit_count..];
    let close = after_digits.trim_start();
    consumed += after_digits.len() - close.len();

    close.strip_prefix(')')?;
    consumed += 1;

    Some((digits, consumed))
}

/// The integer value of a printed literal.
pub fn parse_literal(printed: &str) -> Result<BigInt, err::ParseError> {
    let normalized = normalize_negatives(printed.trim());

    match normalized.as_str() {
        "true" => return Ok(BigInt::from(1)),
        "false" => return Ok(BigInt::from(0)),
        _ => {}
    }

    let digits = normalized.strip_prefix('-').unwrap_or(&normalized);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err::ParseError::ModelLiteral(printed.to_owned()));
    }

    normalized
        .parse::<BigInt>()
        .map_err(|_| err::ParseError::ModelLiteral(printed.to_owned()))
}

/// The polynomial fingerprint of a sequence of values.
pub fn fingerprint<'v>(values: impl IntoIterator<Item = &'v BigInt>) -> u64 {
    let modulus = BigInt::from(MODULUS);
    let mut hash = BigInt::from(1);
    for value in values {
        hash = (hash * BASE + value).rem_euclid(&modulus);
    }
    // The hash is reduced modulo a value less than 2⁶⁴.
    hash.to_u64().unwrap_or_default()
}

/// A canonicalised model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Each variable of the order bound by the model, with its normalised printed value.
    entries: Vec<(String, String)>,

    values: Vec<BigInt>,

    fingerprint: u64,
}

impl Sample {
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn values(&self) -> &[BigInt] {
        &self.values
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}:{value};")?;
        }
        Ok(())
    }
}

/// Canonicalises a model, relative to an order.
///
/// Variables of the order without a binding in the model are skipped.
/// Bindings of variables outside the order are ignored.
pub fn canonicalize(model: &Model, order: &VarOrder) -> Result<Sample, err::ParseError> {
    let mut entries = Vec::with_capacity(order.len());
    let mut values = Vec::with_capacity(order.len());

    for name in order.names() {
        let Some(printed) = model.get(name) else {
            log::debug!(target: targets::CANONICAL, "No binding for {name}");
            continue;
        };
        values.push(parse_literal(printed)?);
        entries.push((name.clone(), normalize_negatives(printed.trim())));
    }

    if entries.len() < model.len() {
        log::trace!(target: targets::CANONICAL, "Ignored {} bindings outside the order", model.len() - entries.len());
    }

    let fingerprint = fingerprint(&values);
    Ok(Sample {
        entries,
        values,
        fingerprint,
    })
}
