/*!
Closed intervals over `i64`, with randomised set operations.

An interval `[start, end]` with `start > end` is empty, and the empty interval is used as a sentinel rather than an error.

The operations [intersect], [union_], and [complement] are total, though *approximate*.
Where an exact result is not an interval (or is empty where emptiness is unhelpful) one of the candidate intervals is returned, chosen uniformly at random from the given source of randomness.

[Interval::meet] is the exact intersection, for contexts where an empty result is wanted.

```rust
# use lia_sampler::generic::interval::{self, Interval};
# use lia_sampler::generic::MinimalPCG32;
let mut rng = MinimalPCG32::from_u64(0);

let a = Interval::new(0, 10);
let b = Interval::new(5, 20);

assert_eq!(interval::intersect(a, b, &mut rng), Interval::new(5, 10));
assert_eq!(interval::union_(a, b, &mut rng), Interval::new(0, 20));

let far = Interval::new(100, 200);
let either = interval::intersect(a, far, &mut rng);
assert!(either == a || either == far);
```
*/

use rand::Rng;

/// A closed interval of `i64` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Default for Interval {
    fn default() -> Self {
        Interval::FULL
    }
}

impl Interval {
    /// Every `i64`.
    pub const FULL: Interval = Interval {
        start: i64::MIN,
        end: i64::MAX,
    };

    /// The canonical empty interval.
    pub const EMPTY: Interval = Interval { start: 1, end: 0 };

    pub fn new(start: i64, end: i64) -> Self {
        Interval { start, end }
    }

    /// The interval containing only `value`.
    pub fn point(value: i64) -> Self {
        Interval {
            start: value,
            end: value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn is_full(&self) -> bool {
        self.start == i64::MIN && self.end == i64::MAX
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Whether the intervals share some value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.is_empty() && !other.is_empty() && !(self.end < other.start || other.end < self.start)
    }

    /// Whether the intervals are disjoint, though no value lies between them.
    pub fn adjacent(&self, other: &Interval) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.end.checked_add(1) == Some(other.start) || other.end.checked_add(1) == Some(self.start)
    }

    /// The exact intersection, which is empty if the intervals do not overlap.
    pub fn meet(&self, other: &Interval) -> Interval {
        match self.overlaps(other) {
            true => Interval::new(self.start.max(other.start), self.end.min(other.end)),
            false => Interval::EMPTY,
        }
    }

    /// The member of the interval closest to `value`, if the interval is non-empty.
    pub fn nearest(&self, value: i64) -> Option<i64> {
        match self.is_empty() {
            true => None,
            false => Some(value.clamp(self.start, self.end)),
        }
    }

    /// A member of the interval drawn uniformly at random, if the interval is non-empty.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<i64> {
        match self.is_empty() {
            true => None,
            false => Some(rng.random_range(self.start..=self.end)),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.is_empty() {
            true => write!(f, "[]"),
            false => write!(f, "[{}, {}]", self.start, self.end),
        }
    }
}

/// Either `a` or `b`, with equal probability.
fn coin<R: Rng>(a: Interval, b: Interval, rng: &mut R) -> Interval {
    match rng.random_bool(0.5) {
        true => a,
        false => b,
    }
}

/// The intersection of two intervals.
///
/// Empty if either interval is empty.
/// If the intervals are disjoint, one of the two intervals (and *not* the empty interval) is returned at random.
pub fn intersect<R: Rng>(a: Interval, b: Interval, rng: &mut R) -> Interval {
    if a.is_empty() || b.is_empty() {
        return Interval::EMPTY;
    }
    if !a.overlaps(&b) {
        return coin(a, b, rng);
    }
    Interval::new(a.start.max(b.start), a.end.min(b.end))
}

/// The union of two intervals.
///
/// If the intervals overlap or are adjacent the smallest interval containing both is returned.
/// Otherwise, one of the two intervals is returned at random.
pub fn union_<R: Rng>(a: Interval, b: Interval, rng: &mut R) -> Interval {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Interval::EMPTY,
        (true, false) => return b,
        (false, true) => return a,
        (false, false) => {}
    }

    if a.overlaps(&b) || a.adjacent(&b) {
        Interval::new(a.start.min(b.start), a.end.max(b.end))
    } else {
        coin(a, b, rng)
    }
}

/// The complement of an interval, relative to [Interval::FULL].
///
/// The full interval is returned unchanged, and the complement of the empty interval is the full interval.
/// Otherwise, the complement is made of one or two pieces (below and/or above the interval), and one piece is returned uniformly at random.
pub fn complement<R: Rng>(a: Interval, rng: &mut R) -> Interval {
    if a.is_full() {
        return a;
    }
    if a.is_empty() {
        return Interval::FULL;
    }

    let below = match a.start > i64::MIN {
        true => Some(Interval::new(i64::MIN, a.start - 1)),
        false => None,
    };
    let above = match a.end < i64::MAX {
        true => Some(Interval::new(a.end + 1, i64::MAX)),
        false => None,
    };

    match (below, above) {
        (Some(below), Some(above)) => match rng.random_range(0..2) {
            0 => below,
            _ => above,
        },
        (Some(piece), None) | (None, Some(piece)) => piece,
        (None, None) => a,
    }
}
