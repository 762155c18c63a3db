/*!
Sampling of diverse models.

A sampling [session](Session) repeatedly asks solvers for models of a formula, and writes each new model as a sample.
How solvers are asked is determined by the [mode](crate::config::Mode) of the session, and is detailed in [strategy].

Sampling stops once the [budget](Budget) of the session is exhausted, or once the mode has nothing more to give.
The budget is exhausted when either:
- The time elapsed since the session began exceeds the time limit.
- The count of written samples has reached the sample limit.

The budget is consulted after every attempt to obtain a model, whether or not the attempt succeeds.
As solver calls are not interrupted, a session may overrun the time limit by the duration of one call.

Samples are written through the [store], after being made [canonical].
*/

pub mod canonical;
pub mod session;
pub mod store;
pub mod strategy;

pub use session::Session;

use std::time::{Duration, Instant};

/// The limits of a session.
#[derive(Clone, Debug)]
pub struct Budget {
    start: Instant,
    time_limit: Duration,
    max_samples: usize,
}

impl Budget {
    /// A budget whose time starts now.
    pub fn start(time_limit: Duration, max_samples: usize) -> Self {
        Budget {
            start: Instant::now(),
            time_limit,
            max_samples,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the budget is exhausted, given the count of written samples.
    pub fn exhausted(&self, samples: usize) -> bool {
        samples >= self.max_samples || self.elapsed() > self.time_limit
    }
}

/// A summary of a completed session.
#[derive(Clone, Copy, Debug)]
pub struct Summary {
    /// The time from the start of the session to the end of sampling.
    pub elapsed: Duration,

    /// The count of written samples.
    pub samples: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sampling time: {:.3}", self.elapsed.as_secs_f64())?;
        write!(f, "Total samples number: {}", self.samples)
    }
}
