use std::str::FromStr;

/// The sampling strategies, exactly one of which is run by a [session](crate::sampler::Session).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum Mode {
    /// Repeated checks of the complete solver on the original formula.
    Cdcl = 0,

    /// Repeated, reseeded, attempts of the stochastic solver on the simplified formula.
    Ls,

    /// Bursts of the complete solver, pinned by the last model of the stochastic solver, interleaved with single stochastic attempts.
    Hybrid,

    /// As with [Hybrid](Mode::Hybrid), though with a second stochastic solver in place of the complete solver.
    LsIterative,
}

impl Mode {
    /// The minimum Mode.
    pub const MIN: Mode = Mode::Cdcl;

    /// The maximum Mode.
    pub const MAX: Mode = Mode::LsIterative;
}

impl Default for Mode {
    fn default() -> Self {
        Mode::LsIterative
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cdcl => write!(f, "cdcl"),
            Self::Ls => write!(f, "ls"),
            Self::Hybrid => write!(f, "hybrid"),
            Self::LsIterative => write!(f, "ls-iterative"),
        }
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cdcl" => Ok(Self::Cdcl),

            "ls" => Ok(Self::Ls),

            "hybrid" => Ok(Self::Hybrid),

            "ls-iterative" | "ls_iterative" => Ok(Self::LsIterative),

            _unknown_string => Err(()),
        }
    }
}
