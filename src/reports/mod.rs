/*!
Reports from solvers.
*/

/// High-level reports regarding a check.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula of the solver is satisfiable, and a model is available.
    Satisfiable,

    /// The formula of the solver is unsatisfiable, under the assumptions of the check.
    Unsatisfiable,

    /// Satisfiability of the formula of the solver is unknown, for some reason.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
