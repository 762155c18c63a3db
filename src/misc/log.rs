/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for tuning a session and/or fixing issues.

Note, no log implementation is provided by the library.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to a [sampling session](crate::sampler::session), including the diagnostic stream of failed solver calls.
    pub const SAMPLER: &str = "sampler";

    /// Logs related to the [sample store](crate::sampler::store).
    pub const STORE: &str = "store";

    /// Logs related to [canonicalisation](crate::sampler::canonical) of models.
    pub const CANONICAL: &str = "canonical";

    /// Logs related to the [complete solver](crate::solvers::complete).
    pub const COMPLETE: &str = "complete";

    /// Logs related to the [stochastic solver](crate::solvers::local_search).
    pub const LOCAL_SEARCH: &str = "local_search";

    /// Logs related to [preprocessing](crate::builder::preprocess).
    pub const PREPROCESSING: &str = "preprocessing";

    /// Logs related to [parsing](crate::builder::smtlib).
    pub const PARSER: &str = "parser";
}
