//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum PrefCompError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// Lengths of the fields of a trajectory are inconsistent.
    #[error("Invalid trajectory: {0}")]
    InvalidTrajectory(String),

    /// No trajectory is at least as long as the fragment length.
    #[error("No trajectories are long enough for the desired fragment length of {fragment_length}")]
    NoTrajectoriesLongEnough {
        /// Requested fragment length.
        fragment_length: usize,
    },

    /// The number of preferences differs from the number of fragment pairs.
    #[error("Unexpected number of preferences {got}, expected {expected}")]
    PreferenceShape {
        /// Number of fragment pairs.
        expected: usize,
        /// Number of preferences.
        got: usize,
    },

    /// A preference is not a probability.
    #[error("Preference at index {index} is {value}, expected a probability in [0, 1]")]
    InvalidPreference {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f32,
    },

    /// Terminal trajectories of different lengths were sampled.
    #[error(
        "Episodes of different length detected: {horizons:?}. \
         Variable horizon environments are discouraged; \
         set allow_variable_horizon to override this check"
    )]
    VariableHorizon {
        /// Distinct horizons, including the one seen in earlier iterations.
        horizons: Vec<usize>,
    },

    /// A static trajectory corpus cannot provide the requested steps.
    #[error("Asked for {requested} timesteps but only {available} available")]
    InsufficientSteps {
        /// Requested number of transitions.
        requested: usize,
        /// Transitions in the corpus.
        available: usize,
    },
}
