//! Error types.
//!
//! Construction infeasibility is not an error: an ant that cannot serve every
//! stop produces an infeasible [`Solution`](crate::models::Solution). The
//! types here cover the fatal cases that stop a run before or during
//! optimization.

use thiserror::Error;

/// An invalid run parameter, detected before any iteration executes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric parameter is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidParameter {
        /// Name of the offending configuration field.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },

    /// The strategy name is neither `eas` nor `mmas`.
    #[error("unknown strategy `{0}` (expected `eas` or `mmas`)")]
    UnknownStrategy(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// The configuration field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidParameter { field, .. } => field,
            ConfigError::UnknownStrategy(_) => "strategy",
        }
    }
}

/// Failure of the external cost-matrix provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or refused to answer.
    #[error("cost provider unreachable: {0}")]
    Unreachable(String),

    /// A returned value is negative, non-finite or otherwise unusable.
    #[error("malformed cost entry ({from} -> {to}): {reason}")]
    Malformed {
        /// Origin stop index.
        from: usize,
        /// Destination stop index.
        to: usize,
        /// What is wrong with the entry.
        reason: String,
    },

    /// The returned matrix does not match the number of stops.
    #[error("cost matrix has {actual} entries, expected {expected}")]
    SizeMismatch {
        /// Expected number of entries (n * n).
        expected: usize,
        /// Number of entries received.
        actual: usize,
    },

    /// The travel speed used to derive durations is not a positive number.
    #[error("travel speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),
}

/// An inconsistent problem instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
    /// Only the depot was given.
    #[error("problem has no stops besides the depot")]
    NoStops,

    /// Stop ids must equal their position (0 = depot).
    #[error("stop at position {position} has id {id}")]
    StopIdMismatch {
        /// Position in the stop list.
        position: usize,
        /// Id found at that position.
        id: usize,
    },

    /// The depot carries a demand.
    #[error("depot demand must be zero, got {0}")]
    DepotDemand(u32),

    /// Cost matrix dimension differs from the stop count.
    #[error("cost matrix covers {matrix} stops but the problem has {stops}")]
    MatrixSize {
        /// Stops covered by the matrix.
        matrix: usize,
        /// Stops in the problem.
        stops: usize,
    },

    /// A stop's service duration is negative or non-finite.
    #[error("stop {stop} has an invalid service duration {value}")]
    ServiceDuration {
        /// Position of the stop.
        stop: usize,
        /// Offending value.
        value: f64,
    },
}

/// Failure while reading a scenario description.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The JSON document could not be parsed.
    #[error("invalid scenario document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A time window is inverted or non-finite.
    #[error("node {node} has an invalid time window [{ready}, {due}]")]
    TimeWindow {
        /// External node id.
        node: u64,
        /// Earliest arrival.
        ready: f64,
        /// Latest arrival.
        due: f64,
    },

    /// A service time is negative or non-finite.
    #[error("node {node} has an invalid service time {value}")]
    ServiceTime {
        /// External node id.
        node: u64,
        /// Offending value.
        value: f64,
    },

    /// Two nodes share an external id.
    #[error("duplicate node id {0}")]
    DuplicateNode(u64),

    /// The scenario lists no stops besides the depot.
    #[error("scenario has no stops besides the depot")]
    Empty,
}

/// Any error that aborts a colony run.
#[derive(Debug, Error)]
pub enum ColonyError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The cost provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The problem instance is inconsistent.
    #[error(transparent)]
    Problem(#[from] ProblemError),

    /// The scenario document could not be turned into stops.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// A pheromone or cost value became non-finite or non-positive.
    #[error("numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}
