use thiserror::Error;

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Which of the two per-trial sequences an error or count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Cued,
    NonCued,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Cued => write!(f, "cued"),
            Role::NonCued => write!(f, "non_cued"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{role} sequence holds {placed} of {requested} requested targets")]
    TargetUnderflow {
        role: Role,
        requested: usize,
        placed: usize,
    },

    #[error("no equal-sum target counts after {attempts} attempts (range {min_targets}..{max_targets}, {size} values per list)")]
    AllocationStarvation {
        attempts: usize,
        min_targets: u32,
        max_targets: u32,
        size: usize,
    },

    #[error("malformed marker stream: {0}")]
    MalformedMarkers(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SequenceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SequenceError::InvalidConfiguration(message.into())
    }
}
