use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Input fields of the car form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Brand,
    Model,
    Name,
    Year,
    Power,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Name => "name",
            Field::Year => "year",
            Field::Power => "power",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rejected user input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{} required", join_fields(.0))]
    MissingFields(Vec<Field>),
    #[error("power must be a positive number of kW, got '{0}'")]
    InvalidPower(String),
    #[error("year must be a whole number in the allowed range, got '{0}'")]
    InvalidYear(String),
    #[error("no answer selected")]
    NoSelection,
    #[error("answer {chosen} is out of range, question has {available} options")]
    OptionOutOfRange { chosen: usize, available: usize },
}

impl ValidationError {
    pub fn is_missing_field(&self) -> bool {
        matches!(self, ValidationError::MissingFields(_))
    }
}

/// Transition requested in a state that does not allow it. State is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    #[error("quiz has not been started")]
    NotStarted,
    #[error("current question has already been answered")]
    AlreadyAnswered,
    #[error("quiz is already finished")]
    AlreadyFinished,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("loading {path} timed out after {after:?}")]
    TimedOut { path: PathBuf, after: Duration },
    #[error("load worker is not running")]
    WorkerUnavailable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
