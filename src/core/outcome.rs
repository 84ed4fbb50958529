//! Outcome and failure model shared by every step and the executor

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a failure should be reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Malformed input or unreachable resource
    BadRequest,
    /// Well-formed input that was semantically rejected
    Unprocessable,
}

impl Classification {
    /// HTTP-style status code for this classification
    pub fn status_code(self) -> u16 {
        match self {
            Classification::BadRequest => 400,
            Classification::Unprocessable => 422,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::BadRequest => "bad_request",
            Classification::Unprocessable => "unprocessable",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A modeled business failure produced by a step
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct FailureDescriptor {
    classification: Classification,
    message: String,
}

impl FailureDescriptor {
    pub fn new(classification: Classification, message: impl Into<String>) -> Self {
        Self {
            classification,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Classification::BadRequest, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(Classification::Unprocessable, message)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.classification.status_code()
    }
}

/// Result of a pipeline run: the final value or the first failure
pub type Outcome<T> = Result<T, FailureDescriptor>;

/// Error returned by a single step
///
/// `Failure` halts the pipeline with a business result. `Fault` is an
/// unexpected condition (storage I/O, broken context invariant) and
/// propagates out of the executor as a system error.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Failure(#[from] FailureDescriptor),

    #[error("unexpected fault: {0:#}")]
    Fault(#[from] anyhow::Error),
}

impl StepError {
    pub fn fault(message: impl std::fmt::Display) -> Self {
        StepError::Fault(anyhow::anyhow!("{}", message))
    }
}

/// Result type every step returns
pub type StepResult<T> = Result<T, StepError>;
