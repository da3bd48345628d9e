//! Error type shared by every engine operation.

/// Errors produced while validating, drawing, or aggregating samples.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    /// Parameters violate the constraints of their distribution kind, or an
    /// aggregation request is malformed (e.g. zero bins).
    #[error("invalid specification: {0}")]
    InvalidSpecification(String),

    /// A generated sample does not belong to the domain its specification
    /// declares. Indicates a logic bug rather than bad input.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl SamplingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        trace_debug!(reason = %msg, "specification rejected");
        SamplingError::InvalidSpecification(msg)
    }

    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        SamplingError::InternalInconsistency(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, SamplingError>;
