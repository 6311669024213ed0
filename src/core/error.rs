use thiserror::Error;

/// Errors raised while validating or evaluating a savings estimate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalculationError {
    #[error("unknown industry '{0}'")]
    UnknownIndustry(String),

    #[error("unknown workload '{0}'")]
    UnknownWorkload(String),

    #[error("{field} {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    /// Arithmetic overflowed to infinity or NaN. Only reachable with absurd
    /// magnitudes that slipped past validation.
    #[error("computed {field} is not finite")]
    NonFinite { field: &'static str },
}

impl CalculationError {
    /// Whether the error is the caller's fault rather than an evaluation failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CalculationError::NonFinite { .. })
    }

    /// Whether the error came from an unrecognized industry or workload key.
    pub fn is_unknown_key(&self) -> bool {
        matches!(
            self,
            CalculationError::UnknownIndustry(_) | CalculationError::UnknownWorkload(_)
        )
    }
}
