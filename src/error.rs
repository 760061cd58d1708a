//! Crate error types.

/// A fill that failed validation, tagged with its position in the input slice.
///
/// Rejections are returned to the caller alongside the reconciliation result
/// rather than raised as errors: one bad record must not abort the run, but
/// dropping it silently would corrupt position accounting invisibly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("fill {index} rejected: {reason}")]
pub struct FillRejection {
    pub index: usize,
    pub reason: String,
}

/// Top-level error type for dcalab.
#[derive(Debug, thiserror::Error)]
pub enum DcalabError {
    #[error("invalid config value {field}: {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("candle series out of order at index {index}")]
    UnorderedCandles { index: usize },
}

impl DcalabError {
    pub(crate) fn config(field: &str, reason: &str) -> Self {
        DcalabError::ConfigInvalid {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
