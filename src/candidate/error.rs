use thiserror::Error;

/// Errors raised while rebuilding a candidate from a stored mapping
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("Stored candidate is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Stored candidate field '{field}' is not {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}
