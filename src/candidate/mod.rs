pub mod error;
pub mod models;

pub use error::CandidateError;
pub use models::{Candidate, Mapping};
#[cfg(test)]
pub use models::{DEFAULT_IMAGE, DEFAULT_MAJOR};
