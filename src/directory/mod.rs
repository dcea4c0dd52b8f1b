#[allow(clippy::module_inception)]
pub mod directory;
pub mod error;

#[cfg(test)]
mod tests;

pub use directory::CandidateDirectory;
#[cfg(test)]
pub use directory::DEFAULT_PRESIGN_EXPIRY;
pub use error::DirectoryError;
