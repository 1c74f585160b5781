use thiserror::Error;


/// Errors returned by configuration and query operations. No failing operation leaves the `Acl`
/// partially modified.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An empty identifier was given; the payload names what kind of identifier ("role" or
    /// "resource").
    #[error("{0} name must be a non-empty string")]
    InvalidName(&'static str),
    #[error("Duplicate role: {0}")]
    DuplicateRole(String),
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    /// A declarative configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
} // enum Error

impl From<serde_json::Error> for Error {

    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    } // from

} // impl From<serde_json::Error> for Error

/// Result type of all fallible `Acl` operations.
pub type Result<T> = std::result::Result<T, Error>;
