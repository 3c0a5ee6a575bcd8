use std::borrow::Cow;

pub type Result<T, E = DigibankStoreError> = core::result::Result<T, E>;

/// Errors that can occur when interacting with the store
#[derive(Debug, thiserror::Error)]
pub enum DigibankStoreError {
    /// Reading, writing or renaming a collection file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized into its collection file.
    #[error("serialization error: {0}")]
    Serialization(Cow<'static, str>),

    /// A client with the same email address is already registered.
    #[error("email already registered")]
    DuplicateEmail,

    /// A client with the same national id is already registered.
    #[error("national id already registered")]
    DuplicateNationalId,
}

impl From<serde_json::Error> for DigibankStoreError {
    fn from(err: serde_json::Error) -> Self {
        DigibankStoreError::Serialization(err.to_string().into())
    }
}
