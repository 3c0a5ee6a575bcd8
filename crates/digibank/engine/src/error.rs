use std::borrow::Cow;

use digibank_domain::AccountError;
use digibank_store::DigibankStoreError;
use tokio::task::JoinError;

use crate::types::request::RequestError;

pub type Result<T, E = DigibankEngineError> = core::result::Result<T, E>;

/// Errors returned by [`DigibankEngine`](crate::DigibankEngine) operations.
///
/// Every variant except [`Store`](Self::Store), [`Credential`](Self::Credential) and
/// [`Join`](Self::Join) describes a rejected request rather than a failure of the service.
#[derive(Debug, thiserror::Error)]
pub enum DigibankEngineError {
    /// The account balance policy rejected the operation.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The request failed validation.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The request is well formed but not acceptable in the current state.
    #[error("{0}")]
    InvalidInput(Cow<'static, str>),

    #[error("account not found")]
    AccountNotFound,

    #[error("client not found")]
    ClientNotFound,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("national id already registered")]
    DuplicateNationalId,

    /// The account exists but belongs to another client.
    #[error("account does not belong to this client")]
    Unauthorized,

    /// Unknown email or wrong password. The two cases are not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A transfer failed on the destination side and the origin could not be restored.
    #[error("transfer compensation failed: {0}")]
    CompensationFailed(Cow<'static, str>),

    #[error("store error: {0}")]
    Store(#[source] DigibankStoreError),

    #[error("credential error: {0}")]
    Credential(Cow<'static, str>),

    #[error("join error: {0}")]
    Join(#[from] JoinError),
}

impl DigibankEngineError {
    pub(crate) fn invalid_input<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::InvalidInput(err.into())
    }

    pub(crate) fn credential<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::Credential(err.into())
    }
}

impl From<DigibankStoreError> for DigibankEngineError {
    fn from(err: DigibankStoreError) -> Self {
        match err {
            DigibankStoreError::DuplicateEmail => Self::DuplicateEmail,
            DigibankStoreError::DuplicateNationalId => Self::DuplicateNationalId,
            err => Self::Store(err),
        }
    }
}
