/// Top-level error for request validation.
///
/// This enum wraps all possible request validation errors.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Error validating a client registration request.
    #[error(transparent)]
    RegisterClient(#[from] RegisterClientRequestError),

    /// Error validating a login request.
    #[error(transparent)]
    Login(#[from] LoginRequestError),

    /// Error validating an account opening request.
    #[error(transparent)]
    OpenAccount(#[from] OpenAccountRequestError),

    /// Error validating a deposit, withdrawal or transfer request.
    #[error(transparent)]
    Transaction(#[from] TransactionRequestError),

    /// Error validating a bill payment request.
    #[error(transparent)]
    Payment(#[from] PaymentRequestError),
}

/// Errors that can occur when validating a client registration request.
#[derive(Debug, thiserror::Error)]
pub enum RegisterClientRequestError {
    /// A required field is empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address has no `@`
    #[error("invalid email address")]
    InvalidEmail,
}

/// Errors that can occur when validating a login request.
#[derive(Debug, thiserror::Error)]
pub enum LoginRequestError {
    #[error("email and password are required")]
    MissingCredentials,
}

/// Errors that can occur when validating an account opening request.
#[derive(Debug, thiserror::Error)]
pub enum OpenAccountRequestError {
    #[error("opening balance cannot be negative")]
    NegativeOpeningBalance,

    #[error("interest rate cannot be negative")]
    NegativeInterestRate,

    #[error("overdraft limit cannot be negative")]
    NegativeOverdraftLimit,
}

/// Errors that can occur when validating a deposit, withdrawal or transfer request.
#[derive(Debug, thiserror::Error)]
pub enum TransactionRequestError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Interest is credited by its own operation, not by a transaction request
    #[error("unsupported transaction type: {0}")]
    UnsupportedKind(digibank_domain::TransactionKind),

    #[error("destination account is required for transfers")]
    MissingDestination,

    #[error("destination account is only allowed for transfers")]
    UnexpectedDestination,

    #[error("cannot transfer to the same account")]
    SameAccount,
}

/// Errors that can occur when validating a bill payment request.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRequestError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// A required field is empty
    #[error("{0} is required")]
    MissingField(&'static str),
}
