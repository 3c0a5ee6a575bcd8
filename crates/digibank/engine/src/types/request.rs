//! Request types for digital bank engine operations.
//!
//! Every request validates its input when it is built, so the engine only ever sees
//! well-formed requests. Validation happens before any account is loaded.

mod error;

pub use self::error::{
    LoginRequestError, OpenAccountRequestError, PaymentRequestError, RegisterClientRequestError,
    RequestError, TransactionRequestError,
};

use digibank_domain::{
    AccountKind, AccountNumber, AccountType, CheckingTerms, Client, SavingsTerms, TransactionKind,
};
use dissolve_derive::Dissolve;
use rust_decimal::Decimal;

/// Request to register a new client.
///
/// # Validation
///
/// The request validates that:
/// - first name, last name, national id, email and password are non-empty after trimming
/// - the email address contains an `@`
///
/// The email address is normalized to lowercase.
#[derive(Dissolve)]
pub struct RegisterClientRequest {
    first_name: String,
    last_name: String,
    national_id: String,
    email: String,
    password: String,
    address: String,
    phone: String,
}

/// Request to authenticate a client.
#[derive(Dissolve)]
pub struct LoginRequest {
    /// Normalized email address
    email: String,

    password: String,
}

/// Request to open a new account for the acting client.
///
/// # Validation
///
/// The request validates that the opening balance, the interest rate and the overdraft
/// limit are not negative. Terms that do not apply to the requested account type are
/// ignored; missing terms take their defaults.
#[derive(Debug, Dissolve)]
pub struct OpenAccountRequest {
    opening_balance: Decimal,
    kind: AccountKind,
}

/// Request to deposit, withdraw or transfer money.
///
/// # Validation
///
/// The request validates that:
/// - the amount is greater than zero
/// - the kind is deposit, withdrawal or transfer
/// - a transfer names a destination distinct from its origin, and nothing else does
#[derive(Debug, Dissolve)]
pub struct TransactionRequest {
    kind: TransactionKind,
    origin: AccountNumber,
    destination: Option<AccountNumber>,
    amount: Decimal,
    description: String,
}

/// Request to pay a bill from one of the acting client's accounts.
#[derive(Debug, Dissolve)]
pub struct PaymentRequest {
    account_number: AccountNumber,
    amount: Decimal,
    service_type: String,
    reference: String,
    notes: Option<String>,
}

#[bon::bon]
impl RegisterClientRequest {
    /// Creates a new registration request with validation.
    #[builder]
    pub fn new(
        #[builder(into)] first_name: String,
        #[builder(into)] last_name: String,
        #[builder(into)] national_id: String,
        #[builder(into)] email: String,
        #[builder(into)] password: String,
        #[builder(into)] address: Option<String>,
        #[builder(into)] phone: Option<String>,
    ) -> Result<Self, RegisterClientRequestError> {
        let required = |name: &'static str, value: String| {
            let value = value.trim().to_owned();
            if value.is_empty() {
                return Err(RegisterClientRequestError::MissingField(name));
            }
            Ok(value)
        };

        let first_name = required("first_name", first_name)?;
        let last_name = required("last_name", last_name)?;
        let national_id = required("national_id", national_id)?;
        let email = required("email", email)?;

        if password.is_empty() {
            return Err(RegisterClientRequestError::MissingField("password"));
        }

        if !email.contains('@') {
            return Err(RegisterClientRequestError::InvalidEmail);
        }

        Ok(Self {
            first_name,
            last_name,
            national_id,
            email: Client::normalize_email(&email),
            password,
            address: address.map(|a| a.trim().to_owned()).unwrap_or_default(),
            phone: phone.map(|p| p.trim().to_owned()).unwrap_or_default(),
        })
    }
}

#[bon::bon]
impl LoginRequest {
    /// Creates a new login request, rejecting an empty email or password.
    #[builder]
    pub fn new(
        #[builder(into)] email: String,
        #[builder(into)] password: String,
    ) -> Result<Self, LoginRequestError> {
        let email = Client::normalize_email(&email);

        if email.is_empty() || password.is_empty() {
            return Err(LoginRequestError::MissingCredentials);
        }

        Ok(Self { email, password })
    }
}

#[bon::bon]
impl OpenAccountRequest {
    /// Creates a new account opening request with validation.
    #[builder]
    pub fn new(
        account_type: AccountType,
        opening_balance: Option<Decimal>,
        interest_rate: Option<Decimal>,
        withdrawal_limit: Option<u32>,
        overdraft_limit: Option<Decimal>,
    ) -> Result<Self, OpenAccountRequestError> {
        let opening_balance = opening_balance.unwrap_or_default();

        if opening_balance < Decimal::ZERO {
            return Err(OpenAccountRequestError::NegativeOpeningBalance);
        }

        let kind = match account_type {
            AccountType::Savings => {
                if interest_rate.is_some_and(|r| r < Decimal::ZERO) {
                    return Err(OpenAccountRequestError::NegativeInterestRate);
                }

                AccountKind::Savings(
                    SavingsTerms::builder()
                        .maybe_interest_rate(interest_rate)
                        .maybe_withdrawal_limit(withdrawal_limit)
                        .build(),
                )
            },
            AccountType::Checking => {
                if overdraft_limit.is_some_and(|l| l < Decimal::ZERO) {
                    return Err(OpenAccountRequestError::NegativeOverdraftLimit);
                }

                AccountKind::Checking(
                    CheckingTerms::builder().maybe_overdraft_limit(overdraft_limit).build(),
                )
            },
        };

        Ok(Self { opening_balance, kind })
    }
}

#[bon::bon]
impl TransactionRequest {
    /// Creates a new transaction request with validation.
    ///
    /// A missing or blank description is replaced with the default one of `kind`.
    #[builder]
    pub fn new(
        kind: TransactionKind,
        origin: AccountNumber,
        destination: Option<AccountNumber>,
        amount: Decimal,
        #[builder(into)] description: Option<String>,
    ) -> Result<Self, TransactionRequestError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionRequestError::InvalidAmount);
        }

        match (kind, &destination) {
            (TransactionKind::Interest, _) => {
                return Err(TransactionRequestError::UnsupportedKind(kind));
            },
            (TransactionKind::Transfer, None) => {
                return Err(TransactionRequestError::MissingDestination);
            },
            (TransactionKind::Transfer, Some(destination)) if *destination == origin => {
                return Err(TransactionRequestError::SameAccount);
            },
            (TransactionKind::Deposit | TransactionKind::Withdrawal, Some(_)) => {
                return Err(TransactionRequestError::UnexpectedDestination);
            },
            _ => {},
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| kind.default_description().to_owned());

        Ok(Self { kind, origin, destination, amount, description })
    }
}

impl TransactionRequest {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn origin(&self) -> &AccountNumber {
        &self.origin
    }
}

#[bon::bon]
impl PaymentRequest {
    /// Creates a new payment request with validation.
    #[builder]
    pub fn new(
        account_number: AccountNumber,
        amount: Decimal,
        #[builder(into)] service_type: String,
        #[builder(into)] reference: String,
        #[builder(into)] notes: Option<String>,
    ) -> Result<Self, PaymentRequestError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentRequestError::InvalidAmount);
        }

        let service_type = service_type.trim().to_owned();
        if service_type.is_empty() {
            return Err(PaymentRequestError::MissingField("service_type"));
        }

        let reference = reference.trim().to_owned();
        if reference.is_empty() {
            return Err(PaymentRequestError::MissingField("reference"));
        }

        let notes = notes.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty());

        Ok(Self { account_number, amount, service_type, reference, notes })
    }
}

impl PaymentRequest {
    /// Prefix of the description of every bill payment withdrawal.
    pub const DESCRIPTION_PREFIX: &'static str = "Payment of";

    /// Returns the description recorded on the payment withdrawal.
    pub fn description(&self) -> String {
        let mut description =
            format!("{} {} - Ref: {}", Self::DESCRIPTION_PREFIX, self.service_type, self.reference);

        if let Some(notes) = &self.notes {
            description.push_str(" - ");
            description.push_str(notes);
        }

        description
    }
}
