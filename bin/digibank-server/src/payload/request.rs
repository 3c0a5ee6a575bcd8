use dissolve_derive::Dissolve;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Missing text fields deserialize as empty and are reported by request validation.
#[derive(Default, Dissolve, Deserialize)]
#[serde(default)]
pub struct RegisterRequestPayload {
    first_name: String,
    last_name: String,
    national_id: String,
    email: String,
    password: String,
    address: Option<String>,
    phone: Option<String>,
}

#[derive(Default, Dissolve, Deserialize)]
#[serde(default)]
pub struct LoginRequestPayload {
    email: String,
    password: String,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct OpenAccountRequestPayload {
    /// Defaults to savings when absent
    account_type: Option<String>,
    opening_balance: Option<Decimal>,
    interest_rate: Option<Decimal>,
    withdrawal_limit: Option<u32>,
    overdraft_limit: Option<Decimal>,
}

/// Body of the deposit, withdrawal and transfer routes.
#[derive(Debug, Dissolve, Deserialize)]
pub struct TransactionRequestPayload {
    account_number: String,
    destination_account_number: Option<String>,
    amount: Decimal,
    description: Option<String>,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct AccountNumberRequestPayload {
    account_number: String,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct PaymentRequestPayload {
    account_number: String,
    amount: Decimal,
    service_type: String,
    reference: String,
    notes: Option<String>,
}

#[derive(Debug, Dissolve, Deserialize)]
pub struct ListTransactionsQuery {
    limit: Option<usize>,
}
