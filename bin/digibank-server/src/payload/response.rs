use bon::Builder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::payload::{AccountPayload, ClientPayload, TransactionPayload};

#[derive(Debug, Builder, Serialize)]
pub struct AuthResponsePayload {
    message: &'static str,
    token: String,
    user: ClientPayload,
}

#[derive(Debug, Builder, Serialize)]
pub struct ClientResponsePayload {
    message: &'static str,
    user: ClientPayload,
}

#[derive(Debug, Builder, Serialize)]
pub struct AccountResponsePayload {
    message: &'static str,
    account: AccountPayload,
}

#[derive(Debug, Builder, Serialize)]
pub struct ListAccountsResponsePayload {
    message: &'static str,
    accounts: Vec<AccountPayload>,
    total: usize,
}

#[derive(Debug, Builder, Serialize)]
pub struct AccountStatsResponsePayload {
    message: &'static str,

    #[serde(with = "rust_decimal::serde::float")]
    total_balance: Decimal,

    total_accounts: usize,
    savings_accounts: usize,
    checking_accounts: usize,
    active_accounts: usize,
}

#[derive(Debug, Builder, Serialize)]
pub struct TransactionResponsePayload {
    message: &'static str,
    transaction: TransactionPayload,
    account: AccountPayload,

    #[serde(skip_serializing_if = "Option::is_none")]
    destination_account: Option<AccountPayload>,
}

#[derive(Debug, Builder, Serialize)]
pub struct ListTransactionsResponsePayload {
    message: &'static str,
    transactions: Vec<TransactionPayload>,
    total: usize,
}

#[derive(Debug, Builder, Serialize)]
pub struct InterestResponsePayload {
    message: &'static str,

    #[serde(with = "rust_decimal::serde::float")]
    interest: Decimal,

    account: AccountPayload,
    transaction: TransactionPayload,
}

#[derive(Debug, Builder, Serialize)]
pub struct OverdraftStatusResponsePayload {
    message: &'static str,
    account_number: String,
    is_overdrawn: bool,

    #[serde(with = "rust_decimal::serde::float")]
    overdraft_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    overdraft_limit: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    available_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PaymentCategory {
    id: &'static str,
    name: &'static str,
    services: &'static [PaymentService],
}

#[derive(Debug, Serialize)]
pub struct PaymentService {
    id: &'static str,
    name: &'static str,
}

#[derive(Debug, Builder, Serialize)]
pub struct PaymentCategoriesResponsePayload {
    message: &'static str,
    categories: &'static [PaymentCategory],
}

#[derive(Debug, Builder, Serialize)]
pub struct DashboardStatsResponsePayload {
    message: &'static str,

    #[serde(with = "rust_decimal::serde::float")]
    total_balance: Decimal,

    total_accounts: usize,
    savings_accounts: usize,
    checking_accounts: usize,
    active_accounts: usize,

    #[serde(with = "rust_decimal::serde::float")]
    monthly_income: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    monthly_expenses: Decimal,

    recent_transactions: Vec<TransactionPayload>,
}

#[derive(Debug, Builder, Serialize)]
pub struct DashboardSummaryResponsePayload {
    message: &'static str,
    client: ClientPayload,

    #[serde(with = "rust_decimal::serde::float")]
    total_balance: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    savings_balance: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    checking_balance: Decimal,

    total_accounts: usize,
    total_transactions: usize,
    monthly_transactions: usize,
}

/// Services that can be paid through the bill payment route.
pub const PAYMENT_CATEGORIES: &[PaymentCategory] = &[
    PaymentCategory {
        id: "utility",
        name: "Utilities",
        services: &[
            PaymentService { id: "electricity", name: "Electricity" },
            PaymentService { id: "water", name: "Water" },
            PaymentService { id: "gas", name: "Gas" },
        ],
    },
    PaymentCategory {
        id: "telecom",
        name: "Telecommunications",
        services: &[
            PaymentService { id: "mobile", name: "Mobile phone" },
            PaymentService { id: "internet", name: "Internet" },
            PaymentService { id: "cable", name: "Cable TV" },
        ],
    },
    PaymentCategory {
        id: "education",
        name: "Education",
        services: &[
            PaymentService { id: "school", name: "School tuition" },
            PaymentService { id: "university", name: "University" },
            PaymentService { id: "courses", name: "Courses" },
        ],
    },
    PaymentCategory {
        id: "insurance",
        name: "Insurance",
        services: &[
            PaymentService { id: "health", name: "Health insurance" },
            PaymentService { id: "car", name: "Car insurance" },
            PaymentService { id: "life", name: "Life insurance" },
        ],
    },
];
