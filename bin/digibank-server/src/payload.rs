pub mod request;
pub mod response;

use bon::Builder;
use chrono::{DateTime, Local};
use digibank_domain::{
    Account, AccountKind, AccountNumber, AccountStatus, AccountType, Client, Transaction,
    TransactionKind, TransactionStatus, account::AccountDissolved, client::ClientDissolved,
    money::round_money, tx::TransactionDissolved,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_with::DisplayFromStr;

/// A client as shown to its owner. The password hash never leaves the server.
#[derive(Debug, Builder, Serialize)]
pub struct ClientPayload {
    id: u64,
    first_name: String,
    last_name: String,
    national_id: String,
    email: String,
    address: String,
    phone: String,
    registered_at: DateTime<Local>,
}

#[serde_with::serde_as]
#[derive(Debug, Builder, Serialize)]
pub struct AccountPayload {
    id: u64,
    client_id: u64,

    #[serde_as(as = "DisplayFromStr")]
    account_number: AccountNumber,

    #[serde_as(as = "DisplayFromStr")]
    account_type: AccountType,

    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    available_balance: Decimal,

    #[serde_as(as = "DisplayFromStr")]
    status: AccountStatus,

    opened_at: DateTime<Local>,

    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    interest_rate: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    withdrawal_limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    withdrawals_used: Option<u32>,

    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    overdraft_limit: Option<Decimal>,
}

#[serde_with::serde_as]
#[derive(Debug, Builder, Serialize)]
pub struct TransactionPayload {
    id: u64,

    #[serde_as(as = "DisplayFromStr")]
    origin_account_number: AccountNumber,

    #[serde_as(as = "Option<DisplayFromStr>")]
    destination_account_number: Option<AccountNumber>,

    #[serde_as(as = "DisplayFromStr")]
    transaction_type: TransactionKind,

    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,

    timestamp: DateTime<Local>,
    description: String,

    #[serde_as(as = "DisplayFromStr")]
    status: TransactionStatus,
}

impl From<Client> for ClientPayload {
    fn from(client: Client) -> Self {
        let ClientDissolved {
            id,
            first_name,
            last_name,
            national_id,
            address,
            phone,
            email,
            registered_at,
            ..
        } = client.dissolve();

        Self::builder()
            .id(id.get())
            .first_name(first_name)
            .last_name(last_name)
            .national_id(national_id)
            .email(email)
            .address(address)
            .phone(phone)
            .registered_at(registered_at)
            .build()
    }
}

impl From<Account> for AccountPayload {
    fn from(account: Account) -> Self {
        let available_balance = account.available_balance();
        let AccountDissolved { id, client_id, number, balance, opened_at, status, kind } =
            account.dissolve();

        let builder = Self::builder()
            .id(id.get())
            .client_id(client_id.get())
            .account_number(number)
            .account_type(kind.account_type())
            .balance(round_money(balance))
            .available_balance(round_money(available_balance))
            .status(status)
            .opened_at(opened_at);

        match kind {
            AccountKind::Savings(terms) => builder
                .interest_rate(terms.interest_rate())
                .withdrawal_limit(terms.withdrawal_limit())
                .withdrawals_used(terms.withdrawals_used())
                .build(),
            AccountKind::Checking(terms) => {
                builder.overdraft_limit(round_money(terms.overdraft_limit())).build()
            },
        }
    }
}

impl From<Transaction> for TransactionPayload {
    fn from(tx: Transaction) -> Self {
        let TransactionDissolved {
            id,
            origin,
            destination,
            kind,
            amount,
            timestamp,
            description,
            status,
        } = tx.dissolve();

        Self::builder()
            .id(id.get())
            .origin_account_number(origin)
            .maybe_destination_account_number(destination)
            .transaction_type(kind)
            .amount(round_money(amount))
            .timestamp(timestamp)
            .description(description)
            .status(status)
            .build()
    }
}
