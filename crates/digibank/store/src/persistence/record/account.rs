use chrono::{DateTime, Local};
use digibank_domain::{
    Account, AccountKind, AccountNumber, AccountStatus, AccountType, CheckingTerms, SavingsTerms,
    account::{AccountDissolved, CheckingTermsDissolved, SavingsTermsDissolved},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::persistence::collection::Record;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    account_id: u64,
    client_id: u64,
    #[serde_as(as = "DisplayFromStr")]
    account_number: AccountNumber,
    #[serde_as(as = "DisplayFromStr")]
    account_type: AccountType,
    balance: Decimal,
    opened_at: DateTime<Local>,
    #[serde_as(as = "DisplayFromStr")]
    status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    withdrawal_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    withdrawals_used: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overdraft_limit: Option<Decimal>,
}

impl AccountRecord {
    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }
}

impl Record for AccountRecord {
    const ID_FIELD: &'static str = "account_id";

    fn id(&self) -> u64 {
        self.account_id
    }
}

impl From<Account> for AccountRecord {
    fn from(account: Account) -> Self {
        let AccountDissolved { id, client_id, number, balance, opened_at, status, kind } =
            account.dissolve();

        let mut record = Self {
            account_id: id.get(),
            client_id: client_id.get(),
            account_number: number,
            account_type: kind.account_type(),
            balance,
            opened_at,
            status,
            interest_rate: None,
            withdrawal_limit: None,
            withdrawals_used: None,
            overdraft_limit: None,
        };

        match kind {
            AccountKind::Savings(terms) => {
                let SavingsTermsDissolved { interest_rate, withdrawal_limit, withdrawals_used } =
                    terms.dissolve();
                record.interest_rate = Some(interest_rate);
                record.withdrawal_limit = Some(withdrawal_limit);
                record.withdrawals_used = Some(withdrawals_used);
            },
            AccountKind::Checking(terms) => {
                let CheckingTermsDissolved { overdraft_limit } = terms.dissolve();
                record.overdraft_limit = Some(overdraft_limit);
            },
        }

        record
    }
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        let kind = match record.account_type {
            AccountType::Savings => AccountKind::Savings(
                SavingsTerms::builder()
                    .maybe_interest_rate(record.interest_rate)
                    .maybe_withdrawal_limit(record.withdrawal_limit)
                    .maybe_withdrawals_used(record.withdrawals_used)
                    .build(),
            ),
            AccountType::Checking => AccountKind::Checking(
                CheckingTerms::builder().maybe_overdraft_limit(record.overdraft_limit).build(),
            ),
        };

        Account::builder()
            .id(record.account_id.into())
            .client_id(record.client_id.into())
            .number(record.account_number)
            .balance(record.balance)
            .opened_at(record.opened_at)
            .status(record.status)
            .kind(kind)
            .build()
    }
}
