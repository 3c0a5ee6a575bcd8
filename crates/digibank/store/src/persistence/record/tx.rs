use chrono::{DateTime, Local};
use digibank_domain::{
    AccountNumber, Transaction, TransactionKind, TransactionStatus, tx::TransactionDissolved,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::persistence::collection::Record;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    transaction_id: u64,
    #[serde_as(as = "DisplayFromStr")]
    origin_account_number: AccountNumber,
    #[serde_as(as = "Option<DisplayFromStr>")]
    destination_account_number: Option<AccountNumber>,
    #[serde_as(as = "DisplayFromStr")]
    transaction_type: TransactionKind,
    amount: Decimal,
    timestamp: DateTime<Local>,
    #[serde(default)]
    description: String,
    #[serde_as(as = "DisplayFromStr")]
    status: TransactionStatus,
}

impl Record for TransactionRecord {
    const ID_FIELD: &'static str = "transaction_id";

    fn id(&self) -> u64 {
        self.transaction_id
    }
}

impl From<Transaction> for TransactionRecord {
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

        Self {
            transaction_id: id.get(),
            origin_account_number: origin,
            destination_account_number: destination,
            transaction_type: kind,
            amount,
            timestamp,
            description,
            status,
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Transaction::builder()
            .id(record.transaction_id.into())
            .origin(record.origin_account_number)
            .maybe_destination(record.destination_account_number)
            .kind(record.transaction_type)
            .amount(record.amount)
            .timestamp(record.timestamp)
            .description(record.description)
            .status(record.status)
            .build()
    }
}
