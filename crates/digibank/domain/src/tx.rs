//! Transaction log entries.
//!
//! A [`Transaction`] is appended once per successful balance-changing operation and is
//! never modified afterwards. Entries reference accounts by their public number.

use core::fmt;

use bon::Builder;
use chrono::{DateTime, Local};
use dissolve_derive::Dissolve;
use rust_decimal::Decimal;
use strum::{Display, EnumString, IntoStaticStr};

use crate::account::AccountNumber;

/// Internal, monotonic identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(u64);

/// The operation a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    /// Money credited to the origin account.
    Deposit,
    /// Money debited from the origin account.
    Withdrawal,
    /// Money moved from the origin to the destination account.
    Transfer,
    /// Monthly interest credited to a savings account.
    Interest,
}

/// Status of a transaction. Only completed operations are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    /// The operation completed.
    Completed,
}

/// An immutable transaction log entry.
#[derive(Debug, Clone, Builder, Dissolve)]
pub struct Transaction {
    id: TransactionId,

    origin: AccountNumber,

    /// Present for transfers only.
    destination: Option<AccountNumber>,

    kind: TransactionKind,

    /// Always greater than zero.
    amount: Decimal,

    timestamp: DateTime<Local>,

    #[builder(into)]
    description: String,

    #[builder(default = TransactionStatus::Completed)]
    status: TransactionStatus,
}

impl TransactionId {
    /// Returns the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<TransactionId> for u64 {
    fn from(TransactionId(id): TransactionId) -> Self {
        id
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionKind {
    /// Description used when the caller does not provide one.
    pub fn default_description(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Interest => "Monthly interest applied",
        }
    }
}

impl Transaction {
    /// Returns the identifier.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the origin account number.
    pub fn origin(&self) -> &AccountNumber {
        &self.origin
    }

    /// Returns the destination account number of a transfer.
    pub fn destination(&self) -> Option<&AccountNumber> {
        self.destination.as_ref()
    }

    /// Returns the recorded operation.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Returns the amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns when the operation completed.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns the free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns whether `number` is the origin or the destination of this transaction.
    pub fn involves(&self, number: &AccountNumber) -> bool {
        &self.origin == number || self.destination.as_ref() == Some(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfers_involve_both_accounts() {
        let origin: AccountNumber = "1000000000000001".parse().unwrap();
        let destination: AccountNumber = "2000000000000002".parse().unwrap();
        let other: AccountNumber = "3000000000000003".parse().unwrap();

        let tx = Transaction::builder()
            .id(1u64.into())
            .origin(origin.clone())
            .destination(destination.clone())
            .kind(TransactionKind::Transfer)
            .amount(Decimal::from(500))
            .timestamp(Local::now())
            .description(TransactionKind::Transfer.default_description())
            .build();

        assert!(tx.involves(&origin));
        assert!(tx.involves(&destination));
        assert!(!tx.involves(&other));
        assert_eq!(tx.status(), TransactionStatus::Completed);
    }

    #[test]
    fn kinds_use_snake_case_names() {
        assert_eq!(TransactionKind::Withdrawal.to_string(), "withdrawal");
        assert_eq!("interest".parse::<TransactionKind>().unwrap(), TransactionKind::Interest);
    }
}
