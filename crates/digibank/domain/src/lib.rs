//! Domain types for the digital bank.
//!
//! This crate provides the core domain models of the bank: clients, the two account
//! variants with their deposit and withdrawal policies, and the immutable transaction log
//! entries produced by every balance-changing operation. It performs no I/O.

pub mod account;
pub mod client;
pub mod money;
pub mod tx;

pub use self::{
    account::{
        Account, AccountError, AccountId, AccountKind, AccountNumber, AccountNumberError,
        AccountStatus, AccountType, CheckingTerms, SavingsTerms,
    },
    client::{Client, ClientId, PasswordHash},
    tx::{Transaction, TransactionId, TransactionKind, TransactionStatus},
};
