//! Flat-file persistence layer for the digital bank.
//!
//! This crate stores clients, accounts and the transaction log as three JSON collection
//! files under one data directory. It is the data access layer of the engine: every
//! read goes to disk and every mutation rewrites the affected collection wholesale.
//!
//! # Consistency
//!
//! - Each collection owns an async mutex held for the whole read-modify-overwrite.
//! - Files are replaced atomically by writing a sibling temp file and renaming it.
//! - Operations spanning collections lock them in the order clients, accounts,
//!   transactions.
//! - A corrupt collection file reads as empty for plain reads and is reported at `warn`
//!   level. Any read taken under a collection lock fails with
//!   [`DigibankStoreError::Serialization`] instead, so a write never replaces it.
//! - A commit writes the transaction log before the accounts. A failure in between
//!   leaves a log entry whose balance change was never applied.
//!
//! Nothing protects the files against a second process writing to the same directory.
//!
//! # Main Components
//!
//! - [`DigibankStore`] - The primary interface for storage operations
//! - [`Ledger`] - A locked session over accounts and transactions for balance changes
//! - [`DigibankStoreError`] - Error types for store operations

mod error;
mod persistence;

pub use self::error::{DigibankStoreError, Result};

use std::path::{Path, PathBuf};

use bon::Builder;
use chrono::Local;
use digibank_domain::{
    Account, AccountId, AccountKind, AccountNumber, Client, ClientId, PasswordHash, Transaction,
    TransactionKind,
};
use rust_decimal::Decimal;

use self::persistence::{
    collection::{Collection, CollectionGuard, next_id},
    record::{AccountRecord, ClientRecord, TransactionRecord},
};

/// A client to register. The store assigns the id and the registration time.
#[derive(Debug, Builder)]
pub struct NewClient {
    #[builder(into)]
    first_name: String,
    #[builder(into)]
    last_name: String,
    #[builder(into)]
    national_id: String,
    #[builder(into, default)]
    address: String,
    #[builder(into, default)]
    phone: String,
    /// Already normalized email address.
    #[builder(into)]
    email: String,
    password_hash: PasswordHash,
}

/// An account to open. The store assigns the id, the number and the opening time.
#[derive(Debug, Builder)]
pub struct NewAccount {
    client_id: ClientId,
    #[builder(default)]
    opening_balance: Decimal,
    kind: AccountKind,
}

/// A transaction log entry to append. The store assigns the id and the timestamp.
#[derive(Debug, Builder)]
pub struct NewTransaction {
    origin: AccountNumber,
    destination: Option<AccountNumber>,
    kind: TransactionKind,
    amount: Decimal,
    #[builder(into)]
    description: String,
}

/// The main store interface for digital bank persistence operations.
pub struct DigibankStore {
    data_dir: PathBuf,
    clients: Collection<ClientRecord>,
    accounts: Collection<AccountRecord>,
    transactions: Collection<TransactionRecord>,
}

/// Exclusive access to the accounts and the transaction log.
///
/// Accounts are loaded once when the session opens and mutated in memory. Nothing is
/// written until [`Ledger::commit`] or [`Ledger::commit_accounts`]; dropping the ledger
/// discards every change.
pub struct Ledger<'a> {
    accounts_guard: CollectionGuard<'a, AccountRecord>,
    transactions_guard: CollectionGuard<'a, TransactionRecord>,
    accounts: Vec<Account>,
}

impl DigibankStore {
    /// Creates a store over the collection files in `data_dir`. Performs no I/O.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();

        Self {
            clients: Collection::new(&data_dir, "clients"),
            accounts: Collection::new(&data_dir, "accounts"),
            transactions: Collection::new(&data_dir, "transactions"),
            data_dir,
        }
    }

    /// Returns the directory holding the collection files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Creates the data directory and writes every missing collection file as `[]`.
    #[tracing::instrument(skip_all, fields(data_dir = %self.data_dir.display()))]
    pub async fn ensure_initialized(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        self.clients.ensure_exists().await?;
        self.accounts.ensure_exists().await?;
        self.transactions.ensure_exists().await?;

        Ok(())
    }
}

impl DigibankStore {
    /// Registers a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email or the national id is already registered
    /// - The clients collection cannot be written
    #[tracing::instrument(skip_all)]
    pub async fn create_client(&self, new_client: NewClient) -> Result<Client> {
        let guard = self.clients.lock().await;
        let mut records = guard.read_all().await?;

        if records.iter().any(|r| r.email() == new_client.email) {
            return Err(DigibankStoreError::DuplicateEmail);
        }

        if records.iter().any(|r| r.national_id() == new_client.national_id) {
            return Err(DigibankStoreError::DuplicateNationalId);
        }

        let client = Client::builder()
            .id(next_id(&records).into())
            .first_name(new_client.first_name)
            .last_name(new_client.last_name)
            .national_id(new_client.national_id)
            .address(new_client.address)
            .phone(new_client.phone)
            .email(new_client.email)
            .password_hash(new_client.password_hash)
            .registered_at(Local::now())
            .build();

        records.push(client.clone().into());
        guard.overwrite_all(&records).await?;

        tracing::info!(client_id = %client.id(), "client registered");

        Ok(client)
    }

    /// Looks a client up by its normalized email address.
    #[tracing::instrument(skip_all)]
    pub async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>> {
        let records = self.clients.read_all().await?;

        Ok(records.into_iter().find(|r| r.email() == email).map(Client::from))
    }

    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn find_client_by_id(&self, client_id: ClientId) -> Result<Option<Client>> {
        let records = self.clients.read_all().await?;

        Ok(records.into_iter().map(Client::from).find(|c| c.id() == client_id))
    }
}

impl DigibankStore {
    /// Opens a new account with a freshly generated, unique account number.
    #[tracing::instrument(
        skip_all,
        fields(client_id = %new_account.client_id, account_type = %new_account.kind.account_type()),
    )]
    pub async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let guard = self.accounts.lock().await;
        let mut records = guard.read_all().await?;

        let number = AccountNumber::generate_unique(
            &mut rand::rng(),
            records.iter().map(AccountRecord::account_number),
        );

        let account = Account::builder()
            .id(next_id(&records).into())
            .client_id(new_account.client_id)
            .number(number)
            .balance(new_account.opening_balance)
            .opened_at(Local::now())
            .kind(new_account.kind)
            .build();

        records.push(account.clone().into());
        guard.overwrite_all(&records).await?;

        tracing::info!(account_id = %account.id(), "account opened");

        Ok(account)
    }

    #[tracing::instrument(skip_all)]
    pub async fn all_accounts(&self) -> Result<Vec<Account>> {
        let records = self.accounts.read_all().await?;

        Ok(records.into_iter().map(Account::from).collect())
    }

    /// Returns the accounts owned by `client_id`, in opening order.
    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn accounts_by_client(&self, client_id: ClientId) -> Result<Vec<Account>> {
        let accounts = self.all_accounts().await?;

        Ok(accounts.into_iter().filter(|a| a.is_owned_by(client_id)).collect())
    }

    #[tracing::instrument(skip_all, fields(%number))]
    pub async fn find_account_by_number(&self, number: &AccountNumber) -> Result<Option<Account>> {
        let accounts = self.all_accounts().await?;

        Ok(accounts.into_iter().find(|a| a.number() == number))
    }

    #[tracing::instrument(skip_all, fields(%account_id))]
    pub async fn find_account_by_id(&self, account_id: AccountId) -> Result<Option<Account>> {
        let accounts = self.all_accounts().await?;

        Ok(accounts.into_iter().find(|a| a.id() == account_id))
    }
}

impl DigibankStore {
    /// Returns the whole transaction log in append order.
    #[tracing::instrument(skip_all)]
    pub async fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let records = self.transactions.read_all().await?;

        Ok(records.into_iter().map(Transaction::from).collect())
    }

    /// Opens a ledger session, locking accounts and then transactions.
    #[tracing::instrument(skip_all)]
    pub async fn ledger(&self) -> Result<Ledger<'_>> {
        let accounts_guard = self.accounts.lock().await;
        let transactions_guard = self.transactions.lock().await;

        let accounts =
            accounts_guard.read_all().await?.into_iter().map(Account::from).collect();

        Ok(Ledger { accounts_guard, transactions_guard, accounts })
    }
}

impl Ledger<'_> {
    pub fn account(&self, number: &AccountNumber) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number() == number)
    }

    pub fn account_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.number() == number)
    }

    /// Appends one transaction log entry, then persists every account.
    #[tracing::instrument(skip_all, fields(kind = %new_tx.kind, origin = %new_tx.origin))]
    pub async fn commit(self, new_tx: NewTransaction) -> Result<Transaction> {
        let mut tx_records = self.transactions_guard.read_all().await?;

        let tx = Transaction::builder()
            .id(next_id(&tx_records).into())
            .origin(new_tx.origin)
            .maybe_destination(new_tx.destination)
            .kind(new_tx.kind)
            .amount(new_tx.amount)
            .timestamp(Local::now())
            .description(new_tx.description)
            .build();

        tx_records.push(tx.clone().into());
        self.transactions_guard.overwrite_all(&tx_records).await?;

        let account_records: Vec<AccountRecord> =
            self.accounts.into_iter().map(AccountRecord::from).collect();
        self.accounts_guard.overwrite_all(&account_records).await?;

        tracing::info!(transaction_id = %tx.id(), "transaction recorded");

        Ok(tx)
    }

    /// Persists every account without touching the transaction log.
    #[tracing::instrument(skip_all)]
    pub async fn commit_accounts(self) -> Result<()> {
        let account_records: Vec<AccountRecord> =
            self.accounts.into_iter().map(AccountRecord::from).collect();

        self.accounts_guard.overwrite_all(&account_records).await
    }
}
