//! Test utilities for the digital bank crates.
//!
//! This crate provides a [`TestBank`] fixture: an engine over a store living in a fresh
//! temporary directory, plus helpers to seed clients and accounts and to tamper with the
//! collection files the way a hand-edited or foreign data directory would.

use std::path::Path;

use digibank_domain::{Account, AccountNumber, AccountType, Client, ClientId};
use digibank_engine::{
    DigibankEngine,
    request::{OpenAccountRequest, RegisterClientRequest},
};
use digibank_store::DigibankStore;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Password of every client registered through [`TestBank::register_client`].
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// An engine backed by collection files in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestBank {
    dir: TempDir,
    engine: DigibankEngine,
}

/// Parses a decimal literal, panicking on malformed input.
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str_exact(value).unwrap()
}

impl TestBank {
    /// Creates the fixture and initializes the collection files.
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let store = DigibankStore::new(dir.path().join("data"));
        store.ensure_initialized().await.unwrap();

        Self { dir, engine: DigibankEngine::new(store) }
    }

    pub fn engine(&self) -> &DigibankEngine {
        &self.engine
    }

    pub fn data_dir(&self) -> &Path {
        self.engine.store().data_dir()
    }

    /// Splits the fixture. Keep the [`TempDir`] alive as long as the engine is used.
    pub fn into_parts(self) -> (TempDir, DigibankEngine) {
        (self.dir, self.engine)
    }

    /// Registers a client named after `email` with [`TEST_PASSWORD`].
    pub async fn register_client(&self, email: &str, national_id: &str) -> Client {
        let request = RegisterClientRequest::builder()
            .first_name("Test")
            .last_name(email)
            .national_id(national_id)
            .email(email)
            .password(TEST_PASSWORD)
            .build()
            .unwrap();

        self.engine.register_client(request).await.unwrap()
    }

    /// Opens a savings account with the default interest rate and withdrawal limit.
    pub async fn open_savings(&self, client_id: ClientId, balance: &str) -> Account {
        let request = OpenAccountRequest::builder()
            .account_type(AccountType::Savings)
            .opening_balance(dec(balance))
            .build()
            .unwrap();

        self.engine.open_account(client_id, request).await.unwrap()
    }

    /// Opens a checking account.
    pub async fn open_checking(
        &self,
        client_id: ClientId,
        balance: &str,
        overdraft_limit: &str,
    ) -> Account {
        let request = OpenAccountRequest::builder()
            .account_type(AccountType::Checking)
            .opening_balance(dec(balance))
            .overdraft_limit(dec(overdraft_limit))
            .build()
            .unwrap();

        self.engine.open_account(client_id, request).await.unwrap()
    }

    /// Rewrites the stored status of an account directly in its collection file.
    pub fn set_account_status(&self, number: &AccountNumber, status: &str) {
        let path = self.data_dir().join("accounts.json");
        let mut accounts = read_array(&path);

        for account in &mut accounts {
            if account["account_number"] == number.as_str() {
                account["status"] = status.into();
            }
        }

        std::fs::write(&path, serde_json::to_vec_pretty(&accounts).unwrap()).unwrap();
    }

    /// Returns the number of entries in the transaction log file.
    pub fn transaction_count(&self) -> usize {
        read_array(&self.data_dir().join("transactions.json")).len()
    }

    /// Overwrites a collection file with arbitrary content.
    pub fn write_collection(&self, name: &str, content: &str) {
        std::fs::write(self.data_dir().join(format!("{name}.json")), content).unwrap();
    }
}

fn read_array(path: &Path) -> Vec<serde_json::Value> {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}
