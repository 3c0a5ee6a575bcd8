//! Transaction engine and account services of the digital bank.
//!
//! [`DigibankEngine`] is the only entry point the API layer talks to. It validates
//! ownership, runs the account balance policy inside a [`Ledger`] session of the store
//! and persists the outcome together with exactly one transaction log entry. Rejected
//! operations persist nothing and are reported through `tracing` only.

mod credential;
mod error;
mod types;

pub use self::{
    error::{DigibankEngineError, Result},
    types::{request, response},
};

use chrono::{Datelike, Local, TimeDelta};
use digibank_domain::{
    Account, AccountError, AccountId, AccountKind, AccountNumber, Client, ClientId, Transaction,
    TransactionKind,
};
use digibank_store::{DigibankStore, Ledger, NewAccount, NewClient, NewTransaction};
use rust_decimal::Decimal;

use self::types::{
    request::{
        LoginRequest, LoginRequestDissolved, OpenAccountRequest, OpenAccountRequestDissolved,
        PaymentRequest, RegisterClientRequest, RegisterClientRequestDissolved,
        TransactionRequest, TransactionRequestDissolved,
    },
    response::{
        AccountStats, DashboardStats, DashboardSummary, InterestResponse, OverdraftStatus,
        TransactionResponse,
    },
};

/// Number of transactions returned by the recent transactions listing.
pub const RECENT_TRANSACTIONS: usize = 10;

const DASHBOARD_RECENT_TRANSACTIONS: usize = 5;

/// The digital bank service: identity, accounts, transactions and dashboards.
pub struct DigibankEngine {
    store: DigibankStore,
}

impl DigibankEngine {
    pub fn new(store: DigibankStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DigibankStore {
        &self.store
    }
}

// CLIENTS
// ================================================================================================

impl DigibankEngine {
    /// Registers a new client with an Argon2id hash of its password.
    #[tracing::instrument(skip_all)]
    pub async fn register_client(&self, request: RegisterClientRequest) -> Result<Client> {
        let RegisterClientRequestDissolved {
            first_name,
            last_name,
            national_id,
            email,
            password,
            address,
            phone,
        } = request.dissolve();

        let password_hash = credential::hash_password(password).await?;

        let new_client = NewClient::builder()
            .first_name(first_name)
            .last_name(last_name)
            .national_id(national_id)
            .email(email)
            .password_hash(password_hash)
            .address(address)
            .phone(phone)
            .build();

        self.store
            .create_client(new_client)
            .await
            .inspect_err(|err| tracing::info!(%err, "registration rejected"))
            .map_err(From::from)
    }

    /// Resolves an email and password pair to a client.
    ///
    /// An unknown email and a wrong password fail with the same
    /// [`DigibankEngineError::InvalidCredentials`].
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(&self, request: LoginRequest) -> Result<Client> {
        let LoginRequestDissolved { email, password } = request.dissolve();

        let Some(client) = self.store.find_client_by_email(&email).await? else {
            tracing::info!("login rejected");
            return Err(DigibankEngineError::InvalidCredentials);
        };

        if !credential::verify_password(client.password_hash().clone(), password).await? {
            tracing::info!(client_id = %client.id(), "login rejected");
            return Err(DigibankEngineError::InvalidCredentials);
        }

        Ok(client)
    }

    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn get_client(&self, client_id: ClientId) -> Result<Client> {
        self.store.find_client_by_id(client_id).await?.ok_or(DigibankEngineError::ClientNotFound)
    }
}

// ACCOUNTS
// ================================================================================================

impl DigibankEngine {
    /// Opens an account for `client_id` with a fresh unique account number.
    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn open_account(
        &self,
        client_id: ClientId,
        request: OpenAccountRequest,
    ) -> Result<Account> {
        let OpenAccountRequestDissolved { opening_balance, kind } = request.dissolve();

        self.get_client(client_id).await?;

        let new_account = NewAccount::builder()
            .client_id(client_id)
            .opening_balance(opening_balance)
            .kind(kind)
            .build();

        self.store.create_account(new_account).await.map_err(From::from)
    }

    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn list_accounts(&self, client_id: ClientId) -> Result<Vec<Account>> {
        self.store.accounts_by_client(client_id).await.map_err(From::from)
    }

    #[tracing::instrument(skip_all, fields(%client_id, %number))]
    pub async fn get_account(&self, client_id: ClientId, number: &AccountNumber) -> Result<Account> {
        let account = self.store.find_account_by_number(number).await?;

        ensure_owned(account, client_id)
    }

    #[tracing::instrument(skip_all, fields(%client_id, %account_id))]
    pub async fn get_account_by_id(
        &self,
        client_id: ClientId,
        account_id: AccountId,
    ) -> Result<Account> {
        let account = self.store.find_account_by_id(account_id).await?;

        ensure_owned(account, client_id)
    }

    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn account_stats(&self, client_id: ClientId) -> Result<AccountStats> {
        let accounts = self.list_accounts(client_id).await?;

        Ok(AccountStats::from_accounts(&accounts))
    }

    /// Reports the overdraft position of a checking account.
    #[tracing::instrument(skip_all, fields(%client_id, %number))]
    pub async fn overdraft_status(
        &self,
        client_id: ClientId,
        number: &AccountNumber,
    ) -> Result<OverdraftStatus> {
        let account = self.get_account(client_id, number).await?;

        let AccountKind::Checking(terms) = account.kind() else {
            return Err(DigibankEngineError::invalid_input(
                "overdraft status is only available for checking accounts",
            ));
        };

        let overdraft_limit = terms.overdraft_limit();

        Ok(OverdraftStatus::builder().account(account).overdraft_limit(overdraft_limit).build())
    }
}

// TRANSACTIONS
// ================================================================================================

impl DigibankEngine {
    /// Runs a deposit, withdrawal or transfer on behalf of `client_id`.
    ///
    /// The acting client must own the origin account. The destination of a transfer may
    /// belong to anyone. On success the affected accounts and one transaction log entry
    /// are persisted; on failure nothing is.
    #[tracing::instrument(
        skip_all,
        fields(%client_id, kind = %request.kind(), origin = %request.origin()),
    )]
    pub async fn execute_transaction(
        &self,
        client_id: ClientId,
        request: TransactionRequest,
    ) -> Result<TransactionResponse> {
        let TransactionRequestDissolved { kind, origin, destination, amount, description } =
            request.dissolve();

        let mut ledger = self.store.ledger().await?;

        let new_tx = NewTransaction::builder()
            .origin(origin.clone())
            .maybe_destination(destination.clone())
            .kind(kind)
            .amount(amount)
            .description(description);

        match (kind, destination) {
            (TransactionKind::Transfer, Some(destination)) => {
                transfer(&mut ledger, client_id, &origin, &destination, amount)
                    .inspect_err(|err| tracing::warn!(%err, "transfer rejected"))?;

                let origin_account = ledger_account(&ledger, &origin)?;
                let destination_account = ledger_account(&ledger, &destination)?;
                let transaction = ledger.commit(new_tx.build()).await?;

                Ok(TransactionResponse::builder()
                    .transaction(transaction)
                    .origin(origin_account)
                    .destination(destination_account)
                    .build())
            },
            (TransactionKind::Deposit, None) => {
                owned_account_mut(&mut ledger, client_id, &origin)?
                    .deposit(amount)
                    .inspect_err(|err| tracing::warn!(%err, "deposit rejected"))?;

                commit_single(ledger, &origin, new_tx.build()).await
            },
            (TransactionKind::Withdrawal, None) => {
                owned_account_mut(&mut ledger, client_id, &origin)?
                    .withdraw(amount)
                    .inspect_err(|err| tracing::warn!(%err, "withdrawal rejected"))?;

                commit_single(ledger, &origin, new_tx.build()).await
            },
            _ => Err(DigibankEngineError::invalid_input("unsupported transaction request")),
        }
    }

    /// Credits one month of interest to a savings account.
    #[tracing::instrument(skip_all, fields(%client_id, %number))]
    pub async fn accrue_interest(
        &self,
        client_id: ClientId,
        number: &AccountNumber,
    ) -> Result<InterestResponse> {
        let mut ledger = self.store.ledger().await?;

        let account = owned_account_mut(&mut ledger, client_id, number)?;
        let interest = account
            .accrue_interest()
            .inspect_err(|err| tracing::warn!(%err, "interest accrual rejected"))?;
        let account = account.clone();

        let new_tx = NewTransaction::builder()
            .origin(number.clone())
            .kind(TransactionKind::Interest)
            .amount(interest)
            .description(TransactionKind::Interest.default_description())
            .build();

        let transaction = ledger.commit(new_tx).await?;

        Ok(InterestResponse::builder()
            .interest(interest)
            .account(account)
            .transaction(transaction)
            .build())
    }

    /// Starts a new withdrawal period on a savings account. Appends no transaction.
    #[tracing::instrument(skip_all, fields(%client_id, %number))]
    pub async fn reset_withdrawal_count(
        &self,
        client_id: ClientId,
        number: &AccountNumber,
    ) -> Result<Account> {
        let mut ledger = self.store.ledger().await?;

        let account = owned_account_mut(&mut ledger, client_id, number)?;
        account.reset_withdrawal_count()?;
        let account = account.clone();

        ledger.commit_accounts().await?;

        Ok(account)
    }

    /// Pays a bill from an account of `client_id`.
    ///
    /// The balance alone must cover the amount; an overdraft is never used for payments.
    /// The payment is recorded as a withdrawal.
    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn process_payment(
        &self,
        client_id: ClientId,
        request: PaymentRequest,
    ) -> Result<TransactionResponse> {
        let description = request.description();
        let types::request::PaymentRequestDissolved { account_number, amount, .. } =
            request.dissolve();

        let mut ledger = self.store.ledger().await?;

        let account = owned_account_mut(&mut ledger, client_id, &account_number)?;

        if account.balance() < amount {
            let err = AccountError::InsufficientFunds { available: account.balance() };
            tracing::warn!(%err, "payment rejected");
            return Err(err.into());
        }

        account.withdraw(amount).inspect_err(|err| tracing::warn!(%err, "payment rejected"))?;

        let new_tx = NewTransaction::builder()
            .origin(account_number.clone())
            .kind(TransactionKind::Withdrawal)
            .amount(amount)
            .description(description)
            .build();

        commit_single(ledger, &account_number, new_tx).await
    }

    /// Lists the transactions touching any account of `client_id`, newest first.
    #[tracing::instrument(skip_all, fields(%client_id, ?limit))]
    pub async fn list_transactions(
        &self,
        client_id: ClientId,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>> {
        let numbers: Vec<AccountNumber> = self
            .list_accounts(client_id)
            .await?
            .into_iter()
            .map(|a| a.number().clone())
            .collect();

        let mut txs: Vec<Transaction> = self
            .store
            .all_transactions()
            .await?
            .into_iter()
            .filter(|tx| numbers.iter().any(|n| tx.involves(n)))
            .collect();

        txs.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()).then(b.id().cmp(&a.id())));

        if let Some(limit) = limit {
            txs.truncate(limit);
        }

        Ok(txs)
    }

    /// Lists the bill payments of `client_id`, newest first.
    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn payment_history(&self, client_id: ClientId) -> Result<Vec<Transaction>> {
        let txs = self.list_transactions(client_id, None).await?;

        Ok(txs
            .into_iter()
            .filter(|tx| {
                tx.kind() == TransactionKind::Withdrawal
                    && tx.description().starts_with(PaymentRequest::DESCRIPTION_PREFIX)
            })
            .collect())
    }
}

// DASHBOARD
// ================================================================================================

impl DigibankEngine {
    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn dashboard_stats(&self, client_id: ClientId) -> Result<DashboardStats> {
        let accounts = self.list_accounts(client_id).await?;
        let mut txs = self.list_transactions(client_id, None).await?;

        let now = Local::now();
        let month_start = now
            .date_naive()
            .with_day(1)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .and_then(|start| start.and_local_timezone(Local).earliest())
            .unwrap_or(now);

        let owns = |number: &AccountNumber| accounts.iter().any(|a| a.number() == number);

        let (mut income, mut expenses) = (Decimal::ZERO, Decimal::ZERO);
        for tx in txs.iter().filter(|tx| tx.timestamp() >= month_start) {
            match tx.kind() {
                TransactionKind::Deposit | TransactionKind::Interest => {
                    income = income.saturating_add(tx.amount());
                },
                TransactionKind::Withdrawal => expenses = expenses.saturating_add(tx.amount()),
                TransactionKind::Transfer if owns(tx.origin()) => {
                    expenses = expenses.saturating_add(tx.amount());
                },
                TransactionKind::Transfer => {},
            }
        }

        txs.truncate(DASHBOARD_RECENT_TRANSACTIONS);

        Ok(DashboardStats::builder()
            .account_stats(AccountStats::from_accounts(&accounts))
            .monthly_income(income)
            .monthly_expenses(expenses)
            .recent_transactions(txs)
            .build())
    }

    #[tracing::instrument(skip_all, fields(%client_id))]
    pub async fn dashboard_summary(&self, client_id: ClientId) -> Result<DashboardSummary> {
        let client = self.get_client(client_id).await?;
        let accounts = self.list_accounts(client_id).await?;
        let txs = self.list_transactions(client_id, None).await?;

        let since = Local::now() - TimeDelta::days(30);
        let monthly_transactions = txs.iter().filter(|tx| tx.timestamp() >= since).count();

        Ok(DashboardSummary::builder()
            .client(client)
            .accounts(&accounts)
            .total_transactions(txs.len())
            .monthly_transactions(monthly_transactions)
            .build())
    }
}

// HELPERS
// ================================================================================================

fn ensure_owned(account: Option<Account>, client_id: ClientId) -> Result<Account> {
    let account = account.ok_or(DigibankEngineError::AccountNotFound)?;

    if !account.is_owned_by(client_id) {
        return Err(DigibankEngineError::Unauthorized);
    }

    Ok(account)
}

fn owned_account_mut<'l>(
    ledger: &'l mut Ledger<'_>,
    client_id: ClientId,
    number: &AccountNumber,
) -> Result<&'l mut Account> {
    let account = ledger.account_mut(number).ok_or(DigibankEngineError::AccountNotFound)?;

    if !account.is_owned_by(client_id) {
        return Err(DigibankEngineError::Unauthorized);
    }

    Ok(account)
}

fn ledger_account(ledger: &Ledger<'_>, number: &AccountNumber) -> Result<Account> {
    ledger.account(number).cloned().ok_or(DigibankEngineError::AccountNotFound)
}

/// Moves `amount` from `origin` to `destination` in memory.
///
/// When the destination rejects the deposit the withdrawn amount is deposited back into
/// the origin and the destination's error is returned.
fn transfer(
    ledger: &mut Ledger<'_>,
    client_id: ClientId,
    origin: &AccountNumber,
    destination: &AccountNumber,
    amount: Decimal,
) -> Result<()> {
    if ledger.account(destination).is_none() {
        owned_account_mut(ledger, client_id, origin)?;
        return Err(DigibankEngineError::AccountNotFound);
    }

    owned_account_mut(ledger, client_id, origin)?.withdraw(amount)?;

    let Err(destination_err) = ledger_account_mut(ledger, destination)?.deposit(amount) else {
        return Ok(());
    };

    match ledger_account_mut(ledger, origin)?.deposit(amount) {
        Ok(()) => Err(destination_err.into()),
        Err(compensation_err) => {
            tracing::error!(%destination_err, %compensation_err, "transfer compensation failed");
            Err(DigibankEngineError::CompensationFailed(compensation_err.to_string().into()))
        },
    }
}

fn ledger_account_mut<'l>(
    ledger: &'l mut Ledger<'_>,
    number: &AccountNumber,
) -> Result<&'l mut Account> {
    ledger.account_mut(number).ok_or(DigibankEngineError::AccountNotFound)
}

async fn commit_single(
    ledger: Ledger<'_>,
    origin: &AccountNumber,
    new_tx: NewTransaction,
) -> Result<TransactionResponse> {
    let origin_account = ledger_account(&ledger, origin)?;
    let transaction = ledger.commit(new_tx).await?;

    Ok(TransactionResponse::builder().transaction(transaction).origin(origin_account).build())
}
