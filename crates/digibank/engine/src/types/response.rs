//! Response types for digital bank engine operations.

use digibank_domain::{Account, Client, Transaction};
use dissolve_derive::Dissolve;
use rust_decimal::Decimal;

/// Response from a deposit, withdrawal, transfer or bill payment.
#[derive(Debug, Dissolve)]
pub struct TransactionResponse {
    /// The appended transaction log entry
    transaction: Transaction,

    /// The origin account after the operation
    origin: Account,

    /// The destination account after a transfer
    destination: Option<Account>,
}

/// Response from a monthly interest accrual.
#[derive(Debug, Dissolve)]
pub struct InterestResponse {
    /// The interest credited, at full precision
    interest: Decimal,

    /// The account after the accrual
    account: Account,

    /// The appended transaction log entry
    transaction: Transaction,
}

/// Aggregate figures over the accounts of one client.
///
/// Balance totals saturate at the bounds of [`Decimal`].
#[derive(Debug, Default, Dissolve)]
pub struct AccountStats {
    total_balance: Decimal,
    total_accounts: usize,
    savings_accounts: usize,
    checking_accounts: usize,
    active_accounts: usize,
}

/// Overdraft position of a checking account.
#[derive(Debug, Dissolve)]
pub struct OverdraftStatus {
    account: Account,
    is_overdrawn: bool,
    overdraft_amount: Decimal,
    overdraft_limit: Decimal,
    available_balance: Decimal,
}

/// Figures for the dashboard of one client.
#[derive(Debug, Dissolve)]
pub struct DashboardStats {
    account_stats: AccountStats,

    /// Deposits and interest credited since the start of the calendar month
    monthly_income: Decimal,

    /// Withdrawals and outgoing transfers since the start of the calendar month
    monthly_expenses: Decimal,

    /// The five most recent transactions, newest first
    recent_transactions: Vec<Transaction>,
}

/// Summary of the financial position of one client.
#[derive(Debug, Dissolve)]
pub struct DashboardSummary {
    client: Client,
    total_balance: Decimal,
    savings_balance: Decimal,
    checking_balance: Decimal,
    total_accounts: usize,
    total_transactions: usize,

    /// Transactions in the last 30 days
    monthly_transactions: usize,
}

#[bon::bon]
impl TransactionResponse {
    #[builder]
    pub(crate) fn new(
        transaction: Transaction,
        origin: Account,
        destination: Option<Account>,
    ) -> Self {
        Self { transaction, origin, destination }
    }
}

#[bon::bon]
impl InterestResponse {
    #[builder]
    pub(crate) fn new(interest: Decimal, account: Account, transaction: Transaction) -> Self {
        Self { interest, account, transaction }
    }
}

impl AccountStats {
    pub(crate) fn from_accounts<'a, I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = &'a Account>,
    {
        use digibank_domain::{AccountStatus, AccountType};

        accounts.into_iter().fold(Self::default(), |mut stats, account| {
            stats.total_balance = stats.total_balance.saturating_add(account.balance());
            stats.total_accounts += 1;
            match account.account_type() {
                AccountType::Savings => stats.savings_accounts += 1,
                AccountType::Checking => stats.checking_accounts += 1,
            }
            if *account.status() == AccountStatus::Active {
                stats.active_accounts += 1;
            }
            stats
        })
    }

    pub fn total_balance(&self) -> Decimal {
        self.total_balance
    }

    pub fn total_accounts(&self) -> usize {
        self.total_accounts
    }

    pub fn savings_accounts(&self) -> usize {
        self.savings_accounts
    }

    pub fn checking_accounts(&self) -> usize {
        self.checking_accounts
    }

    pub fn active_accounts(&self) -> usize {
        self.active_accounts
    }
}

#[bon::bon]
impl OverdraftStatus {
    #[builder]
    pub(crate) fn new(account: Account, overdraft_limit: Decimal) -> Self {
        Self {
            is_overdrawn: account.is_overdrawn(),
            overdraft_amount: account.overdraft_amount(),
            available_balance: account.available_balance(),
            overdraft_limit,
            account,
        }
    }
}

#[bon::bon]
impl DashboardStats {
    #[builder]
    pub(crate) fn new(
        account_stats: AccountStats,
        monthly_income: Decimal,
        monthly_expenses: Decimal,
        recent_transactions: Vec<Transaction>,
    ) -> Self {
        Self { account_stats, monthly_income, monthly_expenses, recent_transactions }
    }
}

#[bon::bon]
impl DashboardSummary {
    #[builder]
    pub(crate) fn new(
        client: Client,
        accounts: &[Account],
        total_transactions: usize,
        monthly_transactions: usize,
    ) -> Self {
        use digibank_domain::AccountType;

        let balance_of = |account_type: AccountType| -> Decimal {
            accounts
                .iter()
                .filter(|a| a.account_type() == account_type)
                .map(Account::balance)
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };

        let total_balance =
            accounts.iter().map(Account::balance).fold(Decimal::ZERO, Decimal::saturating_add);

        Self {
            client,
            total_balance,
            savings_balance: balance_of(AccountType::Savings),
            checking_balance: balance_of(AccountType::Checking),
            total_accounts: accounts.len(),
            total_transactions,
            monthly_transactions,
        }
    }
}
