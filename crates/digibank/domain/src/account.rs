//! Bank account domain models and balance policy.
//!
//! An [`Account`] carries the fields shared by every account plus an [`AccountKind`]
//! payload holding the variant-specific terms. Deposits and withdrawals dispatch on the
//! variant: savings accounts cap the number of withdrawals per period and never go below
//! zero, checking accounts may go negative down to their overdraft limit.

use core::{convert::Infallible, fmt, str::FromStr};

use std::collections::HashSet;

use bon::Builder;
use chrono::{DateTime, Local};
use dissolve_derive::Dissolve;
use rand::Rng;
use rust_decimal::Decimal;
use strum::{Display, EnumString, IntoStaticStr};

use crate::{client::ClientId, money::round_money};

/// Internal, monotonic identifier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(u64);

/// Public 16-digit number identifying an account.
///
/// Distinct from the internal [`AccountId`]. Leading zeros are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountNumber(String);

/// Errors returned when parsing an [`AccountNumber`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountNumberError {
    /// The input does not have exactly [`AccountNumber::LEN`] characters.
    #[error("account number must have {len} digits, got {0}", len = AccountNumber::LEN)]
    InvalidLength(usize),

    /// The input contains a character that is not an ASCII digit.
    #[error("account number must contain only digits")]
    NonDigit,
}

/// The two account variants offered by the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    /// Interest-bearing account with a withdrawal limit per period.
    Savings,
    /// Transactional account with an optional overdraft.
    Checking,
}

/// Lifecycle status of an account.
///
/// Only [`AccountStatus::Active`] is produced by account creation. Stored records may carry
/// any other status string; it is kept verbatim in [`AccountStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    /// The account accepts deposits and withdrawals.
    Active,
    /// The account is temporarily blocked.
    Frozen,
    /// The account has been closed.
    Closed,
    /// A status this version does not know, such as one written by an older release.
    Other(String),
}

/// Terms of a savings account.
#[derive(Debug, Clone, PartialEq, Builder, Dissolve)]
pub struct SavingsTerms {
    /// Annual interest rate, in percent.
    #[builder(default = SavingsTerms::DEFAULT_INTEREST_RATE)]
    interest_rate: Decimal,

    /// Maximum number of withdrawals per period.
    #[builder(default = SavingsTerms::DEFAULT_WITHDRAWAL_LIMIT)]
    withdrawal_limit: u32,

    /// Withdrawals already made in the current period.
    #[builder(default)]
    withdrawals_used: u32,
}

/// Terms of a checking account.
#[derive(Debug, Clone, PartialEq, Builder, Dissolve)]
pub struct CheckingTerms {
    /// How far below zero the balance may go.
    #[builder(default)]
    overdraft_limit: Decimal,
}

/// Variant-specific payload of an [`Account`].
#[derive(Debug, Clone, PartialEq)]
pub enum AccountKind {
    /// A savings account.
    Savings(SavingsTerms),
    /// A checking account.
    Checking(CheckingTerms),
}

/// A bank account owned by a client.
#[derive(Debug, Clone, Dissolve)]
pub struct Account {
    /// Internal identifier.
    id: AccountId,

    /// The client owning this account.
    client_id: ClientId,

    /// Public account number.
    number: AccountNumber,

    /// Current balance at full precision.
    balance: Decimal,

    /// When the account was opened.
    opened_at: DateTime<Local>,

    /// Lifecycle status.
    status: AccountStatus,

    /// Variant-specific terms.
    kind: AccountKind,
}

/// Errors produced by the account balance policy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The withdrawal exceeds what the account can pay out.
    ///
    /// For checking accounts `available` includes the overdraft limit.
    #[error("insufficient funds: available balance is {}", rounded(.available))]
    InsufficientFunds {
        /// The amount that could have been withdrawn.
        available: Decimal,
    },

    /// The savings account already used every withdrawal of the current period.
    #[error("withdrawal limit of {limit} per period reached")]
    WithdrawalLimitExceeded {
        /// The per-period limit of the account.
        limit: u32,
    },

    /// The account is not active.
    #[error("account is not active (status: {0})")]
    Inactive(AccountStatus),

    /// The resulting amount does not fit the decimal range of a balance.
    #[error("amount exceeds the supported balance range")]
    Overflow,

    /// The operation does not exist for this account variant.
    #[error("{operation} is only available for {expected} accounts")]
    UnsupportedOperation {
        /// The attempted operation.
        operation: &'static str,
        /// The variant that supports the operation.
        expected: AccountType,
    },
}

impl AccountId {
    /// Returns the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<AccountId> for u64 {
    fn from(AccountId(id): AccountId) -> Self {
        id
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AccountNumber {
    /// Number of digits of every account number.
    pub const LEN: usize = 16;

    /// Draws a number uniformly at random from all 16-digit numerals.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: Rng,
    {
        let digits = (0..Self::LEN).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect();
        Self(digits)
    }

    /// Draws numbers until one is not contained in `existing`.
    pub fn generate_unique<'a, R, I>(rng: &mut R, existing: I) -> Self
    where
        R: Rng,
        I: IntoIterator<Item = &'a AccountNumber>,
    {
        let taken: HashSet<&str> = existing.into_iter().map(AccountNumber::as_str).collect();

        loop {
            let candidate = Self::generate(rng);
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
        }
    }

    /// Returns the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN {
            return Err(AccountNumberError::InvalidLength(s.chars().count()));
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountNumberError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AccountStatus {
    /// Returns the status as written in records and responses.
    pub fn as_str(&self) -> &str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Closed => "closed",
            AccountStatus::Other(status) => status,
        }
    }
}

impl FromStr for AccountStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "active" => AccountStatus::Active,
            "frozen" => AccountStatus::Frozen,
            "closed" => AccountStatus::Closed,
            other => AccountStatus::Other(other.to_owned()),
        })
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SavingsTerms {
    /// Interest rate applied when none is given at creation: 3.5 %.
    pub const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(35, 0, 0, false, 1);

    /// Withdrawal limit applied when none is given at creation.
    pub const DEFAULT_WITHDRAWAL_LIMIT: u32 = 5;

    /// Returns the annual interest rate in percent.
    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    /// Returns the per-period withdrawal limit.
    pub fn withdrawal_limit(&self) -> u32 {
        self.withdrawal_limit
    }

    /// Returns the withdrawals made in the current period.
    pub fn withdrawals_used(&self) -> u32 {
        self.withdrawals_used
    }
}

impl CheckingTerms {
    /// Returns the overdraft limit.
    pub fn overdraft_limit(&self) -> Decimal {
        self.overdraft_limit
    }
}

impl AccountKind {
    /// Returns the variant tag.
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings(_) => AccountType::Savings,
            AccountKind::Checking(_) => AccountType::Checking,
        }
    }
}

#[bon::bon]
impl Account {
    /// Assembles an account from its parts.
    ///
    /// The status defaults to [`AccountStatus::Active`].
    #[builder]
    pub fn new(
        id: AccountId,
        client_id: ClientId,
        number: AccountNumber,
        balance: Decimal,
        opened_at: DateTime<Local>,
        #[builder(default = AccountStatus::Active)] status: AccountStatus,
        kind: AccountKind,
    ) -> Self {
        Self {
            id,
            client_id,
            number,
            balance,
            opened_at,
            status,
            kind,
        }
    }
}

impl Account {
    /// Returns the internal identifier.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the owning client.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the public account number.
    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    /// Returns the balance at full precision.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns the opening timestamp.
    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> &AccountStatus {
        &self.status
    }

    /// Returns the variant-specific terms.
    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    /// Returns the variant tag.
    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    /// Returns whether the account is owned by `client_id`.
    pub fn is_owned_by(&self, client_id: ClientId) -> bool {
        self.client_id == client_id
    }

    /// Returns the amount the account can pay out right now.
    ///
    /// For checking accounts this includes the overdraft limit, saturating at
    /// [`Decimal::MAX`].
    pub fn available_balance(&self) -> Decimal {
        match &self.kind {
            AccountKind::Savings(_) => self.balance,
            AccountKind::Checking(terms) => self.balance.saturating_add(terms.overdraft_limit),
        }
    }

    /// Returns whether the balance is negative.
    pub fn is_overdrawn(&self) -> bool {
        self.balance.is_sign_negative() && !self.balance.is_zero()
    }

    /// Returns how far below zero the balance is, or zero.
    pub fn overdraft_amount(&self) -> Decimal {
        if self.is_overdrawn() { -self.balance } else { Decimal::ZERO }
    }

    /// Credits `amount` to the account.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        self.ensure_active()?;

        self.balance = self.balance.checked_add(amount).ok_or(AccountError::Overflow)?;

        Ok(())
    }

    /// Debits `amount` from the account according to its variant's policy.
    ///
    /// Savings accounts check the withdrawal limit before the balance, and count the
    /// withdrawal only when it succeeds.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        self.ensure_active()?;

        match &mut self.kind {
            AccountKind::Savings(terms) => {
                if terms.withdrawals_used >= terms.withdrawal_limit {
                    return Err(AccountError::WithdrawalLimitExceeded {
                        limit: terms.withdrawal_limit,
                    });
                }

                if self.balance < amount {
                    return Err(AccountError::InsufficientFunds { available: self.balance });
                }

                self.balance = self.balance.checked_sub(amount).ok_or(AccountError::Overflow)?;
                terms.withdrawals_used = terms.withdrawals_used.saturating_add(1);
            },
            AccountKind::Checking(terms) => {
                let available = self.balance.saturating_add(terms.overdraft_limit);

                if available < amount {
                    return Err(AccountError::InsufficientFunds { available });
                }

                self.balance = self.balance.checked_sub(amount).ok_or(AccountError::Overflow)?;
            },
        }

        Ok(())
    }

    /// Applies one month of interest to a savings account and returns the amount credited.
    ///
    /// interest = balance × (rate / 100) / 12. A zero interest amount is rejected, since
    /// every credited interest is logged as a transaction with a positive amount.
    pub fn accrue_interest(&mut self) -> Result<Decimal, AccountError> {
        self.ensure_active()?;

        let AccountKind::Savings(terms) = &self.kind else {
            return Err(AccountError::UnsupportedOperation {
                operation: "interest accrual",
                expected: AccountType::Savings,
            });
        };

        let interest = self
            .balance
            .checked_mul(terms.interest_rate / Decimal::ONE_HUNDRED)
            .and_then(|yearly| yearly.checked_div(Decimal::from(12)))
            .ok_or(AccountError::Overflow)?;

        ensure_positive(interest)?;

        self.balance = self.balance.checked_add(interest).ok_or(AccountError::Overflow)?;

        Ok(interest)
    }

    /// Starts a new withdrawal period on a savings account.
    pub fn reset_withdrawal_count(&mut self) -> Result<(), AccountError> {
        match &mut self.kind {
            AccountKind::Savings(terms) => {
                terms.withdrawals_used = 0;
                Ok(())
            },
            AccountKind::Checking(_) => Err(AccountError::UnsupportedOperation {
                operation: "withdrawal limit reset",
                expected: AccountType::Savings,
            }),
        }
    }

    fn ensure_active(&self) -> Result<(), AccountError> {
        match &self.status {
            AccountStatus::Active => Ok(()),
            status => Err(AccountError::Inactive(status.clone())),
        }
    }
}

fn rounded(value: &Decimal) -> Decimal {
    round_money(*value)
}

fn ensure_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount <= Decimal::ZERO {
        return Err(AccountError::InvalidAmount);
    }

    Ok(())
}
