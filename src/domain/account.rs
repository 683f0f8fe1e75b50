use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::ensure_positive;
use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::errors::{BankError, BankResult};

/// Tag used by the registry to select which account variant to construct.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountType {
    Savings,
    Checking,
    Tfsa,
    Rrsp,
}

impl FromStr for AccountType {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            "tfsa" => Ok(AccountType::Tfsa),
            "rrsp" => Ok(AccountType::Rrsp),
            other => Err(BankError::UnknownAccountType(other.to_string())),
        }
    }
}

/// Enumerates the supported account classifications and their variant state.
///
/// Savings, TFSA, and RRSP form the savings family: they carry a withdrawal
/// floor and earn interest. Checking has no floor and supports e-transfers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AccountKind {
    Savings {
        minimum_balance: f64,
    },
    Checking,
    TaxFreeSavings {
        minimum_balance: f64,
    },
    RegisteredRetirementSavings {
        minimum_balance: f64,
        /// Regulatory deposit allowance. Tracked but never enforced.
        contribution_room: f64,
    },
}

impl AccountKind {
    /// Withdrawal floor for savings-family variants.
    pub fn minimum_balance(&self) -> Option<f64> {
        match self {
            AccountKind::Savings { minimum_balance }
            | AccountKind::TaxFreeSavings { minimum_balance }
            | AccountKind::RegisteredRetirementSavings {
                minimum_balance, ..
            } => Some(*minimum_balance),
            AccountKind::Checking => None,
        }
    }

    pub fn earns_interest(&self) -> bool {
        self.minimum_balance().is_some()
    }

    pub fn contribution_room(&self) -> Option<f64> {
        match self {
            AccountKind::RegisteredRetirementSavings {
                contribution_room, ..
            } => Some(*contribution_room),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Savings { .. } => "Savings",
            AccountKind::Checking => "Checking",
            AccountKind::TaxFreeSavings { .. } => "TFSA",
            AccountKind::RegisteredRetirementSavings { .. } => "RRSP",
        }
    }
}

/// A customer account with its ordered transaction history.
///
/// Balances change only through the mutators here, so the ledger invariant
/// (balance equals the opening balance plus the sum of signed record amounts)
/// holds for every reachable state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    account_number: String,
    holder_name: String,
    opening_balance: f64,
    balance: f64,
    history: Vec<TransactionRecord>,
    kind: AccountKind,
}

impl Account {
    /// Constructed by the registry only; the opening balance is seeded
    /// directly and deliberately leaves no history record.
    pub(crate) fn new(
        kind: AccountKind,
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        opening_balance: f64,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            holder_name: holder_name.into(),
            opening_balance,
            balance: opening_balance,
            history: Vec::new(),
            kind,
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn opening_balance(&self) -> f64 {
        self.opening_balance
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    /// Credits the account. Rejects non-positive amounts, otherwise never
    /// fails.
    pub fn deposit(&mut self, amount: f64) -> BankResult<()> {
        ensure_positive(amount)?;
        self.balance += amount;
        self.history
            .push(TransactionRecord::new(TransactionKind::Deposit, amount));
        info!(
            account = %self.account_number,
            amount,
            balance = self.balance,
            "deposit accepted"
        );
        Ok(())
    }

    /// Debits the account. Savings-family variants check the minimum-balance
    /// floor before the base insufficient-funds rule, so a withdrawal that
    /// would cross the floor is rejected under that rule even when the raw
    /// balance could cover it.
    pub fn withdraw(&mut self, amount: f64) -> BankResult<()> {
        ensure_positive(amount)?;
        if let Some(minimum) = self.kind.minimum_balance() {
            let remaining = self.balance - amount;
            if remaining < minimum {
                error!(
                    account = %self.account_number,
                    amount,
                    minimum,
                    "withdrawal would cross the minimum balance"
                );
                return Err(BankError::BelowMinimumBalance {
                    requested: amount,
                    remaining,
                    minimum,
                });
            }
        }
        if amount > self.balance {
            error!(
                account = %self.account_number,
                amount,
                balance = self.balance,
                "insufficient funds for withdrawal"
            );
            return Err(BankError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.history
            .push(TransactionRecord::new(TransactionKind::Withdrawal, amount));
        info!(
            account = %self.account_number,
            amount,
            balance = self.balance,
            "withdrawal accepted"
        );
        Ok(())
    }

    /// Sends funds to an external recipient reference. Checking accounts
    /// only; the recipient side is not modeled.
    pub fn send_etransfer(&mut self, recipient: &str, amount: f64) -> BankResult<()> {
        if !matches!(self.kind, AccountKind::Checking) {
            return Err(BankError::UnsupportedOperation {
                operation: "E-transfer",
                target: self.account_number.clone(),
            });
        }
        ensure_positive(amount)?;
        if amount > self.balance {
            error!(
                account = %self.account_number,
                amount,
                balance = self.balance,
                "insufficient funds for e-transfer"
            );
            return Err(BankError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.history.push(TransactionRecord::new(
            TransactionKind::Transfer {
                recipient: recipient.to_string(),
            },
            amount,
        ));
        info!(
            account = %self.account_number,
            amount,
            recipient,
            "e-transfer sent"
        );
        Ok(())
    }

    /// Accrues interest on a savings-family account and returns the amount
    /// applied.
    pub fn apply_interest(&mut self, rate: f64) -> BankResult<f64> {
        if !self.kind.earns_interest() {
            return Err(BankError::UnsupportedOperation {
                operation: "Interest",
                target: self.account_number.clone(),
            });
        }
        let interest = self.balance * rate;
        self.balance += interest;
        self.history.push(TransactionRecord::new(
            TransactionKind::InterestApplied,
            interest,
        ));
        info!(
            account = %self.account_number,
            interest,
            balance = self.balance,
            "interest applied"
        );
        Ok(interest)
    }

    /// Read-only projection for the presentation layer.
    pub fn details(&self) -> AccountDetails {
        AccountDetails {
            account_number: self.account_number.clone(),
            holder_name: self.holder_name.clone(),
            balance: self.balance,
        }
    }

    /// Snapshot of the ordered transaction history at call time.
    pub fn transaction_history(&self) -> Vec<TransactionRecord> {
        self.history.clone()
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        &self.account_number
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.holder_name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({})", self.account_number, self.kind.label())
    }
}

/// Identity and balance of an account, ready to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDetails {
    pub account_number: String,
    pub holder_name: String,
    pub balance: f64,
}

impl fmt::Display for AccountDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account Number: {}\nAccount Holder: {}\nBalance: {:.2}",
            self.account_number, self.holder_name, self.balance
        )
    }
}
