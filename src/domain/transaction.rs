use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;

/// Classifies a monetary event recorded against an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// Debit sent to an external recipient reference; no matching credit is
    /// modeled on the receiving side.
    Transfer {
        recipient: String,
    },
    InterestApplied,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
            TransactionKind::Transfer { .. } => "E-Transfer",
            TransactionKind::InterestApplied => "Interest",
        };
        f.write_str(label)
    }
}

/// One entry in an account's ordered transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub(crate) fn new(kind: TransactionKind, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Balance delta contributed by this record. Deposits and interest add,
    /// withdrawals and transfers subtract.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Deposit | TransactionKind::InterestApplied => self.amount,
            TransactionKind::Withdrawal | TransactionKind::Transfer { .. } => -self.amount,
        }
    }
}

impl Displayable for TransactionRecord {
    fn display_label(&self) -> String {
        format!("{}: {:.2}", self.kind, self.amount)
    }
}
