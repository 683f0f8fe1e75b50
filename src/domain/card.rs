use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::account::Account;
use crate::domain::common::{Displayable, Identifiable};
use crate::domain::ensure_positive;
use crate::errors::{BankError, BankResult};

/// Distinguishes plain debit cards from credit cards carrying their own debt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CardKind {
    Debit,
    Credit {
        credit_limit: f64,
        /// Debt carried on the card itself, separate from the linked
        /// account's balance.
        carried_balance: f64,
    },
}

/// Payment card linked to a registry account by number. The card never owns
/// the account; the registry resolves the link at call time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    card_number: String,
    linked_account: String,
    kind: CardKind,
}

impl Card {
    pub(crate) fn debit(
        card_number: impl Into<String>,
        linked_account: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            linked_account: linked_account.into(),
            kind: CardKind::Debit,
        }
    }

    pub(crate) fn credit(
        card_number: impl Into<String>,
        linked_account: impl Into<String>,
        credit_limit: f64,
    ) -> BankResult<Self> {
        if !(credit_limit >= 0.0) {
            return Err(BankError::Validation(format!(
                "credit limit must be non-negative, got {credit_limit}"
            )));
        }
        Ok(Self {
            card_number: card_number.into(),
            linked_account: linked_account.into(),
            kind: CardKind::Credit {
                credit_limit,
                carried_balance: 0.0,
            },
        })
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn linked_account(&self) -> &str {
        &self.linked_account
    }

    pub fn kind(&self) -> &CardKind {
        &self.kind
    }

    pub fn credit_limit(&self) -> Option<f64> {
        match self.kind {
            CardKind::Credit { credit_limit, .. } => Some(credit_limit),
            CardKind::Debit => None,
        }
    }

    pub fn carried_balance(&self) -> Option<f64> {
        match self.kind {
            CardKind::Credit {
                carried_balance, ..
            } => Some(carried_balance),
            CardKind::Debit => None,
        }
    }

    /// Pays with the card by withdrawing from the linked account. A rejected
    /// withdrawal is absorbed here and surfaces only in the audit log; the
    /// caller cannot observe it. Direct account withdrawal does propagate,
    /// making this the one deliberate containment boundary.
    pub fn pay_with_card(&self, account: &mut Account, amount: f64) {
        match account.withdraw(amount) {
            Ok(()) => {
                info!(card = %self.card_number, amount, "card payment accepted");
            }
            Err(reason) => {
                warn!(card = %self.card_number, amount, %reason, "card payment failed");
            }
        }
    }

    /// Accepts any PIN without verification or storage.
    pub fn change_pin(&self, _new_pin: &str) {
        info!(card = %self.card_number, "PIN changed");
    }

    pub fn set_credit_limit(&mut self, limit: f64) -> BankResult<()> {
        if !(limit >= 0.0) {
            return Err(BankError::Validation(format!(
                "credit limit must be non-negative, got {limit}"
            )));
        }
        match &mut self.kind {
            CardKind::Credit { credit_limit, .. } => {
                *credit_limit = limit;
                info!(card = %self.card_number, limit, "credit limit updated");
                Ok(())
            }
            CardKind::Debit => Err(BankError::UnsupportedOperation {
                operation: "Credit limit",
                target: self.card_number.clone(),
            }),
        }
    }

    /// Adds debt to the card, up to the credit limit.
    pub fn charge(&mut self, amount: f64) -> BankResult<()> {
        ensure_positive(amount)?;
        match &mut self.kind {
            CardKind::Credit {
                credit_limit,
                carried_balance,
            } => {
                let available = *credit_limit - *carried_balance;
                if amount > available {
                    warn!(
                        card = %self.card_number,
                        amount,
                        available,
                        "charge exceeds remaining credit"
                    );
                    return Err(BankError::CreditLimitExceeded {
                        requested: amount,
                        available,
                    });
                }
                *carried_balance += amount;
                info!(
                    card = %self.card_number,
                    amount,
                    carried = *carried_balance,
                    "card charged"
                );
                Ok(())
            }
            CardKind::Debit => Err(BankError::UnsupportedOperation {
                operation: "Card charge",
                target: self.card_number.clone(),
            }),
        }
    }

    /// Pays down carried debt with funds withdrawn from the linked account.
    /// Unlike a card swipe this is a direct account operation, so withdrawal
    /// failures propagate to the caller.
    pub fn pay_balance(&mut self, account: &mut Account, amount: f64) -> BankResult<()> {
        ensure_positive(amount)?;
        match &mut self.kind {
            CardKind::Credit {
                carried_balance, ..
            } => {
                account.withdraw(amount)?;
                *carried_balance -= amount;
                info!(
                    card = %self.card_number,
                    amount,
                    carried = *carried_balance,
                    "card balance paid down"
                );
                Ok(())
            }
            CardKind::Debit => Err(BankError::UnsupportedOperation {
                operation: "Balance payment",
                target: self.card_number.clone(),
            }),
        }
    }

    /// Accrues interest on a positive carried balance and returns the amount
    /// charged. A zero or negative carried balance accrues nothing.
    pub fn charge_interest(&mut self, rate: f64) -> BankResult<f64> {
        match &mut self.kind {
            CardKind::Credit {
                carried_balance, ..
            } => {
                if *carried_balance <= 0.0 {
                    return Ok(0.0);
                }
                let interest = *carried_balance * rate;
                *carried_balance += interest;
                info!(
                    card = %self.card_number,
                    interest,
                    carried = *carried_balance,
                    "card interest charged"
                );
                Ok(interest)
            }
            CardKind::Debit => Err(BankError::UnsupportedOperation {
                operation: "Card interest",
                target: self.card_number.clone(),
            }),
        }
    }
}

impl Identifiable for Card {
    fn id(&self) -> &str {
        &self.card_number
    }
}

impl Displayable for Card {
    fn display_label(&self) -> String {
        let kind = match self.kind {
            CardKind::Debit => "Debit",
            CardKind::Credit { .. } => "Credit",
        };
        format!("{} ({} -> {})", self.card_number, kind, self.linked_account)
    }
}
