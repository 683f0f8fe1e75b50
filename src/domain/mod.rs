//! Ledger entities: accounts and their variants, loans, mortgages, and cards.
//! No I/O and no registry concerns. Only data types and their
//! invariant-enforcing mutators.

pub mod account;
pub mod card;
pub mod common;
pub mod lending;
pub mod transaction;

pub use account::{Account, AccountDetails, AccountKind, AccountType};
pub use card::{Card, CardKind};
pub use common::{Displayable, Identifiable, NamedEntity};
pub use lending::{Loan, Mortgage};
pub use transaction::{TransactionKind, TransactionRecord};

use crate::errors::{BankError, BankResult};

/// Rejects amounts that are not strictly positive.
pub(crate) fn ensure_positive(amount: f64) -> BankResult<()> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(BankError::NonPositiveAmount(amount))
    }
}
