use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::ensure_positive;
use crate::errors::{BankError, BankResult};

/// An installment loan. The outstanding balance starts at the principal and
/// only moves through [`Loan::make_payment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    loan_id: String,
    borrower_name: String,
    principal: f64,
    interest_rate: f64,
    term_years: u32,
    balance: f64,
}

impl Loan {
    pub(crate) fn new(
        loan_id: impl Into<String>,
        borrower_name: impl Into<String>,
        principal: f64,
        interest_rate: f64,
        term_years: u32,
    ) -> BankResult<Self> {
        if !(principal > 0.0) {
            return Err(BankError::Validation(format!(
                "loan principal must be positive, got {principal}"
            )));
        }
        if !(interest_rate >= 0.0) {
            return Err(BankError::Validation(format!(
                "interest rate must be non-negative, got {interest_rate}"
            )));
        }
        if term_years == 0 {
            return Err(BankError::Validation(
                "loan term must be at least one year".into(),
            ));
        }
        Ok(Self {
            loan_id: loan_id.into(),
            borrower_name: borrower_name.into(),
            principal,
            interest_rate,
            term_years,
            balance: principal,
        })
    }

    pub fn loan_id(&self) -> &str {
        &self.loan_id
    }

    pub fn borrower_name(&self) -> &str {
        &self.borrower_name
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Applies a payment and returns the remaining balance. Overpayment is
    /// permitted and drives the balance negative (a credit to the borrower).
    pub fn make_payment(&mut self, amount: f64) -> BankResult<f64> {
        ensure_positive(amount)?;
        self.balance -= amount;
        info!(
            loan = %self.loan_id,
            amount,
            balance = self.balance,
            "loan payment received"
        );
        Ok(self.balance)
    }
}

impl Identifiable for Loan {
    fn id(&self) -> &str {
        &self.loan_id
    }
}

impl NamedEntity for Loan {
    fn name(&self) -> &str {
        &self.borrower_name
    }
}

impl Displayable for Loan {
    fn display_label(&self) -> String {
        format!("{} ({:.2} over {}y)", self.loan_id, self.principal, self.term_years)
    }
}

/// A loan secured against a property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mortgage {
    loan: Loan,
    property_address: String,
}

impl Mortgage {
    pub(crate) fn new(
        mortgage_id: impl Into<String>,
        borrower_name: impl Into<String>,
        principal: f64,
        interest_rate: f64,
        term_years: u32,
        property_address: impl Into<String>,
    ) -> BankResult<Self> {
        Ok(Self {
            loan: Loan::new(mortgage_id, borrower_name, principal, interest_rate, term_years)?,
            property_address: property_address.into(),
        })
    }

    pub fn loan(&self) -> &Loan {
        &self.loan
    }

    pub fn property_address(&self) -> &str {
        &self.property_address
    }

    pub fn balance(&self) -> f64 {
        self.loan.balance()
    }

    pub fn make_payment(&mut self, amount: f64) -> BankResult<f64> {
        self.loan.make_payment(amount)
    }
}

impl Identifiable for Mortgage {
    fn id(&self) -> &str {
        self.loan.loan_id()
    }
}

impl NamedEntity for Mortgage {
    fn name(&self) -> &str {
        self.loan.borrower_name()
    }
}

impl Displayable for Mortgage {
    fn display_label(&self) -> String {
        format!("{} ({})", self.loan.loan_id(), self.property_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_starts_at_principal() {
        let loan = Loan::new("L1", "Carol", 10_000.0, 0.05, 5).unwrap();
        assert_eq!(loan.balance(), 10_000.0);
        assert_eq!(loan.principal(), 10_000.0);
    }

    #[test]
    fn loan_construction_validates_inputs() {
        assert!(matches!(
            Loan::new("L1", "Carol", 0.0, 0.05, 5),
            Err(BankError::Validation(_))
        ));
        assert!(matches!(
            Loan::new("L1", "Carol", 100.0, -0.01, 5),
            Err(BankError::Validation(_))
        ));
        assert!(matches!(
            Loan::new("L1", "Carol", 100.0, 0.05, 0),
            Err(BankError::Validation(_))
        ));
    }

    #[test]
    fn payments_reduce_balance_and_allow_overpayment() {
        let mut loan = Loan::new("L1", "Carol", 10_000.0, 0.05, 5).unwrap();
        assert_eq!(loan.make_payment(2_000.0).unwrap(), 8_000.0);
        assert_eq!(loan.make_payment(9_000.0).unwrap(), -1_000.0);
        assert_eq!(loan.balance(), -1_000.0);
    }

    #[test]
    fn payment_rejects_non_positive_amounts() {
        let mut loan = Loan::new("L1", "Carol", 500.0, 0.05, 1).unwrap();
        assert!(matches!(
            loan.make_payment(-10.0),
            Err(BankError::NonPositiveAmount(_))
        ));
        assert_eq!(loan.balance(), 500.0);
    }

    #[test]
    fn mortgage_delegates_payments_to_inner_loan() {
        let mut mortgage =
            Mortgage::new("M1", "Dave", 250_000.0, 0.04, 25, "12 Elm St").unwrap();
        assert_eq!(mortgage.property_address(), "12 Elm St");
        assert_eq!(mortgage.make_payment(50_000.0).unwrap(), 200_000.0);
        assert_eq!(mortgage.balance(), 200_000.0);
    }

    #[test]
    fn mortgage_inherits_loan_validation() {
        assert!(matches!(
            Mortgage::new("M1", "Dave", -1.0, 0.04, 25, "12 Elm St"),
            Err(BankError::Validation(_))
        ));
    }
}
