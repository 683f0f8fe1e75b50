use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::info;

use crate::config::Config;
use crate::domain::{
    Account, AccountKind, AccountType, Card, Displayable, Identifiable, Loan, Mortgage,
    NamedEntity,
};
use crate::errors::{BankError, BankResult};

/// Registry that owns every account, loan, mortgage, and card for the life of
/// the process. It is the sole creation point for all entities, and the seam
/// to put a lock around if the crate is ever shared between tellers.
pub struct Bank {
    accounts: BTreeMap<String, Account>,
    loans: BTreeMap<String, Loan>,
    mortgages: BTreeMap<String, Mortgage>,
    cards: BTreeMap<String, Card>,
    config: Config,
}

impl Bank {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            accounts: BTreeMap::new(),
            loans: BTreeMap::new(),
            mortgages: BTreeMap::new(),
            cards: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opens an account of the variant named by `account_type` (one of
    /// `savings`, `checking`, `tfsa`, `rrsp`). The initial deposit becomes
    /// the opening balance directly, without a transaction record.
    pub fn create_account(
        &mut self,
        account_type: &str,
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        initial_deposit: f64,
    ) -> BankResult<()> {
        let account_type = AccountType::from_str(account_type)?;
        let account_number = account_number.into();
        let holder_name = holder_name.into();
        if !(initial_deposit >= 0.0) {
            return Err(BankError::Validation(format!(
                "opening balance must be non-negative, got {initial_deposit}"
            )));
        }
        let minimum_balance = self.config.default_minimum_balance;
        let kind = match account_type {
            AccountType::Savings => AccountKind::Savings { minimum_balance },
            AccountType::Checking => AccountKind::Checking,
            AccountType::Tfsa => AccountKind::TaxFreeSavings { minimum_balance },
            AccountType::Rrsp => AccountKind::RegisteredRetirementSavings {
                minimum_balance,
                contribution_room: 0.0,
            },
        };
        let account = Account::new(kind, account_number, holder_name.clone(), initial_deposit);
        let label = account.display_label();
        register(&mut self.accounts, account)?;
        info!(account = %label, holder = %holder_name, "account created");
        Ok(())
    }

    pub fn create_loan(
        &mut self,
        loan_id: impl Into<String>,
        borrower_name: impl Into<String>,
        principal: f64,
        interest_rate: f64,
        term_years: u32,
    ) -> BankResult<()> {
        let loan = Loan::new(loan_id, borrower_name, principal, interest_rate, term_years)?;
        let label = loan.display_label();
        let borrower = loan.name().to_string();
        register(&mut self.loans, loan)?;
        info!(loan = %label, borrower = %borrower, "loan created");
        Ok(())
    }

    pub fn create_mortgage(
        &mut self,
        mortgage_id: impl Into<String>,
        borrower_name: impl Into<String>,
        principal: f64,
        interest_rate: f64,
        term_years: u32,
        property_address: impl Into<String>,
    ) -> BankResult<()> {
        let mortgage = Mortgage::new(
            mortgage_id,
            borrower_name,
            principal,
            interest_rate,
            term_years,
            property_address,
        )?;
        let label = mortgage.display_label();
        let borrower = mortgage.name().to_string();
        register(&mut self.mortgages, mortgage)?;
        info!(mortgage = %label, borrower = %borrower, "mortgage created");
        Ok(())
    }

    /// Looks up an account; absent numbers yield `None`, never an error.
    pub fn get_account(&self, account_number: &str) -> Option<&Account> {
        self.accounts.get(account_number)
    }

    /// Mutable access for account operations (deposit, withdraw, e-transfer).
    pub fn account_mut(&mut self, account_number: &str) -> Option<&mut Account> {
        self.accounts.get_mut(account_number)
    }

    pub fn get_loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.get(loan_id)
    }

    pub fn get_mortgage(&self, mortgage_id: &str) -> Option<&Mortgage> {
        self.mortgages.get(mortgage_id)
    }

    pub fn get_card(&self, card_number: &str) -> Option<&Card> {
        self.cards.get(card_number)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub fn mortgages(&self) -> impl Iterator<Item = &Mortgage> {
        self.mortgages.values()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Accrues the configured savings interest on an account.
    pub fn apply_interest(&mut self, account_number: &str) -> BankResult<f64> {
        let rate = self.config.savings_interest_rate;
        self.accounts
            .get_mut(account_number)
            .ok_or_else(|| BankError::AccountNotFound(account_number.to_string()))?
            .apply_interest(rate)
    }

    pub fn issue_debit_card(
        &mut self,
        card_number: impl Into<String>,
        account_number: impl Into<String>,
    ) -> BankResult<()> {
        let account_number = account_number.into();
        if !self.accounts.contains_key(&account_number) {
            return Err(BankError::AccountNotFound(account_number));
        }
        let card = Card::debit(card_number, account_number);
        let label = card.display_label();
        register(&mut self.cards, card)?;
        info!(card = %label, "debit card issued");
        Ok(())
    }

    pub fn issue_credit_card(
        &mut self,
        card_number: impl Into<String>,
        account_number: impl Into<String>,
        credit_limit: f64,
    ) -> BankResult<()> {
        let account_number = account_number.into();
        if !self.accounts.contains_key(&account_number) {
            return Err(BankError::AccountNotFound(account_number));
        }
        let card = Card::credit(card_number, account_number, credit_limit)?;
        let label = card.display_label();
        register(&mut self.cards, card)?;
        info!(card = %label, "credit card issued");
        Ok(())
    }

    /// Card-initiated payment against the linked account. Lookup failures are
    /// real errors; a rejected withdrawal is absorbed by the card contract
    /// and visible only in the audit log.
    pub fn pay_with_card(&mut self, card_number: &str, amount: f64) -> BankResult<()> {
        let card = self
            .cards
            .get(card_number)
            .ok_or_else(|| BankError::CardNotFound(card_number.to_string()))?;
        let account = self
            .accounts
            .get_mut(card.linked_account())
            .ok_or_else(|| BankError::AccountNotFound(card.linked_account().to_string()))?;
        card.pay_with_card(account, amount);
        Ok(())
    }

    pub fn change_card_pin(&self, card_number: &str, new_pin: &str) -> BankResult<()> {
        let card = self
            .cards
            .get(card_number)
            .ok_or_else(|| BankError::CardNotFound(card_number.to_string()))?;
        card.change_pin(new_pin);
        Ok(())
    }

    pub fn set_credit_limit(&mut self, card_number: &str, limit: f64) -> BankResult<()> {
        self.card_mut(card_number)?.set_credit_limit(limit)
    }

    /// Adds debt to a credit card, up to its limit.
    pub fn charge_card(&mut self, card_number: &str, amount: f64) -> BankResult<()> {
        self.card_mut(card_number)?.charge(amount)
    }

    /// Pays down credit card debt with funds withdrawn from the linked
    /// account; withdrawal failures propagate.
    pub fn pay_card_balance(&mut self, card_number: &str, amount: f64) -> BankResult<()> {
        let card = self
            .cards
            .get_mut(card_number)
            .ok_or_else(|| BankError::CardNotFound(card_number.to_string()))?;
        let linked = card.linked_account().to_string();
        let account = self
            .accounts
            .get_mut(&linked)
            .ok_or(BankError::AccountNotFound(linked))?;
        card.pay_balance(account, amount)
    }

    /// Accrues the configured credit card interest on carried debt.
    pub fn charge_card_interest(&mut self, card_number: &str) -> BankResult<f64> {
        let rate = self.config.credit_card_interest_rate;
        self.card_mut(card_number)?.charge_interest(rate)
    }

    pub fn make_loan_payment(&mut self, loan_id: &str, amount: f64) -> BankResult<f64> {
        self.loans
            .get_mut(loan_id)
            .ok_or_else(|| BankError::LoanNotFound(loan_id.to_string()))?
            .make_payment(amount)
    }

    pub fn make_mortgage_payment(&mut self, mortgage_id: &str, amount: f64) -> BankResult<f64> {
        self.mortgages
            .get_mut(mortgage_id)
            .ok_or_else(|| BankError::MortgageNotFound(mortgage_id.to_string()))?
            .make_payment(amount)
    }

    fn card_mut(&mut self, card_number: &str) -> BankResult<&mut Card> {
        self.cards
            .get_mut(card_number)
            .ok_or_else(|| BankError::CardNotFound(card_number.to_string()))
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts an entity keyed by its identifier, rejecting reuse.
fn register<T: Identifiable>(map: &mut BTreeMap<String, T>, entity: T) -> BankResult<()> {
    let id = entity.id().to_string();
    if map.contains_key(&id) {
        return Err(BankError::DuplicateId(id));
    }
    map.insert(id, entity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;

    #[test]
    fn creates_each_account_variant() {
        let mut bank = Bank::new();
        bank.create_account("savings", "S1", "Alice", 500.0).unwrap();
        bank.create_account("checking", "C1", "Bob", 0.0).unwrap();
        bank.create_account("tfsa", "T1", "Carol", 250.0).unwrap();
        bank.create_account("rrsp", "R1", "Dave", 250.0).unwrap();

        assert_eq!(bank.accounts().count(), 4);
        let savings = bank.get_account("S1").unwrap();
        assert_eq!(savings.kind().minimum_balance(), Some(100.0));
        let rrsp = bank.get_account("R1").unwrap();
        assert_eq!(rrsp.kind().contribution_room(), Some(0.0));
        assert!(bank.get_account("C1").unwrap().kind().minimum_balance().is_none());
    }

    #[test]
    fn unknown_account_type_fails_and_registers_nothing() {
        let mut bank = Bank::new();
        let err = bank
            .create_account("chequing", "X1", "Eve", 10.0)
            .unwrap_err();
        assert!(matches!(err, BankError::UnknownAccountType(_)));
        assert!(bank.get_account("X1").is_none());
    }

    #[test]
    fn duplicate_account_number_is_rejected() {
        let mut bank = Bank::new();
        bank.create_account("savings", "S1", "Alice", 500.0).unwrap();
        let err = bank
            .create_account("checking", "S1", "Mallory", 0.0)
            .unwrap_err();
        assert!(matches!(err, BankError::DuplicateId(id) if id == "S1"));
        // The original registration is untouched.
        assert_eq!(bank.get_account("S1").unwrap().holder_name(), "Alice");
    }

    #[test]
    fn opening_balance_leaves_no_history_record() {
        let mut bank = Bank::new();
        bank.create_account("savings", "S1", "Alice", 500.0).unwrap();
        let account = bank.get_account("S1").unwrap();
        assert_eq!(account.balance(), 500.0);
        assert!(account.transaction_history().is_empty());
    }

    #[test]
    fn negative_opening_balance_is_rejected() {
        let mut bank = Bank::new();
        assert!(matches!(
            bank.create_account("savings", "S1", "Alice", -1.0),
            Err(BankError::Validation(_))
        ));
    }

    #[test]
    fn get_account_on_unregistered_number_returns_none() {
        let bank = Bank::new();
        assert!(bank.get_account("missing").is_none());
    }

    #[test]
    fn loans_and_mortgages_register_and_reject_duplicates() {
        let mut bank = Bank::new();
        bank.create_loan("L1", "Carol", 10_000.0, 0.05, 5).unwrap();
        assert!(matches!(
            bank.create_loan("L1", "Carol", 1.0, 0.0, 1),
            Err(BankError::DuplicateId(_))
        ));

        bank.create_mortgage("M1", "Dave", 250_000.0, 0.04, 25, "12 Elm St")
            .unwrap();
        assert!(matches!(
            bank.create_mortgage("M1", "Dave", 1.0, 0.0, 1, "12 Elm St"),
            Err(BankError::DuplicateId(_))
        ));
        assert_eq!(bank.get_mortgage("M1").unwrap().property_address(), "12 Elm St");
    }

    #[test]
    fn loan_payments_route_through_registry() {
        let mut bank = Bank::new();
        bank.create_loan("L1", "Carol", 10_000.0, 0.05, 5).unwrap();
        assert_eq!(bank.make_loan_payment("L1", 2_000.0).unwrap(), 8_000.0);
        assert!(matches!(
            bank.make_loan_payment("L9", 1.0),
            Err(BankError::LoanNotFound(_))
        ));
    }

    #[test]
    fn interest_uses_configured_rate() {
        let mut bank = Bank::with_config(Config {
            savings_interest_rate: 0.10,
            ..Config::default()
        });
        bank.create_account("savings", "S1", "Alice", 1_000.0).unwrap();
        assert_eq!(bank.apply_interest("S1").unwrap(), 100.0);
        assert_eq!(bank.get_account("S1").unwrap().balance(), 1_100.0);
        let history = bank.get_account("S1").unwrap().transaction_history();
        assert_eq!(history[0].kind, TransactionKind::InterestApplied);
    }

    #[test]
    fn cards_require_an_existing_linked_account() {
        let mut bank = Bank::new();
        assert!(matches!(
            bank.issue_debit_card("D-1", "C1"),
            Err(BankError::AccountNotFound(_))
        ));

        bank.create_account("checking", "C1", "Bob", 100.0).unwrap();
        bank.issue_debit_card("D-1", "C1").unwrap();
        assert!(matches!(
            bank.issue_credit_card("D-1", "C1", 500.0),
            Err(BankError::DuplicateId(_))
        ));
    }

    #[test]
    fn card_operations_route_to_linked_account() {
        let mut bank = Bank::new();
        bank.create_account("checking", "C1", "Bob", 100.0).unwrap();
        bank.issue_debit_card("D-1", "C1").unwrap();

        bank.pay_with_card("D-1", 30.0).unwrap();
        assert_eq!(bank.get_account("C1").unwrap().balance(), 70.0);

        assert!(matches!(
            bank.pay_with_card("missing", 1.0),
            Err(BankError::CardNotFound(_))
        ));
    }

    #[test]
    fn credit_card_lifecycle_through_registry() {
        let mut bank = Bank::new();
        bank.create_account("checking", "C1", "Bob", 500.0).unwrap();
        bank.issue_credit_card("X-1", "C1", 300.0).unwrap();

        bank.charge_card("X-1", 200.0).unwrap();
        assert_eq!(bank.get_card("X-1").unwrap().carried_balance(), Some(200.0));

        let interest = bank.charge_card_interest("X-1").unwrap();
        assert_eq!(interest, 4.0);

        bank.pay_card_balance("X-1", 104.0).unwrap();
        assert_eq!(bank.get_card("X-1").unwrap().carried_balance(), Some(100.0));
        assert_eq!(bank.get_account("C1").unwrap().balance(), 396.0);

        bank.set_credit_limit("X-1", 1_000.0).unwrap();
        assert_eq!(bank.get_card("X-1").unwrap().credit_limit(), Some(1_000.0));
    }

    #[test]
    fn change_pin_accepts_any_card_that_exists() {
        let mut bank = Bank::new();
        bank.create_account("checking", "C1", "Bob", 0.0).unwrap();
        bank.issue_debit_card("D-1", "C1").unwrap();
        bank.change_card_pin("D-1", "4242").unwrap();
        assert!(matches!(
            bank.change_card_pin("missing", "4242"),
            Err(BankError::CardNotFound(_))
        ));
    }
}
