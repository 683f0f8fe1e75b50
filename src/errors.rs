use thiserror::Error;

/// Error type that captures ledger rule violations and registry failures.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },
    #[error("Withdrawal of {requested:.2} would leave {remaining:.2}, below the minimum balance of {minimum:.2}")]
    BelowMinimumBalance {
        requested: f64,
        remaining: f64,
        minimum: f64,
    },
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Loan not found: {0}")]
    LoanNotFound(String),
    #[error("Mortgage not found: {0}")]
    MortgageNotFound(String),
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),
    #[error("Identifier already registered: {0}")]
    DuplicateId(String),
    #[error("Amount must be positive, got {0:.2}")]
    NonPositiveAmount(f64),
    #[error("Charge of {requested:.2} exceeds remaining credit of {available:.2}")]
    CreditLimitExceeded { requested: f64, available: f64 },
    #[error("{operation} is not supported by {target}")]
    UnsupportedOperation {
        operation: &'static str,
        target: String,
    },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type BankResult<T> = Result<T, BankError>;
