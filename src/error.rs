use crate::domain::validator::{MAX_ANNUAL_RATE_PERCENT, MAX_LOAN_AMOUNT, MAX_TERM_MONTHS};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LoanError {
    #[error("Loan amount must be greater than zero and at most {max}", max = MAX_LOAN_AMOUNT)]
    #[diagnostic(code(loancalc::invalid_amount))]
    InvalidAmount,

    #[error(
        "Interest rate must be greater than or equal to zero and at most {max}",
        max = MAX_ANNUAL_RATE_PERCENT
    )]
    #[diagnostic(code(loancalc::invalid_rate))]
    InvalidRate,

    #[error("Term must be greater than zero and at most {max} months", max = MAX_TERM_MONTHS)]
    #[diagnostic(code(loancalc::invalid_term))]
    InvalidTerm,

    #[error("A loan already exists for key {0}")]
    #[diagnostic(code(loancalc::duplicate_loan))]
    DuplicateLoan(String),

    #[error("Store unavailable: {0}")]
    #[diagnostic(code(loancalc::store_unavailable))]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(loancalc::config))]
    Config(String),

    #[error("CSV error: {0}")]
    #[diagnostic(code(loancalc::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(loancalc::io))]
    Io(#[from] std::io::Error),
}

impl LoanError {
    /// True for errors caused by the caller's input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoanError::InvalidAmount | LoanError::InvalidRate | LoanError::InvalidTerm
        )
    }

    /// Stable machine-readable code, shared by the CLI and HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LoanError::InvalidAmount => "INVALID_AMOUNT",
            LoanError::InvalidRate => "INVALID_RATE",
            LoanError::InvalidTerm => "INVALID_TERM",
            LoanError::DuplicateLoan(_) => "DUPLICATE_LOAN",
            LoanError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            LoanError::Config(_) => "CONFIG",
            LoanError::Csv(_) => "CSV",
            LoanError::Io(_) => "IO",
        }
    }

    pub(crate) fn store(message: impl Into<String>) -> Self {
        LoanError::StoreUnavailable(Box::new(std::io::Error::other(message.into())))
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::StoreUnavailable(Box::new(e))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LoanError {
    fn from(e: rocksdb::Error) -> Self {
        LoanError::StoreUnavailable(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
