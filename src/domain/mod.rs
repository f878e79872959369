//! Loan domain: request and aggregate types, validation, the amortization
//! engine and the ports the application layer depends on.

pub mod amortization;
pub mod calculation;
pub mod loan;
pub mod ports;
pub mod validator;
