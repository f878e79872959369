//! Amortizing loan calculator.
//!
//! Validates loan requests, computes fixed-payment amortization schedules and
//! serves identical requests from one stored loan through the
//! [`application::calculator::LoanCalculator`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
