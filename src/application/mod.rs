//! Application layer orchestrating validation, the amortization engine,
//! the loan store and the result cache.
//!
//! This module defines the `LoanCalculator` which acts as the primary entry
//! point for calculation requests from every interface.

pub mod calculator;
