use super::loan::{LoanRequest, LoanTerms};
use crate::error::{LoanError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest accepted principal. Keeps every intermediate product of the
/// schedule inside the 96-bit decimal range.
pub const MAX_LOAN_AMOUNT: Decimal = dec!(1000000000000000000);
/// Largest accepted annual rate, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(1000);
/// Largest accepted term: one hundred years of monthly payments.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Checks a request and turns it into [`LoanTerms`].
///
/// Amount is checked first, then rate, then term; the first failure wins.
pub fn validate(request: &LoanRequest) -> Result<LoanTerms> {
    let amount = request
        .loan_amount
        .filter(|amount| *amount > Decimal::ZERO && *amount <= MAX_LOAN_AMOUNT)
        .ok_or(LoanError::InvalidAmount)?;

    let rate = request
        .interest_rate
        .filter(|rate| *rate >= Decimal::ZERO && *rate <= MAX_ANNUAL_RATE_PERCENT)
        .ok_or(LoanError::InvalidRate)?;

    let term = request
        .term
        .and_then(|term| u32::try_from(term).ok())
        .filter(|term| (1..=MAX_TERM_MONTHS).contains(term))
        .ok_or(LoanError::InvalidTerm)?;

    Ok(LoanTerms::new(amount, rate, term))
}
