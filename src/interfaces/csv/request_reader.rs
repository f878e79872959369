use crate::domain::loan::LoanRequest;
use crate::error::{LoanError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One input row, kept as text until each field is parsed on its own.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestRow {
    loan_amount: Option<String>,
    interest_rate: Option<String>,
    term: Option<String>,
}

impl From<RequestRow> for LoanRequest {
    fn from(row: RequestRow) -> Self {
        Self {
            loan_amount: row.loan_amount.and_then(|v| Decimal::from_str(&v).ok()),
            interest_rate: row.interest_rate.and_then(|v| Decimal::from_str(&v).ok()),
            term: row.term.and_then(|v| v.parse().ok()),
        }
    }
}

/// Reads loan requests from a CSV source with a
/// `loanAmount,interestRate,term` header.
///
/// A field that is empty or not a number becomes `None`, which the validator
/// later reports as the matching `Invalid*` error. Only rows the CSV parser
/// itself cannot read are returned as errors.
pub struct LoanRequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> LoanRequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads requests, one per row.
    pub fn requests(self) -> impl Iterator<Item = Result<LoanRequest>> {
        self.reader
            .into_deserialize::<RequestRow>()
            .map(|result| result.map(LoanRequest::from).map_err(LoanError::from))
    }
}
