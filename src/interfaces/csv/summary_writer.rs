use crate::domain::calculation::LoanCalculation;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One output row of a batch run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanSummary {
    loan_amount: Decimal,
    interest_rate: Decimal,
    term: usize,
    monthly_payment: Decimal,
    total_interest: Decimal,
}

impl From<&LoanCalculation> for LoanSummary {
    fn from(calculation: &LoanCalculation) -> Self {
        Self {
            loan_amount: calculation.loan_amount,
            interest_rate: calculation.interest_rate,
            term: calculation.payments.len(),
            monthly_payment: calculation.monthly_payment,
            total_interest: calculation.total_interest(),
        }
    }
}

/// Writes one summary line per calculation:
/// `loanAmount,interestRate,term,monthlyPayment,totalInterest`.
///
/// Rows are written as they come; call `flush` once the batch is done.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_summary(&mut self, calculation: &LoanCalculation) -> Result<()> {
        self.writer.serialize(LoanSummary::from(calculation))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
