use super::loan::{Loan, PaymentScheduleEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The answer to a loan calculation request.
///
/// This is what callers receive and what the result cache holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanCalculation {
    #[schema(example = "100000")]
    pub loan_amount: Decimal,
    #[schema(example = "5.5")]
    pub interest_rate: Decimal,
    /// Level payment, rounded half-up to cents.
    #[schema(example = "567.79")]
    pub monthly_payment: Decimal,
    /// One entry per month, in payment order.
    pub payments: Vec<PaymentScheduleItem>,
}

/// One month of a payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScheduleItem {
    pub number: u32,
    /// `YYYY-MM-DD`
    #[schema(example = "2024-02-15")]
    pub date: String,
    pub total_payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub remaining_balance: Decimal,
}

impl LoanCalculation {
    pub fn total_interest(&self) -> Decimal {
        self.payments.iter().map(|item| item.interest).sum()
    }
}

impl From<&PaymentScheduleEntry> for PaymentScheduleItem {
    fn from(entry: &PaymentScheduleEntry) -> Self {
        Self {
            number: entry.payment_number,
            date: entry.payment_date.format("%Y-%m-%d").to_string(),
            total_payment: entry.total_payment,
            interest: entry.interest,
            principal: entry.principal,
            remaining_balance: entry.remaining_balance,
        }
    }
}

impl From<&Loan> for LoanCalculation {
    fn from(loan: &Loan) -> Self {
        Self {
            loan_amount: loan.terms.amount(),
            interest_rate: loan.terms.annual_rate_percent(),
            monthly_payment: loan.monthly_payment,
            payments: loan.schedule.iter().map(PaymentScheduleItem::from).collect(),
        }
    }
}
