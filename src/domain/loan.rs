use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Raw loan parameters as received from a caller.
///
/// Every field is optional: a missing or unparseable value is carried as
/// `None` and reported by the validator as the matching `Invalid*` error.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    /// Principal, as a JSON number or string.
    #[serde(default, deserialize_with = "lenient")]
    #[schema(example = "100000")]
    pub loan_amount: Option<Decimal>,
    /// Annual nominal rate as a percentage (5.5 means 5.5%).
    #[serde(default, deserialize_with = "lenient")]
    #[schema(example = "5.5")]
    pub interest_rate: Option<Decimal>,
    /// Term in months. Whole numbers only, given as a number or a string.
    #[serde(default, deserialize_with = "lenient_term")]
    #[schema(example = 360)]
    pub term: Option<i32>,
}

impl LoanRequest {
    pub fn new(loan_amount: Decimal, interest_rate: Decimal, term: i32) -> Self {
        Self {
            loan_amount: Some(loan_amount),
            interest_rate: Some(interest_rate),
            term: Some(term),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Some(value),
        Some(Lenient::Invalid(_)) | None => None,
    })
}

// Read through `Decimal` so that "360", 360 and 360.0 agree and 12.5 does not.
fn lenient_term<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, Decimal>(deserializer)?
        .filter(|term| term.fract().is_zero())
        .and_then(|term| term.to_i32()))
}

/// A validated (amount, rate, term) triple.
///
/// This is both the only input the amortization engine accepts and the
/// natural key of a stored [`Loan`]. Decimals are normalized so numerically
/// equal requests address the same loan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanTerms {
    amount: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
}

impl LoanTerms {
    pub(crate) fn new(amount: Decimal, annual_rate_percent: Decimal, term_months: u32) -> Self {
        Self {
            amount: amount.normalize(),
            annual_rate_percent: annual_rate_percent.normalize(),
            term_months,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn annual_rate_percent(&self) -> Decimal {
        self.annual_rate_percent
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// The string-joined triple used as cache and storage key.
    pub fn cache_key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.amount, self.annual_rate_percent, self.term_months
        )
    }
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub total_payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub remaining_balance: Decimal,
}

/// The persisted aggregate: a loan together with the schedule it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub terms: LoanTerms,
    pub monthly_payment: Decimal,
    pub created_at: NaiveDate,
    pub schedule: Vec<PaymentScheduleEntry>,
}

impl Loan {
    pub fn new(
        terms: LoanTerms,
        monthly_payment: Decimal,
        created_at: NaiveDate,
        schedule: Vec<PaymentScheduleEntry>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            terms,
            monthly_payment,
            created_at,
            schedule,
        }
    }

    /// Sum of the interest portions over the whole schedule.
    pub fn total_interest(&self) -> Decimal {
        self.schedule.iter().map(|entry| entry.interest).sum()
    }
}
