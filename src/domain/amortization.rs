//! Annuity loan arithmetic.
//!
//! Everything here is a pure function of validated [`LoanTerms`]: no I/O, no
//! shared state. All rounding is half-up (ties away from zero) on
//! fixed-point decimals.

use super::loan::{LoanTerms, PaymentScheduleEntry};
use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

const MONTHS_IN_YEAR: Decimal = dec!(12);
const PERCENTAGE_DIVISOR: Decimal = dec!(100);

/// Fractional digits kept for intermediate rates.
pub const RATE_SCALE: u32 = 10;
/// Fractional digits of every monetary result.
pub const MONEY_SCALE: u32 = 2;

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Rounds to cents and pads the scale, so `0` becomes `0.00`.
pub fn round_money(value: Decimal) -> Decimal {
    round_half_up(value, MONEY_SCALE)
}

/// Annual percentage to monthly rate, rounded at each division step.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    let annual = round_half_up(annual_rate_percent / PERCENTAGE_DIVISOR, RATE_SCALE);
    round_half_up(annual / MONTHS_IN_YEAR, RATE_SCALE)
}

/// Level monthly payment: `P * r * (1 + r)^n / ((1 + r)^n - 1)`.
///
/// A zero monthly rate degenerates to `P / n`.
pub fn monthly_payment(terms: &LoanTerms) -> Decimal {
    let amount = terms.amount();
    let rate = monthly_rate(terms.annual_rate_percent());

    if rate.is_zero() {
        return round_money(amount / Decimal::from(terms.term_months()));
    }

    let payment = match (Decimal::ONE + rate).checked_powu(u64::from(terms.term_months())) {
        Some(factor) => {
            let denominator = factor.saturating_sub(Decimal::ONE);
            amount
                .checked_mul(rate)
                .and_then(|value| value.checked_mul(factor))
                .and_then(|numerator| numerator.checked_div(denominator))
                .or_else(|| {
                    factor
                        .checked_div(denominator)
                        .map(|ratio| amount.saturating_mul(rate).saturating_mul(ratio))
                })
                .unwrap_or_else(|| amount.saturating_mul(rate))
        }
        // (1 + r)^n past the decimal range: factor / (factor - 1) is 1.
        None => amount.saturating_mul(rate),
    };

    round_money(payment)
}

/// Builds the full schedule for `terms`, paying `monthly_payment` each month.
///
/// The final entry absorbs the accumulated rounding drift: its principal is
/// whatever balance remains and the balance after it is exactly zero.
pub fn schedule(
    terms: &LoanTerms,
    monthly_payment: Decimal,
    created_at: NaiveDate,
) -> Vec<PaymentScheduleEntry> {
    let rate = monthly_rate(terms.annual_rate_percent());
    let term = terms.term_months();
    let mut remaining = terms.amount();
    let mut entries = Vec::with_capacity(term as usize);

    for number in 1..=term {
        let interest = round_money(remaining.saturating_mul(rate));

        let (principal, balance_after, total_payment) = if number == term {
            (
                remaining,
                round_money(Decimal::ZERO),
                remaining.saturating_add(interest),
            )
        } else {
            let principal = round_money(monthly_payment.saturating_sub(interest));
            (
                principal,
                round_money(remaining.saturating_sub(principal)),
                monthly_payment,
            )
        };

        entries.push(PaymentScheduleEntry {
            payment_number: number,
            payment_date: payment_date(created_at, number),
            total_payment,
            interest,
            principal,
            remaining_balance: balance_after,
        });

        remaining = balance_after;
    }

    entries
}

/// `created_at` plus `months` calendar months, clamped to the month's end.
pub fn payment_date(created_at: NaiveDate, months: u32) -> NaiveDate {
    created_at
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(amount: Decimal, rate: Decimal, term: u32) -> LoanTerms {
        LoanTerms::new(amount, rate, term)
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_round_money_is_half_up() {
        assert_eq!(round_money(dec!(1.005)).to_string(), "1.01");
        assert_eq!(round_money(dec!(1.004999)).to_string(), "1.00");
        assert_eq!(round_money(dec!(-1.005)).to_string(), "-1.01");
        assert_eq!(round_money(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(5.5)), dec!(0.0045833333));
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert!(monthly_rate(Decimal::ZERO).is_zero());
    }

    #[test]
    fn test_monthly_payment_reference_loan() {
        assert_eq!(monthly_payment(&terms(dec!(100000), dec!(5.5), 360)), dec!(567.79));
        assert_eq!(monthly_payment(&terms(dec!(1000), dec!(12), 12)), dec!(88.85));
        assert_eq!(monthly_payment(&terms(dec!(10000), dec!(3.75), 60)), dec!(183.04));
    }

    #[test]
    fn test_monthly_payment_zero_rate() {
        assert_eq!(monthly_payment(&terms(dec!(120000), dec!(0), 360)), dec!(333.33));
        assert_eq!(monthly_payment(&terms(dec!(100), dec!(0), 3)), dec!(33.33));
    }

    #[test]
    fn test_monthly_payment_single_period() {
        // One month at 12%: principal plus one month of interest.
        assert_eq!(monthly_payment(&terms(dec!(1000), dec!(12), 1)), dec!(1010.00));
    }

    #[test]
    fn test_monthly_payment_huge_term_converges_to_interest_only() {
        let payment = monthly_payment(&terms(dec!(1000), dec!(12), 100_000));
        assert_eq!(payment, dec!(10.00));
    }

    #[test]
    fn test_largest_accepted_loan_does_not_overflow() {
        use crate::domain::validator::{MAX_ANNUAL_RATE_PERCENT, MAX_LOAN_AMOUNT, MAX_TERM_MONTHS};

        let terms = terms(MAX_LOAN_AMOUNT, MAX_ANNUAL_RATE_PERCENT, MAX_TERM_MONTHS);
        let payment = monthly_payment(&terms);
        // (1 + r)^n leaves the decimal range: the payment is the interest alone.
        assert_eq!(payment, round_money(MAX_LOAN_AMOUNT * monthly_rate(MAX_ANNUAL_RATE_PERCENT)));

        let entries = schedule(&terms, payment, start());
        assert_eq!(entries.len(), MAX_TERM_MONTHS as usize);
        assert_eq!(entries.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_terms_saturate_instead_of_panicking() {
        let huge = Decimal::from_scientific("1e28").unwrap();
        let terms = terms(huge, dec!(120000), 1);
        let payment = monthly_payment(&terms);
        assert!(payment > huge);

        let entries = schedule(&terms, payment, start());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_reference_loan() {
        let terms = terms(dec!(100000), dec!(5.5), 360);
        let entries = schedule(&terms, dec!(567.79), start());

        assert_eq!(entries.len(), 360);

        let first = &entries[0];
        assert_eq!(first.payment_number, 1);
        assert_eq!(first.total_payment, dec!(567.79));
        assert_eq!(first.interest, dec!(458.33));
        assert_eq!(first.principal, dec!(109.46));
        assert_eq!(first.remaining_balance, dec!(99890.54));
        assert_eq!(first.payment_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());

        let second = &entries[1];
        assert_eq!(second.interest, dec!(457.83));
        assert_eq!(second.remaining_balance, dec!(99780.58));

        let last = &entries[359];
        assert_eq!(last.payment_number, 360);
        assert_eq!(last.principal, dec!(564.02));
        assert_eq!(last.interest, dec!(2.59));
        assert_eq!(last.total_payment, dec!(566.61));
        assert_eq!(last.remaining_balance, Decimal::ZERO);
        assert_eq!(last.remaining_balance.to_string(), "0.00");
        assert_eq!(last.payment_date, NaiveDate::from_ymd_opt(2054, 1, 15).unwrap());
    }

    #[test]
    fn test_schedule_zero_rate() {
        let terms = terms(dec!(120000), dec!(0), 360);
        let entries = schedule(&terms, dec!(333.33), start());

        assert!(entries.iter().all(|e| e.interest.is_zero()));
        assert!(entries[..359].iter().all(|e| e.principal == dec!(333.33)));
        assert_eq!(entries[0].remaining_balance, dec!(119666.67));

        // 359 * 333.33 = 119665.47, the final payment closes the remainder.
        let last = &entries[359];
        assert_eq!(last.principal, dec!(334.53));
        assert_eq!(last.total_payment, dec!(334.53));
        assert_eq!(last.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_final_payment_absorbs_drift() {
        let terms = terms(dec!(1000), dec!(12), 12);
        let entries = schedule(&terms, dec!(88.85), start());

        let last = entries.last().unwrap();
        assert_eq!(last.principal, dec!(87.96));
        assert_eq!(last.interest, dec!(0.88));
        assert_eq!(last.total_payment, dec!(88.84));
        assert_eq!(last.remaining_balance, Decimal::ZERO);

        let principal: Decimal = entries.iter().map(|e| e.principal).sum();
        assert_eq!(principal, dec!(1000));
    }

    #[test]
    fn test_schedule_invariants() {
        let terms = terms(dec!(250000), dec!(7.25), 240);
        let payment = monthly_payment(&terms);
        let entries = schedule(&terms, payment, start());

        let mut previous = terms.amount();
        for (index, entry) in entries.iter().enumerate() {
            assert_eq!(entry.payment_number as usize, index + 1);
            assert!(entry.total_payment > Decimal::ZERO);
            assert!((entry.interest + entry.principal - entry.total_payment).abs() <= dec!(0.01));
            assert!(entry.remaining_balance < previous);
            previous = entry.remaining_balance;
        }
        assert_eq!(previous, Decimal::ZERO);
    }

    #[test]
    fn test_single_month_schedule() {
        let terms = terms(dec!(1000), dec!(12), 1);
        let entries = schedule(&terms, dec!(1010.00), start());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].principal, dec!(1000));
        assert_eq!(entries[0].interest, dec!(10.00));
        assert_eq!(entries[0].total_payment, dec!(1010.00));
        assert_eq!(entries[0].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_payment_date_clamps_to_month_end() {
        let end_of_january = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            payment_date(end_of_january, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            payment_date(end_of_january, 13),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
