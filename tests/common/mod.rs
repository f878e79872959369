#![allow(dead_code)]

use loancalc::domain::loan::LoanRequest;
use rand::Rng;
use rust_decimal::Decimal;
use std::io::Error;
use std::path::Path;

pub fn generate_requests_csv(path: &Path, rows: &[(&str, &str, &str)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["loanAmount", "interestRate", "term"])?;
    for (amount, rate, term) in rows {
        wtr.write_record([amount, rate, term])?;
    }

    wtr.flush()?;
    Ok(())
}

/// A valid request: 10,000.00 to 1,000,000.00, 0% to 15%, 1 to 360 months.
pub fn random_request<R: Rng>(rng: &mut R) -> LoanRequest {
    let amount = Decimal::new(rng.gen_range(1_000_000..=100_000_000), 2);
    let rate = Decimal::new(rng.gen_range(0..=1_500), 2);
    let term = rng.gen_range(1..=360);
    LoanRequest::new(amount, rate, term)
}

/// Same as [`random_request`] with the rate pinned to zero.
pub fn random_zero_rate_request<R: Rng>(rng: &mut R) -> LoanRequest {
    let amount = Decimal::new(rng.gen_range(1_000_000..=100_000_000), 2);
    let term = rng.gen_range(1..=360);
    LoanRequest::new(amount, Decimal::ZERO, term)
}
