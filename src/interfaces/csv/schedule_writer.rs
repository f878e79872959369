use crate::domain::calculation::LoanCalculation;
use crate::error::Result;
use std::io::Write;

/// Writes the payment schedule of a calculation as CSV.
///
/// Columns: `number,date,totalPayment,interest,principal,remainingBalance`.
pub struct ScheduleWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ScheduleWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_schedule(&mut self, calculation: &LoanCalculation) -> Result<()> {
        for item in &calculation.payments {
            self.writer.serialize(item)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
