use crate::domain::loan::{Loan, LoanTerms, PaymentScheduleEntry};
use crate::domain::ports::LoanStore;
use crate::error::{LoanError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Column Family for loan headers.
pub const CF_LOANS: &str = "loans";
/// Column Family for the schedule owned by each loan.
pub const CF_SCHEDULES: &str = "schedules";

/// Loan row without its schedule, as stored in [`CF_LOANS`].
#[derive(Serialize, Deserialize)]
struct LoanRecord {
    id: Uuid,
    terms: LoanTerms,
    monthly_payment: Decimal,
    created_at: NaiveDate,
}

/// A persistent loan store implementation using RocksDB.
///
/// A loan header and its schedule live in separate Column Families under the
/// same key (the loan's cache key) and are always written and read together.
/// Inserts are serialized through an async mutex so the existence check and
/// the write form a single step within this process.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("loans" and "schedules") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_loans = ColumnFamilyDescriptor::new(CF_LOANS, Options::default());
        let cf_schedules = ColumnFamilyDescriptor::new(CF_SCHEDULES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_loans, cf_schedules])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| LoanError::store(format!("{name} column family not found")))
    }
}

#[async_trait]
impl LoanStore for RocksDBStore {
    async fn find_by_key(&self, terms: &LoanTerms) -> Result<Option<Loan>> {
        let key = terms.cache_key();

        let Some(header) = self.db.get_cf(self.cf(CF_LOANS)?, key.as_bytes())? else {
            return Ok(None);
        };
        let record: LoanRecord = serde_json::from_slice(&header)?;

        let entries = self
            .db
            .get_cf(self.cf(CF_SCHEDULES)?, key.as_bytes())?
            .ok_or_else(|| LoanError::store(format!("schedule missing for loan {key}")))?;
        let schedule: Vec<PaymentScheduleEntry> = serde_json::from_slice(&entries)?;

        Ok(Some(Loan {
            id: record.id,
            terms: record.terms,
            monthly_payment: record.monthly_payment,
            created_at: record.created_at,
            schedule,
        }))
    }

    async fn save(&self, loan: Loan) -> Result<Loan> {
        let key = loan.terms.cache_key();
        let _guard = self.write_lock.lock().await;

        let cf_loans = self.cf(CF_LOANS)?;
        let cf_schedules = self.cf(CF_SCHEDULES)?;

        // Just check if the key exists without retrieving the value
        if self.db.get_pinned_cf(cf_loans, key.as_bytes())?.is_some() {
            return Err(LoanError::DuplicateLoan(key));
        }

        let record = LoanRecord {
            id: loan.id,
            terms: loan.terms.clone(),
            monthly_payment: loan.monthly_payment,
            created_at: loan.created_at,
        };
        let mut batch = WriteBatch::default();
        batch.put_cf(cf_loans, key.as_bytes(), serde_json::to_vec(&record)?);
        batch.put_cf(cf_schedules, key.as_bytes(), serde_json::to_vec(&loan.schedule)?);
        self.db.write(batch)?;

        Ok(loan)
    }
}
