use crate::domain::amortization;
use crate::domain::calculation::LoanCalculation;
use crate::domain::loan::{Loan, LoanRequest, LoanTerms};
use crate::domain::ports::{LoanStoreBox, ScheduleCacheBox};
use crate::domain::validator;
use crate::error::{LoanError, Result};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// The main entry point for loan calculations.
///
/// `LoanCalculator` validates a request, then serves it from the result cache,
/// from the loan store, or by computing and persisting a new schedule, in that
/// order. Callers asking for the same terms at the same time are funnelled
/// through one async mutex per key, so at most one of them computes; the
/// store's own uniqueness check covers writers in other processes.
pub struct LoanCalculator {
    store: LoanStoreBox,
    cache: ScheduleCacheBox,
    in_flight: DashMap<LoanTerms, Arc<Mutex<()>>>,
    today: fn() -> NaiveDate,
}

/// A caller's claim on the per-key lock.
///
/// The map entry is removed when the last claim goes away, also when the
/// owning future is dropped while still waiting.
struct InFlight<'a> {
    map: &'a DashMap<LoanTerms, Arc<Mutex<()>>>,
    terms: &'a LoanTerms,
    lock: Option<Arc<Mutex<()>>>,
}

impl<'a> InFlight<'a> {
    fn claim(map: &'a DashMap<LoanTerms, Arc<Mutex<()>>>, terms: &'a LoanTerms) -> Self {
        let lock = Arc::clone(&map.entry(terms.clone()).or_default());
        Self {
            map,
            terms,
            lock: Some(lock),
        }
    }

    async fn lock(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        drop(self.lock.take());
        self.map
            .remove_if(self.terms, |_, lock| Arc::strong_count(lock) == 1);
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl LoanCalculator {
    /// Creates a new `LoanCalculator` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - Where loans and their schedules are persisted.
    /// * `cache` - Result cache consulted before the store.
    pub fn new(store: LoanStoreBox, cache: ScheduleCacheBox) -> Self {
        Self {
            store,
            cache,
            in_flight: DashMap::new(),
            today: local_today,
        }
    }

    /// Replaces the clock used to stamp new loans.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Returns the schedule for the requested terms, creating it on first use.
    ///
    /// Identical requests always observe the same monthly payment and
    /// schedule, whether they arrive one after another or concurrently.
    #[instrument(skip_all, fields(key = tracing::field::Empty))]
    pub async fn calculate(&self, request: &LoanRequest) -> Result<LoanCalculation> {
        let terms = validator::validate(request)?;
        let key = terms.cache_key();
        tracing::Span::current().record("key", key.as_str());

        if let Some(cached) = self.cache.get(&key).await {
            debug!("cache hit");
            return Ok(cached);
        }
        debug!("cache miss");

        let claim = InFlight::claim(&self.in_flight, &terms);
        let _guard = claim.lock().await;
        self.fetch_or_create(&terms, &key).await
    }

    /// Drops the cached result for the requested terms.
    ///
    /// The stored loan is kept, so the next `calculate` for these terms is
    /// served from the store with the original schedule.
    #[instrument(skip_all)]
    pub async fn evict(&self, request: &LoanRequest) -> Result<bool> {
        let terms = validator::validate(request)?;
        let evicted = self.cache.evict(&terms.cache_key()).await;
        debug!(key = %terms.cache_key(), evicted, "cache eviction");
        Ok(evicted)
    }

    async fn fetch_or_create(&self, terms: &LoanTerms, key: &str) -> Result<LoanCalculation> {
        // A caller that held the lock before us may have filled the cache.
        if let Some(cached) = self.cache.get(key).await {
            return Ok(cached);
        }

        let loan = match self.store.find_by_key(terms).await? {
            Some(loan) => {
                debug!(id = %loan.id, "store hit");
                loan
            }
            None => self.create(terms).await?,
        };

        let calculation = LoanCalculation::from(&loan);
        self.cache.put(key, calculation.clone()).await;
        Ok(calculation)
    }

    async fn create(&self, terms: &LoanTerms) -> Result<Loan> {
        let monthly_payment = amortization::monthly_payment(terms);
        let created_at = (self.today)();
        let schedule = amortization::schedule(terms, monthly_payment, created_at);
        let loan = Loan::new(terms.clone(), monthly_payment, created_at, schedule);

        match self.store.save(loan).await {
            Ok(saved) => {
                info!(id = %saved.id, %monthly_payment, "created loan");
                Ok(saved)
            }
            Err(LoanError::DuplicateLoan(key)) => {
                warn!(%key, "loan was created concurrently, using the stored one");
                self.store.find_by_key(terms).await?.ok_or_else(|| {
                    LoanError::store(format!("loan {key} missing after duplicate insert"))
                })
            }
            Err(e) => Err(e),
        }
    }
}
