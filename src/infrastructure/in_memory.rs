use crate::domain::calculation::LoanCalculation;
use crate::domain::loan::{Loan, LoanTerms};
use crate::domain::ports::{LoanStore, ScheduleCache};
use crate::error::{LoanError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory loan store.
///
/// Uses `Arc<RwLock<HashMap<LoanTerms, Loan>>>`; the uniqueness check and the
/// insert happen under the same write lock. Clones share the same map.
#[derive(Default, Clone)]
pub struct InMemoryLoanStore {
    loans: Arc<RwLock<HashMap<LoanTerms, Loan>>>,
}

impl InMemoryLoanStore {
    /// Creates a new, empty in-memory loan store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.loans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.loans.read().await.is_empty()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn find_by_key(&self, terms: &LoanTerms) -> Result<Option<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans.get(terms).cloned())
    }

    async fn save(&self, loan: Loan) -> Result<Loan> {
        let mut loans = self.loans.write().await;
        match loans.entry(loan.terms.clone()) {
            Entry::Occupied(existing) => {
                Err(LoanError::DuplicateLoan(existing.key().cache_key()))
            }
            Entry::Vacant(slot) => Ok(slot.insert(loan).clone()),
        }
    }
}

/// A thread-safe in-memory result cache.
#[derive(Default, Clone)]
pub struct InMemoryScheduleCache {
    entries: Arc<RwLock<HashMap<String, LoanCalculation>>>,
}

impl InMemoryScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleCache for InMemoryScheduleCache {
    async fn get(&self, key: &str) -> Option<LoanCalculation> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, calculation: LoanCalculation) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), calculation);
    }

    async fn evict(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
}

/// Cache that never holds anything, used when caching is switched off.
#[derive(Default, Clone, Copy)]
pub struct NoopScheduleCache;

#[async_trait]
impl ScheduleCache for NoopScheduleCache {
    async fn get(&self, _key: &str) -> Option<LoanCalculation> {
        None
    }

    async fn put(&self, _key: &str, _calculation: LoanCalculation) {}

    async fn evict(&self, _key: &str) -> bool {
        false
    }
}
