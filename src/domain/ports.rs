use super::calculation::LoanCalculation;
use super::loan::{Loan, LoanTerms};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for loans and their schedules, keyed by [`LoanTerms`].
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn find_by_key(&self, terms: &LoanTerms) -> Result<Option<Loan>>;

    /// Persists the loan and its schedule as one unit.
    ///
    /// Fails with `LoanError::DuplicateLoan` when a loan already exists for
    /// the same terms; nothing is written in that case.
    async fn save(&self, loan: Loan) -> Result<Loan>;
}

/// Result cache keyed by [`LoanTerms::cache_key`].
#[async_trait]
pub trait ScheduleCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<LoanCalculation>;
    async fn put(&self, key: &str, calculation: LoanCalculation);
    /// Returns whether an entry was removed.
    async fn evict(&self, key: &str) -> bool;
}

pub type LoanStoreBox = Box<dyn LoanStore>;
pub type ScheduleCacheBox = Box<dyn ScheduleCache>;
