//! SeatAllocator - optimistic "last seat + 1" allocation.
//!
//! Reads the highest issued seat of a partition, builds the batch up to the
//! ceiling, and hands it to a commit step. The store's uniqueness constraint
//! on `{countryCode, ticketType, eventId, seatNumber}` detects a concurrent
//! allocator that got there first; the loop then re-reads and tries again.

use std::future::Future;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::inventory::{InventoryError, Partition, SeatBatch, SeatRange, TicketTemplate};
use crate::ports::InventoryReader;

/// Default number of commit attempts before giving up on a partition.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub struct SeatAllocator {
    reader: Arc<dyn InventoryReader>,
    max_attempts: u32,
}

impl SeatAllocator {
    pub fn new(reader: Arc<dyn InventoryReader>, max_attempts: u32) -> Self {
        Self {
            reader,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Allocates seats `[last + 1, ceiling]` in `partition`.
    ///
    /// `commit` receives every built batch, including empty ones, and must
    /// persist it atomically. Returns the committed range.
    ///
    /// # Errors
    ///
    /// - `Conflict` when every attempt collided on a seat number
    /// - any other error from the reader or from `commit`, unchanged
    pub async fn allocate<F, Fut>(
        &self,
        partition: &Partition,
        ceiling: u32,
        template: &TicketTemplate,
        mut commit: F,
    ) -> Result<SeatRange, InventoryError>
    where
        F: FnMut(SeatBatch) -> Fut + Send,
        Fut: Future<Output = Result<(), DomainError>> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let last_seat = self.reader.find_last_seat(partition).await?;
            let range = SeatRange::after(last_seat, ceiling);
            let batch = SeatBatch::build(partition.clone(), range, template);

            match commit(batch).await {
                Ok(()) => return Ok(range),
                Err(err) if err.code == ErrorCode::SeatConflict => {
                    tracing::warn!(
                        partition = %partition,
                        attempt,
                        error = %err,
                        "seat allocation collided, re-reading last seat"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(InventoryError::conflict(format!(
            "seat allocation for {} kept colliding after {} attempts",
            partition, self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryInventoryStore;
    use crate::domain::inventory::fixtures::ticket_detail;
    use crate::ports::InventoryRepository;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn conflict() -> DomainError {
        DomainError::new(ErrorCode::SeatConflict, "seat 1 already issued")
    }

    #[tokio::test]
    async fn commits_range_after_last_seat() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        let allocator = SeatAllocator::new(store.clone(), DEFAULT_MAX_ATTEMPTS);

        let repo = store.clone();
        let range = allocator
            .allocate(&detail.partition(), 4, &TicketTemplate::from(&detail), move |batch| {
                let repo = repo.clone();
                async move { repo.insert_bank_tickets(&batch).await }
            })
            .await
            .unwrap();

        assert_eq!((range.start(), range.ceiling()), (1, 4));
        assert_eq!(store.find_last_seat(&detail.partition()).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn retries_after_seat_conflict() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        let allocator = SeatAllocator::new(store, DEFAULT_MAX_ATTEMPTS);
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let range = allocator
            .allocate(&detail.partition(), 10, &TicketTemplate::from(&detail), move |_batch| {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(conflict())
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(range.len(), 10);
    }

    #[tokio::test]
    async fn gives_up_with_conflict_after_max_attempts() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        let allocator = SeatAllocator::new(store, 2);
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let err = allocator
            .allocate(&detail.partition(), 10, &TicketTemplate::from(&detail), move |_batch| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(conflict()) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(err, InventoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn other_commit_errors_are_not_retried() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        let allocator = SeatAllocator::new(store, DEFAULT_MAX_ATTEMPTS);
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let err = allocator
            .allocate(&detail.partition(), 10, &TicketTemplate::from(&detail), move |_batch| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(DomainError::new(ErrorCode::DatabaseError, "connection reset")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, InventoryError::InternalServerError(_)));
    }
}
