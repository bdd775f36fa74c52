//! Batch position updates.
//!
//! # Responsibility
//! - Apply a batch of `(item, position)` pairs as one atomic unit.
//!
//! # Invariants
//! - An empty batch is a successful no-op.
//! - Negative positions fail the whole batch before any write.
//! - Uniqueness and contiguity are not checked here; the store's
//!   per-project unique index rejects conflicting batches, and a rejected
//!   batch leaves every position exactly as it was.
//! - Conflicts are rejected, never auto-shifted.

use crate::error::ItemError;
use crate::model::item::PositionUpdate;
use crate::repo::item_repo::ItemRepository;
use log::{info, warn};
use std::time::Instant;

/// Position integrity service facade.
pub struct PositionService<R: ItemRepository> {
    items: R,
}

impl<R: ItemRepository> PositionService<R> {
    pub fn new(items: R) -> Self {
        Self { items }
    }

    /// Applies every update in `updates`, or none of them.
    pub fn update_positions(&self, updates: &[PositionUpdate]) -> Result<(), ItemError> {
        if updates.is_empty() {
            return Ok(());
        }
        if let Some(invalid) = updates.iter().find(|update| update.position < 0) {
            return Err(ItemError::PositionInvalid(invalid.position));
        }

        let started_at = Instant::now();
        match self.items.update_positions(updates) {
            Ok(()) => {
                info!(
                    "event=item_reorder module=position status=ok batch_size={} duration_ms={}",
                    updates.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let err = ItemError::from(err);
                warn!(
                    "event=item_reorder module=position status=rolled_back batch_size={} duration_ms={} retryable={} error={}",
                    updates.len(),
                    started_at.elapsed().as_millis(),
                    err.is_retryable(),
                    err
                );
                Err(err)
            }
        }
    }
}
