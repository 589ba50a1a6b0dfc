//! Current-reading storage
//!
//! Holds the latest value of every vital together with a monotonic update
//! sequence. One producer writes; any number of readers take snapshots.
//! Every write happens under a single lock acquisition, so a snapshot never
//! mixes fields from two different frames.

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::error::StoreError;
use crate::telemetry::DecodedFrame;
use crate::vitals::{Reading, Vital};

/// Immutable copy of the store at one sequence number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingSnapshot {
    pub sequence: u64,
    pub reading: Reading,
}

#[derive(Debug)]
pub struct ReadingStore {
    current: RwLock<ReadingSnapshot>,
}

impl ReadingStore {
    pub fn new(initial: Reading) -> Self {
        ReadingStore {
            current: RwLock::new(ReadingSnapshot {
                sequence: 0,
                reading: initial,
            }),
        }
    }

    /// Apply every field of a decoded frame in one step.
    ///
    /// Returns the sequence after the update. Empty frames leave the
    /// sequence untouched.
    pub fn apply(&self, frame: &DecodedFrame) -> u64 {
        let mut current = self.write();
        Self::apply_locked(&mut current, frame)
    }

    /// Apply `frame` only if `suppress` returns false for the reading held
    /// at the moment of the update. Returns `None` when suppressed.
    pub fn apply_unless<F>(&self, frame: &DecodedFrame, suppress: F) -> Option<u64>
    where
        F: FnOnce(&Reading) -> bool,
    {
        let mut current = self.write();
        if suppress(&current.reading) {
            trace!(sequence = current.sequence, "Store update suppressed");
            return None;
        }
        Some(Self::apply_locked(&mut current, frame))
    }

    /// Direct write of a single vital
    pub fn set(&self, vital: Vital, value: f64) -> Result<u64, StoreError> {
        if !value.is_finite() {
            return Err(StoreError::NonFinite { vital, value });
        }

        let mut current = self.write();
        current.reading.set(vital, value);
        current.sequence += 1;
        trace!(%vital, value, sequence = current.sequence, "Store field set");
        Ok(current.sequence)
    }

    /// Overwrite all five fields at once
    pub fn replace(&self, reading: Reading) -> u64 {
        let mut current = self.write();
        current.reading = reading;
        current.sequence += 1;
        trace!(sequence = current.sequence, "Store reading replaced");
        current.sequence
    }

    pub fn snapshot(&self) -> ReadingSnapshot {
        *self.read()
    }

    pub fn sequence(&self) -> u64 {
        self.read().sequence
    }

    pub fn changed_since(&self, sequence: u64) -> bool {
        self.sequence() != sequence
    }

    fn apply_locked(current: &mut ReadingSnapshot, frame: &DecodedFrame) -> u64 {
        if frame.is_empty() {
            return current.sequence;
        }

        frame.apply_to(&mut current.reading);
        current.sequence += 1;
        trace!(fields = frame.len(), sequence = current.sequence, "Store frame applied");
        current.sequence
    }

    // Poisoning is ignored: no write path panics between field updates.
    fn read(&self) -> RwLockReadGuard<'_, ReadingSnapshot> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReadingSnapshot> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
