// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built from animation snapshots.
//!
//! An edit is bracketed by [`History::begin`], which captures the animation
//! before any mutation and hands out a [`Transaction`], and
//! [`History::commit`], which consumes that handle and records the
//! animation as it is afterwards. One commit is one undo step.

use crate::host::TransactionManager;
use bonekey_timeline::Animation;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

static NEXT_HISTORY: AtomicU64 = AtomicU64::new(1);

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Transaction was opened on a different history
    #[error("Transaction {0:?} does not belong to this history")]
    ForeignTransaction(OperationID),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Unique operation ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationID(u64);

impl OperationID {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Serialized animation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Serialized state
    pub data: Vec<u8>,
    /// Timestamp when snapshot was taken
    pub timestamp: u64,
}

impl StateSnapshot {
    /// Create from serializable value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(value)?,
            timestamp: now_secs(),
        })
    }

    /// Deserialize to value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An open edit, returned by `begin` and consumed by `commit`
#[must_use = "an open transaction records nothing until it is committed"]
#[derive(Debug)]
pub struct Transaction {
    id: OperationID,
    owner: u64,
    label: String,
    before: StateSnapshot,
}

impl Transaction {
    /// Operation ID the committed entry will carry
    pub fn id(&self) -> OperationID {
        self.id
    }

    /// Label given when the transaction was opened
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snapshot of the animation taken when the transaction was opened
    pub fn before(&self) -> &StateSnapshot {
        &self.before
    }
}

/// One undo step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationGroup {
    /// Group ID
    pub id: OperationID,
    /// Human-readable description
    pub description: String,
    /// State before the edit (for undo)
    pub before: StateSnapshot,
    /// State after the edit (for redo)
    pub after: StateSnapshot,
    /// Timestamp
    pub timestamp: u64,
}

impl OperationGroup {
    /// Get memory size of this group
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }

    /// Decode the animation as it was before the edit
    pub fn restore_before(&self) -> Result<Animation> {
        self.before.to_value()
    }

    /// Decode the animation as it was after the edit
    pub fn restore_after(&self) -> Result<Animation> {
        self.after.to_value()
    }
}

/// History statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Entries in undo stack
    pub undo_count: usize,
    /// Entries in redo stack
    pub redo_count: usize,
    /// Total memory used by history (bytes)
    pub memory_used: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    /// Token matching transactions to this history
    instance: u64,
    /// Undo stack
    undo_stack: VecDeque<OperationGroup>,
    /// Redo stack
    redo_stack: VecDeque<OperationGroup>,
    /// Next operation ID
    next_id: u64,
    /// Maximum history depth
    max_depth: usize,
    /// Total memory used
    memory_used: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            instance: NEXT_HISTORY.fetch_add(1, Ordering::Relaxed),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            max_depth: max_depth.max(1),
            memory_used: 0,
        }
    }

    /// Open a transaction, capturing `animation` as the undo state
    pub fn begin(&mut self, label: &str, animation: &Animation) -> Result<Transaction> {
        let before = StateSnapshot::from_value(animation)?;
        let id = OperationID(self.next_id);
        self.next_id += 1;
        tracing::debug!(id = id.value(), label, "transaction opened");
        Ok(Transaction {
            id,
            owner: self.instance,
            label: label.to_string(),
            before,
        })
    }

    /// Close a transaction, recording `animation` as the redo state.
    ///
    /// Always pushes exactly one undo entry, labelled with the label the
    /// transaction was opened with, even if nothing changed.
    pub fn commit(&mut self, transaction: Transaction, animation: &Animation) -> Result<OperationID> {
        if transaction.owner != self.instance {
            return Err(HistoryError::ForeignTransaction(transaction.id));
        }

        let Transaction { id, label, before, .. } = transaction;
        let group = OperationGroup {
            id,
            description: label,
            before,
            after: StateSnapshot::from_value(animation)?,
            timestamp: now_secs(),
        };

        self.redo_stack.clear();
        self.memory_used += group.memory_size();
        self.undo_stack.push_back(group);

        // Enforce history limit
        while self.undo_stack.len() > self.max_depth {
            if let Some(old_group) = self.undo_stack.pop_front() {
                self.memory_used = self.memory_used.saturating_sub(old_group.memory_size());
            }
        }

        tracing::debug!(id = id.value(), "transaction committed");
        Ok(id)
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> Result<OperationGroup> {
        let group = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;

        self.memory_used = self.memory_used.saturating_sub(group.memory_size());
        self.redo_stack.push_back(group.clone());

        Ok(group)
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> Result<OperationGroup> {
        let group = self
            .redo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToRedo)?;

        self.memory_used += group.memory_size();
        self.undo_stack.push_back(group.clone());

        Ok(group)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            memory_used: self.memory_used,
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|g| g.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|g| g.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager for History {
    fn begin(&mut self, label: &str, animation: &Animation) -> Result<Transaction> {
        History::begin(self, label, animation)
    }

    fn commit(&mut self, transaction: Transaction, animation: &Animation) -> Result<OperationID> {
        History::commit(self, transaction, animation)
    }
}
