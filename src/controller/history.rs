// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Linear undo/redo over the overlay pose and adjustments.

use crate::models::adjustments::AdjustmentParameters;
use crate::models::transform::Transform;

/// Number of undo steps kept unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 20;

/// Value copy of the restorable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub adjustments: AdjustmentParameters,
    /// `None` when no overlay was placed at snapshot time.
    pub transform: Option<Transform>,
}

/// Whether undo and redo are currently possible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoRedoState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// History system for undo/redo functionality.
#[derive(Debug)]
pub struct HistoryStack {
    /// Undo stack (past states)
    undo_stack: Vec<HistoryEntry>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record an action. Evicts the oldest entry past capacity and drops
    /// any redo history.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Step back. `current` is the live state, kept for redo. Returns the
    /// entry to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward; the mirror of [`HistoryStack::undo`].
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn state(&self) -> UndoRedoState {
        UndoRedoState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    #[cfg(test)]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[cfg(test)]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
