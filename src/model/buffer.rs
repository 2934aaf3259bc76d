// src/model/buffer.rs

use crate::model::error::ReactorError;
use crate::model::material::Lot;
use std::collections::VecDeque;

/// A capacity-bounded inventory of whole lots.
///
/// Lots leave in the order they arrived (oldest first). `quantity()` never
/// exceeds `capacity()`: the comparison in `push` is exact, so float sums
/// that land a hair above capacity are rejected.
#[derive(Debug, Clone)]
pub struct ResourceBuffer {
    label: String,
    capacity: f64,
    lots: VecDeque<Lot>,
}

impl ResourceBuffer {
    pub fn new(label: &str, capacity: f64) -> Self {
        Self {
            label: label.to_string(),
            capacity,
            lots: VecDeque::new(),
        }
    }

    /// A buffer with no capacity limit (used for waste).
    pub fn unbounded(label: &str) -> Self {
        Self::new(label, f64::INFINITY)
    }

    /// Adds a lot at the back. Rejected, leaving the buffer untouched, if its
    /// mass is not a finite non-negative number or it would push the total
    /// over capacity.
    pub fn push(&mut self, lot: Lot) -> Result<(), ReactorError> {
        if !lot.quantity.is_finite() || lot.quantity < 0.0 {
            return Err(ReactorError::InvalidLotMass {
                buffer: self.label.clone(),
                quantity: lot.quantity,
            });
        }
        let quantity = self.quantity();
        if quantity + lot.quantity > self.capacity {
            return Err(ReactorError::CapacityExceeded {
                buffer: self.label.clone(),
                capacity: self.capacity,
                quantity,
                incoming: lot.quantity,
            });
        }
        self.lots.push_back(lot);
        Ok(())
    }

    /// Removes the oldest lot.
    pub fn pop(&mut self) -> Result<Lot, ReactorError> {
        self.lots
            .pop_front()
            .ok_or_else(|| ReactorError::BufferUnderflow {
                buffer: self.label.clone(),
            })
    }

    /// The lot the next `pop` would return.
    pub fn peek(&self) -> Option<&Lot> {
        self.lots.front()
    }

    pub fn count(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn quantity(&self) -> f64 {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    /// What `quantity()` will be once the oldest lot is popped.
    pub fn quantity_after_pop(&self) -> f64 {
        self.lots.iter().skip(1).map(|lot| lot.quantity).sum()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
