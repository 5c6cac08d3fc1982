//! Pending trigger signals.
//!
//! The queue holds signals, not resolved events. Which events respond to a
//! trigger is decided when it is popped, so enable/disable changes made in
//! between are always honored.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::error::{check_probability, Result};

/// A queued trigger signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriggerEntry {
    /// Trigger name.
    pub trigger_id: String,

    /// Chance the trigger is processed at all once popped.
    pub probability: f64,

    /// Higher pops first.
    pub priority: i32,

    /// Enqueue order, used to break priority ties.
    pub sequence: u64,
}

impl PartialEq for TriggerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for TriggerEntry {}

impl Ord for TriggerEntry {
    // Max-heap: higher priority is greater, then earlier sequence is greater.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for TriggerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of trigger signals: highest priority first, FIFO within a
/// priority.
#[derive(Clone, Debug, Default)]
pub struct TriggerQueue {
    heap: BinaryHeap<TriggerEntry>,
    next_sequence: u64,
}

impl TriggerQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a trigger, returning its sequence number.
    pub fn enqueue(
        &mut self,
        trigger_id: impl Into<String>,
        probability: f64,
        priority: i32,
    ) -> Result<u64> {
        let trigger_id = trigger_id.into();
        check_probability(&format!("trigger '{trigger_id}'"), probability)?;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(TriggerEntry {
            trigger_id,
            probability,
            priority,
            sequence,
        });
        Ok(sequence)
    }

    /// Remove the next entry.
    pub fn pop(&mut self) -> Option<TriggerEntry> {
        self.heap.pop()
    }

    /// Look at the next entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&TriggerEntry> {
        self.heap.peek()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending entry and restart sequence numbering.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TriggerQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.pop().map(|e| e.trigger_id)).collect()
    }

    #[test]
    fn test_priority_order() {
        let mut queue = TriggerQueue::new();
        queue.enqueue("low", 1.0, 1).unwrap();
        queue.enqueue("high", 1.0, 5).unwrap();
        queue.enqueue("mid", 1.0, 3).unwrap();

        assert_eq!(drain(&mut queue), ["high", "mid", "low"]);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_fifo_within_priority() {
        let mut queue = TriggerQueue::new();
        for name in ["a", "b", "c"] {
            queue.enqueue(name, 1.0, 0).unwrap();
        }
        queue.enqueue("urgent", 1.0, 2).unwrap();

        assert_eq!(drain(&mut queue), ["urgent", "a", "b", "c"]);
    }

    #[test]
    fn test_sequence_numbers() {
        let mut queue = TriggerQueue::new();
        assert_eq!(queue.enqueue("a", 1.0, 0).unwrap(), 0);
        assert_eq!(queue.enqueue("b", 0.5, 0).unwrap(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().map(|e| e.sequence), Some(0));

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.enqueue("c", 1.0, 0).unwrap(), 0);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut queue = TriggerQueue::new();
        assert!(queue.enqueue("a", 1.5, 0).is_err());
        assert!(queue.enqueue("a", f64::NAN, 0).is_err());
        assert!(queue.is_empty());
    }
}
