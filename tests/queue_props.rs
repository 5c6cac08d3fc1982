//! Property tests for trigger queue ordering.

use proptest::prelude::*;
use quest_rules::events::TriggerQueue;

proptest! {
    /// Pops come out sorted by descending priority, ascending sequence.
    #[test]
    fn prop_pop_order(priorities in prop::collection::vec(-5i32..5, 0..64)) {
        let mut queue = TriggerQueue::new();
        for (i, priority) in priorities.iter().enumerate() {
            queue.enqueue(format!("t{i}"), 1.0, *priority).unwrap();
        }

        let mut expected: Vec<(i32, u64)> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| (*p, i as u64))
            .collect();
        expected.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let popped: Vec<(i32, u64)> = std::iter::from_fn(|| queue.pop())
            .map(|entry| (entry.priority, entry.sequence))
            .collect();

        prop_assert_eq!(popped, expected);
    }

    /// Every enqueued entry is popped exactly once.
    #[test]
    fn prop_consumed_once(count in 0usize..50) {
        let mut queue = TriggerQueue::new();
        for i in 0..count {
            queue.enqueue(format!("t{i}"), 0.5, (i % 3) as i32).unwrap();
        }
        prop_assert_eq!(queue.len(), count);

        let mut seen: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|entry| entry.trigger_id)
            .collect();
        seen.sort();
        seen.dedup();

        prop_assert_eq!(seen.len(), count);
        prop_assert!(queue.is_empty());
    }
}
