use std::collections::VecDeque;

use crate::types::Round;

/// FIFO of completed rounds waiting for the scheduler.
#[derive(Debug, Default)]
pub struct RoundQueue {
    rounds: VecDeque<Round>,
}

impl RoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, round: Round) {
        self.rounds.push_back(round);
    }

    pub fn dequeue_next(&mut self) -> Option<Round> {
        self.rounds.pop_front()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(id: i64) -> Round {
        Round {
            id,
            notifications: vec![],
        }
    }

    #[test]
    fn dequeues_oldest_first() {
        let mut q = RoundQueue::new();
        q.enqueue(round(7));
        q.enqueue(round(8));
        assert_eq!(q.len(), 2);
        assert_eq!(q.dequeue_next().map(|r| r.id), Some(7));
        assert_eq!(q.dequeue_next().map(|r| r.id), Some(8));
        assert!(q.dequeue_next().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn rounds_with_same_id_stay_separate() {
        let mut q = RoundQueue::new();
        q.enqueue(round(3));
        q.enqueue(round(3));
        assert_eq!(q.len(), 2);
    }
}
