use std::collections::{HashSet, VecDeque};

/// FIFO work queue plus the two membership sets that keep every URL
/// enqueued at most once and fetched at most once.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    enqueued: HashSet<String>,
    processed: HashSet<String>,
}

impl Frontier {
    /// All seeds are queued; only the first one is marked as enqueued.
    pub fn new(seeds: &[String]) -> Self {
        let mut frontier = Self {
            queue: seeds.iter().cloned().collect(),
            ..Self::default()
        };
        if let Some(first) = seeds.first() {
            frontier.enqueued.insert(first.clone());
        }
        frontier
    }

    /// Pop the next URL that has not been processed yet.
    pub fn pop_next(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            if !self.processed.contains(&url) {
                return Some(url);
            }
        }
        None
    }

    /// Queue `url` unless it was ever queued before. Returns whether it was added.
    pub fn push(&mut self, url: String) -> bool {
        if self.enqueued.contains(&url) {
            return false;
        }
        self.enqueued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    pub fn mark_processed(&mut self, url: &str) {
        self.processed.insert(url.to_string());
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    pub fn is_enqueued(&self, url: &str) -> bool {
        self.enqueued.contains(url)
    }

    /// Current queue depth.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}
