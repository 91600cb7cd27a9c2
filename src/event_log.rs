//! Bounded scrolling log of operator-facing lines.

use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Most recent log lines, oldest first. Old lines fall off the top.
#[derive(Clone, Debug)]
pub struct ScrollingLog {
    lines: VecDeque<String>,
    capacity: usize,
    total: u64,
}

impl ScrollingLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
        self.total += 1;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines ever pushed, including those scrolled away.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for ScrollingLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolls_oldest_lines_away() {
        let mut log = ScrollingLog::new(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(log.last(), Some("c"));
        assert_eq!(log.total(), 3);
    }
}
