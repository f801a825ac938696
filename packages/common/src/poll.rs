use std::time::Duration;

use tokio::time::Instant;

/// Wall-clock budget for polling one judge job.
///
/// The schedule is driven by a monotonic clock so a slow judge eats into the
/// budget instead of stretching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Pause between two consecutive polls.
    pub interval: Duration,
    /// Total time allowed from the first poll.
    pub timeout: Duration,
}

impl PollSchedule {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Start the budget now.
    pub fn start(&self) -> PollBudget {
        PollBudget {
            interval: self.interval,
            deadline: Instant::now() + self.timeout,
            attempts: 0,
        }
    }
}

/// A running poll budget.
#[derive(Debug, Clone)]
pub struct PollBudget {
    interval: Duration,
    deadline: Instant,
    attempts: u32,
}

impl PollBudget {
    /// Record one poll attempt and return its 1-based number.
    pub fn record_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Delay before the next poll, or `None` if the next poll would start
    /// past the deadline.
    pub fn next_delay(&self) -> Option<Duration> {
        self.next_delay_at(Instant::now())
    }

    fn next_delay_at(&self, now: Instant) -> Option<Duration> {
        if now + self.interval >= self.deadline {
            None
        } else {
            Some(self.interval)
        }
    }
}
