use std::time::{Duration, Instant};

/// Absolute stop time shared by every unit of one invocation.
///
/// Computed once and handed out by value; units only ever poll it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Self(Instant::now() + duration)
    }

    #[cfg(test)]
    pub(crate) fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn reached(&self) -> bool {
        Instant::now() >= self.0
    }
}
