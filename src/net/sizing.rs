use crate::error::{Error, Result};

/// The two historical thread-sizing rule families. Which one matches the
/// intended balance is unknown, so both stay selectable in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingPolicy {
    /// Fixed results for small capacities, capacity/footprint above them.
    Table,
    /// Sizes against `capacity - used` and never returns less than 1.
    AvailableCapacity,
}

/// A computed thread count plus whether a footprint fallback was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadCount {
    pub threads: u32,
    pub warned: bool,
}

impl ThreadCount {
    fn of(threads: u32) -> ThreadCount {
        ThreadCount { threads, warned: false }
    }

    fn fallback() -> ThreadCount {
        ThreadCount { threads: 1, warned: true }
    }
}

/// Maps a server's capacity and a payload's footprint to a thread count
/// under the selected policy.
///
/// Negative or non-finite inputs make the result unusable and are rejected
/// outright; callers must not deploy in that case. The table policy may
/// return 0 threads (payload larger than capacity), which callers treat as
/// "skip"; the available-capacity policy floors at 1 by design of the
/// original rule set.
pub fn thread_count(policy: SizingPolicy, capacity: f64, used: f64, footprint: f64) -> Result<ThreadCount> {
    for (label, value) in [("capacity", capacity), ("used capacity", used), ("footprint", footprint)] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidSizing(format!("{} is {}", label, value)));
        }
    }

    let sized = match policy {
        SizingPolicy::Table => {
            if capacity < 16.0 {
                ThreadCount::of(1)
            } else if capacity == 16.0 {
                ThreadCount::of(6)
            } else if capacity == 32.0 {
                ThreadCount::of(12)
            } else if footprint == 0.0 {
                log::warn!("Payload footprint is 0. Falling back to a single thread.");
                ThreadCount::fallback()
            } else {
                ThreadCount::of((capacity / footprint).floor() as u32)
            }
        }
        SizingPolicy::AvailableCapacity => {
            if footprint <= 0.0 {
                log::warn!("Payload footprint is {}. Falling back to a single thread.", footprint);
                ThreadCount::fallback()
            } else {
                let available = capacity - used;
                let threads = (available / footprint).floor() as i64;
                ThreadCount::of(threads.max(1) as u32)
            }
        }
    };

    Ok(sized)
}
