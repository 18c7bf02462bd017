//! Shared simulation tick counter.
//!
//! The host loop owns the clock and advances it once per tick; tick-gated
//! capabilities such as [`Cooldown`](crate::behaviour::Cooldown) hold clones
//! and read it when evaluated.

use std::cell::Cell;
use std::rc::Rc;

/// Cloneable handle to a tick counter starting at 0.
///
/// # Example
///
/// ```
/// use interplay_core::clock::TickClock;
///
/// let clock = TickClock::new();
/// let reader = clock.clone();
///
/// clock.advance();
/// clock.advance();
/// assert_eq!(reader.now(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    tick: Rc<Cell<u64>>,
}

impl TickClock {
    /// Creates a clock at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current tick.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.tick.get()
    }

    /// Advances the clock by one tick and returns the new tick.
    pub fn advance(&self) -> u64 {
        let next = self.tick.get() + 1;
        self.tick.set(next);
        next
    }

    /// Jumps the clock to `tick`.
    pub fn set(&self, tick: u64) {
        self.tick.set(tick);
    }
}
