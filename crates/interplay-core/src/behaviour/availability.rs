//! Availability capability variants.
//!
//! - [`Always`]: always available
//! - [`Conditional`]: available while a predicate holds
//! - [`Cooldown`]: unavailable for a number of ticks after each perform
//! - [`Limited`]: available for a fixed number of performs

use std::cell::Cell;
use std::fmt;

use crate::clock::TickClock;

use super::Availability;

/// Always available. The default for new behaviours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Always;

impl Availability for Always {
    fn is_available(&self) -> bool {
        true
    }
}

/// Available while the predicate returns true.
///
/// The predicate runs on every query; nothing is cached.
pub struct Conditional<F> {
    predicate: F,
}

impl<F: Fn() -> bool> Conditional<F> {
    /// Wraps `predicate`.
    #[must_use]
    pub const fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F: Fn() -> bool> Availability for Conditional<F> {
    fn is_available(&self) -> bool {
        (self.predicate)()
    }
}

impl<F> fmt::Debug for Conditional<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional").finish_non_exhaustive()
    }
}

/// Unavailable for `ticks` ticks after each perform.
///
/// Performed at tick `t`, the behaviour becomes available again at tick
/// `t + ticks`. A zero-tick cooldown never blocks.
#[derive(Debug, Clone)]
pub struct Cooldown {
    clock: TickClock,
    ticks: u64,
    last_performed: Cell<Option<u64>>,
}

impl Cooldown {
    /// Creates a cooldown of `ticks` ticks measured on `clock`.
    #[must_use]
    pub fn new(clock: TickClock, ticks: u64) -> Self {
        Self {
            clock,
            ticks,
            last_performed: Cell::new(None),
        }
    }

    /// Ticks left before the behaviour is available again.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.last_performed.get().map_or(0, |last| {
            let elapsed = self.clock.now().saturating_sub(last);
            self.ticks.saturating_sub(elapsed)
        })
    }
}

impl Availability for Cooldown {
    fn is_available(&self) -> bool {
        self.remaining() == 0
    }

    fn on_performed(&self) {
        self.last_performed.set(Some(self.clock.now()));
    }
}

/// Available for a fixed number of performs, then never again.
#[derive(Debug, Clone)]
pub struct Limited {
    remaining: Cell<u32>,
}

impl Limited {
    /// Allows `uses` performs.
    #[must_use]
    pub const fn new(uses: u32) -> Self {
        Self {
            remaining: Cell::new(uses),
        }
    }

    /// Performs left.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }
}

impl Availability for Limited {
    fn is_available(&self) -> bool {
        self.remaining.get() > 0
    }

    fn on_performed(&self) {
        self.remaining.set(self.remaining.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn always_is_available() {
        assert!(Always.is_available());
    }

    #[test]
    fn conditional_reads_predicate_each_time() {
        let open = Rc::new(Cell::new(false));
        let flag = Rc::clone(&open);
        let availability = Conditional::new(move || flag.get());

        assert!(!availability.is_available());
        open.set(true);
        assert!(availability.is_available());
    }

    #[test]
    fn cooldown_blocks_until_ticks_elapse() {
        let clock = TickClock::new();
        let cooldown = Cooldown::new(clock.clone(), 3);
        assert!(cooldown.is_available());

        clock.set(10);
        cooldown.on_performed();
        assert!(!cooldown.is_available());
        assert_eq!(cooldown.remaining(), 3);

        clock.set(12);
        assert!(!cooldown.is_available());
        assert_eq!(cooldown.remaining(), 1);

        clock.set(13);
        assert!(cooldown.is_available());
    }

    #[test]
    fn zero_tick_cooldown_never_blocks() {
        let clock = TickClock::new();
        let cooldown = Cooldown::new(clock, 0);
        cooldown.on_performed();
        assert!(cooldown.is_available());
    }

    #[test]
    fn limited_runs_out() {
        let limited = Limited::new(2);
        assert!(limited.is_available());

        limited.on_performed();
        limited.on_performed();
        assert!(!limited.is_available());

        limited.on_performed();
        assert_eq!(limited.remaining(), 0);
    }
}
