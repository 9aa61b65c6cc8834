//! Handshake between the interrupt-pin callback and the poll loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// Interrupt-dispatch latch.
///
/// The poll loop latches the flag when it reports a threshold event; the
/// interrupt-pin callback resets it, re-arming dispatch. The callback may
/// preempt the poll loop on real hardware, so the test-and-set is a single
/// atomic swap rather than a read-then-write.
///
/// `const`-constructible so firmware can keep it in a `static` shared with
/// the interrupt context.
pub struct InterruptLatch {
    dispatched: AtomicBool,
    pin_level: AtomicBool,
}

impl InterruptLatch {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicBool::new(false),
            pin_level: AtomicBool::new(false),
        }
    }

    /// Record the interrupt pin's current logic level and reset the
    /// dispatch flag, regardless of its prior value.
    ///
    /// Call this from the platform's interrupt-pin edge callback.
    pub fn on_pin_edge(&self, level: bool) {
        self.pin_level.store(level, Ordering::SeqCst);
        self.dispatched.store(false, Ordering::SeqCst);
    }

    /// Last pin level recorded by [`on_pin_edge`](Self::on_pin_edge).
    pub fn pin_level(&self) -> bool {
        self.pin_level.load(Ordering::SeqCst)
    }

    /// Whether an event has been dispatched and not yet acknowledged by a
    /// pin edge.
    pub fn is_dispatched(&self) -> bool {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Latch the flag; returns true if this call performed the transition
    /// from clear to set.
    pub(crate) fn try_latch(&self) -> bool {
        !self.dispatched.swap(true, Ordering::SeqCst)
    }
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_edge_always_resets_the_flag() {
        let latch = InterruptLatch::new();

        latch.on_pin_edge(true);
        assert!(!latch.is_dispatched());

        assert!(latch.try_latch());
        latch.on_pin_edge(false);
        assert!(!latch.is_dispatched());
    }

    #[test]
    fn only_the_first_latch_attempt_wins() {
        let latch = InterruptLatch::new();
        assert!(latch.try_latch());
        assert!(!latch.try_latch());
        assert!(!latch.try_latch());
    }

    #[test]
    fn pin_level_is_recorded() {
        let latch = InterruptLatch::new();
        latch.on_pin_edge(true);
        assert!(latch.pin_level());
        latch.on_pin_edge(false);
        assert!(!latch.pin_level());
    }
}
