//! Global per-tick shot cap.

/// Counts fire attempts within one tick against a fixed cap.
///
/// Created fresh at the start of every tick.  Every attempt that actually
/// fires (hit or miss) consumes one unit; attempts blocked by a squad's own
/// fire timer consume nothing.
#[derive(Copy, Clone, Debug)]
pub struct ShotBudget {
    cap:   u32,
    fired: u32,
}

impl ShotBudget {
    pub fn new(cap: u32) -> Self {
        Self { cap, fired: 0 }
    }

    /// `true` while at least one more shot may be fired this tick.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.fired < self.cap
    }

    #[inline]
    pub(crate) fn consume(&mut self) {
        self.fired += 1;
    }

    /// Shots fired so far this tick.
    #[inline]
    pub fn fired(&self) -> u32 {
        self.fired
    }

    #[inline]
    pub fn cap(&self) -> u32 {
        self.cap
    }
}
