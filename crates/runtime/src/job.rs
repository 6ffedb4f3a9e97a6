use crate::frame::Frame;

/// A deterministic unit of per-frame work executed by the [`Scheduler`].
///
/// Jobs mutate a caller-owned context `C` (the scene world, in practice)
/// and run in a stable order based on their `(priority, id)`.
pub struct Job<C> {
    pub id: &'static str,
    /// Smaller values run earlier.
    pub priority: i32,
    pub run: fn(frame: Frame, ctx: &mut C),
}

impl<C> Job<C> {
    pub fn new(id: &'static str, run: fn(frame: Frame, ctx: &mut C)) -> Self {
        Self {
            id,
            priority: 0,
            run,
        }
    }

    pub fn with_priority(id: &'static str, priority: i32, run: fn(frame: Frame, ctx: &mut C)) -> Self {
        Self { id, priority, run }
    }
}
