use foundation::time::Time;

/// Timebase for the continuous render loop.
///
/// A 0-based frame index plus the fixed per-frame delta. Spin animation
/// advances by frame count, not wall clock, so the frame carries both:
/// the index for per-frame deltas and the derived engine time for
/// anything that needs seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn time_follows_from_index_and_delta() {
        let frame = Frame::new(120, 1.0 / 60.0);
        assert_eq!(frame.time, Time(2.0));
        assert_eq!(frame, Frame::new(120, 1.0 / 60.0));
    }

    #[test]
    fn next_keeps_the_delta() {
        let f1 = Frame::new(0, 0.5).next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_s, 0.5);
        assert_eq!(f1.time, Time(0.5));
    }
}
