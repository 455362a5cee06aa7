use std::time::{Duration, Instant};

/// Steps through a looping frame buffer, holding the first frame a little longer.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    frame: usize,
    frame_count: usize,
    interval: Duration,
    hold: Duration,
    next_due: Instant,
}

impl PlaybackClock {
    pub fn new(frame_count: usize, interval: Duration, hold: Duration, now: Instant) -> Self {
        let mut clock = Self {
            frame: 0,
            frame_count,
            interval,
            hold,
            next_due: now,
        };
        clock.restart(frame_count, interval, now);
        clock
    }

    /// Start again from frame 0, e.g. after a new sample or a resize.
    pub fn restart(&mut self, frame_count: usize, interval: Duration, now: Instant) {
        self.frame = 0;
        self.frame_count = frame_count;
        self.interval = interval;
        self.next_due = now + self.dwell(0);
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Move to the next frame when it is due. Returns whether the frame changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.frame_count <= 1 || now < self.next_due {
            return false;
        }
        self.frame = (self.frame + 1) % self.frame_count;
        self.next_due = now + self.dwell(self.frame);
        true
    }

    /// How long until the next frame change, for scheduling a repaint.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        (self.frame_count > 1).then(|| self.next_due.saturating_duration_since(now))
    }

    fn dwell(&self, frame: usize) -> Duration {
        if frame == 0 {
            self.interval + self.hold
        } else {
            self.interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(40);
    const HOLD: Duration = Duration::from_millis(500);

    #[test]
    fn first_frame_is_held_before_advancing() {
        let start = Instant::now();
        let mut clock = PlaybackClock::new(3, TICK, HOLD, start);
        assert!(!clock.advance(start + TICK));
        assert_eq!(clock.frame(), 0);
        assert!(clock.advance(start + TICK + HOLD));
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn wraps_back_to_first_frame() {
        let start = Instant::now();
        let mut clock = PlaybackClock::new(2, TICK, Duration::ZERO, start);
        let mut now = start;
        let mut seen = Vec::new();
        for _ in 0..4 {
            now += TICK;
            clock.advance(now);
            seen.push(clock.frame());
        }
        assert_eq!(seen, vec![1, 0, 1, 0]);
    }

    #[test]
    fn single_frame_never_schedules() {
        let start = Instant::now();
        let mut clock = PlaybackClock::new(1, TICK, HOLD, start);
        assert!(!clock.advance(start + HOLD * 4));
        assert_eq!(clock.until_due(start), None);
    }

    #[test]
    fn restart_resets_frame_and_deadline() {
        let start = Instant::now();
        let mut clock = PlaybackClock::new(4, TICK, Duration::ZERO, start);
        clock.advance(start + TICK);
        assert_eq!(clock.frame(), 1);
        let later = start + TICK * 2;
        clock.restart(5, TICK, later);
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.until_due(later), Some(TICK));
    }
}
