use super::RETURN_DURATION_MS;
use super::model::Tilt;
use std::f64::consts::PI;

/// Period of the damped oscillation, in normalised time.
const SPRING_FACTOR: f64 = 0.571429;

/// Under-damped sinusoidal decay: starts at 0, overshoots past 1 and settles
/// back on 1 by `t = 1`.
pub fn ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    2f64.powf(-2.0 * t) * ((t - SPRING_FACTOR / 4.0) * (2.0 * PI) / SPRING_FACTOR).sin() + 1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    Running,
    Finished,
    /// The handle no longer owns the animation slot; nothing was written.
    Superseded,
}

impl AnimationStep {
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Running)
    }
}

#[derive(Debug, Clone)]
pub struct ReturnAnimation {
    handle: AnimationHandle,
    from: Tilt,
    started_at_us: Option<i64>,
}

impl ReturnAnimation {
    pub fn new(handle: AnimationHandle, from: Tilt) -> Self {
        Self {
            handle,
            from,
            started_at_us: None,
        }
    }

    pub fn handle(&self) -> AnimationHandle {
        self.handle
    }

    /// Normalised progress. The first frame seen becomes the time origin, so
    /// frame clocks with arbitrary epochs work.
    pub fn progress(&mut self, now_us: i64) -> f64 {
        let start = *self.started_at_us.get_or_insert(now_us);
        let elapsed_ms = now_us.saturating_sub(start).max(0) as f64 / 1000.0;
        (elapsed_ms / RETURN_DURATION_MS).clamp(0.0, 1.0)
    }

    /// Interpolated tilt for the given frame and whether the animation is done.
    pub fn sample(&mut self, now_us: i64) -> (Tilt, bool) {
        let t = self.progress(now_us);
        if t >= 1.0 {
            return (Tilt::NEUTRAL, true);
        }
        (self.from.scaled(1.0 - ease(t)), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: i64 = 1000;

    fn tilt() -> Tilt {
        Tilt {
            rotate_x: -5.0,
            rotate_y: 5.0,
            parallax_x: 2.0,
            parallax_y: 2.0,
        }
    }

    #[test]
    fn test_ease_endpoints() {
        assert!(ease(0.0).abs() < 1e-9);
        assert!((ease(1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ease_overshoots_before_settling() {
        assert!(ease(0.3) > 1.0);
        assert!(ease(0.5) < 1.0);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-3.0), ease(0.0));
        assert_eq!(ease(7.0), ease(1.0));
    }

    #[test]
    fn test_first_sample_keeps_start_values() {
        let mut anim = ReturnAnimation::new(AnimationHandle::new(1), tilt());
        let (value, done) = anim.sample(5_000 * MS);

        assert!(!done);
        assert!((value.rotate_x - -5.0).abs() < 1e-9);
        assert!((value.rotate_y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_values_swing_past_neutral() {
        let mut anim = ReturnAnimation::new(AnimationHandle::new(1), tilt());
        anim.sample(0);
        let (value, _) = anim.sample(300 * MS);

        assert!(value.rotate_x > 0.0);
        assert!(value.rotate_y < 0.0);
    }

    #[test]
    fn test_finishes_at_neutral_after_duration() {
        let mut anim = ReturnAnimation::new(AnimationHandle::new(1), tilt());
        anim.sample(10 * MS);
        let (value, done) = anim.sample(1010 * MS);

        assert!(done);
        assert_eq!(value, Tilt::NEUTRAL);
    }

    #[test]
    fn test_values_stay_within_start_magnitude() {
        let mut anim = ReturnAnimation::new(AnimationHandle::new(1), tilt());
        for step in 0..=100 {
            let (value, _) = anim.sample(step * 10 * MS);
            assert!(value.rotate_x.abs() <= 5.0 + 1e-9);
            assert!(value.rotate_y.abs() <= 5.0 + 1e-9);
            assert!(value.parallax_x.abs() <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn test_clock_going_backwards_does_not_rewind_past_start() {
        let mut anim = ReturnAnimation::new(AnimationHandle::new(1), tilt());
        anim.sample(500 * MS);
        assert_eq!(anim.progress(100 * MS), 0.0);
    }
}
