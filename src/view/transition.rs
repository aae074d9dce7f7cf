use std::time::Duration;

use crate::common::Rgb;

/// Values that can be blended for animation.
pub trait Interpolate: Clone {
    /// Blend from `self` (t = 0) to `to` (t = 1).
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self { self + (to - self) * t }
}

impl Interpolate for Rgb {
    fn interpolate(&self, to: &Self, t: f64) -> Self { self.lerp(*to, t) }
}

/// Symmetric cubic easing.
fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 { t * t * t / 2.0 } else { let t = t - 2.0; (t * t * t + 2.0) / 2.0 }
}

/// A timed blend between two values. Times are offsets on the caller's clock.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<T> {
    from: T,
    to: T,
    start: Duration,
    duration: Duration,
}

impl<T: Interpolate> Transition<T> {
    pub fn new(from: T, to: T, start: Duration, duration: Duration) -> Self {
        Self { from, to, start, duration }
    }

    /// Linear progress in [0, 1] at `now`.
    pub fn progress(&self, now: Duration) -> f64 {
        if now < self.start { return 0.0 }
        if self.duration.is_zero() { return 1.0 }
        ((now - self.start).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased value at `now`; exactly `to` once finished.
    pub fn sample(&self, now: Duration) -> T {
        match self.progress(now) {
            t if t >= 1.0 => self.to.clone(),
            t if t <= 0.0 => self.from.clone(),
            t => self.from.interpolate(&self.to, ease_cubic_in_out(t)),
        }
    }

    #[inline] pub fn end(&self) -> Duration { self.start + self.duration }

    #[inline] pub fn is_finished(&self, now: Duration) -> bool { now >= self.end() }
}

/// A value with a final target and an optional in-flight transition toward it.
///
/// The target is always the authoritative state; the transition only affects
/// what is displayed before it finishes. Retargeting starts from whatever is
/// displayed at that moment, so the latest target always wins.
#[derive(Clone, Debug, PartialEq)]
pub struct Animated<T> {
    target: T,
    transition: Option<Transition<T>>,
}

impl<T: Interpolate> Animated<T> {
    pub fn new(value: T) -> Self { Self { target: value, transition: None } }

    #[inline] pub fn target(&self) -> &T { &self.target }

    /// Displayed value at `now`.
    pub fn sample(&self, now: Duration) -> T {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.target.clone(),
        }
    }

    /// Retarget to `value`, animating from the value displayed at `now` after `delay`.
    pub fn animate_to(&mut self, value: T, now: Duration, delay: Duration, duration: Duration) {
        let from = self.sample(now);
        self.transition = (!duration.is_zero())
            .then(|| Transition::new(from, value.clone(), now + delay, duration));
        self.target = value;
    }

    /// Jump to the target, dropping any transition.
    pub fn settle(&mut self) { self.transition = None }

    /// True when nothing is animating at `now`.
    pub fn is_settled(&self, now: Duration) -> bool {
        self.transition.as_ref().is_none_or(|t| t.is_finished(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration { Duration::from_millis(v) }

    #[test]
    fn transition_respects_delay_and_end() {
        let t = Transition::new(0.0, 10.0, ms(100), ms(500));
        assert_eq!(t.sample(ms(0)), 0.0);
        assert_eq!(t.sample(ms(100)), 0.0);
        assert_eq!(t.sample(ms(350)), 5.0);
        assert_eq!(t.sample(ms(600)), 10.0);
        assert_eq!(t.sample(ms(10_000)), 10.0);
        assert!(t.is_finished(ms(600)));
    }

    #[test]
    fn easing_is_monotonic() {
        let t = Transition::new(0.0, 1.0, ms(0), ms(1000));
        let samples = (0..=100).map(|i| t.sample(ms(i * 10))).collect::<Vec<_>>();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut value = Animated::new(0.0);
        value.animate_to(100.0, ms(0), ms(0), ms(1000));
        let midway = value.sample(ms(500));
        assert_eq!(midway, 50.0);

        value.animate_to(-20.0, ms(500), ms(0), ms(1000));
        assert_eq!(*value.target(), -20.0);
        assert_eq!(value.sample(ms(500)), 50.0);
        assert_eq!(value.sample(ms(1500)), -20.0);
        assert!(value.is_settled(ms(1500)));
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut color = Animated::new(Rgb::new(0, 0, 0));
        color.animate_to(Rgb::new(9, 9, 9), ms(0), ms(0), Duration::ZERO);
        assert_eq!(color.sample(ms(0)), Rgb::new(9, 9, 9));
        assert!(color.is_settled(ms(0)));
    }

    #[test]
    fn settle_jumps_to_target() {
        let mut value = Animated::new(1.0);
        value.animate_to(3.0, ms(0), ms(0), ms(1000));
        assert!(!value.is_settled(ms(10)));
        value.settle();
        assert_eq!(value.sample(ms(10)), 3.0);
    }
}
