//! Procedural motion primitives.
//!
//! Steps the entry motion toward its target once per frame, sanitizes frame
//! deltas, and provides the easing/fade ramp used for clip blend weights.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the entry motion approaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallPolicy {
    /// Constant speed, clamped once the target is passed
    Linear,
    /// Exponential decay, `lerp(current, target, rate * dt)` each frame
    #[default]
    Decay,
}

impl FallPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Decay => "decay",
        }
    }
}

impl std::fmt::Display for FallPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpolation parameters for one channel of the entry motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub policy: FallPolicy,
    /// Decay rate (1/s) for `Decay`, speed (units/s) for `Linear`
    pub rate: f32,
    /// Distance below which the value snaps to its target
    pub epsilon: f32,
}

impl Approach {
    pub fn new(policy: FallPolicy, rate: f32, epsilon: f32) -> Self {
        Self {
            policy,
            rate,
            epsilon,
        }
    }

    /// Advance a scalar toward `target` by one frame of `dt` seconds.
    ///
    /// Never overshoots. Returns exactly `target` once within epsilon.
    pub fn step(&self, current: f32, target: f32, dt: f32) -> f32 {
        let remaining = target - current;
        if remaining.abs() < self.epsilon {
            return target;
        }

        let next = match self.policy {
            FallPolicy::Linear => {
                let max_step = self.rate * dt;
                if remaining.abs() <= max_step {
                    target
                } else {
                    current + max_step.copysign(remaining)
                }
            }
            FallPolicy::Decay => {
                let factor = decay_factor(self.rate, dt);
                let next = current + remaining * factor;
                // Step below float resolution: no further progress is possible
                if factor > 0.0 && next == current {
                    return target;
                }
                next
            }
        };

        if (target - next).abs() < self.epsilon {
            target
        } else {
            next
        }
    }

    /// Vector form of [`Approach::step`], measuring convergence by distance.
    pub fn step_vec3(&self, current: Vec3, target: Vec3, dt: f32) -> Vec3 {
        let offset = target - current;
        let distance = offset.length();
        if distance < self.epsilon {
            return target;
        }

        let next = match self.policy {
            FallPolicy::Linear => {
                let max_step = self.rate * dt;
                if distance <= max_step {
                    target
                } else {
                    current + offset * (max_step / distance)
                }
            }
            FallPolicy::Decay => {
                let factor = decay_factor(self.rate, dt);
                let next = current + offset * factor;
                if factor > 0.0 && next == current {
                    return target;
                }
                next
            }
        };

        if next.distance(target) < self.epsilon {
            target
        } else {
            next
        }
    }
}

/// Fraction of the remaining distance covered this frame. Capped at 1 so a
/// long frame lands on the target instead of past it.
fn decay_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

/// Clamp a raw frame delta into `[0, max_delta]`.
///
/// Negative and NaN deltas become 0 (the frame changes nothing); huge deltas
/// from a stalled or backgrounded host, including +inf, become `max_delta`.
pub fn sanitize_delta(dt: f32, max_delta: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_delta)
    }
}

/// Easing function type for blend weight ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingType {
    #[default]
    Linear,
    QuadInOut,
    CubicOut,
    CubicIn,
}

impl EasingType {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "quad_in_out" | "quadinout" => Self::QuadInOut,
            "cubic_out" | "cubicout" => Self::CubicOut,
            "cubic_in" | "cubicin" => Self::CubicIn,
            _ => Self::Linear,
        }
    }

    /// Evaluate the easing function at t in [0, 1].
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicIn => t * t * t,
        }
    }
}

/// Blend weight ramp from 0 to 1 over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightFade {
    duration: f32,
    elapsed: f32,
    easing: EasingType,
}

impl WeightFade {
    /// A fade of `duration` seconds. Zero or negative durations start at full
    /// weight.
    pub fn new(duration: f32, easing: EasingType) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        Self {
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    pub fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.ease(self.elapsed / self.duration)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_delta() {
        assert_eq!(sanitize_delta(1.0 / 60.0, 0.1), 1.0 / 60.0);
        assert_eq!(sanitize_delta(0.0, 0.1), 0.0);
        assert_eq!(sanitize_delta(-0.5, 0.1), 0.0);
        assert_eq!(sanitize_delta(f32::NAN, 0.1), 0.0);
        assert_eq!(sanitize_delta(f32::NEG_INFINITY, 0.1), 0.0);
        assert_eq!(sanitize_delta(f32::INFINITY, 0.1), 0.1);
        assert_eq!(sanitize_delta(30.0, 0.1), 0.1);
    }

    #[test]
    fn test_decay_never_overshoots() {
        let approach = Approach::new(FallPolicy::Decay, 3.0, 0.01);
        let target = -2.5;
        let mut y = 10.0f32;
        let mut last_distance = (target - y).abs();

        for _ in 0..1000 {
            y = approach.step(y, target, 1.0 / 60.0);
            assert!(y >= target, "decay overshot: {y}");
            let distance = (target - y).abs();
            assert!(distance <= last_distance);
            last_distance = distance;
        }
        assert_eq!(y, target);
    }

    #[test]
    fn test_decay_long_frame_lands_on_target() {
        // rate * dt > 1 would overshoot without the cap
        let approach = Approach::new(FallPolicy::Decay, 50.0, 0.01);
        assert_eq!(approach.step(10.0, -2.5, 0.1), -2.5);
    }

    #[test]
    fn test_linear_clamps_at_target() {
        let approach = Approach::new(FallPolicy::Linear, 8.0, 0.01);
        let y = approach.step(10.0, -2.5, 0.5);
        assert_eq!(y, 6.0);

        let y = approach.step(-2.0, -2.5, 0.5);
        assert_eq!(y, -2.5);

        // Moving upward works the same way
        let y = approach.step(-2.5, 0.0, 0.25);
        assert_eq!(y, -0.5);
    }

    #[test]
    fn test_epsilon_snap() {
        let approach = Approach::new(FallPolicy::Decay, 1.0, 0.01);
        assert_eq!(approach.step(-2.495, -2.5, 0.0), -2.5);

        let approach = Approach::new(FallPolicy::Decay, 0.5, 0.01);
        // 0.015 * (1 - 0.5/60) stays above epsilon
        let next = approach.step(0.015, 0.0, 1.0 / 60.0);
        assert!(next > 0.0 && next < 0.015);
    }

    #[test]
    fn test_decay_snaps_when_step_underflows() {
        // 0.012 * 5e-4 / 60 is below half an ulp at 2.5
        let approach = Approach::new(FallPolicy::Decay, 5e-4, 0.01);
        assert_eq!(approach.step(-2.488, -2.5, 1.0 / 60.0), -2.5);

        let target = Vec3::new(0.0, -2.5, 0.0);
        let p = Vec3::new(0.0, -2.488, 0.0);
        assert_eq!(approach.step_vec3(p, target, 1.0 / 60.0), target);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        for policy in [FallPolicy::Decay, FallPolicy::Linear] {
            let approach = Approach::new(policy, 3.0, 0.01);
            assert_eq!(approach.step(10.0, -2.5, 0.0), 10.0);
            let v = Vec3::new(0.0, 10.0, 0.0);
            assert_eq!(approach.step_vec3(v, Vec3::new(0.0, -2.5, 0.0), 0.0), v);
        }
    }

    #[test]
    fn test_step_vec3_converges() {
        let target = Vec3::new(0.0, -2.5, 0.0);
        for policy in [FallPolicy::Decay, FallPolicy::Linear] {
            let approach = Approach::new(policy, 4.0, 0.01);
            let mut p = Vec3::new(0.0, 10.0, 0.0);
            for _ in 0..600 {
                p = approach.step_vec3(p, target, 1.0 / 60.0);
            }
            assert_eq!(p, target, "policy {policy} did not converge");
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingType::Linear,
            EasingType::QuadInOut,
            EasingType::CubicOut,
            EasingType::CubicIn,
        ] {
            assert_eq!(easing.ease(0.0), 0.0);
            assert_eq!(easing.ease(1.0), 1.0);
            assert_eq!(easing.ease(2.0), 1.0);
        }
        assert_eq!(EasingType::from_str("Cubic_Out"), EasingType::CubicOut);
        assert_eq!(EasingType::from_str("unknown"), EasingType::Linear);
    }

    #[test]
    fn test_weight_fade() {
        let mut fade = WeightFade::new(0.2, EasingType::Linear);
        assert_eq!(fade.weight(), 0.0);
        assert!(!fade.is_done());

        fade.advance(0.1);
        assert!((fade.weight() - 0.5).abs() < 1e-5);

        fade.advance(1.0);
        assert_eq!(fade.weight(), 1.0);
        assert!(fade.is_done());

        let instant = WeightFade::new(0.0, EasingType::Linear);
        assert_eq!(instant.weight(), 1.0);
        assert!(instant.is_done());
    }
}
