//! Easing curves and interpolation helpers.
//!
//! Every curve maps stage-local progress in [0,1] to an eased value that
//! starts at 0 and ends at 1. `EaseOutBack` overshoots past 1 in between.

/// Cubic ease-in-out: `4t³` below the midpoint, `1 - (-2t+2)³/2` above.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation. Extrapolates for `t` outside [0,1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Easing curve selection for a stage or a single binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOutCubic,
    EaseInOutQuad,
    EaseOutCubic,
    EaseOutQuad,
    /// Overshoots slightly before settling (c1 = 1.70158)
    EaseOutBack,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
        }
    }
}
