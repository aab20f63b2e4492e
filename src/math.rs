//! Numeric helpers for mapping between pointer ratios and slider values.

use std::cmp::Ordering;
use std::ops::Deref;

/// Clamps `value` into `min..=max`.
///
/// Unlike [`f64::clamp`], this never panics when `min > max`: `min` wins.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Maps `value` to its position within `min..=max`.
///
/// Returns [`ZeroToOne::ZERO`] when the span is empty, negative, or not
/// finite.
#[must_use]
pub fn value_to_ratio(value: f64, min: f64, max: f64) -> ZeroToOne {
    let span = max - min;
    if !span.is_finite() || span <= 0. {
        return ZeroToOne::ZERO;
    }
    ZeroToOne::new((value - min) / span)
}

/// Maps `ratio` to an absolute value within `min..=max`. The ratio is clamped
/// before mapping.
#[must_use]
pub fn ratio_to_value(ratio: f64, min: f64, max: f64) -> f64 {
    let ratio = if ratio.is_nan() { 0. } else { ratio };
    min + clamp(ratio, 0., 1.) * (max - min)
}

/// Snaps `value` to the grid of `step`s anchored at `min`, then clamps it
/// into `min..=max`.
///
/// A degenerate range yields `min`. A step that is not a positive finite
/// number disables snapping.
#[must_use]
pub fn quantize_value(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0. || value.is_nan() {
        return min;
    }
    if !step.is_finite() || step <= 0. {
        return clamp(value, min, max);
    }

    let steps = ((value - min) / step).round();
    clamp(steps * step + min, min, max)
}

/// Converts a pointer's `offset_ratio` into a stepped value within
/// `min..=max`.
///
/// The ratio is not clamped first: a pointer dragged past either end of the
/// element lands on that end through the final clamp.
#[must_use]
pub fn quantize(offset_ratio: f64, min: f64, max: f64, step: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0. {
        return min;
    }
    quantize_value(min + offset_ratio * span, min, max, step)
}

/// An `f64` that is clamped between 0.0 and 1.0 and cannot be NaN or Infinity.
///
/// Because of these restrictions, this type implements `Ord` and `Eq`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZeroToOne(f64);

impl ZeroToOne {
    /// The maximum value this type can contain.
    pub const ONE: Self = Self(1.);
    /// The minimum value this type can contain.
    pub const ZERO: Self = Self(0.);

    /// Returns a new instance after clamping `value` between +0.0 and 1.0.
    ///
    /// NaN becomes zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        // Also folds -0.0 into +0.0 so equality agrees with `total_cmp`.
        if value.is_nan() || value <= 0. {
            Self::ZERO
        } else {
            Self(value.min(1.))
        }
    }

    /// Returns the contained floating point value.
    #[must_use]
    pub fn into_f64(self) -> f64 {
        self.0
    }

    /// Returns this ratio expressed as a percentage.
    #[must_use]
    pub fn percent(self) -> f64 {
        self.0 * 100.
    }
}

impl Default for ZeroToOne {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Deref for ZeroToOne {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Eq for ZeroToOne {}

impl PartialEq for ZeroToOne {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl PartialEq<f64> for ZeroToOne {
    fn eq(&self, other: &f64) -> bool {
        (self.0 - *other).abs() < f64::EPSILON
    }
}

impl Ord for ZeroToOne {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for ZeroToOne {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialOrd<f64> for ZeroToOne {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        Some(self.0.total_cmp(other))
    }
}

#[test]
fn quantize_snaps_to_steps() {
    assert_eq!(quantize(0.5, 0., 360., 1.), 180.);
    assert_eq!(quantize(0.75, 0., 360., 1.), 270.);
    assert_eq!(quantize(0.503, 0., 100., 5.), 50.);
    assert_eq!(quantize(0.526, 0., 100., 5.), 55.);
    // Steps are anchored at `min`, not at zero.
    assert_eq!(quantize(0.5, 3., 13., 4.), 7.);
}

#[test]
fn quantize_clamps_out_of_bounds_ratios() {
    assert_eq!(quantize(-0.4, 0., 100., 1.), 0.);
    assert_eq!(quantize(1.7, 0., 100., 1.), 100.);
    // A step that does not divide the span only reaches `max` once the
    // pointer travels far enough past the end of the element.
    assert_eq!(quantize(1., 0., 10., 3.), 9.);
    assert_eq!(quantize(1.2, 0., 10., 3.), 10.);
}

#[test]
fn degenerate_ranges() {
    assert_eq!(quantize(0.5, 5., 5., 1.), 5.);
    assert_eq!(quantize(0.5, 10., 0., 1.), 10.);
    assert_eq!(quantize(0.5, 0., f64::INFINITY, 1.), 0.);
    assert_eq!(quantize(f64::NAN, 0., 10., 1.), 0.);
    assert_eq!(value_to_ratio(5., 5., 5.), ZeroToOne::ZERO);
    assert_eq!(value_to_ratio(5., 10., 0.), ZeroToOne::ZERO);
}

#[test]
fn non_finite_step_disables_snapping() {
    assert_eq!(quantize_value(42.4, 0., 100., f64::NAN), 42.4);
    assert_eq!(quantize_value(142.4, 0., 100., 0.), 100.);
}

#[test]
fn ratios() {
    assert_eq!(value_to_ratio(270., 0., 360.), 0.75);
    assert_eq!(value_to_ratio(-20., 0., 360.), ZeroToOne::ZERO);
    assert_eq!(value_to_ratio(720., 0., 360.), ZeroToOne::ONE);
    assert_eq!(ratio_to_value(0.25, 0., 360.), 90.);
    assert_eq!(ratio_to_value(4., 0., 360.), 360.);
    assert_eq!(ZeroToOne::new(f64::NAN), ZeroToOne::ZERO);
    assert_eq!(ZeroToOne::new(0.5).percent(), 50.);
}

#[test]
fn ratio_equality_matches_ordering() {
    let a = ZeroToOne::new(0.5);
    let b = ZeroToOne::new(0.5 + f64::EPSILON / 2.);
    let c = ZeroToOne::new(0.5 + f64::EPSILON);
    assert_eq!(a == b, a.cmp(&b).is_eq());
    assert_eq!(b == c, b.cmp(&c).is_eq());
    assert_ne!(a, c);
    assert_eq!(ZeroToOne::new(-0.), ZeroToOne::ZERO);
    assert_eq!(ZeroToOne::new(-0.).cmp(&ZeroToOne::ZERO), Ordering::Equal);
}
