//! The numeric domain a slider operates over.

use crate::math::{self, ZeroToOne};

/// The bounds, step, and interactivity of a slider.
///
/// A range is fixed for the lifetime of the widget that uses it. Changing any
/// of these requires building a new widget.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderRange {
    min: f64,
    max: f64,
    step: f64,
    disabled: bool,
}

impl SliderRange {
    /// The step used when none is configured, or when the configured step is
    /// not a positive finite number.
    pub const DEFAULT_STEP: f64 = 1.;

    /// Returns a range spanning `min..=max` with a step of
    /// [`DEFAULT_STEP`](Self::DEFAULT_STEP).
    ///
    /// `min` may equal `max`, in which case every ratio maps to `min`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: Self::DEFAULT_STEP,
            disabled: false,
        }
    }

    /// Sets the step size and returns self.
    ///
    /// A step that is not greater than zero is coerced to
    /// [`DEFAULT_STEP`](Self::DEFAULT_STEP).
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = if step.is_finite() && step > 0. {
            step
        } else {
            Self::DEFAULT_STEP
        };
        self
    }

    /// Sets whether pointer input is ignored and returns self.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the smallest value in this range.
    #[must_use]
    pub const fn minimum(&self) -> f64 {
        self.min
    }

    /// Returns the largest value in this range.
    #[must_use]
    pub const fn maximum(&self) -> f64 {
        self.max
    }

    /// Returns the step size. Always positive.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step
    }

    /// Returns true if pointer input should be ignored.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Converts a pointer ratio into a stepped value within this range.
    #[must_use]
    pub fn quantize(&self, offset_ratio: f64) -> f64 {
        math::quantize(offset_ratio, self.min, self.max, self.step)
    }

    /// Returns where `value` sits within this range.
    #[must_use]
    pub fn ratio_of(&self, value: f64) -> ZeroToOne {
        math::value_to_ratio(value, self.min, self.max)
    }

    /// Clamps `value` into this range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        math::clamp(value, self.min, self.max)
    }
}

impl Default for SliderRange {
    fn default() -> Self {
        Self::new(0., 100.)
    }
}

#[test]
fn step_coercion() {
    assert_eq!(SliderRange::new(0., 10.).step(0.).step_size(), 1.);
    assert_eq!(SliderRange::new(0., 10.).step(-2.).step_size(), 1.);
    assert_eq!(SliderRange::new(0., 10.).step(f64::NAN).step_size(), 1.);
    assert_eq!(SliderRange::new(0., 10.).step(0.25).step_size(), 0.25);
}

#[test]
fn defaults() {
    let range = SliderRange::default();
    assert_eq!(range.minimum(), 0.);
    assert_eq!(range.maximum(), 100.);
    assert_eq!(range.step_size(), 1.);
    assert!(!range.is_disabled());
    assert!(range.disabled(true).is_disabled());
}

#[test]
fn equal_bounds_have_zero_ratio() {
    let range = SliderRange::new(42., 42.);
    assert_eq!(range.ratio_of(42.), ZeroToOne::ZERO);
    assert_eq!(range.ratio_of(1000.), ZeroToOne::ZERO);
    assert_eq!(range.quantize(0.9), 42.);
}
