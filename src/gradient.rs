//! CSS gradients painted behind HSL channel sliders.
//!
//! Each channel slider shows how the color changes as that channel moves
//! while the other two stay fixed. A slider is painted with two layers: the
//! `track` gradient across the draggable area, and an `edge` gradient behind
//! the padding on either end, repeating the end colors so the track's rounded
//! ends don't show artifacts.

use crate::color::Channel;
use crate::math::clamp;

/// The hue stops used when none are configured.
pub const DEFAULT_HUE_STOPS: [f64; 7] = [0., 60., 120., 180., 240., 300., 360.];

/// The pair of gradients painted behind a channel slider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientPair {
    /// The gradient across the track.
    pub track: String,
    /// The gradient behind the track's ends.
    pub edge: String,
}

impl GradientPair {
    /// Returns the gradients for a slider controlling `channel`, where
    /// `others` holds the remaining two channels in hue, saturation,
    /// lightness order.
    ///
    /// `hue_stops` is only used for [`Channel::Hue`].
    #[must_use]
    pub fn for_channel(channel: Channel, others: (f64, f64), hue_stops: &[f64]) -> Self {
        let (a, b) = others;
        match channel {
            Channel::Hue => hue_gradient_pair(a, b, hue_stops),
            Channel::Saturation => saturation_gradient_pair(a, b),
            Channel::Lightness => lightness_gradient_pair(a, b),
        }
    }
}

fn normalize_hue(hue: f64) -> f64 {
    ((hue % 360.) + 360.) % 360.
}

fn percent(value: f64) -> f64 {
    // Adding zero folds -0 into 0 so it never prints as "-0".
    clamp(value, 0., 100.) + 0.
}

fn hsl(hue: f64, saturation: f64, lightness: f64) -> String {
    format!("hsl({hue}, {saturation}%, {lightness}%)")
}

fn linear_to_right(stops: &[String]) -> String {
    format!("linear-gradient(to right, {})", stops.join(", "))
}

/// Returns the track gradient for a hue slider, sweeping through
/// `stops` at the fixed `saturation` and `lightness`.
#[must_use]
pub fn hue_track(saturation: f64, lightness: f64, stops: &[f64]) -> String {
    let (saturation, lightness) = (percent(saturation), percent(lightness));
    let stops = stops
        .iter()
        .map(|hue| hsl(normalize_hue(*hue), saturation, lightness))
        .collect::<Vec<_>>();
    linear_to_right(&stops)
}

/// Returns the edge gradient for a hue slider.
#[must_use]
pub fn hue_edge(saturation: f64, lightness: f64) -> String {
    let end = hsl(0., percent(saturation), percent(lightness));
    linear_to_right(&[end.clone(), end])
}

/// Returns both gradients for a hue slider.
#[must_use]
pub fn hue_gradient_pair(saturation: f64, lightness: f64, stops: &[f64]) -> GradientPair {
    GradientPair {
        track: hue_track(saturation, lightness, stops),
        edge: hue_edge(saturation, lightness),
    }
}

/// Returns the track gradient for a saturation slider.
#[must_use]
pub fn saturation_track(hue: f64, lightness: f64) -> String {
    let (hue, lightness) = (normalize_hue(hue), percent(lightness));
    linear_to_right(&[hsl(hue, 0., lightness), hsl(hue, 100., lightness)])
}

/// Returns the edge gradient for a saturation slider.
#[must_use]
pub fn saturation_edge(hue: f64, lightness: f64) -> String {
    let (hue, lightness) = (normalize_hue(hue), percent(lightness));
    let start = hsl(hue, 0., lightness);
    let end = hsl(hue, 100., lightness);
    linear_to_right(&[start.clone(), start, end.clone(), end])
}

/// Returns both gradients for a saturation slider.
#[must_use]
pub fn saturation_gradient_pair(hue: f64, lightness: f64) -> GradientPair {
    GradientPair {
        track: saturation_track(hue, lightness),
        edge: saturation_edge(hue, lightness),
    }
}

/// Returns the track gradient for a lightness slider, passing through the
/// fully saturated color at its midpoint.
#[must_use]
pub fn lightness_track(hue: f64, saturation: f64) -> String {
    let (hue, saturation) = (normalize_hue(hue), percent(saturation));
    linear_to_right(&[
        hsl(hue, saturation, 0.),
        hsl(hue, saturation, 50.),
        hsl(hue, saturation, 100.),
    ])
}

/// Returns the edge gradient for a lightness slider.
#[must_use]
pub fn lightness_edge(hue: f64, saturation: f64) -> String {
    let (hue, saturation) = (normalize_hue(hue), percent(saturation));
    let start = hsl(hue, saturation, 0.);
    let end = hsl(hue, saturation, 100.);
    linear_to_right(&[start.clone(), start, end.clone(), end])
}

/// Returns both gradients for a lightness slider.
#[must_use]
pub fn lightness_gradient_pair(hue: f64, saturation: f64) -> GradientPair {
    GradientPair {
        track: lightness_track(hue, saturation),
        edge: lightness_edge(hue, saturation),
    }
}

#[test]
fn hue_gradients() {
    assert_eq!(
        hue_track(100., 50., &[0., 180., 360.]),
        "linear-gradient(to right, hsl(0, 100%, 50%), hsl(180, 100%, 50%), hsl(0, 100%, 50%))"
    );
    assert_eq!(
        hue_edge(150., -3.),
        "linear-gradient(to right, hsl(0, 100%, 0%), hsl(0, 100%, 0%))"
    );
    assert_eq!(hue_track(0., 0., &DEFAULT_HUE_STOPS).matches("hsl(").count(), 7);
}

#[test]
fn saturation_gradients() {
    assert_eq!(
        saturation_track(-60., 50.),
        "linear-gradient(to right, hsl(300, 0%, 50%), hsl(300, 100%, 50%))"
    );
    assert_eq!(
        saturation_edge(120., 50.),
        "linear-gradient(to right, hsl(120, 0%, 50%), hsl(120, 0%, 50%), \
         hsl(120, 100%, 50%), hsl(120, 100%, 50%))"
    );
}

#[test]
fn lightness_gradients() {
    assert_eq!(
        lightness_track(480., 99.5),
        "linear-gradient(to right, hsl(120, 99.5%, 0%), hsl(120, 99.5%, 50%), \
         hsl(120, 99.5%, 100%))"
    );
    assert_eq!(
        GradientPair::for_channel(Channel::Lightness, (120., 99.5), &DEFAULT_HUE_STOPS),
        lightness_gradient_pair(120., 99.5)
    );
}
