//! Propagation of landed values onto retained nodes.
//!
//! Derived visual state is never stored as its own source of truth. Each
//! propagator recomputes it from a freshly landed value and pushes the result
//! straight onto the nodes it was given, bypassing any declarative rebuild.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::color::Channel;
use crate::gradient::GradientPair;
use crate::math::ZeroToOne;
use crate::range::SliderRange;
use crate::styles::{Styles, BACKGROUND_IMAGE, LEFT};
use crate::value::{ControllableValue, WriteAction};
use crate::view::NodeRef;

/// Tracks a slider's thumb ratio and positions the thumb node.
#[derive(Debug)]
pub struct ThumbPosition {
    range: SliderRange,
    ratio: Mutex<ZeroToOne>,
    thumb: NodeRef,
}

impl ThumbPosition {
    /// Returns a propagator for a slider spanning `range`, seeded with the
    /// ratio of `initial`.
    #[must_use]
    pub fn new(range: SliderRange, initial: f64, thumb: NodeRef) -> Arc<Self> {
        Arc::new(Self {
            range,
            ratio: Mutex::new(range.ratio_of(initial)),
            thumb,
        })
    }

    /// Returns the most recently propagated ratio.
    #[must_use]
    pub fn ratio(&self) -> ZeroToOne {
        *self.ratio.lock()
    }

    /// Recomputes the ratio from `value` and moves the thumb.
    pub fn propagate(&self, value: f64) {
        let ratio = self.range.ratio_of(value);
        *self.ratio.lock() = ratio;
        trace!(value, ratio = *ratio, "thumb ratio derived");
        self.refresh();
    }

    /// Pushes the current ratio onto the thumb node, if one is bound.
    pub fn refresh(&self) {
        self.thumb.set_style_properties(&thumb_style(self.ratio()));
    }
}

/// Returns the inline style that places a thumb at `ratio` along its track.
#[must_use]
pub fn thumb_style(ratio: ZeroToOne) -> Styles {
    Styles::new().with(LEFT, format!("{}%", ratio.percent()))
}

/// Paints a channel slider's gradients from the values of the two other
/// channels.
///
/// The edge gradient is written to the slider's root style and the track
/// gradient to its track style. Both writes are silent: they land and apply
/// to the nodes without notifying anyone upstream.
#[derive(Debug, Clone)]
pub struct GradientTrack {
    channel: Channel,
    hue_stops: Arc<[f64]>,
    root_style: ControllableValue<Styles>,
    track_style: ControllableValue<Styles>,
}

impl GradientTrack {
    /// Returns a propagator painting `channel` gradients into the given
    /// style values.
    #[must_use]
    pub fn new(
        channel: Channel,
        hue_stops: Arc<[f64]>,
        root_style: ControllableValue<Styles>,
        track_style: ControllableValue<Styles>,
    ) -> Self {
        Self {
            channel,
            hue_stops,
            root_style,
            track_style,
        }
    }

    /// Returns the channel this propagator paints.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the gradient pair for `others` without applying it.
    #[must_use]
    pub fn gradients(&self, others: (f64, f64)) -> GradientPair {
        GradientPair::for_channel(self.channel, others, &self.hue_stops)
    }

    /// Recomputes the gradients from `others` and applies them.
    pub fn propagate(&self, others: (f64, f64)) -> GradientPair {
        let pair = self.gradients(others);
        trace!(channel = ?self.channel, ?others, "gradients derived");
        let edge = pair.edge.clone();
        self.root_style
            .write_silent(WriteAction::map(move |current: &Styles| {
                current.clone().with(BACKGROUND_IMAGE, edge)
            }));
        let track = pair.track.clone();
        self.track_style
            .write_silent(WriteAction::map(move |current: &Styles| {
                current.clone().with(BACKGROUND_IMAGE, track)
            }));
        pair
    }
}

#[cfg(test)]
fn styled_value(node: &Arc<crate::view::Node>) -> ControllableValue<Styles> {
    let reference = NodeRef::new();
    reference.bind(node.clone());
    ControllableValue::build(Styles::new())
        .on_derived_change(move |styles: &Styles| {
            reference.set_style_properties(styles);
        })
        .finish()
}

#[test]
fn thumb_follows_value() {
    let node = crate::view::Node::new("thumb");
    let thumb = NodeRef::new();
    let position = ThumbPosition::new(SliderRange::new(0., 360.), 90., thumb.clone());
    assert_eq!(position.ratio(), 0.25);

    // Nothing is bound yet, so the ratio updates without touching a node.
    position.propagate(180.);
    assert_eq!(node.update_count(), 0);

    thumb.bind(node.clone());
    position.refresh();
    assert_eq!(node.style(LEFT).as_deref(), Some("50%"));

    position.propagate(400.);
    assert_eq!(position.ratio(), ZeroToOne::ONE);
    assert_eq!(node.style(LEFT).as_deref(), Some("100%"));
}

#[test]
fn degenerate_ranges_pin_the_thumb() {
    let position = ThumbPosition::new(SliderRange::new(5., 5.), 5., NodeRef::new());
    position.propagate(5.);
    assert_eq!(position.ratio(), ZeroToOne::ZERO);
    assert_eq!(thumb_style(position.ratio()).get(LEFT), Some("0%"));
}

#[test]
fn gradients_land_on_root_and_track() {
    let root = crate::view::Node::new("root");
    let track = crate::view::Node::new("track");
    let gradients = GradientTrack::new(
        Channel::Saturation,
        Arc::from(crate::gradient::DEFAULT_HUE_STOPS.as_slice()),
        styled_value(&root),
        styled_value(&track),
    );

    let pair = gradients.propagate((120., 50.));
    assert_eq!(root.style(BACKGROUND_IMAGE), Some(pair.edge));
    assert_eq!(track.style(BACKGROUND_IMAGE), Some(pair.track.clone()));
    assert!(pair.track.contains("hsl(120, 100%, 50%)"));

    // Repeating the same inputs lands nothing new.
    gradients.propagate((120., 50.));
    assert_eq!(track.update_count(), 1);
}
