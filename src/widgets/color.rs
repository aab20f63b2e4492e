//! Widgets for selecting colors.
//!
//! A [`ColorPicker`] is three [`ChannelSlider`]s, one per HSL channel. Each
//! channel slider paints gradients that depend on the *other* two channels,
//! so a change to one channel fans out to its siblings: the picker writes the
//! new pair of inputs into each sibling's gradient slot, repainting it without
//! touching its value.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::slider::{Slider, SliderHandle, SliderNodes};
use crate::color::{Channel, HslColor};
use crate::derive::GradientTrack;
use crate::gradient::{GradientPair, DEFAULT_HUE_STOPS};
use crate::styles::{Styles, BACKGROUND_IMAGE};
use crate::value::{ControllableValue, ExternalSlot};
use crate::WithClone;

type ColorCallback = Arc<dyn Fn(HslColor) + Send + Sync>;

/// Configures a slider controlling one channel of an [`HslColor`].
#[must_use = "sliders must be built before they can be mounted"]
pub struct ChannelSlider {
    channel: Channel,
    slider: Slider,
    initial_others: Option<(f64, f64)>,
    gradient_slot: ExternalSlot<(f64, f64)>,
    hue_stops: Arc<[f64]>,
}

impl ChannelSlider {
    /// Returns a slider for `channel`, spanning the channel's full range.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            slider: Slider::new(channel.range()),
            initial_others: None,
            gradient_slot: ExternalSlot::new(),
            hue_stops: Arc::from(DEFAULT_HUE_STOPS.as_slice()),
        }
    }

    /// Returns a slider for the hue channel.
    pub fn hue() -> Self {
        Self::new(Channel::Hue)
    }

    /// Returns a slider for the saturation channel.
    pub fn saturation() -> Self {
        Self::new(Channel::Saturation)
    }

    /// Returns a slider for the lightness channel.
    pub fn lightness() -> Self {
        Self::new(Channel::Lightness)
    }

    /// Seeds the slider with `value`.
    pub fn initial_value(mut self, value: f64) -> Self {
        self.slider = self.slider.initial_value(value);
        self
    }

    /// Seeds the gradients with the values of the two other channels, in hue,
    /// saturation, lightness order.
    ///
    /// Defaults to the other channels of [`HslColor::default()`].
    pub fn initial_others(mut self, others: (f64, f64)) -> Self {
        self.initial_others = Some(others);
        self
    }

    /// Hands ownership of the value to whoever holds `slot`.
    pub fn controlled_by(mut self, slot: ExternalSlot<f64>) -> Self {
        self.slider = self.slider.controlled_by(slot);
        self
    }

    /// Like [`controlled_by()`](Self::controlled_by), when `slot` is `Some`.
    pub fn maybe_controlled_by(mut self, slot: Option<ExternalSlot<f64>>) -> Self {
        self.slider = self.slider.maybe_controlled_by(slot);
        self
    }

    /// Installs the gradient inputs' writer into `slot` while mounted.
    ///
    /// Writing a pair of other-channel values through the slot repaints this
    /// slider's gradients.
    pub fn gradient_slot(mut self, slot: ExternalSlot<(f64, f64)>) -> Self {
        self.gradient_slot = slot;
        self
    }

    /// Sets the hues the hue gradient passes through. Ignored by the other
    /// channels.
    pub fn hue_stops(mut self, stops: impl Into<Arc<[f64]>>) -> Self {
        self.hue_stops = stops.into();
        self
    }

    /// Invokes `on_change` with every value accepted or proposed during a
    /// drag.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.slider = self.slider.on_change(on_change);
        self
    }

    /// Invokes `on_commit` once per gesture with the final value.
    pub fn on_commit<F>(mut self, on_commit: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.slider = self.slider.on_commit(on_commit);
        self
    }

    /// Invokes `on_derived_change` each time a value lands locally.
    pub fn on_derived_change<F>(mut self, on_derived_change: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.slider = self.slider.on_derived_change(on_derived_change);
        self
    }

    /// Builds the slider.
    #[must_use]
    pub fn build(self) -> ChannelHandle {
        let channel = self.channel;
        let others = self
            .initial_others
            .unwrap_or_else(|| HslColor::default().others(channel));
        let initial = GradientPair::for_channel(channel, others, &self.hue_stops);

        let slider = self
            .slider
            .root_style(Styles::new().with(BACKGROUND_IMAGE, initial.edge))
            .track_style(Styles::new().with(BACKGROUND_IMAGE, initial.track))
            .build();

        let gradient = GradientTrack::new(
            channel,
            self.hue_stops,
            slider.root_style().clone(),
            slider.track_style().clone(),
        );
        let inputs = ControllableValue::build(others)
            .external(self.gradient_slot.clone())
            .on_derived_change({
                let gradient = gradient.clone();
                move |others: &(f64, f64)| {
                    gradient.propagate(*others);
                }
            })
            .finish();

        ChannelHandle(Arc::new(ChannelData {
            channel,
            slider,
            inputs,
            gradient,
            gradient_slot: self.gradient_slot,
        }))
    }
}

impl Debug for ChannelSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSlider")
            .field("channel", &self.channel)
            .field("slider", &self.slider)
            .finish_non_exhaustive()
    }
}

struct ChannelData {
    channel: Channel,
    slider: SliderHandle,
    inputs: ControllableValue<(f64, f64)>,
    gradient: GradientTrack,
    gradient_slot: ExternalSlot<(f64, f64)>,
}

/// A built channel slider.
#[derive(Clone)]
pub struct ChannelHandle(Arc<ChannelData>);

impl ChannelHandle {
    /// Mounts the slider and installs the gradient inputs' writer into the
    /// gradient slot.
    pub fn mount(&self, nodes: SliderNodes) {
        self.0.slider.mount(nodes);
        self.0.inputs.init();
    }

    /// Unmounts the slider and releases its slots.
    pub fn unmount(&self) {
        self.0.inputs.dispose();
        self.0.slider.unmount();
    }

    /// Returns the channel this slider controls.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.0.channel
    }

    /// Returns the underlying slider.
    #[must_use]
    pub fn slider(&self) -> &SliderHandle {
        &self.0.slider
    }

    /// Returns the locally landed value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.slider.value()
    }

    /// Returns the other-channel values the gradients were painted from.
    #[must_use]
    pub fn others(&self) -> (f64, f64) {
        self.0.inputs.get()
    }

    /// Returns the gradients currently painted.
    #[must_use]
    pub fn gradients(&self) -> GradientPair {
        self.0.gradient.gradients(self.others())
    }

    /// Returns the slot the gradient inputs' writer is installed into.
    #[must_use]
    pub fn gradient_slot(&self) -> &ExternalSlot<(f64, f64)> {
        &self.0.gradient_slot
    }
}

impl Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("channel", &self.0.channel)
            .field("slider", &self.0.slider)
            .field("others", &self.0.inputs)
            .finish()
    }
}

/// External slots for each channel of an externally owned [`ColorPicker`].
#[derive(Debug, Clone, Default)]
pub struct HslSlots {
    /// The hue slider's slot.
    pub hue: ExternalSlot<f64>,
    /// The saturation slider's slot.
    pub saturation: ExternalSlot<f64>,
    /// The lightness slider's slot.
    pub lightness: ExternalSlot<f64>,
}

impl HslSlots {
    /// Returns three empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `channel`.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &ExternalSlot<f64> {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Lightness => &self.lightness,
        }
    }

    /// Lands `color` on every bound slider without notifying.
    ///
    /// Returns true if any channel changed.
    pub fn write_silent(&self, color: HslColor) -> bool {
        let mut changed = false;
        for channel in Channel::ALL {
            changed |= self.channel(channel).write_silent(color.channel(channel));
        }
        changed
    }
}

/// Configures a hue, saturation, and lightness color picker.
#[must_use = "color pickers must be built before they can be mounted"]
pub struct ColorPicker {
    initial: HslColor,
    slots: Option<HslSlots>,
    hue_stops: Arc<[f64]>,
    on_hsl_change: Option<ColorCallback>,
    on_hsl_commit: Option<ColorCallback>,
}

impl ColorPicker {
    /// Returns a picker seeded with `initial`.
    pub fn new(initial: HslColor) -> Self {
        Self {
            initial,
            slots: None,
            hue_stops: Arc::from(DEFAULT_HUE_STOPS.as_slice()),
            on_hsl_change: None,
            on_hsl_commit: None,
        }
    }

    /// Hands ownership of each channel to whoever holds `slots`.
    ///
    /// Dragging then only proposes colors through `on_hsl_change`. The owner
    /// lands accepted colors with [`HslSlots::write_silent`].
    pub fn controlled_by(mut self, slots: HslSlots) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Sets the hues the hue slider's gradient passes through.
    pub fn hue_stops(mut self, stops: impl Into<Arc<[f64]>>) -> Self {
        self.hue_stops = stops.into();
        self
    }

    /// Invokes `on_hsl_change` with the full color each time any channel is
    /// accepted or proposed during a drag.
    pub fn on_hsl_change<F>(mut self, on_hsl_change: F) -> Self
    where
        F: Fn(HslColor) + Send + Sync + 'static,
    {
        self.on_hsl_change = Some(Arc::new(on_hsl_change));
        self
    }

    /// Invokes `on_hsl_commit` with the full color when a drag of any channel
    /// is released.
    pub fn on_hsl_commit<F>(mut self, on_hsl_commit: F) -> Self
    where
        F: Fn(HslColor) + Send + Sync + 'static,
    {
        self.on_hsl_commit = Some(Arc::new(on_hsl_commit));
        self
    }

    /// Builds the picker.
    #[must_use]
    pub fn build(self) -> ColorPickerHandle {
        let color = Arc::new(Mutex::new(self.initial));
        let gradient_slots: [ExternalSlot<(f64, f64)>; 3] = Default::default();

        let channels = Channel::ALL.map(|channel| {
            let mut slider = ChannelSlider::new(channel)
                .initial_value(self.initial.channel(channel))
                .initial_others(self.initial.others(channel))
                .gradient_slot(gradient_slots[channel_index(channel)].clone())
                .hue_stops(self.hue_stops.clone())
                .maybe_controlled_by(self.slots.as_ref().map(|slots| slots.channel(channel).clone()))
                .on_derived_change((&color, &gradient_slots).with_clone(|(color, siblings)| {
                    move |value: f64| {
                        let updated = {
                            let mut color = color.lock();
                            *color = color.with_channel(channel, value);
                            *color
                        };
                        for sibling in Channel::ALL.into_iter().filter(|c| *c != channel) {
                            siblings[channel_index(sibling)].write_silent(updated.others(sibling));
                        }
                    }
                }));
            if let Some(on_hsl_change) = self.on_hsl_change.clone() {
                slider = slider.on_change((&color).with_clone(|color| {
                    move |value: f64| {
                        let proposed = color.lock().with_channel(channel, value);
                        on_hsl_change(proposed);
                    }
                }));
            }
            if let Some(on_hsl_commit) = self.on_hsl_commit.clone() {
                slider = slider.on_commit((&color).with_clone(|color| {
                    move |value: f64| {
                        let committed = color.lock().with_channel(channel, value);
                        on_hsl_commit(committed);
                    }
                }));
            }
            slider.build()
        });

        ColorPickerHandle { channels, color }
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new(HslColor::default())
    }
}

impl Debug for ColorPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorPicker")
            .field("initial", &self.initial)
            .field("controlled", &self.slots.is_some())
            .finish_non_exhaustive()
    }
}

fn channel_index(channel: Channel) -> usize {
    match channel {
        Channel::Hue => 0,
        Channel::Saturation => 1,
        Channel::Lightness => 2,
    }
}

/// The nodes each of a color picker's sliders are mounted onto.
#[derive(Debug, Clone)]
pub struct PickerNodes {
    /// The hue slider's nodes.
    pub hue: SliderNodes,
    /// The saturation slider's nodes.
    pub saturation: SliderNodes,
    /// The lightness slider's nodes.
    pub lightness: SliderNodes,
}

/// A built color picker.
#[derive(Clone)]
pub struct ColorPickerHandle {
    channels: [ChannelHandle; 3],
    color: Arc<Mutex<HslColor>>,
}

impl ColorPickerHandle {
    /// Mounts every channel slider, then repaints each slider's gradients
    /// from the current color.
    pub fn mount(&self, nodes: PickerNodes) {
        self.hue().mount(nodes.hue);
        self.saturation().mount(nodes.saturation);
        self.lightness().mount(nodes.lightness);

        // Fan-outs that happened before every gradient slot was bound were
        // lost; catch the siblings up now.
        let color = self.color();
        for channel in &self.channels {
            channel.gradient_slot().write_silent(color.others(channel.channel()));
        }
        debug!(%color, "mounted color picker");
    }

    /// Unmounts every channel slider.
    pub fn unmount(&self) {
        for channel in &self.channels {
            channel.unmount();
        }
        debug!("unmounted color picker");
    }

    /// Returns the color as last landed by the sliders.
    #[must_use]
    pub fn color(&self) -> HslColor {
        *self.color.lock()
    }

    /// Returns the slider for `channel`.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &ChannelHandle {
        &self.channels[channel_index(channel)]
    }

    /// Returns the hue slider.
    #[must_use]
    pub fn hue(&self) -> &ChannelHandle {
        self.channel(Channel::Hue)
    }

    /// Returns the saturation slider.
    #[must_use]
    pub fn saturation(&self) -> &ChannelHandle {
        self.channel(Channel::Saturation)
    }

    /// Returns the lightness slider.
    #[must_use]
    pub fn lightness(&self) -> &ChannelHandle {
        self.channel(Channel::Lightness)
    }
}

impl Debug for ColorPickerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorPickerHandle")
            .field("color", &*self.color.lock())
            .field("channels", &self.channels)
            .finish()
    }
}

#[cfg(test)]
fn slider_nodes(prefix: &str) -> (SliderNodes, [Arc<crate::view::Node>; 3]) {
    use crate::view::Node;

    let root = Node::new(format!("{prefix}-root"));
    let track = Node::new(format!("{prefix}-track"));
    let thumb = Node::new(format!("{prefix}-thumb"));
    (
        SliderNodes {
            root: root.clone(),
            track: track.clone(),
            thumb: thumb.clone(),
        },
        [root, track, thumb],
    )
}

#[test]
fn channel_gradients_follow_their_slot() {
    let slot = ExternalSlot::new();
    let channel = ChannelSlider::saturation()
        .initial_value(40.)
        .initial_others((0., 50.))
        .gradient_slot(slot.clone())
        .build();
    let (nodes, [root, track, _]) = slider_nodes("s");
    assert!(!slot.is_bound());

    channel.mount(nodes);
    assert!(slot.is_bound());
    assert_eq!(
        track.style(BACKGROUND_IMAGE).as_deref(),
        Some("linear-gradient(to right, hsl(0, 0%, 50%), hsl(0, 100%, 50%))")
    );

    assert!(slot.write_silent((240., 25.)));
    assert_eq!(channel.others(), (240., 25.));
    assert_eq!(root.style(BACKGROUND_IMAGE), Some(channel.gradients().edge));
    assert_eq!(channel.value(), 40.);

    channel.unmount();
    assert!(!slot.is_bound());
}

#[test]
fn dropping_a_channel_releases_its_slot() {
    let slot = ExternalSlot::new();
    let channel = ChannelSlider::hue().gradient_slot(slot.clone()).build();
    channel.mount(slider_nodes("h").0);
    assert!(slot.is_bound());
    drop(channel);
    assert!(!slot.is_bound());
}

#[test]
fn custom_hue_stops() {
    let channel = ChannelSlider::hue()
        .hue_stops(vec![0., 120., 240.])
        .initial_others((100., 50.))
        .build();
    assert_eq!(
        channel.gradients().track,
        "linear-gradient(to right, hsl(0, 100%, 50%), hsl(120, 100%, 50%), hsl(240, 100%, 50%))"
    );
}
