//! Hue, saturation, and lightness colors.

use std::fmt::{self, Display};

use intentional::Cast;
use palette::{FromColor, Hsl, Srgb};

use crate::range::SliderRange;

/// A color expressed as hue (degrees), saturation (percent), and lightness
/// (percent).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HslColor {
    /// The hue, in degrees.
    pub hue: f64,
    /// The saturation, from 0 to 100.
    pub saturation: f64,
    /// The lightness, from 0 to 100.
    pub lightness: f64,
}

impl HslColor {
    /// Returns a new color.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Returns the value of `channel`.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Hue => self.hue,
            Channel::Saturation => self.saturation,
            Channel::Lightness => self.lightness,
        }
    }

    /// Returns a copy of this color with `channel` set to `value`.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel, value: f64) -> Self {
        match channel {
            Channel::Hue => self.hue = value,
            Channel::Saturation => self.saturation = value,
            Channel::Lightness => self.lightness = value,
        }
        self
    }

    /// Returns the two channels other than `channel`, in hue, saturation,
    /// lightness order.
    #[must_use]
    pub fn others(&self, channel: Channel) -> (f64, f64) {
        match channel {
            Channel::Hue => (self.saturation, self.lightness),
            Channel::Saturation => (self.hue, self.lightness),
            Channel::Lightness => (self.hue, self.saturation),
        }
    }

    /// Returns the channels as `[hue, saturation, lightness]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.hue, self.saturation, self.lightness]
    }

    /// Converts this color to 8-bit sRGB components.
    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        let hsl: Hsl = Hsl::new(
            self.hue.cast::<f32>(),
            (self.saturation / 100.).clamp(0., 1.).cast::<f32>(),
            (self.lightness / 100.).clamp(0., 1.).cast::<f32>(),
        );
        let rgb: Srgb<u8> = Srgb::from_color(hsl).into_format();
        [rgb.red, rgb.green, rgb.blue]
    }
}

impl Default for HslColor {
    fn default() -> Self {
        Self::new(199., 99., 72.)
    }
}

impl From<[f64; 3]> for HslColor {
    fn from([hue, saturation, lightness]: [f64; 3]) -> Self {
        Self::new(hue, saturation, lightness)
    }
}

impl Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// One of the three channels of an [`HslColor`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Hue, from 0 to 360 degrees.
    Hue,
    /// Saturation, from 0 to 100 percent.
    Saturation,
    /// Lightness, from 0 to 100 percent.
    Lightness,
}

impl Channel {
    /// All channels, in hue, saturation, lightness order.
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Lightness];

    /// Returns the range a slider for this channel spans.
    #[must_use]
    pub fn range(self) -> SliderRange {
        match self {
            Channel::Hue => SliderRange::new(0., 360.).step(1.),
            Channel::Saturation | Channel::Lightness => SliderRange::new(0., 100.).step(1.),
        }
    }
}

#[test]
fn channel_access() {
    let color = HslColor::new(120., 100., 50.);
    assert_eq!(color.others(Channel::Hue), (100., 50.));
    assert_eq!(color.others(Channel::Saturation), (120., 50.));
    assert_eq!(color.others(Channel::Lightness), (120., 100.));
    assert_eq!(color.with_channel(Channel::Lightness, 10.).lightness, 10.);
    assert_eq!(color.channel(Channel::Saturation), 100.);
    assert_eq!(Channel::Hue.range().maximum(), 360.);
}

#[test]
fn rgb_conversion() {
    assert_eq!(HslColor::new(0., 100., 50.).to_rgb(), [255, 0, 0]);
    assert_eq!(HslColor::new(120., 100., 50.).to_rgb(), [0, 255, 0]);
    assert_eq!(HslColor::new(0., 0., 100.).to_rgb(), [255, 255, 255]);
    assert_eq!(HslColor::new(0., 0., 0.).to_rgb(), [0, 0, 0]);
}

#[test]
fn display() {
    assert_eq!(HslColor::default().to_string(), "hsl(199, 99%, 72%)");
}
