//! Widgets composed from controllable values, pointer sampling, and derived
//! state propagation.

pub mod color;
pub mod slider;

pub use color::{ChannelHandle, ChannelSlider, ColorPicker, ColorPickerHandle, HslSlots, PickerNodes};
pub use slider::{Slider, SliderHandle, SliderNodes};
