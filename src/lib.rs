//! Sliders and color pickers whose drag feedback never waits on application
//! state.
//!
//! Widgets in this crate are driven from a latency-sensitive *fast* context
//! that handles pointer input and mutates retained view nodes directly. The
//! application state that ultimately owns the values lives in a *slow*
//! context, which is only ever notified without waiting.
//!
//! The core of the crate is [`ControllableValue`](value::ControllableValue):
//! a value that either owns itself or is owned by an external driver, with
//! distinct semantics for landing a value, landing it silently, and merely
//! proposing it. Widgets compose it with a [`PointerSampler`](pointer::PointerSampler),
//! the quantizer in [`math`], and the propagators in [`derive`].
//!
//! ```rust
//! use std::future::ready;
//!
//! use tandem::pointer::BoundingClientRect;
//! use tandem::range::SliderRange;
//! use tandem::view::Node;
//! use tandem::widgets::{Slider, SliderNodes};
//!
//! let thumb = Node::new("thumb");
//! let slider = Slider::new(SliderRange::new(0., 360.)).build();
//! slider.mount(SliderNodes {
//!     root: Node::new("root"),
//!     track: Node::new("track"),
//!     thumb: thumb.clone(),
//! });
//! pollster::block_on(
//!     slider.track_layout_changed(200., ready(Ok(BoundingClientRect::horizontal(0., 200.)))),
//! );
//!
//! slider.pointer_down(100.);
//! assert_eq!(slider.value(), 180.);
//! assert_eq!(thumb.style("left").as_deref(), Some("50%"));
//! ```
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod utils;

pub mod color;
pub mod context;
pub mod derive;
pub mod gradient;
pub mod math;
pub mod pointer;
pub mod range;
pub mod styles;
pub mod value;
pub mod view;
pub mod widgets;

pub use utils::WithClone;

/// Counts the number of expressions passed to it.
///
/// This is used inside of Tandem macros to preallocate collections.
#[macro_export]
#[doc(hidden)]
macro_rules! count {
    ($value:expr ;) => {
        1
    };
    ($value:expr , $($remaining:expr),+ ;) => {
        1 + $crate::count!($($remaining),+ ;)
    }
}

/// Creates a [`Styles`](crate::styles::Styles) instance with the given
/// property/value pairs.
#[macro_export]
macro_rules! styles {
    () => {{
        $crate::styles::Styles::new()
    }};
    ($($property:expr => $value:expr),*) => {{
        let mut styles = $crate::styles::Styles::with_capacity($crate::count!($($value),* ;));
        $(styles.insert($property, $value);)*
        styles
    }};
    ($($property:expr => $value:expr),* ,) => {{
        $crate::styles!($($property => $value),*)
    }};
}

/// Installs a global `tracing` subscriber that writes to stdout.
///
/// The `RUST_LOG` environment variable filters the output. Without it, debug
/// builds log at `INFO` and release builds at `ERROR`. If a subscriber is
/// already installed, it is left in place.
///
/// This does nothing unless the `tracing-output` feature is enabled.
pub fn initialize_tracing() {
    #[cfg(feature = "tracing-output")]
    {
        use tracing::Level;
        use tracing_subscriber::filter::LevelFilter;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        use tracing_subscriber::EnvFilter;

        #[cfg(debug_assertions)]
        const MAX_LEVEL: Level = Level::INFO;
        #[cfg(not(debug_assertions))]
        const MAX_LEVEL: Level = Level::ERROR;

        let _result = tracing_subscriber::fmt::fmt()
            .with_max_level(MAX_LEVEL)
            .finish()
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::from_level(MAX_LEVEL).into())
                    .from_env_lossy(),
            )
            .try_init();
    }
}
