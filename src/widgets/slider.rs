//! A widget that allows a user to "slide" between values.
//!
//! A slider is mounted onto three retained nodes:
//!
//! - the *root*, which receives pointer events and paints the track's ends,
//! - the *track*, whose measured bounds are the pointer's coordinate frame,
//! - the *thumb*, positioned along the track by its `left` style.
//!
//! Pointer samples are quantized into the slider's [`SliderRange`] and
//! written to a [`ControllableValue`]. Landed values move the thumb directly;
//! accepted values are reported through `on_change` and each gesture's final
//! value through `on_commit`.
use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::derive::ThumbPosition;
use crate::math::ZeroToOne;
use crate::pointer::{BoundingClientRect, LayoutError, PointerPosition, PointerSampler};
use crate::range::SliderRange;
use crate::styles::Styles;
use crate::value::{ControllableValue, ExternalSlot, WriteAction};
use crate::view::{NodeRef, ViewHandle};

type ValueCallback = Arc<dyn Fn(&f64) + Send + Sync>;
type MountCallback = Arc<dyn Fn(&SliderHandle) + Send + Sync>;

/// Configures a slider.
#[must_use = "sliders must be built before they can be mounted"]
pub struct Slider {
    range: SliderRange,
    initial_value: Option<f64>,
    value_slot: Option<ExternalSlot<f64>>,
    on_change: Option<ValueCallback>,
    on_commit: Option<ValueCallback>,
    on_derived_change: Vec<ValueCallback>,
    on_mount: Option<MountCallback>,
    root_style: Styles,
    track_style: Styles,
    root_style_slot: Option<ExternalSlot<Styles>>,
    track_style_slot: Option<ExternalSlot<Styles>>,
}

impl Slider {
    /// Returns a new slider spanning `range`.
    pub fn new(range: SliderRange) -> Self {
        Self {
            range,
            initial_value: None,
            value_slot: None,
            on_change: None,
            on_commit: None,
            on_derived_change: Vec::new(),
            on_mount: None,
            root_style: Styles::new(),
            track_style: Styles::new(),
            root_style_slot: None,
            track_style_slot: None,
        }
    }

    /// Seeds the slider with `value`. Defaults to the range's minimum.
    pub fn initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Hands ownership of the value to whoever holds `slot`.
    ///
    /// While externally owned, pointer input only proposes values through
    /// `on_change`. The owner lands accepted values by writing silently
    /// through the slot once the slider is mounted.
    pub fn controlled_by(mut self, slot: ExternalSlot<f64>) -> Self {
        self.value_slot = Some(slot);
        self
    }

    /// Like [`controlled_by()`](Self::controlled_by), when `slot` is `Some`.
    pub fn maybe_controlled_by(mut self, slot: Option<ExternalSlot<f64>>) -> Self {
        self.value_slot = slot;
        self
    }

    /// Invokes `on_change` with every value accepted or proposed during a
    /// drag.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(move |value: &f64| on_change(*value)));
        self
    }

    /// Invokes `on_commit` once per gesture with the final quantized value.
    pub fn on_commit<F>(mut self, on_commit: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.on_commit = Some(Arc::new(move |value: &f64| on_commit(*value)));
        self
    }

    /// Invokes `on_derived_change` each time a value lands locally, after
    /// the thumb has moved.
    pub fn on_derived_change<F>(mut self, on_derived_change: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.on_derived_change
            .push(Arc::new(move |value: &f64| on_derived_change(*value)));
        self
    }

    /// Invokes `on_mount` after the slider's nodes are bound.
    pub fn on_mount<F>(mut self, on_mount: F) -> Self
    where
        F: Fn(&SliderHandle) + Send + Sync + 'static,
    {
        self.on_mount = Some(Arc::new(on_mount));
        self
    }

    /// Sets the inline style applied to the root node when mounted.
    pub fn root_style(mut self, styles: Styles) -> Self {
        self.root_style = styles;
        self
    }

    /// Sets the inline style applied to the track node when mounted.
    pub fn track_style(mut self, styles: Styles) -> Self {
        self.track_style = styles;
        self
    }

    /// Installs the root style's writer into `slot` while mounted.
    pub fn root_style_slot(mut self, slot: ExternalSlot<Styles>) -> Self {
        self.root_style_slot = Some(slot);
        self
    }

    /// Installs the track style's writer into `slot` while mounted.
    pub fn track_style_slot(mut self, slot: ExternalSlot<Styles>) -> Self {
        self.track_style_slot = Some(slot);
        self
    }

    /// Builds the slider.
    #[must_use]
    pub fn build(self) -> SliderHandle {
        let range = self.range;
        let initial = self.initial_value.unwrap_or(range.minimum());
        let nodes = NodeRefs::default();

        let thumb = ThumbPosition::new(range, initial, nodes.thumb.clone());
        let mut value = ControllableValue::build(initial)
            .maybe_external(self.value_slot)
            .on_derived_change({
                let thumb = thumb.clone();
                move |value: &f64| thumb.propagate(*value)
            });
        for derived in self.on_derived_change {
            value = value.on_derived_change(move |value: &f64| derived(value));
        }
        if let Some(on_change) = self.on_change {
            value = value.on_change(move |value: &f64| on_change(value));
        }
        let value = value.finish();

        let sampler = PointerSampler::new()
            .on_update({
                let value = value.clone();
                move |position: PointerPosition| {
                    if range.is_disabled() {
                        return;
                    }
                    value.write(range.quantize(position.offset_ratio));
                }
            })
            .on_commit({
                let value = value.clone();
                let on_commit = self.on_commit;
                move |position: PointerPosition| {
                    if range.is_disabled() {
                        return;
                    }
                    let next = range.quantize(position.offset_ratio);
                    if let Some(on_commit) = &on_commit {
                        on_commit(&next);
                    }
                    value.write(next);
                }
            });

        SliderHandle(Arc::new(SliderData {
            range,
            root_style: styled_value(self.root_style, self.root_style_slot, &nodes.root),
            track_style: styled_value(self.track_style, self.track_style_slot, &nodes.track),
            value,
            thumb,
            sampler,
            nodes,
            on_mount: self.on_mount,
        }))
    }
}

impl Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slider")
            .field("range", &self.range)
            .field("initial_value", &self.initial_value)
            .field("controlled", &self.value_slot.is_some())
            .finish_non_exhaustive()
    }
}

fn styled_value(
    initial: Styles,
    slot: Option<ExternalSlot<Styles>>,
    node: &NodeRef,
) -> ControllableValue<Styles> {
    let node = node.clone();
    ControllableValue::build(initial)
        .maybe_external(slot)
        .on_derived_change(move |styles: &Styles| {
            node.set_style_properties(styles);
        })
        .finish()
}

/// The nodes a slider is mounted onto.
#[derive(Clone)]
pub struct SliderNodes {
    /// The node receiving pointer events.
    pub root: ViewHandle,
    /// The node whose bounds are the pointer's coordinate frame.
    pub track: ViewHandle,
    /// The node positioned along the track.
    pub thumb: ViewHandle,
}

impl Debug for SliderNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderNodes").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct NodeRefs {
    root: NodeRef,
    track: NodeRef,
    thumb: NodeRef,
}

struct SliderData {
    range: SliderRange,
    value: ControllableValue<f64>,
    thumb: Arc<ThumbPosition>,
    sampler: PointerSampler,
    nodes: NodeRefs,
    root_style: ControllableValue<Styles>,
    track_style: ControllableValue<Styles>,
    on_mount: Option<MountCallback>,
}

/// A built slider.
///
/// Cloning produces another handle to the same slider. Pointer and layout
/// events are expected to arrive from one context at a time, in order.
#[derive(Clone)]
pub struct SliderHandle(Arc<SliderData>);

impl SliderHandle {
    /// Binds the slider to `nodes`, installs its writers into any external
    /// slots, and applies the current styles and thumb position.
    pub fn mount(&self, nodes: SliderNodes) {
        let data = &self.0;
        data.nodes.root.bind(nodes.root);
        data.nodes.track.bind(nodes.track);
        data.nodes.thumb.bind(nodes.thumb);

        data.value.init();
        data.root_style.init();
        data.track_style.init();

        data.nodes.root.set_style_properties(&data.root_style.get());
        data.nodes.track.set_style_properties(&data.track_style.get());
        data.thumb.refresh();
        debug!(value = data.value.get(), "mounted slider");

        if let Some(on_mount) = &data.on_mount {
            on_mount(self);
        }
    }

    /// Releases the slider's external slots and unbinds its nodes.
    pub fn unmount(&self) {
        let data = &self.0;
        data.value.dispose();
        data.root_style.dispose();
        data.track_style.dispose();
        data.nodes.root.unbind();
        data.nodes.track.unbind();
        data.nodes.thumb.unbind();
        debug!("unmounted slider");
    }

    /// Returns true while the slider is bound to nodes.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.nodes.root.is_bound()
    }

    /// Handles a pointer pressed at `x` on the root node.
    pub fn pointer_down(&self, x: f64) -> Option<PointerPosition> {
        self.0.sampler.pointer_down(x)
    }

    /// Handles a pointer moved to `x`.
    pub fn pointer_move(&self, x: f64) -> Option<PointerPosition> {
        self.0.sampler.pointer_move(x)
    }

    /// Handles a pointer released at `x`, committing the gesture.
    pub fn pointer_up(&self, x: f64) -> Option<PointerPosition> {
        self.0.sampler.pointer_up(x)
    }

    /// Handles a gesture cancelled at `x`, which also commits it.
    pub fn pointer_cancel(&self, x: f64) -> Option<PointerPosition> {
        self.0.sampler.pointer_cancel(x)
    }

    /// Handles a layout change of the track node. See
    /// [`PointerSampler::element_layout_changed`].
    pub fn track_layout_changed<Query>(
        &self,
        width: f64,
        query: Query,
    ) -> impl Future<Output = ()> + Send + 'static
    where
        Query: Future<Output = Result<BoundingClientRect, LayoutError>> + Send + 'static,
    {
        self.0.sampler.element_layout_changed(width, query)
    }

    /// Returns the range this slider spans.
    #[must_use]
    pub fn range(&self) -> SliderRange {
        self.0.range
    }

    /// Returns the locally landed value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.value.get()
    }

    /// Returns the thumb's position along the track.
    #[must_use]
    pub fn ratio(&self) -> ZeroToOne {
        self.0.thumb.ratio()
    }

    /// Returns the slider's value cell.
    #[must_use]
    pub fn value_cell(&self) -> &ControllableValue<f64> {
        &self.0.value
    }

    /// Returns the cell holding the root node's inline style.
    #[must_use]
    pub fn root_style(&self) -> &ControllableValue<Styles> {
        &self.0.root_style
    }

    /// Returns the cell holding the track node's inline style.
    #[must_use]
    pub fn track_style(&self) -> &ControllableValue<Styles> {
        &self.0.track_style
    }

    /// Merges `styles` into the root node's inline style.
    pub fn apply_root_style(&self, styles: Styles) -> bool {
        self.0
            .root_style
            .write_silent(WriteAction::map(move |current: &Styles| {
                current.merged_with(&styles)
            }))
    }

    /// Merges `styles` into the track node's inline style.
    pub fn apply_track_style(&self, styles: Styles) -> bool {
        self.0
            .track_style
            .write_silent(WriteAction::map(move |current: &Styles| {
                current.merged_with(&styles)
            }))
    }

    /// Returns the pointer sampler feeding this slider.
    #[must_use]
    pub fn sampler(&self) -> &PointerSampler {
        &self.0.sampler
    }
}

impl Debug for SliderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderHandle")
            .field("range", &self.0.range)
            .field("value", &self.0.value)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
struct Mounted {
    slider: SliderHandle,
    root: Arc<crate::view::Node>,
    track: Arc<crate::view::Node>,
    thumb: Arc<crate::view::Node>,
}

#[cfg(test)]
fn mounted(slider: Slider) -> Mounted {
    use crate::view::Node;

    let slider = slider.build();
    let (root, track, thumb) = (Node::new("root"), Node::new("track"), Node::new("thumb"));
    slider.mount(SliderNodes {
        root: root.clone(),
        track: track.clone(),
        thumb: thumb.clone(),
    });
    pollster::block_on(slider.track_layout_changed(
        100.,
        std::future::ready(Ok(BoundingClientRect::horizontal(0., 100.))),
    ));
    Mounted {
        slider,
        root,
        track,
        thumb,
    }
}

#[test]
fn dragging_moves_the_thumb() {
    let changes = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let Mounted { slider, thumb, .. } = mounted(
        Slider::new(SliderRange::new(0., 10.).step(2.))
            .initial_value(4.)
            .on_change({
                let changes = changes.clone();
                move |value| changes.lock().push(value)
            }),
    );
    assert_eq!(thumb.style("left").as_deref(), Some("40%"));

    slider.pointer_down(12.);
    slider.pointer_move(49.);
    slider.pointer_move(140.);
    assert_eq!(slider.value(), 10.);
    assert_eq!(thumb.style("left").as_deref(), Some("100%"));
    assert_eq!(*changes.lock(), [2., 4., 10.]);
}

#[test]
fn disabled_sliders_ignore_pointers() {
    let Mounted { slider, .. } =
        mounted(Slider::new(SliderRange::new(0., 100.).disabled(true)).initial_value(30.));
    slider.pointer_down(80.);
    slider.pointer_up(80.);
    assert_eq!(slider.value(), 30.);
}

#[test]
fn styles_apply_on_mount_and_through_slots() {
    let root_slot = ExternalSlot::new();
    let Mounted {
        slider,
        root,
        track,
        ..
    } = mounted(
        Slider::new(SliderRange::default())
            .root_style(Styles::new().with("opacity", "1"))
            .track_style(Styles::new().with("height", "4px"))
            .root_style_slot(root_slot.clone()),
    );
    assert_eq!(root.style("opacity").as_deref(), Some("1"));
    assert_eq!(track.style("height").as_deref(), Some("4px"));

    assert!(root_slot.write_silent(Styles::new().with("opacity", "0.5")));
    assert_eq!(root.style("opacity").as_deref(), Some("0.5"));

    assert!(slider.apply_track_style(Styles::new().with("height", "6px")));
    assert_eq!(track.style("height").as_deref(), Some("6px"));

    slider.unmount();
    assert!(!root_slot.is_bound());
    assert!(!slider.is_mounted());
}

#[test]
fn mount_hook_sees_bound_nodes() {
    let mounted_value = Arc::new(parking_lot::Mutex::new(None));
    let Mounted { .. } = mounted(Slider::new(SliderRange::default()).initial_value(12.).on_mount({
        let mounted_value = mounted_value.clone();
        move |slider: &SliderHandle| {
            *mounted_value.lock() = Some((slider.is_mounted(), slider.value()));
        }
    }));
    assert_eq!(*mounted_value.lock(), Some((true, 12.)));
}
