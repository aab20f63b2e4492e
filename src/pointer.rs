//! Conversion of raw pointer coordinates into element-relative samples.
//!
//! A slider splits pointer handling across two nodes: a *container* that
//! receives pointer events (a larger hit area) and an *element* whose
//! measured bounds are the coordinate frame. The [`PointerSampler`] is fed
//! pointer events from the container and layout changes from the element.
//!
//! Element metrics arrive asynchronously. The width is known as soon as the
//! layout event fires, but the left edge requires awaiting a bounding-box
//! query. Until both are known, pointer samples are dropped rather than
//! computed against an element of unknown position.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

/// A pointer sample relative to the measured element.
///
/// Samples are not clamped: a pointer dragged outside of the element yields
/// an `offset` outside of `0..=element_width` and an `offset_ratio` outside of
/// `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerPosition {
    /// The horizontal distance from the element's left edge.
    pub offset: f64,
    /// `offset` divided by `element_width`.
    pub offset_ratio: f64,
    /// The measured width of the element.
    pub element_width: f64,
}

/// The result of a bounding-box query against a host node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingClientRect {
    /// The left edge, in the same coordinate space as pointer events.
    pub left: f64,
    /// The top edge.
    pub top: f64,
    /// The measured width.
    pub width: f64,
    /// The measured height.
    pub height: f64,
}

impl BoundingClientRect {
    /// Returns a rect at `left` with the given `width` and no height.
    #[must_use]
    pub const fn horizontal(left: f64, width: f64) -> Self {
        Self {
            left,
            top: 0.,
            width,
            height: 0.,
        }
    }
}

/// An error from an asynchronous bounding-box query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The node was removed from the view tree before the query resolved.
    Detached,
    /// The host reported an error.
    Host(String),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Detached => f.write_str("the node is no longer attached"),
            LayoutError::Host(message) => write!(f, "host layout query failed: {message}"),
        }
    }
}

impl std::error::Error for LayoutError {}

type PointerCallback = Arc<dyn Fn(PointerPosition) + Send + Sync>;

#[derive(Debug, Default)]
struct SamplerState {
    dragging: bool,
    element_width: f64,
    element_left: Option<f64>,
    last: Option<PointerPosition>,
}

impl SamplerState {
    fn sample(&mut self, x: f64) -> Option<PointerPosition> {
        let Some(left) = self.element_left else {
            trace!(x, "element position unknown; dropping pointer sample");
            return None;
        };
        if self.element_width <= 0. || !self.element_width.is_finite() {
            trace!(x, "element has no width; dropping pointer sample");
            return None;
        }

        let offset = x - left;
        let position = PointerPosition {
            offset,
            offset_ratio: offset / self.element_width,
            element_width: self.element_width,
        };
        self.last = Some(position);
        Some(position)
    }
}

/// Tracks a drag gesture and produces [`PointerPosition`] samples.
///
/// Cloning a sampler produces another handle to the same gesture state.
#[derive(Clone, Default)]
pub struct PointerSampler {
    state: Arc<Mutex<SamplerState>>,
    on_update: Option<PointerCallback>,
    on_commit: Option<PointerCallback>,
}

impl PointerSampler {
    /// Returns a sampler with no callbacks and no known metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes `on_update` with every sample taken while dragging.
    #[must_use]
    pub fn on_update<F>(mut self, on_update: F) -> Self
    where
        F: Fn(PointerPosition) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(on_update));
        self
    }

    /// Invokes `on_commit` with the final sample of each gesture.
    #[must_use]
    pub fn on_commit<F>(mut self, on_commit: F) -> Self
    where
        F: Fn(PointerPosition) + Send + Sync + 'static,
    {
        self.on_commit = Some(Arc::new(on_commit));
        self
    }

    /// Begins a gesture at `x` and samples it.
    pub fn pointer_down(&self, x: f64) -> Option<PointerPosition> {
        let position = {
            let mut state = self.state.lock();
            state.dragging = true;
            state.sample(x)
        }?;
        self.update(position);
        Some(position)
    }

    /// Samples `x` if a gesture is in progress.
    pub fn pointer_move(&self, x: f64) -> Option<PointerPosition> {
        let position = {
            let mut state = self.state.lock();
            if !state.dragging {
                return None;
            }
            state.sample(x)
        }?;
        self.update(position);
        Some(position)
    }

    /// Ends the gesture at `x`, sampling it as both an update and the
    /// gesture's commit.
    pub fn pointer_up(&self, x: f64) -> Option<PointerPosition> {
        let position = {
            let mut state = self.state.lock();
            state.dragging = false;
            state.sample(x)
        }?;
        self.update(position);
        if let Some(on_commit) = &self.on_commit {
            on_commit(position);
        }
        Some(position)
    }

    /// Ends the gesture when the host cancels it.
    ///
    /// There is no cancel-without-commit path: this behaves exactly like
    /// [`pointer_up()`](Self::pointer_up).
    pub fn pointer_cancel(&self, x: f64) -> Option<PointerPosition> {
        self.pointer_up(x)
    }

    fn update(&self, position: PointerPosition) {
        if let Some(on_update) = &self.on_update {
            on_update(position);
        }
    }

    /// Records a layout change of the measured element.
    ///
    /// `width` is applied immediately. The returned future awaits `query`
    /// and records the element's left edge once it resolves. A failed query
    /// is logged and leaves the previous left edge in place.
    pub fn element_layout_changed<Query>(
        &self,
        width: f64,
        query: Query,
    ) -> impl Future<Output = ()> + Send + 'static
    where
        Query: Future<Output = Result<BoundingClientRect, LayoutError>> + Send + 'static,
    {
        self.state.lock().element_width = width;
        let state = self.state.clone();
        async move {
            match query.await {
                Ok(rect) => {
                    trace!(left = rect.left, width, "element metrics resolved");
                    state.lock().element_left = Some(rect.left);
                }
                Err(err) => warn!("element layout query failed, keeping stale metrics: {err}"),
            }
        }
    }

    /// Returns true while a gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.lock().dragging
    }

    /// Returns the element's `(left, width)`, once both are known.
    #[must_use]
    pub fn metrics(&self) -> Option<(f64, f64)> {
        let state = self.state.lock();
        state.element_left.map(|left| (left, state.element_width))
    }

    /// Returns the most recent sample taken.
    #[must_use]
    pub fn last_position(&self) -> Option<PointerPosition> {
        self.state.lock().last
    }
}

impl fmt::Debug for PointerSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerSampler")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
fn recording_sampler() -> (
    PointerSampler,
    Arc<Mutex<Vec<(&'static str, PointerPosition)>>>,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sampler = PointerSampler::new()
        .on_update({
            let events = events.clone();
            move |position| events.lock().push(("update", position))
        })
        .on_commit({
            let events = events.clone();
            move |position| events.lock().push(("commit", position))
        });
    (sampler, events)
}

#[test]
fn samples_before_layout_are_dropped() {
    let (sampler, events) = recording_sampler();
    assert_eq!(sampler.pointer_down(50.), None);
    assert!(sampler.is_dragging());

    // The width lands right away, but the left edge is still pending.
    let pending = sampler.element_layout_changed(
        200.,
        std::future::ready(Ok(BoundingClientRect::horizontal(10., 200.))),
    );
    assert_eq!(sampler.pointer_move(60.), None);
    assert!(events.lock().is_empty());

    pollster::block_on(pending);
    assert_eq!(sampler.metrics(), Some((10., 200.)));
    let position = sampler.pointer_move(110.).expect("metrics known");
    assert_eq!(position.offset, 100.);
    assert_eq!(position.offset_ratio, 0.5);
    assert_eq!(events.lock().len(), 1);
}

#[test]
fn release_updates_then_commits() {
    let (sampler, events) = recording_sampler();
    pollster::block_on(sampler.element_layout_changed(
        100.,
        std::future::ready(Ok(BoundingClientRect::horizontal(0., 100.))),
    ));

    sampler.pointer_down(25.);
    sampler.pointer_move(150.);
    sampler.pointer_up(150.);
    assert!(!sampler.is_dragging());

    let events = events.lock();
    let kinds = events.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
    assert_eq!(kinds, ["update", "update", "update", "commit"]);
    // Samples outside of the element are not clamped.
    assert_eq!(events[3].1.offset_ratio, 1.5);
}

#[test]
fn moves_without_a_gesture_are_ignored() {
    let (sampler, events) = recording_sampler();
    pollster::block_on(sampler.element_layout_changed(
        100.,
        std::future::ready(Ok(BoundingClientRect::horizontal(0., 100.))),
    ));
    assert_eq!(sampler.pointer_move(10.), None);
    sampler.pointer_down(10.);
    sampler.pointer_cancel(20.);
    assert_eq!(sampler.pointer_move(30.), None);
    assert_eq!(events.lock().len(), 3);
    assert_eq!(sampler.last_position().map(|p| p.offset), Some(20.));
}

#[test]
fn failed_queries_keep_stale_metrics() {
    let sampler = PointerSampler::new();
    pollster::block_on(sampler.element_layout_changed(
        100.,
        std::future::ready(Ok(BoundingClientRect::horizontal(5., 100.))),
    ));
    pollster::block_on(
        sampler.element_layout_changed(80., std::future::ready(Err(LayoutError::Detached))),
    );
    assert_eq!(sampler.metrics(), Some((5., 80.)));

    // A zero width drops samples even though the left edge is known.
    let pending = sampler.element_layout_changed(
        0.,
        std::future::ready(Err(LayoutError::Host(String::from("gone")))),
    );
    assert_eq!(sampler.pointer_down(10.), None);
    pollster::block_on(pending);
}

#[test]
fn layout_errors_display() {
    assert_eq!(
        LayoutError::Host(String::from("timeout")).to_string(),
        "host layout query failed: timeout"
    );
}
