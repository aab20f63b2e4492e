//! Values that are either owned by a widget or driven by an external owner.
//!
//! A [`ControllableValue`] holds the single authoritative copy of a value
//! that is mutated from the latency-sensitive input context. It is created in
//! one of two modes that never change afterwards:
//!
//! - **Internal**: the value lands locally on every write, the derived-change
//!   listeners run, and the change listener is notified.
//! - **External**: the value is owned elsewhere. Writes only notify the change
//!   listener; the owner feeds accepted values back through the [`Writer`] it
//!   finds in its [`ExternalSlot`].
//!
//! ```rust
//! use tandem::value::{Binding, ControllableValue, ExternalSlot};
//!
//! let slot = ExternalSlot::new();
//! let value = ControllableValue::build(0.).external(slot.clone()).finish();
//! assert_eq!(value.binding(), Binding::Unbound);
//!
//! value.init();
//! assert_eq!(value.binding(), Binding::Bound);
//!
//! // Writes from the input path only propose changes...
//! value.write(10.);
//! assert_eq!(value.get(), 0.);
//!
//! // ...while the owner lands them through the slot.
//! slot.write_silent(10.);
//! assert_eq!(value.get(), 10.);
//! ```

use std::fmt::{self, Debug};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace, warn};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A pending update to a [`ControllableValue`].
pub enum WriteAction<T> {
    /// Replace the current value.
    Set(T),
    /// Compute the next value from the current value. Returning `None`
    /// declines the update.
    Update(Box<dyn FnOnce(&T) -> Option<T> + Send>),
}

impl<T> WriteAction<T> {
    /// Returns an action that computes the next value from the previous one.
    pub fn map<F>(update: F) -> Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        Self::Update(Box::new(move |previous| Some(update(previous))))
    }

    /// Returns an action that may decline to produce a value.
    pub fn update<F>(update: F) -> Self
    where
        F: FnOnce(&T) -> Option<T> + Send + 'static,
    {
        Self::Update(Box::new(update))
    }

    /// Resolves this action against `current`.
    ///
    /// Returns `None` when the action declined to produce a value.
    pub fn resolve(self, current: &T) -> Option<T> {
        match self {
            WriteAction::Set(value) => Some(value),
            WriteAction::Update(update) => update(current),
        }
    }
}

impl<T> From<T> for WriteAction<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T> Debug for WriteAction<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Self::Update(_) => f.debug_tuple("Update").finish_non_exhaustive(),
        }
    }
}

/// The binding state of a [`ControllableValue`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Binding {
    /// The value owns itself. There is nothing to bind.
    Internal,
    /// The value is externally owned, but its writer is not installed in the
    /// external slot.
    Unbound,
    /// The value is externally owned and its writer currently occupies the
    /// external slot.
    Bound,
}

struct CellData<T> {
    current: Mutex<T>,
    // Held from resolution until the derived listeners return, so concurrent
    // landings propagate in the order they were stored.
    landing: ReentrantMutex<()>,
    slot: Option<ExternalSlot<T>>,
    on_change: Option<Callback<T>>,
    on_derived_change: Vec<Callback<T>>,
}

impl<T> CellData<T>
where
    T: Clone + PartialEq,
{
    /// Lands a resolved value, runs the derived listeners, and optionally
    /// notifies the change listener.
    fn commit(&self, next: WriteAction<T>, notify_external: bool) -> bool {
        let landing = self.landing.lock();
        let mut current = self.current.lock();
        let Some(resolved) = next.resolve(&current) else {
            trace!("write declined");
            return false;
        };
        if *current == resolved {
            return false;
        }
        current.clone_from(&resolved);
        drop(current);
        trace!(notify_external, "value landed");

        for derived in &self.on_derived_change {
            derived(&resolved);
        }
        drop(landing);
        if notify_external {
            if let Some(on_change) = &self.on_change {
                on_change(&resolved);
            }
        }
        true
    }

    fn notify(&self, next: WriteAction<T>) -> bool {
        let current = self.current.lock();
        let Some(resolved) = next.resolve(&current) else {
            trace!("notification declined");
            return false;
        };
        if *current == resolved {
            return false;
        }
        drop(current);
        trace!("change proposed");

        if let Some(on_change) = &self.on_change {
            on_change(&resolved);
        }
        true
    }
}

/// A value mutated from the input path, owned either by itself or by an
/// external driver.
///
/// Cloning a `ControllableValue` produces another handle to the same value.
/// When the last handle is dropped, the value is [disposed](Self::dispose).
pub struct ControllableValue<T>(Arc<CellData<T>>);

impl<T> ControllableValue<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Returns a new internally owned value with no listeners.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::build(initial).finish()
    }

    /// Returns a builder for a value seeded with `initial`.
    pub fn build(initial: T) -> Builder<T> {
        Builder::new(initial)
    }

    /// Returns a clone of the currently landed value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.current.lock().clone()
    }

    /// Maps the currently landed value with read-only access.
    ///
    /// `map` must not access this value, or the calling thread will deadlock.
    pub fn map_ref<R>(&self, map: impl FnOnce(&T) -> R) -> R {
        map(&*self.0.current.lock())
    }

    /// Returns true if this value was created with an external slot.
    #[must_use]
    pub fn is_externally_owned(&self) -> bool {
        self.0.slot.is_some()
    }

    /// Returns the current binding state.
    #[must_use]
    pub fn binding(&self) -> Binding {
        match &self.0.slot {
            None => Binding::Internal,
            Some(slot) if slot.holds(&self.writer()) => Binding::Bound,
            Some(_) => Binding::Unbound,
        }
    }

    /// Writes `next` using the default semantics for this value's ownership.
    ///
    /// - Internal: lands the value, runs derived listeners, then notifies the
    ///   change listener.
    /// - External: only notifies the change listener. The locally landed value
    ///   is left untouched, whether or not the slot is bound.
    ///
    /// A `next` that resolves to `None` or to the current value is ignored.
    /// Returns true if the change listener was reached with a new value or
    /// the value landed.
    ///
    /// Update closures must not access this value, or the calling thread will
    /// deadlock.
    pub fn write(&self, next: impl Into<WriteAction<T>>) -> bool {
        if self.is_externally_owned() {
            self.0.notify(next.into())
        } else {
            self.0.commit(next.into(), true)
        }
    }

    /// Lands `next` and runs the derived listeners without notifying the
    /// change listener.
    ///
    /// This is how values arriving from the owning context update local
    /// visuals without triggering another round trip.
    pub fn write_silent(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.0.commit(next.into(), false)
    }

    /// Forwards `next` to the change listener without landing it.
    pub fn notify(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.0.notify(next.into())
    }

    /// Installs this value's writer into its external slot.
    ///
    /// Does nothing for internally owned values.
    pub fn init(&self) {
        let Some(slot) = &self.0.slot else {
            return;
        };
        let writer = self.writer();
        if let Some(previous) = slot.replace(Some(writer.clone())) {
            if !previous.ptr_eq(&writer) && previous.is_connected() {
                warn!("external slot already held another live writer; replacing it");
            }
        }
        debug!("bound controllable value to its external slot");
    }

    /// Clears the external slot, but only if it still holds this value's
    /// writer.
    ///
    /// Does nothing for internally owned values.
    pub fn dispose(&self) {
        self.0.dispose();
    }

    /// Returns a writer that drives this value directly, bypassing the
    /// ownership rules applied by [`write()`](Self::write).
    ///
    /// The writer does not keep this value alive.
    #[must_use]
    pub fn writer(&self) -> Writer<T> {
        Writer(Arc::downgrade(&self.0))
    }
}

impl<T> CellData<T> {
    fn dispose(&self) {
        let Some(slot) = &self.slot else {
            return;
        };
        match slot.release(self) {
            Release::Cleared => debug!("unbound controllable value from its external slot"),
            Release::Foreign => {
                warn!("external slot is held by another writer; leaving it installed");
            }
            Release::Empty => {}
        }
    }
}

impl<T> Clone for ControllableValue<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Drop for CellData<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> Debug for ControllableValue<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllableValue")
            .field("current", &*self.0.current.lock())
            .field("external", &self.0.slot.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ControllableValue<T>
where
    T: Default + Clone + PartialEq + Send + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Builds a [`ControllableValue`].
#[must_use = "builders must be finished to create a value"]
pub struct Builder<T> {
    initial: T,
    slot: Option<ExternalSlot<T>>,
    on_change: Option<Callback<T>>,
    on_derived_change: Vec<Callback<T>>,
}

impl<T> Builder<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    fn new(initial: T) -> Self {
        Self {
            initial,
            slot: None,
            on_change: None,
            on_derived_change: Vec::new(),
        }
    }

    /// Makes the value externally owned through `slot`.
    pub fn external(mut self, slot: ExternalSlot<T>) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Makes the value externally owned when `slot` is `Some`.
    pub fn maybe_external(mut self, slot: Option<ExternalSlot<T>>) -> Self {
        self.slot = slot;
        self
    }

    /// Invokes `on_change` each time a new value is accepted or proposed for
    /// the owning context.
    ///
    /// Replaces any previously configured change listener.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    /// Invokes `on_derived_change` each time a new value lands locally.
    ///
    /// Listeners run in the order they were added, before the change listener.
    pub fn on_derived_change<F>(mut self, on_derived_change: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_derived_change.push(Arc::new(on_derived_change));
        self
    }

    /// Returns the finished value.
    ///
    /// Externally owned values start [unbound](Binding::Unbound); call
    /// [`ControllableValue::init`] once the host node is mounted.
    pub fn finish(self) -> ControllableValue<T> {
        ControllableValue(Arc::new(CellData {
            current: Mutex::new(self.initial),
            landing: ReentrantMutex::new(()),
            slot: self.slot,
            on_change: self.on_change,
            on_derived_change: self.on_derived_change,
        }))
    }
}

/// A handle that drives a [`ControllableValue`] directly.
///
/// Writers are what a value installs into its [`ExternalSlot`]. They hold a
/// weak reference: once the value is dropped, every operation returns false.
pub struct Writer<T>(Weak<CellData<T>>);

impl<T> Writer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Lands `next`, runs derived listeners, and notifies the change
    /// listener.
    pub fn write(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.0
            .upgrade()
            .is_some_and(|cell| cell.commit(next.into(), true))
    }

    /// Lands `next` and runs derived listeners without notifying.
    pub fn write_silent(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.0
            .upgrade()
            .is_some_and(|cell| cell.commit(next.into(), false))
    }

    /// Only notifies the change listener.
    pub fn notify(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.0.upgrade().is_some_and(|cell| cell.notify(next.into()))
    }
}

impl<T> Writer<T> {
    /// Returns true if the value this writer drives still exists.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Returns true if both writers drive the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Writer<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Debug for Writer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Writer").field(&self.0.as_ptr()).finish()
    }
}

enum Release {
    Cleared,
    Foreign,
    Empty,
}

/// A single-slot register that an externally owned value installs its
/// [`Writer`] into.
///
/// Any code holding the slot may read or replace its contents, but a value
/// only ever clears the slot while it still holds that value's own writer.
/// Cloning produces another handle to the same slot.
pub struct ExternalSlot<T>(Arc<Mutex<Option<Writer<T>>>>);

impl<T> ExternalSlot<T> {
    /// Returns a new, empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    /// Returns a clone of the installed writer, if any.
    #[must_use]
    pub fn writer(&self) -> Option<Writer<T>> {
        self.0.lock().clone()
    }

    /// Returns true if a writer for a live value is installed.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.0.lock().as_ref().is_some_and(Writer::is_connected)
    }

    /// Replaces the contents of this slot, returning the previous writer.
    pub fn replace(&self, writer: Option<Writer<T>>) -> Option<Writer<T>> {
        std::mem::replace(&mut *self.0.lock(), writer)
    }

    fn holds(&self, writer: &Writer<T>) -> bool {
        self.0
            .lock()
            .as_ref()
            .is_some_and(|installed| installed.ptr_eq(writer))
    }

    fn release(&self, cell: *const CellData<T>) -> Release {
        let mut installed = self.0.lock();
        match &*installed {
            Some(writer) if std::ptr::eq(writer.0.as_ptr(), cell) => {
                *installed = None;
                Release::Cleared
            }
            Some(_) => Release::Foreign,
            None => Release::Empty,
        }
    }
}

impl<T> ExternalSlot<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Writes through the installed writer. Returns false if the slot is
    /// empty or the value did not change.
    pub fn write(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.writer().is_some_and(|writer| writer.write(next))
    }

    /// Writes silently through the installed writer. Returns false if the
    /// slot is empty or the value did not change.
    pub fn write_silent(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.writer()
            .is_some_and(|writer| writer.write_silent(next))
    }

    /// Notifies through the installed writer. Returns false if the slot is
    /// empty or the value did not change.
    pub fn notify(&self, next: impl Into<WriteAction<T>>) -> bool {
        self.writer().is_some_and(|writer| writer.notify(next))
    }
}

impl<T> Clone for ExternalSlot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for ExternalSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for ExternalSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExternalSlot").field(&*self.0.lock()).finish()
    }
}

#[cfg(test)]
fn recorder<T>() -> (
    Arc<Mutex<Vec<T>>>,
    impl Fn(&T) + Send + Sync + Clone + 'static,
)
where
    T: Clone + Send + 'static,
{
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let log = log.clone();
        move |value: &T| log.lock().push(value.clone())
    };
    (log, sink)
}

#[test]
fn internal_write_lands_derives_and_notifies_once() {
    let (changes, on_change) = recorder::<i32>();
    let (derived, on_derived) = recorder::<i32>();
    let value = ControllableValue::build(0)
        .on_change(on_change)
        .on_derived_change(on_derived)
        .finish();

    assert!(value.write(5));
    assert!(!value.write(5));
    assert_eq!(value.get(), 5);
    assert_eq!(*changes.lock(), [5]);
    assert_eq!(*derived.lock(), [5]);
}

#[test]
fn derived_listeners_run_before_change_listener() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let value = ControllableValue::build(0)
        .on_change({
            let order = order.clone();
            move |_: &i32| order.lock().push("change")
        })
        .on_derived_change({
            let order = order.clone();
            move |_: &i32| order.lock().push("derived")
        })
        .finish();
    value.write(1);
    assert_eq!(*order.lock(), ["derived", "change"]);
}

#[test]
fn updaters_resolve_against_current() {
    let value = ControllableValue::new(10);
    assert!(value.write(WriteAction::map(|previous| previous + 5)));
    assert_eq!(value.get(), 15);

    // Declining leaves the value alone.
    assert!(!value.write(WriteAction::update(|_| None)));
    assert_eq!(value.get(), 15);

    // Resolving to the current value is a no-op.
    assert!(!value.write(WriteAction::map(|previous: &i32| *previous)));
}

#[test]
fn silent_writes_do_not_notify() {
    let (changes, on_change) = recorder::<i32>();
    let (derived, on_derived) = recorder::<i32>();
    let value = ControllableValue::build(0)
        .on_change(on_change)
        .on_derived_change(on_derived)
        .finish();

    assert!(value.write_silent(3));
    assert_eq!(value.get(), 3);
    assert!(changes.lock().is_empty());
    assert_eq!(*derived.lock(), [3]);
}

#[test]
fn notify_does_not_land() {
    let (changes, on_change) = recorder::<i32>();
    let (derived, on_derived) = recorder::<i32>();
    let value = ControllableValue::build(0)
        .on_change(on_change)
        .on_derived_change(on_derived)
        .finish();

    assert!(value.notify(7));
    assert!(!value.notify(0));
    assert_eq!(value.get(), 0);
    assert_eq!(*changes.lock(), [7]);
    assert!(derived.lock().is_empty());
}

#[test]
fn external_write_only_notifies() {
    let (changes, on_change) = recorder::<f64>();
    let (derived, on_derived) = recorder::<f64>();
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(1.5)
        .external(slot.clone())
        .on_change(on_change)
        .on_derived_change(on_derived)
        .finish();

    // Unbound: notification still happens, nothing lands.
    assert!(value.write(2.5));
    assert_eq!(value.get(), 1.5);

    value.init();
    assert!(value.write(3.5));
    assert_eq!(value.get(), 1.5);
    assert_eq!(*changes.lock(), [2.5, 3.5]);
    assert!(derived.lock().is_empty());

    // The owner accepts the proposal by writing silently through the slot.
    assert!(slot.write_silent(3.5));
    assert_eq!(value.get(), 3.5);
    assert_eq!(*derived.lock(), [3.5]);
    assert_eq!(changes.lock().len(), 2);
}

#[test]
fn internal_values_ignore_lifecycle() {
    let value = ControllableValue::new(0);
    assert_eq!(value.binding(), Binding::Internal);
    value.init();
    assert_eq!(value.binding(), Binding::Internal);
    value.dispose();
    assert_eq!(value.binding(), Binding::Internal);
}

#[test]
fn lifecycle_binds_and_unbinds() {
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0).external(slot.clone()).finish();
    assert_eq!(value.binding(), Binding::Unbound);
    assert!(!slot.is_bound());
    assert!(!slot.write(1));

    value.init();
    assert_eq!(value.binding(), Binding::Bound);
    assert!(slot.is_bound());

    value.dispose();
    assert_eq!(value.binding(), Binding::Unbound);
    assert!(slot.writer().is_none());
}

#[test]
fn dispose_only_clears_own_writer() {
    let slot = ExternalSlot::new();
    let a = ControllableValue::build(0).external(slot.clone()).finish();
    let b = ControllableValue::build(0).external(slot.clone()).finish();

    a.init();
    b.dispose();
    assert_eq!(a.binding(), Binding::Bound);
    assert!(slot.writer().is_some_and(|writer| writer.ptr_eq(&a.writer())));

    // B takes over, and A can no longer clear the slot.
    b.init();
    assert_eq!(a.binding(), Binding::Unbound);
    a.dispose();
    assert_eq!(b.binding(), Binding::Bound);
}

#[test]
fn foreign_writers_survive_dispose() {
    let slot = ExternalSlot::new();
    let owned = ControllableValue::build(0).external(slot.clone()).finish();
    let other = ControllableValue::new(0);

    owned.init();
    slot.replace(Some(other.writer()));
    owned.dispose();
    assert!(slot.writer().is_some_and(|writer| writer.ptr_eq(&other.writer())));
}

#[test]
fn dropping_last_handle_disposes() {
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0).external(slot.clone()).finish();
    value.init();

    let clone = value.clone();
    drop(value);
    assert!(slot.is_bound());

    drop(clone);
    assert!(slot.writer().is_none());
}

#[test]
fn writers_outlived_by_slot_do_nothing() {
    let slot = ExternalSlot::new();
    let value = ControllableValue::new(0);
    slot.replace(Some(value.writer()));
    drop(value);
    assert!(!slot.is_bound());
    assert!(!slot.write(1));
}

#[test]
fn writer_write_notifies_even_for_external_values() {
    let (changes, on_change) = recorder::<i32>();
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0)
        .external(slot.clone())
        .on_change(on_change)
        .finish();
    value.init();

    assert!(slot.write(4));
    assert_eq!(value.get(), 4);
    assert_eq!(*changes.lock(), [4]);
    assert!(slot.notify(9));
    assert_eq!(value.get(), 4);
    assert_eq!(*changes.lock(), [4, 9]);
}

#[test]
fn listeners_may_reenter_the_value() {
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0)
        .external(slot.clone())
        .on_change({
            let slot = slot.clone();
            move |proposed: &i32| {
                // Accept every proposal, clamping it at 10.
                slot.write_silent((*proposed).min(10));
            }
        })
        .finish();
    value.init();

    value.write(4);
    assert_eq!(value.get(), 4);
    value.write(40);
    assert_eq!(value.get(), 10);
}

#[test]
fn concurrent_landings_propagate_in_landing_order() {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    let (started, wait_started) = mpsc::channel();
    let started = Mutex::new(started);
    let shown = Arc::new(Mutex::new(0.));
    let slot = ExternalSlot::new();
    let value = ControllableValue::build(0.)
        .external(slot.clone())
        .on_derived_change({
            let shown = shown.clone();
            move |landed: &f64| {
                if *landed == 10. {
                    let _ = started.lock().send(());
                    thread::sleep(Duration::from_millis(50));
                }
                *shown.lock() = *landed;
            }
        })
        .finish();
    value.init();

    let slow = thread::spawn({
        let slot = slot.clone();
        move || slot.write_silent(10.)
    });
    wait_started.recv().expect("first landing started");
    assert!(slot.write_silent(90.));
    assert!(slow.join().expect("landing thread"));

    assert_eq!(value.get(), 90.);
    assert_eq!(*shown.lock(), 90.);
}

#[test]
fn dropping_during_a_slot_write_still_disposes() {
    let slot = ExternalSlot::new();
    let holder = Arc::new(Mutex::new(None::<ControllableValue<i32>>));
    let value = ControllableValue::build(0)
        .external(slot.clone())
        .on_derived_change({
            let holder = holder.clone();
            move |_: &i32| drop(holder.lock().take())
        })
        .finish();
    value.init();
    *holder.lock() = Some(value);

    // The slot's writer keeps the value alive until the write returns, after
    // the last handle is gone.
    assert!(slot.write_silent(1));
    assert!(holder.lock().is_none());
    assert!(slot.writer().is_none());
}
