//! Handles to nodes in the host's retained view tree.
//!
//! Widgets never rebuild their view to reflect a drag. Instead, they keep
//! handles to the nodes they were mounted on and push inline style changes
//! straight onto them.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::styles::Styles;

/// A node in a retained view tree that accepts imperative style updates.
pub trait RetainedNode: Send + Sync + 'static {
    /// Applies `styles` on top of the node's current inline style.
    fn set_style_properties(&self, styles: &Styles);
}

/// A shared handle to a [`RetainedNode`].
pub type ViewHandle = Arc<dyn RetainedNode>;

/// A retained node that records the inline style applied to it.
///
/// This is the node used by the demos and tests. Hosts backed by a real view
/// tree implement [`RetainedNode`] for their own node type.
pub struct Node {
    name: String,
    styles: Mutex<Styles>,
    updates: AtomicUsize,
}

impl Node {
    /// Returns a new node named `name` with no inline style.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            styles: Mutex::new(Styles::new()),
            updates: AtomicUsize::new(0),
        })
    }

    /// Returns the name this node was created with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the accumulated inline style.
    #[must_use]
    pub fn styles(&self) -> Styles {
        self.styles.lock().clone()
    }

    /// Returns the value of a single inline style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.styles.lock().get(property).map(String::from)
    }

    /// Returns how many times a style update has been applied.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }
}

impl RetainedNode for Node {
    fn set_style_properties(&self, styles: &Styles) {
        let mut current = self.styles.lock();
        *current = current.merged_with(styles);
        self.updates.fetch_add(1, Ordering::Relaxed);
        trace!(node = %self.name, properties = styles.len(), "applied style");
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("styles", &*self.styles.lock())
            .finish_non_exhaustive()
    }
}

/// A nullable reference to a retained node.
///
/// A widget binds its references while mounted and clears them when it is
/// unmounted. Style updates sent to an unbound reference are dropped.
#[derive(Clone, Default)]
pub struct NodeRef(Arc<Mutex<Option<ViewHandle>>>);

impl NodeRef {
    /// Returns a new, unbound reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points this reference at `node`.
    pub fn bind(&self, node: ViewHandle) {
        *self.0.lock() = Some(node);
    }

    /// Clears this reference, returning the node it pointed at.
    pub fn unbind(&self) -> Option<ViewHandle> {
        self.0.lock().take()
    }

    /// Returns true if this reference points at a node.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.0.lock().is_some()
    }

    /// Applies `styles` to the referenced node.
    ///
    /// Returns false if the reference is unbound.
    pub fn set_style_properties(&self, styles: &Styles) -> bool {
        let node = self.0.lock().clone();
        match node {
            Some(node) => {
                node.set_style_properties(styles);
                true
            }
            None => false,
        }
    }
}

impl Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[test]
fn node_accumulates_styles() {
    let node = Node::new("thumb");
    node.set_style_properties(&Styles::new().with("left", "10%"));
    node.set_style_properties(&Styles::new().with("opacity", "0.5"));
    node.set_style_properties(&Styles::new().with("left", "20%"));
    assert_eq!(node.style("left").as_deref(), Some("20%"));
    assert_eq!(node.style("opacity").as_deref(), Some("0.5"));
    assert_eq!(node.update_count(), 3);
}

#[test]
fn unbound_refs_drop_updates() {
    let node = Node::new("track");
    let reference = NodeRef::new();
    assert!(!reference.set_style_properties(&Styles::new().with("left", "1%")));

    reference.bind(node.clone());
    assert!(reference.set_style_properties(&Styles::new().with("left", "2%")));
    assert!(reference.unbind().is_some());
    assert!(!reference.set_style_properties(&Styles::new().with("left", "3%")));
    assert_eq!(node.style("left").as_deref(), Some("2%"));
}
