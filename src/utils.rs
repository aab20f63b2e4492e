use std::ops::Deref;
use std::sync::OnceLock;

/// A value initialized on first access.
pub struct Lazy<T> {
    init: fn() -> T,
    once: OnceLock<T>,
}

impl<T> Lazy<T> {
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            init,
            once: OnceLock::new(),
        }
    }
}

impl<T> Deref for Lazy<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.once.get_or_init(self.init)
    }
}

/// Invokes a function with a clone of `self`.
///
/// This keeps the clone-then-move dance out of closure-heavy builder code:
///
/// ```rust
/// use tandem::WithClone;
///
/// let name = String::from("hue");
/// let greet = (&name).with_clone(|name| move || format!("{name} slider"));
/// assert_eq!(greet(), "hue slider");
/// ```
pub trait WithClone: Sized {
    /// The type that results from cloning.
    type Cloned;

    /// Maps `with` with the results of cloning `self`.
    fn with_clone<R>(&self, with: impl FnOnce(Self::Cloned) -> R) -> R;
}

impl<T> WithClone for &T
where
    T: Clone,
{
    type Cloned = T;

    fn with_clone<R>(&self, with: impl FnOnce(Self::Cloned) -> R) -> R {
        with((*self).clone())
    }
}

macro_rules! impl_with_clone {
    ($($name:ident $field:tt),+) => {
        impl<'a, $($name: Clone,)+> WithClone for ($(&'a $name,)+) {
            type Cloned = ($($name,)+);

            fn with_clone<R>(&self, with: impl FnOnce(Self::Cloned) -> R) -> R {
                with(($(self.$field.clone(),)+))
            }
        }
    };
}

impl_with_clone!(T0 0);
impl_with_clone!(T0 0, T1 1);
impl_with_clone!(T0 0, T1 1, T2 2);
impl_with_clone!(T0 0, T1 1, T2 2, T3 3);

#[test]
fn lazy_initializes_once() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static VALUE: Lazy<usize> = Lazy::new(|| CALLS.fetch_add(1, Ordering::Relaxed) + 41);

    assert_eq!(*VALUE, 41);
    assert_eq!(*VALUE, 41);
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);
}

#[test]
fn tuples_clone_each_member() {
    let a = String::from("a");
    let b = vec![1, 2];
    let joined = (&a, &b).with_clone(|(a, b)| format!("{a}{}", b.len()));
    assert_eq!(joined, "a2");
}
