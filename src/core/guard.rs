//! Predicates guarding transitions.
//!
//! A guard is re-evaluated on every tick for every candidate edge, so
//! predicates should be cheap. The machine does not require purity.

use std::fmt;
use std::rc::Rc;

/// Zero-argument condition attached to a transition.
///
/// Implemented for every `Fn() -> bool`, so closures work directly.
pub trait Predicate {
    fn evaluate(&self) -> bool;
}

impl<F> Predicate for F
where
    F: Fn() -> bool,
{
    fn evaluate(&self) -> bool {
        self()
    }
}

/// Shared handle to a predicate.
///
/// A guard's identity is the predicate it points to: clones of one guard are
/// the same guard, two guards built from equal closures are not. Edges are
/// de-duplicated and removed by this identity.
///
/// # Example
///
/// ```rust
/// use statehop::core::Guard;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let paused = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&paused);
/// let pause_requested = Guard::new(move || flag.get());
///
/// assert!(!pause_requested.evaluate());
/// paused.set(true);
/// assert!(pause_requested.evaluate());
///
/// let same = pause_requested.clone();
/// assert_eq!(same, pause_requested);
/// assert_ne!(Guard::new(|| true), Guard::new(|| true));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Rc<dyn Predicate>,
}

impl Guard {
    /// Create a guard from a predicate.
    pub fn new<P>(predicate: P) -> Self
    where
        P: Predicate + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Wrap an already shared predicate, keeping its identity.
    pub fn from_rc(predicate: Rc<dyn Predicate>) -> Self {
        Guard { predicate }
    }

    /// Guard that is always true.
    pub fn always() -> Self {
        Guard::new(|| true)
    }

    pub fn evaluate(&self) -> bool {
        self.predicate.evaluate()
    }

    /// Check whether both guards point at the same predicate.
    pub fn same_as(&self, other: &Guard) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.predicate), Rc::as_ptr(&other.predicate))
    }
}

impl PartialEq for Guard {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Guard {}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guard")
            .field(&Rc::as_ptr(&self.predicate).cast::<()>())
            .finish()
    }
}
