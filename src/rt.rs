//! # generator run time support
//!
//! error types and the value hand-off between a producer and its generator
//!
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

/// generator error types
///
/// `InvalidState` and `ForeignSuspend` are raised as panic payloads with
/// [`std::panic::panic_any`], so they can be recovered with
/// `catch_unwind(..).unwrap_err().downcast::<Error>()`.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// the generator is exhausted or empty, there is no pending value
    #[error("generator has no pending value")]
    InvalidState,
    /// the producer panicked while it was being resumed
    #[error("producer panicked: {0}")]
    ProducerFault(String),
    /// the producer suspended on something other than its own emission
    #[error("producer suspended outside of an emission point")]
    ForeignSuspend,
}

impl Error {
    /// build a `ProducerFault` from a caught panic payload
    pub(crate) fn from_panic(cause: &(dyn Any + Send)) -> Self {
        let msg = if let Some(s) = cause.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = cause.downcast_ref::<String>() {
            s.clone()
        } else if let Some(e) = cause.downcast_ref::<Error>() {
            e.to_string()
        } else {
            "unknown panic payload".to_owned()
        };
        Error::ProducerFault(msg)
    }
}

/// single value hand-off shared by a `Scope` and its generator
///
/// the producer parks exactly one value here at an emission point and the
/// generator moves it into its own slot as soon as the resume returns.
pub(crate) struct Airlock<T>(Rc<Cell<Option<T>>>);

impl<T> Airlock<T> {
    pub(crate) fn new() -> Self {
        Airlock(Rc::new(Cell::new(None)))
    }

    #[inline]
    pub(crate) fn put(&self, v: T) {
        let old = self.0.replace(Some(v));
        debug_assert!(old.is_none(), "airlock already holds a value");
    }

    #[inline]
    pub(crate) fn take(&self) -> Option<T> {
        self.0.take()
    }
}

impl<T> Clone for Airlock<T> {
    fn clone(&self) -> Self {
        Airlock(self.0.clone())
    }
}
