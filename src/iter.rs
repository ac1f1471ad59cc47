//! # iterator
//!
//! pull based view over a generator, compared against a `Sentinel`
//!

use std::panic;

use crate::gen_impl::{GeneratorImpl, Phase};
use crate::rt::Error;

/// end of sequence marker
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Sentinel;

/// iterator over a generator, returned by [`Generator::begin`]
///
/// it holds nothing but a borrow of the generator's execution state, so
/// there can be only one at a time. A value read through [`Iter::get`]
/// borrows the iterator and can't outlive the next [`Iter::advance`].
///
/// ```
/// use genseq::{Gn, Sentinel};
///
/// let mut g = Gn::new_scoped(|mut s| async move {
///     s.yield_(1).await;
///     s.yield_(2).await;
/// });
///
/// let mut seen = Vec::new();
/// let mut it = g.begin();
/// while it != Sentinel {
///     seen.push(*it.get());
///     it.advance();
/// }
/// assert_eq!(seen, [1, 2]);
/// ```
///
/// [`Generator::begin`]: crate::Generator::begin
pub struct Iter<'g, 'a, T> {
    state: Option<&'g mut GeneratorImpl<'a, T>>,
}

impl<'g, 'a, T> Iter<'g, 'a, T> {
    pub(crate) fn new(state: Option<&'g mut GeneratorImpl<'a, T>>) -> Self {
        Iter { state }
    }

    /// resume the generator up to its next value
    ///
    /// advancing past the end does nothing, the producer is never run again.
    pub fn advance(&mut self) -> &mut Self {
        match self.state.as_deref_mut() {
            Some(g) if !g.is_done() => {
                g.resume();
            }
            _ => warn!("advance an exhausted generator"),
        }
        self
    }

    /// the pending value
    ///
    /// # Panics
    ///
    /// panics with [`Error::InvalidState`] when no value is pending, which
    /// for an iterator from [`Generator::begin`](crate::Generator::begin)
    /// means it equals the
    /// [`Sentinel`].
    #[track_caller]
    pub fn get(&self) -> &T {
        match self.try_get() {
            Ok(v) => v,
            Err(e) => {
                error!("dereference an exhausted generator");
                panic::panic_any(e)
            }
        }
    }

    /// the pending value, or `InvalidState` at the end of the sequence
    pub fn try_get(&self) -> Result<&T, Error> {
        self.state
            .as_deref()
            .and_then(|g| g.value())
            .ok_or(Error::InvalidState)
    }

    /// phase of the generator behind this iterator
    pub fn phase(&self) -> Phase {
        self.state.as_deref().map_or(Phase::Completed, |g| g.phase())
    }

    // move the pending value out, leaving the generator `Consumed` until
    // the next advance
    #[track_caller]
    pub(crate) fn take_pending(&mut self) -> T {
        match self.state.as_deref_mut().and_then(|g| g.take_value()) {
            Some(v) => v,
            None => {
                error!("take from a generator with no pending value");
                panic::panic_any(Error::InvalidState)
            }
        }
    }
}

/// an iterator over nothing, equal to the [`Sentinel`]
impl<T> Default for Iter<'_, '_, T> {
    fn default() -> Self {
        Iter { state: None }
    }
}

impl<T> PartialEq<Sentinel> for Iter<'_, '_, T> {
    fn eq(&self, _: &Sentinel) -> bool {
        self.state.as_deref().map_or(true, |g| g.is_done())
    }
}

impl<T> PartialEq<Iter<'_, '_, T>> for Sentinel {
    fn eq(&self, it: &Iter<'_, '_, T>) -> bool {
        it.eq(self)
    }
}
