//! # yield
//!
//! generator yield implementation
//!

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::gen_impl::Generator;
use crate::rt::Airlock;

/// passed in scope type
/// the only handle a producer body has to emit values
///
/// it's `!Send`, a generator is driven from the thread that owns it.
pub struct Scope<T> {
    airlock: Airlock<T>,
}

impl<T> Scope<T> {
    /// create a new scope object
    pub(crate) fn new(airlock: Airlock<T>) -> Self {
        Scope { airlock }
    }

    /// emit a value and suspend the producer until the consumer advances
    ///
    /// the returned future must be awaited right away, it is the producer's
    /// only legal suspension point.
    #[inline]
    pub fn yield_(&mut self, v: T) -> Yield<'_, T> {
        Yield {
            value: Some(v),
            airlock: &self.airlock,
        }
    }

    /// `yield_from`
    /// re-emit every value of `g`, which must have the same item type
    pub async fn yield_from(&mut self, mut g: Generator<'_, T>) {
        while let Some(v) = g.next() {
            self.yield_(v).await;
        }
    }
}

/// future returned by [`Scope::yield_`]
///
/// the first poll parks the value and suspends, the second one resumes the
/// producer.
#[must_use = "a yielded value is only emitted when awaited"]
pub struct Yield<'s, T> {
    value: Option<T>,
    airlock: &'s Airlock<T>,
}

// the value is never pinned, it's moved out on the first poll
impl<T> Unpin for Yield<'_, T> {}

impl<T> Future for Yield<'_, T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this.value.take() {
            Some(v) => {
                this.airlock.put(v);
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::task::noop_waker_ref;

    #[test]
    fn test_yield_parks_then_resumes() {
        let airlock = Airlock::new();
        let mut scope = Scope::new(airlock.clone());
        let mut cx = Context::from_waker(noop_waker_ref());

        let mut y = scope.yield_("a");
        assert_eq!(Pin::new(&mut y).poll(&mut cx), Poll::Pending);
        assert_eq!(airlock.take(), Some("a"));
        assert_eq!(Pin::new(&mut y).poll(&mut cx), Poll::Ready(()));
        assert_eq!(airlock.take(), None);
    }
}
