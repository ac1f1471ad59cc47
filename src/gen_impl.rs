//! # generator
//!
//! Rust generator implementation
//!

use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::iter::FusedIterator;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;

use crate::iter::{Iter, Sentinel};
use crate::rt::{Airlock, Error};
use crate::scope::Scope;

type Body<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;
type StartFn<'a, T> = Box<dyn FnOnce(Scope<T>) -> Body<'a> + 'a>;

/// progress of one producer invocation
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// created but no producer code has run yet
    NotStarted,
    /// parked at an emission point, a value is pending
    Suspended,
    /// parked at an emission point whose value was already moved out,
    /// the next resume continues the producer
    Consumed,
    /// the producer ran to its end, or the handle is empty
    Completed,
}

/// what a resume does with a panic raised by the producer
///
/// `Discard` makes a failing producer look exactly like one that returned
/// normally: iteration just ends. The fault is logged and kept for
/// [`Generator::take_fault`], but nothing in the iteration protocol tells
/// the two apart. Use `Propagate` to get the panic back at the consumer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FaultPolicy {
    /// end the sequence quietly
    #[default]
    Discard,
    /// end the sequence and re-raise the panic from the resume that saw it
    Propagate,
}

/// Generator helper
pub struct Gn;

impl Gn {
    /// create a scoped generator with the default fault policy
    ///
    /// `f` is not called until the generator is first resumed.
    ///
    /// # Panics
    ///
    /// the body may only suspend by awaiting [`Scope::yield_`]. Awaiting any
    /// other future that returns `Pending` completes the generator, and the
    /// resume that sees it panics with [`Error::ForeignSuspend`]:
    ///
    /// ```should_panic
    /// use genseq::Gn;
    ///
    /// let mut g = Gn::new_scoped(|mut s| async move {
    ///     futures::future::pending::<()>().await;
    ///     s.yield_(1).await;
    /// });
    /// g.next();
    /// ```
    pub fn new_scoped<'a, T, F, Fut>(f: F) -> Generator<'a, T>
    where
        F: FnOnce(Scope<T>) -> Fut + 'a,
        Fut: Future<Output = ()> + 'a,
        T: 'a,
    {
        Self::new_scoped_opt(FaultPolicy::default(), f)
    }

    /// create a scoped generator with specified fault policy
    ///
    /// # Panics
    ///
    /// same suspension rule as [`Gn::new_scoped`]. Under
    /// [`FaultPolicy::Propagate`] a producer panic is re-raised from the
    /// resume that caught it.
    pub fn new_scoped_opt<'a, T, F, Fut>(policy: FaultPolicy, f: F) -> Generator<'a, T>
    where
        F: FnOnce(Scope<T>) -> Fut + 'a,
        Fut: Future<Output = ()> + 'a,
        T: 'a,
    {
        Generator {
            inner: Some(GeneratorImpl::new(policy, f)),
        }
    }
}

enum Routine<'a, T> {
    Start(StartFn<'a, T>),
    Running(Body<'a>),
    Done,
}

/// `GeneratorImpl`
/// the execution state of a single producer invocation
pub(crate) struct GeneratorImpl<'a, T> {
    // the producer, before and while it runs
    routine: Routine<'a, T>,
    // the value emitted by the last resume
    slot: Option<T>,
    // shared with the producer's scope
    airlock: Airlock<T>,
    policy: FaultPolicy,
    // a discarded producer panic
    fault: Option<Error>,
}

impl<'a, T: 'a> GeneratorImpl<'a, T> {
    fn new<F, Fut>(policy: FaultPolicy, f: F) -> Box<Self>
    where
        F: FnOnce(Scope<T>) -> Fut + 'a,
        Fut: Future<Output = ()> + 'a,
    {
        let start: StartFn<'a, T> = Box::new(move |scope: Scope<T>| -> Body<'a> {
            Box::pin(f(scope))
        });
        Box::new(GeneratorImpl {
            routine: Routine::Start(start),
            slot: None,
            airlock: Airlock::new(),
            policy,
            fault: None,
        })
    }
}

impl<'a, T> GeneratorImpl<'a, T> {
    #[inline]
    pub(crate) fn phase(&self) -> Phase {
        match self.routine {
            Routine::Start(_) => Phase::NotStarted,
            Routine::Running(_) if self.slot.is_some() => Phase::Suspended,
            Routine::Running(_) => Phase::Consumed,
            Routine::Done => Phase::Completed,
        }
    }

    /// is finished
    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        matches!(self.routine, Routine::Done)
    }

    /// the pending value, if any
    #[inline]
    pub(crate) fn value(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// move the pending value out
    #[inline]
    pub(crate) fn take_value(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// resume the generator
    ///
    /// runs the producer up to its next emission point, or to its end.
    /// a completed generator is left untouched.
    pub(crate) fn resume(&mut self) -> Option<&T> {
        // the last value is only valid until the next advance
        self.slot = None;
        if self.is_done() {
            return None;
        }

        trace!("resume generator, phase = {:?}", self.phase());
        match panic::catch_unwind(AssertUnwindSafe(|| self.poll_routine())) {
            Ok(Poll::Ready(())) => self.finish(),
            Ok(Poll::Pending) => match self.airlock.take() {
                Some(v) => self.slot = Some(v),
                None => {
                    self.finish();
                    error!("producer suspended outside of an emission point");
                    panic::panic_any(Error::ForeignSuspend);
                }
            },
            Err(cause) => {
                self.finish();
                self.on_fault(cause);
            }
        }
        self.slot.as_ref()
    }

    // start the producer on first use, then poll it once
    fn poll_routine(&mut self) -> Poll<()> {
        if let Routine::Start(_) = self.routine {
            // a panicking start leaves the routine done
            if let Routine::Start(f) = mem::replace(&mut self.routine, Routine::Done) {
                self.routine = Routine::Running(f(Scope::new(self.airlock.clone())));
            }
        }

        match self.routine {
            Routine::Running(ref mut body) => {
                let mut cx = Context::from_waker(noop_waker_ref());
                body.as_mut().poll(&mut cx)
            }
            _ => Poll::Ready(()),
        }
    }

    // drop the producer together with whatever locals it still holds
    fn finish(&mut self) {
        self.routine = Routine::Done;
        self.slot = None;
        drop(self.airlock.take());
    }

    fn on_fault(&mut self, cause: Box<dyn Any + Send>) {
        // contract violations of nested generators are never swallowed
        if matches!(
            cause.downcast_ref::<Error>(),
            Some(Error::ForeignSuspend | Error::InvalidState)
        ) {
            panic::resume_unwind(cause);
        }

        match self.policy {
            FaultPolicy::Discard => {
                let err = Error::from_panic(&*cause);
                error!("{err}, generator completes early");
                self.fault = Some(err);
            }
            FaultPolicy::Propagate => {
                error!("producer panicked inside generator, re-raising");
                panic::resume_unwind(cause);
            }
        }
    }
}

impl<'a, T> Drop for GeneratorImpl<'a, T> {
    fn drop(&mut self) {
        if let Routine::Running(_) = self.routine {
            debug!("generator is not done while drop");
        }
    }
}

/// the generator type
///
/// sole owner of one execution state. `std::mem::take` moves the state out
/// and leaves an empty generator behind, which behaves as a completed one.
pub struct Generator<'a, T> {
    inner: Option<Box<GeneratorImpl<'a, T>>>,
}

impl<'a, T> Generator<'a, T> {
    /// is finished
    #[inline]
    pub fn is_done(&self) -> bool {
        self.inner.as_ref().map_or(true, |g| g.is_done())
    }

    /// current phase, `Completed` for an empty handle
    #[inline]
    pub fn phase(&self) -> Phase {
        self.inner.as_ref().map_or(Phase::Completed, |g| g.phase())
    }

    /// fault policy of this generator, the default one for an empty handle
    pub fn policy(&self) -> FaultPolicy {
        self.inner.as_ref().map_or_else(FaultPolicy::default, |g| g.policy)
    }

    /// resume the generator and look at the value it emitted
    ///
    /// `None` once the producer has finished.
    pub fn resume(&mut self) -> Option<&T> {
        self.inner.as_deref_mut().and_then(|g| g.resume())
    }

    /// take the producer panic discarded under [`FaultPolicy::Discard`]
    pub fn take_fault(&mut self) -> Option<Error> {
        self.inner.as_deref_mut().and_then(|g| g.fault.take())
    }

    /// start the generator and return an iterator over it
    ///
    /// this is the first resume; the iterator may already equal the
    /// [`Sentinel`] when the producer emits nothing.
    pub fn begin(&mut self) -> Iter<'_, 'a, T> {
        if let Some(g) = self.inner.as_deref_mut() {
            g.resume();
        }
        Iter::new(self.inner.as_deref_mut())
    }

    /// the end of sequence marker
    #[inline]
    pub fn end(&self) -> Sentinel {
        Sentinel
    }
}

impl<'a, T> Default for Generator<'a, T> {
    fn default() -> Self {
        Generator { inner: None }
    }
}

impl<'a, T> Iterator for Generator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let g = self.inner.as_deref_mut()?;
        g.resume()?;
        g.take_value()
    }
}

impl<'a, T> FusedIterator for Generator<'a, T> {}

impl<'a, T> fmt::Debug for Generator<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Generator<Output={}> {{ phase: {:?} }}",
            type_name::<T>(),
            self.phase()
        )
    }
}
