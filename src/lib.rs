//! # genseq
//!
//! lazy, single-pass generators
//!
//! A producer is a closure that receives a [`Scope`] and returns an `async`
//! body. Every `scope.yield_(v).await` is an emission point: the value is
//! handed to the consumer and the producer stays suspended, locals and all,
//! until the consumer asks for the next one. Nothing runs before the first
//! resume.
//!
//! ```
//! use genseq::Gn;
//!
//! let g = Gn::new_scoped(|mut s| async move {
//!     let (mut a, mut b) = (0, 1);
//!     while b < 20 {
//!         s.yield_(b).await;
//!         (a, b) = (b, a + b);
//!     }
//! });
//!
//! let v: Vec<u32> = g.collect();
//! assert_eq!(v, [1, 1, 2, 3, 5, 8, 13]);
//! ```
//!
//! A generator can be consumed as a plain [`Iterator`] that hands out owned
//! values, or through [`Generator::begin`] and the [`Sentinel`], which read
//! each value in place.
//!
//! The `async` body is only a way to write a resumable state machine. It is
//! polled with a no-op waker and the only future it may suspend on is
//! [`Yield`]; awaiting anything that returns `Pending` panics with
//! [`Error::ForeignSuspend`].
//!
//! A panic in the producer ends the sequence as if the producer had
//! returned, unless the generator is built with [`FaultPolicy::Propagate`].
//! See [`FaultPolicy`].

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod fmap;
mod gen_impl;
mod iter;
mod rt;
mod scope;

pub use crate::fmap::fmap;
pub use crate::gen_impl::{FaultPolicy, Generator, Gn, Phase};
pub use crate::iter::{Iter, Sentinel};
pub use crate::rt::Error;
pub use crate::scope::{Scope, Yield};
