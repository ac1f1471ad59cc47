//! # fmap
//!
//! map a function over a generator, producing another generator
//!

use crate::gen_impl::{Generator, Gn};
use crate::iter::Sentinel;

/// build a generator that emits `f(v)` for every `v` emitted by `source`
///
/// `source` is owned by the new generator and nothing is pulled from it
/// before the new generator is driven. The result keeps the fault policy of
/// `source`.
///
/// ```
/// use genseq::{fmap, Gn};
///
/// let g = Gn::new_scoped(|mut s| async move {
///     for i in 1..=3 {
///         s.yield_(i).await;
///     }
/// });
/// let squares: Vec<i32> = fmap(|x| x * x, g).collect();
/// assert_eq!(squares, [1, 4, 9]);
/// ```
pub fn fmap<'a, T, U, F>(mut f: F, mut source: Generator<'a, T>) -> Generator<'a, U>
where
    F: FnMut(T) -> U + 'a,
    T: 'a,
    U: 'a,
{
    let policy = source.policy();
    Gn::new_scoped_opt(policy, move |mut s| async move {
        let mut it = source.begin();
        while it != Sentinel {
            let v = it.take_pending();
            s.yield_(f(v)).await;
            it.advance();
        }
    })
}

impl<'a, T: 'a> Generator<'a, T> {
    /// method form of [`fmap`]
    pub fn fmap<U, F>(self, f: F) -> Generator<'a, U>
    where
        F: FnMut(T) -> U + 'a,
        U: 'a,
    {
        fmap(f, self)
    }
}
