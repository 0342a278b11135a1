//! The crate's error-handling surface.
//!
//! Per the design split in [`crate`]'s top-level docs: programmer errors
//! (out-of-range indices, double-insertion, violated invariants) are
//! `debug_assert!`/`debug_assert_eq!` failures that abort in debug builds
//! and compile out in release; the one recoverable failure
//! ([`SparseIndexSet::insert_any`](crate::sparse_index_set::SparseIndexSet::insert_any)
//! on a full set) is surfaced as a plain `Option`, not an error type, since
//! the caller's remedy is simply to call `reserve` and retry. Every other
//! geometry and connectivity operation is total over valid inputs — there
//! is no other error category.
//!
//! [`CapacityExhausted`] exists only for call sites that would rather
//! propagate with `?` than match on `Option` (e.g. a host's chunk-loading
//! path that wraps many fallible steps in one `Result`-returning function).

use std::fmt;

/// A [`SparseIndexSet`](crate::sparse_index_set::SparseIndexSet) (or any
/// other capacity-bounded structure in this crate) was asked to allocate
/// past its current capacity.
///
/// Not an error in the usual sense — the set itself never holds this as
/// state, and `insert_any` returns `None` rather than this type. Use
/// [`exhausted`] to turn that `None` into this error at call sites that
/// prefer `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExhausted;

impl fmt::Display for CapacityExhausted {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "capacity exhausted; call reserve() to grow before retrying")
  }
}

impl std::error::Error for CapacityExhausted {}

/// Converts the `None` case of a capacity-bounded allocation into
/// [`CapacityExhausted`], for callers composing with `?` instead of
/// matching on `Option` directly.
#[inline]
pub fn exhausted<T>(result: Option<T>) -> Result<T, CapacityExhausted> {
  result.ok_or(CapacityExhausted)
}
