// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Every way an operation on a [`Pool`](crate::Pool) or on the
/// [`registry`](crate::registry) module's free functions can fail.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
	/// Growing an internal structure (the node arena or the gap index) or the
	/// initial allocation of a pool failed.
	#[error("out of memory")]
	OutOfMemory,
	/// No gap in the pool satisfies a request.
	#[error("no gap large enough for a request of {requested} bytes")]
	OutOfSpace {
		/// The size that was requested.
		requested: usize,
	},
	/// Close was refused because the pool is not in its fully-freed state.
	#[error("pool has {live_allocs} live allocation(s) and {num_gaps} gap(s), expected 0 and 1")]
	NotFreed {
		/// Outstanding allocation count at the time of the refusal.
		live_allocs: usize,
		/// Gap count at the time of the refusal.
		num_gaps: usize,
	},
	/// A handle referred to a segment that is not currently allocated in this
	/// pool, or to a segment from a different pool.
	#[error("handle does not refer to a live allocation in this pool")]
	InvalidHandle,
	/// A registry operation referred to a `PoolId` that was never opened, or
	/// was already closed.
	#[error("pool id is not open")]
	NotInitialized,
	/// A region or allocation size of zero was requested.
	#[error("size must be non-zero")]
	InvalidSize,
	/// An internal invariant (see the consistency-check helper) did not hold.
	/// Only returned in release builds; debug builds assert instead.
	#[error("internal allocator invariant violated: {0}")]
	Corrupt(&'static str),
}
