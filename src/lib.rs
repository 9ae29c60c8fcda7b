// SPDX-License-Identifier: Apache-2.0

//! ## How it works
//!
//! A [`Pool`] manages a fixed-size region as a list of *segments*: maximal
//! contiguous byte ranges that are either a live *allocation* or a free
//! *gap*. Opening a pool creates one gap spanning the whole region.
//!
//! ### Allocating and releasing
//!
//! [`Pool::allocate`] picks a gap under the pool's [`Placement`] policy —
//! the first one that fits in address order (`FirstFit`), or the smallest
//! one that fits, ties broken by address (`BestFit`) — and splits it: the
//! front becomes the allocation, any leftover becomes a new, smaller gap.
//! [`Pool::release`] flips an allocation back to a gap and coalesces it
//! with any gap neighbor on either side, so adjacent free space never stays
//! fragmented across a release.
//!
//! Segment records live in a dense, stable-indexed [arena](arena), never
//! moved once created, so the [`Handle`] an allocation hands back stays
//! valid across whatever internal growth happens later. A sorted
//! [gap index](gap_index) keyed by `(size, base)` makes best-fit lookup and
//! ordered enumeration cheap without re-scanning the segment list.
//!
//! ### Collaborators
//!
//! [`Pool`] itself is single-owner and synchronous — no internal locking,
//! no background work. The [`registry`] module layers a process-wide,
//! mutex-guarded table of open pools on top, for callers that want to open
//! and close pools by an opaque ID from multiple threads (pools themselves
//! still aren't safe to use concurrently once opened). The [`stats`] module
//! is a pure reducer over [`Pool::inspect`] for reporting fragmentation.

mod arena;
mod error;
mod gap_index;
mod pool;
mod policy;
pub mod registry;
mod segment;
pub mod stats;

pub use error::Error;
pub use policy::Placement;
pub use pool::{Handle, Pool, SegmentView};
