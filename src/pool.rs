// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};
use all_asserts::assert_le;
use crate::arena::{Arena, NodeId};
use crate::gap_index::GapIndex;
use crate::policy::Placement;
use crate::segment;
use crate::Error;

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// An allocation handle: an opaque reference into a pool's segment list,
/// valid until its specific allocation is released. Exposes `base` and
/// `size` per the external interface; the rest is only used to validate the
/// handle on release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Handle {
	pub base: usize,
	pub size: usize,
	id: NodeId,
	tag: u64,
	generation: u32,
}

/// A read-only view of one segment, as returned by [`Pool::inspect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmentView {
	pub base: usize,
	pub size: usize,
	pub allocated: bool,
}

/// The allocator engine (components A–E): a region's segment list, node
/// arena, and gap index, plus the placement and release algorithms that
/// keep them consistent.
///
/// Not safe for concurrent use — see the crate-level docs and the
/// [`registry`](crate::registry) module for a collaborator that adds
/// process-wide synchronization around pool lifetimes.
pub struct Pool {
	arena: Arena,
	gaps: GapIndex,
	head: NodeId,
	total_size: usize,
	alloc_size: usize,
	num_allocs: usize,
	num_gaps: usize,
	policy: Placement,
	tag: u64,
}

impl Pool {
	/// Opens a pool over a region of `total_size` bytes, with a single gap
	/// covering the whole region.
	pub fn open(total_size: usize, policy: Placement) -> Result<Self, Error> {
		if total_size == 0 {
			return Err(Error::InvalidSize);
		}

		let mut arena = Arena::new();
		let root = arena.acquire();
		{
			let node = arena.get_mut(root);
			node.base = 0;
			node.size = total_size;
			node.allocated = false;
		}

		let mut gaps = GapIndex::new();
		gaps.insert(total_size, 0, root);

		let tag = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
		log::debug!("pool opened: tag={tag} total_size={total_size} policy={policy:?}");

		let pool = Self {
			arena,
			gaps,
			head: root,
			total_size,
			alloc_size: 0,
			num_allocs: 0,
			num_gaps: 1,
			policy,
			tag,
		};
		pool.check_invariants();
		Ok(pool)
	}

	pub fn policy(&self) -> Placement { self.policy }
	pub fn total_size(&self) -> usize { self.total_size }
	pub fn alloc_size(&self) -> usize { self.alloc_size }
	pub fn num_allocs(&self) -> usize { self.num_allocs }
	pub fn num_gaps(&self) -> usize { self.num_gaps }

	/// Allocates `size` bytes from the pool's largest-fitting (best-fit) or
	/// first-fitting (first-fit) gap, splitting it if a residual remains.
	pub fn allocate(&mut self, size: usize) -> Result<Handle, Error> {
		if size == 0 {
			return Err(Error::InvalidSize);
		}

		if self.gaps.is_empty() {
			return Err(Error::OutOfSpace { requested: size });
		}

		self.arena.maybe_grow();

		let Some(gap_id) = self.find_candidate(size) else {
			return Err(Error::OutOfSpace { requested: size });
		};

		self.gaps.remove(gap_id);

		let base = self.arena.get(gap_id).base;
		let residual = segment::split(&mut self.arena, gap_id, size);
		match residual {
			Some(residual_id) => {
				let r = self.arena.get(residual_id);
				self.gaps.insert(r.size, r.base, residual_id);
			}
			None => self.num_gaps -= 1,
		}

		self.num_allocs += 1;
		self.alloc_size += size;

		let generation = self.arena.get(gap_id).generation;
		log::debug!("allocate: base={base} size={size}");
		self.check_invariants();

		Ok(Handle { id: gap_id, base, size, tag: self.tag, generation })
	}

	/// Releases a handle, converting it back to a gap and coalescing with
	/// any adjacent gap neighbors.
	pub fn release(&mut self, handle: Handle) -> Result<(), Error> {
		self.validate(&handle)?;

		let id = handle.id;
		self.arena.get_mut(id).allocated = false;
		self.num_allocs -= 1;
		self.alloc_size -= handle.size;

		let mut target = id;

		if let Some(next_id) = self.arena.get(target).next {
			if !self.arena.get(next_id).allocated {
				self.gaps.remove(next_id);
				let next_size = self.arena.get(next_id).size;
				self.arena.get_mut(target).size += next_size;
				segment::splice_remove(&mut self.arena, next_id, &mut self.head);
				self.num_gaps -= 1;
			}
		}

		if let Some(prev_id) = self.arena.get(target).prev {
			if !self.arena.get(prev_id).allocated {
				self.gaps.remove(prev_id);
				let target_size = self.arena.get(target).size;
				self.arena.get_mut(prev_id).size += target_size;
				segment::splice_remove(&mut self.arena, target, &mut self.head);
				self.num_gaps -= 1;
				target = prev_id;
			}
		}

		let (size, base) = {
			let n = self.arena.get(target);
			(n.size, n.base)
		};
		self.gaps.insert(size, base, target);
		self.num_gaps += 1;

		log::debug!("release: base={} size={}", handle.base, handle.size);
		self.check_invariants();

		Ok(())
	}

	/// Walks the segment list in address order, returning a snapshot of
	/// every segment covering the region. A pure read: does not mutate the
	/// pool.
	pub fn inspect(&self) -> Vec<SegmentView> {
		let mut out = Vec::with_capacity(self.num_allocs + self.num_gaps);
		let mut cur = Some(self.head);
		while let Some(id) = cur {
			let n = self.arena.get(id);
			out.push(SegmentView { base: n.base, size: n.size, allocated: n.allocated });
			cur = n.next;
		}
		out
	}

	/// Checks whether the pool is in its fully-freed state (no live
	/// allocations, a single gap covering the region). Doesn't consume the
	/// pool: a `Pool` owns no external resource that needs explicit
	/// teardown, so destruction is ordinary `Drop` once the caller is
	/// satisfied this check passed.
	pub fn close(&self) -> Result<(), Error> {
		if self.num_allocs != 0 || self.num_gaps != 1 {
			return Err(Error::NotFreed { live_allocs: self.num_allocs, num_gaps: self.num_gaps });
		}
		log::debug!("pool closed: tag={}", self.tag);
		Ok(())
	}

	fn find_candidate(&self, size: usize) -> Option<NodeId> {
		match self.policy {
			Placement::FirstFit => self.first_fit(size),
			Placement::BestFit => self.gaps.best_fit(size),
		}
	}

	fn first_fit(&self, size: usize) -> Option<NodeId> {
		let mut cur = Some(self.head);
		while let Some(id) = cur {
			let n = self.arena.get(id);
			if !n.allocated && n.size >= size {
				return Some(id);
			}
			cur = n.next;
		}
		None
	}

	fn validate(&self, handle: &Handle) -> Result<(), Error> {
		if handle.tag != self.tag || handle.id >= self.arena.len() {
			return Err(Error::InvalidHandle);
		}
		let node = self.arena.get(handle.id);
		if !node.used || !node.allocated || node.generation != handle.generation {
			return Err(Error::InvalidHandle);
		}
		Ok(())
	}

	/// Verifies the quantified invariants from the spec: tiling, no adjacent
	/// gaps, gap index/list agreement and ordering, and counter agreement.
	/// A no-op in release builds; a failing assertion here is always an
	/// engine bug, never a caller error.
	#[cfg(debug_assertions)]
	fn check_invariants(&self) {
		let mut cur = Some(self.head);
		let mut expected_base = 0usize;
		let mut seen_gaps = 0usize;
		let mut seen_allocs = 0usize;
		let mut alloc_size = 0usize;
		let mut gap_size = 0usize;
		let mut prev_was_gap = false;

		while let Some(id) = cur {
			let n = self.arena.get(id);
			assert_eq!(n.base, expected_base, "segment base does not tile the region");
			assert!(n.size > 0, "zero-size segment in list");
			assert!(!(prev_was_gap && !n.allocated), "adjacent gaps at base {}", n.base);

			if n.allocated {
				seen_allocs += 1;
				alloc_size += n.size;
			} else {
				seen_gaps += 1;
				gap_size += n.size;
			}

			expected_base += n.size;
			prev_was_gap = !n.allocated;
			cur = n.next;
		}

		assert_eq!(expected_base, self.total_size, "segments do not cover the whole region");
		assert_eq!(seen_allocs, self.num_allocs, "num_allocs out of sync with segment list");
		assert_eq!(seen_gaps, self.num_gaps, "num_gaps out of sync with segment list");
		assert_eq!(alloc_size, self.alloc_size, "alloc_size out of sync with segment list");
		assert_le!(self.alloc_size, self.total_size, "alloc_size exceeds the region");
		assert_eq!(alloc_size + gap_size, self.total_size, "alloc_size + gap size != total_size");
		assert_eq!(self.gaps.len(), seen_gaps, "gap index length disagrees with segment list");
		assert!(self.gaps.is_sorted(), "gap index is not sorted by (size, base)");
		assert!(!self.gaps.is_empty() || seen_gaps == 0, "gap index empty but segment list has gaps");
		for (size, base, node) in self.gaps.iter() {
			let n = self.arena.get(node);
			assert!(!n.allocated, "gap index entry {node} references an allocated segment");
			assert_eq!((n.size, n.base), (size, base), "gap index entry {node} disagrees with its segment");
		}
	}

	#[cfg(not(debug_assertions))]
	fn check_invariants(&self) {}
}
