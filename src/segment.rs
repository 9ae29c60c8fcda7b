// SPDX-License-Identifier: Apache-2.0

//! The segment list (component A). The list itself is just the chain of
//! `prev`/`next` links threaded through [`Arena`] nodes; this module holds
//! the two operations that mutate it: splitting a gap for an allocation and
//! splicing a node out on coalesce.

use crate::arena::{Arena, NodeId};

/// Splits `gap_id` to carve out `request` bytes: the node is mutated in
/// place to `size = request, allocated = true`, and if `request` is smaller
/// than the gap, a fresh residual gap node is inserted immediately after it.
/// Returns the residual's id, if one was created.
///
/// No coalesce is needed here: the left half becomes allocated, so it can
/// never be adjacent to another gap as a result of this call.
pub(crate) fn split(arena: &mut Arena, gap_id: NodeId, request: usize) -> Option<NodeId> {
	let gap_size = arena.get(gap_id).size;
	debug_assert!(request > 0 && request <= gap_size);

	{
		let gap = arena.get_mut(gap_id);
		gap.size = request;
		gap.allocated = true;
	}

	if request == gap_size {
		return None;
	}

	let (residual_base, next_id) = {
		let gap = arena.get(gap_id);
		(gap.base + request, gap.next)
	};
	let residual_size = gap_size - request;

	let residual_id = arena.acquire();
	{
		let residual = arena.get_mut(residual_id);
		residual.base = residual_base;
		residual.size = residual_size;
		residual.allocated = false;
		residual.prev = Some(gap_id);
		residual.next = next_id;
	}
	if let Some(next_id) = next_id {
		arena.get_mut(next_id).prev = Some(residual_id);
	}
	arena.get_mut(gap_id).next = Some(residual_id);

	Some(residual_id)
}

/// Splices `id` out of the list, relinking its neighbors, and returns its
/// slot to the arena. If `id` was the list head, `*head` is updated to its
/// successor (the engine never actually exercises this branch, since the
/// head segment has no predecessor to coalesce into, but it's kept correct
/// for completeness).
pub(crate) fn splice_remove(arena: &mut Arena, id: NodeId, head: &mut NodeId) {
	let (prev, next) = {
		let node = arena.get(id);
		(node.prev, node.next)
	};

	match prev {
		Some(prev_id) => arena.get_mut(prev_id).next = next,
		None => if let Some(next_id) = next {
			*head = next_id;
		},
	}
	if let Some(next_id) = next {
		arena.get_mut(next_id).prev = prev;
	}

	arena.release(id);
}
