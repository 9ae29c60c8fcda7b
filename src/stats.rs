// SPDX-License-Identifier: Apache-2.0

//! The stats inspector (collaborator G): a read-only reducer over
//! [`Pool::inspect`](crate::Pool::inspect) output. Never calls back into
//! the engine's mutating operations.

use crate::pool::SegmentView;

/// A snapshot fragmentation report, computed from an `inspect()` result.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stats {
	/// `num_gaps / (num_gaps + num_allocs)`, clamped to 0 whenever
	/// `num_gaps <= 1` — a full pool or a freshly opened one has nothing to
	/// call fragmented.
	pub fragmentation_ratio: f64,
	/// Size of the largest gap, or 0 if the pool has none.
	pub largest_gap: usize,
	pub num_gaps: usize,
	pub num_allocs: usize,
}

/// Reduces a segment snapshot into a [`Stats`] report.
pub fn summarize(segments: &[SegmentView]) -> Stats {
	let mut num_gaps = 0usize;
	let mut num_allocs = 0usize;
	let mut largest_gap = 0usize;

	for seg in segments {
		if seg.allocated {
			num_allocs += 1;
		} else {
			num_gaps += 1;
			largest_gap = largest_gap.max(seg.size);
		}
	}

	let fragmentation_ratio = if num_gaps <= 1 {
		0.0
	} else {
		num_gaps as f64 / (num_gaps + num_allocs) as f64
	};

	Stats { fragmentation_ratio, largest_gap, num_gaps, num_allocs }
}

/// Buckets gap sizes against caller-supplied upper bounds. `buckets` must be
/// sorted ascending; the returned histogram has one more entry than
/// `buckets`, the last catching anything larger than the final bound.
pub fn gap_histogram(segments: &[SegmentView], buckets: &[usize]) -> Vec<usize> {
	let mut counts = vec![0usize; buckets.len() + 1];
	for seg in segments.iter().filter(|s| !s.allocated) {
		let idx = buckets.iter().position(|&bound| seg.size <= bound).unwrap_or(buckets.len());
		counts[idx] += 1;
	}
	counts
}
