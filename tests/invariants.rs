// SPDX-License-Identifier: Apache-2.0

use std::sync::Once;
use pretty_assertions::assert_eq;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use regionpool::{Placement, Pool};

const REGION_SIZE: usize = 4096;

static INIT_LOG: Once = Once::new();

/// Initializes `env_logger` once per test binary so the engine's
/// `log::debug!`/`log::trace!` lifecycle calls run for real instead of
/// being dead code under a default logger.
fn init_logger() {
	INIT_LOG.call_once(|| {
		env_logger::builder()
			.is_test(true)
			.filter_level(log::LevelFilter::Trace)
			.try_init()
			.unwrap();
	});
}

/// Drives a pool through a random sequence of allocate/release-oldest
/// operations, checking after every step that the segment list tiles the
/// region exactly and never holds two adjacent gaps. `Pool`'s own debug
/// assertions already check this internally; this test only has access to
/// the public API, so it re-derives the same checks from `inspect()`.
fn check_after_every_step(sizes: Vec<usize>, release_every: usize) -> TestResult {
	if sizes.is_empty() || release_every == 0 {
		return TestResult::discard();
	}

	let mut pool = match Pool::open(REGION_SIZE, Placement::BestFit) {
		Ok(pool) => pool,
		Err(_) => return TestResult::discard(),
	};
	let mut live = Vec::new();

	for (i, size) in sizes.into_iter().enumerate() {
		let size = size % REGION_SIZE.max(1) + 1;
		if let Ok(handle) = pool.allocate(size) {
			live.push(handle);
		}
		if i % release_every == 0 {
			if let Some(handle) = live.pop() {
				if pool.release(handle).is_err() {
					return TestResult::failed();
				}
			}
		}
		if !segments_tile_with_no_adjacent_gaps(&pool) {
			return TestResult::failed();
		}
	}

	for handle in live {
		if pool.release(handle).is_err() {
			return TestResult::failed();
		}
	}

	TestResult::from_bool(pool.close().is_ok())
}

fn segments_tile_with_no_adjacent_gaps(pool: &Pool) -> bool {
	let segments = pool.inspect();
	let mut expected_base = 0;
	let mut prev_was_gap = false;

	for seg in &segments {
		if seg.base != expected_base {
			return false;
		}
		if prev_was_gap && !seg.allocated {
			return false;
		}
		expected_base += seg.size;
		prev_was_gap = !seg.allocated;
	}

	expected_base == pool.total_size()
}

#[quickcheck]
fn random_alloc_release_sequences_stay_consistent(sizes: Vec<usize>, release_every: u8) -> TestResult {
	check_after_every_step(sizes, (release_every as usize) % 5 + 1)
}

#[test]
fn fully_freed_pool_always_coalesces_to_one_gap() {
	init_logger();

	let mut pool = Pool::open(REGION_SIZE, Placement::FirstFit).unwrap();
	let handles: Vec<_> = std::iter::from_fn(|| pool.allocate(37).ok()).collect();
	assert!(!handles.is_empty());

	for handle in handles {
		pool.release(handle).unwrap();
	}

	let segments = pool.inspect();
	assert_eq!(segments.len(), 1);
	assert!(!segments[0].allocated);
	assert_eq!(segments[0].size, REGION_SIZE);
	assert_eq!(pool.close(), Ok(()));
}
