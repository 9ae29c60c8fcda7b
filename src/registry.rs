// SPDX-License-Identifier: Apache-2.0

//! The pool registry (collaborator F): a process-wide table from opaque
//! [`PoolId`]s to open [`Pool`]s behind one mutex. Trivial array/map
//! management — the registry never touches a pool's segments, gaps, or
//! policy directly, only the engine's own public operations.
//!
//! Mirrors the shared-pool pattern used for the default segment pool
//! elsewhere in this crate's ancestry: a lazily-initialized, mutex-guarded
//! container behind a small set of free functions.

use std::collections::HashMap;
use std::sync::Mutex;
use once_cell::sync::Lazy;
use crate::pool::{Handle, Pool, SegmentView};
use crate::policy::Placement;
use crate::stats::{self, Stats};
use crate::Error;

/// An opaque, process-wide identifier for a pool opened through the
/// registry. Not valid for pools opened directly via [`Pool::open`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolId(u64);

#[derive(Default)]
struct Registry {
	pools: HashMap<u64, Pool>,
	next_id: u64,
}

impl Registry {
	fn open(&mut self, total_size: usize, policy: Placement) -> Result<PoolId, Error> {
		let pool = Pool::open(total_size, policy)?;
		self.next_id += 1;
		let id = self.next_id;
		self.pools.insert(id, pool);
		Ok(PoolId(id))
	}

	fn close(&mut self, id: PoolId) -> Result<(), Error> {
		let pool = self.pools.get(&id.0).ok_or(Error::NotInitialized)?;
		pool.close()?;
		self.pools.remove(&id.0);
		Ok(())
	}

	fn get_mut(&mut self, id: PoolId) -> Result<&mut Pool, Error> {
		self.pools.get_mut(&id.0).ok_or(Error::NotInitialized)
	}

	fn get(&self, id: PoolId) -> Result<&Pool, Error> {
		self.pools.get(&id.0).ok_or(Error::NotInitialized)
	}
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::default()));

fn lock() -> std::sync::MutexGuard<'static, Registry> {
	// A poisoned registry mutex only means some earlier operation panicked
	// mid-mutation; the registry's own bookkeeping (the hash map) is still
	// structurally sound, so recovering the guard is safe here.
	REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Opens a pool and registers it under a freshly minted [`PoolId`].
pub fn open(total_size: usize, policy: Placement) -> Result<PoolId, Error> {
	lock().open(total_size, policy)
}

/// Closes the pool registered under `id`, removing it from the registry
/// only if the pool is in its fully-freed state. On refusal, `id` remains
/// registered and usable.
pub fn close(id: PoolId) -> Result<(), Error> {
	lock().close(id)
}

/// Allocates from the pool registered under `id`.
pub fn allocate(id: PoolId, size: usize) -> Result<Handle, Error> {
	lock().get_mut(id)?.allocate(size)
}

/// Releases a handle back to the pool registered under `id`.
pub fn release(id: PoolId, handle: Handle) -> Result<(), Error> {
	lock().get_mut(id)?.release(handle)
}

/// Snapshots the pool registered under `id` in address order.
pub fn inspect(id: PoolId) -> Result<Vec<SegmentView>, Error> {
	Ok(lock().get(id)?.inspect())
}

/// Summarizes fragmentation for the pool registered under `id`.
pub fn stats(id: PoolId) -> Result<Stats, Error> {
	Ok(stats::summarize(&lock().get(id)?.inspect()))
}
