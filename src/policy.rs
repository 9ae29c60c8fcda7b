// SPDX-License-Identifier: Apache-2.0

/// Placement policy for the placement engine (component D).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
	/// Scans the segment list in address order and takes the first gap that
	/// fits. Minimizes high-end fragmentation for workloads with varying
	/// allocation lifetimes.
	FirstFit,
	/// Scans the gap index and takes the smallest gap that fits, ties broken
	/// by lowest base address. Minimizes residual size per split.
	BestFit,
}
