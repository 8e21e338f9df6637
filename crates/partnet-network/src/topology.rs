//! Topology - Which parts belong to the same network
//!
//! Membership is computed from an explicit adjacency interface rather than
//! by walking world storage directly.

use std::collections::{BTreeSet, VecDeque};

use partnet_core::{BlockPos, PartTarget};

/// Connectivity source for cluster discovery
pub trait Adjacency {
    /// Parts directly connected to `pos`, including parts mounted at `pos`
    fn neighbors(&self, pos: BlockPos) -> BTreeSet<PartTarget>;
}

/// Flood-fill every part reachable from `start`.
///
/// Positions are visited at most once, so cyclic adjacency terminates.
pub fn discover_cluster(start: BlockPos, adjacency: &dyn Adjacency) -> BTreeSet<PartTarget> {
    let mut cluster = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for target in adjacency.neighbors(pos) {
            let next = target.center_pos();
            if visited.insert(next) {
                queue.push_back(next);
            }
            cluster.insert(target);
        }
    }

    cluster
}
