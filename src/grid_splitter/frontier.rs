//! Priority-ordered frontier entries for [`super::GridSplitter`]'s walk.

use std::cmp::Ordering;

use super::{ComponentCoords, GlobalComponentIndex};

/// One pending visit: a per-chunk component coordinate discovered while
/// walking outward from `seed`.
///
/// `seed` is the *original* seed component, not the current union-find
/// representative — distance is computed against the seed's origin chunk,
/// which must stay stable across merges.
pub(super) struct FrontierEntry {
  pub coords: ComponentCoords,
  pub seed: GlobalComponentIndex,
  pub distance_sq: i64,
  pub num_connections: usize,
}

impl PartialEq for FrontierEntry {
  fn eq(&self, other: &Self) -> bool {
    self.distance_sq == other.distance_sq && self.num_connections == other.num_connections
  }
}
impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for FrontierEntry {
  /// Prefers (a) smaller squared distance to the seed's origin chunk, then
  /// (b) smaller `get_num_connections` (pull low-degree nodes first so
  /// small sub-components exit early). `BinaryHeap` is a max-heap, so this
  /// reverses the natural comparison: the "smallest" entry compares
  /// greatest.
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .distance_sq
      .cmp(&self.distance_sq)
      .then_with(|| other.num_connections.cmp(&self.num_connections))
  }
}
