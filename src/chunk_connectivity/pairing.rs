//! Cross-chunk pairing: fills, for two adjacent chunks, the list of neighbor
//! component indices in each chunk given the border-edge mask agreement.

use std::collections::HashSet;

use super::component::{ChunkComponents, ComponentIndex};
use crate::coords::{BorderEdgeIndex, Direction};

/// Reusable scratch set of `(a_component, b_component)` pairs already linked
/// this call, so a shared border run of more than one edge doesn't double
/// up a neighbor entry.
#[derive(Default)]
pub struct PairingScratch {
  seen: HashSet<(ComponentIndex, ComponentIndex)>,
}

impl PairingScratch {
  pub fn new() -> Self {
    Self::default()
  }

  fn clear(&mut self) {
    self.seen.clear();
  }
}

/// Clears and refills the cross-chunk neighbor lists between two chunks that
/// meet along `dir_a_to_b` (the direction from `a`'s perspective that leads
/// to `b`).
///
/// If either chunk is absent, the present chunk's relevant direction array
/// is simply zeroed. Both-absent is a no-op. Neighbor pairs are emitted in
/// order of the shared border coordinate.
pub fn compute_connectivity_between_chunks<const N: usize>(
  a: Option<&mut ChunkComponents<N>>,
  b: Option<&mut ChunkComponents<N>>,
  dir_a_to_b: Direction,
  scratch: &mut PairingScratch,
) {
  let dir_b_to_a = dir_a_to_b.opposite();
  match (a, b) {
    (None, None) => {}
    (Some(a), None) => a.clear_neighbor_lists(dir_a_to_b),
    (None, Some(b)) => b.clear_neighbor_lists(dir_b_to_a),
    (Some(a), Some(b)) => {
      a.clear_neighbor_lists(dir_a_to_b);
      b.clear_neighbor_lists(dir_b_to_a);
      scratch.clear();
      for offset in 0..N as u16 {
        let edge_a = BorderEdgeIndex::new(dir_a_to_b, offset);
        let edge_b = BorderEdgeIndex::new(dir_b_to_a, offset);
        let (a_comp, a_mask) = a.border_edge_info(edge_a);
        let (b_comp, b_mask) = b.border_edge_info(edge_b);
        if !a_comp.is_valid() || !b_comp.is_valid() {
          continue;
        }
        if !a_mask.connects(b_mask) {
          continue;
        }
        if scratch.seen.insert((a_comp, b_comp)) {
          a.push_neighbor(dir_a_to_b, a_comp, b_comp);
          b.push_neighbor(dir_b_to_a, b_comp, a_comp);
        }
      }
    }
  }
}
