//! Flood fill of an `N x N` chunk into connected components.

use std::collections::VecDeque;

use super::component::{ChunkComponents, Component};
use crate::coords::{InChunkCoord, ALL_DIRECTIONS};

/// Reusable scratch state for [`compute_connected_components`] and
/// [`compute_connected_components_streaming`]: a visited bitmap and a BFS
/// queue, both sized for an `N x N` chunk. Injectable so repeated calls
/// amortize allocation.
pub struct FloodFillScratch<const N: usize> {
  visited: Vec<bool>,
  queue: VecDeque<InChunkCoord>,
}

impl<const N: usize> FloodFillScratch<N> {
  pub fn new() -> Self {
    Self {
      visited: vec![false; N * N],
      queue: VecDeque::with_capacity(N * N),
    }
  }

  #[inline]
  fn index_of(p: InChunkCoord) -> usize {
    p.1 as usize * N + p.0 as usize
  }

  fn clear(&mut self) {
    self.visited.iter_mut().for_each(|v| *v = false);
    self.queue.clear();
  }
}

impl<const N: usize> Default for FloodFillScratch<N> {
  fn default() -> Self {
    Self::new()
  }
}

/// Records the outward-facing border-edge footprint of `p` into both the
/// component's forward list and is returned for the reverse index to apply.
fn border_edges_of<const N: usize>(
  p: InChunkCoord,
  tile_connectivity: &impl Fn(InChunkCoord, crate::coords::Direction) -> crate::coords::TileEdgeConnectivity,
) -> Vec<(crate::coords::BorderEdgeIndex, crate::coords::TileEdgeConnectivity)> {
  use crate::coords::{BorderEdgeIndex, Direction};
  let mut out = Vec::with_capacity(2);
  let n = N as u16;
  if p.0 == 0 {
    out.push((
      BorderEdgeIndex::new(Direction::MinusX, p.1),
      tile_connectivity(p, Direction::MinusX),
    ));
  }
  if p.0 == n - 1 {
    out.push((
      BorderEdgeIndex::new(Direction::PlusX, p.1),
      tile_connectivity(p, Direction::PlusX),
    ));
  }
  if p.1 == 0 {
    out.push((
      BorderEdgeIndex::new(Direction::MinusY, p.0),
      tile_connectivity(p, Direction::MinusY),
    ));
  }
  if p.1 == n - 1 {
    out.push((
      BorderEdgeIndex::new(Direction::PlusY, p.0),
      tile_connectivity(p, Direction::PlusY),
    ));
  }
  out
}

/// BFS from `start`, marking cells visited and growing `component` in
/// discovery order. Cells are gated by the bilateral mask check: a move from
/// `p` to `p + dir` is permitted iff `tile_connectivity(p, dir) &
/// tile_connectivity(p + dir, dir.opposite())` is non-zero and the neighbor
/// exists.
#[allow(clippy::too_many_arguments)]
fn flood_from<const N: usize>(
  scratch: &mut FloodFillScratch<N>,
  start: InChunkCoord,
  tile_exists: &impl Fn(InChunkCoord) -> bool,
  tile_connectivity: &impl Fn(InChunkCoord, crate::coords::Direction) -> crate::coords::TileEdgeConnectivity,
  component: &mut Component,
) {
  scratch.visited[FloodFillScratch::<N>::index_of(start)] = true;
  scratch.queue.push_back(start);

  let mut first = true;
  while let Some(p) = scratch.queue.pop_front() {
    if first {
      first = false;
    } else {
      component.tiles.push(p);
      component.bounds.extend_to_include(p);
    }
    component
      .border_edges
      .extend(border_edges_of::<N>(p, tile_connectivity));

    for dir in ALL_DIRECTIONS {
      let Some(np) = p + dir.delta() else { continue };
      if np.0 >= N as u16 || np.1 >= N as u16 {
        continue;
      }
      let idx = FloodFillScratch::<N>::index_of(np);
      if scratch.visited[idx] {
        continue;
      }
      if !tile_exists(np) {
        continue;
      }
      if !tile_connectivity(p, dir).connects(tile_connectivity(np, dir.opposite())) {
        continue;
      }
      scratch.visited[idx] = true;
      scratch.queue.push_back(np);
    }
  }
}

/// Visits every cell of an `N x N` chunk in row-major order, skipping cells
/// that are already visited or do not exist, and accumulates every
/// discovered component into a single [`ChunkComponents`].
pub fn compute_connected_components<const N: usize>(
  scratch: &mut FloodFillScratch<N>,
  tile_exists: impl Fn(InChunkCoord) -> bool,
  tile_connectivity: impl Fn(InChunkCoord, crate::coords::Direction) -> crate::coords::TileEdgeConnectivity,
) -> ChunkComponents<N> {
  let mut out = ChunkComponents::empty();
  compute_connected_components_streaming(scratch, tile_exists, tile_connectivity, |component| {
    out.push_component(component);
  });
  out
}

/// As [`compute_connected_components`], but invokes `on_component` once per
/// completed component instead of accumulating a [`ChunkComponents`]. Lets
/// the caller harvest a single [`Component`] at a time without allocating
/// the full per-chunk record.
pub fn compute_connected_components_streaming<const N: usize>(
  scratch: &mut FloodFillScratch<N>,
  tile_exists: impl Fn(InChunkCoord) -> bool,
  tile_connectivity: impl Fn(InChunkCoord, crate::coords::Direction) -> crate::coords::TileEdgeConnectivity,
  mut on_component: impl FnMut(Component),
) {
  scratch.clear();
  for y in 0..N as u16 {
    for x in 0..N as u16 {
      let p = InChunkCoord(x, y);
      if scratch.visited[FloodFillScratch::<N>::index_of(p)] {
        continue;
      }
      if !tile_exists(p) {
        scratch.visited[FloodFillScratch::<N>::index_of(p)] = true;
        continue;
      }
      let mut component = ChunkComponents::<N>::new_component_seed(p);
      flood_from(scratch, p, &tile_exists, &tile_connectivity, &mut component);
      on_component(component);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coords::{Direction, TileEdgeConnectivity};

  const FULL: TileEdgeConnectivity = TileEdgeConnectivity(0b1111);

  fn all_connected_chunk<const N: usize>(present: impl Fn(InChunkCoord) -> bool) -> ChunkComponents<N> {
    let mut scratch = FloodFillScratch::<N>::new();
    compute_connected_components::<N>(&mut scratch, present, |_p, _d| FULL)
  }

  #[test]
  fn empty_chunk_has_zero_components() {
    let cc = all_connected_chunk::<4>(|_| false);
    assert_eq!(cc.num_components(), 0);
  }

  #[test]
  fn fully_filled_chunk_is_one_component_with_full_border_masks() {
    let cc = all_connected_chunk::<4>(|_| true);
    assert_eq!(cc.num_components(), 1);
    let comp = &cc.components[0];
    assert_eq!(comp.tiles.len(), 16);
    // Each side of a 4x4 chunk has 4 border tiles.
    let per_side = |d: Direction| comp.border_edges.iter().filter(|(e, _)| e.side() == d).count();
    assert_eq!(per_side(Direction::PlusX), 4);
    assert_eq!(per_side(Direction::MinusX), 4);
    assert_eq!(per_side(Direction::PlusY), 4);
    assert_eq!(per_side(Direction::MinusY), 4);
    assert!(comp.border_edges.iter().all(|(_, mask)| *mask == FULL));
  }

  #[test]
  fn single_tile_chunk_is_one_component_of_size_one() {
    let mut scratch = FloodFillScratch::<1>::new();
    let cc = compute_connected_components::<1>(&mut scratch, |_| true, |_, _| FULL);
    assert_eq!(cc.num_components(), 1);
    assert_eq!(cc.components[0].tiles.len(), 1);
    // All four sides are borders for a 1x1 chunk.
    assert_eq!(cc.components[0].border_edges.len(), 4);
  }

  #[test]
  fn isolated_tiles_each_form_their_own_component() {
    // Checkerboard: no two present tiles are 4-adjacent.
    let present = |p: InChunkCoord| (p.0 + p.1) % 2 == 0;
    let mut scratch = FloodFillScratch::<4>::new();
    let cc = compute_connected_components::<4>(&mut scratch, present, |_, _| FULL);
    let expected = (0..4u16)
      .flat_map(|y| (0..4u16).map(move |x| InChunkCoord(x, y)))
      .filter(|&p| present(p))
      .count();
    assert_eq!(cc.num_components(), expected);
    assert!(cc.components.iter().all(|c| c.tiles.len() == 1));
  }

  #[test]
  fn bilateral_mask_mismatch_blocks_connection() {
    // Two side-by-side tiles whose facing masks share no bit never merge.
    let mask = |p: InChunkCoord, d: Direction| -> TileEdgeConnectivity {
      if p == InChunkCoord(0, 0) && d == Direction::PlusX {
        TileEdgeConnectivity(0b01)
      } else if p == InChunkCoord(1, 0) && d == Direction::MinusX {
        TileEdgeConnectivity(0b10)
      } else {
        FULL
      }
    };
    let mut scratch = FloodFillScratch::<2>::new();
    let cc = compute_connected_components::<2>(&mut scratch, |_| true, mask);
    // (0,0) and (1,0) must land in different components.
    assert!(cc.num_components() >= 2);
  }

  #[test]
  fn streaming_mode_matches_full_mode_component_count() {
    let present = |p: InChunkCoord| (p.0 + p.1) % 2 == 0;
    let mut scratch_full = FloodFillScratch::<4>::new();
    let full = compute_connected_components::<4>(&mut scratch_full, present, |_, _| FULL);

    let mut scratch_stream = FloodFillScratch::<4>::new();
    let mut count = 0usize;
    compute_connected_components_streaming::<4>(&mut scratch_stream, present, |_, _| FULL, |_| {
      count += 1;
    });
    assert_eq!(full.num_components(), count);
  }

  #[test]
  fn idempotent_on_unchanged_cells() {
    let present = |p: InChunkCoord| (p.0 as i32 - p.1 as i32).unsigned_abs() % 3 != 0;
    let mut s1 = FloodFillScratch::<5>::new();
    let a = compute_connected_components::<5>(&mut s1, present, |_, _| FULL);
    let mut s2 = FloodFillScratch::<5>::new();
    let b = compute_connected_components::<5>(&mut s2, present, |_, _| FULL);
    assert_eq!(a.num_components(), b.num_components());
    for (ca, cb) in a.components.iter().zip(b.components.iter()) {
      assert_eq!(ca.tiles, cb.tiles);
    }
  }
}
