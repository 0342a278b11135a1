//! Per-chunk components, border-edge bookkeeping, and the tight bounding
//! rectangle that tracks a component's tiles.

use crate::coords::{BorderEdgeIndex, Direction, InChunkCoord, TileEdgeConnectivity, ALL_DIRECTIONS};

/// Index of a connected component within one chunk's component list.
///
/// Stable only until the next mutation of that chunk's component list;
/// callers must re-resolve after mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIndex(pub u32);

impl ComponentIndex {
  pub const INVALID: Self = Self(u32::MAX);

  #[inline]
  pub fn is_valid(self) -> bool {
    self != Self::INVALID
  }

  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Tight-fit rectangle over a set of [`InChunkCoord`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
  pub min: InChunkCoord,
  pub max_inclusive: InChunkCoord,
}

impl TileRect {
  /// Seeds a 1x1 rectangle at a single tile.
  #[inline]
  pub fn from_point(p: InChunkCoord) -> Self {
    Self {
      min: p,
      max_inclusive: p,
    }
  }

  /// Extends the rectangle, if necessary, to include `p`.
  #[inline]
  pub fn extend_to_include(&mut self, p: InChunkCoord) {
    self.min.0 = self.min.0.min(p.0);
    self.min.1 = self.min.1.min(p.1);
    self.max_inclusive.0 = self.max_inclusive.0.max(p.0);
    self.max_inclusive.1 = self.max_inclusive.1.max(p.1);
  }

  #[inline]
  pub fn width(&self) -> u16 {
    self.max_inclusive.0 - self.min.0 + 1
  }

  #[inline]
  pub fn height(&self) -> u16 {
    self.max_inclusive.1 - self.min.1 + 1
  }
}

/// A maximal set of cells within one chunk connected by the bilateral-mask
/// adjacency relation.
#[derive(Clone, Debug)]
pub struct Component {
  /// In-chunk tile positions, in discovery (row-major first-touch) order.
  pub tiles: Vec<InChunkCoord>,
  /// Tight bound of `tiles`.
  pub bounds: TileRect,
  /// `(border_edge_index, conn_mask)` pairs for every chunk-border edge this
  /// component owns.
  pub border_edges: Vec<(BorderEdgeIndex, TileEdgeConnectivity)>,
}

impl Component {
  fn seed(first_tile: InChunkCoord) -> Self {
    Self {
      tiles: vec![first_tile],
      bounds: TileRect::from_point(first_tile),
      border_edges: Vec::new(),
    }
  }
}

/// Per-chunk flood-fill result: components, the reverse border-edge index,
/// and cross-chunk neighbor lists (filled separately by
/// [`crate::chunk_connectivity::compute_connectivity_between_chunks`]).
#[derive(Clone, Debug)]
pub struct ChunkComponents<const N: usize> {
  pub components: Vec<Component>,
  /// One entry per border edge (`4*N` total); `ComponentIndex::INVALID`
  /// marks an edge no component owns.
  border_edge_info: Vec<(ComponentIndex, TileEdgeConnectivity)>,
  /// `neighbor_components[d][c]`: component indices in the chunk adjacent in
  /// direction `d` that share a border edge with component `c`.
  neighbor_components: [Vec<Vec<ComponentIndex>>; 4],
}

impl<const N: usize> ChunkComponents<N> {
  pub(crate) fn empty() -> Self {
    Self {
      components: Vec::new(),
      border_edge_info: vec![(ComponentIndex::INVALID, TileEdgeConnectivity::NONE); 4 * N],
      neighbor_components: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
    }
  }

  #[inline]
  pub fn num_components(&self) -> usize {
    self.components.len()
  }

  #[inline]
  pub fn border_edge_info(&self, edge: BorderEdgeIndex) -> (ComponentIndex, TileEdgeConnectivity) {
    self.border_edge_info[edge.0 as usize]
  }

  #[inline]
  pub fn neighbors(&self, dir: Direction, c: ComponentIndex) -> &[ComponentIndex] {
    self.neighbor_components[dir.side() as usize]
      .get(c.index())
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Sum, over all four directions, of the number of cross-chunk neighbors
  /// component `c` has. Used by [`crate::grid_splitter`] as a frontier
  /// tie-breaker.
  pub fn get_num_connections(&self, c: ComponentIndex) -> usize {
    ALL_DIRECTIONS
      .iter()
      .map(|&d| self.neighbors(d, c).len())
      .sum()
  }

  pub(crate) fn push_component(&mut self, component: Component) -> ComponentIndex {
    let idx = ComponentIndex(self.components.len() as u32);
    for &(edge, mask) in &component.border_edges {
      self.border_edge_info[edge.0 as usize] = (idx, mask);
    }
    self.components.push(component);
    for dirs in &mut self.neighbor_components {
      dirs.push(Vec::new());
    }
    idx
  }

  pub(crate) fn new_component_seed(first_tile: InChunkCoord) -> Component {
    Component::seed(first_tile)
  }

  pub(crate) fn clear_neighbor_lists(&mut self, dir: Direction) {
    let lists = &mut self.neighbor_components[dir.side() as usize];
    lists.clear();
    lists.resize(self.components.len(), Vec::new());
  }

  pub(crate) fn push_neighbor(&mut self, dir: Direction, c: ComponentIndex, neighbor: ComponentIndex) {
    let lists = &mut self.neighbor_components[dir.side() as usize];
    if lists.len() <= c.index() {
      lists.resize(c.index() + 1, Vec::new());
    }
    lists[c.index()].push(neighbor);
  }

  /// Removes component `c`. If `already_empty` is false, `c`'s border-edge
  /// footprints are cleared from `border_edge_info` first. If `c` is not the
  /// last component, the last one is moved into its slot and re-pointed at
  /// index `c`.
  ///
  /// Invalidates `neighbor_components`; callers must re-run
  /// [`crate::chunk_connectivity::compute_connectivity_between_chunks`]
  /// afterwards.
  pub fn swap_last_and_remove(&mut self, c: ComponentIndex, already_empty: bool) {
    debug_assert!(c.index() < self.components.len());
    if !already_empty {
      for &(edge, _) in &self.components[c.index()].border_edges {
        self.border_edge_info[edge.0 as usize] = (ComponentIndex::INVALID, TileEdgeConnectivity::NONE);
      }
    }
    for dirs in &mut self.neighbor_components {
      if c.index() < dirs.len() {
        dirs.swap_remove(c.index());
      }
    }
    self.components.swap_remove(c.index());
    if c.index() < self.components.len() {
      for &(edge, mask) in &self.components[c.index()].border_edges {
        self.border_edge_info[edge.0 as usize] = (c, mask);
      }
    }
  }

  /// Moves component `c` out of `self` and into `dst`, appending it there
  /// and returning its new index. Leaves `self`'s slot at `c` empty: tiles
  /// and border-edge footprints are cleared, but the slot itself is not
  /// removed (the caller must follow up with
  /// `self.swap_last_and_remove(c, true)`).
  pub fn move_from(&mut self, c: ComponentIndex, dst: &mut ChunkComponents<N>) -> ComponentIndex {
    debug_assert!(c.index() < self.components.len());
    for &(edge, _) in &self.components[c.index()].border_edges {
      self.border_edge_info[edge.0 as usize] = (ComponentIndex::INVALID, TileEdgeConnectivity::NONE);
    }
    let moved = std::mem::replace(
      &mut self.components[c.index()],
      Component {
        tiles: Vec::new(),
        bounds: TileRect::from_point(InChunkCoord(0, 0)),
        border_edges: Vec::new(),
      },
    );
    let new_idx = ComponentIndex(dst.components.len() as u32);
    for &(edge, mask) in &moved.border_edges {
      dst.border_edge_info[edge.0 as usize] = (new_idx, mask);
    }
    dst.components.push(moved);
    for dirs in &mut dst.neighbor_components {
      dirs.push(Vec::new());
    }
    new_idx
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::super::flood_fill::{compute_connected_components, FloodFillScratch};

  const FULL: TileEdgeConnectivity = TileEdgeConnectivity(0b1111);

  fn full_chunk<const N: usize>() -> ChunkComponents<N> {
    let mut scratch = FloodFillScratch::<N>::new();
    compute_connected_components::<N>(&mut scratch, |_| true, |_, _| FULL)
  }

  /// Moving a chunk's sole component into an empty destination, then
  /// swap-removing the now-empty source slot, relocates the component's
  /// tiles and border-edge footprint to `dst` and leaves `src` with zero
  /// components and no stray `border_edge_info` entries pointing at it.
  #[test]
  fn move_from_then_swap_remove_relocates_component_and_empties_source() {
    let mut src = full_chunk::<4>();
    let mut dst = ChunkComponents::<4>::empty();
    let original_tiles = src.components[0].tiles.clone();
    let original_border_edges = src.components[0].border_edges.clone();

    let new_idx = src.move_from(ComponentIndex(0), &mut dst);
    assert_eq!(new_idx, ComponentIndex(0));

    // The source slot is still present (not yet swap-removed) but emptied.
    assert_eq!(src.num_components(), 1);
    assert!(src.components[0].tiles.is_empty());
    assert!(src.components[0].border_edges.is_empty());
    for &(edge, _) in &original_border_edges {
      assert_eq!(
        src.border_edge_info(edge),
        (ComponentIndex::INVALID, TileEdgeConnectivity::NONE)
      );
    }

    // The destination owns the moved tiles and border edges under the new index.
    assert_eq!(dst.num_components(), 1);
    assert_eq!(dst.components[0].tiles, original_tiles);
    assert_eq!(dst.components[0].border_edges, original_border_edges);
    for &(edge, mask) in &original_border_edges {
      assert_eq!(dst.border_edge_info(edge), (new_idx, mask));
    }

    // Finish the relocation: the caller follows up with a swap-remove of the
    // now-empty source slot, as `move_from`'s doc comment requires.
    src.swap_last_and_remove(ComponentIndex(0), true);
    assert_eq!(src.num_components(), 0);
    for &(edge, _) in &original_border_edges {
      assert_eq!(
        src.border_edge_info(edge),
        (ComponentIndex::INVALID, TileEdgeConnectivity::NONE)
      );
    }
  }

  /// `swap_last_and_remove` on a non-last, non-empty component clears its
  /// own border-edge footprint and re-points the footprint of the component
  /// swapped into its slot at the new index.
  #[test]
  fn swap_last_and_remove_repoints_border_edge_info_for_the_moved_component() {
    let mut chunk = ChunkComponents::<4>::empty();
    let mut first = ChunkComponents::<4>::new_component_seed(InChunkCoord(0, 0));
    first.border_edges.push((BorderEdgeIndex(0), FULL));
    let mut second = ChunkComponents::<4>::new_component_seed(InChunkCoord(1, 1));
    second.border_edges.push((BorderEdgeIndex(1), FULL));
    chunk.push_component(first);
    chunk.push_component(second);

    assert_eq!(chunk.border_edge_info(BorderEdgeIndex(0)), (ComponentIndex(0), FULL));
    assert_eq!(chunk.border_edge_info(BorderEdgeIndex(1)), (ComponentIndex(1), FULL));

    // Remove component 0; component 1 (the last) swaps into its slot.
    chunk.swap_last_and_remove(ComponentIndex(0), false);

    assert_eq!(chunk.num_components(), 1);
    assert_eq!(
      chunk.border_edge_info(BorderEdgeIndex(0)),
      (ComponentIndex::INVALID, TileEdgeConnectivity::NONE)
    );
    assert_eq!(chunk.border_edge_info(BorderEdgeIndex(1)), (ComponentIndex(0), FULL));
    assert_eq!(chunk.components[0].tiles, vec![InChunkCoord(1, 1)]);
  }
}
