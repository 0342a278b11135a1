//! Union-find with one-step path halving, specialized to the splitter's
//! per-run component descriptors.

use super::{ChunkRect, ComponentCoords, GlobalComponentIndex};

/// Per-run component descriptor.
///
/// Representatives hold a live `unvisited` counter, `bounds`, and `contents`.
/// When a representative merges into another, those three fields are
/// zeroed and `canonical` is redirected — `origin_chunk` is never cleared,
/// since the frontier's priority ordering needs a stable distance even for
/// components that are no longer representatives.
pub(super) struct ComponentDescriptor {
  pub canonical: GlobalComponentIndex,
  pub origin_chunk: crate::coords::ChunkCoord,
  pub unvisited: u32,
  pub bounds: ChunkRect,
  pub contents: Vec<ComponentCoords>,
}

impl ComponentDescriptor {
  pub(super) fn new_seed(idx: GlobalComponentIndex, coords: ComponentCoords) -> Self {
    Self {
      canonical: idx,
      origin_chunk: coords.chunk,
      unvisited: 1,
      bounds: ChunkRect::from_point(coords.chunk),
      contents: vec![coords],
    }
  }
}

/// Union-find over [`ComponentDescriptor`]s stored in a flat `Vec`, indexed
/// by [`GlobalComponentIndex`].
#[derive(Default)]
pub(super) struct UnionFind {
  pub(super) nodes: Vec<ComponentDescriptor>,
}

impl UnionFind {
  pub(super) fn push_seed(&mut self, coords: ComponentCoords) -> GlobalComponentIndex {
    let idx = GlobalComponentIndex(self.nodes.len() as u32);
    self.nodes.push(ComponentDescriptor::new_seed(idx, coords));
    idx
  }

  /// Resolves `x` to its representative, halving the path to it as it goes.
  pub(super) fn find(&mut self, mut x: GlobalComponentIndex) -> GlobalComponentIndex {
    while self.nodes[x.index()].canonical != x {
      let parent = self.nodes[x.index()].canonical;
      let grandparent = self.nodes[parent.index()].canonical;
      self.nodes[x.index()].canonical = grandparent;
      x = parent;
    }
    x
  }

  /// Merges `loser` into `winner`, folding `loser`'s counter, bounds, and
  /// contents into `winner`. No-op if they're already the same component.
  pub(super) fn merge(&mut self, loser: GlobalComponentIndex, winner: GlobalComponentIndex) {
    if loser == winner {
      return;
    }
    self.nodes[loser.index()].canonical = winner;
    let unvisited = std::mem::take(&mut self.nodes[loser.index()].unvisited);
    let bounds = self.nodes[loser.index()].bounds;
    let contents = std::mem::take(&mut self.nodes[loser.index()].contents);
    self.nodes[winner.index()].unvisited += unvisited;
    self.nodes[winner.index()].bounds = self.nodes[winner.index()].bounds.union(bounds);
    self.nodes[winner.index()].contents.extend(contents);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coords::ChunkCoord;
  use crate::chunk_connectivity::ComponentIndex;

  fn coords(cx: i32, cy: i32) -> ComponentCoords {
    ComponentCoords {
      chunk: ChunkCoord(cx, cy),
      component: ComponentIndex(0),
    }
  }

  #[test]
  fn find_on_fresh_seed_is_self() {
    let mut uf = UnionFind::default();
    let a = uf.push_seed(coords(0, 0));
    assert_eq!(uf.find(a), a);
  }

  #[test]
  fn merge_folds_counters_and_redirects_find() {
    let mut uf = UnionFind::default();
    let a = uf.push_seed(coords(0, 0));
    let b = uf.push_seed(coords(1, 0));
    uf.nodes[a.index()].unvisited = 3;
    uf.nodes[b.index()].unvisited = 2;
    uf.merge(b, a);
    assert_eq!(uf.find(b), a);
    assert_eq!(uf.nodes[a.index()].unvisited, 5);
    assert_eq!(uf.nodes[a.index()].contents.len(), 2);
  }

  #[test]
  fn path_halving_collapses_long_chains() {
    let mut uf = UnionFind::default();
    let roots: Vec<_> = (0..5).map(|i| uf.push_seed(coords(i, 0))).collect();
    for w in roots.windows(2) {
      uf.merge(w[1], w[0]);
    }
    let root = roots[0];
    for &r in &roots {
      assert_eq!(uf.find(r), root);
    }
  }
}
