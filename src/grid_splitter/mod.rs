//! Walks the cross-chunk component graph from a set of seed components to
//! decide which belong to the same maximal component, and emits the
//! strictly-smaller fragments that should be detached from the grid.

mod frontier;
mod union_find;

use std::collections::{BinaryHeap, HashMap};

use frontier::FrontierEntry;
use union_find::UnionFind;

use crate::chunk_connectivity::{ChunkComponents, ComponentIndex};
use crate::coords::{ChunkCoord, ALL_DIRECTIONS};
use crate::sparse_index_set::SparseIndexSet;

/// `(chunk, in_chunk_component)` — identifies one per-chunk component inside
/// a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentCoords {
  pub chunk: ChunkCoord,
  pub component: ComponentIndex,
}

/// Index into the splitter's per-run component list; carries union-find
/// semantics (see [`union_find::UnionFind`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalComponentIndex(pub u32);

impl GlobalComponentIndex {
  #[inline]
  fn index(self) -> usize {
    self.0 as usize
  }
}

/// A chunk-coordinate bounding rectangle accumulated over all per-chunk
/// components absorbed into one global component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRect {
  pub min: ChunkCoord,
  pub max_inclusive: ChunkCoord,
}

impl ChunkRect {
  #[inline]
  pub fn from_point(p: ChunkCoord) -> Self {
    Self {
      min: p,
      max_inclusive: p,
    }
  }

  #[inline]
  pub fn union(self, other: Self) -> Self {
    Self {
      min: ChunkCoord(self.min.0.min(other.min.0), self.min.1.min(other.min.1)),
      max_inclusive: ChunkCoord(
        self.max_inclusive.0.max(other.max_inclusive.0),
        self.max_inclusive.1.max(other.max_inclusive.1),
      ),
    }
  }

  #[inline]
  pub fn extend_to_include(&mut self, p: ChunkCoord) {
    *self = self.union(Self::from_point(p));
  }
}

/// Whether a call to [`GridSplitter::step`] made progress or found the walk
/// already complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
  Progressed,
  Done,
}

/// Anything that can answer "what's loaded at this chunk" — a closure
/// wrapping a lookup, or a collection queried directly. Blanket-implemented
/// so callers can hand [`GridSplitter::step`] either a `HashMap::get`
/// closure or any other `Fn(ChunkCoord) -> Option<&ChunkComponents<N>>`
/// without naming the closure's type. [`Self::step`] takes this by
/// reference (`&impl GetChunk<N>`), so a single lookup can be shared across
/// many steps without a second blanket impl for `&T` — method calls on a
/// `&impl GetChunk<N>` parameter auto-deref to the underlying `get_chunk`.
pub trait GetChunk<const N: usize> {
  fn get_chunk(&self, coord: ChunkCoord) -> Option<&ChunkComponents<N>>;
}

impl<const N: usize, F> GetChunk<N> for F
where
  F: Fn(ChunkCoord) -> Option<&ChunkComponents<N>>,
{
  fn get_chunk(&self, coord: ChunkCoord) -> Option<&ChunkComponents<N>> {
    self(coord)
  }
}

/// Solves: given a set of per-chunk components that may have become
/// disconnected from one another, partition them into maximal cross-chunk
/// components by walking the neighbor-graph, and identify which resulting
/// components are fragments that should be separated from the main grid.
pub struct GridSplitter {
  uf: UnionFind,
  frontier: BinaryHeap<FrontierEntry>,
  known: HashMap<ComponentCoords, GlobalComponentIndex>,
  live: SparseIndexSet,
  emitted: Vec<GlobalComponentIndex>,
}

impl Default for GridSplitter {
  fn default() -> Self {
    Self::new()
  }
}

impl GridSplitter {
  pub fn new() -> Self {
    Self {
      uf: UnionFind::default(),
      frontier: BinaryHeap::new(),
      known: HashMap::new(),
      live: SparseIndexSet::new(0),
      emitted: Vec::new(),
    }
  }

  /// Clears all state but preserves container capacity.
  pub fn reset(&mut self) {
    self.uf.nodes.clear();
    self.frontier.clear();
    self.known.clear();
    self.live.clear();
    self.emitted.clear();
  }

  /// Pre-sizes all containers for a run expected to touch `num_components`
  /// distinct per-chunk components, discovering up to `num_nodes` frontier
  /// entries.
  pub fn reserve(&mut self, num_components: usize, num_nodes: usize) {
    self.uf.nodes.reserve(num_components);
    self.known.reserve(num_components);
    self.frontier.reserve(num_nodes);
    self.live.reserve(num_components);
  }

  /// Registers one [`ComponentCoords`] as both a new singleton component and
  /// a frontier entry. Must not be called twice with the same coords.
  pub fn add_initial_component<const N: usize>(
    &mut self,
    coords: ComponentCoords,
    get_chunk: impl GetChunk<N>,
  ) {
    debug_assert!(
      !self.known.contains_key(&coords),
      "add_initial_component called twice with the same coords"
    );
    let idx = self.uf.push_seed(coords);
    self.known.insert(coords, idx);
    if self.live.capacity() <= idx.index() {
      self.live.reserve(idx.index() + 1);
    }
    self.live.insert(idx.index());
    let num_connections = get_chunk
      .get_chunk(coords.chunk)
      .map(|cc| cc.get_num_connections(coords.component))
      .unwrap_or(0);
    self.frontier.push(FrontierEntry {
      coords,
      seed: idx,
      distance_sq: 0,
      num_connections,
    });
    log::trace!("grid_splitter: seeded {:?} as {:?}", coords, idx);
  }

  /// `true` once the live set has at most one element (only the main
  /// component remains) or the frontier is exhausted.
  pub fn is_done(&self) -> bool {
    self.live.len() <= 1 || self.frontier.is_empty()
  }

  /// Advances the walk by one frontier entry. Returns [`StepOutcome::Done`]
  /// without doing any work if [`Self::is_done`] already holds.
  pub fn step<const N: usize>(&mut self, get_chunk: &impl GetChunk<N>) -> StepOutcome {
    if self.is_done() {
      return StepOutcome::Done;
    }
    let Some(entry) = self.frontier.pop() else {
      return StepOutcome::Done;
    };
    let c = self.uf.find(entry.seed);

    if let Some(cc) = get_chunk.get_chunk(entry.coords.chunk) {
      for dir in ALL_DIRECTIONS {
        for &neighbor_component in cc.neighbors(dir, entry.coords.component) {
          let n = ComponentCoords {
            chunk: entry.coords.chunk.offset(dir),
            component: neighbor_component,
          };
          match self.known.get(&n).copied() {
            None => {
              self.known.insert(n, entry.seed);
              let origin = self.uf.nodes[entry.seed.index()].origin_chunk;
              let distance_sq = n.chunk.distance_squared(origin);
              let num_connections = get_chunk
                .get_chunk(n.chunk)
                .map(|c2| c2.get_num_connections(n.component))
                .unwrap_or(0);
              self.uf.nodes[c.index()].unvisited += 1;
              self.uf.nodes[c.index()].contents.push(n);
              self.uf.nodes[c.index()].bounds.extend_to_include(n.chunk);
              self.frontier.push(FrontierEntry {
                coords: n,
                seed: entry.seed,
                distance_sq,
                num_connections,
              });
            }
            Some(seed_of_n) => {
              let c_prime = self.uf.find(seed_of_n);
              if c_prime != c {
                self.uf.merge(c_prime, c);
                self.live.erase_unordered(c_prime.index());
              }
            }
          }
        }
      }
    }

    self.uf.nodes[c.index()].unvisited -= 1;
    if self.uf.nodes[c.index()].unvisited == 0 {
      self.live.erase_unordered(c.index());
      self.emitted.push(c);
      log::trace!("grid_splitter: component {:?} complete", c);
    }
    StepOutcome::Progressed
  }

  /// Steps until [`Self::is_done`].
  pub fn run<const N: usize>(&mut self, get_chunk: impl GetChunk<N>) {
    while !self.is_done() {
      self.step(&get_chunk);
    }
  }

  /// Number of fragments ready to hand back to the caller.
  pub fn num_to_emit(&self) -> usize {
    self.emitted.len()
  }

  /// Returns the chunk-coordinate bounds and contents of fragment `i`.
  pub fn get(&self, i: usize) -> (ChunkRect, &[ComponentCoords]) {
    let idx = self.emitted[i];
    let node = &self.uf.nodes[idx.index()];
    (node.bounds, &node.contents)
  }
}
