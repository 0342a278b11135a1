//! grid_topology - the core data structures behind a tile-grid connectivity
//! engine.
//!
//! Given a two-dimensional world partitioned into fixed-size square chunks
//! of cells with directional adjacency information, this crate:
//!
//! - computes connected components within each chunk
//!   ([`chunk_connectivity`]),
//! - stitches per-chunk components into cross-chunk components
//!   ([`chunk_connectivity::compute_connectivity_between_chunks`]),
//! - detects when an aggregate grid has fractured into multiple disjoint
//!   pieces and enumerates the pieces that should be split off
//!   ([`grid_splitter`]),
//! - and maintains a dynamic bounding-volume hierarchy over axis-aligned
//!   rectangles for broad-phase spatial queries ([`aabb_tree`]).
//!
//! This is deliberately the *core* only: the entity/world store that owns
//! grid objects, the policy glue that calls the splitter and moves cells
//! between grids, I/O, rendering, and physics are all out of scope and live
//! in the host application. Nothing here creates, destroys, or identifies
//! grid entities — it only computes structural information and reports
//! deltas for the host to act on.
//!
//! Every structure here is single-threaded, instance-scoped, and allocates
//! up front into caller-owned scratch buffers so repeated calls amortize
//! allocation across many invocations.

pub mod aabb_tree;
pub mod chunk_connectivity;
pub mod coords;
pub mod error;
pub mod grid_splitter;
pub mod sparse_index_set;

pub use aabb_tree::{Aabb, AabbTree, AabbTreeConfig, NodeIndex};
pub use chunk_connectivity::{
  compute_connected_components, compute_connected_components_streaming,
  compute_connectivity_between_chunks, ChunkComponents, Component, ComponentIndex,
  FloodFillScratch, PairingScratch, TileRect,
};
pub use coords::{
  BorderEdgeIndex, ChunkCoord, Direction, InChunkCoord, TileEdgeConnectivity, ALL_DIRECTIONS,
};
pub use error::CapacityExhausted;
pub use grid_splitter::{
  ChunkRect, ComponentCoords, GetChunk, GlobalComponentIndex, GridSplitter, StepOutcome,
};
pub use sparse_index_set::SparseIndexSet;
