//! Per-chunk flood fill into connected components, plus the cross-chunk
//! neighbor pairing that stitches adjacent chunks' components together.
//!
//! Parameterized by two caller predicates: `tile_exists` and
//! `tile_connectivity`. Both are accepted as generic `Fn` parameters (not
//! trait objects) so hot call sites monomorphize instead of paying for a
//! vtable indirection on every tile.

mod component;
mod flood_fill;
mod pairing;

pub use component::{ChunkComponents, Component, ComponentIndex, TileRect};
pub use flood_fill::{compute_connected_components, compute_connected_components_streaming, FloodFillScratch};
pub use pairing::{compute_connectivity_between_chunks, PairingScratch};
