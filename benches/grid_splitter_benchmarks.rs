//! Benchmarks for the grid splitter's frontier walk: seeding a chain of
//! chunks and measuring the cost of detecting (or ruling out) a fracture
//! as the chain length grows.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_topology::{
  compute_connected_components, compute_connectivity_between_chunks, ChunkComponents, ChunkCoord,
  ComponentCoords, ComponentIndex, Direction, FloodFillScratch, GridSplitter, PairingScratch,
  TileEdgeConnectivity,
};

const FULL: TileEdgeConnectivity = TileEdgeConnectivity(0b1111);

fn full_chunk<const N: usize>() -> ChunkComponents<N> {
  let mut scratch = FloodFillScratch::<N>::new();
  compute_connected_components::<N>(&mut scratch, |_| true, |_, _| FULL)
}

fn coords(cx: i32) -> ComponentCoords {
  ComponentCoords {
    chunk: ChunkCoord(cx, 0),
    component: ComponentIndex(0),
  }
}

/// An unbroken chain of `n` chunks: seeding both ends never finds a
/// fracture, forcing the frontier to walk the entire chain before giving
/// up. This is the splitter's worst case for a single seed pair.
fn chain_of_len(n: i32) -> HashMap<ChunkCoord, ChunkComponents<4>> {
  let mut chunks: Vec<ChunkComponents<4>> = (0..n).map(|_| full_chunk::<4>()).collect();
  let mut scratch = PairingScratch::new();
  for i in 0..(n - 1) as usize {
    let (left, right) = chunks.split_at_mut(i + 1);
    compute_connectivity_between_chunks(
      Some(&mut left[i]),
      Some(&mut right[0]),
      Direction::PlusX,
      &mut scratch,
    );
  }
  chunks
    .into_iter()
    .enumerate()
    .map(|(i, cc)| (ChunkCoord(i as i32, 0), cc))
    .collect()
}

fn bench_unbroken_chain(c: &mut Criterion) {
  let mut group = c.benchmark_group("grid_splitter/unbroken_chain");
  for &n in &[16i32, 64, 256] {
    let chunks = chain_of_len(n);
    let get_chunk = |coord: ChunkCoord| chunks.get(&coord);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_with_input(BenchmarkId::new("chain_len", n), &n, |b, &n| {
      b.iter(|| {
        let mut splitter = GridSplitter::new();
        splitter.add_initial_component(coords(0), get_chunk);
        splitter.add_initial_component(coords(n - 1), get_chunk);
        splitter.run(get_chunk);
        black_box(splitter.num_to_emit())
      });
    });
  }
  group.finish();
}

/// A chain broken into `k` disconnected segments, each seeded once: the
/// splitter emits `k - 1` fragments (every segment but the largest), which
/// forces it to actually do the bookkeeping work `num_to_emit` reports on
/// rather than just walking to exhaustion.
fn bench_fractured_chain(c: &mut Criterion) {
  let mut group = c.benchmark_group("grid_splitter/fractured_chain");
  for &segments in &[4i32, 16, 64] {
    let segment_len = 4;
    let chunks: HashMap<ChunkCoord, ChunkComponents<4>> = (0..segments)
      .flat_map(|s| {
        let base = s * (segment_len + 1);
        let mut seg = chain_of_len(segment_len);
        seg.drain().map(move |(coord, cc)| (ChunkCoord(coord.0 + base, 0), cc)).collect::<Vec<_>>()
      })
      .collect();
    let get_chunk = |coord: ChunkCoord| chunks.get(&coord);
    group.bench_with_input(BenchmarkId::new("segments", segments), &segments, |b, &segments| {
      b.iter(|| {
        let mut splitter = GridSplitter::new();
        for s in 0..segments {
          let base = s * (segment_len + 1);
          splitter.add_initial_component(coords(base), get_chunk);
        }
        splitter.run(get_chunk);
        black_box(splitter.num_to_emit())
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_unbroken_chain, bench_fractured_chain);
criterion_main!(benches);
