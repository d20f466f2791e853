// Minimum spanning tree plus loop edges.
//
// `minimum_spanning_tree()` is Prim's algorithm in its plain O(E·V) form: it
// rescans the full edge list each round for the cheapest edge with exactly one
// closed endpoint. The edge lists here are the Delaunay edges of at most a few
// hundred rooms, so the rescan is cheaper than maintaining a heap. Input that
// is not connected yields a tree over the start vertex's component only.
//
// `sample_loop_edges()` picks the extra, non-tree edges that turn the tree
// into a graph with cycles, using single-pass reservoir sampling (Algorithm R)
// over the non-tree edges in set order.
//
// See also: `graph.rs` for `Edge` and the candidate set, `dungeon.rs` which
// combines both results into the pass's connection list.
//
// **Critical constraint: determinism.** Ties between equal-length edges go to
// the first edge in slice order, and the reservoir consumes RNG draws in
// set order.

use crate::graph::Edge;
use crate::types::Point3;
use delve_prng::DelveRng;
use std::collections::BTreeSet;

/// Prim's MST over `edges`, grown from `start`.
///
/// Returns tree edges in the order they were added.
pub fn minimum_spanning_tree(edges: &[Edge], start: Point3) -> Vec<Edge> {
    let mut open: BTreeSet<Point3> = edges.iter().flat_map(|e| [e.a, e.b]).collect();
    open.remove(&start);
    let mut closed: BTreeSet<Point3> = BTreeSet::from([start]);
    let mut tree = Vec::new();

    while !open.is_empty() {
        let mut best: Option<&Edge> = None;
        for edge in edges {
            if closed.contains(&edge.a) == closed.contains(&edge.b) {
                continue;
            }
            if best.is_none_or(|b| edge.distance < b.distance) {
                best = Some(edge);
            }
        }
        let Some(edge) = best else {
            break;
        };

        for p in [edge.a, edge.b] {
            open.remove(&p);
            closed.insert(p);
        }
        tree.push(*edge);
    }
    tree
}

/// Uniformly sample up to `count` edges of `candidates` that are not in `tree`.
pub fn sample_loop_edges(
    candidates: &BTreeSet<Edge>,
    tree: &[Edge],
    count: usize,
    rng: &mut DelveRng,
) -> Vec<Edge> {
    if count == 0 {
        return Vec::new();
    }
    let in_tree: BTreeSet<&Edge> = tree.iter().collect();

    let mut reservoir: Vec<Edge> = Vec::with_capacity(count);
    let extras = candidates.iter().filter(|e| !in_tree.contains(e));
    for (seen, edge) in extras.enumerate() {
        if seen < count {
            reservoir.push(*edge);
        } else {
            let slot = rng.range_usize(0, seen + 1);
            if slot < count {
                reservoir[slot] = *edge;
            }
        }
    }
    reservoir
}

/// Spanning tree from `start` followed by `extra` sampled loop edges.
pub fn select_connections(
    candidates: &BTreeSet<Edge>,
    start: Point3,
    extra: usize,
    rng: &mut DelveRng,
) -> Vec<Edge> {
    let all: Vec<Edge> = candidates.iter().copied().collect();
    let mut connections = minimum_spanning_tree(&all, start);
    let loops = sample_loop_edges(candidates, &connections, extra, rng);
    connections.extend(loops);
    connections
}
