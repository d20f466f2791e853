// Undirected room-connection edges and the graph builder.
//
// An `Edge` joins two room centers and caches their Euclidean distance. It is
// stored in canonical form (the endpoint with the smaller squared magnitude
// first, ties broken by the `Point3` total order) and compares by endpoint
// pair only, so a `BTreeSet<Edge>` never holds both orientations of one edge.
//
// `build_room_graph()` is the entry point used by the pipeline. It classifies
// the room centers by affine dimension and picks the matching construction:
// the 3D tetrahedralisation for general input, the planar triangulation for
// coplanar centers (every single-layer dungeon), a chain for collinear
// centers, and nothing for a single distinct center. The triangulated cases
// also take the input-only vertex pairs of the dropped super-simplex cells,
// so a hull room never ends up with no candidate edge.
//
// See also: `delaunay.rs` for the triangulations, `mst.rs` which reduces the
// edge set.
//
// **Critical constraint: determinism.** Edge sets are `BTreeSet`s ordered by
// the canonical endpoint pair, so iteration order depends only on the input.

use crate::delaunay::{self, Mesh, Tetrahedron, Triangle, VERTEX_EPSILON_SQ};
use crate::error::{GenError, GenResult};
use crate::types::Point3;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// An undirected connection between two room centers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub a: Point3,
    pub b: Point3,
    pub distance: f64,
}

impl Edge {
    /// Build the canonical edge between `p` and `q`, in either order.
    pub fn new(p: Point3, q: Point3) -> Self {
        let order = p
            .length_squared()
            .total_cmp(&q.length_squared())
            .then_with(|| p.cmp(&q));
        let (a, b) = if order == Ordering::Greater { (q, p) } else { (p, q) };
        Self {
            a,
            b,
            distance: a.distance(b),
        }
    }

    pub fn has_endpoint(&self, p: Point3) -> bool {
        self.a == p || self.b == p
    }

    /// Absolute vertical extent between the endpoints.
    pub fn rise(&self) -> f64 {
        (self.a.y - self.b.y).abs()
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b
    }
}

impl Eq for Edge {}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.a.cmp(&other.a).then_with(|| self.b.cmp(&other.b))
    }
}

/// The six edges of every tetrahedron, deduplicated.
pub fn build_edges(tetrahedra: &[Tetrahedron]) -> BTreeSet<Edge> {
    let mut edges = BTreeSet::new();
    for t in tetrahedra {
        let v = t.vertices();
        for i in 0..4 {
            for j in (i + 1)..4 {
                edges.insert(Edge::new(v[i], v[j]));
            }
        }
    }
    edges
}

/// The three edges of every triangle, deduplicated.
pub fn edges_from_triangles(triangles: &[Triangle]) -> BTreeSet<Edge> {
    triangles
        .iter()
        .flat_map(Triangle::edges)
        .map(|(p, q)| Edge::new(p, q))
        .collect()
}

/// Delaunay edge set over `points`, for point sets of any affine dimension.
pub fn build_room_graph(points: &[Point3]) -> GenResult<BTreeSet<Edge>> {
    if points.is_empty() {
        return Err(GenError::EmptyPointSet);
    }
    let edges = match delaunay::affine_dimension(points) {
        0 => {
            debug!("all {} centers coincide, no edges", points.len());
            BTreeSet::new()
        }
        1 => {
            debug!("centers are collinear, chaining {} points", points.len());
            collinear_chain(points)
        }
        2 => {
            debug!("centers are coplanar, using planar triangulation");
            let mesh = delaunay::planar_mesh(points)?;
            with_boundary_pairs(edges_from_triangles(&mesh.cells), &mesh)
        }
        _ => {
            let mesh = delaunay::tetrahedral_mesh(points)?;
            with_boundary_pairs(build_edges(&mesh.cells), &mesh)
        }
    };
    debug!("graph has {} edges over {} points", edges.len(), points.len());
    Ok(edges)
}

fn with_boundary_pairs<C>(mut edges: BTreeSet<Edge>, mesh: &Mesh<C>) -> BTreeSet<Edge> {
    edges.extend(mesh.boundary_pairs.iter().map(|&(p, q)| Edge::new(p, q)));
    edges
}

/// Consecutive points along the line through a collinear set.
fn collinear_chain(points: &[Point3]) -> BTreeSet<Edge> {
    let origin = points[0];
    let Some(axis) = points
        .iter()
        .map(|&p| p - origin)
        .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
    else {
        return BTreeSet::new();
    };

    let mut ordered: Vec<Point3> = points.to_vec();
    ordered.sort_by(|&p, &q| {
        axis.dot(p - origin)
            .total_cmp(&axis.dot(q - origin))
            .then_with(|| p.cmp(&q))
    });
    ordered.dedup_by(|p, q| p.distance_squared(*q) < VERTEX_EPSILON_SQ);

    ordered
        .windows(2)
        .map(|pair| Edge::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_prng::DelveRng;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Number of connected components among `points` using `edges`.
    fn components(points: &[Point3], edges: &BTreeSet<Edge>) -> usize {
        let mut parent: Vec<usize> = (0..points.len()).collect();
        fn find(parent: &mut [usize], i: usize) -> usize {
            let mut r = i;
            while parent[r] != r {
                r = parent[r];
            }
            r
        }
        for e in edges {
            let i = points.iter().position(|&q| q == e.a).unwrap();
            let j = points.iter().position(|&q| q == e.b).unwrap();
            let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
            parent[ri] = rj;
        }
        (0..points.len())
            .filter(|&i| find(&mut parent, i) == i)
            .count()
    }

    #[test]
    fn edge_is_canonical_in_either_order() {
        let near = p(1.0, 0.0, 0.0);
        let far = p(3.0, 4.0, 0.0);
        let e1 = Edge::new(near, far);
        let e2 = Edge::new(far, near);
        assert_eq!(e1, e2);
        assert_eq!(e1.a, near);
        assert_eq!(e1.b, far);
        assert!((e1.distance - 20f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn equal_magnitude_endpoints_still_canonicalise() {
        let a = p(3.0, 0.0, 4.0);
        let b = p(0.0, 5.0, 0.0);
        assert_eq!(a.length_squared(), b.length_squared());
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_eq!(Edge::new(a, b).a, Edge::new(b, a).a);
    }

    #[test]
    fn edge_set_never_holds_both_orientations() {
        let (a, b) = (p(0.5, 0.5, 0.5), p(4.5, 0.5, 2.5));
        let set: BTreeSet<Edge> = [Edge::new(a, b), Edge::new(b, a)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn shared_face_edges_are_deduplicated() {
        // Two tetrahedra glued on the face (a, b, c): 6 + 6 - 3 = 9 edges.
        let (a, b, c) = (p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(0.0, 4.0, 0.0));
        let t1 = Tetrahedron::new(a, b, c, p(1.0, 1.0, 3.0));
        let t2 = Tetrahedron::new(a, b, c, p(1.0, 1.0, -3.0));
        assert_eq!(build_edges(&[t1, t2]).len(), 9);
        assert_eq!(build_edges(&[t1, t1]).len(), 6);
    }

    #[test]
    fn triangle_edges_are_deduplicated() {
        let (a, b, c, d) = (
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(0.0, 0.0, 4.0),
            p(4.0, 0.0, 4.0),
        );
        let tris = [Triangle::new(a, b, c), Triangle::new(b, c, d)];
        assert_eq!(edges_from_triangles(&tris).len(), 5);
    }

    #[test]
    fn empty_point_set_is_rejected() {
        assert!(matches!(build_room_graph(&[]), Err(GenError::EmptyPointSet)));
    }

    #[test]
    fn single_point_has_no_edges() {
        assert!(build_room_graph(&[p(1.0, 1.0, 1.0)]).unwrap().is_empty());
    }

    #[test]
    fn collinear_points_form_a_chain() {
        let points = [
            p(9.0, 0.5, 0.5),
            p(1.0, 0.5, 0.5),
            p(4.0, 0.5, 0.5),
            p(4.0, 0.5, 0.5),
        ];
        let edges = build_room_graph(&points).unwrap();
        let expected: BTreeSet<Edge> = [
            Edge::new(points[1], points[2]),
            Edge::new(points[2], points[0]),
        ]
        .into_iter()
        .collect();
        assert_eq!(edges, expected);
    }

    /// Distinct room-center-like points: half-integer x/z, optional y levels.
    fn center_cloud(seed: u64, count: usize, extent: i32, levels: i32) -> Vec<Point3> {
        let mut rng = DelveRng::new(seed);
        let mut points: Vec<Point3> = (0..count)
            .map(|_| {
                p(
                    rng.range_i32(0, extent) as f64 + 0.5,
                    rng.range_i32(0, levels) as f64 + 0.5,
                    rng.range_i32(0, extent) as f64 + 1.0,
                )
            })
            .collect();
        points.sort();
        points.dedup();
        points
    }

    #[test]
    fn flat_layout_is_connected() {
        for seed in 0..300 {
            let points = center_cloud(seed, 5, 20, 1);
            if delaunay::affine_dimension(&points) != 2 {
                continue;
            }
            let edges = build_room_graph(&points).unwrap();
            assert_eq!(components(&points, &edges), 1, "seed {seed}: {points:?}");
        }
    }

    #[test]
    fn flat_hull_room_keeps_its_edges() {
        // Room centers whose first point used to lose every planar edge to
        // the super-triangle.
        let points = [
            p(18.5, 0.5, 15.5),
            p(2.0, 0.5, 8.5),
            p(13.0, 0.5, 15.5),
            p(8.0, 0.5, 8.5),
            p(4.0, 0.5, 14.5),
        ];
        let edges = build_room_graph(&points).unwrap();
        assert!(edges.iter().any(|e| e.has_endpoint(points[0])));
        assert_eq!(components(&points, &edges), 1);
    }

    #[test]
    fn volumetric_hull_room_keeps_its_edges() {
        // One of these centers only shares edges inside super-vertex cells.
        let points = [
            p(11.0, 4.0, 26.5),
            p(16.5, 2.5, 25.5),
            p(20.5, 5.0, 11.0),
            p(22.0, 5.0, 3.5),
            p(13.5, 5.5, 6.0),
            p(25.0, 2.0, 21.0),
            p(3.0, 3.0, 29.5),
            p(26.0, 2.0, 16.0),
            p(16.0, 5.5, 20.5),
            p(12.5, 4.0, 30.5),
            p(8.5, 5.5, 3.5),
            p(16.0, 3.5, 22.0),
            p(27.5, 1.0, 5.5),
            p(27.0, 4.0, 22.5),
            p(29.5, 2.5, 8.0),
            p(3.0, 5.5, 27.5),
            p(20.0, 1.0, 15.5),
        ];
        let tetrahedra = delaunay::triangulate(&points).unwrap();
        assert!(components(&points, &build_edges(&tetrahedra)) > 1);
        let edges = build_room_graph(&points).unwrap();
        assert_eq!(components(&points, &edges), 1);
    }

    #[test]
    fn sparse_volumetric_layouts_are_connected() {
        for seed in 0..200 {
            let points = center_cloud(seed, 6, 20, 4);
            if delaunay::affine_dimension(&points) != 3 {
                continue;
            }
            let edges = build_room_graph(&points).unwrap();
            assert_eq!(components(&points, &edges), 1, "seed {seed}: {points:?}");
        }
    }

    #[test]
    fn boundary_pairs_join_input_points_only() {
        let points = center_cloud(7, 12, 16, 5);
        let mesh = delaunay::tetrahedral_mesh(&points).unwrap();
        for &(a, b) in &mesh.boundary_pairs {
            assert!(a < b);
            assert!(points.contains(&a) && points.contains(&b));
        }
        let edges = build_room_graph(&points).unwrap();
        assert!(edges.len() >= build_edges(&mesh.cells).len());
    }

    #[test]
    fn volumetric_layout_is_connected() {
        let mut rng = DelveRng::new(12);
        let points: Vec<Point3> = (0..20)
            .map(|_| p(rng.next_f64() * 30.0, rng.next_f64() * 10.0, rng.next_f64() * 30.0))
            .collect();
        let edges = build_room_graph(&points).unwrap();
        assert_eq!(components(&points, &edges), 1);
    }
}
