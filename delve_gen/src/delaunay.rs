// Delaunay triangulation of room centers (Bowyer–Watson).
//
// `triangulate()` builds a 3D tetrahedralisation incrementally. It starts
// from one super-tetrahedron that strictly contains every input point, then
// inserts points one at a time: every tetrahedron whose circumsphere strictly
// contains the new point is "bad", the faces of bad tetrahedra that no other
// bad tetrahedron shares form the cavity boundary, the bad tetrahedra are
// removed, and each boundary face is joined to the new point. When all points
// are in, every tetrahedron touching a super vertex is dropped.
//
// Dropping those cells can also drop the only edges that join a hull point to
// the rest of the cloud: a super vertex sitting close to the box can claim a
// face a real hull edge belongs to. `tetrahedral_mesh()` therefore keeps, next
// to the retained cells, every input-to-input vertex pair of the dropped
// cells. Together with the retained cells those pairs are exactly the
// input-only edges of the full mesh, which is connected over the input points.
//
// Circumspheres come from the 4x4 determinant formulation (MathWorld,
// "Circumsphere"). A tetrahedron whose primary determinant is below
// `DEGENERACY_EPSILON` is flat: it carries an infinite circumcenter and an
// infinite squared radius, and `circumsphere_contains` is always false for it.
// That sentinel is checked in the hot loop instead of threading a `Result`
// through every cell.
//
// A 3D tetrahedralisation of coplanar points keeps nothing once the
// super-vertex cells are removed (every cell made only of input points is
// flat). `affine_dimension()` lets callers detect that case, and
// `planar_mesh()` runs the same algorithm in 2D, in an orthonormal basis of
// the points' plane, with circumcircles instead of circumspheres. Its
// super-triangle sits `delta` past the box on every side. `graph.rs`
// dispatches between the two.
//
// See also: `graph.rs` which flattens the result into edges, `types.rs` for
// `Point3`.
//
// **Critical constraint: determinism.** Points are inserted in input order
// and cells are kept in a `Vec` whose order depends only on that sequence.

use crate::error::{GenError, GenResult};
use crate::types::Point3;
use log::debug;
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Below this magnitude the circumsphere determinant marks a flat cell.
pub const DEGENERACY_EPSILON: f64 = 1e-10;

/// Two vertices closer than this (squared) are treated as the same vertex.
pub const VERTEX_EPSILON_SQ: f64 = 0.01;

/// How far past the point cloud the super-simplex reaches, in multiples of
/// `(largest span + 1)`. Anything above 2 strictly contains the cloud.
const SUPER_SIMPLEX_SCALE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

/// A finished triangulation with its super-simplex cells removed.
#[derive(Clone, Debug)]
pub struct Mesh<C> {
    /// Cells whose vertices are all input points.
    pub cells: Vec<C>,
    /// Input-to-input vertex pairs of the removed cells, smaller point first.
    pub boundary_pairs: BTreeSet<(Point3, Point3)>,
}

/// Record every pair of `vertices` that `is_input` accepts on both ends.
fn collect_input_pairs(
    vertices: &[Point3],
    is_input: impl Fn(usize) -> bool,
    pairs: &mut BTreeSet<(Point3, Point3)>,
) {
    for (i, &p) in vertices.iter().enumerate() {
        if !is_input(i) {
            continue;
        }
        for (j, &q) in vertices.iter().enumerate().skip(i + 1) {
            if is_input(j) {
                pairs.insert(if p <= q { (p, q) } else { (q, p) });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Triangle
// ---------------------------------------------------------------------------

/// Three vertices of a face.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub vertices: [Point3; 3],
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Approximate set equality: every vertex of `self` lies within
    /// `VERTEX_EPSILON_SQ` of some vertex of `other`, in any order.
    pub fn almost_eq(&self, other: &Triangle) -> bool {
        self.vertices.iter().all(|&v| {
            other
                .vertices
                .iter()
                .any(|&w| v.distance_squared(w) < VERTEX_EPSILON_SQ)
        })
    }

    /// The three vertex pairs of this triangle.
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (a, c), (b, c)]
    }
}

// ---------------------------------------------------------------------------
// Tetrahedron
// ---------------------------------------------------------------------------

/// Four vertices plus the cached circumsphere.
#[derive(Clone, Copy, Debug)]
pub struct Tetrahedron {
    vertices: [Point3; 4],
    circumcenter: Point3,
    circumradius_sq: f64,
}

impl Tetrahedron {
    pub fn new(a: Point3, b: Point3, c: Point3, d: Point3) -> Self {
        let vertices = [a, b, c, d];
        let (circumcenter, circumradius_sq) = circumsphere(&vertices);
        Self {
            vertices,
            circumcenter,
            circumradius_sq,
        }
    }

    pub fn vertices(&self) -> &[Point3; 4] {
        &self.vertices
    }

    pub fn circumcenter(&self) -> Point3 {
        self.circumcenter
    }

    pub fn circumradius_sq(&self) -> f64 {
        self.circumradius_sq
    }

    /// True for flat (near-zero volume) tetrahedra.
    pub fn is_degenerate(&self) -> bool {
        self.circumradius_sq.is_infinite()
    }

    /// The four faces, each omitting one vertex.
    pub fn triangles(&self) -> [Triangle; 4] {
        let [a, b, c, d] = self.vertices;
        [
            Triangle::new(a, b, c),
            Triangle::new(a, b, d),
            Triangle::new(a, c, d),
            Triangle::new(b, c, d),
        ]
    }

    /// Strict inside test against the circumsphere. Always false for
    /// degenerate tetrahedra.
    pub fn circumsphere_contains(&self, point: Point3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        point.distance_squared(self.circumcenter) < self.circumradius_sq
    }

    /// Whether `point` is (approximately) one of the four vertices.
    pub fn has_vertex(&self, point: Point3) -> bool {
        self.vertices
            .iter()
            .any(|&v| v.distance_squared(point) < VERTEX_EPSILON_SQ)
    }

    /// Whether `face` is (approximately) one of the four faces.
    pub fn has_face(&self, face: &Triangle) -> bool {
        self.triangles().iter().any(|t| t.almost_eq(face))
    }
}

/// Circumcenter and squared circumradius of four points, or the infinite
/// sentinel when they are (nearly) coplanar.
fn circumsphere(v: &[Point3; 4]) -> (Point3, f64) {
    let ones = [1.0; 4];
    let xs = [v[0].x, v[1].x, v[2].x, v[3].x];
    let ys = [v[0].y, v[1].y, v[2].y, v[3].y];
    let zs = [v[0].z, v[1].z, v[2].z, v[3].z];

    let a = det4([xs, ys, zs, ones]);
    if a.abs() < DEGENERACY_EPSILON {
        let inf = f64::INFINITY;
        return (Point3::new(inf, inf, inf), inf);
    }

    let sq = [
        v[0].length_squared(),
        v[1].length_squared(),
        v[2].length_squared(),
        v[3].length_squared(),
    ];
    let dx = det4([sq, ys, zs, ones]);
    let dy = -det4([sq, xs, zs, ones]);
    let dz = det4([sq, xs, ys, ones]);

    let center = Point3::new(dx / (2.0 * a), dy / (2.0 * a), dz / (2.0 * a));
    // Same value as (dx² + dy² + dz² - 4ac) / 4a², without the cancellation.
    let radius_sq = center.distance_squared(v[0]);
    (center, radius_sq)
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Determinant by cofactor expansion along the first row.
fn det4(m: [[f64; 4]; 4]) -> f64 {
    let mut det = 0.0;
    for col in 0..4 {
        let mut minor = [[0.0; 3]; 3];
        for row in 1..4 {
            let mut k = 0;
            for c in 0..4 {
                if c != col {
                    minor[row - 1][k] = m[row][c];
                    k += 1;
                }
            }
        }
        let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
        det += sign * m[0][col] * det3(minor);
    }
    det
}

// ---------------------------------------------------------------------------
// 3D Bowyer–Watson
// ---------------------------------------------------------------------------

/// Tetrahedralise `points`. Retained tetrahedra only reference input points.
///
/// Points within `VERTEX_EPSILON_SQ` of an earlier point are skipped.
pub fn triangulate(points: &[Point3]) -> GenResult<Vec<Tetrahedron>> {
    Ok(tetrahedral_mesh(points)?.cells)
}

/// `triangulate()` plus the input-only vertex pairs of the dropped
/// super-vertex cells.
pub fn tetrahedral_mesh(points: &[Point3]) -> GenResult<Mesh<Tetrahedron>> {
    if points.is_empty() {
        return Err(GenError::EmptyPointSet);
    }

    let sup = super_tetrahedron(points);
    let mut tetrahedra = vec![Tetrahedron::new(sup[0], sup[1], sup[2], sup[3])];
    let mut inserted: Vec<Point3> = Vec::with_capacity(points.len());

    for &point in points {
        if inserted
            .iter()
            .any(|&q| q.distance_squared(point) < VERTEX_EPSILON_SQ)
        {
            debug!("skipping duplicate triangulation vertex {point}");
            continue;
        }
        inserted.push(point);
        insert_point(&mut tetrahedra, point);
    }

    let is_super = |v: Point3| sup.iter().any(|&s| s.distance_squared(v) < VERTEX_EPSILON_SQ);
    let mut boundary_pairs = BTreeSet::new();
    tetrahedra.retain(|t| {
        let v = t.vertices();
        if !v.iter().any(|&q| is_super(q)) {
            return true;
        }
        collect_input_pairs(v, |i| !is_super(v[i]), &mut boundary_pairs);
        false
    });

    let degenerate = tetrahedra.iter().filter(|t| t.is_degenerate()).count();
    debug!(
        "triangulated {} points into {} tetrahedra ({degenerate} degenerate, {} boundary pairs)",
        inserted.len(),
        tetrahedra.len(),
        boundary_pairs.len()
    );
    Ok(Mesh {
        cells: tetrahedra,
        boundary_pairs,
    })
}

/// One Bowyer–Watson step: carve the cavity around `point` and re-fill it.
fn insert_point(tetrahedra: &mut Vec<Tetrahedron>, point: Point3) {
    let bad: SmallVec<[usize; 32]> = tetrahedra
        .iter()
        .enumerate()
        .filter(|(_, t)| t.circumsphere_contains(point))
        .map(|(i, _)| i)
        .collect();
    if bad.is_empty() {
        return;
    }

    let mut boundary: Vec<Triangle> = Vec::new();
    for &i in &bad {
        for face in tetrahedra[i].triangles() {
            let shared = bad
                .iter()
                .any(|&j| j != i && tetrahedra[j].has_face(&face));
            if !shared {
                boundary.push(face);
            }
        }
    }

    // `bad` is ascending, so membership is a binary search.
    let mut index = 0;
    tetrahedra.retain(|_| {
        let keep = bad.binary_search(&index).is_err();
        index += 1;
        keep
    });

    tetrahedra.extend(boundary.into_iter().map(|face| {
        let [a, b, c] = face.vertices;
        Tetrahedron::new(a, b, c, point)
    }));
}

/// Four vertices of a tetrahedron strictly containing every point.
///
/// One vertex sits at `min - 1`; the other three are pushed out along +x, +y
/// and +z past the far side of the bounding box.
fn super_tetrahedron(points: &[Point3]) -> [Point3; 4] {
    let (min, max) = bounding_box(points);
    let span = (max.x - min.x).max(max.y - min.y).max(max.z - min.z);
    let delta = SUPER_SIMPLEX_SCALE * (span + 1.0);

    let p1 = Point3::new(min.x - 1.0, min.y - 1.0, min.z - 1.0);
    let p2 = Point3::new(max.x + delta, min.y - 1.0, min.z - 1.0);
    let p3 = Point3::new(min.x - 1.0, max.y + delta, min.z - 1.0);
    let p4 = Point3::new(min.x - 1.0, min.y - 1.0, max.z + delta);
    [p1, p2, p3, p4]
}

fn bounding_box(points: &[Point3]) -> (Point3, Point3) {
    let first = points[0];
    points.iter().fold((first, first), |(lo, hi), p| {
        (
            Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    })
}

// ---------------------------------------------------------------------------
// Lower-dimensional inputs
// ---------------------------------------------------------------------------

/// Dimension (0–3) of the smallest affine subspace containing `points`,
/// with a tolerance relative to the cloud's extent. Empty input is 0.
pub fn affine_dimension(points: &[Point3]) -> usize {
    let Some(&origin) = points.first() else {
        return 0;
    };
    let (min, max) = bounding_box(points);
    let eps = 1e-9 * min.distance(max).max(1.0);

    let Some(axis) = points
        .iter()
        .map(|&p| p - origin)
        .find(|d| d.length_squared().sqrt() > eps)
    else {
        return 0;
    };

    let axis_len = axis.length_squared().sqrt();
    let Some(normal) = points
        .iter()
        .map(|&p| axis.cross(p - origin))
        .find(|n| n.length_squared().sqrt() > eps * axis_len)
    else {
        return 1;
    };

    let normal_len = normal.length_squared().sqrt();
    if points
        .iter()
        .any(|&p| normal.dot(p - origin).abs() > eps * normal_len)
    {
        3
    } else {
        2
    }
}

/// A 2D cell of the planar triangulation, by vertex index.
#[derive(Clone, Copy, Debug)]
struct PlanarCell {
    vertices: [usize; 3],
    center: [f64; 2],
    radius_sq: f64,
}

impl PlanarCell {
    fn new(vertices: [usize; 3], coords: &[[f64; 2]]) -> Self {
        let (center, radius_sq) = circumcircle(
            coords[vertices[0]],
            coords[vertices[1]],
            coords[vertices[2]],
        );
        Self {
            vertices,
            center,
            radius_sq,
        }
    }

    fn circumcircle_contains(&self, p: [f64; 2]) -> bool {
        if self.radius_sq.is_infinite() {
            return false;
        }
        let dx = p[0] - self.center[0];
        let dy = p[1] - self.center[1];
        dx * dx + dy * dy < self.radius_sq
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [ordered(a, b), ordered(a, c), ordered(b, c)]
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn circumcircle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> ([f64; 2], f64) {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if d.abs() < DEGENERACY_EPSILON {
        return ([f64::INFINITY; 2], f64::INFINITY);
    }
    let a2 = a[0] * a[0] + a[1] * a[1];
    let b2 = b[0] * b[0] + b[1] * b[1];
    let c2 = c[0] * c[0] + c[1] * c[1];
    let ux = (a2 * (b[1] - c[1]) + b2 * (c[1] - a[1]) + c2 * (a[1] - b[1])) / d;
    let uy = (a2 * (c[0] - b[0]) + b2 * (a[0] - c[0]) + c2 * (b[0] - a[0])) / d;
    let dx = a[0] - ux;
    let dy = a[1] - uy;
    ([ux, uy], dx * dx + dy * dy)
}

/// Triangulate coplanar `points` within their own plane.
///
/// Returns triangles in the original 3D coordinates. Collinear or
/// single-point input yields no triangles.
pub fn triangulate_planar(points: &[Point3]) -> GenResult<Vec<Triangle>> {
    Ok(planar_mesh(points)?.cells)
}

/// `triangulate_planar()` plus the input-only vertex pairs of the dropped
/// super-triangle cells.
pub fn planar_mesh(points: &[Point3]) -> GenResult<Mesh<Triangle>> {
    if points.is_empty() {
        return Err(GenError::EmptyPointSet);
    }
    let Some(coords) = project_to_plane(points) else {
        return Ok(Mesh {
            cells: Vec::new(),
            boundary_pairs: BTreeSet::new(),
        });
    };

    let n = points.len();
    let mut all_coords = coords;
    all_coords.extend(super_triangle(&all_coords));
    let (s0, s1, s2) = (n, n + 1, n + 2);

    let mut cells = vec![PlanarCell::new([s0, s1, s2], &all_coords)];
    let mut inserted: Vec<usize> = Vec::with_capacity(n);

    for i in 0..n {
        let p = all_coords[i];
        let duplicate = inserted.iter().any(|&j| {
            let q = all_coords[j];
            let (dx, dy) = (p[0] - q[0], p[1] - q[1]);
            dx * dx + dy * dy < VERTEX_EPSILON_SQ
        });
        if duplicate {
            continue;
        }
        inserted.push(i);

        let (bad, kept): (Vec<PlanarCell>, Vec<PlanarCell>) =
            cells.into_iter().partition(|c| c.circumcircle_contains(p));
        cells = kept;

        // Cavity boundary: edges used by exactly one bad cell.
        let mut edge_uses: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        for cell in &bad {
            for edge in cell.edges() {
                *edge_uses.entry(edge).or_insert(0) += 1;
            }
        }
        for ((a, b), uses) in edge_uses {
            if uses == 1 {
                cells.push(PlanarCell::new([a, b, i], &all_coords));
            }
        }
    }

    let mut triangles = Vec::with_capacity(cells.len());
    let mut boundary_pairs = BTreeSet::new();
    for cell in cells {
        let [a, b, c] = cell.vertices;
        if cell.vertices.iter().all(|&v| v < n) {
            triangles.push(Triangle::new(points[a], points[b], points[c]));
            continue;
        }
        let real: SmallVec<[Point3; 3]> = cell
            .vertices
            .iter()
            .filter(|&&v| v < n)
            .map(|&v| points[v])
            .collect();
        collect_input_pairs(&real, |_| true, &mut boundary_pairs);
    }
    Ok(Mesh {
        cells: triangles,
        boundary_pairs,
    })
}

/// Express every point in an orthonormal basis of the plane through the
/// cloud. `None` if the points do not span a plane.
fn project_to_plane(points: &[Point3]) -> Option<Vec<[f64; 2]>> {
    let origin = points[0];
    let (min, max) = bounding_box(points);
    let eps = 1e-9 * min.distance(max).max(1.0);

    let u = points
        .iter()
        .map(|&p| p - origin)
        .find(|d| d.length_squared().sqrt() > eps)?;
    let u = u.scale(1.0 / u.length_squared().sqrt());
    let normal = points
        .iter()
        .map(|&p| u.cross(p - origin))
        .find(|n| n.length_squared().sqrt() > eps)?;
    let w = normal.cross(u);
    let w = w.scale(1.0 / w.length_squared().sqrt());

    Some(
        points
            .iter()
            .map(|&p| {
                let d = p - origin;
                [d.dot(u), d.dot(w)]
            })
            .collect(),
    )
}

/// Three 2D vertices of a triangle strictly containing `coords`, each at
/// least `delta` from the bounding box.
fn super_triangle(coords: &[[f64; 2]]) -> [[f64; 2]; 3] {
    let (mut lo, mut hi) = (coords[0], coords[0]);
    for c in coords {
        lo = [lo[0].min(c[0]), lo[1].min(c[1])];
        hi = [hi[0].max(c[0]), hi[1].max(c[1])];
    }
    let span = (hi[0] - lo[0]).max(hi[1] - lo[1]);
    let delta = SUPER_SIMPLEX_SCALE * (span + 1.0);
    // Legs of at least span + 3·delta; (hi, hi) sits delta - span inside the
    // hypotenuse, measured along x + y.
    [
        [lo[0] - delta, lo[1] - delta],
        [hi[0] + 2.0 * delta, lo[1] - delta],
        [lo[0] - delta, hi[1] + 2.0 * delta],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_prng::DelveRng;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn random_cloud(seed: u64, count: usize, extent: f64) -> Vec<Point3> {
        let mut rng = DelveRng::new(seed);
        (0..count)
            .map(|_| {
                p(
                    rng.next_f64() * extent,
                    rng.next_f64() * extent,
                    rng.next_f64() * extent,
                )
            })
            .collect()
    }

    #[test]
    fn circumsphere_of_known_tetrahedron() {
        let t = Tetrahedron::new(
            p(1.0, 0.0, 0.0),
            p(-1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        );
        assert!(!t.is_degenerate());
        assert!(t.circumcenter().distance(p(0.0, 0.0, 0.0)) < 1e-12);
        assert!((t.circumradius_sq() - 1.0).abs() < 1e-12);
        assert!(t.circumsphere_contains(p(0.2, 0.2, 0.2)));
        assert!(!t.circumsphere_contains(p(2.0, 0.0, 0.0)));
        // On the sphere is not strictly inside.
        assert!(!t.circumsphere_contains(p(0.0, -1.0, 0.0)));
    }

    #[test]
    fn circumsphere_is_equidistant_from_vertices() {
        let t = Tetrahedron::new(
            p(0.5, 0.5, 0.5),
            p(7.5, 1.5, 2.0),
            p(3.0, 6.5, 0.5),
            p(2.5, 2.0, 9.0),
        );
        for &v in t.vertices() {
            let d = v.distance_squared(t.circumcenter());
            assert!((d - t.circumradius_sq()).abs() < 1e-9 * t.circumradius_sq());
        }
    }

    #[test]
    fn coplanar_tetrahedron_is_degenerate() {
        let t = Tetrahedron::new(
            p(0.0, 0.5, 0.0),
            p(4.0, 0.5, 0.0),
            p(0.0, 0.5, 4.0),
            p(4.0, 0.5, 4.0),
        );
        assert!(t.is_degenerate());
        assert!(t.circumcenter().x.is_infinite());
        assert_eq!(t.circumradius_sq(), f64::INFINITY);
        // Never claims a point, even one right in the middle.
        assert!(!t.circumsphere_contains(p(2.0, 0.5, 2.0)));
    }

    #[test]
    fn triangle_equality_ignores_vertex_order() {
        let a = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        let b = Triangle::new(p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let nudged = Triangle::new(p(0.01, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        let other = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 1.0));
        assert!(a.almost_eq(&b));
        assert!(b.almost_eq(&a));
        assert!(a.almost_eq(&nudged));
        assert!(!a.almost_eq(&other));
    }

    #[test]
    fn tetrahedron_exposes_four_faces() {
        let t = Tetrahedron::new(
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        );
        let faces = t.triangles();
        assert_eq!(faces.len(), 4);
        for face in &faces {
            assert!(t.has_face(face));
        }
        let foreign = Triangle::new(p(5.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        assert!(!t.has_face(&foreign));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(triangulate(&[]), Err(GenError::EmptyPointSet)));
        assert!(matches!(
            triangulate_planar(&[]),
            Err(GenError::EmptyPointSet)
        ));
    }

    #[test]
    fn four_points_make_one_tetrahedron() {
        let points = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        let tets = triangulate(&points).unwrap();
        assert_eq!(tets.len(), 1);
        for point in points {
            assert!(tets[0].has_vertex(point));
        }
    }

    #[test]
    fn too_few_points_retain_nothing() {
        assert!(triangulate(&[p(1.0, 1.0, 1.0)]).unwrap().is_empty());
        assert!(
            triangulate(&[p(1.0, 1.0, 1.0), p(4.0, 2.0, 1.0), p(2.0, 5.0, 3.0)])
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn retained_cells_only_use_input_points() {
        let points = random_cloud(5, 25, 20.0);
        let tets = triangulate(&points).unwrap();
        assert!(!tets.is_empty());
        for t in &tets {
            for v in t.vertices() {
                assert!(points.contains(v), "foreign vertex {v}");
            }
        }
    }

    #[test]
    fn random_cloud_satisfies_empty_circumsphere() {
        for seed in 0..5 {
            let points = random_cloud(seed, 30, 20.0);
            let tets = triangulate(&points).unwrap();
            assert!(!tets.is_empty());
            for t in tets.iter().filter(|t| !t.is_degenerate()) {
                let r2 = t.circumradius_sq();
                for &q in &points {
                    if t.has_vertex(q) {
                        continue;
                    }
                    let d2 = q.distance_squared(t.circumcenter());
                    assert!(
                        d2 >= r2 - 1e-7 * r2.max(1.0),
                        "seed {seed}: {q} inside circumsphere ({d2} < {r2})"
                    );
                }
            }
        }
    }

    #[test]
    fn duplicate_points_are_ignored() {
        let mut points = random_cloud(8, 12, 10.0);
        let base = triangulate(&points).unwrap();
        points.push(points[3]);
        let with_dup = triangulate(&points).unwrap();
        assert_eq!(base.len(), with_dup.len());
    }

    #[test]
    fn triangulation_is_deterministic() {
        let points = random_cloud(21, 20, 15.0);
        let a = triangulate(&points).unwrap();
        let b = triangulate(&points).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.vertices(), y.vertices());
        }
    }

    #[test]
    fn super_tetrahedron_contains_far_corner() {
        // The corner opposite `min` is the hardest point to enclose.
        let points = [p(0.0, 0.0, 0.0), p(10.0, 10.0, 10.0)];
        let sup = super_tetrahedron(&points);
        let t = Tetrahedron::new(sup[0], sup[1], sup[2], sup[3]);
        for q in points {
            assert!(t.circumsphere_contains(q));
        }
        // Barycentric check: the corner is strictly on the inner side of the
        // face opposite sup[0].
        let origin = sup[0];
        let extent = sup[1].x - origin.x;
        let corner = points[1] - origin;
        assert!((corner.x + corner.y + corner.z) / extent < 1.0);
    }

    #[test]
    fn super_triangle_stands_off_on_every_side() {
        let coords = [[0.0, 0.0], [20.0, 4.0], [3.0, 19.0]];
        let sup = super_triangle(&coords);
        let delta = SUPER_SIMPLEX_SCALE * 21.0;
        for v in sup {
            let outside_x = v[0] <= -delta || v[0] >= 20.0 + delta;
            let outside_y = v[1] <= -delta || v[1] >= 19.0 + delta;
            assert!(outside_x || outside_y, "{v:?}");
        }
        let (center, r2) = circumcircle(sup[0], sup[1], sup[2]);
        for c in coords.iter().chain([&[20.0, 19.0]]) {
            let d2 = (c[0] - center[0]).powi(2) + (c[1] - center[1]).powi(2);
            assert!(d2 < r2);
        }
        // Far corner on the inner side of the hypotenuse.
        let legs = sup[1][0] - sup[0][0];
        assert!((20.0 - sup[0][0]) + (19.0 - sup[0][1]) < legs);
    }

    #[test]
    fn mesh_cells_match_triangulate() {
        let points = random_cloud(3, 15, 12.0);
        let mesh = tetrahedral_mesh(&points).unwrap();
        let tets = triangulate(&points).unwrap();
        assert_eq!(mesh.cells.len(), tets.len());
        assert!(!mesh.boundary_pairs.is_empty());
        for &(a, b) in &mesh.boundary_pairs {
            assert!(a < b);
            assert!(points.contains(&a) && points.contains(&b));
        }
    }

    #[test]
    fn planar_boundary_pairs_cover_the_hull() {
        // Square corners: every hull side is an input pair somewhere in the mesh.
        let points = [
            p(0.0, 0.5, 0.0),
            p(10.0, 0.5, 0.0),
            p(0.0, 0.5, 10.0),
            p(10.0, 0.5, 10.0),
            p(4.0, 0.5, 6.0),
        ];
        let mesh = planar_mesh(&points).unwrap();
        let mut pairs: BTreeSet<(Point3, Point3)> = mesh.boundary_pairs.clone();
        for tri in &mesh.cells {
            for (a, b) in tri.edges() {
                pairs.insert(if a <= b { (a, b) } else { (b, a) });
            }
        }
        for (i, j) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            let (a, b) = (points[i], points[j]);
            let key = if a <= b { (a, b) } else { (b, a) };
            assert!(pairs.contains(&key), "missing hull side {a} - {b}");
        }
    }

    #[test]
    fn affine_dimension_classifies_clouds() {
        assert_eq!(affine_dimension(&[]), 0);
        assert_eq!(affine_dimension(&[p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0)]), 0);
        assert_eq!(
            affine_dimension(&[p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(3.0, 3.0, 3.0)]),
            1
        );
        assert_eq!(
            affine_dimension(&[
                p(0.0, 0.5, 0.0),
                p(5.0, 0.5, 1.0),
                p(2.0, 0.5, 7.0),
                p(9.0, 0.5, 9.0),
            ]),
            2
        );
        // A tilted plane is still a plane.
        assert_eq!(
            affine_dimension(&[
                p(0.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 1.0),
                p(1.0, 2.0, 1.0),
            ]),
            2
        );
        assert_eq!(affine_dimension(&random_cloud(1, 6, 5.0)), 3);
    }

    #[test]
    fn planar_square_makes_two_triangles() {
        let points = [
            p(0.0, 0.5, 0.0),
            p(4.0, 0.5, 0.0),
            p(0.0, 0.5, 3.0),
            p(4.5, 0.5, 3.5),
        ];
        let tris = triangulate_planar(&points).unwrap();
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn planar_collinear_input_yields_nothing() {
        let points = [p(0.0, 0.5, 0.0), p(2.0, 0.5, 0.0), p(7.0, 0.5, 0.0)];
        assert!(triangulate_planar(&points).unwrap().is_empty());
    }

    #[test]
    fn planar_cloud_satisfies_empty_circumcircle() {
        let mut rng = DelveRng::new(17);
        let points: Vec<Point3> = (0..30)
            .map(|_| p(rng.next_f64() * 20.0, 0.5, rng.next_f64() * 20.0))
            .collect();
        let tris = triangulate_planar(&points).unwrap();
        assert!(!tris.is_empty());
        for tri in &tris {
            let [a, b, c] = tri.vertices;
            let (center, r2) = circumcircle([a.x, a.z], [b.x, b.z], [c.x, c.z]);
            if r2.is_infinite() {
                continue;
            }
            for q in &points {
                if tri.vertices.contains(q) {
                    continue;
                }
                let d2 = (q.x - center[0]).powi(2) + (q.z - center[1]).powi(2);
                assert!(d2 >= r2 - 1e-7 * r2.max(1.0), "{q} inside circumcircle");
            }
        }
    }
}
