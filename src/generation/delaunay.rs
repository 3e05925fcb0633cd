//! 2D Delaunay triangulation (incremental Bowyer–Watson)
//!
//! The triangulation of the cluster centers gives a sparse, planar adjacency
//! graph: two clusters are considered neighbors when their centers share a
//! Delaunay edge.
//!
//! # Algorithm
//!
//! 1. Enclose every input point in a large super-triangle
//! 2. Insert points one at a time: every triangle whose circumcircle strictly
//!    contains the point is removed, and the hole's boundary edges are fanned
//!    to the new point
//! 3. Drop every triangle touching a super-triangle vertex
//! 4. Close the convex hull: a finite super-triangle can claim triangles on
//!    nearly collinear hull stretches, so every boundary edge with an input
//!    point beyond it is re-wrapped with the empty-circumcircle triangle
//! 5. Collect the unique undirected edges of the remaining triangles
//!
//! Points are inserted in lexicographic `(x, y)` order so the output does not
//! depend on the order the caller supplied them in, even for cocircular input
//! such as the corners of a square.

use approx::relative_eq;
use glam::DVec2;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Tolerance for vertex identity (absolute near zero, relative elsewhere)
const VERTEX_EPSILON: f64 = 1e-9;

/// Relative tolerance of the strict in-circumcircle test
const CIRCLE_EPSILON: f64 = 1e-10;

/// Super-triangle size as a multiple of the padded bounding box extent
const SUPER_TRIANGLE_SCALE: f64 = 20.0;

/// A triangulation vertex: an input position and its index in the input
#[derive(Debug, Clone, Copy)]
pub struct DelaunayVertex {
    /// Index into the slice passed to [`triangulate`]
    pub index: usize,
    /// Position in the plane
    pub position: DVec2,
}

impl DelaunayVertex {
    /// Create a vertex
    pub fn new(index: usize, position: DVec2) -> Self {
        Self { index, position }
    }

    /// Approximate positional equality, ignoring the index
    pub fn approx_eq(&self, other: &DelaunayVertex) -> bool {
        positions_approx_eq(self.position, other.position)
    }
}

impl PartialEq for DelaunayVertex {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

fn positions_approx_eq(a: DVec2, b: DVec2) -> bool {
    relative_eq!(a.x, b.x, epsilon = VERTEX_EPSILON, max_relative = VERTEX_EPSILON)
        && relative_eq!(a.y, b.y, epsilon = VERTEX_EPSILON, max_relative = VERTEX_EPSILON)
}

/// Undirected edge between two vertex indices
///
/// The endpoints are stored sorted, so `(a, b)` and `(b, a)` compare and hash
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelaunayEdge {
    a: usize,
    b: usize,
}

impl DelaunayEdge {
    /// Create an edge; endpoint order does not matter
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }

    /// Lower endpoint index
    #[inline]
    pub fn a(&self) -> usize {
        self.a
    }

    /// Higher endpoint index
    #[inline]
    pub fn b(&self) -> usize {
        self.b
    }

    /// Whether the edge touches `index`
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }

    /// The endpoint opposite `index`, if the edge touches it
    pub fn other(&self, index: usize) -> Option<usize> {
        if self.a == index {
            Some(self.b)
        } else if self.b == index {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Triangle of three vertex indices with its cached circumcircle
#[derive(Debug, Clone, Copy)]
pub struct DelaunayTriangle {
    /// Vertex indices in insertion order
    pub vertices: [usize; 3],
    circumcenter: DVec2,
    radius_sq: f64,
    bad: bool,
}

impl DelaunayTriangle {
    fn new(vertices: [usize; 3], points: &[DVec2]) -> Self {
        let (circumcenter, radius_sq) = circumcircle(
            points[vertices[0]],
            points[vertices[1]],
            points[vertices[2]],
        );
        Self {
            vertices,
            circumcenter,
            radius_sq,
            bad: false,
        }
    }

    /// Center of the circle through all three vertices
    #[inline]
    pub fn circumcenter(&self) -> DVec2 {
        self.circumcenter
    }

    /// Squared circumcircle radius (infinite for a degenerate triangle)
    #[inline]
    pub fn circumradius_sq(&self) -> f64 {
        self.radius_sq
    }

    /// Whether `point` lies strictly inside the circumcircle
    pub fn circum_circle_contains(&self, point: DVec2) -> bool {
        let dist_sq = self.circumcenter.distance_squared(point);
        self.radius_sq - dist_sq > CIRCLE_EPSILON * self.radius_sq.max(1.0)
    }

    /// The three edges of the triangle
    pub fn edges(&self) -> [DelaunayEdge; 3] {
        let [a, b, c] = self.vertices;
        [
            DelaunayEdge::new(a, b),
            DelaunayEdge::new(b, c),
            DelaunayEdge::new(c, a),
        ]
    }

    /// Whether the triangle uses vertex `index`
    #[inline]
    pub fn contains_vertex(&self, index: usize) -> bool {
        self.vertices.contains(&index)
    }

    fn sorted_vertices(&self) -> [usize; 3] {
        let mut sorted = self.vertices;
        sorted.sort_unstable();
        sorted
    }
}

impl PartialEq for DelaunayTriangle {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_vertices() == other.sorted_vertices()
    }
}

impl Eq for DelaunayTriangle {}

/// Circumcenter and squared radius from the algebraic formula
///
/// Collinear vertices produce an infinite radius, so the triangle is removed
/// by the next insertion.
fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> (DVec2, f64) {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < f64::EPSILON {
        return (a, f64::INFINITY);
    }

    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let c_sq = c.length_squared();

    let center = DVec2::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );
    (center, center.distance_squared(a))
}

/// Result of a triangulation
///
/// Vertex indices in triangles and edges refer to the input slice.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Input points, in input order
    pub vertices: Vec<DelaunayVertex>,
    /// Triangles that do not touch the super-triangle
    pub triangles: Vec<DelaunayTriangle>,
    /// Unique undirected edges, sorted
    pub edges: Vec<DelaunayEdge>,
}

impl Triangulation {
    /// Whether no triangle was produced
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of unique undirected edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Indices of the vertices sharing an edge with `index`, ascending
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|edge| edge.other(index))
            .collect();
        out.sort_unstable();
        out
    }

    /// Endpoint positions of an edge
    pub fn edge_positions(&self, edge: &DelaunayEdge) -> (DVec2, DVec2) {
        (
            self.vertices[edge.a()].position,
            self.vertices[edge.b()].position,
        )
    }
}

/// Build the super-triangle for a set of points
///
/// Returns the three vertex positions, well outside the bounding box.
fn super_triangle(points: &[DVec2]) -> [DVec2; 3] {
    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );

    let extent = max - min;
    let delta = 2.0 * extent.max_element();
    let delta = if delta > 0.0 { delta } else { 1.0 };
    let mid = (min + max) * 0.5;

    [
        mid + DVec2::new(-SUPER_TRIANGLE_SCALE * delta, -delta),
        mid + DVec2::new(0.0, SUPER_TRIANGLE_SCALE * delta),
        mid + DVec2::new(SUPER_TRIANGLE_SCALE * delta, -delta),
    ]
}

/// Triangulate a set of 2D points
///
/// Fewer than three points produce an empty triangulation; this is logged and
/// is not an error. Near-duplicate points are inserted once.
///
/// # Example
///
/// ```
/// use rust_library_dungeon::generation::triangulate;
/// use glam::DVec2;
///
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let triangulation = triangulate(&square);
/// assert_eq!(triangulation.triangle_count(), 2);
/// assert_eq!(triangulation.edge_count(), 5);
/// ```
pub fn triangulate(points: &[DVec2]) -> Triangulation {
    let vertices: Vec<DelaunayVertex> = points
        .iter()
        .enumerate()
        .map(|(index, &position)| DelaunayVertex::new(index, position))
        .collect();

    if points.len() < 3 {
        warn!(
            points = points.len(),
            "triangulation needs at least 3 points, returning empty result"
        );
        return Triangulation {
            vertices,
            ..Default::default()
        };
    }

    let n = points.len();
    let super_vertices = super_triangle(points);

    // Input points followed by the three super-triangle vertices
    let mut positions: Vec<DVec2> = points.to_vec();
    positions.extend_from_slice(&super_vertices);

    let mut triangles = vec![DelaunayTriangle::new([n, n + 1, n + 2], &positions)];

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
    });

    let mut previous: Option<DVec2> = None;
    let mut skipped = 0usize;
    let mut inserted: Vec<usize> = Vec::with_capacity(n);

    for index in order {
        let point = points[index];
        if previous.is_some_and(|prev| positions_approx_eq(prev, point)) {
            skipped += 1;
            continue;
        }
        previous = Some(point);

        insert_point(&mut triangles, &positions, index);
        inserted.push(index);
    }

    if skipped > 0 {
        debug!(skipped, "skipped near-duplicate triangulation points");
    }

    let is_super = |index: usize| {
        super_vertices
            .iter()
            .any(|&s| positions_approx_eq(positions[index], s))
    };
    triangles.retain(|tri| !tri.vertices.iter().any(|&v| is_super(v)));

    let mut restored = 0usize;
    while let Some(tri) = next_hull_triangle(&triangles, &positions, &inserted) {
        triangles.push(tri);
        restored += 1;
    }
    if restored > 0 {
        debug!(restored, "restored hull triangles dropped with the super-triangle");
    }

    let edges: Vec<DelaunayEdge> = triangles
        .iter()
        .flat_map(|tri| tri.edges())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    debug!(
        points = n,
        triangles = triangles.len(),
        edges = edges.len(),
        "triangulation complete"
    );

    Triangulation {
        vertices,
        triangles,
        edges,
    }
}

/// Insert one point, re-triangulating the cavity it opens
fn insert_point(triangles: &mut Vec<DelaunayTriangle>, positions: &[DVec2], index: usize) {
    let point = positions[index];
    let mut polygon: Vec<DelaunayEdge> = Vec::new();

    for tri in triangles.iter_mut() {
        if tri.circum_circle_contains(point) {
            tri.bad = true;
            polygon.extend(tri.edges());
        }
    }
    triangles.retain(|tri| !tri.bad);

    // An edge shared by two bad triangles is interior to the cavity
    let mut counts: HashMap<DelaunayEdge, usize> = HashMap::with_capacity(polygon.len());
    for edge in &polygon {
        *counts.entry(*edge).or_insert(0) += 1;
    }

    for edge in polygon {
        if counts[&edge] == 1 {
            triangles.push(DelaunayTriangle::new([edge.a(), edge.b(), index], positions));
        }
    }
}

/// Twice the signed area of `abc`; positive when counter-clockwise
#[inline]
fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Whether segment `uv` properly crosses `edge` (shared endpoints never cross)
fn segments_cross(positions: &[DVec2], edge: DelaunayEdge, u: usize, v: usize) -> bool {
    if edge.contains(u) || edge.contains(v) {
        return false;
    }
    let (p, q) = (positions[u], positions[v]);
    let (a, b) = (positions[edge.a()], positions[edge.b()]);
    orient(p, q, a) * orient(p, q, b) < 0.0 && orient(a, b, p) * orient(a, b, q) < 0.0
}

/// Directed boundary edges, each with the triangulated region on its left
fn boundary_edges(triangles: &[DelaunayTriangle], positions: &[DVec2]) -> Vec<(usize, usize)> {
    let mut counts: HashMap<DelaunayEdge, usize> = HashMap::new();
    for tri in triangles {
        for edge in tri.edges() {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }

    let mut boundary = Vec::new();
    for tri in triangles {
        let [a, b, c] = tri.vertices;
        let [a, b, c] = if orient(positions[a], positions[b], positions[c]) < 0.0 {
            [a, c, b]
        } else {
            [a, b, c]
        };
        for (from, to) in [(a, b), (b, c), (c, a)] {
            if counts[&DelaunayEdge::new(from, to)] == 1 {
                boundary.push((from, to));
            }
        }
    }
    boundary.sort_unstable();
    boundary
}

/// Empty-circumcircle triangle on the right of the directed edge `a -> b`
///
/// The apex is an inserted point strictly to the right of the edge whose
/// circumcircle with `a` and `b` holds no other point and whose new edges
/// cross no existing edge.
fn wrap_edge(
    a: usize,
    b: usize,
    triangles: &[DelaunayTriangle],
    edges: &BTreeSet<DelaunayEdge>,
    positions: &[DVec2],
    inserted: &[usize],
) -> Option<DelaunayTriangle> {
    let (pa, pb) = (positions[a], positions[b]);

    for &apex in inserted {
        if apex == a || apex == b || orient(pa, pb, positions[apex]) >= 0.0 {
            continue;
        }

        let candidate = DelaunayTriangle::new([b, a, apex], positions);
        if triangles.contains(&candidate) {
            continue;
        }

        let empty = inserted.iter().all(|&q| {
            q == a || q == b || q == apex || !candidate.circum_circle_contains(positions[q])
        });
        if !empty {
            continue;
        }

        let crosses = edges.iter().any(|&edge| {
            segments_cross(positions, edge, a, apex) || segments_cross(positions, edge, b, apex)
        });
        if !crosses {
            return Some(candidate);
        }
    }
    None
}

/// A missing triangle outside the current boundary, if any remain
///
/// Once the hull is closed no inserted point lies to the right of a boundary
/// edge and this returns `None`. An empty triangulation is seeded from the
/// edge between the leftmost point and its nearest neighbor, which is always a
/// Delaunay edge.
fn next_hull_triangle(
    triangles: &[DelaunayTriangle],
    positions: &[DVec2],
    inserted: &[usize],
) -> Option<DelaunayTriangle> {
    let edges: BTreeSet<DelaunayEdge> = triangles.iter().flat_map(|tri| tri.edges()).collect();

    if triangles.is_empty() {
        let (&a, rest) = inserted.split_first()?;
        let b = *rest.iter().min_by(|&&p, &&q| {
            let pa = positions[a];
            pa.distance_squared(positions[p])
                .total_cmp(&pa.distance_squared(positions[q]))
        })?;
        return wrap_edge(a, b, triangles, &edges, positions, inserted)
            .or_else(|| wrap_edge(b, a, triangles, &edges, positions, inserted));
    }

    boundary_edges(triangles, positions)
        .into_iter()
        .find_map(|(a, b)| wrap_edge(a, b, triangles, &edges, positions, inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn unit_square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]
    }

    /// Diagonal of a square triangulation as a sorted pair of positions
    fn diagonal(triangulation: &Triangulation) -> [(i64, i64); 2] {
        let diag = triangulation
            .edges
            .iter()
            .find(|edge| {
                let (p, q) = triangulation.edge_positions(edge);
                (p - q).length() > 1.2
            })
            .expect("square triangulation has a diagonal");
        let (p, q) = triangulation.edge_positions(diag);
        let mut ends = [(p.x as i64, p.y as i64), (q.x as i64, q.y as i64)];
        ends.sort();
        ends
    }

    /// All orderings of a slice
    fn permutations(items: &[DVec2]) -> Vec<Vec<DVec2>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_unit_square() {
        let triangulation = triangulate(&unit_square());
        assert_eq!(triangulation.triangle_count(), 2);
        assert_eq!(triangulation.edge_count(), 5);
    }

    #[test]
    fn test_unit_square_diagonal_independent_of_order() {
        let expected = diagonal(&triangulate(&unit_square()));
        let orderings = permutations(&unit_square());
        assert_eq!(orderings.len(), 24);

        for points in orderings {
            let triangulation = triangulate(&points);
            assert_eq!(triangulation.triangle_count(), 2);
            assert_eq!(triangulation.edge_count(), 5);
            assert_eq!(diagonal(&triangulation), expected, "order {points:?}");
        }
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate(&[]).is_empty());

        let one = triangulate(&[DVec2::new(1.0, 2.0)]);
        assert!(one.is_empty());
        assert_eq!(one.edge_count(), 0);

        let two = triangulate(&[DVec2::ZERO, DVec2::ONE]);
        assert!(two.is_empty());
        assert_eq!(two.edge_count(), 0);
        assert_eq!(two.vertices.len(), 2);
    }

    #[test]
    fn test_single_triangle() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(1.0, 3.0),
        ];
        let triangulation = triangulate(&points);
        assert_eq!(triangulation.triangle_count(), 1);
        assert_eq!(
            triangulation.edges,
            vec![
                DelaunayEdge::new(0, 1),
                DelaunayEdge::new(0, 2),
                DelaunayEdge::new(1, 2)
            ]
        );
        assert_eq!(triangulation.neighbors(2), vec![0, 1]);
    }

    #[test]
    fn test_duplicate_points_are_ignored() {
        let mut points = unit_square();
        points.push(DVec2::new(1.0, 1.0));
        points.push(DVec2::new(1.0 + 1e-12, 1.0));

        let triangulation = triangulate(&points);
        assert_eq!(triangulation.triangle_count(), 2);
        assert_eq!(triangulation.edge_count(), 5);
    }

    #[test]
    fn test_empty_circumcircle_property() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let points: Vec<DVec2> = (0..60)
                .map(|_| DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
                .collect();
            let triangulation = triangulate(&points);
            assert!(!triangulation.is_empty());

            for tri in &triangulation.triangles {
                let center = tri.circumcenter();
                let radius_sq = tri.circumradius_sq();
                for (index, p) in points.iter().enumerate() {
                    if tri.contains_vertex(index) {
                        continue;
                    }
                    let dist_sq = center.distance_squared(*p);
                    assert!(
                        dist_sq >= radius_sq * (1.0 - 1e-9),
                        "point {index} inside circumcircle of {:?}",
                        tri.vertices
                    );
                }
            }
        }
    }

    #[test]
    fn test_integer_lattice_is_fully_triangulated() {
        // 4x4 lattice: 18 triangles, 33 edges (planar, convex hull of 12 points)
        let points: Vec<DVec2> = (0..4)
            .flat_map(|y| (0..4).map(move |x| DVec2::new(x as f64, y as f64)))
            .collect();
        let triangulation = triangulate(&points);
        assert_eq!(triangulation.triangle_count(), 18);
        assert_eq!(triangulation.edge_count(), 33);
    }

    /// Convex hull area by monotone chain
    fn hull_area(points: &[DVec2]) -> f64 {
        let mut sorted = points.to_vec();
        sorted.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));

        let mut hull: Vec<DVec2> = Vec::new();
        for pass in 0..2 {
            let start = hull.len();
            let iter: Box<dyn Iterator<Item = &DVec2>> = if pass == 0 {
                Box::new(sorted.iter())
            } else {
                Box::new(sorted.iter().rev())
            };
            for &p in iter {
                while hull.len() >= start + 2
                    && orient(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
                {
                    hull.pop();
                }
                hull.push(p);
            }
            hull.pop();
        }

        let n = hull.len();
        (0..n)
            .map(|i| hull[i].perp_dot(hull[(i + 1) % n]))
            .sum::<f64>()
            .abs()
            / 2.0
    }

    #[test]
    fn test_integer_points_cover_convex_hull() {
        let mut rng = ChaCha8Rng::seed_from_u64(28);

        for round in 0..300 {
            let count = rng.gen_range(3..40);
            let mut seen = HashSet::new();
            let points: Vec<DVec2> = std::iter::repeat_with(|| {
                (rng.gen_range(1..39), rng.gen_range(1..39))
            })
            .filter(|cell| seen.insert(*cell))
            .take(count)
            .map(|(x, y)| DVec2::new(x as f64, y as f64))
            .collect();

            let triangulation = triangulate(&points);
            let covered: f64 = triangulation
                .triangles
                .iter()
                .map(|tri| {
                    let [a, b, c] = tri.vertices.map(|v| points[v]);
                    orient(a, b, c).abs() / 2.0
                })
                .sum();

            let expected = hull_area(&points);
            assert!(
                (covered - expected).abs() < 1e-6,
                "round {round}: triangles cover {covered}, hull is {expected}"
            );

            for tri in &triangulation.triangles {
                let [a, b, c] = tri.vertices.map(|v| points[v]);
                assert!(orient(a, b, c).abs() > 0.0, "round {round}: flat triangle");
                for (index, p) in points.iter().enumerate() {
                    if !tri.contains_vertex(index) {
                        assert!(!tri.circum_circle_contains(*p), "round {round}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_flat_triangle_survives() {
        // Circumradius in the thousands: the only triangle reaches past the super-triangle
        let points = [
            DVec2::new(1.0, 1.0),
            DVec2::new(19.0, 2.0),
            DVec2::new(38.0, 3.0),
        ];
        let triangulation = triangulate(&points);
        assert_eq!(triangulation.triangle_count(), 1);
        assert_eq!(triangulation.edge_count(), 3);

        let collinear = [DVec2::ZERO, DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)];
        assert!(triangulate(&collinear).is_empty());
    }

    #[test]
    fn test_nearly_collinear_hull_is_closed() {
        // A long, almost flat bottom chain whose hull triangles have huge circumcircles
        let points = [
            DVec2::new(1.0, 1.0),
            DVec2::new(20.0, 2.0),
            DVec2::new(38.0, 1.0),
            DVec2::new(19.0, 3.0),
            DVec2::new(20.0, 30.0),
        ];
        let triangulation = triangulate(&points);
        let covered: f64 = triangulation
            .triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = tri.vertices.map(|v| points[v]);
                orient(a, b, c).abs() / 2.0
            })
            .sum();
        assert!((covered - hull_area(&points)).abs() < 1e-9);
        assert!(triangulation.edges.contains(&DelaunayEdge::new(0, 2)));
    }

    #[test]
    fn test_edge_equality_and_hash_ignore_orientation() {
        let e1 = DelaunayEdge::new(3, 7);
        let e2 = DelaunayEdge::new(7, 3);
        assert_eq!(e1, e2);

        let set: HashSet<DelaunayEdge> = [e1, e2].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(e1.other(7), Some(3));
        assert_eq!(e1.other(4), None);
    }

    #[test]
    fn test_triangle_equality_ignores_vertex_order() {
        let points = unit_square();
        let t1 = DelaunayTriangle::new([0, 1, 2], &points);
        let t2 = DelaunayTriangle::new([2, 0, 1], &points);
        let t3 = DelaunayTriangle::new([1, 0, 2], &points);
        let t4 = DelaunayTriangle::new([0, 1, 3], &points);
        assert_eq!(t1, t2);
        assert_eq!(t1, t3);
        assert_ne!(t1, t4);
    }

    #[test]
    fn test_vertex_approx_equality() {
        let a = DelaunayVertex::new(0, DVec2::new(1.0e6, 0.0));
        let b = DelaunayVertex::new(1, DVec2::new(1.0e6 + 1.0e-4, 1.0e-12));
        let c = DelaunayVertex::new(2, DVec2::new(1.0e6 + 1.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_circumcircle() {
        let (center, radius_sq) = circumcircle(
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
        );
        assert!((center - DVec2::new(1.0, 1.0)).length() < 1e-12);
        assert!((radius_sq - 2.0).abs() < 1e-12);

        let (_, degenerate) = circumcircle(DVec2::ZERO, DVec2::ONE, DVec2::splat(2.0));
        assert!(degenerate.is_infinite());
    }
}
