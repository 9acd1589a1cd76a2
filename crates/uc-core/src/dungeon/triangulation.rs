//! 3D Delaunay tetrahedralization (Bowyer-Watson)
//!
//! Points are integer lattice points (doubled room centroids), and all
//! geometric predicates are evaluated exactly in `i128`. Exact predicates
//! keep the insertion cavity well formed on lattice input, which is full of
//! coplanar and cospherical subsets, so no zero-volume tetrahedron is ever
//! created.
//!
//! Insertion starts from a super-tetrahedron far larger than the input.
//! Edges between two input points are kept even when their tetrahedron
//! touches a super vertex, so coplanar input still yields a planar
//! triangulation and collinear input a chain.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Integer point in 3D
pub type Point = [i64; 3];

/// How far the super-tetrahedron reaches beyond the input, in half-extents
const SUPER_SCALE: i64 = 16;

/// Result of triangulating a point set
#[derive(Debug, Clone)]
pub struct Tetrahedralization {
    /// Input points followed by the four super vertices
    vertices: Vec<Point>,
    /// Number of input points
    real_count: usize,
    /// Vertex indices of every tetrahedron
    tetrahedra: Vec<[usize; 4]>,
}

impl Tetrahedralization {
    /// Triangulate `points`
    ///
    /// Duplicate points are inserted once; later copies end up with no
    /// incident tetrahedra.
    pub fn build(points: &[Point]) -> Self {
        let real_count = points.len();
        if real_count == 0 {
            return Self {
                vertices: Vec::new(),
                real_count,
                tetrahedra: Vec::new(),
            };
        }

        let mut vertices = points.to_vec();
        vertices.extend(super_tetrahedron(points));
        let mut tetrahedra = vec![[real_count, real_count + 1, real_count + 2, real_count + 3]];

        let mut seen: HashSet<Point> = HashSet::with_capacity(real_count);
        for (index, point) in points.iter().enumerate() {
            if !seen.insert(*point) {
                continue;
            }

            let (bad, good): (Vec<[usize; 4]>, Vec<[usize; 4]>) = tetrahedra
                .into_iter()
                .partition(|tet| circumsphere_contains(&vertices, tet, point));
            tetrahedra = good;

            // Faces shared by two cavity cells are interior; the rest bound it
            let mut faces: BTreeMap<[usize; 3], u32> = BTreeMap::new();
            for tet in &bad {
                for face in faces_of(tet) {
                    *faces.entry(face).or_default() += 1;
                }
            }
            for (face, count) in faces {
                if count == 1 {
                    tetrahedra.push([face[0], face[1], face[2], index]);
                }
            }
        }

        Self {
            vertices,
            real_count,
            tetrahedra,
        }
    }

    /// Tetrahedra whose four vertices are all input points
    pub fn tetrahedra(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        self.tetrahedra
            .iter()
            .copied()
            .filter(|tet| tet.iter().all(|&v| v < self.real_count))
    }

    /// Every edge between two input points, as `(low, high)` index pairs
    pub fn edges(&self) -> BTreeSet<(usize, usize)> {
        let mut edges = BTreeSet::new();
        for tet in &self.tetrahedra {
            for i in 0..4 {
                for j in (i + 1)..4 {
                    let (a, b) = (tet[i].min(tet[j]), tet[i].max(tet[j]));
                    if b < self.real_count {
                        edges.insert((a, b));
                    }
                }
            }
        }
        edges
    }

    /// Check the empty-circumsphere property of one tetrahedron against all
    /// input points
    pub fn is_delaunay(&self, tet: &[usize; 4]) -> bool {
        self.vertices[..self.real_count]
            .iter()
            .enumerate()
            .filter(|(i, _)| !tet.contains(i))
            .all(|(_, p)| !circumsphere_contains(&self.vertices, tet, p))
    }
}

/// Four vertices enclosing every input point strictly
fn super_tetrahedron(points: &[Point]) -> [Point; 4] {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    let center = [
        (min[0] + max[0]).div_euclid(2),
        (min[1] + max[1]).div_euclid(2),
        (min[2] + max[2]).div_euclid(2),
    ];
    let extent = (0..3).map(|a| max[a] - min[a]).max().unwrap_or(0);
    let half = extent / 2 + 1;
    let r = SUPER_SCALE * half;

    // The corner at -r sits outside the box on every axis, and the slanted
    // face x + y + z = 2r (relative to center) clears the box's far corner.
    [
        [center[0] - r, center[1] - r, center[2] - r],
        [center[0] + 4 * r, center[1] - r, center[2] - r],
        [center[0] - r, center[1] + 4 * r, center[2] - r],
        [center[0] - r, center[1] - r, center[2] + 4 * r],
    ]
}

fn faces_of(tet: &[usize; 4]) -> [[usize; 3]; 4] {
    let sorted = |mut f: [usize; 3]| {
        f.sort_unstable();
        f
    };
    [
        sorted([tet[0], tet[1], tet[2]]),
        sorted([tet[0], tet[1], tet[3]]),
        sorted([tet[0], tet[2], tet[3]]),
        sorted([tet[1], tet[2], tet[3]]),
    ]
}

fn sub(a: &Point, b: &Point) -> [i128; 3] {
    [
        (a[0] - b[0]) as i128,
        (a[1] - b[1]) as i128,
        (a[2] - b[2]) as i128,
    ]
}

fn det3(r0: &[i128; 3], r1: &[i128; 3], r2: &[i128; 3]) -> i128 {
    r0[0] * (r1[1] * r2[2] - r1[2] * r2[1]) - r0[1] * (r1[0] * r2[2] - r1[2] * r2[0])
        + r0[2] * (r1[0] * r2[1] - r1[1] * r2[0])
}

/// Sign of the volume of `(a, b, c, d)`: `det[a - d; b - d; c - d]`
pub fn orient3d(a: &Point, b: &Point, c: &Point, d: &Point) -> i128 {
    det3(&sub(a, d), &sub(b, d), &sub(c, d))
}

/// Lifted determinant deciding whether `e` lies in the sphere through
/// `a, b, c, d`
///
/// Shares its sign with `orient3d(a, b, c, d)` exactly when `e` is strictly
/// inside the sphere, and is zero when `e` lies on it.
pub fn insphere(a: &Point, b: &Point, c: &Point, d: &Point, e: &Point) -> i128 {
    let rows = [sub(a, e), sub(b, e), sub(c, e), sub(d, e)];
    let lift = |r: &[i128; 3]| r[0] * r[0] + r[1] * r[1] + r[2] * r[2];

    -lift(&rows[0]) * det3(&rows[1], &rows[2], &rows[3])
        + lift(&rows[1]) * det3(&rows[0], &rows[2], &rows[3])
        - lift(&rows[2]) * det3(&rows[0], &rows[1], &rows[3])
        + lift(&rows[3]) * det3(&rows[0], &rows[1], &rows[2])
}

/// Strict in-circumsphere test for a tetrahedron of `vertices`
fn circumsphere_contains(vertices: &[Point], tet: &[usize; 4], p: &Point) -> bool {
    let [a, b, c, d] = tet.map(|i| &vertices[i]);
    let orientation = orient3d(a, b, c, d).signum();
    orientation != 0 && insphere(a, b, c, d, p).signum() == orientation
}
