/// Cuboctahedron mesh construction.
///
/// The solid is the rectified cube: twelve vertices at every permutation of
/// `(±1, ±1, 0)`, grouped as three axis-aligned squares of side 2 lying in
/// the planes `z = 0`, `x = 0` and `y = 0`. Faces are emitted in a fixed
/// order (eight corner triangles, then six squares split into two triangles
/// each) and every triangle winds counter-clockwise when seen from outside.
/// Palettes and labels index into that order.
use std::collections::{BTreeSet, HashSet};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle, Vertex};

pub const VERTEX_COUNT: usize = 12;
pub const FACE_COUNT: usize = 20;

/// Faces whose doubled area falls below this are rejected as degenerate.
const AREA_EPSILON: f32 = 1e-6;

/// Zero axis of each principal square, in emission order: `z = 0`, `x = 0`, `y = 0`.
const PLANE_ZERO_AXES: [usize; 3] = [2, 0, 1];

/// Signs walked around a principal square, in the plane's `(a, b)` axes.
const SQUARE_WALK: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

/// Octant signs `[x, y, z]` of the corner triangles, upper half first.
const OCTANTS: [[i8; 3]; 8] = [
    [1, 1, 1],
    [-1, 1, 1],
    [1, 1, -1],
    [-1, 1, -1],
    [1, -1, 1],
    [-1, -1, 1],
    [1, -1, -1],
    [-1, -1, -1],
];

/// Square facets as `(axis, sign)`: right, left, front, back, top, bottom.
const SQUARES: [(usize, i8); 6] = [(0, 1), (0, -1), (2, 1), (2, -1), (1, 1), (1, -1)];

/// How normals are attached to the drawable mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingPolicy {
    /// Every corner of a triangle carries that triangle's normal.
    #[default]
    Flat,
    /// Every vertex carries the angle-weighted average of its incident face normals.
    Smooth,
}

/// Which facet of the solid a triangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// Triangular facet cutting off the cube corner with these `[x, y, z]` signs.
    Corner { signs: [i8; 3] },
    /// One of the two triangles of the square facet perpendicular to `axis`
    /// on its `sign` side.
    SquareHalf { axis: usize, sign: i8, half: u8 },
}

impl FaceKind {
    /// Identifies the polyhedron facet, merging the two halves of a square.
    pub fn facet(&self) -> FaceKind {
        match *self {
            FaceKind::SquareHalf { axis, sign, .. } => FaceKind::SquareHalf { axis, sign, half: 0 },
            corner => corner,
        }
    }
}

/// Unit normals under one shading policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Normals {
    PerFace(Vec<Vector3<f32>>),
    PerVertex(Vec<Vector3<f32>>),
}

/// Summary of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub vertex_count: usize,
    pub face_count: usize,
    pub edge_count: usize,
    pub euler_characteristic: i64,
    /// Faces whose edge-cross normal had to be negated to point outward.
    pub corrected_normals: usize,
}

/// Immutable cuboctahedron geometry.
///
/// Normals are derived once by the builder; there is no way to override them.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    vertices: Vec<Point3<f32>>,
    faces: Vec<[usize; 3]>,
    kinds: Vec<FaceKind>,
    face_normals: Vec<Vector3<f32>>,
    normals: Normals,
    policy: ShadingPolicy,
    corrected_normals: usize,
}

/// Build the cuboctahedron with flat shading.
pub fn cuboctahedron() -> Polyhedron {
    build(ShadingPolicy::Flat)
}

/// Build the cuboctahedron with the given shading policy.
#[instrument]
pub fn build(policy: ShadingPolicy) -> Polyhedron {
    let vertices = square_vertices();
    let (faces, kinds) = facet_triangles();
    let (face_normals, corrected_normals) = oriented_normals(&vertices, &faces);

    let normals = match policy {
        ShadingPolicy::Flat => Normals::PerFace(face_normals.clone()),
        ShadingPolicy::Smooth => {
            Normals::PerVertex(smooth_normals(&vertices, &faces, &face_normals))
        }
    };

    info!(
        vertices = vertices.len(),
        faces = faces.len(),
        corrected_normals,
        "built cuboctahedron"
    );

    Polyhedron {
        vertices,
        faces,
        kinds,
        face_normals,
        normals,
        policy,
        corrected_normals,
    }
}

fn square_vertices() -> Vec<Point3<f32>> {
    let mut vertices = Vec::with_capacity(VERTEX_COUNT);
    for &k in &PLANE_ZERO_AXES {
        let (a, b) = ((k + 1) % 3, (k + 2) % 3);
        for &(sa, sb) in &SQUARE_WALK {
            let mut p = Point3::origin();
            p[a] = f32::from(sa);
            p[b] = f32::from(sb);
            vertices.push(p);
        }
    }
    vertices
}

/// Index of the lattice point `p`, which has exactly one zero coordinate.
fn index_of(p: [i8; 3]) -> usize {
    let k = if p[0] == 0 {
        0
    } else if p[1] == 0 {
        1
    } else {
        2
    };
    let step = match (p[(k + 1) % 3], p[(k + 2) % 3]) {
        (1, 1) => 0,
        (-1, 1) => 1,
        (-1, -1) => 2,
        _ => 3,
    };
    ((k + 1) % 3) * 4 + step
}

fn facet_triangles() -> (Vec<[usize; 3]>, Vec<FaceKind>) {
    let mut faces = Vec::with_capacity(FACE_COUNT);
    let mut kinds = Vec::with_capacity(FACE_COUNT);

    for signs in OCTANTS {
        let [sx, sy, sz] = signs;
        let a = index_of([sx, sy, 0]);
        let b = index_of([0, sy, sz]);
        let c = index_of([sx, 0, sz]);
        // (b - a) × (c - a) = (sy·sz, sx·sz, sx·sy), outward iff sx·sy·sz > 0
        faces.push(if sx * sy * sz > 0 { [a, b, c] } else { [a, c, b] });
        kinds.push(FaceKind::Corner { signs });
    }

    for (axis, sign) in SQUARES {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        let point = |da: i8, db: i8| {
            let mut p = [0i8; 3];
            p[axis] = sign;
            p[a] = da;
            p[b] = db;
            index_of(p)
        };
        // Counter-clockwise about +axis; walked backwards on the negative side.
        // Either way ring[0] is the +a corner, so the split runs along axis a.
        let ring = if sign > 0 {
            [point(1, 0), point(0, 1), point(-1, 0), point(0, -1)]
        } else {
            [point(1, 0), point(0, -1), point(-1, 0), point(0, 1)]
        };
        faces.push([ring[0], ring[1], ring[2]]);
        kinds.push(FaceKind::SquareHalf { axis, sign, half: 0 });
        faces.push([ring[0], ring[2], ring[3]]);
        kinds.push(FaceKind::SquareHalf { axis, sign, half: 1 });
    }

    (faces, kinds)
}

/// Edge-cross normals, negated wherever they face the origin.
fn oriented_normals(
    vertices: &[Point3<f32>],
    faces: &[[usize; 3]],
) -> (Vec<Vector3<f32>>, usize) {
    let mut corrected = 0;
    let normals = faces
        .iter()
        .enumerate()
        .map(|(face, &[i0, i1, i2])| {
            let (v1, v2, v3) = (vertices[i0], vertices[i1], vertices[i2]);
            let normal = (v2 - v1).cross(&(v3 - v1)).normalize();
            let centroid = (v1.coords + v2.coords + v3.coords) / 3.0;
            if normal.dot(&centroid) < 0.0 {
                warn!(face, "edge-cross normal pointed inward, flipping");
                corrected += 1;
                -normal
            } else {
                normal
            }
        })
        .collect();
    (normals, corrected)
}

/// Angle-weighted vertex normals. Weighting by corner angle keeps a square
/// facet's contribution independent of which diagonal split it.
fn smooth_normals(
    vertices: &[Point3<f32>],
    faces: &[[usize; 3]],
    face_normals: &[Vector3<f32>],
) -> Vec<Vector3<f32>> {
    let mut sums = vec![Vector3::zeros(); vertices.len()];
    for (face, indices) in faces.iter().enumerate() {
        for corner in 0..3 {
            let here = vertices[indices[corner]];
            let next = vertices[indices[(corner + 1) % 3]] - here;
            let prev = vertices[indices[(corner + 2) % 3]] - here;
            sums[indices[corner]] += face_normals[face] * next.angle(&prev);
        }
    }
    sums.into_iter().map(|n| n.normalize()).collect()
}

impl Polyhedron {
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn kinds(&self) -> &[FaceKind] {
        &self.kinds
    }

    /// Outward unit normal of every triangle, regardless of shading policy.
    pub fn face_normals(&self) -> &[Vector3<f32>] {
        &self.face_normals
    }

    pub fn normals(&self) -> &Normals {
        &self.normals
    }

    pub fn policy(&self) -> ShadingPolicy {
        self.policy
    }

    pub fn triangle(&self, face: usize) -> Triangle {
        let corner = |i: usize| {
            let index = self.faces[face][i];
            let normal = match &self.normals {
                Normals::PerFace(n) => n[face],
                Normals::PerVertex(n) => n[index],
            };
            Vertex::new(self.vertices[index], normal)
        };
        Triangle::new(corner(0), corner(1), corner(2))
    }

    pub fn centroid(&self, face: usize) -> Point3<f32> {
        let [i0, i1, i2] = self.faces[face];
        Point3::from(
            (self.vertices[i0].coords + self.vertices[i1].coords + self.vertices[i2].coords) / 3.0,
        )
    }

    /// Flatten into drawable triangles in face-emission order.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.faces.len());
        for face in 0..self.faces.len() {
            mesh.add_triangle(self.triangle(face));
        }
        mesh
    }

    /// Check the invariants a renderer relies on before the mesh is shipped.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<ValidationReport, MeshError> {
        let vertex_count = self.vertices.len();

        let mut referenced = vec![false; vertex_count];
        let mut edges = BTreeSet::new();

        for (face, &indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
            let [i0, i1, i2] = indices;
            if i0 == i1 || i1 == i2 || i0 == i2 {
                return Err(MeshError::RepeatedIndex { face, indices });
            }

            let (v1, v2, v3) = (self.vertices[i0], self.vertices[i1], self.vertices[i2]);
            let doubled_area = (v2 - v1).cross(&(v3 - v1)).norm();
            if doubled_area < AREA_EPSILON {
                return Err(MeshError::Degenerate {
                    face,
                    area: doubled_area * 0.5,
                });
            }

            let direction = self.centroid(face).coords.normalize();
            let dot = self.face_normals[face].dot(&direction);
            if !(dot > 0.0) {
                return Err(MeshError::InwardNormal { face, dot });
            }

            for i in 0..3 {
                let (a, b) = (indices[i], indices[(i + 1) % 3]);
                edges.insert((a.min(b), a.max(b)));
                referenced[a] = true;
            }
        }

        if let Some(vertex) = referenced.iter().position(|&r| !r) {
            return Err(MeshError::OrphanVertex { vertex });
        }

        for (vertex, p) in self.vertices.iter().enumerate() {
            let ones = p.iter().filter(|c| (c.abs() - 1.0).abs() < 1e-6).count();
            let zeros = p.iter().filter(|c| c.abs() < 1e-6).count();
            if ones != 2 || zeros != 1 {
                return Err(MeshError::MisplacedVertex {
                    vertex,
                    position: [p.x, p.y, p.z],
                });
            }
        }

        let report = ValidationReport {
            vertex_count,
            face_count: self.faces.len(),
            edge_count: edges.len(),
            euler_characteristic: vertex_count as i64 - edges.len() as i64
                + self.faces.len() as i64,
            corrected_normals: self.corrected_normals,
        };
        debug!(?report, "mesh validated");
        Ok(report)
    }

    /// Number of distinct polyhedron facets touching each vertex.
    pub fn facets_per_vertex(&self) -> Vec<usize> {
        let mut facets = vec![HashSet::new(); self.vertices.len()];
        for (indices, kind) in self.faces.iter().zip(&self.kinds) {
            for &i in indices {
                facets[i].insert(kind.facet());
            }
        }
        facets.iter().map(HashSet::len).collect()
    }
}
