/// Drawable geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized `(v1 - v0) × (v2 - v0)`; its length is twice the area.
    pub fn edge_cross(&self) -> Vector3<f32> {
        let [a, b, c] = self.positions();
        (b - a).cross(&(c - a))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        self.edge_cross().normalize()
    }

    pub fn area(&self) -> f32 {
        self.edge_cross().norm() * 0.5
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.positions();
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    pub fn positions(&self) -> [Point3<f32>; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Vertex positions as `[x, y, z, x, y, z, ...]`, three corners per triangle.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
