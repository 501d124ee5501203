//! Indexed triangle meshes and their measurements.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shapekit_math::{Point3, Transform};

/// Output triangle mesh handed to voxelizers and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Mesh from positions and triangle indices; normals are computed.
    pub fn from_parts(positions: &[Point3], indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            vertices: positions
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            indices,
            normals: Vec::new(),
        };
        mesh.compute_normals();
        mesh
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            f64::from(self.vertices[3 * i]),
            f64::from(self.vertices[3 * i + 1]),
            f64::from(self.vertices[3 * i + 2]),
        )
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Index-free triangle soup, three explicit corners per triangle.
    pub fn triangles(&self) -> Vec<[Point3; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|t| {
                [
                    self.vertex(t[0] as usize),
                    self.vertex(t[1] as usize),
                    self.vertex(t[2] as usize),
                ]
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..self.num_vertices() {
            let p = self.vertex(i);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Some((min, max))
    }

    fn edge_uses(&self) -> HashMap<(u32, u32), usize> {
        let mut uses = HashMap::new();
        for t in self.indices.chunks_exact(3) {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        uses
    }

    /// Number of undirected edges used by exactly one triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_uses().values().filter(|&&n| n == 1).count()
    }

    /// Every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.edge_uses().values().all(|&n| n == 2)
    }

    /// Signed enclosed volume; positive when triangles wind outward.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .iter()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Total triangle area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .iter()
            .map(|[a, b, c]| 0.5 * (b - a).cross(&(c - a)).norm())
            .sum()
    }

    /// Reverse the winding of every triangle and negate the normals.
    pub fn reverse_winding(&mut self) {
        for t in self.indices.chunks_exact_mut(3) {
            t.swap(1, 2);
        }
        for n in &mut self.normals {
            *n = -*n;
        }
    }

    /// Area-weighted vertex normals, replacing any stored normals.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![shapekit_math::Vec3::zeros(); self.num_vertices()];
        for t in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (t[0] as usize, t[1] as usize, t[2] as usize);
            let (a, b, c) = (self.vertex(i0), self.vertex(i1), self.vertex(i2));
            let n = (b - a).cross(&(c - a));
            acc[i0] += n;
            acc[i1] += n;
            acc[i2] += n;
        }
        self.normals = acc
            .iter()
            .flat_map(|n| {
                let n = n.try_normalize(1e-20).unwrap_or_else(shapekit_math::Vec3::zeros);
                [n.x as f32, n.y as f32, n.z as f32]
            })
            .collect();
    }

    /// Copy with every vertex remapped by `f`; normals are recomputed.
    pub fn transformed<F>(&self, f: F) -> TriangleMesh
    where
        F: Fn(Point3) -> Point3,
    {
        let positions: Vec<Point3> = (0..self.num_vertices()).map(|i| f(self.vertex(i))).collect();
        TriangleMesh::from_parts(&positions, self.indices.clone())
    }

    /// Apply an affine transform in place.
    pub fn apply_transform(&mut self, transform: &Transform) {
        *self = self.transformed(|p| transform.apply_point(&p));
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit right tetrahedron wound outward.
    fn tetra() -> TriangleMesh {
        let positions = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        TriangleMesh::from_parts(&positions, vec![0, 2, 1, 0, 1, 3, 1, 2, 3, 0, 3, 2])
    }

    #[test]
    fn test_counts_and_bounds() {
        let mesh = tetra();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 4);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::origin());
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
        assert!(TriangleMesh::new().bounding_box().is_none());
    }

    #[test]
    fn test_closed_and_volume() {
        let mesh = tetra();
        assert!(mesh.is_closed());
        assert_eq!(mesh.boundary_edge_count(), 0);
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0, epsilon = 1e-9);
        let area = 1.5 + 3f64.sqrt() / 2.0;
        assert_relative_eq!(mesh.surface_area(), area, epsilon = 1e-6);
    }

    #[test]
    fn test_open_mesh_has_boundary() {
        let mut mesh = tetra();
        mesh.indices.truncate(9);
        assert!(!mesh.is_closed());
        assert_eq!(mesh.boundary_edge_count(), 3);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = tetra();
        let b = tetra().transformed(|p| p + shapekit_math::Vec3::new(5.0, 0.0, 0.0));
        a.merge(&b);
        assert_eq!(a.num_vertices(), 8);
        assert_eq!(a.indices[12], 4);
        assert!(a.is_closed());
        assert_relative_eq!(a.volume(), 2.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_transform() {
        let mut mesh = tetra();
        mesh.apply_transform(&Transform::scale(2.0, 2.0, 2.0));
        assert_relative_eq!(mesh.volume(), 8.0 / 6.0, epsilon = 1e-6);
        let (_, max) = mesh.bounding_box().unwrap();
        assert_eq!(max, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_reverse_winding() {
        let mut mesh = tetra();
        mesh.reverse_winding();
        assert_relative_eq!(mesh.volume(), -1.0 / 6.0, epsilon = 1e-9);
        assert!(mesh.normals[11] < 0.0);
        assert!(mesh.is_closed());
    }

    #[test]
    fn test_triangles_soup() {
        let soup = tetra().triangles();
        assert_eq!(soup.len(), 4);
        assert_eq!(soup[0][1], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_normals_point_outward_at_apex() {
        let mesh = tetra();
        let n = shapekit_math::Vec3::new(
            f64::from(mesh.normals[9]),
            f64::from(mesh.normals[10]),
            f64::from(mesh.normals[11]),
        );
        assert!(n.z > 0.0);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_serde_round_trip() {
        let mesh = tetra();
        let json = serde_json::to_string(&mesh).unwrap();
        let back: TriangleMesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mesh);
    }
}
