//! Incremental triangle assembly with vertex welding.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use shapekit_math::Point3;
use tracing::debug;

use crate::mesh::TriangleMesh;

/// Default weld grid size in model units.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-6;

/// Collects triangles, merging vertices closer than the weld tolerance.
///
/// Positions are bucketed into cubic cells one tolerance wide. A lookup scans
/// the 27 cells around the query, so two points within tolerance merge even
/// when a cell boundary falls between them. Triangles that collapse after welding (two corners on one vertex) are
/// dropped, so poles and cap centres produce fans without slivers.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    positions: Vec<Point3>,
    indices: Vec<u32>,
    lookup: HashMap<[i64; 3], Vec<u32>>,
    weld_tolerance: f64,
    dropped: usize,
}

impl MeshBuilder {
    /// Builder with [`DEFAULT_WELD_TOLERANCE`].
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_WELD_TOLERANCE)
    }

    /// Builder with a custom weld grid size.
    ///
    /// Non-positive or non-finite values fall back to the default.
    pub fn with_tolerance(weld_tolerance: f64) -> Self {
        let weld_tolerance = if weld_tolerance.is_finite() && weld_tolerance > 0.0 {
            weld_tolerance
        } else {
            DEFAULT_WELD_TOLERANCE
        };
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            lookup: HashMap::new(),
            weld_tolerance,
            dropped: 0,
        }
    }

    fn cell(&self, p: &Point3) -> [i64; 3] {
        [
            (p.x / self.weld_tolerance).floor() as i64,
            (p.y / self.weld_tolerance).floor() as i64,
            (p.z / self.weld_tolerance).floor() as i64,
        ]
    }

    fn find(&self, p: &Point3, cell: [i64; 3]) -> Option<u32> {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                    let Some(bucket) = self.lookup.get(&key) else {
                        continue;
                    };
                    if let Some(&i) = bucket
                        .iter()
                        .find(|&&i| (self.positions[i as usize] - p).norm() <= self.weld_tolerance)
                    {
                        return Some(i);
                    }
                }
            }
        }
        None
    }

    /// Index of the vertex within tolerance of `p`, adding `p` if there is
    /// none.
    pub fn add_vertex(&mut self, p: Point3) -> u32 {
        let cell = self.cell(&p);
        if let Some(i) = self.find(&p, cell) {
            return i;
        }
        let index = self.positions.len() as u32;
        self.positions.push(p);
        self.lookup.entry(cell).or_default().push(index);
        index
    }

    /// Add a triangle wound `a → b → c`.
    pub fn add_triangle(&mut self, a: Point3, b: Point3, c: Point3) {
        let (ia, ib, ic) = (self.add_vertex(a), self.add_vertex(b), self.add_vertex(c));
        if ia == ib || ib == ic || ic == ia {
            self.dropped += 1;
            return;
        }
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }

    /// Add the quad `a → b → c → d` as two triangles, reversed if `flip`.
    pub fn add_quad(&mut self, a: Point3, b: Point3, c: Point3, d: Point3, flip: bool) {
        if flip {
            self.add_triangle(a, c, b);
            self.add_triangle(a, d, c);
        } else {
            self.add_triangle(a, b, c);
            self.add_triangle(a, c, d);
        }
    }

    /// Number of triangles kept so far.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Finish into a mesh with vertex normals.
    pub fn finish(self) -> TriangleMesh {
        debug!(
            vertices = self.positions.len(),
            triangles = self.indices.len() / 3,
            dropped = self.dropped,
            "mesh assembled"
        );
        TriangleMesh::from_parts(&self.positions, self.indices)
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a `rows × cols` grid of surface points, emitting two triangles per
/// cell.
///
/// `point_fn` receives the row and column ratios `i / (rows - 1)` and
/// `j / (cols - 1)`. Cell `(i, j)` is wound
/// `(i, j) → (i+1, j) → (i+1, j+1) → (i, j+1)`, reversed if `flip`.
/// Grids with fewer than two rows or columns emit nothing.
pub fn quad_walk<F>(builder: &mut MeshBuilder, rows: usize, cols: usize, flip: bool, point_fn: F)
where
    F: Fn(f64, f64) -> Point3 + Sync + Send,
{
    if rows < 2 || cols < 2 {
        return;
    }
    let ratio = |i: usize, n: usize| i as f64 / (n - 1) as f64;
    let eval = |k: usize| point_fn(ratio(k / cols, rows), ratio(k % cols, cols));

    #[cfg(feature = "parallel")]
    let grid: Vec<Point3> = (0..rows * cols).into_par_iter().map(eval).collect();
    #[cfg(not(feature = "parallel"))]
    let grid: Vec<Point3> = (0..rows * cols).map(eval).collect();

    let at = |i: usize, j: usize| grid[i * cols + j];
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            builder.add_quad(at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1), flip);
        }
    }
}
