//! Shared collision mesh for irregular scenery (trees, rocks)
//!
//! Loaded once, then handed out as `Arc<Mesh>`; nothing mutates a mesh after
//! construction.

use std::sync::Arc;

use glam::Vec2;

use crate::error::MeshError;

/// Triangulated 2D outline in local space
///
/// Vertices are in units of the owning entity's scale: a vertex at (0.5, 0.5)
/// lands on the top-right corner of the entity's visual footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec2>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec2>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangulated(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                len: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Convenience for the common shared-handle case
    pub fn shared(vertices: Vec<Vec2>, indices: Vec<u32>) -> Result<Arc<Self>, MeshError> {
        Self::new(vertices, indices).map(Arc::new)
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// World-space triangles for an entity at `position` with `scale`
    pub fn triangles_at(&self, position: Vec2, scale: Vec2) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [tri[0], tri[1], tri[2]].map(|i| position + self.vertices[i as usize] * scale)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_indices() {
        let verts = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        assert_eq!(
            Mesh::new(verts.clone(), vec![0, 1]),
            Err(MeshError::NotTriangulated(2))
        );
        assert_eq!(
            Mesh::new(verts, vec![0, 1, 3]),
            Err(MeshError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_triangles_transformed() {
        let mesh = Mesh::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y], vec![0, 1, 2]).unwrap();
        let tris: Vec<_> = mesh
            .triangles_at(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0))
            .collect();
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0][1], Vec2::new(14.0, 20.0));
        assert_eq!(tris[0][2], Vec2::new(10.0, 22.0));
    }
}
