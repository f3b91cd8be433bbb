//! Mesh resource read by mesh colliders
//!
//! Vertex positions, an indexed triangle list, optional per-vertex normals
//! and named 2D attributes (texture coordinate channels). The bounding
//! volume is computed once at construction.

use std::collections::HashMap;

use crate::collision::{BoundingVolume, Triangle};
use crate::foundation::math::{Vec2, Vec3};

/// Name of the primary texture coordinate channel
pub const TEXCOORD_ATTRIBUTE: &str = "a_texcoord";

/// Errors raised while building or querying a mesh
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Index list length is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),

    /// An index refers past the end of the vertex array
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// A per-vertex attribute has the wrong number of elements
    #[error("attribute '{name}' has {actual} elements, expected {expected}")]
    AttributeLength {
        /// Attribute name
        name: String,
        /// Vertex count
        expected: usize,
        /// Supplied element count
        actual: usize,
    },

    /// The mesh has no attribute with this name
    #[error("attribute '{0}' not present")]
    AttributeNotFound(String),
}

/// Triangle mesh in model space
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
    vec2_attributes: HashMap<String, Vec<Vec2>>,
    bounds: BoundingVolume,
}

impl Mesh {
    /// Create a mesh from vertex positions and a triangle index list
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let bounds = BoundingVolume::from_points(&vertices);
        Ok(Self {
            vertices,
            indices,
            normals: Vec::new(),
            vec2_attributes: HashMap::new(),
            bounds,
        })
    }

    /// Attach per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        self.check_length("normals", normals.len())?;
        self.normals = normals;
        Ok(self)
    }

    /// Attach a named per-vertex 2D attribute
    pub fn with_vec2_attribute(mut self, name: impl Into<String>, values: Vec<Vec2>) -> Result<Self, MeshError> {
        let name = name.into();
        self.check_length(&name, values.len())?;
        self.vec2_attributes.insert(name, values);
        Ok(self)
    }

    /// Attach texture coordinates under [`TEXCOORD_ATTRIBUTE`]
    pub fn with_texcoords(self, texcoords: Vec<Vec2>) -> Result<Self, MeshError> {
        self.with_vec2_attribute(TEXCOORD_ATTRIBUTE, texcoords)
    }

    fn check_length(&self, name: &str, actual: usize) -> Result<(), MeshError> {
        if actual == self.vertices.len() {
            Ok(())
        } else {
            Err(MeshError::AttributeLength {
                name: name.to_string(),
                expected: self.vertices.len(),
                actual,
            })
        }
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat triangle index list
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-vertex normals; empty when none were supplied
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of a face
    pub fn face(&self, face: usize) -> Option<[usize; 3]> {
        let base = face.checked_mul(3)?;
        let slice = self.indices.get(base..base.checked_add(3)?)?;
        Some([slice[0] as usize, slice[1] as usize, slice[2] as usize])
    }

    /// Geometry of a face
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let [a, b, c] = self.face(face)?;
        Some(Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c]))
    }

    /// Iterate over all faces in index order
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|chunk| {
            Triangle::new(
                self.vertices[chunk[0] as usize],
                self.vertices[chunk[1] as usize],
                self.vertices[chunk[2] as usize],
            )
        })
    }

    /// Whether a named attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.vec2_attributes.contains_key(name)
    }

    /// Look up a named 2D attribute
    pub fn vec2_attribute(&self, name: &str) -> Result<&[Vec2], MeshError> {
        self.vec2_attributes
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::AttributeNotFound(name.to_string()))
    }

    /// Bounding volume of all vertices
    pub fn bounding_volume(&self) -> &BoundingVolume {
        &self.bounds
    }

    /// Axis-aligned quad in the XY plane facing +Z, with texcoords and normals
    pub fn quad(half_width: f32, half_height: f32) -> Self {
        let vertices = vec![
            Vec3::new(-half_width, -half_height, 0.0),
            Vec3::new(half_width, -half_height, 0.0),
            Vec3::new(half_width, half_height, 0.0),
            Vec3::new(-half_width, half_height, 0.0),
        ];
        let texcoords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let normals = vec![Vec3::z(); 4];
        Self {
            bounds: BoundingVolume::from_points(&vertices),
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
            normals,
            vec2_attributes: HashMap::from([(TEXCOORD_ATTRIBUTE.to_string(), texcoords)]),
        }
    }

    /// Axis-aligned cube centered on the origin, without attributes
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
        ];
        Self {
            bounds: BoundingVolume::from_points(&vertices),
            vertices,
            indices,
            normals: Vec::new(),
            vec2_attributes: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_index_lists() {
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        assert_eq!(
            Mesh::new(vertices.clone(), vec![0, 1]).unwrap_err(),
            MeshError::IndexCount(2)
        );
        assert_eq!(
            Mesh::new(vertices, vec![0, 1, 3]).unwrap_err(),
            MeshError::IndexOutOfRange { index: 3, vertex_count: 3 }
        );
    }

    #[test]
    fn test_attribute_length_must_match_vertices() {
        let mesh = Mesh::new(vec![Vec3::zeros(), Vec3::x(), Vec3::y()], vec![0, 1, 2]).unwrap();
        let err = mesh.with_texcoords(vec![Vec2::zeros()]).unwrap_err();
        assert!(matches!(err, MeshError::AttributeLength { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_missing_attribute_lookup_fails() {
        let mesh = Mesh::cube(1.0);
        assert!(!mesh.has_attribute(TEXCOORD_ATTRIBUTE));
        assert_eq!(
            mesh.vec2_attribute(TEXCOORD_ATTRIBUTE).unwrap_err(),
            MeshError::AttributeNotFound(TEXCOORD_ATTRIBUTE.to_string())
        );
    }

    #[test]
    fn test_faces_and_bounds() {
        let mesh = Mesh::cube(0.5);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.triangles().count(), 12);
        assert_eq!(mesh.face(1), Some([0, 3, 2]));
        assert!(mesh.face(12).is_none());
        assert!(mesh.face(usize::MAX / 3).is_none());
        assert_eq!(mesh.bounding_volume().min_corner(), Vec3::repeat(-0.5));
        assert_eq!(mesh.bounding_volume().max_corner(), Vec3::repeat(0.5));
    }

    #[test]
    fn test_quad_has_texcoords() {
        let quad = Mesh::quad(1.0, 1.0);
        assert!(quad.has_attribute(TEXCOORD_ATTRIBUTE));
        assert_eq!(quad.vec2_attribute(TEXCOORD_ATTRIBUTE).unwrap().len(), 4);
        assert_eq!(quad.normals().len(), 4);
    }
}
