//! Mesh colliders
//!
//! [`MeshCollider`] tests every triangle and keeps the nearest one;
//! [`MeshBoundsCollider`] only tests the mesh's bounding volume.

use crate::collision::{Ray, TriangleHit};
use crate::foundation::math::{Vec2, Vec3};
use crate::picking::hit::HitResult;
use crate::scene::{Mesh, MeshId, TEXCOORD_ATTRIBUTE};

/// Per-triangle mesh collider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshCollider {
    mesh: Option<MeshId>,
    pick_coordinates: bool,
    bounds_reject: bool,
}

impl MeshCollider {
    /// Collider testing the owner node's renderable mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Collider testing a specific mesh
    pub fn for_mesh(mesh: MeshId) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::default()
        }
    }

    /// Request barycentric, texture coordinate and normal data on hits
    #[must_use]
    pub fn with_pick_coordinates(mut self, pick_coordinates: bool) -> Self {
        self.pick_coordinates = pick_coordinates;
        self
    }

    /// Skip the triangle loop when the ray misses the mesh bounds
    #[must_use]
    pub fn with_bounds_reject(mut self, bounds_reject: bool) -> Self {
        self.bounds_reject = bounds_reject;
        self
    }

    /// Explicit mesh, if any
    pub fn mesh_id(&self) -> Option<MeshId> {
        self.mesh
    }

    /// Whether surface data is interpolated on hits
    pub fn pick_coordinates(&self) -> bool {
        self.pick_coordinates
    }

    pub(super) fn hit_test(&self, mesh: Option<&Mesh>, ray: &Ray) -> HitResult {
        let Some(mesh) = mesh else {
            return HitResult::miss();
        };
        if self.bounds_reject && mesh.bounding_volume().intersect_ray(ray).is_none() {
            return HitResult::miss();
        }
        intersect_mesh(mesh, ray, self.pick_coordinates)
    }
}

/// Nearest triangle hit of a ray against a mesh, in the mesh's space.
///
/// Ties keep the first face in index order. The distance is the Euclidean
/// distance from the ray origin to the hit. With `pick_coordinates` the
/// barycentric weights are always reported; texture coordinates and the
/// normal are interpolated when the mesh carries them.
pub fn intersect_mesh(mesh: &Mesh, ray: &Ray, pick_coordinates: bool) -> HitResult {
    let mut nearest: Option<(usize, TriangleHit)> = None;
    for (face, triangle) in mesh.triangles().enumerate() {
        if let Some(hit) = triangle.intersect_ray(ray) {
            match nearest {
                Some((_, best)) if best.t <= hit.t => {}
                _ => nearest = Some((face, hit)),
            }
        }
    }

    let Some((face, hit)) = nearest else {
        return HitResult::miss();
    };

    let result = HitResult::hit(hit.position, (hit.position - ray.origin).magnitude()).with_face(face);
    if pick_coordinates {
        populate_surface(mesh, face, result)
    } else {
        result
    }
}

fn populate_surface(mesh: &Mesh, face: usize, result: HitResult) -> HitResult {
    let (Some([a, b, c]), Some(triangle)) = (mesh.face(face), mesh.triangle(face)) else {
        return result;
    };
    let Some(weights) = triangle.barycentric(result.position()) else {
        return result;
    };
    let mut result = result.with_barycentric(weights);

    match mesh.vec2_attribute(TEXCOORD_ATTRIBUTE) {
        Ok(uvs) => {
            let uv: Vec2 = uvs[a] * weights.x + uvs[b] * weights.y + uvs[c] * weights.z;
            result = result.with_texture_coords(uv);
        }
        Err(err) => log::warn!("mesh collider: texture coordinates unavailable: {err}"),
    }

    let normals = mesh.normals();
    if !normals.is_empty() {
        let normal: Vec3 = normals[a] * weights.x + normals[b] * weights.y + normals[c] * weights.z;
        if let Some(normal) = normal.try_normalize(f32::EPSILON) {
            result = result.with_normal(normal);
        }
    }
    result
}

/// Collider testing only a mesh's bounding volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshBoundsCollider {
    mesh: Option<MeshId>,
}

impl MeshBoundsCollider {
    /// Collider testing the owner node's renderable mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Collider testing a specific mesh
    pub fn for_mesh(mesh: MeshId) -> Self {
        Self { mesh: Some(mesh) }
    }

    /// Explicit mesh, if any
    pub fn mesh_id(&self) -> Option<MeshId> {
        self.mesh
    }

    pub(super) fn hit_test(&self, mesh: Option<&Mesh>, ray: &Ray) -> HitResult {
        mesh.and_then(|mesh| mesh.bounding_volume().intersect_ray(ray))
            .map_or_else(HitResult::miss, |entry| {
                HitResult::hit(entry, (entry - ray.origin).magnitude())
            })
    }
}
