//! Analytic colliders that need no mesh

use crate::collision::{BoundingSphere, BoundingVolume, Ray};
use crate::foundation::math::Vec3;
use crate::picking::hit::HitResult;

/// Axis-aligned box centered on the owner's origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    /// Half size along each local axis
    pub half_extents: Vec3,
}

impl BoxCollider {
    /// Box with the given half extents
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents: half_extents.abs(),
        }
    }

    pub(super) fn hit_test(&self, ray: &Ray) -> HitResult {
        BoundingVolume::from_center_extents(Vec3::zeros(), self.half_extents)
            .intersect_ray(ray)
            .map_or_else(HitResult::miss, |entry| {
                HitResult::hit(entry, (entry - ray.origin).magnitude())
            })
    }
}

/// Sphere in the owner's model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    /// Center relative to the owner's origin
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl SphereCollider {
    /// Sphere at `center` with `radius`
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub(super) fn hit_test(&self, ray: &Ray) -> HitResult {
        BoundingSphere::new(self.center, self.radius)
            .intersect_ray(ray)
            .map_or_else(HitResult::miss, |entry| {
                HitResult::hit(entry, (entry - ray.origin).magnitude())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_entry() {
        let collider = BoxCollider::new(Vec3::new(1.0, 2.0, 3.0));
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = collider.hit_test(&ray);
        assert_relative_eq!(hit.position(), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(hit.distance(), 8.0, epsilon = 1e-5);
        assert!(hit.face_index().is_none());
    }

    #[test]
    fn test_sphere_offset_center() {
        let collider = SphereCollider::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::z());
        let hit = collider.hit_test(&ray);
        assert_relative_eq!(hit.distance(), 14.0, epsilon = 1e-4);

        let sideways = Ray::new(Vec3::new(3.0, 0.0, -10.0), Vec3::z());
        assert!(!collider.hit_test(&sideways).is_hit());
    }

    #[test]
    fn test_zero_radius_sphere_misses() {
        let collider = SphereCollider::new(Vec3::zeros(), 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::z());
        assert!(!collider.hit_test(&ray).is_hit());
    }
}
