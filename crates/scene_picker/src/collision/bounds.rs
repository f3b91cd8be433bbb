//! Bounding volumes
//!
//! An axis-aligned box with its enclosing sphere, built by expanding over
//! points. The ray test is the slab method against the box.

use crate::foundation::math::{Mat4, Point3, Vec3};
use super::primitives::{BoundingSphere, Ray};

/// Axis-aligned bounding box plus enclosing sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    min: Vec3,
    max: Vec3,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingVolume {
    /// A volume containing nothing; grows with [`Self::expand`]
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Volume spanning two corners (order-independent)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Box of the given half extents centered on `center`
    pub fn from_center_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self::new(center - half_extents, center + half_extents)
    }

    /// Smallest volume containing every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut volume = Self::empty();
        for point in points {
            volume.expand(point);
        }
        volume
    }

    /// Grow to include a point
    pub fn expand(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Minimum corner
    pub fn min_corner(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max_corner(&self) -> Vec3 {
        self.max
    }

    /// True until at least one point was added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the box (origin when empty)
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Radius of the sphere through the box corners (zero when empty)
    pub fn radius(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            (self.max - self.min).magnitude() * 0.5
        }
    }

    /// Enclosing sphere
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.radius())
    }

    /// Axis-aligned volume enclosing this box after `matrix` is applied
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.expand(&matrix.transform_point(&Point3::from(corner)).coords);
        }
        out
    }

    /// Entry point of a ray into the box.
    ///
    /// Empty and zero-size volumes never hit. When the origin is inside
    /// the box the entry point is the origin itself.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        if self.is_empty() || self.radius() == 0.0 || ray.is_degenerate() {
            return None;
        }

        let inv_dir = Vec3::new(
            slab_reciprocal(ray.direction.x),
            slab_reciprocal(ray.direction.y),
            slab_reciprocal(ray.direction.z),
        );

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            if ray.direction[axis] == 0.0 {
                // Parallel to this slab: must already be between its planes
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (self.min[axis] - origin) * inv_dir[axis];
            let t2 = (self.max[axis] - origin) * inv_dir[axis];
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(ray.point_at(t_min.max(0.0)))
    }
}

fn slab_reciprocal(component: f32) -> f32 {
    if component == 0.0 {
        f32::INFINITY
    } else {
        1.0 / component
    }
}
