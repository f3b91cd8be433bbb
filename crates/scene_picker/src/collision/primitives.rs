//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (rays, spheres, triangles) with
//! the intersection tests the colliders are built from. Everything here is
//! a pure function of its inputs.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Determinant and distance threshold for ray-triangle tests
pub const TRIANGLE_EPSILON: f32 = 1e-5;

/// A ray for ray casting and picking
///
/// The direction is kept as given; it does not need to be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Move this ray into another coordinate frame.
    ///
    /// The origin is transformed as a point and the direction as a vector,
    /// so passing a node's inverse model matrix yields the node-local ray.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let origin = matrix.transform_point(&Point3::from(self.origin));
        let direction = matrix.transform_vector(&self.direction);
        Self {
            origin: origin.coords,
            direction,
        }
    }

    /// A ray that cannot hit anything: zero-length or non-finite direction
    pub fn is_degenerate(&self) -> bool {
        !utils::is_finite(&self.origin)
            || !utils::is_finite(&self.direction)
            || self.direction.magnitude_squared() == 0.0
    }
}

/// Result of a ray-triangle intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter at the hit, in the ray's own units
    pub t: f32,
    /// First barycentric parameter (weight of `v1`)
    pub u: f32,
    /// Second barycentric parameter (weight of `v2`)
    pub v: f32,
    /// Hit position, `(1 - u - v) * v0 + u * v1 + v * v2`
    pub position: Vec3,
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Near-parallel rays (|det| < [`TRIANGLE_EPSILON`]) and hits with
    /// `t <= TRIANGLE_EPSILON` are misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<TriangleHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let p = ray.direction.cross(&edge2);
        let det = edge1.dot(&p);

        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = s.dot(&p) * inv_det;

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = ray.direction.dot(&q) * inv_det;

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        if t > TRIANGLE_EPSILON {
            let position = self.v0 * (1.0 - u - v) + self.v1 * u + self.v2 * v;
            Some(TriangleHit { t, u, v, position })
        } else {
            None
        }
    }

    /// Barycentric coordinates of a point on this triangle's plane
    pub fn barycentric(&self, point: Vec3) -> Option<Vec3> {
        barycentric(point, self.v0, self.v1, self.v2)
    }
}

/// Barycentric coordinates `(u, v, w)` of `p` with respect to `a`, `b`, `c`.
///
/// Ericson's closed form: solves the 2x2 system for `(v, w)` and derives
/// `u = 1 - v - w`. `p` is assumed to lie on the triangle's plane. Returns
/// `None` for a degenerate (zero-area) triangle.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;
    // Relative to the edge lengths so small triangles are not rejected
    if denom.abs() <= f32::EPSILON * d00 * d11 {
        return None;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    if !v.is_finite() || !w.is_finite() {
        return None;
    }
    Some(Vec3::new(1.0 - v - w, v, w))
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test ray intersection with this sphere.
    ///
    /// Returns the nearest hit point in front of the origin (the origin
    /// itself when it starts inside). A zero or negative radius never hits.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        if self.radius <= 0.0 || ray.is_degenerate() {
            return None;
        }

        // Solve: |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        let t = if t1 >= 0.0 {
            t1
        } else if t2 >= 0.0 {
            0.0 // origin inside the sphere
        } else {
            return None;
        };

        Some(ray.point_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_ray_hits_triangle_interior() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = unit_triangle().intersect_ray(&ray).expect("ray crosses the interior");

        assert_relative_eq!(hit.t, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.position, Vec3::new(0.25, 0.25, 0.0), epsilon = 1e-5);

        let coords = unit_triangle().barycentric(hit.position).unwrap();
        assert_relative_eq!(coords, Vec3::new(0.5, 0.25, 0.25), epsilon = 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses_from_any_origin() {
        let triangle = unit_triangle();
        for origin in [
            Vec3::new(0.25, 0.25, 0.0),
            Vec3::new(0.25, 0.25, 1.0),
            Vec3::new(-3.0, 2.0, -7.0),
        ] {
            let ray = Ray::new(origin, Vec3::new(1.0, 1.0, 0.0));
            assert!(triangle.intersect_ray(&ray).is_none(), "origin {origin:?}");
        }
    }

    #[test]
    fn test_triangle_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_origin_on_triangle_is_not_self_hit() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_outside_edges_misses() {
        let ray = Ray::new(Vec3::new(0.8, 0.8, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_barycentric_sums_to_one_inside() {
        let triangle = Triangle::new(
            Vec3::new(-1.0, 0.5, 2.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(0.5, 4.0, 1.0),
        );
        let steps = 6;
        for i in 0..=steps {
            for j in 0..=(steps - i) {
                let u = i as f32 / steps as f32;
                let v = j as f32 / steps as f32;
                let point = triangle.v0 * (1.0 - u - v) + triangle.v1 * u + triangle.v2 * v;

                let coords = triangle.barycentric(point).unwrap();
                assert_relative_eq!(coords.sum(), 1.0, epsilon = 1e-4);
                for component in coords.iter() {
                    assert!((-1e-4..=1.0 + 1e-4).contains(component));
                }
            }
        }
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert!(barycentric(p, Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0).is_none());
    }

    #[test]
    fn test_barycentric_small_triangle() {
        let (a, b, c) = (Vec3::zeros(), Vec3::new(0.01, 0.0, 0.0), Vec3::new(0.0, 0.01, 0.0));
        let coords = barycentric(Vec3::new(0.0025, 0.0025, 0.0), a, b, c).unwrap();
        assert_relative_eq!(coords, Vec3::new(0.5, 0.25, 0.25), epsilon = 1e-3);
        assert!(barycentric(a, a, a, a).is_none());
    }

    #[test]
    fn test_ray_transform_round_trip() {
        use crate::foundation::math::{affine_inverse, Quat, Transform};

        let model = Transform::from_position_rotation(
            Vec3::new(3.0, -1.0, 2.0),
            Quat::from_axis_angle(&Vec3::x_axis(), 1.1),
        )
        .with_scale(Vec3::new(2.0, 0.5, 1.5))
        .to_matrix();
        let inverse = affine_inverse(&model).unwrap();

        let ray = Ray::new(Vec3::new(0.3, 4.0, -2.0), Vec3::new(0.2, -1.0, 0.7));
        let round_trip = ray.transformed(&inverse).transformed(&model);

        assert_relative_eq!(round_trip.origin, ray.origin, epsilon = 1e-4);
        assert_relative_eq!(round_trip.direction, ray.direction, epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_ray_intersection() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 2.0));
        let hit = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(hit, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-5);

        let away = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.intersect_ray(&away).is_none());

        let inside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::x());
        assert_relative_eq!(sphere.intersect_ray(&inside).unwrap(), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_zero_direction_is_degenerate() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_degenerate());
        assert!(!Ray::new(Vec3::zeros(), Vec3::z()).is_degenerate());
    }
}
