//! Geometric intersection primitives
//!
//! Stateless building blocks for the colliders.
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, triangles, barycentric solver, spheres
//! - [`bounds`] - Axis-aligned bounding volumes

pub mod bounds;
pub mod primitives;

pub use bounds::BoundingVolume;
pub use primitives::{barycentric, BoundingSphere, Ray, Triangle, TriangleHit, TRIANGLE_EPSILON};
