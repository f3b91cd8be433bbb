//! Ray picking
//!
//! # Module Organization
//!
//! - [`hit`] - Hit result value type and ordering helpers
//! - [`collider`] - Collider variants and their hit tests
//! - [`picker`] - Single-node and scene-wide pick queries
//! - [`readback`] - Flat `f32` buffer boundary for host bindings

pub mod collider;
pub mod hit;
pub mod picker;
pub mod readback;

#[cfg(test)]
mod tests;

pub use collider::{
    BoxCollider, Collider, ColliderGroup, ColliderKind, MeshBoundsCollider, MeshCollider, SphereCollider,
};
pub use hit::{HitListExt, HitResult, NO_BARYCENTRIC, NO_FACE, NO_TEXTURE_COORDS};
pub use picker::Picker;
pub use readback::PickError;
