//! # Scene Picker
//!
//! Ray picking against a hierarchy of 3D objects: what does this ray hit,
//! where, and how far away.
//!
//! ## Features
//!
//! - **Exact mesh picking**: Möller-Trumbore per triangle, nearest face wins
//! - **Bounds picking**: Coarse tests against mesh bounding volumes
//! - **Collider groups**: Several parts answering as one pickable surface
//! - **Surface data**: Barycentric weights, texture coordinates and normals
//! - **Scene queries**: Whole-scene, visible-only and reference-frame picks
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_picker::prelude::*;
//!
//! let mut scene = Scene::new();
//! let quad = scene.add_mesh(Mesh::quad(1.0, 1.0));
//! let node = scene.create_node(scene.root(), "panel").unwrap();
//! scene.set_mesh(node, Some(quad)).unwrap();
//! scene
//!     .create_collider(node, Collider::mesh(MeshCollider::new().with_pick_coordinates(true)))
//!     .unwrap();
//!
//! let picker = Picker::new();
//! let ray = Ray::new(Vec3::new(0.25, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = picker.pick_node(&scene, node, &ray);
//! assert!(hit.is_hit());
//! assert!(hit.texture_coords().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod picking;
pub mod scene;

/// Common imports for picker users
pub mod prelude {
    pub use crate::{
        collision::{BoundingVolume, Ray},
        config::{Config, PickerConfig},
        foundation::math::{Mat4, Quat, Transform, Vec2, Vec3},
        picking::{
            BoxCollider, Collider, ColliderGroup, HitListExt, HitResult, MeshBoundsCollider,
            MeshCollider, PickError, Picker, SphereCollider,
        },
        scene::{Mesh, NodeId, PickLayers, Scene, SceneReader},
    };
}
