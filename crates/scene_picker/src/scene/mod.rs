//! Scene graph, mesh resources and pick layers
//!
//! # Module Organization
//!
//! - [`scene_graph`] - Node hierarchy, collider/mesh storage, the reader trait
//! - [`mesh`] - Triangle mesh resource with named attributes
//! - [`layers`] - Layer bits used to filter scene-wide picks

pub mod layers;
pub mod mesh;
pub mod scene_graph;

pub use layers::PickLayers;
pub use mesh::{Mesh, MeshError, TEXCOORD_ATTRIBUTE};
pub use scene_graph::{
    ColliderId, MeshId, NodeId, PickCandidate, Scene, SceneError, SceneNode, SceneReader,
};
