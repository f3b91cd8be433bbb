//! Pick queries over a scene
//!
//! Every query is a pure read of the scene: nothing is cached between
//! calls and nothing in the scene is modified. Multi-hit queries return
//! hits in traversal order; sorting is left to the caller (see
//! [`HitListExt`]).

use crate::collision::Ray;
use crate::config::PickerConfig;
use crate::foundation::logging::{debug, trace};
use crate::foundation::math::{affine_inverse, Mat4, Vec3};
use crate::scene::{NodeId, SceneReader};
use super::hit::{HitListExt, HitResult};

/// Ray picking against scene colliders
///
/// # Usage
/// ```
/// # use scene_picker::prelude::*;
/// let mut scene = Scene::new();
/// let node = scene.create_node(scene.root(), "ball").unwrap();
/// scene
///     .create_collider(node, Collider::sphere(SphereCollider::new(Vec3::zeros(), 1.0)))
///     .unwrap();
///
/// let picker = Picker::new();
/// let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::z());
/// let hits = picker.pick_scene(&scene, scene.root(), &ray);
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Picker {
    config: PickerConfig,
}

impl Picker {
    /// Picker with default settings: every layer, no distance limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Picker with explicit settings
    pub fn with_config(config: PickerConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Mutable settings
    pub fn config_mut(&mut self) -> &mut PickerConfig {
        &mut self.config
    }

    /// Test one node's collider against a world-space ray.
    ///
    /// Misses when the node has no collider, or when the node, one of its
    /// ancestors or the collider is disabled. Layer and distance filters
    /// do not apply to single-node tests.
    pub fn pick_node(&self, scene: &dyn SceneReader, node: NodeId, ray: &Ray) -> HitResult {
        let Some(collider_id) = scene.node(node).and_then(|n| n.collider()) else {
            return HitResult::miss().tagged(None, Some(node));
        };
        let Some(collider) = scene.collider(collider_id) else {
            debug!("node {node:?}: collider {collider_id:?} no longer exists");
            return HitResult::miss().tagged(Some(collider_id), Some(node));
        };
        if !collider.is_enabled() || !scene.is_node_active(node) {
            return HitResult::miss().tagged(Some(collider_id), Some(node));
        }
        collider.hit_test(scene, ray)
    }

    /// Test a world-space ray against the bounding volume of a node's mesh.
    ///
    /// Returns the entry point in the node's model space, or `None` on a
    /// miss, for inactive nodes, and for nodes without a mesh.
    pub fn pick_node_bounds(&self, scene: &dyn SceneReader, node: NodeId, ray: &Ray) -> Option<Vec3> {
        if !scene.is_node_active(node) {
            return None;
        }
        let mesh = scene.node_mesh(node)?;
        let inverse = affine_inverse(&scene.world_matrix(node)?)?;
        mesh.bounding_volume().intersect_ray(&ray.transformed(&inverse))
    }

    /// Every collider hit below `root`, in traversal order.
    ///
    /// Each node moves the ray into its own model space. Disabled nodes and
    /// colliders, nodes outside the layer mask, and hits beyond the pick or
    /// configured maximum distance are left out.
    pub fn pick_scene(&self, scene: &dyn SceneReader, root: NodeId, ray: &Ray) -> Vec<HitResult> {
        self.collect(scene, root, ray, false)
    }

    /// [`Self::pick_scene`] with the ray given in a reference frame.
    ///
    /// The ray is moved to world space with `reference`. Without one the
    /// scene's main camera is used, and identity when there is no camera.
    pub fn pick_scene_from(
        &self,
        scene: &dyn SceneReader,
        root: NodeId,
        reference: Option<&Mat4>,
        ray: &Ray,
    ) -> Vec<HitResult> {
        let reference = reference
            .copied()
            .or_else(|| scene.main_camera_matrix())
            .unwrap_or_else(Mat4::identity);
        self.pick_scene(scene, root, &ray.transformed(&reference))
    }

    /// [`Self::pick_scene`] restricted to visible nodes
    pub fn pick_visible(&self, scene: &dyn SceneReader, root: NodeId, ray: &Ray) -> Vec<HitResult> {
        self.collect(scene, root, ray, true)
    }

    /// Nearest scene hit; equal distances resolve to the first in traversal order
    pub fn pick_closest(&self, scene: &dyn SceneReader, root: NodeId, ray: &Ray) -> Option<HitResult> {
        let mut hits = self.pick_scene(scene, root, ray);
        hits.sort_by_distance();
        hits.into_iter().next()
    }

    fn collect(&self, scene: &dyn SceneReader, root: NodeId, ray: &Ray, visible_only: bool) -> Vec<HitResult> {
        let mask = self.config.layers();
        let mut hits = Vec::new();

        for candidate in scene.pick_candidates(root) {
            if !candidate.enabled || (visible_only && !candidate.visible) {
                continue;
            }
            if !candidate.layers.matches_mask(mask) {
                trace!("node {:?} outside layer mask", candidate.node);
                continue;
            }
            let Some(collider) = scene.collider(candidate.collider) else {
                debug!("node {:?}: collider {:?} no longer exists", candidate.node, candidate.collider);
                continue;
            };
            if !collider.is_enabled() {
                continue;
            }

            let hit = collider.hit_test_with_model(scene, Some(&candidate.model_matrix), ray);
            if !hit.is_hit() {
                continue;
            }
            if self.config.respect_pick_distance && !collider.accepts_distance(hit.distance()) {
                trace!("node {:?} hit beyond pick distance", candidate.node);
                continue;
            }
            if !self.config.accepts_distance(hit.distance()) {
                continue;
            }

            trace!("node {:?} hit at distance {}", candidate.node, hit.distance());
            hits.push(hit);
        }

        debug!("pick from {root:?}: {} hit(s)", hits.len());
        hits
    }
}
