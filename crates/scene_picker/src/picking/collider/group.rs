//! Composite collider
//!
//! A group answers for several child colliders as one pickable surface.
//! Children are tested in the group's model space, so the ray is
//! transformed once for the whole group, not once per child.

use crate::collision::Ray;
use crate::picking::hit::HitResult;
use crate::scene::{ColliderId, SceneReader};

/// Child collider references; the group does not own its children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColliderGroup {
    colliders: Vec<ColliderId>,
}

impl ColliderGroup {
    /// Empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Child colliders in insertion order
    pub fn colliders(&self) -> &[ColliderId] {
        &self.colliders
    }

    /// Whether `collider` is a direct child
    pub fn contains(&self, collider: ColliderId) -> bool {
        self.colliders.contains(&collider)
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the group has no children
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Add a child. Adding the same child twice is a no-op.
    pub(crate) fn add_collider(&mut self, collider: ColliderId) {
        if !self.contains(collider) {
            self.colliders.push(collider);
        }
    }

    /// Remove a child, returning whether it was present
    pub(crate) fn remove_collider(&mut self, collider: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|child| *child != collider);
        self.colliders.len() != before
    }

    /// Nearest child hit for a ray in the group's model space.
    ///
    /// Disabled children and children that no longer resolve are skipped.
    /// A later child only wins with a strictly smaller distance.
    pub(super) fn hit_test_local(&self, scene: &dyn SceneReader, local_ray: &Ray) -> HitResult {
        let mut best = HitResult::miss();
        for &child_id in &self.colliders {
            let Some(child) = scene.collider(child_id) else {
                log::debug!("collider group: child {child_id:?} no longer exists");
                continue;
            };
            if !child.is_enabled() {
                continue;
            }
            let hit = child.hit_test_local(scene, local_ray);
            if hit.is_hit() && hit.distance() < best.distance() {
                best = hit;
            }
        }
        best
    }
}
