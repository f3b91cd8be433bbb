//! Hit-testable surfaces attached to scene nodes
//!
//! A [`Collider`] wraps one [`ColliderKind`] together with the bookkeeping
//! every variant shares: the handle it was stored under, the node that owns
//! it, an enabled flag and a pick distance. Shape data is kept in the
//! owner's model space; the incoming ray is moved into that space instead
//! of moving the shape out of it.

mod group;
mod mesh;
mod primitive;

pub use group::ColliderGroup;
pub use mesh::{intersect_mesh, MeshBoundsCollider, MeshCollider};
pub use primitive::{BoxCollider, SphereCollider};

use crate::collision::Ray;
use crate::foundation::math::{affine_inverse, Mat4};
use crate::picking::hit::HitResult;
use crate::scene::{ColliderId, Mesh, MeshId, NodeId, SceneReader};

/// Collider variants
#[derive(Debug, Clone)]
pub enum ColliderKind {
    /// Per-triangle test against a mesh
    Mesh(MeshCollider),
    /// Test against a mesh's bounding volume only
    MeshBounds(MeshBoundsCollider),
    /// Nearest hit among child colliders sharing the group's frame
    Group(ColliderGroup),
    /// Axis-aligned box centered on the owner's origin
    Box(BoxCollider),
    /// Sphere in the owner's model space
    Sphere(SphereCollider),
}

/// A hit-testable surface
#[derive(Debug, Clone)]
pub struct Collider {
    kind: ColliderKind,
    handle: Option<ColliderId>,
    owner: Option<NodeId>,
    enabled: bool,
    pick_distance: f32,
}

impl Collider {
    /// Wrap a collider variant. The collider is unattached until a scene
    /// binds it to a node.
    pub fn new(kind: ColliderKind) -> Self {
        Self {
            kind,
            handle: None,
            owner: None,
            enabled: true,
            pick_distance: 0.0,
        }
    }

    /// Exact mesh collider
    pub fn mesh(collider: MeshCollider) -> Self {
        Self::new(ColliderKind::Mesh(collider))
    }

    /// Bounds-only mesh collider
    pub fn mesh_bounds(collider: MeshBoundsCollider) -> Self {
        Self::new(ColliderKind::MeshBounds(collider))
    }

    /// Group collider
    pub fn group(group: ColliderGroup) -> Self {
        Self::new(ColliderKind::Group(group))
    }

    /// Box collider
    pub fn cuboid(collider: BoxCollider) -> Self {
        Self::new(ColliderKind::Box(collider))
    }

    /// Sphere collider
    pub fn sphere(collider: SphereCollider) -> Self {
        Self::new(ColliderKind::Sphere(collider))
    }

    /// Hits farther than `distance` are dropped by scene-wide picks; zero
    /// means no limit
    #[must_use]
    pub fn with_pick_distance(mut self, distance: f32) -> Self {
        self.pick_distance = distance.max(0.0);
        self
    }

    /// Start disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Variant data
    pub fn kind(&self) -> &ColliderKind {
        &self.kind
    }

    /// Mutable variant data
    pub fn kind_mut(&mut self) -> &mut ColliderKind {
        &mut self.kind
    }

    /// Key this collider is stored under
    pub fn handle(&self) -> Option<ColliderId> {
        self.handle
    }

    /// Node this collider is attached to
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Whether this collider takes part in picking
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable picking against this collider
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Maximum accepted hit distance; zero means no limit
    pub fn pick_distance(&self) -> f32 {
        self.pick_distance
    }

    /// Change the maximum accepted hit distance
    pub fn set_pick_distance(&mut self, distance: f32) {
        self.pick_distance = distance.max(0.0);
    }

    /// Whether a hit at `distance` is within this collider's pick distance
    pub fn accepts_distance(&self, distance: f32) -> bool {
        self.pick_distance <= 0.0 || distance <= self.pick_distance
    }

    /// Group data, if this is a group
    pub fn as_group(&self) -> Option<&ColliderGroup> {
        match &self.kind {
            ColliderKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Mutable group data, if this is a group
    pub fn as_group_mut(&mut self) -> Option<&mut ColliderGroup> {
        match &mut self.kind {
            ColliderKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn set_handle(&mut self, handle: Option<ColliderId>) {
        self.handle = handle;
    }

    pub(crate) fn set_owner(&mut self, owner: Option<NodeId>) {
        self.owner = owner;
    }

    /// Test a world-space ray against this collider.
    ///
    /// The ray is moved into the owner's model space first. Without an owner
    /// the ray is used as given, except for groups, which need their owner's
    /// frame and miss instead.
    pub fn hit_test(&self, scene: &dyn SceneReader, world_ray: &Ray) -> HitResult {
        match self.owner {
            Some(owner) => match scene.world_matrix(owner) {
                Some(model) => self.hit_test_with_model(scene, Some(&model), world_ray),
                None => {
                    log::debug!("collider {:?}: owner {:?} has no transform", self.handle, owner);
                    self.miss()
                }
            },
            None => self.hit_test_with_model(scene, None, world_ray),
        }
    }

    /// Test a world-space ray using an already resolved model matrix.
    ///
    /// A singular model matrix is a miss.
    pub fn hit_test_with_model(&self, scene: &dyn SceneReader, model: Option<&Mat4>, world_ray: &Ray) -> HitResult {
        let Some(model) = model else {
            if matches!(self.kind, ColliderKind::Group(_)) {
                return self.miss();
            }
            return self.hit_test_local(scene, world_ray);
        };

        match affine_inverse(model) {
            Some(inverse) => self.hit_test_local(scene, &world_ray.transformed(&inverse)),
            None => {
                log::debug!("collider {:?}: model matrix is not invertible", self.handle);
                self.miss()
            }
        }
    }

    /// Test a ray already expressed in this collider's model space
    pub fn hit_test_local(&self, scene: &dyn SceneReader, local_ray: &Ray) -> HitResult {
        if local_ray.is_degenerate() {
            return self.miss();
        }

        let result = match &self.kind {
            ColliderKind::Mesh(collider) => collider.hit_test(self.resolve_mesh(scene, collider.mesh_id()), local_ray),
            ColliderKind::MeshBounds(collider) => {
                collider.hit_test(self.resolve_mesh(scene, collider.mesh_id()), local_ray)
            }
            ColliderKind::Group(group) => group.hit_test_local(scene, local_ray),
            ColliderKind::Box(collider) => collider.hit_test(local_ray),
            ColliderKind::Sphere(collider) => collider.hit_test(local_ray),
        };
        result.tagged(self.handle, self.owner)
    }

    /// The collider's own mesh if it names one, else the owner's renderable mesh
    fn resolve_mesh<'a>(&self, scene: &'a dyn SceneReader, mesh: Option<MeshId>) -> Option<&'a Mesh> {
        let resolved = match mesh {
            Some(mesh) => scene.mesh(mesh),
            None => self.owner.and_then(|owner| scene.node_mesh(owner)),
        };
        if resolved.is_none() {
            log::debug!("collider {:?}: no mesh to test against", self.handle);
        }
        resolved
    }

    fn miss(&self) -> HitResult {
        HitResult::miss().tagged(self.handle, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::scene::Scene;
    use approx::assert_relative_eq;

    #[test]
    fn test_unattached_collider_uses_ray_as_given() {
        let scene = Scene::new();
        let collider = Collider::sphere(SphereCollider::new(Vec3::zeros(), 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::z());

        let hit = collider.hit_test(&scene, &ray);
        assert!(hit.is_hit());
        assert_relative_eq!(hit.distance(), 4.0, epsilon = 1e-5);
        assert!(hit.node().is_none());
    }

    #[test]
    fn test_unattached_group_misses() {
        let scene = Scene::new();
        let collider = Collider::group(ColliderGroup::new());
        let ray = Ray::new(Vec3::zeros(), Vec3::z());
        assert!(!collider.hit_test(&scene, &ray).is_hit());
    }

    #[test]
    fn test_attached_collider_works_in_model_space() {
        let mut scene = Scene::new();
        let node = scene
            .create_child(scene.root(), "ball", Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let id = scene
            .create_collider(node, Collider::sphere(SphereCollider::new(Vec3::zeros(), 1.0)))
            .unwrap();

        let ray = Ray::new(Vec3::new(10.0, 0.0, -5.0), Vec3::z());
        let hit = scene.collider(id).unwrap().hit_test(&scene, &ray);

        assert!(hit.is_hit());
        assert_eq!(hit.collider(), Some(id));
        assert_eq!(hit.node(), Some(node));
        // Position is reported in the node's model space
        assert_relative_eq!(hit.position(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_scale_owner_is_a_miss() {
        let mut scene = Scene::new();
        let node = scene
            .create_child(scene.root(), "flat", Transform::identity().with_scale(Vec3::new(1.0, 0.0, 1.0)))
            .unwrap();
        let id = scene.create_collider(node, Collider::cuboid(BoxCollider::new(Vec3::repeat(1.0)))).unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::z());
        let hit = scene.collider(id).unwrap().hit_test(&scene, &ray);
        assert!(!hit.is_hit());
        assert_eq!(hit.collider(), Some(id));
    }

    #[test]
    fn test_pick_distance_acceptance() {
        let collider = Collider::sphere(SphereCollider::new(Vec3::zeros(), 1.0));
        assert!(collider.accepts_distance(1e9));

        let limited = collider.with_pick_distance(3.0);
        assert!(limited.accepts_distance(3.0));
        assert!(!limited.accepts_distance(3.5));
    }
}
