//! Scene graph reader trait and the slotmap-backed scene
//!
//! The picker only ever reads the graph through [`SceneReader`]. [`Scene`]
//! is the concrete graph: it owns nodes, colliders and meshes in
//! generational arenas, so every cross reference is a key that simply stops
//! resolving once its referent is gone.

use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat4, Transform};
use crate::picking::collider::Collider;
use super::layers::PickLayers;
use super::mesh::Mesh;

new_key_type! {
    /// Handle to a scene node
    pub struct NodeId;

    /// Handle to a collider stored in a scene
    pub struct ColliderId;

    /// Handle to a mesh resource stored in a scene
    pub struct MeshId;
}

/// Errors raised while editing a scene
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Node key does not resolve
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Collider key does not resolve
    #[error("unknown collider {0:?}")]
    UnknownCollider(ColliderId),

    /// Mesh key does not resolve
    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshId),

    /// Group operation on a collider that is not a group
    #[error("collider {0:?} is not a group")]
    NotAGroup(ColliderId),

    /// Adding the child would make a group contain itself
    #[error("adding {child:?} to group {group:?} would create a cycle")]
    GroupCycle {
        /// Group being edited
        group: ColliderId,
        /// Collider being added
        child: ColliderId,
    },

    /// The root node cannot be removed
    #[error("the root node cannot be removed")]
    RemoveRoot,
}

/// A node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display name, used in logs
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Transform,
    /// Disabled nodes (and their subtrees) are never picked
    pub enabled: bool,
    /// Invisible nodes (and their subtrees) are skipped by visible-only picks
    pub visible: bool,
    /// Layers matched against the picker's layer mask
    pub layers: PickLayers,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    mesh: Option<MeshId>,
    collider: Option<ColliderId>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            enabled: true,
            visible: true,
            layers: PickLayers::default(),
            parent,
            children: Vec::new(),
            mesh: None,
            collider: None,
        }
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Renderable mesh of this node
    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    /// Collider attached to this node
    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }
}

/// A collider-bearing node as seen by a scene-wide pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickCandidate {
    /// The node
    pub node: NodeId,
    /// Its collider
    pub collider: ColliderId,
    /// Resolved local-to-world matrix
    pub model_matrix: Mat4,
    /// Node and every ancestor enabled
    pub enabled: bool,
    /// Node and every ancestor visible
    pub visible: bool,
    /// Node layers
    pub layers: PickLayers,
}

/// Read-only view of a scene used by colliders and the picker
pub trait SceneReader {
    /// Look up a node
    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    /// Look up a collider
    fn collider(&self, id: ColliderId) -> Option<&Collider>;

    /// Look up a mesh resource
    fn mesh(&self, id: MeshId) -> Option<&Mesh>;

    /// Local-to-world matrix of a node
    fn world_matrix(&self, id: NodeId) -> Option<Mat4>;

    /// Every collider-bearing node reachable from `root`, in depth-first
    /// pre-order with children visited in insertion order
    fn pick_candidates(&self, root: NodeId) -> Vec<PickCandidate>;

    /// World matrix of the main camera, if one is set
    fn main_camera_matrix(&self) -> Option<Mat4>;

    /// Mesh rendered by a node
    fn node_mesh(&self, id: NodeId) -> Option<&Mesh> {
        self.node(id)?.mesh().and_then(|mesh| self.mesh(mesh))
    }

    /// Whether the node and all of its ancestors are enabled
    fn is_node_active(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.node(node_id) {
                Some(node) if node.enabled => current = node.parent(),
                _ => return false,
            }
        }
        true
    }
}

/// Scene hierarchy owning nodes, colliders and meshes
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
    colliders: SlotMap<ColliderId, Collider>,
    meshes: SlotMap<MeshId, Mesh>,
    root: NodeId,
    main_camera: Option<NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene containing only a root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root", None));
        Self {
            nodes,
            colliders: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
            root,
            main_camera: None,
        }
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored colliders, attached or not
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Create a node under `parent`
    pub fn create_node(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.nodes.insert(SceneNode::new(name, Some(parent)));
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Create a node under `parent` with a local transform
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        let id = self.create_node(parent, name)?;
        self.nodes[id].transform = transform;
        Ok(id)
    }

    /// Mutable access to a node's public fields
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Replace a node's local transform
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))?.transform = transform;
        Ok(())
    }

    /// Store a mesh resource
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.insert(mesh)
    }

    /// Set (or clear) the mesh a node renders
    pub fn set_mesh(&mut self, node: NodeId, mesh: Option<MeshId>) -> Result<(), SceneError> {
        if let Some(mesh) = mesh {
            if !self.meshes.contains_key(mesh) {
                return Err(SceneError::UnknownMesh(mesh));
            }
        }
        self.nodes.get_mut(node).ok_or(SceneError::UnknownNode(node))?.mesh = mesh;
        Ok(())
    }

    /// Remove a mesh resource; nodes and colliders referring to it stop resolving it
    pub fn remove_mesh(&mut self, mesh: MeshId) -> Option<Mesh> {
        self.meshes.remove(mesh)
    }

    /// Store a collider without attaching it to a node
    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        let id = self.colliders.insert(collider);
        let stored = &mut self.colliders[id];
        stored.set_handle(Some(id));
        stored.set_owner(None);
        id
    }

    /// Store a collider and attach it to `node`
    pub fn create_collider(&mut self, node: NodeId, collider: Collider) -> Result<ColliderId, SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::UnknownNode(node));
        }
        let id = self.add_collider(collider);
        self.attach_collider(node, id)?;
        Ok(id)
    }

    /// Attach a stored collider to a node.
    ///
    /// Any collider the node already had is detached and returned. A
    /// collider attached elsewhere is moved.
    pub fn attach_collider(&mut self, node: NodeId, collider: ColliderId) -> Result<Option<ColliderId>, SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::UnknownNode(node));
        }
        let previous_owner = self
            .colliders
            .get(collider)
            .ok_or(SceneError::UnknownCollider(collider))?
            .owner();

        if previous_owner == Some(node) && self.holds_collider(node, collider) {
            return Ok(None);
        }
        if let Some(previous_owner) = previous_owner {
            if self.holds_collider(previous_owner, collider) {
                self.detach_collider(previous_owner);
            }
        }
        let replaced = self.detach_collider(node);

        self.nodes[node].collider = Some(collider);
        self.colliders[collider].set_owner(Some(node));
        log::trace!("attached collider {:?} to node '{}'", collider, self.nodes[node].name);
        Ok(replaced)
    }

    /// Detach a node's collider, keeping it stored
    pub fn detach_collider(&mut self, node: NodeId) -> Option<ColliderId> {
        let collider = self.nodes.get_mut(node)?.collider.take()?;
        if let Some(stored) = self.colliders.get_mut(collider) {
            stored.set_owner(None);
        }
        Some(collider)
    }

    /// Detach and drop a collider. Groups referring to it skip it from now on.
    pub fn remove_collider(&mut self, collider: ColliderId) -> Option<Collider> {
        if let Some(owner) = self.colliders.get(collider)?.owner() {
            if self.holds_collider(owner, collider) {
                self.detach_collider(owner);
            }
        }
        let mut removed = self.colliders.remove(collider)?;
        removed.set_handle(None);
        Some(removed)
    }

    fn holds_collider(&self, node: NodeId, collider: ColliderId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.collider == Some(collider))
    }

    /// Mutable access to a stored collider
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id)
    }

    /// Add `child` to the group collider `group`
    pub fn add_to_group(&mut self, group: ColliderId, child: ColliderId) -> Result<(), SceneError> {
        if !self.colliders.contains_key(child) {
            return Err(SceneError::UnknownCollider(child));
        }
        if self
            .colliders
            .get(group)
            .ok_or(SceneError::UnknownCollider(group))?
            .as_group()
            .is_none()
        {
            return Err(SceneError::NotAGroup(group));
        }
        if self.group_reaches(child, group) {
            return Err(SceneError::GroupCycle { group, child });
        }
        if let Some(members) = self.colliders[group].as_group_mut() {
            members.add_collider(child);
        }
        Ok(())
    }

    /// Remove `child` from the group collider `group`
    pub fn remove_from_group(&mut self, group: ColliderId, child: ColliderId) -> Result<bool, SceneError> {
        self.colliders
            .get_mut(group)
            .ok_or(SceneError::UnknownCollider(group))?
            .as_group_mut()
            .map(|members| members.remove_collider(child))
            .ok_or(SceneError::NotAGroup(group))
    }

    /// Whether `target` is `from` or reachable through group membership
    fn group_reaches(&self, from: ColliderId, target: ColliderId) -> bool {
        let mut pending = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(group) = self.colliders.get(current).and_then(Collider::as_group) {
                pending.extend_from_slice(group.colliders());
            }
        }
        false
    }

    /// Remove a node and its subtree, destroying their colliders first
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RemoveRoot);
        }
        let parent = self.nodes.get(id).ok_or(SceneError::UnknownNode(id))?.parent;
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent.children.retain(|child| *child != id);
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(collider) = self.detach_collider(current) {
                self.colliders.remove(collider);
            }
            if self.main_camera == Some(current) {
                self.main_camera = None;
            }
            if let Some(node) = self.nodes.remove(current) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Node whose world transform is the default pick reference frame
    pub fn set_main_camera(&mut self, camera: Option<NodeId>) -> Result<(), SceneError> {
        if let Some(camera) = camera {
            if !self.nodes.contains_key(camera) {
                return Err(SceneError::UnknownNode(camera));
            }
        }
        self.main_camera = camera;
        Ok(())
    }

    /// Current main camera node
    pub fn main_camera(&self) -> Option<NodeId> {
        self.main_camera
    }
}

impl SceneReader for Scene {
    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(id)?;
        let mut matrix = node.transform.to_matrix();
        let mut parent = node.parent;
        while let Some(parent_id) = parent {
            let parent_node = self.nodes.get(parent_id)?;
            matrix = parent_node.transform.to_matrix() * matrix;
            parent = parent_node.parent;
        }
        Some(matrix)
    }

    fn pick_candidates(&self, root: NodeId) -> Vec<PickCandidate> {
        let mut candidates = Vec::new();
        let Some(root_node) = self.nodes.get(root) else {
            return candidates;
        };

        // Inherited state from the root's ancestors
        let parent_matrix = root_node
            .parent
            .and_then(|parent| self.world_matrix(parent))
            .unwrap_or_else(Mat4::identity);
        let inherited_enabled = root_node.parent.map_or(true, |parent| self.is_node_active(parent));
        let inherited_visible = self.ancestors_visible(root_node.parent);

        let mut stack = vec![(root, parent_matrix, inherited_enabled, inherited_visible)];
        while let Some((id, parent_matrix, parent_enabled, parent_visible)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let model_matrix = parent_matrix * node.transform.to_matrix();
            let enabled = parent_enabled && node.enabled;
            let visible = parent_visible && node.visible;

            if let Some(collider) = node.collider {
                candidates.push(PickCandidate {
                    node: id,
                    collider,
                    model_matrix,
                    enabled,
                    visible,
                    layers: node.layers,
                });
            }

            // Reverse so the first child is popped first
            for child in node.children.iter().rev() {
                stack.push((*child, model_matrix, enabled, visible));
            }
        }
        candidates
    }

    fn main_camera_matrix(&self) -> Option<Mat4> {
        self.main_camera.and_then(|camera| self.world_matrix(camera))
    }
}

impl Scene {
    fn ancestors_visible(&self, mut current: Option<NodeId>) -> bool {
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }
}
