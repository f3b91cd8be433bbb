//! Hit results
//!
//! A [`HitResult`] is either a miss, with every geometric field at its
//! sentinel, or a hit with a finite distance and a meaningful position.
//! The fields are private so the two states can never be mixed; optional
//! surface data can only be attached to a hit.

use crate::foundation::math::{Vec2, Vec3};
use crate::scene::{ColliderId, NodeId};

/// Face index reported to flat consumers when there is no face
pub const NO_FACE: i32 = -1;

/// Barycentric sentinel reported to flat consumers
pub const NO_BARYCENTRIC: Vec3 = Vec3::new(-1.0, -1.0, -1.0);

/// Texture coordinate sentinel reported to flat consumers
pub const NO_TEXTURE_COORDS: Vec2 = Vec2::new(-1.0, -1.0);

/// Outcome of one ray test against one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    is_hit: bool,
    position: Vec3,
    distance: f32,
    face_index: Option<usize>,
    barycentric: Option<Vec3>,
    texture_coords: Option<Vec2>,
    normal: Option<Vec3>,
    collider: Option<ColliderId>,
    node: Option<NodeId>,
}

impl Default for HitResult {
    fn default() -> Self {
        Self::miss()
    }
}

impl HitResult {
    /// A miss: position and distance at +infinity, no surface data
    pub const fn miss() -> Self {
        Self {
            is_hit: false,
            position: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            distance: f32::INFINITY,
            face_index: None,
            barycentric: None,
            texture_coords: None,
            normal: None,
            collider: None,
            node: None,
        }
    }

    /// A hit at `position`, `distance` away from the ray origin.
    ///
    /// Non-finite input yields a miss.
    pub fn hit(position: Vec3, distance: f32) -> Self {
        if !distance.is_finite() || distance < 0.0 || position.iter().any(|c| !c.is_finite()) {
            return Self::miss();
        }
        Self {
            is_hit: true,
            position,
            distance,
            ..Self::miss()
        }
    }

    /// Record the face that was hit (ignored on a miss)
    #[must_use]
    pub fn with_face(mut self, face: usize) -> Self {
        if self.is_hit {
            self.face_index = Some(face);
        }
        self
    }

    /// Record barycentric coordinates of the hit (ignored on a miss)
    #[must_use]
    pub fn with_barycentric(mut self, coords: Vec3) -> Self {
        if self.is_hit {
            self.barycentric = Some(coords);
        }
        self
    }

    /// Record interpolated texture coordinates (ignored on a miss)
    #[must_use]
    pub fn with_texture_coords(mut self, coords: Vec2) -> Self {
        if self.is_hit {
            self.texture_coords = Some(coords);
        }
        self
    }

    /// Record the interpolated surface normal (ignored on a miss)
    #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        if self.is_hit {
            self.normal = Some(normal);
        }
        self
    }

    /// Attribute this result to a collider and its owner node
    #[must_use]
    pub fn tagged(mut self, collider: Option<ColliderId>, node: Option<NodeId>) -> Self {
        self.collider = collider;
        self.node = node;
        self
    }

    /// The same attribution with every geometric field reset
    #[must_use]
    pub fn into_miss(self) -> Self {
        Self::miss().tagged(self.collider, self.node)
    }

    /// Whether the ray hit
    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    /// Hit position in the collider's local space (+infinity on a miss)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Distance from the local ray origin (+infinity on a miss)
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Index of the triangle that was hit, for exact mesh hits
    pub fn face_index(&self) -> Option<usize> {
        self.face_index
    }

    /// Face index with [`NO_FACE`] standing in for "none"
    pub fn face_index_or_sentinel(&self) -> i32 {
        self.face_index
            .and_then(|face| i32::try_from(face).ok())
            .unwrap_or(NO_FACE)
    }

    /// Barycentric coordinates of the hit within its face
    pub fn barycentric(&self) -> Option<Vec3> {
        self.barycentric
    }

    /// Interpolated texture coordinates
    pub fn texture_coords(&self) -> Option<Vec2> {
        self.texture_coords
    }

    /// Interpolated vertex normal
    pub fn normal(&self) -> Option<Vec3> {
        self.normal
    }

    /// Collider that produced this result
    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    /// Scene node the collider belongs to
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }
}

/// Ordering helpers for multi-hit query results
pub trait HitListExt {
    /// Stable ascending sort by distance; equal distances keep traversal order
    fn sort_by_distance(&mut self);

    /// Nearest hit; the first one wins on ties
    fn closest(&self) -> Option<&HitResult>;
}

impl HitListExt for [HitResult] {
    fn sort_by_distance(&mut self) {
        self.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    fn closest(&self) -> Option<&HitResult> {
        self.iter()
            .filter(|hit| hit.is_hit)
            .fold(None, |best: Option<&HitResult>, hit| match best {
                Some(current) if current.distance <= hit.distance => Some(current),
                _ => Some(hit),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_has_sentinels() {
        let miss = HitResult::miss();
        assert!(!miss.is_hit());
        assert!(miss.position().iter().all(|c| *c == f32::INFINITY));
        assert_eq!(miss.distance(), f32::INFINITY);
        assert_eq!(miss.face_index_or_sentinel(), NO_FACE);
        assert!(miss.barycentric().is_none());
        assert!(miss.texture_coords().is_none());
        assert!(miss.normal().is_none());
        assert_eq!(HitResult::default(), miss);
    }

    #[test]
    fn test_surface_data_ignored_on_miss() {
        let miss = HitResult::miss()
            .with_face(3)
            .with_barycentric(Vec3::new(0.2, 0.3, 0.5))
            .with_texture_coords(Vec2::new(0.5, 0.5))
            .with_normal(Vec3::z());
        assert_eq!(miss, HitResult::miss());
    }

    #[test]
    fn test_non_finite_hit_is_miss() {
        assert!(!HitResult::hit(Vec3::zeros(), f32::INFINITY).is_hit());
        assert!(!HitResult::hit(Vec3::new(f32::NAN, 0.0, 0.0), 1.0).is_hit());
        assert!(!HitResult::hit(Vec3::zeros(), -1.0).is_hit());
        assert!(HitResult::hit(Vec3::zeros(), 0.0).is_hit());
    }

    #[test]
    fn test_into_miss_resets_geometry() {
        let hit = HitResult::hit(Vec3::x(), 2.0).with_face(1);
        let miss = hit.into_miss();
        assert!(!miss.is_hit());
        assert!(miss.face_index().is_none());
        assert_eq!(miss.distance(), f32::INFINITY);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let mut hits = vec![
            HitResult::hit(Vec3::x(), 3.0).with_face(0),
            HitResult::hit(Vec3::y(), 1.0).with_face(1),
            HitResult::hit(Vec3::z(), 3.0).with_face(2),
            HitResult::hit(Vec3::zeros(), 1.0).with_face(3),
        ];

        hits.sort_by_distance();
        let faces: Vec<_> = hits.iter().filter_map(HitResult::face_index).collect();
        assert_eq!(faces, vec![1, 3, 0, 2]);

        let once = hits.clone();
        hits.sort_by_distance();
        assert_eq!(hits, once);
    }

    #[test]
    fn test_closest_prefers_first_on_tie() {
        let hits = [
            HitResult::miss(),
            HitResult::hit(Vec3::x(), 2.0).with_face(7),
            HitResult::hit(Vec3::y(), 2.0).with_face(8),
            HitResult::hit(Vec3::z(), 5.0).with_face(9),
        ];
        assert_eq!(hits.closest().and_then(HitResult::face_index), Some(7));
        assert!([HitResult::miss()].closest().is_none());
    }
}
