//! Pick layers for filtering which nodes a query may hit
//!
//! Mirrors the usual engine layer scheme: a node carries a set of layer bits
//! and a query carries a mask; the node is a candidate when they intersect.

use bitflags::bitflags;

bitflags! {
    /// Layer bits attached to a scene node
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PickLayers: u32 {
        /// World objects layer (bit 0)
        const WORLD = 0b0001;
        /// UI elements layer (bit 1)
        const UI = 0b0010;
        /// Debug gizmos layer (bit 2)
        const GIZMO = 0b0100;
        /// Effects layer (bit 3)
        const EFFECTS = 0b1000;
        /// Every layer, including user-defined bits
        const ALL = u32::MAX;
    }
}

impl PickLayers {
    /// Check if these layers match a query mask
    pub fn matches_mask(self, mask: Self) -> bool {
        self.intersects(mask)
    }
}

impl Default for PickLayers {
    fn default() -> Self {
        Self::WORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_matching() {
        let layers = PickLayers::WORLD | PickLayers::GIZMO;

        assert!(layers.matches_mask(PickLayers::WORLD));
        assert!(layers.matches_mask(PickLayers::GIZMO));
        assert!(!layers.matches_mask(PickLayers::UI));
        assert!(layers.matches_mask(PickLayers::WORLD | PickLayers::UI));
    }

    #[test]
    fn test_all_matches_user_bits() {
        let custom = PickLayers::from_bits_retain(1 << 20);
        assert!(custom.matches_mask(PickLayers::ALL));
        assert!(!custom.matches_mask(PickLayers::WORLD));
        assert!(!PickLayers::empty().matches_mask(PickLayers::ALL));
    }
}
