use serde::{Deserialize, Serialize};

/// Scene layer. Controls z-order for elements.
///
/// Layers are drawn back-to-front: Sky first, Overlay last.
/// The growing tree sits above all backdrop layers, its halo just behind it;
/// the info panel above everything.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum SceneLayer {
    #[default]
    Sky = 0,
    Celestial = 1,
    Clouds = 2,
    Precipitation = 3,
    Seasonal = 4,
    Ground = 5,
    /// Soft light behind the canopy.
    Halo = 6,
    Tree = 7,
    Overlay = 8,
}

impl SceneLayer {
    /// Total number of scene layers.
    pub const COUNT: usize = 9;

    /// Every layer, back to front.
    pub const ALL: [SceneLayer; Self::COUNT] = [
        Self::Sky,
        Self::Celestial,
        Self::Clouds,
        Self::Precipitation,
        Self::Seasonal,
        Self::Ground,
        Self::Halo,
        Self::Tree,
        Self::Overlay,
    ];

    /// Convert from a u8 z-index. Returns None if out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Z-index for hosts that stack DOM nodes or canvases.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_back_to_front() {
        for pair in SceneLayer::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(SceneLayer::Ground < SceneLayer::Halo);
        assert!(SceneLayer::Halo < SceneLayer::Tree);
    }

    #[test]
    fn z_index_matches_position() {
        for (i, layer) in SceneLayer::ALL.iter().enumerate() {
            assert_eq!(layer.as_u8() as usize, i);
            assert_eq!(SceneLayer::from_u8(i as u8), Some(*layer));
        }
        assert!(SceneLayer::from_u8(9).is_none());
    }
}
