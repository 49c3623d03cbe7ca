use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dimensions of the toroidal world. Valid positions live in
/// `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        WorldBounds { width, height }
    }

    /// Checks whether `position` is inside the half-open world rectangle.
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0 && position.x < self.width && position.y >= 0.0 && position.y < self.height
    }

    /// Snaps a position that left the world onto the opposite edge.
    ///
    /// Each axis is handled on its own. This is a teleport, not a modulo: an
    /// agent that overshoots by several units still lands exactly on the edge.
    #[inline]
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    /// Uniformly samples a point inside the world.
    pub fn sample_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(rng.gen_range(0.0..self.width), rng.gen_range(0.0..self.height))
    }
}

#[inline]
fn wrap_axis(coordinate: f32, extent: f32) -> f32 {
    if coordinate < 0.0 {
        far_edge(extent)
    } else if coordinate >= extent {
        0.0
    } else {
        coordinate
    }
}

/// Largest `f32` strictly below `extent` (which must be positive and finite).
#[inline]
fn far_edge(extent: f32) -> f32 {
    f32::from_bits(extent.to_bits() - 1)
}
