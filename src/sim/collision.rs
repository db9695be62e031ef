//! Axis-aligned overlap tests between the player and world entities
//!
//! Everything in the runner is a screen-space box (y grows down), so collision
//! is plain AABB overlap with an optional inward padding that forgives sprites
//! whose corners merely graze.

use glam::Vec2;

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// Overlap test with `pad` shaved off every side of `other`
///
/// Touching edges do not count as overlap.
pub fn overlaps_padded(player: &Aabb, other: &Aabb, pad: f32) -> bool {
    player.left() < other.right() - pad
        && player.right() > other.left() + pad
        && player.top() < other.bottom() - pad
        && player.bottom() > other.top() + pad
}

/// Whether the obstacle's trailing edge has moved behind the player's leading edge
pub fn has_cleared(player: &Aabb, obstacle: &Aabb) -> bool {
    obstacle.right() < player.left()
}

/// Clearance gaps when an obstacle passes the player: (vertical, horizontal)
///
/// Vertical is the space between the player's feet and the obstacle's top,
/// horizontal is the space between the obstacle's trailing edge and the player.
pub fn clearance(player: &Aabb, obstacle: &Aabb) -> (f32, f32) {
    let vertical = obstacle.top() - player.bottom();
    let horizontal = player.left() - obstacle.right();
    (vertical, horizontal)
}

/// A pass counts as a near miss if either gap is non-negative and under its limit
pub fn is_near_miss(player: &Aabb, obstacle: &Aabb, vertical_limit: f32, horizontal_limit: f32) -> bool {
    let (v_gap, h_gap) = clearance(player, obstacle);
    (v_gap >= 0.0 && v_gap < vertical_limit) || (h_gap >= 0.0 && h_gap < horizontal_limit)
}

/// Displacement pulling `item` toward `target` when within `radius`
///
/// Covers `pull` of the remaining distance per reference frame, so items
/// approach exponentially and never overshoot.
pub fn magnet_pull(item: Vec2, target: Vec2, radius: f32, pull: f32, delta: f32) -> Option<Vec2> {
    let offset = target - item;
    if offset.length() >= radius {
        return None;
    }
    let fraction = (1.0 - crate::decay(1.0 - pull.clamp(0.0, 1.0), delta)).clamp(0.0, 1.0);
    Some(offset * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Aabb {
        Aabb::new(Vec2::new(80.0, 312.0), Vec2::splat(48.0))
    }

    #[test]
    fn test_overlap_respects_padding() {
        let p = player();
        // Obstacle whose left edge pokes 4 px into the player: inside the 6 px padding
        let grazing = Aabb::new(Vec2::new(124.0, 320.0), Vec2::new(30.0, 40.0));
        assert!(overlaps_padded(&p, &grazing, 0.0));
        assert!(!overlaps_padded(&p, &grazing, 6.0));

        let solid = Aabb::new(Vec2::new(110.0, 320.0), Vec2::new(30.0, 40.0));
        assert!(overlaps_padded(&p, &solid, 6.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let p = player();
        let adjacent = Aabb::new(Vec2::new(128.0, 312.0), Vec2::splat(26.0));
        assert!(!overlaps_padded(&p, &adjacent, 0.0));
    }

    #[test]
    fn test_near_miss_vertical_clearance() {
        // Player 10 px above a 30 px obstacle that just passed
        let p = Aabb::new(Vec2::new(80.0, 272.0), Vec2::splat(48.0));
        let o = Aabb::new(Vec2::new(20.0, 330.0), Vec2::new(28.0, 30.0));
        assert!(has_cleared(&p, &o));
        assert!(is_near_miss(&p, &o, 18.0, 14.0));
    }

    #[test]
    fn test_far_pass_is_not_near_miss() {
        let p = Aabb::new(Vec2::new(80.0, 150.0), Vec2::splat(48.0));
        let o = Aabb::new(Vec2::new(30.0, 330.0), Vec2::new(28.0, 30.0));
        assert!(!is_near_miss(&p, &o, 18.0, 14.0));
    }

    #[test]
    fn test_magnet_pull_approaches_without_overshoot() {
        let item = Vec2::new(200.0, 100.0);
        let target = Vec2::new(100.0, 100.0);
        let step = magnet_pull(item, target, 220.0, 0.07, 1.0).unwrap();
        assert!((step.x - (-7.0)).abs() < 1e-3);

        // A huge delta still lands short of the target
        let step = magnet_pull(item, target, 220.0, 0.07, 1000.0).unwrap();
        assert!((item + step - target).length() <= 100.0);
        assert!(step.x >= -100.0);
    }

    #[test]
    fn test_magnet_out_of_range() {
        assert!(magnet_pull(Vec2::new(400.0, 0.0), Vec2::ZERO, 220.0, 0.07, 1.0).is_none());
    }
}
