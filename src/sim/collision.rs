//! Collision detection between the player and raindrops
//!
//! Everything is axis-aligned. The player's hitbox is a centered, shrunk copy
//! of its full bounds so grazing contacts with the sprite's transparent edges
//! don't end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Raindrop;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Scale by `factor` around the center
    ///
    /// The inset on each side is `(1 - factor) / 2` of the extent.
    pub fn shrunk(&self, factor: f32) -> Self {
        let size = self.size * factor;
        Self {
            pos: self.pos + (self.size - size) / 2.0,
            size,
        }
    }

    /// Standard AABB test: strict separation on either axis means no overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min().x < other.max().x
            && self.max().x > other.min().x
            && self.min().y < other.max().y
            && self.max().y > other.min().y
    }
}

/// Index of the first raindrop (in spawn order) overlapping `hitbox`
///
/// Ties go to the earliest spawned raindrop, not the nearest one.
pub fn first_collision(hitbox: &Rect, raindrops: &[Raindrop]) -> Option<usize> {
    raindrops
        .iter()
        .position(|drop| hitbox.overlaps(&drop.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drop_at(id: u32, x: f32, y: f32) -> Raindrop {
        Raindrop::new(id, Vec2::new(x, y), Vec2::splat(50.0))
    }

    #[test]
    fn test_shrunk_is_centered() {
        let player = Rect::new(Vec2::new(100.0, 200.0), Vec2::new(100.0, 50.0));
        let hitbox = player.shrunk(0.6);
        assert!((hitbox.pos.x - 120.0).abs() < 1e-4);
        assert!((hitbox.pos.y - 210.0).abs() < 1e-4);
        assert!((hitbox.size.x - 60.0).abs() < 1e-4);
        assert!((hitbox.size.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Rect::new(Vec2::new(9.9, 9.9), Vec2::splat(10.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_graze_outside_hitbox_is_ignored() {
        // Raindrop touches the full player bounds but not the 60% hitbox
        let player = Rect::new(Vec2::new(100.0, 100.0), Vec2::splat(100.0));
        let hitbox = player.shrunk(0.6);
        let drops = [drop_at(1, 55.0, 100.0)];
        assert!(player.overlaps(&drops[0].bounds()));
        assert_eq!(first_collision(&hitbox, &drops), None);
    }

    #[test]
    fn test_first_in_spawn_order_wins() {
        let hitbox = Rect::new(Vec2::new(100.0, 100.0), Vec2::splat(60.0));
        let drops = [
            drop_at(1, 0.0, 0.0),
            // Barely overlapping, spawned first
            drop_at(2, 51.0, 51.0),
            // Dead center, spawned later
            drop_at(3, 105.0, 105.0),
        ];
        assert_eq!(first_collision(&hitbox, &drops), Some(1));
    }

    #[test]
    fn test_empty_collection_never_collides() {
        let hitbox = Rect::new(Vec2::ZERO, Vec2::splat(60.0));
        assert_eq!(first_collision(&hitbox, &[]), None);
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_formula(
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            pw in 0.0f32..200.0, ph in 0.0f32..200.0,
            ox in -500.0f32..500.0, oy in -500.0f32..500.0,
            ow in 0.0f32..200.0, oh in 0.0f32..200.0,
        ) {
            let hitbox = Rect::new(Vec2::new(px, py), Vec2::new(pw, ph)).shrunk(0.6);
            let object = Rect::new(Vec2::new(ox, oy), Vec2::new(ow, oh));
            let (cx, cy, cw, ch) = (hitbox.pos.x, hitbox.pos.y, hitbox.size.x, hitbox.size.y);
            let expected = cx < ox + ow && cx + cw > ox && cy < oy + oh && cy + ch > oy;
            prop_assert_eq!(hitbox.overlaps(&object), expected);
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            size in 1.0f32..80.0,
        ) {
            let a = Rect::new(Vec2::new(ax, ay), Vec2::splat(size));
            let b = Rect::new(Vec2::new(bx, by), Vec2::splat(size));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_hitbox_stays_inside_bounds(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 0.0f32..300.0, h in 0.0f32..300.0,
            factor in 0.0f32..=1.0,
        ) {
            let bounds = Rect::new(Vec2::new(x, y), Vec2::new(w, h));
            let hitbox = bounds.shrunk(factor);
            prop_assert!(hitbox.min().x >= bounds.min().x - 1e-3);
            prop_assert!(hitbox.min().y >= bounds.min().y - 1e-3);
            prop_assert!(hitbox.max().x <= bounds.max().x + 1e-3);
            prop_assert!(hitbox.max().y <= bounds.max().y + 1e-3);
        }
    }
}
