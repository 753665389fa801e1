//! The two animated bodies: the flail swinging on its chain and the weapon
//! tracking the cursor.
//!
//! Both bodies expose their rendered placement through [`Placement`], which
//! is *derived on every query* from the authoritative fields (pivot, home
//! center, angle). Nothing caches a rendered center, so a stale placement
//! is impossible by construction.

use glam::Vec2;

use crate::geometry::{bearing_offset, rotate_about_pivot};

/// Where a body's sprite should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Center of the rotated sprite quad, screen coordinates.
    pub center: Vec2,
    /// Visual rotation applied to the sprite, degrees (positive = CCW).
    pub angle_deg: f32,
    /// Draw the vertically mirrored sprite variant.
    pub mirrored: bool,
}

/// Spiked ball on a chain, revolving around a fixed pivot at constant
/// angular velocity. The accumulated angle grows without bound; downstream
/// trig is periodic so no wraparound is needed.
#[derive(Debug, Clone)]
pub struct Flail {
    pivot: Vec2,
    /// Unrotated reference center: pivot + chain arm at the starting bearing.
    home: Vec2,
    angle_deg: f32,
    angular_velocity_deg: f32,
    sprite_size: Vec2,
}

impl Flail {
    pub fn new(
        pivot: Vec2,
        chain_length: f32,
        starting_angle_deg: f32,
        angular_velocity_deg: f32,
        sprite_size: Vec2,
    ) -> Self {
        Self {
            pivot,
            home: pivot + bearing_offset(chain_length, starting_angle_deg),
            angle_deg: 0.0,
            angular_velocity_deg,
            sprite_size,
        }
    }

    /// Advance the swing by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.angle_deg += self.angular_velocity_deg * dt;
    }

    pub fn placement(&self) -> Placement {
        Placement {
            center: rotate_about_pivot(self.angle_deg, self.pivot, self.home),
            angle_deg: self.angle_deg,
            mirrored: false,
        }
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size
    }
}

/// Weapon sprite that re-aims at the pointer every tick. There is no
/// persisted angle and no smoothing: each frame's orientation depends only
/// on that frame's pointer position, so jumps across the screen midline are
/// expected behavior.
#[derive(Debug, Clone)]
pub struct Weapon {
    pivot: Vec2,
    /// Unrotated reference center: pivot + the fixed local offset.
    home: Vec2,
    screen_center_x: f32,
    angle_deg: f32,
    mirrored: bool,
    sprite_size: Vec2,
}

impl Weapon {
    pub fn new(pivot: Vec2, local_offset: Vec2, screen_center_x: f32, sprite_size: Vec2) -> Self {
        Self {
            pivot,
            home: pivot + local_offset,
            screen_center_x,
            angle_deg: 0.0,
            mirrored: false,
            sprite_size,
        }
    }

    /// Recompute aim from the current pointer position.
    pub fn update(&mut self, mouse: Vec2) {
        let offset = mouse - self.pivot;
        // atan2 measures math-positive (y-up); negate for y-down screen space.
        self.angle_deg = -offset.y.atan2(offset.x).to_degrees();
        // Mirror when aiming into the left half so the sprite is not upside down.
        self.mirrored = mouse.x < self.screen_center_x;
    }

    pub fn placement(&self) -> Placement {
        Placement {
            center: rotate_about_pivot(self.angle_deg, self.pivot, self.home),
            angle_deg: self.angle_deg,
            mirrored: self.mirrored,
        }
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bearing_offset;

    const EPS: f32 = 1e-3;
    const SPRITE: Vec2 = Vec2::new(12.0, 12.0);

    #[test]
    fn flail_starts_on_chain_at_starting_bearing() {
        let pivot = Vec2::new(96.0, 54.0);
        let flail = Flail::new(pivot, 32.0, 45.0, 120.0, SPRITE);

        // Before any update the rendered center sits at chain distance from
        // the pivot, on the configured starting bearing.
        let placement = flail.placement();
        assert!(((placement.center - pivot).length() - 32.0).abs() < EPS);
        let expected = pivot + bearing_offset(32.0, 45.0);
        assert!((placement.center - expected).length() < EPS);
        assert_eq!(placement.angle_deg, 0.0);
    }

    #[test]
    fn flail_angle_accumulates_linearly() {
        let mut flail = Flail::new(Vec2::new(96.0, 54.0), 32.0, 0.0, 120.0, SPRITE);
        let dt = 1.0 / 240.0;
        let ticks = 480;
        for _ in 0..ticks {
            flail.update(dt);
        }
        let expected = ticks as f32 * 120.0 * dt;
        assert!(
            (flail.angle_deg() - expected).abs() < 0.01,
            "accumulated {} expected {expected}",
            flail.angle_deg()
        );
    }

    #[test]
    fn flail_angle_grows_without_wraparound() {
        let mut flail = Flail::new(Vec2::new(96.0, 54.0), 32.0, 0.0, 120.0, SPRITE);
        for _ in 0..600 {
            flail.update(0.1);
        }
        // 600 ticks * 12 deg = 7200 degrees, well past a full turn.
        assert!(flail.angle_deg() > 7000.0);
        // Placement is still on the chain circle.
        let placement = flail.placement();
        assert!(((placement.center - flail.pivot()).length() - 32.0).abs() < EPS);
    }

    #[test]
    fn flail_placement_is_rederived_every_query() {
        let mut flail = Flail::new(Vec2::new(96.0, 54.0), 32.0, 45.0, 120.0, SPRITE);
        let before = flail.placement();
        flail.update(0.5);
        let after = flail.placement();
        assert!((before.center - after.center).length() > 1.0);
        assert!((after.angle_deg - 60.0).abs() < EPS);
    }

    #[test]
    fn weapon_aiming_straight_up_is_ninety_degrees() {
        let pivot = Vec2::new(96.0, 54.0);
        let mut weapon = Weapon::new(pivot, Vec2::new(20.0, 0.0), 96.0, SPRITE);
        weapon.update(Vec2::new(96.0, 0.0));

        assert!((weapon.angle_deg() - 90.0).abs() < EPS);
        // pointer.x == screen center is not strictly "left of".
        assert!(!weapon.mirrored());

        // The muzzle arm swings up: center ends 20 px above the pivot.
        let placement = weapon.placement();
        assert!((placement.center - Vec2::new(96.0, 34.0)).length() < EPS);
    }

    #[test]
    fn weapon_mirror_flips_across_screen_midline() {
        let pivot = Vec2::new(96.0, 54.0);
        let mut weapon = Weapon::new(pivot, Vec2::new(20.0, 0.0), 96.0, SPRITE);

        weapon.update(Vec2::new(95.0, 54.0));
        let left = weapon.placement();
        weapon.update(Vec2::new(97.0, 54.0));
        let right = weapon.placement();

        assert!(left.mirrored);
        assert!(!right.mirrored);
        // Directly left/right of the pivot: near 180 and 0 degrees.
        let left_err = (left.angle_deg.abs() - 180.0).abs();
        assert!(left_err < 0.1, "left angle {}", left.angle_deg);
        assert!(right.angle_deg.abs() < 0.1, "right angle {}", right.angle_deg);
    }

    #[test]
    fn weapon_has_no_momentum_between_updates() {
        let pivot = Vec2::new(96.0, 54.0);
        let mut weapon = Weapon::new(pivot, Vec2::new(20.0, 0.0), 96.0, SPRITE);

        weapon.update(Vec2::new(150.0, 54.0));
        weapon.update(Vec2::new(96.0, 0.0));
        let a = weapon.placement();

        let mut fresh = Weapon::new(pivot, Vec2::new(20.0, 0.0), 96.0, SPRITE);
        fresh.update(Vec2::new(96.0, 0.0));
        let b = fresh.placement();

        // History does not matter: same pointer, same placement.
        assert_eq!(a, b);
    }

    #[test]
    fn weapon_stays_at_offset_distance_from_pivot() {
        let pivot = Vec2::new(96.0, 54.0);
        let mut weapon = Weapon::new(pivot, Vec2::new(20.0, 0.0), 96.0, SPRITE);
        for mouse in [
            Vec2::new(0.0, 0.0),
            Vec2::new(191.0, 107.0),
            Vec2::new(96.0, 107.0),
            Vec2::new(3.0, 54.0),
        ] {
            weapon.update(mouse);
            let placement = weapon.placement();
            assert!(
                ((placement.center - pivot).length() - 20.0).abs() < EPS,
                "mouse {mouse:?}"
            );
        }
    }
}
