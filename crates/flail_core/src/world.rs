//! Demo world: both bodies plus the loop's run-state machine.
//!
//! The world is deliberately window-free. The host loop translates whatever
//! its platform delivers (window close, Escape key) into [`WorldEvent`]s and
//! feeds pointer coordinates into [`DemoWorld::update`], so the whole quit
//! path and both update rules run under plain unit tests.

use glam::Vec2;

use crate::body::{Flail, Weapon};
use crate::config::DemoConfig;

/// Logical presentation surface, in pixels.
pub const SCREEN_SIZE: Vec2 = Vec2::new(192.0, 108.0);
pub const SCREEN_CENTER: Vec2 = Vec2::new(96.0, 54.0);

/// Loop lifecycle. `Stopped` is terminal; there is no resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Quit-style signals from the host loop. These are the only external
/// events the world reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// Window close was requested.
    QuitRequested,
    /// The cancel key (Escape) was pressed.
    CancelPressed,
}

pub struct DemoWorld {
    pub flail: Flail,
    pub weapon: Weapon,
    state: RunState,
}

impl DemoWorld {
    /// Both bodies pivot on the screen center. Sprite sizes come from the
    /// asset table at startup so the world never touches image decoding.
    pub fn new(config: &DemoConfig, flail_sprite: Vec2, weapon_sprite: Vec2) -> Self {
        Self {
            flail: Flail::new(
                SCREEN_CENTER,
                config.chain_length,
                config.starting_angle_deg,
                config.angular_velocity_deg,
                flail_sprite,
            ),
            weapon: Weapon::new(
                SCREEN_CENTER,
                Vec2::new(config.weapon_offset, 0.0),
                SCREEN_CENTER.x,
                weapon_sprite,
            ),
            state: RunState::Running,
        }
    }

    pub fn handle_event(&mut self, event: WorldEvent) {
        if self.state == RunState::Stopped {
            return;
        }
        match event {
            WorldEvent::QuitRequested => log::info!("Close requested, stopping."),
            WorldEvent::CancelPressed => log::info!("Cancel key pressed, stopping."),
        }
        self.state = RunState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// One tick: advance the flail by `dt` seconds and re-aim the weapon at
    /// `mouse` (screen coordinates). A stopped world ignores further ticks.
    pub fn update(&mut self, dt: f32, mouse: Vec2) {
        if self.state == RunState::Stopped {
            return;
        }
        self.flail.update(dt);
        self.weapon.update(mouse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_world() -> DemoWorld {
        DemoWorld::new(
            &DemoConfig::default(),
            Vec2::new(12.0, 12.0),
            Vec2::new(16.0, 8.0),
        )
    }

    #[test]
    fn world_starts_running() {
        let world = sample_world();
        assert!(world.is_running());
    }

    #[test]
    fn update_advances_both_bodies() {
        let mut world = sample_world();
        world.update(0.25, Vec2::new(96.0, 0.0));
        assert!((world.flail.angle_deg() - 30.0).abs() < 1e-3);
        assert!((world.weapon.angle_deg() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn cancel_key_stops_the_world() {
        let mut world = sample_world();
        world.handle_event(WorldEvent::CancelPressed);
        assert!(!world.is_running());
    }

    #[test]
    fn close_request_stops_the_world() {
        let mut world = sample_world();
        world.handle_event(WorldEvent::QuitRequested);
        assert!(!world.is_running());
    }

    #[test]
    fn stopped_world_ignores_further_updates() {
        let mut world = sample_world();
        world.update(0.5, Vec2::new(10.0, 10.0));
        let angle_at_stop = world.flail.angle_deg();
        let weapon_at_stop = world.weapon.placement();

        world.handle_event(WorldEvent::CancelPressed);
        world.update(0.5, Vec2::new(180.0, 90.0));

        assert_eq!(world.flail.angle_deg(), angle_at_stop);
        assert_eq!(world.weapon.placement(), weapon_at_stop);
    }

    #[test]
    fn stop_is_terminal() {
        let mut world = sample_world();
        world.handle_event(WorldEvent::QuitRequested);
        // A second event of either kind leaves the world stopped.
        world.handle_event(WorldEvent::CancelPressed);
        assert!(!world.is_running());
    }
}
