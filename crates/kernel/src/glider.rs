use glam::{Quat, Vec3};
use gliderspace_common::Transform;
use gliderspace_input::InputState;
use serde::{Deserialize, Serialize};

/// Flight constants for the glider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GliderConfig {
    /// Speed gained per second of positive thrust.
    pub acceleration: f32,
    /// Speed lost per second of negative thrust.
    pub deceleration: f32,
    pub max_speed: f32,
    /// Radians per second at full yaw input.
    pub yaw_rate: f32,
    /// Units per second of vertical offset at full pitch input.
    pub pitch_rate: f32,
    /// Half-width of the flyable area along X.
    pub extent_x: f32,
    /// Half-depth of the flyable area along Z.
    pub extent_z: f32,
    /// Multiplier on the extents at which the glider bounces.
    pub bounds_margin: f32,
    pub min_altitude: f32,
}

impl Default for GliderConfig {
    fn default() -> Self {
        Self {
            acceleration: 10.0,
            deceleration: 15.0,
            max_speed: 40.0,
            yaw_rate: 1.2,
            pitch_rate: 6.0,
            extent_x: 200.0,
            extent_z: 200.0,
            bounds_margin: 1.05,
            min_altitude: 0.5,
        }
    }
}

impl GliderConfig {
    /// Largest |x| the glider may reach.
    pub fn limit_x(&self) -> f32 {
        self.extent_x * self.bounds_margin
    }

    /// Largest |z| the glider may reach.
    pub fn limit_z(&self) -> f32 {
        self.extent_z * self.bounds_margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GliderPhase {
    Idle,
    Powered,
}

/// Mutable flight state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GliderState {
    pub position: Vec3,
    pub orientation: Quat,
    pub speed: f32,
    pub thrusters_on: bool,
}

/// What a single update changed, beyond the state itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GliderStep {
    /// The glider hit the bounds this frame.
    pub bounced: bool,
    /// The thruster flag flipped this frame.
    pub thrusters_changed: bool,
}

/// The single player-controlled entity.
#[derive(Debug, Clone)]
pub struct Glider {
    config: GliderConfig,
    state: GliderState,
}

impl Glider {
    pub fn new(config: GliderConfig, position: Vec3) -> Self {
        Self {
            config,
            state: GliderState {
                position,
                orientation: Quat::IDENTITY,
                speed: 0.0,
                thrusters_on: false,
            },
        }
    }

    pub fn config(&self) -> &GliderConfig {
        &self.config
    }

    pub fn state(&self) -> &GliderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GliderState {
        &mut self.state
    }

    pub fn phase(&self) -> GliderPhase {
        if self.state.speed > 0.0 {
            GliderPhase::Powered
        } else {
            GliderPhase::Idle
        }
    }

    /// Local forward axis in world space.
    pub fn forward(&self) -> Vec3 {
        self.state.orientation * Vec3::Z
    }

    /// Local up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.state.orientation * Vec3::Y
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.state.position,
            rotation: self.state.orientation,
            ..Transform::default()
        }
    }

    /// Force the thruster flag. Returns true when it changed.
    pub fn set_thrusters(&mut self, on: bool) -> bool {
        let changed = self.state.thrusters_on != on;
        self.state.thrusters_on = on;
        changed
    }

    /// Integrate one frame of input.
    ///
    /// `gravity` pulls an idle glider down; pitch is a plain vertical offset
    /// and does not tilt the velocity.
    /// A negative or non-finite `dt` leaves the state untouched.
    pub fn update(&mut self, input: &InputState, dt: f32, gravity: f32) -> GliderStep {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "skipping glider update with invalid timestep");
            return GliderStep::default();
        }
        let was_on = self.state.thrusters_on;
        let cfg = self.config;

        let mut speed = self.state.speed;
        if input.thrust > 0.0 {
            speed += cfg.acceleration * input.thrust * dt;
            self.state.thrusters_on = true;
        } else if input.thrust < 0.0 {
            speed += cfg.deceleration * input.thrust * dt;
            self.state.thrusters_on = false;
        }
        self.state.speed = speed.clamp(0.0, cfg.max_speed);

        if input.yaw != 0.0 {
            let turn = Quat::from_axis_angle(self.up(), input.yaw * cfg.yaw_rate * dt);
            self.state.orientation = (turn * self.state.orientation).normalize();
        }

        self.state.position.y += input.pitch * cfg.pitch_rate * dt;
        if self.phase() == GliderPhase::Idle {
            self.state.position.y -= gravity * dt;
        }
        self.state.position.y = self.state.position.y.max(cfg.min_altitude);

        self.state.position += self.forward() * self.state.speed * dt;

        let bounced = self.clamp_to_bounds();
        if bounced {
            self.state.speed = 0.0;
            self.state.thrusters_on = false;
            tracing::debug!(
                x = self.state.position.x,
                z = self.state.position.z,
                "glider bounced off the bounds"
            );
        }

        GliderStep {
            bounced,
            thrusters_changed: was_on != self.state.thrusters_on,
        }
    }

    fn clamp_to_bounds(&mut self) -> bool {
        let (lx, lz) = (self.config.limit_x(), self.config.limit_z());
        let p = &mut self.state.position;
        let mut clamped = false;
        if p.x.abs() > lx {
            p.x = p.x.clamp(-lx, lx);
            clamped = true;
        }
        if p.z.abs() > lz {
            p.z = p.z.clamp(-lz, lz);
            clamped = true;
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn thrust(v: f32) -> InputState {
        InputState {
            thrust: v,
            ..InputState::default()
        }
    }

    /// Deterministic pseudo-random stream for input sequences.
    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn axis(state: &mut u64) -> f32 {
        (splitmix64(state) % 3) as f32 - 1.0
    }

    fn random_input(state: &mut u64) -> InputState {
        InputState {
            forward: axis(state),
            right: axis(state),
            thrust: axis(state),
            yaw: axis(state),
            pitch: axis(state),
        }
    }

    #[test]
    fn starts_idle() {
        let g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(g.phase(), GliderPhase::Idle);
        assert!(!g.state().thrusters_on);
        assert!((g.forward() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn two_seconds_of_thrust_reaches_twenty() {
        for max_speed in [50.0, 15.0] {
            let cfg = GliderConfig {
                acceleration: 10.0,
                max_speed,
                ..GliderConfig::default()
            };
            let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
            for _ in 0..120 {
                g.update(&thrust(1.0), 1.0 / 60.0, 0.0);
            }
            let expected = f32::min(max_speed, 20.0);
            assert!((g.state().speed - expected).abs() < 1e-3, "speed {}", g.state().speed);
            assert_eq!(g.phase(), GliderPhase::Powered);
            assert!(g.state().thrusters_on);
        }
    }

    #[test]
    fn negative_thrust_brakes_to_idle() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        g.update(&thrust(1.0), 1.0, 0.0);
        let step = g.update(&thrust(-1.0), 5.0, 0.0);
        assert_eq!(g.state().speed, 0.0);
        assert_eq!(g.phase(), GliderPhase::Idle);
        assert!(step.thrusters_changed);
        assert!(!g.state().thrusters_on);
    }

    #[test]
    fn invalid_timestep_leaves_state_alone() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        g.update(&thrust(1.0), 1.0, 0.0);
        let before = *g.state();
        for dt in [-0.5, f32::NAN, f32::INFINITY] {
            let step = g.update(&thrust(1.0), dt, 0.0);
            assert_eq!(step, GliderStep::default());
            assert_eq!(g.state().speed, before.speed);
            assert_eq!(g.state().position, before.position);
        }
    }

    #[test]
    fn speed_above_max_is_clamped_without_thrust() {
        let cfg = GliderConfig::default();
        let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
        g.state_mut().speed = cfg.max_speed * 3.0;
        g.update(&InputState::default(), 0.01, 0.0);
        assert_eq!(g.state().speed, cfg.max_speed);

        g.state_mut().speed = -4.0;
        g.update(&InputState::default(), 0.01, 0.0);
        assert_eq!(g.state().speed, 0.0);
    }

    #[test]
    fn speed_stays_in_range_for_any_input() {
        let cfg = GliderConfig::default();
        let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
        let mut seed = 42;
        for _ in 0..5000 {
            g.update(&random_input(&mut seed), 0.05, 9.8);
            let s = g.state().speed;
            assert!((0.0..=cfg.max_speed).contains(&s), "speed {s}");
        }
    }

    #[test]
    fn position_stays_in_bounds_for_any_input() {
        let cfg = GliderConfig {
            extent_x: 20.0,
            extent_z: 30.0,
            ..GliderConfig::default()
        };
        let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
        let mut seed = 7;
        for _ in 0..5000 {
            let mut input = random_input(&mut seed);
            // Bias toward flying so the bounds actually get tested.
            if input.thrust == 0.0 {
                input.thrust = 1.0;
            }
            g.update(&input, 0.1, 0.0);
            let p = g.state().position;
            assert!(p.x.abs() <= cfg.limit_x() + 1e-4);
            assert!(p.z.abs() <= cfg.limit_z() + 1e-4);
        }
    }

    #[test]
    fn bounce_at_positive_x_edge() {
        let cfg = GliderConfig {
            extent_x: 10.0,
            ..GliderConfig::default()
        };
        let mut g = Glider::new(cfg, Vec3::new(10.0, 5.0, 0.0));
        {
            let state = g.state_mut();
            state.orientation = Quat::from_rotation_y(FRAC_PI_2);
            state.speed = 30.0;
            state.thrusters_on = true;
        }
        let step = g.update(&InputState::default(), 0.1, 0.0);
        assert!(step.bounced);
        assert!(step.thrusters_changed);
        assert!((g.state().position.x - 10.5).abs() < 1e-5);
        assert_eq!(g.state().speed, 0.0);
        assert!(!g.state().thrusters_on);
    }

    #[test]
    fn yaw_keeps_orientation_normalized() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        let input = InputState {
            yaw: 1.0,
            ..InputState::default()
        };
        for _ in 0..10_000 {
            g.update(&input, 1.0 / 60.0, 0.0);
        }
        assert!((g.state().orientation.length() - 1.0).abs() < 1e-4);
        // Turning about Y never tilts the nose.
        assert!(g.forward().y.abs() < 1e-4);
    }

    #[test]
    fn yaw_turns_forward_axis() {
        let cfg = GliderConfig {
            yaw_rate: FRAC_PI_2,
            ..GliderConfig::default()
        };
        let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
        let input = InputState {
            yaw: 1.0,
            ..InputState::default()
        };
        g.update(&input, 1.0, 0.0);
        assert!((g.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn pitch_is_a_vertical_offset() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        let input = InputState {
            pitch: 1.0,
            ..InputState::default()
        };
        g.update(&input, 0.5, 0.0);
        assert!((g.state().position.y - 8.0).abs() < 1e-5);
        assert_eq!(g.state().orientation, Quat::IDENTITY);
    }

    #[test]
    fn gravity_pulls_idle_glider_to_floor() {
        let cfg = GliderConfig::default();
        let mut g = Glider::new(cfg, Vec3::new(0.0, 5.0, 0.0));
        g.update(&InputState::default(), 0.1, 10.0);
        assert!((g.state().position.y - 4.0).abs() < 1e-5);
        for _ in 0..100 {
            g.update(&InputState::default(), 0.1, 10.0);
        }
        assert_eq!(g.state().position.y, cfg.min_altitude);
    }

    #[test]
    fn gravity_ignored_while_powered() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::new(0.0, 5.0, 0.0));
        g.update(&thrust(1.0), 0.1, 10.0);
        assert_eq!(g.state().position.y, 5.0);
    }

    #[test]
    fn set_thrusters_reports_change() {
        let mut g = Glider::new(GliderConfig::default(), Vec3::ZERO);
        assert!(g.set_thrusters(true));
        assert!(!g.set_thrusters(true));
        assert!(g.set_thrusters(false));
    }
}
