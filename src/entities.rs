use rand::Rng;

use crate::constants::*;
use crate::particles::ParticleSystem;
use crate::rendering::Surface;
use crate::terminal_io::HeldKeys;
use crate::types::{Rect, Vector2D, wrap_coordinate};

/// The capability every simulated object provides to the game loop.
///
/// `draw` takes the entity by shared reference: simulation state is mutated
/// during `update` only and is read-only while rendering.
pub trait Entity {
    fn update(&mut self, dt: f64, held: HeldKeys, rng: &mut impl Rng);
    fn draw(&self, surface: &mut Surface);
    fn get_rect(&self) -> Rect;
}

/// Closed set of entity variants the loop owns. New kinds (enemies,
/// projectiles) slot in as further variants implementing the same contract.
pub enum GameEntity {
    Player(Player),
}

impl Entity for GameEntity {
    fn update(&mut self, dt: f64, held: HeldKeys, rng: &mut impl Rng) {
        match self {
            GameEntity::Player(player) => player.update(dt, held, rng),
        }
    }

    fn draw(&self, surface: &mut Surface) {
        match self {
            GameEntity::Player(player) => player.draw(surface),
        }
    }

    fn get_rect(&self) -> Rect {
        match self {
            GameEntity::Player(player) => player.get_rect(),
        }
    }
}

// --- Player: the controllable craft ---
pub struct Player {
    pub position: Vector2D, // Top-left corner of the bounding box, world units
    pub velocity: Vector2D,
    pub width: i32,
    pub height: i32,
    pub rotation: f64, // Degrees, accumulates without normalization
    pub thrust_accel: f64,
    pub shooting_cooldown: f64, // Seconds, no firing action wired yet
    pub thruster: ParticleSystem,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Player {
            position: Vector2D::new(x, y),
            velocity: Vector2D::new(0.0, 0.0),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            rotation: 0.0,
            thrust_accel: PLAYER_THRUST,
            shooting_cooldown: 0.0,
            thruster: ParticleSystem::new(x, y, BLUE),
        }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(
            self.position.x + self.width as f64 / 2.0,
            self.position.y + self.height as f64 / 2.0,
        )
    }
}

impl Entity for Player {
    fn update(&mut self, dt: f64, held: HeldKeys, rng: &mut impl Rng) {
        if held.rotate_left {
            self.rotation -= PLAYER_TURN_RATE * dt;
        }
        if held.rotate_right {
            self.rotation += PLAYER_TURN_RATE * dt;
        }

        if held.thrust {
            // Screen y grows downward, so the heading's y component is negated
            let heading = self.rotation.to_radians();
            self.velocity.x += heading.cos() * self.thrust_accel * dt;
            self.velocity.y -= heading.sin() * self.thrust_accel * dt;
            // Emission count is per frame, not scaled by dt
            self.thruster
                .emit(THRUSTER_PARTICLE_COUNT, THRUSTER_PARTICLE_SPEED, rng);
        }

        // Friction is per frame as well
        self.velocity = self.velocity.scale(PLAYER_FRICTION);

        self.position = self.position.add(self.velocity.scale(dt));

        self.position.x = wrap_coordinate(self.position.x, WORLD_WIDTH);
        self.position.y = wrap_coordinate(self.position.y, WORLD_HEIGHT);

        self.thruster.emission_point = self.center();
        self.thruster.update(dt);

        self.shooting_cooldown = (self.shooting_cooldown - dt).max(0.0);
    }

    fn draw(&self, surface: &mut Surface) {
        // Particles first so the craft renders on top
        self.thruster.draw(surface);

        let w = self.width as f64;
        let h = self.height as f64;
        let local = [(w / 2.0, 0.0), (0.0, h), (w / 2.0, h * 0.8), (w, h)];

        // Rotate the hull counterclockwise about its center, then place it on
        // the craft's world-space center
        let center = self.center();
        let (sin_r, cos_r) = self.rotation.to_radians().sin_cos();
        let points = local.map(|(px, py)| {
            let dx = px - w / 2.0;
            let dy = py - h / 2.0;
            Vector2D::new(
                center.x + dx * cos_r + dy * sin_r,
                center.y - dx * sin_r + dy * cos_r,
            )
        });
        surface.fill_polygon(&points, CRAFT_GLYPH, WHITE);
    }

    fn get_rect(&self) -> Rect {
        Rect::new(self.position.x as i32, self.position.y as i32, self.width, self.height)
    }
}
