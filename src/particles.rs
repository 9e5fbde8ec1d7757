use rand::Rng;

use crate::constants::{PARTICLE_MAX_LIFETIME, PARTICLE_MIN_LIFETIME, PARTICLE_RADIUS};
use crate::rendering::{Surface, shade};
use crate::types::Vector2D;

pub struct Particle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub lifetime: f64, // Seconds remaining
}

impl Particle {
    fn fade(&self) -> f64 {
        (self.lifetime / PARTICLE_MAX_LIFETIME).clamp(0.0, 1.0)
    }

    fn glyph(&self) -> char {
        let fade = self.fade();
        if fade > 0.66 {
            '*'
        } else if fade > 0.33 {
            '+'
        } else {
            '.'
        }
    }
}

// --- ParticleSystem: transient burst effects anchored to one emission point ---
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    pub emission_point: Vector2D,
    color: (u8, u8, u8),
}

impl ParticleSystem {
    pub fn new(x: f64, y: f64, color: (u8, u8, u8)) -> Self {
        ParticleSystem {
            particles: Vec::new(),
            emission_point: Vector2D::new(x, y),
            color,
        }
    }

    pub fn emit(&mut self, count: usize, speed: f64, rng: &mut impl Rng) {
        for _ in 0..count {
            let angle = rng.gen_range(0.0..2.0 * std::f64::consts::PI);
            let speed_var = rng.gen_range(0.5..=1.5) * speed;
            self.particles.push(Particle {
                position: self.emission_point,
                velocity: Vector2D::new(angle.cos() * speed_var, angle.sin() * speed_var),
                lifetime: rng.gen_range(PARTICLE_MIN_LIFETIME..=PARTICLE_MAX_LIFETIME),
            });
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.particles.retain_mut(|particle| {
            particle.position = particle.position.add(particle.velocity.scale(dt));
            particle.lifetime -= dt;
            particle.lifetime > 0.0
        });
    }

    pub fn draw(&self, surface: &mut Surface) {
        for particle in &self.particles {
            surface.fill_circle(
                particle.position,
                PARTICLE_RADIUS,
                particle.glyph(),
                shade(self.color, particle.fade()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BLUE;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn speed_of(velocity: Vector2D) -> f64 {
        (velocity.x * velocity.x + velocity.y * velocity.y).sqrt()
    }

    fn particle_at_rest(lifetime: f64) -> Particle {
        Particle {
            position: Vector2D::new(0.0, 0.0),
            velocity: Vector2D::new(0.0, 0.0),
            lifetime,
        }
    }

    #[test]
    fn emit_spawns_count_particles_at_emission_point() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut system = ParticleSystem::new(50.0, 50.0, BLUE);
        system.emit(5, 100.0, &mut rng);

        assert_eq!(system.particles.len(), 5);
        for particle in &system.particles {
            assert_eq!(particle.position, Vector2D::new(50.0, 50.0));
            let speed = speed_of(particle.velocity);
            assert!(speed >= 50.0 - 1e-9 && speed <= 150.0 + 1e-9);
            assert!(particle.lifetime >= 0.5 && particle.lifetime <= 1.5);
        }
    }

    #[test]
    fn emission_bursts_accumulate_exactly() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
        for _ in 0..4 {
            system.emit(5, 100.0, &mut rng);
        }
        assert_eq!(system.particles.len(), 20);
    }

    #[test]
    fn update_integrates_position_and_decrements_lifetime() {
        let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
        system.particles.push(Particle {
            position: Vector2D::new(10.0, 20.0),
            velocity: Vector2D::new(30.0, -60.0),
            lifetime: 1.0,
        });
        system.update(0.5);

        let particle = &system.particles[0];
        assert_relative_eq!(particle.position.x, 25.0);
        assert_relative_eq!(particle.position.y, -10.0);
        assert_relative_eq!(particle.lifetime, 0.5);
    }

    #[test]
    fn particle_expires_on_first_update_past_zero() {
        let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
        system.particles.push(particle_at_rest(0.01));
        system.update(0.02);
        assert!(system.particles.is_empty());
    }

    #[test]
    fn particle_survives_until_lifetime_actually_runs_out() {
        let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
        system.particles.push(particle_at_rest(0.5));
        system.update(0.25);
        assert_eq!(system.particles.len(), 1);
        system.update(0.25);
        // 0.5 - 0.25 - 0.25 reaches zero exactly, which counts as expired
        assert!(system.particles.is_empty());
    }

    #[test]
    fn zero_dt_update_removes_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
        system.emit(5, 100.0, &mut rng);
        system.update(0.0);
        assert_eq!(system.particles.len(), 5);
    }

    #[test]
    fn fade_tracks_lifetime_against_reference() {
        assert_relative_eq!(particle_at_rest(1.5).fade(), 1.0);
        assert_relative_eq!(particle_at_rest(0.75).fade(), 0.5);
        assert_relative_eq!(particle_at_rest(0.0).fade(), 0.0);
    }

    #[test]
    fn glyph_ramp_dims_with_fade() {
        assert_eq!(particle_at_rest(1.5).glyph(), '*');
        assert_eq!(particle_at_rest(0.75).glyph(), '+');
        assert_eq!(particle_at_rest(0.3).glyph(), '.');
    }

    proptest! {
        #[test]
        fn update_retains_exactly_the_unexpired(
            lifetimes in proptest::collection::vec(0.01..3.0f64, 0..40),
            dt in 0.0..0.1f64,
        ) {
            let mut system = ParticleSystem::new(0.0, 0.0, BLUE);
            for &lifetime in &lifetimes {
                system.particles.push(particle_at_rest(lifetime));
            }
            system.update(dt);

            let expected = lifetimes.iter().filter(|&&l| l - dt > 0.0).count();
            prop_assert_eq!(system.particles.len(), expected);
            prop_assert!(system.particles.iter().all(|p| p.lifetime > 0.0));
        }
    }
}
