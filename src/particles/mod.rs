//! Onset-driven particle simulation.
//!
//! Particles are born in bursts at the center whenever the frame intensity
//! exceeds the theme threshold, fly outward, fade and shrink, and are
//! removed when their lifetime runs out. Randomness only affects spawn
//! parameters; the update and removal rules are exact.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::themes::ThemeProfile;

/// Particles spawned per burst unless configured otherwise.
pub const DEFAULT_BURST_SIZE: usize = 30;

/// One live particle, in polar coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Angle in radians.
    pub theta: f32,
    /// Radial distance from the center in data units.
    pub radius: f32,
    /// Radial distance added per frame.
    pub speed: f32,
    /// Frames left to live. Always > 0 for a particle held by the simulator.
    pub lifetime: u32,
    /// Color-map input, decays every frame.
    pub color: f32,
    /// Marker area in points², shrinks every frame.
    pub size: f32,
    /// Angle added per frame, if the theme swirls.
    pub swirl: Option<f32>,
}

impl Particle {
    /// Advance one frame.
    fn advance(&mut self, profile: &ThemeProfile) {
        self.radius += self.speed;
        if let Some(swirl) = self.swirl {
            self.theta += swirl;
        }
        self.lifetime = self.lifetime.saturating_sub(1);
        let remaining = if profile.max_lifetime == 0 {
            0.0
        } else {
            self.lifetime as f32 / profile.max_lifetime as f32
        };
        self.color *= remaining * profile.fade;
        self.size *= profile.shrink;
    }
}

/// Counts from one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub spawned: usize,
    pub retired: usize,
    pub alive: usize,
}

/// Owns the particle set and the spawn RNG for one render.
pub struct ParticleSimulator {
    profile: ThemeProfile,
    burst_size: usize,
    particles: Vec<Particle>,
    rng: StdRng,
    frame: usize,
}

impl ParticleSimulator {
    /// Simulator seeded from system entropy.
    pub fn new(profile: ThemeProfile) -> Self {
        Self::with_rng(profile, StdRng::from_entropy())
    }

    /// Reproducible simulator.
    pub fn with_seed(profile: ThemeProfile, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }

    fn with_rng(profile: ThemeProfile, rng: StdRng) -> Self {
        Self {
            profile,
            burst_size: DEFAULT_BURST_SIZE,
            particles: Vec::new(),
            rng,
            frame: 0,
        }
    }

    pub fn with_burst_size(mut self, burst_size: usize) -> Self {
        self.burst_size = burst_size;
        self
    }

    pub fn profile(&self) -> &ThemeProfile {
        &self.profile
    }

    pub fn burst_size(&self) -> usize {
        self.burst_size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of steps taken so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Drop every particle and restart the frame counter. The RNG keeps its
    /// state.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.frame = 0;
    }

    /// Whether `intensity` triggers a burst under the active theme.
    pub fn triggers_burst(&self, intensity: f32) -> bool {
        intensity > self.profile.threshold
    }

    /// Run one frame: spawn (if triggered), advance every particle, then
    /// remove the expired ones.
    pub fn step(&mut self, intensity: f32) -> StepReport {
        let spawned = if self.triggers_burst(intensity) {
            self.spawn_burst(intensity);
            log::debug!(
                "frame {}: burst of {} at intensity {:.3}",
                self.frame,
                self.burst_size,
                intensity
            );
            self.burst_size
        } else {
            0
        };

        for particle in &mut self.particles {
            particle.advance(&self.profile);
        }

        let before = self.particles.len();
        self.particles.retain(|p| p.lifetime > 0);
        let retired = before - self.particles.len();

        self.frame += 1;
        StepReport {
            spawned,
            retired,
            alive: self.particles.len(),
        }
    }

    fn spawn_burst(&mut self, intensity: f32) {
        let profile = &self.profile;
        self.particles.reserve(self.burst_size);

        for _ in 0..self.burst_size {
            let theta = self.rng.gen_range(profile.angle_range());
            let speed = self.rng.gen_range(profile.speed.clone()) * intensity;
            let mut color = self.rng.gen_range(profile.color_seed.clone());
            if profile.flash_chance > 0.0 && self.rng.gen_bool(profile.flash_chance) {
                color = 1.0;
            }
            let size = self.rng.gen_range(profile.size.clone());
            let swirl = profile.swirl.clone().map(|range| self.rng.gen_range(range));

            self.particles.push(Particle {
                theta,
                radius: 0.0,
                speed,
                lifetime: profile.max_lifetime,
                color,
                size,
                swirl,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn seeded(theme: Theme) -> ParticleSimulator {
        ParticleSimulator::with_seed(theme.profile(), 42)
    }

    #[test]
    fn test_no_spawn_below_threshold() {
        let mut sim = seeded(Theme::Agni);
        let report = sim.step(0.1);
        assert_eq!(report, StepReport::default());
        assert!(sim.is_empty());
    }

    #[test]
    fn test_spawn_is_strictly_above_threshold() {
        let threshold = Theme::Indra.profile().threshold;

        let mut sim = seeded(Theme::Indra);
        assert_eq!(sim.step(threshold - 1.0).spawned, 0);
        assert_eq!(sim.step(threshold).spawned, 0);
        assert_eq!(sim.step(threshold + f32::EPSILON).spawned, DEFAULT_BURST_SIZE);
    }

    #[test]
    fn test_new_particles_are_advanced_in_spawn_frame() {
        let mut sim = seeded(Theme::Agni);
        sim.step(1.0);
        let max = sim.profile().max_lifetime;
        for p in sim.particles() {
            assert_eq!(p.lifetime, max - 1);
            assert!((p.radius - p.speed).abs() < 1e-6);
        }
    }

    #[test]
    fn test_speed_scales_with_intensity() {
        let profile = Theme::Agni.profile();
        let mut sim = seeded(Theme::Agni);
        sim.step(0.5);
        for p in sim.particles() {
            assert!(p.speed >= profile.speed.start * 0.5 - 1e-6);
            assert!(p.speed < profile.speed.end * 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_particles_expire_after_max_lifetime() {
        let mut sim = seeded(Theme::Indra);
        let max = sim.profile().max_lifetime as usize;
        sim.step(1.0);
        for _ in 1..max - 1 {
            assert_eq!(sim.step(0.0).retired, 0);
        }
        assert_eq!(sim.len(), DEFAULT_BURST_SIZE);
        let report = sim.step(0.0);
        assert_eq!(report.retired, DEFAULT_BURST_SIZE);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_zero_lifetime_profile_retires_burst_at_once() {
        let profile = ThemeProfile {
            max_lifetime: 0,
            ..Theme::Agni.profile()
        };
        let mut sim = ParticleSimulator::with_seed(profile, 1);
        let report = sim.step(1.0);
        assert_eq!(report.spawned, DEFAULT_BURST_SIZE);
        assert_eq!(report.retired, DEFAULT_BURST_SIZE);
        assert!(sim.is_empty());
    }

    #[test]
    fn test_swirl_only_when_enabled() {
        let mut agni = seeded(Theme::Agni);
        agni.step(1.0);
        assert!(agni.particles().iter().all(|p| p.swirl.is_none()));

        let mut vayu = seeded(Theme::Vayu);
        vayu.step(1.0);
        assert!(vayu
            .particles()
            .iter()
            .all(|p| matches!(p.swirl, Some(s) if (-0.02..0.02).contains(&s))));
    }

    #[test]
    fn test_custom_burst_size_and_reset() {
        let mut sim = seeded(Theme::Vayu).with_burst_size(5);
        sim.step(0.9);
        assert_eq!(sim.len(), 5);
        assert_eq!(sim.frame(), 1);
        sim.reset();
        assert!(sim.is_empty());
        assert_eq!(sim.frame(), 0);
    }
}
